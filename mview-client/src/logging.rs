//! Console logging setup.

use log::LevelFilter;

/// Levels for dependencies and for this workspace's own crates.
fn levels(verbose: bool) -> (LevelFilter, LevelFilter) {
    let own = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    (LevelFilter::Info, own)
}

/// Installs the global logger. Lines look like
/// `[2026-10-19 14:03:12.345 INFO mview_core::model] Loaded ...`.
pub fn init(verbose: bool) -> Result<(), log::SetLoggerError> {
    let (base_level, own_level) = levels(verbose);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(base_level)
        .level_for("mview", own_level)
        .level_for("mview_core", own_level)
        .chain(std::io::stdout())
        .apply()
}
