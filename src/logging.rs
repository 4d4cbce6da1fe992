use tracing::subscriber::SetGlobalDefaultError;
use tracing::Level;

/// Maps a `-v` count onto a tracing level: warn, info, debug, trace.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Installs a compact stderr subscriber as the global default.
///
/// Meant for binaries; the library itself only emits events.
pub fn init_logging(verbosity: u8) -> Result<(), SetGlobalDefaultError> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_max_level(level_for(verbosity))
        .finish();
    tracing::subscriber::set_global_default(subscriber)
}
