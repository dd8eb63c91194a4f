//! Log output for the CLI. The library only emits `tracing` events; this is
//! the one place a subscriber gets installed.

use tracing::Level;

/// Map `-v` occurrences to a level: warnings by default, then info, debug, trace.
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the stderr fmt subscriber. A second call is a no-op.
pub fn init(verbosity: u8) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(level_for(verbosity))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
