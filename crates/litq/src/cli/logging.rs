//! Tracing subscriber setup.

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Maps the `-v` count to the minimum level shown.
pub fn level_for(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` directives are honoured alongside the level chosen by `-v`.
pub fn init(verbose: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level_for(verbose).into()))
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), Level::WARN);
        assert_eq!(level_for(1), Level::INFO);
        assert_eq!(level_for(2), Level::DEBUG);
        assert_eq!(level_for(7), Level::DEBUG);
    }
}
