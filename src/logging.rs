//! Logger set-up for the demo binary and tests.
//!
//! The library itself only emits through the `log` facade: transitions at
//! `debug`, notifications at `info`. Hosts install whatever logger they like;
//! [`init`] wires up `env_logger` honouring `RUST_LOG`.

use env_logger::{Builder, Env};
use log::{debug, LevelFilter};

/// Initializes the global logger.
///
/// When `verbose` is `true`, all debug messages are printed. Otherwise only
/// info level and above are shown. `RUST_LOG` overrides either default.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let env = Env::default().default_filter_or(level.to_string());
    let mut builder = Builder::from_env(env);
    builder.format_timestamp_millis();

    // Repeated calls from tests are harmless.
    if builder.try_init().is_err() {
        debug!("logger already installed; keeping the existing one");
    }
}
