//! Diagnostic logging setup
//!
//! Logs go to stderr through `tracing-subscriber`. `RUST_LOG` wins when set;
//! otherwise the crate logs at `info`, or `debug` with `--verbose`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive for the crate's own targets
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "voice_recorder=debug"
    } else {
        "voice_recorder=info"
    }
}

/// Install the global subscriber. Later calls are ignored.
pub fn init(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
