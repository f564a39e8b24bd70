//! Tracing subscriber setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "info,voice_consult=debug"
    } else {
        "warn"
    }
}

/// Install a stderr subscriber. `RUST_LOG` overrides the verbosity flag.
///
/// Logs never go to stdout, which carries the transcript and reply.
pub fn init_tracing(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!(verbose, "tracing initialized");
    }
}
