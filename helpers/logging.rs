//! Tracing setup for the deploy script and tests

use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "NOTE_NOOK_LOG";

/// Installs a stderr `fmt` subscriber.
///
/// `NOTE_NOOK_LOG` overrides the filter; when unset `RUST_LOG` is honoured and
/// the level defaults to `info`. Stdout stays free for script output. Calling
/// this more than once is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}
