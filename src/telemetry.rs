//! Tracing subscriber setup shared by the binaries.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber.
///
/// `RUST_LOG` wins over `default_directives`; JSON output is used when
/// `json` is set (production).
pub fn init_tracing(default_directives: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    // A second init (e.g. in tests) is not an error worth surfacing.
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}
