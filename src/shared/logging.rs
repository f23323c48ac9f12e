use tracing_subscriber::EnvFilter;

use crate::shared::env_var::EnvVars;

const DEFAULT_FILTER: &str = "warn";

/// Install the stderr `tracing` subscriber.
///
/// The filter comes from `SHIPKIT_LOG` (same syntax as `RUST_LOG`) and
/// defaults to warnings only.
pub fn init() {
    let vars = EnvVars::load();
    let filter = build_filter(vars.log.as_deref());

    // A second init (e.g. from tests) is harmless, so the error is dropped.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .with_ansi(!vars.no_color)
        .try_init();
}

fn build_filter(directive: Option<&str>) -> EnvFilter {
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}
