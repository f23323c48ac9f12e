//! Centralized reader for the environment variables shipkit honours.
//!
//! Environment variable names are defined as private constants here;
//! external code accesses values through the `EnvVars` struct.

const LOG: &str = "SHIPKIT_LOG";
const NO_COLOR: &str = "NO_COLOR";

/// Snapshot of the relevant environment variables at load time.
pub struct EnvVars {
    /// `tracing` filter directive, e.g. "debug" or "shipkit=trace".
    pub log: Option<String>,

    /// When set (to anything non-empty), colored output is disabled.
    /// See https://no-color.org.
    pub no_color: bool,
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

impl EnvVars {
    pub fn load() -> Self {
        Self {
            log: non_empty_var(LOG),
            no_color: non_empty_var(NO_COLOR).is_some(),
        }
    }
}
