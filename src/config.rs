use std::env;
use std::time::Duration;

const DEFAULT_REPORTS_BASE: &str = "reports";
const DEFAULT_POLL_SECS: u64 = 30;

/// Runtime configuration, read once at startup from the environment
/// (`.env` / `.env.local` are loaded by main before this runs).
#[derive(Debug, Clone)]
pub struct Config {
    /// Optional base URL for the external API (`/status` ping). Disabled when unset.
    pub api_base_url: Option<String>,
    /// Base for the report resources: an `http(s)://` URL or a local directory.
    pub reports_base: String,
    pub poll_interval: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let api_base_url = opt_env("VRDB_API_URL");
        let reports_base =
            opt_env("VRDB_REPORTS_BASE").unwrap_or_else(|| DEFAULT_REPORTS_BASE.to_string());
        let poll_secs = env::var("VRDB_POLL_SECS")
            .ok()
            .and_then(|val| val.parse::<u64>().ok())
            .unwrap_or(DEFAULT_POLL_SECS)
            .max(5);

        Self {
            api_base_url,
            reports_base,
            poll_interval: Duration::from_secs(poll_secs),
        }
    }
}

fn opt_env(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .and_then(|val| if val.trim().is_empty() { None } else { Some(val) })
}
