//! Runtime configuration from environment variables with code defaults.

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8083/api/users";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Base URL of the remote user service, e.g. `http://localhost:8083/api/users`.
    pub api_url: String,
    /// Per-request timeout. A stalled request fails instead of pinning a page
    /// in its busy state forever.
    pub timeout: Duration,
    /// Optional file the session slot persists to across runs.
    pub session_file: Option<PathBuf>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_file: None,
        }
    }
}

impl PortalConfig {
    /// Read `PORTAL_API_URL`, `PORTAL_HTTP_TIMEOUT_SECS` and
    /// `PORTAL_SESSION_FILE`, falling back to defaults.
    pub fn from_env() -> Self {
        let api_url = std::env::var("PORTAL_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let timeout_secs = std::env::var("PORTAL_HTTP_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        let session_file = std::env::var("PORTAL_SESSION_FILE").ok().map(PathBuf::from);
        Self { api_url, timeout: Duration::from_secs(timeout_secs), session_file }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_user_service() {
        let cfg = PortalConfig::default();
        assert_eq!(cfg.api_url, "http://localhost:8083/api/users");
        assert_eq!(cfg.timeout, Duration::from_secs(10));
        assert!(cfg.session_file.is_none());
    }
}
