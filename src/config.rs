/// Runtime configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Upstream lookup page; the canonical RUT is appended as the last path segment
    pub lookup_base_url: String,
    /// Timeout for the direct (non-browser) upstream request
    pub direct_timeout_secs: u64,
    /// Timeout for the headless browser navigation
    pub nav_timeout_secs: u64,
    /// Fixed wait after navigation so a challenge page can resolve
    pub browser_dwell_ms: u64,
    /// Upper bound on polling for a `tr td` element in the rendered page
    pub selector_poll_ms: u64,
    /// Explicit Chromium/Chrome binary; when unset chromiumoxide auto-detects
    pub chrome_executable: Option<String>,
    /// User agent presented on both fetch tiers
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            lookup_base_url: "https://r.rutificador.co/pr".to_string(),
            direct_timeout_secs: 20,
            nav_timeout_secs: 30,
            browser_dwell_ms: 3500,
            selector_poll_ms: 4000,
            chrome_executable: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
                .to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            port: std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.port),
            lookup_base_url: std::env::var("LOOKUP_BASE_URL").unwrap_or(default.lookup_base_url),
            direct_timeout_secs: std::env::var("DIRECT_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.direct_timeout_secs),
            nav_timeout_secs: std::env::var("NAV_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.nav_timeout_secs),
            browser_dwell_ms: std::env::var("BROWSER_DWELL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_dwell_ms),
            selector_poll_ms: std::env::var("SELECTOR_POLL_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.selector_poll_ms),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok(),
            user_agent: std::env::var("USER_AGENT").unwrap_or(default.user_agent),
        }
    }

    /// Builds the upstream URL for an already-canonical RUT
    pub fn lookup_url(&self, canonical: &str) -> String {
        format!("{}/{}", self.lookup_base_url.trim_end_matches('/'), canonical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_url_joins_with_single_slash() {
        let mut config = Config::default();
        config.lookup_base_url = "https://example.com/pr/".to_string();
        assert_eq!(config.lookup_url("15.421.741-K"), "https://example.com/pr/15.421.741-K");
    }
}
