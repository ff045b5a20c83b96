use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.nokotime.com";
pub const DEFAULT_API_VERSION: &str = "v2";
pub const DEFAULT_USER_AGENT: &str = "noko-timer";
pub const DEFAULT_SPACING_MS: u64 = 250;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const TOKEN_HEADER: &str = "X-NokoToken";

#[derive(Clone, Debug)]
pub struct NokoConfig {
    pub base_url: String,
    pub api_version: String,
    pub token: String,
    pub user_agent: String,
    pub request_spacing: Duration,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl NokoConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            token: token.into(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_spacing: Duration::from_millis(DEFAULT_SPACING_MS),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = ua.into();
        self
    }

    pub fn with_request_spacing(mut self, spacing: Duration) -> Self {
        self.request_spacing = spacing;
        self
    }

    pub fn with_timeout(mut self, duration: Duration) -> Self {
        self.timeout = duration;
        self
    }

    pub fn with_connect_timeout(mut self, duration: Duration) -> Self {
        self.connect_timeout = duration;
        self
    }

    /// Root URL every endpoint path is appended to, always ending in `/`.
    pub fn api_root(&self) -> String {
        format!(
            "{}/{}/",
            self.base_url.trim_end_matches('/'),
            self.api_version.trim_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::NokoConfig;
    use std::time::Duration;

    #[test]
    fn api_root_joins_base_and_version() {
        let config = NokoConfig::new("token");
        assert_eq!(config.api_root(), "https://api.nokotime.com/v2/");
    }

    #[test]
    fn api_root_normalizes_slashes() {
        let config = NokoConfig::new("token")
            .with_base_url("http://127.0.0.1:9000/")
            .with_api_version("/v3/");
        assert_eq!(config.api_root(), "http://127.0.0.1:9000/v3/");
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = NokoConfig::new("token")
            .with_user_agent("tests")
            .with_request_spacing(Duration::ZERO)
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.user_agent, "tests");
        assert_eq!(config.request_spacing, Duration::ZERO);
        assert_eq!(config.timeout, Duration::from_secs(5));
    }
}
