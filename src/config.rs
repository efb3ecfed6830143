use std::env;

/// Placeholder value that ships in sample configs; treated the same as an
/// unset hosting key.
pub const IMGBB_PLACEHOLDER_KEY: &str = "YOUR_IMGBB_API_KEY";

pub const DEFAULT_KIE_BASE_URL: &str = "https://api.kie.ai/api/v1/jobs";
pub const DEFAULT_IMGBB_UPLOAD_URL: &str = "https://api.imgbb.com/1/upload";

#[derive(Debug, Clone)]
pub struct KieConfig {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ImgbbConfig {
    pub api_key: Option<String>,
    pub upload_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PollConfig {
    pub max_attempts: u32,
    pub interval_ms: u64,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub kie: KieConfig,
    pub imgbb: ImgbbConfig,
    pub poll: PollConfig,
}

impl Default for KieConfig {
    fn default() -> Self {
        KieConfig {
            api_key: None,
            base_url: None,
        }
    }
}

impl KieConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("KIE_API_KEY").ok();
        let base_url = env::var("KIE_BASE_URL").ok();

        KieConfig { api_key, base_url }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}

impl Default for ImgbbConfig {
    fn default() -> Self {
        ImgbbConfig {
            api_key: None,
            upload_url: None,
        }
    }
}

impl ImgbbConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let api_key = env::var("IMGBB_API_KEY").ok();
        let upload_url = env::var("IMGBB_UPLOAD_URL").ok();

        ImgbbConfig {
            api_key,
            upload_url,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_upload_url(mut self, upload_url: impl Into<String>) -> Self {
        self.upload_url = Some(upload_url.into());
        self
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            max_attempts: 60,
            interval_ms: 2000,
        }
    }
}

impl PollConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();
        let max_attempts = env::var("POLL_MAX_ATTEMPTS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.max_attempts);
        let interval_ms = env::var("POLL_INTERVAL_MS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.interval_ms);

        PollConfig {
            max_attempts,
            interval_ms,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_interval_ms(mut self, interval_ms: u64) -> Self {
        self.interval_ms = interval_ms;
        self
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            kie: KieConfig::default(),
            imgbb: ImgbbConfig::default(),
            poll: PollConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Config {
            kie: KieConfig::from_env(),
            imgbb: ImgbbConfig::from_env(),
            poll: PollConfig::from_env(),
        }
    }

    pub fn with_kie(mut self, config: KieConfig) -> Self {
        self.kie = config;
        self
    }

    pub fn with_imgbb(mut self, config: ImgbbConfig) -> Self {
        self.imgbb = config;
        self
    }

    pub fn with_poll(mut self, config: PollConfig) -> Self {
        self.poll = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_defaults() {
        let poll = PollConfig::default();
        assert_eq!(poll.max_attempts, 60);
        assert_eq!(poll.interval_ms, 2000);
    }

    #[test]
    fn test_builder_chaining() {
        let config = Config::new()
            .with_kie(KieConfig::new().with_api_key("k").with_base_url("http://kie.test"))
            .with_imgbb(ImgbbConfig::new().with_api_key("i"))
            .with_poll(PollConfig::new().with_max_attempts(3).with_interval_ms(1));

        assert_eq!(config.kie.api_key.as_deref(), Some("k"));
        assert_eq!(config.kie.base_url.as_deref(), Some("http://kie.test"));
        assert_eq!(config.imgbb.api_key.as_deref(), Some("i"));
        assert_eq!(config.poll.max_attempts, 3);
        assert_eq!(config.poll.interval_ms, 1);
    }
}
