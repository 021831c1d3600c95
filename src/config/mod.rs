use once_cell::sync::Lazy;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiSettings,
}

#[derive(Debug, Clone)]
pub struct ApiSettings {
    /// Base URL of the yam backend, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. Zero disables the timeout entirely.
    pub request_timeout_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::defaults().with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = env::var("YAM_BASE_URL") {
            if !v.trim().is_empty() {
                self.api.base_url = v.trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = env::var("YAM_REQUEST_TIMEOUT") {
            self.api.request_timeout_secs = v.parse().unwrap_or(self.api.request_timeout_secs);
        }

        self
    }

    fn defaults() -> Self {
        Self {
            api: ApiSettings {
                base_url: "http://localhost:3000".to_string(),
                request_timeout_secs: 30,
            },
        }
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
