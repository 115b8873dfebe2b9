//! Client configuration.

use std::time::Duration;

use pointer_client::{DEFAULT_CLIENT_ID, DEFAULT_DISABLED_STATUSES};
use serde::{Deserialize, Serialize};

pub const DEFAULT_API_URL: &str = "http://localhost:8082";

/// Settings shared by every screen. Missing keys take their defaults, so
/// an empty TOML table is a valid config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HrConfig {
    pub api_url: String,
    pub client_id: String,
    pub page_size: u32,
    pub email_check_debounce_ms: u64,
    pub resend_cooldown_secs: u64,
    /// Login statuses reported as a disabled account.
    pub account_disabled_statuses: Vec<u16>,
    pub locale: String,
}

impl Default for HrConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            client_id: DEFAULT_CLIENT_ID.to_string(),
            page_size: 10,
            email_check_debounce_ms: 500,
            resend_cooldown_secs: 60,
            account_disabled_statuses: DEFAULT_DISABLED_STATUSES.to_vec(),
            locale: "pt-BR".to_string(),
        }
    }
}

impl HrConfig {
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn email_check_debounce(&self) -> Duration {
        Duration::from_millis(self.email_check_debounce_ms)
    }

    pub fn resend_cooldown(&self) -> Duration {
        Duration::from_secs(self.resend_cooldown_secs)
    }

    /// Page size used for listings; zero falls back to the default.
    pub fn effective_page_size(&self) -> u32 {
        if self.page_size == 0 {
            Self::default().page_size
        } else {
            self.page_size
        }
    }
}
