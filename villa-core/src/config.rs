use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminConfig {
    pub username: String,
    pub password: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        AdminConfig {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

/// Cosmetic latencies, all in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    pub chat_reply_ms: u64,
    pub admin_login_ms: u64,
    pub lead_popup_ms: u64,
    pub lead_success_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        DelayConfig {
            chat_reply_ms: 1500,
            admin_login_ms: 800,
            lead_popup_ms: 5000,
            lead_success_ms: 2000,
        }
    }
}

impl DelayConfig {
    /// All delays zero, for tests and the HTTP service.
    pub fn instant() -> Self {
        DelayConfig {
            chat_reply_ms: 0,
            admin_login_ms: 0,
            lead_popup_ms: 0,
            lead_success_ms: 0,
        }
    }

    pub fn chat_reply(&self) -> Duration {
        Duration::from_millis(self.chat_reply_ms)
    }

    pub fn admin_login(&self) -> Duration {
        Duration::from_millis(self.admin_login_ms)
    }

    pub fn lead_popup(&self) -> Duration {
        Duration::from_millis(self.lead_popup_ms)
    }

    pub fn lead_success(&self) -> Duration {
        Duration::from_millis(self.lead_success_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub phone: String,
    pub email: String,
}

impl Default for ContactConfig {
    fn default() -> Self {
        ContactConfig {
            phone: "+91 98765 43210".to_string(),
            email: "info@futurerealestate.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub brand: String,
    pub contact: ContactConfig,
    pub admin: AdminConfig,
    pub delays: DelayConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            brand: crate::seed::BRAND.to_string(),
            contact: ContactConfig::default(),
            admin: AdminConfig::default(),
            delays: DelayConfig::default(),
        }
    }
}

impl SiteConfig {
    pub fn from_toml(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading site config from {}", path.display());
        let text = std::fs::read_to_string(path)?;
        Self::from_toml(&text)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(SiteConfig::default()),
        }
    }
}
