use serde::Deserialize;

use crate::services::suggestions::{LikeAnchor, SuggestionPolicy};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// PostgreSQL connection URL. Without it the service runs on the in-memory store.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Redis connection URL. Without it place lookups are not cached.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Seconds a place detail stays in the cache
    #[serde(default = "default_place_cache_ttl")]
    pub place_cache_ttl: u64,

    /// HTTP mail relay endpoint used by the contact form
    #[serde(default = "default_mail_relay_url")]
    pub mail_relay_url: String,

    /// Mail relay API key
    #[serde(default)]
    pub mail_api_key: String,

    /// Sender address for contact form mails
    #[serde(default = "default_mail_from")]
    pub mail_from: String,

    /// Mailbox that receives contact form submissions
    #[serde(default = "default_contact_recipient")]
    pub contact_recipient: String,

    /// Which like picks the suggestion category
    #[serde(default)]
    pub suggestion_anchor: LikeAnchor,

    /// Drop places the user already liked from suggestions
    #[serde(default = "default_exclude_liked")]
    pub suggestions_exclude_liked: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_place_cache_ttl() -> u64 {
    3600
}

fn default_mail_relay_url() -> String {
    "http://localhost:8025/api/send".to_string()
}

fn default_mail_from() -> String {
    "no-reply@craiova.local".to_string()
}

fn default_contact_recipient() -> String {
    "contact@craiova.local".to_string()
}

fn default_exclude_liked() -> bool {
    true
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Suggestion policy derived from the configured knobs
    pub fn suggestion_policy(&self) -> SuggestionPolicy {
        SuggestionPolicy {
            anchor: self.suggestion_anchor,
            exclude_liked: self.suggestions_exclude_liked,
        }
    }
}
