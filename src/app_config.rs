/*!
 * Provider configuration.
 *
 * Settings of the BierDopje provider, loaded from a JSON file and validated.
 */

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use isolang::Language;

use crate::language_utils;

/// Settings for the BierDopje provider
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProviderSettings {
    // @field: Service base URL, without the API key segment
    #[serde(default = "default_base_url")]
    pub base_url: String,

    // @field: API key, used as the first path segment of every API call
    #[serde(default = "default_api_key")]
    pub api_key: String,

    // @field: Timeout seconds for every network call
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: User-Agent header sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // @field: Lifetime of a cached show id lookup
    #[serde(default = "default_show_expiration_secs")]
    pub show_expiration_secs: u64,

    // @field: Languages to search, as ISO 639 codes
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
}

impl ProviderSettings {
    /// Load settings from a JSON file; missing fields take their defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read provider settings from {}", path.display()))?;
        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse provider settings in {}", path.display()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the settings for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| anyhow!("Invalid base URL '{}': {}", self.base_url, e))?;
        if url.cannot_be_a_base() {
            return Err(anyhow!("Base URL '{}' cannot be used as a base", self.base_url));
        }

        if self.api_key.trim().is_empty() {
            return Err(anyhow!("API key is required for the BierDopje provider"));
        }

        if self.timeout_secs == 0 {
            return Err(anyhow!("Timeout must be at least one second"));
        }

        if self.languages.is_empty() {
            return Err(anyhow!("At least one language is required"));
        }
        self.parsed_languages()?;

        Ok(())
    }

    /// Parse the configured language codes
    pub fn parsed_languages(&self) -> Result<Vec<Language>> {
        self.languages
            .iter()
            .map(|code| {
                language_utils::parse_language(code)
                    .with_context(|| format!("Invalid language in provider settings: {}", code))
            })
            .collect()
    }

    /// Timeout applied to every network call
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Expiration window of the show id cache
    pub fn show_expiration(&self) -> Duration {
        Duration::from_secs(self.show_expiration_secs)
    }

    /// Root of every API call: base URL followed by the API key
    pub fn api_root(&self) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), self.api_key)
    }
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: default_api_key(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
            show_expiration_secs: default_show_expiration_secs(),
            languages: default_languages(),
        }
    }
}

fn default_base_url() -> String {
    "http://api.bierdopje.com".to_string()
}

fn default_api_key() -> String {
    "A2B638AC5D804C2E".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

// Three weeks; show listings change rarely
fn default_show_expiration_secs() -> u64 {
    3 * 7 * 24 * 60 * 60
}

fn default_languages() -> Vec<String> {
    vec!["nl".to_string(), "en".to_string()]
}
