use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::http::DEFAULT_BASE_URL;
use crate::language::Language;

/// Looked up in the working directory when no config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "meet-kant.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub form: FormConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// `None` leaves the transport default in place.
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormConfig {
    pub default_language: Language,
    pub resubmit: ResubmitPolicy,
}

/// What the form does with a submission while another is in flight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResubmitPolicy {
    /// Send it anyway. The response that completes last wins.
    #[default]
    Race,
    /// Drop it until the in-flight request has finished.
    IgnoreWhileLoading,
}

impl std::str::FromStr for ResubmitPolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "race" => Ok(ResubmitPolicy::Race),
            "ignore_while_loading" => Ok(ResubmitPolicy::IgnoreWhileLoading),
            other => bail!("unknown resubmit policy '{}'", other),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: None,
        }
    }
}

impl AppConfig {
    /// Defaults, then the config file, then `MEET_KANT_*` environment overrides.
    ///
    /// The result is not validated yet. Callers apply their own overrides
    /// first and then call [`AppConfig::validate`].
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        config.apply_env_overrides(lookup)?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Apply overrides from `lookup`, normally the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("MEET_KANT_API_URL") {
            self.api.base_url = url;
        }
        if let Some(secs) = lookup("MEET_KANT_TIMEOUT_SECS") {
            let secs = secs
                .trim()
                .parse()
                .with_context(|| format!("MEET_KANT_TIMEOUT_SECS is not a number: {}", secs))?;
            self.api.request_timeout_secs = Some(secs);
        }
        if let Some(lang) = lookup("MEET_KANT_LANG") {
            self.form.default_language = lang.parse().context("Invalid MEET_KANT_LANG")?;
        }
        if let Some(policy) = lookup("MEET_KANT_RESUBMIT") {
            self.form.resubmit = policy.parse().context("Invalid MEET_KANT_RESUBMIT")?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("API base URL must use http or https: {}", self.api.base_url);
        }
        Ok(())
    }
}
