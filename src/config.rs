//! Engine configuration.
//!
//! Loaded from JSON; every field has a default so partial files are fine.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::domain::models::TargetType;
use crate::error::{AuditError, Result};

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CACHE_BUST_PARAM: &str = "_audit_ts";
pub const DEFAULT_FALLBACK_KEYWORD: &str = "products";
pub const DEFAULT_USER_AGENT: &str = concat!("content-audit/", env!("CARGO_PKG_VERSION"));

/// A site-wide page that is always audited, with a hand-assigned keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StaticTarget {
    pub path: String,
    #[serde(default, rename = "type")]
    pub target_type: TargetType,
    #[serde(default)]
    pub focus_keyword: String,
}

impl StaticTarget {
    pub fn new(path: impl Into<String>, target_type: TargetType, focus_keyword: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            target_type,
            focus_keyword: focus_keyword.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct AuditConfig {
    /// Base URL static paths and collection templates are resolved against.
    pub site_url: String,
    /// Own domain for internal/external link classification.
    /// Derived from `site_url` when unset.
    pub site_domain: Option<String>,
    pub fallback_keyword: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub cache_bust_param: String,
    /// `None` launches every unit at once.
    pub max_concurrency: Option<usize>,
    pub static_targets: Vec<StaticTarget>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            site_url: "http://localhost/".to_string(),
            site_domain: None,
            fallback_keyword: DEFAULT_FALLBACK_KEYWORD.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            cache_bust_param: DEFAULT_CACHE_BUST_PARAM.to_string(),
            max_concurrency: None,
            static_targets: Vec::new(),
        }
    }
}

impl AuditConfig {
    pub fn for_site(site_url: impl Into<String>) -> Self {
        Self {
            site_url: site_url.into(),
            ..Default::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| AuditError::config(format!("invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        tracing::debug!("[CONFIG] Loaded {} bytes from {}", raw.len(), path.display());
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.request_timeout_secs == 0 {
            return Err(AuditError::config("request_timeout_secs must be positive"));
        }
        if self.max_concurrency == Some(0) {
            return Err(AuditError::config("max_concurrency must be positive when set"));
        }
        if self.cache_bust_param.trim().is_empty() {
            return Err(AuditError::config("cache_bust_param must not be empty"));
        }
        Ok(())
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.site_url)
            .map_err(|e| AuditError::config(format!("site_url '{}': {}", self.site_url, e)))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Domain used to tell internal links from external ones.
    pub fn site_domain(&self) -> String {
        if let Some(domain) = self.site_domain.as_deref().filter(|d| !d.trim().is_empty()) {
            return domain.trim().to_ascii_lowercase();
        }
        Url::parse(&self.site_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_ascii_lowercase()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_json_fills_defaults() {
        let config = AuditConfig::from_json_str(
            r#"{
                "site_url": "https://www.terracotta.example/",
                "static_targets": [
                    { "path": "/", "focus_keyword": "terracotta tiles" },
                    { "path": "/products", "type": "category", "focus_keyword": "facade tiles" }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.request_timeout_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
        assert_eq!(config.cache_bust_param, DEFAULT_CACHE_BUST_PARAM);
        assert_eq!(config.static_targets.len(), 2);
        assert_eq!(config.static_targets[0].target_type, TargetType::Page);
        assert_eq!(config.static_targets[1].target_type, TargetType::Category);
        assert_eq!(config.site_domain(), "terracotta.example");
    }

    #[test]
    fn explicit_site_domain_wins() {
        let config = AuditConfig {
            site_domain: Some("Shop.Example".to_string()),
            ..AuditConfig::for_site("https://cdn.example/")
        };
        assert_eq!(config.site_domain(), "shop.example");
    }

    #[test]
    fn validation_rejects_bad_values() {
        let bad_url = AuditConfig::for_site("not a url");
        assert!(matches!(bad_url.validate(), Err(AuditError::Config(_))));

        let zero_timeout = AuditConfig {
            request_timeout_secs: 0,
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());

        let zero_concurrency = AuditConfig {
            max_concurrency: Some(0),
            ..Default::default()
        };
        assert!(zero_concurrency.validate().is_err());

        let blank_param = AuditConfig {
            cache_bust_param: " ".to_string(),
            ..Default::default()
        };
        assert!(blank_param.validate().is_err());

        assert!(AuditConfig::default().validate().is_ok());
    }

    #[test]
    fn malformed_json_is_config_error() {
        let err = AuditConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, AuditError::Config(_)));
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "site_url": "https://terracotta.example/", "max_concurrency": 4 }}"#
        )
        .unwrap();

        let config = AuditConfig::load(file.path()).unwrap();
        assert_eq!(config.max_concurrency, Some(4));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AuditConfig::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, AuditError::Io(_)));
    }
}
