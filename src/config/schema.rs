use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::engine::ImpactConstants;
use crate::factors::{validate_factors, FactorConfig};
use crate::records::supabase::{DEFAULT_TABLE, DEFAULT_TIMEOUT};

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Default user identifier for new records and history lookups
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub factors: Option<FactorConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<ImpactConstants>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Local,
    Supabase,
}

/// Where records are appended and read back from.
///
/// Example YAML:
/// ```yaml
/// store:
///   backend: supabase
///   url: https://xyz.supabase.co
///   table: carbon_records
///   timeout: 10s
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct StoreConfig {
    #[serde(default)]
    pub backend: Backend,

    /// Local only: record file (default: ~/.local/share/carbon-tally/records.jsonl)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// Supabase only: project URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Supabase only: table name (default: carbon_records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<String>,

    /// Supabase only: request timeout, e.g. "10s" (default: 10s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,
}

impl StoreConfig {
    pub fn table(&self) -> &str {
        self.table.as_deref().unwrap_or(DEFAULT_TABLE)
    }

    /// Parsed timeout; validation rejects unparseable values before this is used
    pub fn timeout(&self) -> Duration {
        self.timeout
            .as_deref()
            .and_then(|t| humantime::parse_duration(t).ok())
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn validate(&self, errors: &mut Vec<String>) {
        match self.backend {
            Backend::Local => {
                for (field, set) in [
                    ("url", self.url.is_some()),
                    ("table", self.table.is_some()),
                    ("timeout", self.timeout.is_some()),
                ] {
                    if set {
                        errors.push(format!("store.{}: only used by the supabase backend", field));
                    }
                }
            }
            Backend::Supabase => {
                match self.url.as_deref().map(str::trim) {
                    None | Some("") => {
                        errors.push("store.url: required for the supabase backend".to_string())
                    }
                    Some(url) if !url.starts_with("https://") && !url.starts_with("http://") => {
                        errors.push(format!("store.url: '{}' must start with https://", url))
                    }
                    Some(_) => {}
                }
                if let Some(table) = &self.table {
                    if table.trim().is_empty() {
                        errors.push("store.table: must not be empty".to_string());
                    }
                }
                if let Some(timeout) = &self.timeout {
                    match humantime::parse_duration(timeout) {
                        Ok(d) if d.is_zero() => {
                            errors.push("store.timeout: must be greater than zero".to_string())
                        }
                        Ok(_) => {}
                        Err(e) => errors.push(format!(
                            "store.timeout: invalid duration '{}' - {}",
                            timeout, e
                        )),
                    }
                }
                if self.path.is_some() {
                    errors.push("store.path: only used by the local backend".to_string());
                }
            }
        }
    }
}

impl Config {
    pub fn impact_constants(&self) -> ImpactConstants {
        self.impact.unwrap_or_default()
    }

    /// Validate the whole config at startup.
    /// Returns all validation errors at once (not just the first).
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if let Some(user) = &self.user {
            if user.trim().is_empty() {
                errors.push("user: must not be empty".to_string());
            }
        }

        self.store.validate(&mut errors);

        if let Some(factors) = &self.factors {
            if let Err(e) = validate_factors(factors) {
                errors.extend(e);
            }
        }

        if let Some(impact) = &self.impact {
            if let Err(e) = impact.validate() {
                errors.extend(e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.store.backend, Backend::Local);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
user: alice
store:
  backend: supabase
  url: https://xyz.supabase.co
  table: my_records
  timeout: 5s
factors:
  grid_factor: 0.5
impact:
  population_scale: 1
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.user.as_deref(), Some("alice"));
        assert_eq!(config.store.backend, Backend::Supabase);
        assert_eq!(config.store.table(), "my_records");
        assert_eq!(config.store.timeout(), Duration::from_secs(5));
        assert_eq!(config.factors.as_ref().unwrap().grid_factor, Some(0.5));
        assert_eq!(config.impact_constants().population_scale, 1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_store_defaults() {
        let store = StoreConfig::default();
        assert_eq!(store.table(), DEFAULT_TABLE);
        assert_eq!(store.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_supabase_requires_url() {
        let config = Config {
            store: StoreConfig {
                backend: Backend::Supabase,
                ..StoreConfig::default()
            },
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("store.url"));
    }

    #[test]
    fn test_local_rejects_remote_fields() {
        let yaml = r#"
store:
  url: https://xyz.supabase.co
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = config.validate().unwrap_err();
        assert!(errors[0].contains("only used by the supabase backend"));
    }

    #[test]
    fn test_bad_timeout() {
        let config = Config {
            store: StoreConfig {
                backend: Backend::Supabase,
                url: Some("https://xyz.supabase.co".to_string()),
                timeout: Some("soon".to_string()),
                ..StoreConfig::default()
            },
            ..Config::default()
        };
        let errors = config.validate().unwrap_err();
        assert!(errors[0].contains("store.timeout"));
    }

    #[test]
    fn test_collects_errors_across_sections() {
        let yaml = r#"
user: "  "
factors:
  gas_factor: -2
impact:
  kg_absorbed_per_tree: 0
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        assert!(serde_saphyr::from_str::<Config>("queries: []\n").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = Config {
            user: Some("alice".to_string()),
            store: StoreConfig {
                backend: Backend::Supabase,
                url: Some("https://xyz.supabase.co".to_string()),
                ..StoreConfig::default()
            },
            ..Config::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
