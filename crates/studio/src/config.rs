use std::path::PathBuf;
use std::time::Duration;

use p2f_veo::api::{DEFAULT_API_URL, DEFAULT_MODEL};
use p2f_veo::credentials::CREDENTIAL_ENV_VAR;

/// Default directory for the library and the selected key.
pub const DEFAULT_DATA_DIR: &str = ".prompt2film";

/// File (inside the data dir) holding a key selected through `p2f key`.
pub const KEY_FILE_NAME: &str = "api_key";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;

/// Studio configuration loaded from environment variables.
///
/// Only `API_KEY` carries meaning beyond local defaults.
#[derive(Debug, Clone)]
pub struct StudioConfig {
    /// Static credential; `None` if unset or blank.
    pub api_key: Option<String>,
    pub api_url: String,
    pub model: String,
    pub poll_interval: Duration,
    pub data_dir: PathBuf,
    /// Re-verify the credential after the selection dialog closes.
    pub recheck_credential: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} has invalid value '{value}': expected {expected}")]
    Invalid {
        var: &'static str,
        value: String,
        expected: &'static str,
    },
}

impl StudioConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                   | Default                                            |
    /// |---------------------------|----------------------------------------------------|
    /// | `API_KEY`                 | unset                                              |
    /// | `VEO_API_URL`             | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `VEO_MODEL`               | `veo-3.1-fast-generate-preview`                    |
    /// | `POLL_INTERVAL_SECS`      | `10` (must be positive)                            |
    /// | `P2F_DATA_DIR`            | `.prompt2film`                                     |
    /// | `P2F_RECHECK_CREDENTIAL`  | `false`                                            |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(CREDENTIAL_ENV_VAR).filter(|k| !k.trim().is_empty());

        let api_url = lookup("VEO_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into());
        let model = lookup("VEO_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());

        let poll_interval_secs = match lookup("POLL_INTERVAL_SECS") {
            Some(value) => {
                let secs = value.trim().parse::<u64>().ok().filter(|secs| *secs > 0);
                secs.ok_or(ConfigError::Invalid {
                    var: "POLL_INTERVAL_SECS",
                    value,
                    expected: "a positive whole number of seconds",
                })?
            }
            None => DEFAULT_POLL_INTERVAL_SECS,
        };

        let data_dir = lookup("P2F_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let recheck_credential = match lookup("P2F_RECHECK_CREDENTIAL") {
            Some(value) => parse_bool(&value).ok_or(ConfigError::Invalid {
                var: "P2F_RECHECK_CREDENTIAL",
                value,
                expected: "true or false",
            })?,
            None => false,
        };

        Ok(Self {
            api_key,
            api_url,
            model,
            poll_interval: Duration::from_secs(poll_interval_secs),
            data_dir,
            recheck_credential,
        })
    }

    pub fn key_file(&self) -> PathBuf {
        self.data_dir.join(KEY_FILE_NAME)
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn load(vars: &[(&str, &str)]) -> Result<StudioConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        StudioConfig::from_lookup(|var| map.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = load(&[]).unwrap();
        assert!(config.api_key.is_none());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.poll_interval, Duration::from_secs(10));
        assert_eq!(config.key_file(), PathBuf::from(".prompt2film/api_key"));
        assert!(!config.recheck_credential);
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("API_KEY", "abc"),
            ("POLL_INTERVAL_SECS", "2"),
            ("P2F_DATA_DIR", "/tmp/p2f"),
            ("P2F_RECHECK_CREDENTIAL", "yes"),
        ])
        .unwrap();
        assert_eq!(config.api_key.as_deref(), Some("abc"));
        assert_eq!(config.poll_interval, Duration::from_secs(2));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/p2f"));
        assert!(config.recheck_credential);
    }

    #[test]
    fn blank_api_key_is_unset() {
        assert!(load(&[("API_KEY", "  ")]).unwrap().api_key.is_none());
    }

    #[test]
    fn invalid_interval_is_an_error() {
        let err = load(&[("POLL_INTERVAL_SECS", "soon")]).unwrap_err();
        assert!(err.to_string().starts_with("POLL_INTERVAL_SECS has invalid value 'soon'"));
    }

    #[test]
    fn zero_interval_is_rejected() {
        let err = load(&[("POLL_INTERVAL_SECS", "0")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                var: "POLL_INTERVAL_SECS",
                ..
            }
        ));
    }
}
