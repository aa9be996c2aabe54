//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Placeholder values written into backend fields that the UI model does
/// not carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendDefaults {
    /// `allergies[].allergen_type`.
    pub allergen_type: String,
    /// `allergies[].diagnosed_by`.
    pub diagnosed_by: String,
    /// `medications[].route_of_admin`.
    pub route_of_admin: String,
    /// `medications[].duration`, in days.
    pub duration_days: u32,
    /// `medications[].pharmacy`.
    pub pharmacy: String,
    /// Prefix for generated `medications[].prescription_num` values.
    pub prescription_prefix: String,
    /// When false, `prescription_num` is sent empty instead of a random number.
    pub randomize_prescription_numbers: bool,
}

impl Default for BackendDefaults {
    fn default() -> Self {
        Self {
            allergen_type: "Medication".to_string(),
            diagnosed_by: "Self-reported".to_string(),
            route_of_admin: "Oral".to_string(),
            duration_days: 365,
            pharmacy: "Not specified".to_string(),
            prescription_prefix: "RX".to_string(),
            randomize_prescription_numbers: true,
        }
    }
}

/// Client configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL, e.g. `https://api.example.com`.
    pub api_host: String,
    /// Background refresh interval.
    pub refresh_interval: Duration,
    /// Per-request timeout. `None` keeps the HTTP client default.
    pub request_timeout: Option<Duration>,
    /// JSON file backing the credential store.
    pub credentials_path: Option<PathBuf>,
    /// JSON file mirroring the last fetched profile.
    pub cache_path: Option<PathBuf>,
    /// Bearer token that overrides the credential store when set.
    pub token: Option<SecretString>,
    /// Placeholder values for UI-absent backend fields.
    pub defaults: BackendDefaults,
}

impl ClientConfig {
    pub fn new(api_host: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            refresh_interval: Duration::from_secs(30),
            request_timeout: None,
            credentials_path: None,
            cache_path: None,
            token: None,
            defaults: BackendDefaults::default(),
        }
    }

    /// Build config from environment variables.
    ///
    /// `HEALTHHUB_API_HOST` is required; everything else has a default.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_host = lookup("HEALTHHUB_API_HOST")
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("HEALTHHUB_API_HOST".into()))?;

        let mut config = Self::new(api_host);

        if let Some(secs) = parse_var::<u64>(&lookup, "HEALTHHUB_REFRESH_SECS")? {
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "HEALTHHUB_REFRESH_SECS".into(),
                    message: "must be greater than zero".into(),
                });
            }
            config.refresh_interval = Duration::from_secs(secs);
        }

        config.request_timeout =
            parse_var::<u64>(&lookup, "HEALTHHUB_REQUEST_TIMEOUT_SECS")?.map(Duration::from_secs);
        config.credentials_path = lookup("HEALTHHUB_CREDENTIALS_PATH").map(PathBuf::from);
        config.cache_path = lookup("HEALTHHUB_CACHE_PATH").map(PathBuf::from);
        config.token = lookup("HEALTHHUB_TOKEN")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .map(SecretString::from);

        if let Some(randomize) = parse_var::<bool>(&lookup, "HEALTHHUB_RANDOM_RX")? {
            config.defaults.randomize_prescription_numbers = randomize;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }),
    }
}
