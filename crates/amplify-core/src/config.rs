use crate::catalog::ImportPolicy;
use crate::recommend::DEFAULT_TOP_N;
use thiserror::Error;

pub const TOP_N_ENV: &str = "AMPLIFY_TOP_N";
pub const IMPORT_POLICY_ENV: &str = "AMPLIFY_IMPORT_POLICY";
pub const SEED_DEMO_ENV: &str = "AMPLIFY_SEED_DEMO";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {var}: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Recommendation limit when a request does not name one.
    pub default_top_n: usize,
    pub import_policy: ImportPolicy,
    /// Load the demo catalog at startup.
    pub seed_demo: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_top_n: DEFAULT_TOP_N,
            import_policy: ImportPolicy::default(),
            seed_demo: false,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Builds a config from any variable source; unset variables keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup(TOP_N_ENV) {
            config.default_top_n = value.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Invalid {
                    var: TOP_N_ENV,
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        if let Some(value) = lookup(IMPORT_POLICY_ENV) {
            config.import_policy = value
                .parse()
                .map_err(|reason| ConfigError::Invalid {
                    var: IMPORT_POLICY_ENV,
                    value: value.clone(),
                    reason,
                })?;
        }

        if let Some(value) = lookup(SEED_DEMO_ENV) {
            config.seed_demo = match value.trim().to_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" | "" => false,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: SEED_DEMO_ENV,
                        value,
                        reason: "expected a boolean".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }
}
