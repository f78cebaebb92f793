use std::env;
use tabshare_application::BatchPolicy;
use tabshare_domain::{RoundingContext, RoundingContextError, RoundingMode};
use thiserror::Error;

const SCALE_VAR: &str = "TABSHARE_SCALE";
const ROUNDING_VAR: &str = "TABSHARE_ROUNDING";
const BATCH_POLICY_VAR: &str = "TABSHARE_BATCH_POLICY";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} has invalid value '{value}' (expected {expected})")]
    InvalidValue {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error(transparent)]
    RoundingContext(#[from] RoundingContextError),
}

/// Runtime settings read from the environment (and an optional `.env`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppConfig {
    pub context: RoundingContext,
    pub policy: BatchPolicy,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = RoundingContext::cents_default();

        let scale = match lookup(SCALE_VAR) {
            Some(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| invalid(SCALE_VAR, value, "a non-negative integer"))?,
            None => defaults.scale,
        };
        let rounding_mode = match lookup(ROUNDING_VAR) {
            Some(value) => parse_rounding_mode(value)?,
            None => defaults.rounding_mode,
        };
        let policy = match lookup(BATCH_POLICY_VAR) {
            Some(value) => parse_batch_policy(value)?,
            None => BatchPolicy::default(),
        };

        let context = RoundingContext {
            scale,
            rounding_mode,
        }
        .validate()?;
        tracing::debug!(
            scale = context.scale,
            rounding_mode = ?context.rounding_mode,
            policy = ?policy,
            "Configuration loaded"
        );

        Ok(Self { context, policy })
    }
}

fn parse_rounding_mode(value: String) -> Result<RoundingMode, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "half-up" => Ok(RoundingMode::HalfUp),
        "half-even" => Ok(RoundingMode::HalfEven),
        _ => Err(invalid(ROUNDING_VAR, value, "half-up or half-even")),
    }
}

fn parse_batch_policy(value: String) -> Result<BatchPolicy, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "fail-fast" => Ok(BatchPolicy::FailFast),
        "collect" => Ok(BatchPolicy::CollectAndReport),
        _ => Err(invalid(BATCH_POLICY_VAR, value, "fail-fast or collect")),
    }
}

fn invalid(name: &'static str, value: String, expected: &'static str) -> ConfigError {
    ConfigError::InvalidValue {
        name,
        value,
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_cents_and_collect() {
        assert_eq!(
            config_from(&[]),
            Ok(AppConfig {
                context: RoundingContext::cents_default(),
                policy: BatchPolicy::CollectAndReport,
            })
        );
    }

    #[test]
    fn reads_every_variable() {
        let config = config_from(&[
            ("TABSHARE_SCALE", "0"),
            ("TABSHARE_ROUNDING", "Half-Even"),
            ("TABSHARE_BATCH_POLICY", " fail-fast "),
        ])
        .expect("valid configuration");

        assert_eq!(config.context.scale, 0);
        assert_eq!(config.context.rounding_mode, RoundingMode::HalfEven);
        assert_eq!(config.policy, BatchPolicy::FailFast);
    }

    #[rstest]
    #[case::scale_not_a_number("TABSHARE_SCALE", "two")]
    #[case::negative_scale("TABSHARE_SCALE", "-1")]
    #[case::unknown_rounding("TABSHARE_ROUNDING", "down")]
    #[case::unknown_policy("TABSHARE_BATCH_POLICY", "ignore")]
    fn rejects_invalid_values(#[case] name: &str, #[case] value: &str) {
        assert!(matches!(
            config_from(&[(name, value)]),
            Err(ConfigError::InvalidValue { name: reported, .. }) if reported == name
        ));
    }

    #[test]
    fn rejects_unsupported_scale() {
        assert!(matches!(
            config_from(&[("TABSHARE_SCALE", "30")]),
            Err(ConfigError::RoundingContext(
                RoundingContextError::UnsupportedScale { scale: 30, .. }
            ))
        ));
    }
}
