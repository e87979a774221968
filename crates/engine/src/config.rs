//! Runtime configuration read from the environment.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `ICEBREAK_SEED` | 1 | seed for layout and spawns |
//! | `ICEBREAK_LEVEL` | 1 | first level to play |
//! | `ICEBREAK_MAX_TURNS` | 10000 | turn cap for headless play |
//! | `ICEBREAK_ANIM_MS` | 0 | simulated blocking animation time per intent |
//! | `ICEBREAK_LOG` | info | `tracing` filter directive |

use std::collections::HashMap;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub seed: u32,
    pub start_level: u32,
    pub max_turns: u32,
    pub animation: Duration,
    pub log_filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            start_level: 1,
            max_turns: 10_000,
            animation: Duration::ZERO,
            log_filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        let vars: HashMap<String, String> = std::env::vars()
            .filter(|(k, _)| k.starts_with("ICEBREAK_"))
            .collect();
        Self::from_vars(&vars)
    }

    /// Same as [`EngineConfig::from_env`] over an explicit variable map
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let defaults = Self::default();

        let seed = parse_var(vars, "ICEBREAK_SEED")?.unwrap_or(defaults.seed);
        let start_level = parse_var(vars, "ICEBREAK_LEVEL")?.unwrap_or(defaults.start_level);
        if start_level == 0 {
            return Err(anyhow!("ICEBREAK_LEVEL is 1-based, got 0"));
        }
        let max_turns = parse_var(vars, "ICEBREAK_MAX_TURNS")?.unwrap_or(defaults.max_turns);
        let animation = parse_var::<u64>(vars, "ICEBREAK_ANIM_MS")?
            .map(Duration::from_millis)
            .unwrap_or(defaults.animation);
        let log_filter = vars
            .get("ICEBREAK_LOG")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            seed,
            start_level,
            max_turns,
            animation,
            log_filter,
        })
    }
}

fn parse_var<T>(vars: &HashMap<String, String>, key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let Some(raw) = vars.get(key) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse::<T>()
        .map(Some)
        .with_context(|| format!("invalid {} value: {:?}", key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_without_vars() {
        assert_eq!(EngineConfig::from_vars(&vars(&[])).unwrap(), EngineConfig::default());
    }

    #[test]
    fn test_reads_every_var() {
        let config = EngineConfig::from_vars(&vars(&[
            ("ICEBREAK_SEED", "42"),
            ("ICEBREAK_LEVEL", "3"),
            ("ICEBREAK_MAX_TURNS", " 50 "),
            ("ICEBREAK_ANIM_MS", "15"),
            ("ICEBREAK_LOG", "icebreak=debug"),
        ]))
        .unwrap();
        assert_eq!(config.seed, 42);
        assert_eq!(config.start_level, 3);
        assert_eq!(config.max_turns, 50);
        assert_eq!(config.animation, Duration::from_millis(15));
        assert_eq!(config.log_filter, "icebreak=debug");
    }

    #[test]
    fn test_blank_values_fall_back() {
        let config = EngineConfig::from_vars(&vars(&[("ICEBREAK_SEED", ""), ("ICEBREAK_LOG", "  ")])).unwrap();
        assert_eq!(config.seed, 1);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn test_bad_values_are_errors() {
        let err = EngineConfig::from_vars(&vars(&[("ICEBREAK_SEED", "abc")])).unwrap_err();
        assert!(err.to_string().contains("ICEBREAK_SEED"));
        assert!(EngineConfig::from_vars(&vars(&[("ICEBREAK_LEVEL", "0")])).is_err());
    }
}
