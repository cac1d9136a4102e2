use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::guards::WordGuessPolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub word_guess_policy: WordGuessPolicy,
    pub room_idle_timeout_minutes: u64,
    pub cleanup_interval_seconds: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let requires_turn: bool = parse_var("WORD_GUESS_REQUIRES_TURN", false)?;
        let room_idle_timeout_minutes = parse_var("ROOM_IDLE_TIMEOUT_MINUTES", 60)?;
        minutes_to_secs("ROOM_IDLE_TIMEOUT_MINUTES", room_idle_timeout_minutes)?;

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT", 8080)?,
            word_guess_policy: if requires_turn {
                WordGuessPolicy::TurnHolderOnly
            } else {
                WordGuessPolicy::AnyPlayer
            },
            room_idle_timeout_minutes,
            cleanup_interval_seconds: parse_var("CLEANUP_INTERVAL_SECONDS", 30)?,
        })
    }

    pub fn room_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.room_idle_timeout_minutes.saturating_mul(60))
    }

    pub fn cleanup_interval(&self) -> Duration {
        // tokio::time::interval panics on a zero period
        Duration::from_secs(self.cleanup_interval_seconds.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            word_guess_policy: WordGuessPolicy::AnyPlayer,
            room_idle_timeout_minutes: 60,
            cleanup_interval_seconds: 30,
        }
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    parse_value(name, env::var(name).ok(), default)
}

fn parse_value<T>(name: &str, value: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid {}: {:?}", name, raw)),
        None => Ok(default),
    }
}

fn minutes_to_secs(name: &str, minutes: u64) -> Result<u64> {
    minutes
        .checked_mul(60)
        .with_context(|| format!("Invalid {}: {} minutes is out of range", name, minutes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_value_uses_default() {
        let port: u16 = parse_value("PORT", None, 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_present_value_is_parsed() {
        let port: u16 = parse_value("PORT", Some("9000".to_string()), 8080).unwrap();
        assert_eq!(port, 9000);

        let requires_turn: bool =
            parse_value("WORD_GUESS_REQUIRES_TURN", Some(" true ".to_string()), false).unwrap();
        assert!(requires_turn);
    }

    #[test]
    fn test_invalid_value_names_the_variable() {
        let err = parse_value::<u16>("PORT", Some("eighty".to_string()), 8080).unwrap_err();
        assert!(err.to_string().contains("PORT"));

        assert!(parse_value::<u64>("ROOM_IDLE_TIMEOUT_MINUTES", Some("-1".to_string()), 60).is_err());
    }

    #[test]
    fn test_idle_timeout_overflow_is_an_error() {
        assert_eq!(minutes_to_secs("ROOM_IDLE_TIMEOUT_MINUTES", 90).unwrap(), 5400);

        let err = minutes_to_secs("ROOM_IDLE_TIMEOUT_MINUTES", u64::MAX).unwrap_err();
        assert!(err.to_string().contains("ROOM_IDLE_TIMEOUT_MINUTES"));

        let config = Config {
            room_idle_timeout_minutes: u64::MAX,
            ..Config::default()
        };
        assert_eq!(config.room_idle_timeout(), Duration::from_secs(u64::MAX));
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.word_guess_policy, WordGuessPolicy::AnyPlayer);
        assert_eq!(config.room_idle_timeout(), Duration::from_secs(3600));
        assert_eq!(config.cleanup_interval(), Duration::from_secs(30));
    }
}
