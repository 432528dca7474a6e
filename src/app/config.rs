use crate::game::constants::{
  DEFAULT_COLS, DEFAULT_FOOD_PERIOD_MS, DEFAULT_PORT, DEFAULT_ROWS, DEFAULT_TICK_MS,
  MIN_SNAKE_LENGTH,
};
use anyhow::{bail, Context};
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
  pub port: u16,
  pub rows: usize,
  pub cols: usize,
  pub tick_period: Duration,
  pub food_period: Duration,
}

impl ServerConfig {
  pub fn from_env() -> anyhow::Result<Self> {
    Self::from_lookup(|key| env::var(key).ok())
  }

  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
    let port = read_var(&lookup, "PORT", DEFAULT_PORT)?;
    let rows = read_var(&lookup, "BOARD_ROWS", DEFAULT_ROWS)?;
    let cols = read_var(&lookup, "BOARD_COLS", DEFAULT_COLS)?;
    let tick_ms = read_var(&lookup, "TICK_MS", DEFAULT_TICK_MS)?;
    let food_ms = read_var(&lookup, "FOOD_PERIOD_MS", DEFAULT_FOOD_PERIOD_MS)?;

    if rows == 0 {
      bail!("BOARD_ROWS must be at least 1");
    }
    if cols < MIN_SNAKE_LENGTH {
      bail!("BOARD_COLS must be at least {MIN_SNAKE_LENGTH}, got {cols}");
    }
    if tick_ms == 0 || food_ms == 0 {
      bail!("TICK_MS and FOOD_PERIOD_MS must be positive");
    }

    Ok(Self {
      port,
      rows,
      cols,
      tick_period: Duration::from_millis(tick_ms),
      food_period: Duration::from_millis(food_ms),
    })
  }
}

fn read_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
  T: FromStr,
  T::Err: std::error::Error + Send + Sync + 'static,
{
  let Some(raw) = lookup(key).map(|value| value.trim().to_string()) else {
    return Ok(default);
  };
  if raw.is_empty() {
    return Ok(default);
  }
  raw.parse()
    .with_context(|| format!("invalid value for {key}: {raw:?}"))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::collections::HashMap;

  fn config_from(pairs: &[(&str, &str)]) -> anyhow::Result<ServerConfig> {
    let vars: HashMap<String, String> = pairs
      .iter()
      .map(|(key, value)| (key.to_string(), value.to_string()))
      .collect();
    ServerConfig::from_lookup(|key| vars.get(key).cloned())
  }

  #[test]
  fn defaults_apply_when_unset() {
    let config = config_from(&[]).expect("config");
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.rows, DEFAULT_ROWS);
    assert_eq!(config.cols, DEFAULT_COLS);
    assert_eq!(config.tick_period, Duration::from_millis(DEFAULT_TICK_MS));
    assert_eq!(config.food_period, Duration::from_millis(DEFAULT_FOOD_PERIOD_MS));
  }

  #[test]
  fn values_are_read_and_trimmed() {
    let config = config_from(&[
      ("PORT", " 9001 "),
      ("BOARD_ROWS", "12"),
      ("BOARD_COLS", "16"),
      ("TICK_MS", "100"),
      ("FOOD_PERIOD_MS", "2500"),
    ])
    .expect("config");
    assert_eq!(config.port, 9001);
    assert_eq!(config.rows, 12);
    assert_eq!(config.cols, 16);
    assert_eq!(config.tick_period, Duration::from_millis(100));
    assert_eq!(config.food_period, Duration::from_millis(2500));
  }

  #[test]
  fn unparseable_values_are_errors() {
    let error = config_from(&[("PORT", "eighty")]).expect_err("bad port");
    assert!(error.to_string().contains("PORT"));
  }

  #[test]
  fn boards_too_small_for_a_snake_are_rejected() {
    assert!(config_from(&[("BOARD_COLS", "4")]).is_err());
    assert!(config_from(&[("BOARD_ROWS", "0")]).is_err());
    assert!(config_from(&[("TICK_MS", "0")]).is_err());
  }
}
