//! Configuration settings for Poolslip.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// API configuration.
    pub api: ApiConfig,
    /// Slip pricing configuration.
    pub slip: SlipConfig,
    /// Deposit lifecycle configuration.
    pub deposit: DepositConfig,
}

impl Config {
    /// Load configuration from file, returning default if file doesn't exist or fails.
    pub fn load_or_default() -> crate::Result<Self> {
        Self::load(None)
    }

    /// Load configuration from file.
    pub fn load(path: Option<PathBuf>) -> crate::Result<Self> {
        let config_path = path.unwrap_or_else(|| {
            super::config_dir()
                .map(|p| p.join("config.toml"))
                .unwrap_or_else(|_| PathBuf::from("config.toml"))
        });

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str(&content).map_err(|e| crate::Error::config(e.to_string()))
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self, path: Option<PathBuf>) -> crate::Result<()> {
        let config_path = path.unwrap_or_else(|| {
            super::config_dir()
                .map(|p| p.join("config.toml"))
                .unwrap_or_else(|_| PathBuf::from("config.toml"))
        });

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content =
            toml::to_string_pretty(self).map_err(|e| crate::Error::config(e.to_string()))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

/// API configuration.
///
/// Injected into [`crate::api::HttpApiClient`]; network settings are never
/// process-wide globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the game and deposit services.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Session token attached to authenticated requests, if any.
    pub session_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.poolslip.io".to_string(),
            timeout_secs: 30,
            session_token: None,
        }
    }
}

/// Slip pricing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SlipConfig {
    /// Cost of a single-combination slip.
    pub base_cost: Decimal,
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self {
            base_cost: Decimal::ONE,
        }
    }
}

/// Deposit lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositConfig {
    /// Payment window in seconds before a pending deposit expires.
    pub window_secs: u64,
    /// Interval between status polls in seconds.
    pub poll_interval_secs: u64,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            window_secs: 15 * 60,
            poll_interval_secs: 10,
        }
    }
}

impl DepositConfig {
    /// The payment window as a duration.
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// The poll interval as a duration.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.deposit.window_secs, 900);
        assert_eq!(config.deposit.poll_interval_secs, 10);
        assert_eq!(config.slip.base_cost, Decimal::ONE);
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [slip]
            base_cost = "0.25"

            [deposit]
            window_secs = 600
            "#,
        )
        .unwrap();
        assert_eq!(config.slip.base_cost, dec!(0.25));
        assert_eq!(config.deposit.window_secs, 600);
        assert_eq!(config.deposit.poll_interval_secs, 10);
    }

    #[test]
    fn test_round_trip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.api.base_url, config.api.base_url);
        assert_eq!(parsed.deposit.window_secs, config.deposit.window_secs);
    }
}
