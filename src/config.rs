use crate::constants::{
    DEFAULT_CONFIG_FILE, DEFAULT_KEYS_FILE, DEFAULT_MIN_GAS_BALANCE_WEI, DEFAULT_PROXIES_FILE,
};
use crate::retry::RetryConfig;
use alloy::primitives::U256;
use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// One year.
const MAX_INTERVAL_HOURS: u64 = 24 * 365;

/// Runtime knobs. Contract addresses and call parameters are constants and
/// deliberately absent here.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct BotConfig {
    pub files: FileSettings,
    pub retry: RetrySettings,
    pub timing: TimingSettings,
    pub monitoring: MonitoringSettings,
    pub schedule: ScheduleSettings,
    pub thresholds: Thresholds,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct FileSettings {
    pub private_keys: String,
    pub proxies: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct RetrySettings {
    pub max_attempts: u32,
    pub delay_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimingSettings {
    pub claim_to_vote_delay_seconds: u64,
    pub inter_account_delay_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct MonitoringSettings {
    pub transaction_timeout_seconds: u64,
    pub poll_interval_seconds: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ScheduleSettings {
    pub interval_hours: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Thresholds {
    pub min_gas_balance_wei: String,
}

impl Default for FileSettings {
    fn default() -> Self {
        Self {
            private_keys: DEFAULT_KEYS_FILE.to_string(),
            proxies: DEFAULT_PROXIES_FILE.to_string(),
        }
    }
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay_seconds: 5,
        }
    }
}

impl Default for TimingSettings {
    fn default() -> Self {
        Self {
            claim_to_vote_delay_seconds: 10,
            inter_account_delay_seconds: 30,
        }
    }
}

impl Default for MonitoringSettings {
    fn default() -> Self {
        Self {
            transaction_timeout_seconds: 300,
            poll_interval_seconds: 3,
        }
    }
}

impl Default for ScheduleSettings {
    fn default() -> Self {
        Self { interval_hours: 24 }
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_gas_balance_wei: DEFAULT_MIN_GAS_BALANCE_WEI.to_string(),
        }
    }
}

impl BotConfig {
    pub fn load(path: &str) -> Result<Self> {
        dotenv::dotenv().ok();

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path))?;
        Self::from_toml(&content)
    }

    /// Loads `path` if given, else the default config file if present, else defaults.
    pub fn load_or_default(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::load(DEFAULT_CONFIG_FILE),
            None => {
                dotenv::dotenv().ok();
                Ok(Self::default())
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let content = Self::substitute_env_vars(content)?;
        let config: BotConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.schedule.interval_hours == 0 {
            return Err(anyhow::anyhow!("schedule.interval_hours must be at least 1"));
        }
        if self.schedule.interval_hours > MAX_INTERVAL_HOURS {
            return Err(anyhow::anyhow!(
                "schedule.interval_hours must be at most {}",
                MAX_INTERVAL_HOURS
            ));
        }
        if self.monitoring.poll_interval_seconds == 0 {
            return Err(anyhow::anyhow!("monitoring.poll_interval_seconds must be at least 1"));
        }
        self.min_gas_balance()?;
        Ok(())
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")?;
        let mut result = content.to_string();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let value = env::var(var_name).map_err(|_| {
                anyhow::anyhow!("Environment variable {} referenced in config is not set", var_name)
            })?;
            result = result.replace(&cap[0], &value);
        }

        Ok(result)
    }

    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::new(
            self.retry.max_attempts,
            Duration::from_secs(self.retry.delay_seconds),
        )
    }

    pub fn min_gas_balance(&self) -> Result<U256> {
        U256::from_str(&self.thresholds.min_gas_balance_wei).map_err(|e| {
            anyhow::anyhow!(
                "Invalid thresholds.min_gas_balance_wei {}: {}",
                self.thresholds.min_gas_balance_wei,
                e
            )
        })
    }

    pub fn schedule_interval(&self) -> Duration {
        Duration::from_secs(self.schedule.interval_hours.saturating_mul(60 * 60))
    }
}
