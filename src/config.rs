use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

/// Environment variable naming an explicit config file
pub const CONFIG_PATH_ENV: &str = "LEDGER_E2E_CONFIG";

/// Prefix for environment overrides, e.g. `LEDGER_E2E_NODE__URL`
pub const ENV_PREFIX: &str = "LEDGER_E2E";

/// Application configuration loaded from ledger-e2e.toml or environment variables
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub node: NodeConfig,
    pub polling: PollingConfig,
    pub accounts: AccountsConfig,
    pub fees: FeeConfig,
    pub amounts: AmountConfig,
}

/// Node endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    pub url: String,
    pub chain_id: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub request_timeout_seconds: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:6869".to_string(),
            chain_id: "T".to_string(),
            api_key: None,
            request_timeout_seconds: 30,
        }
    }
}

impl NodeConfig {
    /// Chain id as the single byte embedded in addresses and transactions
    pub fn chain_id_byte(&self) -> Result<u8, ConfigError> {
        match self.chain_id.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ConfigError::Message(format!(
                "node.chain_id must be a single ASCII character, got '{}'",
                self.chain_id
            ))),
        }
    }

    /// API key to send, ignoring empty values
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.is_empty())
    }
}

/// Confirmation polling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollingConfig {
    pub interval_ms: u64,
    pub timeout_seconds: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            timeout_seconds: 180,
        }
    }
}

impl PollingConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Test account derivation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Seed (or label) of the account that funds the others
    pub root_seed: String,
    pub min_seed_length: usize,
    pub seed_filler: char,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            root_seed: "root".to_string(),
            min_seed_length: 15,
            seed_filler: 'a',
        }
    }
}

/// Fee per transaction kind, in minor units
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeConfig {
    pub transfer: u64,
    pub anchor: u64,
    pub lease: u64,
    pub cancel_lease: u64,
    pub sponsorship: u64,
    pub cancel_sponsorship: u64,
    pub association: u64,
    pub revoke_association: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            transfer: 100_000_000,
            anchor: 35_000_000,
            lease: 100_000_000,
            cancel_lease: 100_000_000,
            sponsorship: 500_000_000,
            cancel_sponsorship: 500_000_000,
            association: 100_000_000,
            revoke_association: 100_000_000,
        }
    }
}

/// Amount conventions used by scenario steps
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountConfig {
    pub default_lease: u64,
    pub minor_units_per_unit: u64,
}

impl Default for AmountConfig {
    fn default() -> Self {
        Self {
            default_lease: 100_000_000,
            minor_units_per_unit: 100_000_000,
        }
    }
}

impl AppConfig {
    /// Load configuration from ledger-e2e.toml (or `LEDGER_E2E_CONFIG`) and environment variables
    /// Environment variables take precedence over file configuration
    pub fn load() -> Result<Self, ConfigError> {
        match env::var(CONFIG_PATH_ENV) {
            Ok(path) if !path.is_empty() => Self::load_from(Some(Path::new(&path))),
            _ => Self::load_from(None),
        }
    }

    /// Load configuration, reading `path` when given (required) or the optional default file
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let d = AppConfig::default();
        let mut builder = Config::builder()
            .set_default("node.url", d.node.url)?
            .set_default("node.chain_id", d.node.chain_id)?
            .set_default(
                "node.request_timeout_seconds",
                d.node.request_timeout_seconds,
            )?
            .set_default("polling.interval_ms", d.polling.interval_ms)?
            .set_default("polling.timeout_seconds", d.polling.timeout_seconds)?
            .set_default("accounts.root_seed", d.accounts.root_seed)?
            .set_default("accounts.min_seed_length", d.accounts.min_seed_length as u64)?
            .set_default("accounts.seed_filler", d.accounts.seed_filler.to_string())?
            .set_default("fees.transfer", d.fees.transfer)?
            .set_default("fees.anchor", d.fees.anchor)?
            .set_default("fees.lease", d.fees.lease)?
            .set_default("fees.cancel_lease", d.fees.cancel_lease)?
            .set_default("fees.sponsorship", d.fees.sponsorship)?
            .set_default("fees.cancel_sponsorship", d.fees.cancel_sponsorship)?
            .set_default("fees.association", d.fees.association)?
            .set_default("fees.revoke_association", d.fees.revoke_association)?
            .set_default("amounts.default_lease", d.amounts.default_lease)?
            .set_default(
                "amounts.minor_units_per_unit",
                d.amounts.minor_units_per_unit,
            )?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("ledger-e2e").required(false)),
        };

        let config = builder
            // LEDGER_E2E_NODE__URL overrides node.url, and so on
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let app_config: AppConfig = config.try_deserialize()?;
        app_config.validate()?;
        Ok(app_config)
    }

    /// Reject settings the rest of the crate cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.node.chain_id_byte()?;

        if self.accounts.min_seed_length == 0 {
            return Err(ConfigError::Message(
                "accounts.min_seed_length must be greater than zero".to_string(),
            ));
        }
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Message(
                "polling.interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.polling.interval() > self.polling.timeout() {
            return Err(ConfigError::Message(
                "polling.interval_ms must not exceed polling.timeout_seconds".to_string(),
            ));
        }
        if self.amounts.minor_units_per_unit == 0 {
            return Err(ConfigError::Message(
                "amounts.minor_units_per_unit must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}
