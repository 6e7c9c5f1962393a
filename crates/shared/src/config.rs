//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Ledger engine policy configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Deployment-time policy knobs for the ledger engine.
///
/// These resolve the two open questions in the engine's contract rather
/// than guessing at a single hardcoded behavior: both the one-account-
/// per-user restriction and the account-number generation retry ceiling
/// are choices an operator makes per deployment, not constants the engine
/// can pick for them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Default ISO-4217 currency applied when a caller creates an account
    /// without specifying one.
    pub default_currency: String,

    /// Whether an account holder may have at most one *open* (non-closed)
    /// account. When `true`, `CreateAccount` rejects a second open account
    /// for the same user with `AccountLimitReached`; closing an account
    /// frees the slot. When `false`, a user may hold any number of
    /// concurrently open accounts.
    ///
    /// Defaults to `true`, matching the `uq_user_one_account` constraint
    /// found in the source seed data.
    pub one_account_per_user: bool,

    /// Maximum number of times account-number generation retries after a
    /// uniqueness violation before giving up with `Internal`.
    pub account_number_max_retries: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            one_account_per_user: true,
            account_number_max_retries: default_account_number_retries(),
        }
    }
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_account_number_retries() -> u32 {
    8
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .set_default("ledger.default_currency", default_currency())?
            .set_default("ledger.one_account_per_user", true)?
            .set_default(
                "ledger.account_number_max_retries",
                i64::from(default_account_number_retries()),
            )?
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("LEDGER").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_config_default_one_account_per_user() {
        let cfg = LedgerConfig::default();
        assert!(cfg.one_account_per_user);
        assert_eq!(cfg.default_currency, "USD");
        assert_eq!(cfg.account_number_max_retries, 8);
    }
}
