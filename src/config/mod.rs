//! Configuration Module - TOML-based Recorder Configuration
//!
//! Loads and validates configuration from `config.toml`. Non-secret
//! values (endpoints, contract address, fee parameters) live in the
//! file; the database password and signing key come only from the
//! environment and are never logged.

pub mod loader;

use std::fmt;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::domain::units::ETHER_DECIMALS;

/// Environment variable holding the database password.
pub const DB_PASSWORD_ENV: &str = "HYBRID_DB_PASSWORD";

/// Environment variable holding the hex-encoded signing key.
pub const PRIVATE_KEY_ENV: &str = "HYBRID_PRIVATE_KEY";

/// Top-level recorder configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
  /// Process identity and logging.
  #[serde(default)]
  pub app: AppSection,
  /// Relational store connection.
  pub database: DatabaseConfig,
  /// Blockchain ledger endpoint and transaction parameters.
  pub ledger: LedgerConfig,
}

/// Process identity configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppSection {
  /// Human-readable process name.
  #[serde(default = "default_name")]
  pub name: String,
  /// Log level (trace, debug, info, warn, error).
  #[serde(default = "default_log_level")]
  pub log_level: String,
}

impl Default for AppSection {
  fn default() -> Self {
    Self {
      name: default_name(),
      log_level: default_log_level(),
    }
  }
}

/// MySQL connection configuration. The password is supplied via [`Secrets`].
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
  pub host: String,
  #[serde(default = "default_db_port")]
  pub port: u16,
  pub user: String,
  /// Schema name (e.g. `energy_trading`).
  pub database: String,
  /// Upper bound on pooled connections.
  #[serde(default = "default_max_connections")]
  pub max_connections: u32,
  /// How long to wait for a free connection (seconds).
  #[serde(default = "default_acquire_timeout")]
  pub acquire_timeout_seconds: u64,
}

/// Ledger configuration.
///
/// Fee parameters and the gas limit are fixed values: there is no
/// fee-market estimation.
#[derive(Debug, Clone, Deserialize)]
pub struct LedgerConfig {
  /// JSON-RPC endpoint of the chain node.
  pub rpc_url: String,
  /// Expected chain id, checked at startup.
  pub chain_id: u64,
  /// Deployed trade-ledger contract.
  pub contract_address: String,
  /// Gas limit for `recordTrade`.
  #[serde(default = "default_gas_limit")]
  pub gas_limit: u64,
  /// EIP-1559 max fee per gas, in gwei.
  #[serde(default = "default_max_fee_gwei")]
  pub max_fee_per_gas_gwei: u64,
  /// EIP-1559 max priority fee per gas, in gwei.
  #[serde(default = "default_priority_fee_gwei")]
  pub max_priority_fee_per_gas_gwei: u64,
  /// Base-unit exponent applied to energy amounts.
  #[serde(default = "default_decimals")]
  pub energy_decimals: u32,
  /// Base-unit exponent applied to prices.
  #[serde(default = "default_decimals")]
  pub price_decimals: u32,
}

/// Credentials read from the environment at startup.
#[derive(Clone)]
pub struct Secrets {
  pub db_password: String,
  pub private_key: String,
}

impl Secrets {
  /// Read both secrets from their environment variables.
  pub fn from_env() -> Result<Self> {
    let db_password = std::env::var(DB_PASSWORD_ENV)
      .with_context(|| format!("{DB_PASSWORD_ENV} not set"))?;
    let private_key = std::env::var(PRIVATE_KEY_ENV)
      .with_context(|| format!("{PRIVATE_KEY_ENV} not set"))?;
    Ok(Self {
      db_password,
      private_key,
    })
  }
}

impl fmt::Debug for Secrets {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Secrets")
      .field("db_password", &"<redacted>")
      .field("private_key", &"<redacted>")
      .finish()
  }
}

// Default value functions for serde

fn default_name() -> String {
  "hybrid-trade-recorder".to_string()
}

fn default_log_level() -> String {
  "info".to_string()
}

const fn default_db_port() -> u16 {
  3306
}

const fn default_max_connections() -> u32 {
  10
}

const fn default_acquire_timeout() -> u64 {
  30
}

const fn default_gas_limit() -> u64 {
  200_000
}

const fn default_max_fee_gwei() -> u64 {
  3
}

const fn default_priority_fee_gwei() -> u64 {
  1
}

const fn default_decimals() -> u32 {
  ETHER_DECIMALS
}
