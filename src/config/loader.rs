//! Configuration Loader - File Loading and Validation
//!
//! Handles loading `config.toml`, validating all parameters,
//! and providing clear error messages for misconfiguration.

use std::path::Path;

use alloy::primitives::Address;
use anyhow::{Context, Result};
use tracing::info;

use super::AppConfig;
use crate::domain::units::MAX_DECIMALS;

/// Load and validate configuration from a TOML file.
///
/// # Errors
/// Returns detailed error if:
/// - File doesn't exist or can't be read
/// - TOML parsing fails
/// - Validation rules are violated
pub fn load_config(path: &str) -> Result<AppConfig> {
  let path = Path::new(path);

  let content = std::fs::read_to_string(path)
    .with_context(|| format!("Failed to read config file: {}", path.display()))?;

  let config = parse_config(&content)?;

  info!(
    db_host = %config.database.host,
    database = %config.database.database,
    chain_id = config.ledger.chain_id,
    contract = %config.ledger.contract_address,
    "Configuration loaded successfully"
  );

  Ok(config)
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<AppConfig> {
  let config: AppConfig =
    toml::from_str(content).with_context(|| "Failed to parse config.toml")?;
  validate_config(&config)?;
  Ok(config)
}

/// Validate all configuration parameters.
///
/// Checks for:
/// - Non-empty endpoints and names
/// - A well-formed contract address
/// - Consistent EIP-1559 fee parameters
/// - Representable base-unit exponents
fn validate_config(config: &AppConfig) -> Result<()> {
  // Database validation
  anyhow::ensure!(
    !config.database.host.is_empty(),
    "database.host must not be empty"
  );
  anyhow::ensure!(
    !config.database.database.is_empty(),
    "database.database must not be empty"
  );
  anyhow::ensure!(
    config.database.max_connections > 0,
    "database.max_connections must be positive"
  );

  // Ledger validation
  let ledger = &config.ledger;
  anyhow::ensure!(!ledger.rpc_url.is_empty(), "ledger.rpc_url must not be empty");
  ledger
    .contract_address
    .parse::<Address>()
    .with_context(|| format!("Invalid ledger.contract_address: {}", ledger.contract_address))?;
  anyhow::ensure!(ledger.gas_limit > 0, "ledger.gas_limit must be positive");
  anyhow::ensure!(
    ledger.max_fee_per_gas_gwei > 0,
    "ledger.max_fee_per_gas_gwei must be positive"
  );
  anyhow::ensure!(
    ledger.max_priority_fee_per_gas_gwei <= ledger.max_fee_per_gas_gwei,
    "ledger.max_priority_fee_per_gas_gwei ({}) exceeds max_fee_per_gas_gwei ({})",
    ledger.max_priority_fee_per_gas_gwei,
    ledger.max_fee_per_gas_gwei
  );
  anyhow::ensure!(
    ledger.energy_decimals <= MAX_DECIMALS && ledger.price_decimals <= MAX_DECIMALS,
    "ledger decimals must be at most {MAX_DECIMALS}"
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  const VALID: &str = r#"
    [database]
    host = "localhost"
    user = "root"
    database = "energy_trading"

    [ledger]
    rpc_url = "https://rpc.sepolia.org"
    chain_id = 11155111
    contract_address = "0xD7ACd2a9FD159E69Bb102A1ca21C9a3e3A5F771B"
  "#;

  #[test]
  fn test_load_nonexistent_file() {
    let result = load_config("nonexistent.toml");
    assert!(result.is_err());
  }

  #[test]
  fn test_defaults_applied() {
    let config = parse_config(VALID).unwrap();
    assert_eq!(config.app.log_level, "info");
    assert_eq!(config.database.port, 3306);
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.ledger.gas_limit, 200_000);
    assert_eq!(config.ledger.max_fee_per_gas_gwei, 3);
    assert_eq!(config.ledger.max_priority_fee_per_gas_gwei, 1);
    assert_eq!(config.ledger.energy_decimals, 18);
    assert_eq!(config.ledger.price_decimals, 18);
  }

  #[test]
  fn test_rejects_zero_gas_limit() {
    let toml = VALID.replace(
      "chain_id = 11155111",
      "chain_id = 11155111\ngas_limit = 0",
    );
    assert!(parse_config(&toml).is_err());
  }

  #[test]
  fn test_rejects_priority_fee_above_max_fee() {
    let toml = VALID.replace(
      "chain_id = 11155111",
      "chain_id = 11155111\nmax_fee_per_gas_gwei = 1\nmax_priority_fee_per_gas_gwei = 2",
    );
    assert!(parse_config(&toml).is_err());
  }

  #[test]
  fn test_rejects_malformed_contract_address() {
    let toml = VALID.replace(
      "0xD7ACd2a9FD159E69Bb102A1ca21C9a3e3A5F771B",
      "0xnot-an-address",
    );
    assert!(parse_config(&toml).is_err());
  }
}
