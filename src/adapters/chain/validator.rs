//! Contract Validator - On-chain Verification at Startup
//!
//! Confirms the configured ledger contract address points at deployed
//! code (not an EOA or a typo) before any trade is recorded.

use std::sync::Arc;

use alloy::primitives::Address;
use alloy::providers::Provider;
use anyhow::{Context, Result};
use tracing::{info, instrument};

/// Validates contract addresses against on-chain state.
pub struct ContractValidator {
    /// Alloy provider for on-chain queries.
    provider: Arc<dyn Provider + Send + Sync>,
}

impl ContractValidator {
    /// Create a new validator with the given provider.
    pub fn new(provider: Arc<dyn Provider + Send + Sync>) -> Self {
        Self { provider }
    }

    /// Fail unless code is deployed at `address`.
    #[instrument(skip(self))]
    pub async fn ensure_deployed(&self, name: &str, address: Address) -> Result<()> {
        let code = self
            .provider
            .get_code_at(address)
            .await
            .with_context(|| format!("Failed to query code for {name}"))?;

        if code.is_empty() {
            anyhow::bail!(
                "Contract {name} at {address} has no deployed code; check config.toml"
            );
        }

        info!(contract = name, address = %address, "Contract validated: code exists on-chain");
        Ok(())
    }
}
