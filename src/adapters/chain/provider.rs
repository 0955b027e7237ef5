//! Ledger RPC Provider - alloy-rs 0.9 Connection and Signer Management
//!
//! Builds a signing provider for the configured chain. The private key
//! is parsed once at startup into a local signer and attached to the
//! provider as an `EthereumWallet`; nonce and chain-id fillers come
//! from alloy's recommended set.
//!
//! The concrete filler stack returned by `ProviderBuilder` is a deeply
//! nested generic type, so it is stored type-erased as `dyn Provider`.

use std::sync::Arc;

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::signers::local::PrivateKeySigner;
use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::LedgerConfig;

/// Shared signing RPC provider backed by alloy-rs 0.9.
pub struct LedgerProvider {
    /// The alloy provider with wallet filler attached (type-erased).
    provider: Arc<dyn Provider + Send + Sync>,
    /// Address derived from the signing key.
    signer_address: Address,
}

impl LedgerProvider {
    /// Connect to the RPC endpoint and validate the chain id.
    ///
    /// Fails if the key is malformed, the endpoint is unreachable, or
    /// the node reports a chain id other than `config.chain_id`.
    #[instrument(skip_all, fields(chain_id = config.chain_id))]
    pub async fn connect(config: &LedgerConfig, private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .trim()
            .parse()
            .context("Invalid signing key")?;
        let signer_address = signer.address();
        let wallet = EthereumWallet::from(signer);

        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet)
            .on_builtin(&config.rpc_url)
            .await
            .context("Failed to connect to ledger RPC")?;

        let provider: Arc<dyn Provider + Send + Sync> = Arc::new(provider);

        let chain_id = provider
            .get_chain_id()
            .await
            .context("Failed to query chain ID")?;

        if chain_id != config.chain_id {
            anyhow::bail!(
                "Expected chain_id={}, RPC endpoint reports {chain_id}",
                config.chain_id
            );
        }

        info!(chain_id, signer = %signer_address, "Connected to ledger RPC");

        Ok(Self {
            provider,
            signer_address,
        })
    }

    /// Get a shared reference to the alloy provider (type-erased).
    pub fn inner(&self) -> Arc<dyn Provider + Send + Sync> {
        Arc::clone(&self.provider)
    }

    /// Address that signs every submitted transaction.
    pub const fn signer_address(&self) -> Address {
        self.signer_address
    }
}
