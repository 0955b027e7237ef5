//! Trade Ledger Contract - `recordTrade` Submission
//!
//! Implements the `LedgerClient` port by ABI-encoding a `recordTrade`
//! call, signing it through the wallet-enabled provider with fixed
//! EIP-1559 fees, and waiting for the receipt. The contract address
//! comes from `config.toml` and is validated on-chain at startup.

use std::sync::Arc;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::{SolCall, SolEvent};
use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::LedgerConfig;
use crate::domain::trade::TxHash;
use crate::ports::ledger::{LedgerClient, LedgerTradeRecord};

use super::fees::FeeParams;
use super::provider::LedgerProvider;
use super::validator::ContractValidator;

sol! {
    /// On-chain registry of energy trades.
    #[derive(Debug, PartialEq, Eq)]
    contract TradeLedger {
        event TradeCreated(
            uint256 indexed tradeId,
            address indexed seller,
            address indexed buyer,
            uint256 energyAmountKwh,
            uint256 pricePerKwh
        );

        function recordTrade(
            uint256 _tradeId,
            address _seller,
            address _buyer,
            uint256 _energyAmountKwh,
            uint256 _pricePerKwh
        ) external;
    }
}

/// ABI-encode the `recordTrade` calldata for one trade.
pub fn encode_record_trade(record: &LedgerTradeRecord) -> Result<Bytes> {
    let trade_id = u64::try_from(record.trade_id)
        .with_context(|| format!("Trade id {} cannot be a uint256", record.trade_id))?;
    let seller: Address = record
        .seller_address
        .parse()
        .with_context(|| format!("Invalid seller address: {}", record.seller_address))?;
    let buyer: Address = record
        .buyer_address
        .parse()
        .with_context(|| format!("Invalid buyer address: {}", record.buyer_address))?;

    let call = TradeLedger::recordTradeCall {
        _tradeId: U256::from(trade_id),
        _seller: seller,
        _buyer: buyer,
        _energyAmountKwh: U256::from(record.energy_base_units),
        _pricePerKwh: U256::from(record.price_base_units),
    };

    Ok(Bytes::from(call.abi_encode()))
}

/// `recordTrade` submitter for a deployed trade-ledger contract.
pub struct TradeLedgerContract {
    /// Shared signing provider.
    provider: Arc<LedgerProvider>,
    /// Contract address from config.
    address: Address,
    /// Fixed gas limit and fee caps.
    fees: FeeParams,
}

impl TradeLedgerContract {
    /// Bind to the configured contract and check it is deployed.
    #[instrument(skip_all)]
    pub async fn new(provider: Arc<LedgerProvider>, config: &LedgerConfig) -> Result<Self> {
        let address: Address = config
            .contract_address
            .parse()
            .context("Invalid ledger contract address")?;

        ContractValidator::new(provider.inner())
            .ensure_deployed("TradeLedger", address)
            .await?;

        Ok(Self {
            provider,
            address,
            fees: FeeParams::from_config(config),
        })
    }

    /// Build the unsigned transaction for one trade record.
    fn build_request(&self, record: &LedgerTradeRecord) -> Result<TransactionRequest> {
        let calldata = encode_record_trade(record)?;

        Ok(TransactionRequest::default()
            .with_from(self.provider.signer_address())
            .with_to(self.address)
            .with_input(calldata)
            .with_gas_limit(self.fees.gas_limit)
            .with_max_fee_per_gas(self.fees.max_fee_per_gas)
            .with_max_priority_fee_per_gas(self.fees.max_priority_fee_per_gas))
    }
}

#[async_trait]
impl LedgerClient for TradeLedgerContract {
    #[instrument(skip_all, fields(trade_id = record.trade_id))]
    async fn submit_trade_record(&self, record: &LedgerTradeRecord) -> Result<TxHash> {
        let tx = self.build_request(record)?;

        info!(
            contract = %self.address,
            gas_limit = self.fees.gas_limit,
            "Sending recordTrade transaction"
        );

        let pending = self
            .provider
            .inner()
            .send_transaction(tx)
            .await
            .context("Failed to submit recordTrade transaction")?;

        let receipt = pending
            .get_receipt()
            .await
            .context("Failed to obtain recordTrade receipt")?;

        let tx_hash = receipt.transaction_hash;

        if !receipt.status() {
            anyhow::bail!("recordTrade transaction {tx_hash} reverted on-chain");
        }

        let emitted = receipt
            .inner
            .logs()
            .iter()
            .any(|log| log.topic0() == Some(&TradeLedger::TradeCreated::SIGNATURE_HASH));
        if !emitted {
            warn!(%tx_hash, "Receipt carries no TradeCreated event");
        }

        info!(
            %tx_hash,
            block = receipt.block_number,
            "recordTrade transaction mined"
        );

        Ok(tx_hash.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::keccak256;

    fn record() -> LedgerTradeRecord {
        LedgerTradeRecord {
            trade_id: 9,
            seller_address: "0x1111111111111111111111111111111111111111".into(),
            buyer_address: "0x2222222222222222222222222222222222222222".into(),
            energy_base_units: 5_000_000_000_000_000_000,
            price_base_units: 2_000_000_000_000_000_000,
        }
    }

    #[test]
    fn calldata_uses_record_trade_selector() {
        let data = encode_record_trade(&record()).unwrap();
        let selector = &keccak256(b"recordTrade(uint256,address,address,uint256,uint256)")[..4];
        assert_eq!(&data[..4], selector);
        assert_eq!(data.len(), 4 + 5 * 32);
    }

    #[test]
    fn calldata_carries_scaled_arguments() {
        let data = encode_record_trade(&record()).unwrap();
        let decoded = TradeLedger::recordTradeCall::abi_decode(&data, true).unwrap();
        assert_eq!(decoded._tradeId, U256::from(9u64));
        assert_eq!(decoded._energyAmountKwh, U256::from(5_000_000_000_000_000_000u128));
        assert_eq!(decoded._pricePerKwh, U256::from(2_000_000_000_000_000_000u128));
    }

    #[test]
    fn malformed_address_is_rejected() {
        let mut bad = record();
        bad.buyer_address = "not-an-address".into();
        let err = encode_record_trade(&bad).unwrap_err();
        assert!(err.to_string().contains("buyer"));
    }

    #[test]
    fn event_signature_matches_contract() {
        assert_eq!(
            TradeLedger::TradeCreated::SIGNATURE_HASH,
            keccak256(b"TradeCreated(uint256,address,address,uint256,uint256)")
        );
    }
}
