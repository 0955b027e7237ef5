//! Ledger Port - On-chain Trade Recording Interface
//!
//! Defines the trait for mirroring a trade onto the blockchain ledger.
//! Amounts cross this boundary already scaled to base units so the
//! adapter never does decimal arithmetic.

use async_trait::async_trait;

use crate::domain::trade::{TradeId, TxHash};

/// Arguments of one `recordTrade` contract call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerTradeRecord {
  /// Database id of the trade being mirrored.
  pub trade_id: TradeId,
  /// Seller wallet address (hex string from the user store).
  pub seller_address: String,
  /// Buyer wallet address (hex string from the user store).
  pub buyer_address: String,
  /// Energy amount in ledger base units.
  pub energy_base_units: u128,
  /// Unit price in ledger base units.
  pub price_base_units: u128,
}

/// Trait for submitting trade records to the ledger.
#[async_trait]
pub trait LedgerClient: Send + Sync + 'static {
  /// Sign and submit one `recordTrade` transaction and wait for it to be mined.
  ///
  /// Returns the transaction hash once the chain has accepted the
  /// transaction. Any signing, transport, or execution failure is an error;
  /// callers must not retry.
  async fn submit_trade_record(&self, record: &LedgerTradeRecord) -> anyhow::Result<TxHash>;
}
