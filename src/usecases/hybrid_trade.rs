//! Hybrid Trade Use Case - Database + Ledger Recording Workflow
//!
//! Records one energy trade in the relational store and mirrors it
//! onto the blockchain ledger.
//!
//! Workflow (strictly sequential, no retries, no compensation):
//! 1. Insert the trade row as PENDING
//! 2. Resolve seller and buyer wallet addresses
//! 3. Submit `recordTrade` to the ledger with base-unit amounts
//! 4. Store the transaction hash, mark the row ONCHAIN, read it back
//!
//! A failure at any step ends the workflow. A row left PENDING without a
//! transaction hash is the expected residue of a failed run.

use std::fmt;
use std::sync::Arc;

use tracing::{error, info, instrument};

use crate::domain::trade::{
  RequestError, Trade, TradeId, TradeRequest, TradeStatus, TxHash, UserId,
};
use crate::domain::units;
use crate::ports::ledger::{LedgerClient, LedgerTradeRecord};
use crate::ports::repository::TradeRepository;

/// Position of the workflow in its linear state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowStage {
  Start,
  TradeInserted,
  CounterpartiesResolved,
  LedgerSubmitted,
  Finalized,
}

impl fmt::Display for WorkflowStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      Self::Start => "START",
      Self::TradeInserted => "TRADE_INSERTED",
      Self::CounterpartiesResolved => "COUNTERPARTIES_RESOLVED",
      Self::LedgerSubmitted => "LEDGER_SUBMITTED",
      Self::Finalized => "FINALIZED",
    };
    f.write_str(name)
  }
}

/// Terminal failure of a hybrid trade run.
#[derive(Debug, thiserror::Error)]
pub enum TradeError {
  /// The request was rejected before any remote call.
  #[error("invalid trade request")]
  InvalidRequest(#[from] RequestError),
  /// A database operation failed.
  #[error("storage operation failed")]
  Storage(#[source] anyhow::Error),
  /// Seller or buyer is not present in the user store.
  #[error("counterparty missing: user {user_id} not found")]
  CounterpartyMissing { user_id: UserId },
  /// Signing, transport, or on-chain execution failed.
  #[error("ledger submission failed")]
  LedgerSubmission(#[source] anyhow::Error),
}

impl TradeError {
  /// This error and every underlying cause, outermost first.
  pub fn causes(&self) -> Vec<String> {
    anyhow::Chain::new(self).map(ToString::to_string).collect()
  }
}

/// Base-unit exponents applied before ledger submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerScaling {
  pub energy_decimals: u32,
  pub price_decimals: u32,
}

impl Default for LedgerScaling {
  fn default() -> Self {
    Self {
      energy_decimals: units::ETHER_DECIMALS,
      price_decimals: units::ETHER_DECIMALS,
    }
  }
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeOutcome {
  /// The trade as read back from storage after finalization.
  pub trade: Trade,
  /// Ledger transaction hash.
  pub tx_hash: TxHash,
}

/// Orchestrates the four-step hybrid trade workflow.
///
/// Collaborators are injected so the workflow can run against mocks.
pub struct HybridTradeRecorder {
  repo: Arc<dyn TradeRepository>,
  ledger: Arc<dyn LedgerClient>,
  scaling: LedgerScaling,
}

impl HybridTradeRecorder {
  /// Create a recorder with the default 18-decimal scaling.
  pub fn new(repo: Arc<dyn TradeRepository>, ledger: Arc<dyn LedgerClient>) -> Self {
    Self::with_scaling(repo, ledger, LedgerScaling::default())
  }

  /// Create a recorder with explicit base-unit exponents.
  pub fn with_scaling(
    repo: Arc<dyn TradeRepository>,
    ledger: Arc<dyn LedgerClient>,
    scaling: LedgerScaling,
  ) -> Self {
    Self {
      repo,
      ledger,
      scaling,
    }
  }

  /// Run the workflow for one trade.
  ///
  /// Every invocation inserts a new row and submits a new transaction;
  /// identical requests are not de-duplicated.
  #[instrument(skip_all, fields(seller_id = request.seller_id, buyer_id = request.buyer_id))]
  pub async fn record(&self, request: &TradeRequest) -> Result<TradeOutcome, TradeError> {
    info!(
      energy_kwh = %request.energy_kwh,
      price_per_kwh = %request.price_per_kwh,
      "Starting hybrid trade"
    );

    let mut stage = WorkflowStage::Start;
    let result = self.run(request, &mut stage).await;

    match &result {
      Ok(outcome) => info!(
        trade_id = outcome.trade.id,
        tx_hash = %outcome.tx_hash,
        status = %outcome.trade.status,
        "Hybrid trade complete"
      ),
      Err(e) => error!(
        reached = %stage,
        error = %e.causes().join(": "),
        "Hybrid trade aborted"
      ),
    }

    result
  }

  async fn run(
    &self,
    request: &TradeRequest,
    stage: &mut WorkflowStage,
  ) -> Result<TradeOutcome, TradeError> {
    request.validate(self.scaling.energy_decimals, self.scaling.price_decimals)?;

    // 1. Persist the pending row
    let trade_id = self
      .repo
      .insert_pending_trade(
        request.seller_id,
        request.buyer_id,
        request.energy_kwh,
        request.price_per_kwh,
      )
      .await
      .map_err(TradeError::Storage)?;
    *stage = WorkflowStage::TradeInserted;
    info!(trade_id, stage = %stage, "Trade stored as PENDING");

    // 2. Resolve counterparties
    let (seller_address, buyer_address) = self.resolve_counterparties(request).await?;
    *stage = WorkflowStage::CounterpartiesResolved;
    info!(
      trade_id,
      stage = %stage,
      seller = %seller_address,
      buyer = %buyer_address,
      "Counterparties resolved"
    );

    // 3. Mirror on the ledger
    let record = self.ledger_record(trade_id, request, seller_address, buyer_address)?;
    let tx_hash = self
      .ledger
      .submit_trade_record(&record)
      .await
      .map_err(TradeError::LedgerSubmission)?;
    *stage = WorkflowStage::LedgerSubmitted;
    info!(trade_id, stage = %stage, tx_hash = %tx_hash, "Ledger transaction accepted");

    // 4. Finalize and confirm
    self
      .repo
      .finalize_trade(trade_id, &tx_hash, TradeStatus::Onchain)
      .await
      .map_err(TradeError::Storage)?;
    let trade = self
      .repo
      .fetch_trade(trade_id)
      .await
      .map_err(TradeError::Storage)?;
    *stage = WorkflowStage::Finalized;

    Ok(TradeOutcome { trade, tx_hash })
  }

  /// Look up both users and return their wallet addresses.
  async fn resolve_counterparties(
    &self,
    request: &TradeRequest,
  ) -> Result<(String, String), TradeError> {
    let seller = self
      .repo
      .find_user(request.seller_id)
      .await
      .map_err(TradeError::Storage)?;
    let buyer = self
      .repo
      .find_user(request.buyer_id)
      .await
      .map_err(TradeError::Storage)?;

    let seller = seller.ok_or(TradeError::CounterpartyMissing {
      user_id: request.seller_id,
    })?;
    let buyer = buyer.ok_or(TradeError::CounterpartyMissing {
      user_id: request.buyer_id,
    })?;

    Ok((seller.eth_address, buyer.eth_address))
  }

  fn ledger_record(
    &self,
    trade_id: TradeId,
    request: &TradeRequest,
    seller_address: String,
    buyer_address: String,
  ) -> Result<LedgerTradeRecord, TradeError> {
    let energy_base_units = units::to_base_units(request.energy_kwh, self.scaling.energy_decimals)
      .map_err(|e| TradeError::LedgerSubmission(e.into()))?;
    let price_base_units = units::to_base_units(request.price_per_kwh, self.scaling.price_decimals)
      .map_err(|e| TradeError::LedgerSubmission(e.into()))?;

    Ok(LedgerTradeRecord {
      trade_id,
      seller_address,
      buyer_address,
      energy_base_units,
      price_base_units,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stage_names_match_state_machine() {
    let names: Vec<String> = [
      WorkflowStage::Start,
      WorkflowStage::TradeInserted,
      WorkflowStage::CounterpartiesResolved,
      WorkflowStage::LedgerSubmitted,
      WorkflowStage::Finalized,
    ]
    .iter()
    .map(ToString::to_string)
    .collect();
    assert_eq!(
      names,
      [
        "START",
        "TRADE_INSERTED",
        "COUNTERPARTIES_RESOLVED",
        "LEDGER_SUBMITTED",
        "FINALIZED"
      ]
    );
  }

  #[test]
  fn causes_list_wrapped_context_outermost_first() {
    let err = TradeError::LedgerSubmission(
      anyhow::anyhow!("nonce too low").context("Failed to submit recordTrade transaction"),
    );
    assert_eq!(
      err.causes(),
      [
        "ledger submission failed",
        "Failed to submit recordTrade transaction",
        "nonce too low"
      ]
    );
  }

  #[test]
  fn invalid_request_keeps_its_reason() {
    let err = TradeError::from(RequestError::ExceedsStoredScale {
      field: "price",
      scale: 19,
    });
    let causes = err.causes();
    assert_eq!(causes.len(), 2);
    assert_eq!(causes[0], "invalid trade request");
    assert!(causes[1].starts_with("price has 19 fractional digits"));
  }
}
