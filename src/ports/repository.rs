//! Repository Port - Trade Persistence Interface
//!
//! Defines the trait the workflow uses to read users and to create,
//! finalize, and read back trade rows. The production adapter is
//! MySQL via sqlx; tests substitute an in-memory fake or a mock.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::trade::{Trade, TradeId, TradeStatus, User, UserId};

/// Trait for the relational trade store.
///
/// Every method is a single round trip. Implementations must make
/// `finalize_trade` atomic: status and transaction hash change together.
#[async_trait]
pub trait TradeRepository: Send + Sync + 'static {
  /// Insert a new trade with status `PENDING` and no transaction hash.
  ///
  /// Returns the identifier assigned by the database.
  async fn insert_pending_trade(
    &self,
    seller_id: UserId,
    buyer_id: UserId,
    energy_amount_kwh: Decimal,
    price_per_kwh: Decimal,
  ) -> anyhow::Result<TradeId>;

  /// Look up a user by id. `Ok(None)` means the row does not exist.
  async fn find_user(&self, id: UserId) -> anyhow::Result<Option<User>>;

  /// Set the transaction hash and status of a trade in one statement.
  async fn finalize_trade(
    &self,
    trade_id: TradeId,
    tx_hash: &str,
    status: TradeStatus,
  ) -> anyhow::Result<()>;

  /// Read a trade back by id.
  async fn fetch_trade(&self, trade_id: TradeId) -> anyhow::Result<Trade>;
}
