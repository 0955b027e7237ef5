//! Core energy-trade domain types.
//!
//! Defines the entities the recorder moves between the relational store
//! and the ledger: users, trades, trade status, and the workflow input.
//! These types are the foundation of the hexagonal architecture's inner ring.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use super::units::{self, STORED_SCALE, UnitsError};

// ────────────────────────────────────────────
// Type aliases consumed by ports and adapters
// ────────────────────────────────────────────

/// Database identifier of a user row.
pub type UserId = i64;

/// Database identifier of a trade row (assigned on insert).
pub type TradeId = i64;

/// Hex-encoded ledger transaction hash (`0x…`).
pub type TxHash = String;

// ────────────────────────────────────────────
// Entities
// ────────────────────────────────────────────

/// A registered participant and the wallet that represents them on-chain.
///
/// Read-only for the recorder; user rows are managed elsewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    /// Wallet address as stored in `users.eth_address`.
    pub eth_address: String,
}

/// Lifecycle status of a trade row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TradeStatus {
    /// Stored in the database, not yet mirrored on the ledger.
    Pending,
    /// Accepted by the chain; `tx_hash` is set.
    Onchain,
}

impl TradeStatus {
    /// Column value stored in `trades.status`.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Onchain => "ONCHAIN",
        }
    }
}

impl fmt::Display for TradeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradeStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "ONCHAIN" => Ok(Self::Onchain),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A `trades.status` value outside the known set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown trade status {0:?}")]
pub struct UnknownStatus(pub String);

/// A persisted energy trade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Trade {
    pub id: TradeId,
    pub seller_id: UserId,
    pub buyer_id: UserId,
    /// Energy delivered, in kWh.
    pub energy_amount_kwh: Decimal,
    /// Unit price per kWh.
    pub price_per_kwh: Decimal,
    pub status: TradeStatus,
    /// Ledger transaction hash, `None` while the trade is pending.
    pub tx_hash: Option<TxHash>,
}

impl Trade {
    /// Whether the trade has been mirrored on the ledger.
    pub fn is_onchain(&self) -> bool {
        self.status == TradeStatus::Onchain && self.tx_hash.as_deref().is_some_and(|h| !h.is_empty())
    }
}

// ────────────────────────────────────────────
// Workflow input
// ────────────────────────────────────────────

/// Request to record one trade in the database and on the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeRequest {
    pub seller_id: UserId,
    pub buyer_id: UserId,
    pub energy_kwh: Decimal,
    pub price_per_kwh: Decimal,
}

/// Amounts the ledger or the `trades` columns cannot hold exactly.
///
/// These are encoding limits only; any pair of users and any
/// non-negative amount is otherwise recordable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("{field} cannot be expressed in ledger base units: {source}")]
    Unscalable {
        field: &'static str,
        #[source]
        source: UnitsError,
    },
    #[error("{field} has {scale} fractional digits, the trades table stores 18")]
    ExceedsStoredScale { field: &'static str, scale: u32 },
}

impl TradeRequest {
    /// Create a request from raw parts.
    pub const fn new(
        seller_id: UserId,
        buyer_id: UserId,
        energy_kwh: Decimal,
        price_per_kwh: Decimal,
    ) -> Self {
        Self {
            seller_id,
            buyer_id,
            energy_kwh,
            price_per_kwh,
        }
    }

    /// Check both amounts can be stored and submitted without rounding.
    pub fn validate(&self, energy_decimals: u32, price_decimals: u32) -> Result<(), RequestError> {
        check_encodable("energy amount", self.energy_kwh, energy_decimals)?;
        check_encodable("price", self.price_per_kwh, price_decimals)
    }
}

fn check_encodable(field: &'static str, value: Decimal, decimals: u32) -> Result<(), RequestError> {
    units::to_base_units(value, decimals)
        .map_err(|source| RequestError::Unscalable { field, source })?;

    let scale = value.normalize().scale();
    if scale > STORED_SCALE {
        return Err(RequestError::ExceedsStoredScale { field, scale });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn status_round_trips_through_column_value() {
        for status in [TradeStatus::Pending, TradeStatus::Onchain] {
            assert_eq!(status.as_str().parse::<TradeStatus>(), Ok(status));
        }
        assert!("SETTLED".parse::<TradeStatus>().is_err());
    }

    #[test]
    fn pending_trade_is_not_onchain() {
        let trade = Trade {
            id: 7,
            seller_id: 1,
            buyer_id: 2,
            energy_amount_kwh: dec!(5),
            price_per_kwh: dec!(2),
            status: TradeStatus::Pending,
            tx_hash: None,
        };
        assert!(!trade.is_onchain());

        let done = Trade {
            status: TradeStatus::Onchain,
            tx_hash: Some("0xabc".into()),
            ..trade
        };
        assert!(done.is_onchain());
    }

    #[test]
    fn validate_accepts_demo_trade() {
        let req = TradeRequest::new(1, 2, dec!(5), dec!(2));
        assert_eq!(req.validate(18, 18), Ok(()));
    }

    #[test]
    fn validate_accepts_zero_amounts_and_same_user() {
        assert_eq!(TradeRequest::new(1, 2, dec!(0), dec!(0)).validate(18, 18), Ok(()));
        assert_eq!(TradeRequest::new(3, 3, dec!(5), dec!(2)).validate(18, 18), Ok(()));
    }

    #[test]
    fn validate_rejects_negative_amounts() {
        let negative_price = TradeRequest::new(1, 2, dec!(5), dec!(-1));
        assert_eq!(
            negative_price.validate(18, 18),
            Err(RequestError::Unscalable {
                field: "price",
                source: UnitsError::Negative
            })
        );
    }

    #[test]
    fn validate_rejects_excess_precision() {
        let req = TradeRequest::new(1, 2, dec!(5.125), dec!(2));
        assert!(matches!(
            req.validate(2, 18),
            Err(RequestError::Unscalable { field: "energy amount", .. })
        ));
    }

    #[test]
    fn validate_rejects_digits_the_table_would_round() {
        let req = TradeRequest::new(1, 2, dec!(0.0000000000000000001), dec!(2));
        assert_eq!(
            req.validate(28, 18),
            Err(RequestError::ExceedsStoredScale {
                field: "energy amount",
                scale: 19
            })
        );
    }
}
