//! Domain layer - Core business types and arithmetic.
//!
//! Pure types for the hybrid trade recorder: users, trades, the workflow
//! input, and fixed-point base-unit scaling. No I/O happens here
//! (hexagonal architecture inner ring).

pub mod trade;
pub mod units;

// Re-export core types for convenience
pub use trade::{RequestError, Trade, TradeId, TradeRequest, TradeStatus, TxHash, User, UserId};
pub use units::UnitsError;
