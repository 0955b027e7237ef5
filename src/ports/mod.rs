//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the usecases layer
//! requires from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `TradeRepository`: users and trades in the relational store
//! - `LedgerClient`: trade recording on the blockchain ledger

pub mod ledger;
pub mod repository;

pub use ledger::{LedgerClient, LedgerTradeRecord};
pub use repository::TradeRepository;
