//! Persistence Adapters - Relational Trade Storage
//!
//! Implements the `TradeRepository` port on MySQL via sqlx.

pub mod mysql;

pub use mysql::MySqlTradeRepository;
