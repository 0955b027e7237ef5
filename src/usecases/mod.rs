//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates domain logic with port interfaces to implement
//! the recorder's workflow.
//!
//! Use cases:
//! - `HybridTradeRecorder`: database insert, ledger submission, finalization

pub mod hybrid_trade;

pub use hybrid_trade::{HybridTradeRecorder, LedgerScaling, TradeError, TradeOutcome, WorkflowStage};
