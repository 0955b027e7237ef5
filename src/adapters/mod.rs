//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies (MySQL, blockchain RPC).
//!
//! Adapter categories:
//! - `chain`: EVM ledger interaction via alloy-rs
//! - `persistence`: MySQL trade storage via sqlx

pub mod chain;
pub mod persistence;
