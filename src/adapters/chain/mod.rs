//! Chain Adapters - EVM Ledger Interaction Layer
//!
//! Provides on-chain access via alloy-rs 0.9 for:
//! - Signing RPC provider with chain-id validation
//! - Trade ledger contract calls (`recordTrade`)
//! - Fixed EIP-1559 fee parameters
//! - Contract code checks at startup

pub mod contracts;
pub mod fees;
pub mod provider;
pub mod validator;

pub use contracts::TradeLedgerContract;
pub use fees::FeeParams;
pub use provider::LedgerProvider;
pub use validator::ContractValidator;
