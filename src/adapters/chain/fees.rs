//! Fixed EIP-1559 Fee Parameters
//!
//! Gas limit and fee caps are configuration values applied verbatim to
//! every `recordTrade` transaction. There is no fee-market estimation
//! and no resubmission with higher fees.

use crate::config::LedgerConfig;

/// Wei per gwei.
pub const WEI_PER_GWEI: u128 = 1_000_000_000;

/// EIP-1559 gas parameters for a ledger transaction, in wei.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeParams {
    /// Gas limit.
    pub gas_limit: u64,
    /// Maximum total fee per gas (wei).
    pub max_fee_per_gas: u128,
    /// Maximum priority fee (tip) per gas (wei).
    pub max_priority_fee_per_gas: u128,
}

impl FeeParams {
    /// Convert the gwei-denominated config into wei.
    pub fn from_config(config: &LedgerConfig) -> Self {
        Self {
            gas_limit: config.gas_limit,
            max_fee_per_gas: gwei_to_wei(config.max_fee_per_gas_gwei),
            max_priority_fee_per_gas: gwei_to_wei(config.max_priority_fee_per_gas_gwei),
        }
    }
}

/// Convert gwei to wei.
pub fn gwei_to_wei(gwei: u64) -> u128 {
    u128::from(gwei) * WEI_PER_GWEI
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gwei_conversion() {
        assert_eq!(gwei_to_wei(0), 0);
        assert_eq!(gwei_to_wei(3), 3_000_000_000);
        assert_eq!(gwei_to_wei(u64::MAX), u128::from(u64::MAX) * WEI_PER_GWEI);
    }

    #[test]
    fn params_from_config() {
        let config = LedgerConfig {
            rpc_url: "http://localhost:8545".into(),
            chain_id: 31337,
            contract_address: "0x0000000000000000000000000000000000000001".into(),
            gas_limit: 200_000,
            max_fee_per_gas_gwei: 3,
            max_priority_fee_per_gas_gwei: 1,
            energy_decimals: 18,
            price_decimals: 18,
        };
        let fees = FeeParams::from_config(&config);
        assert_eq!(fees.gas_limit, 200_000);
        assert_eq!(fees.max_fee_per_gas, 3_000_000_000);
        assert_eq!(fees.max_priority_fee_per_gas, 1_000_000_000);
    }
}
