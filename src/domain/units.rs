//! Ledger base-unit scaling.
//!
//! The ledger only stores integers, so decimal quantities are expanded
//! by `10^decimals` before submission. Scaling is exact fixed-point
//! arithmetic on the decimal mantissa; floats are never involved.

use rust_decimal::Decimal;

/// Exponent of the chain's native base unit (1 ether = 10^18 wei).
pub const ETHER_DECIMALS: u32 = 18;

/// Fractional digits kept by the `trades` amount columns (`DECIMAL(65,18)`).
pub const STORED_SCALE: u32 = 18;

/// Largest exponent whose multiplier fits in a `u128`.
pub const MAX_DECIMALS: u32 = 38;

/// Failure to convert between decimal and base-unit representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UnitsError {
    #[error("negative values cannot be expressed in base units")]
    Negative,
    #[error("value has {scale} fractional digits but only {decimals} are representable")]
    TooPrecise { scale: u32, decimals: u32 },
    #[error("value overflows the base-unit range")]
    Overflow,
}

/// Multiplier for the given exponent, `10^decimals`.
pub fn multiplier(decimals: u32) -> Result<u128, UnitsError> {
    10u128.checked_pow(decimals).ok_or(UnitsError::Overflow)
}

/// Expand a decimal value into integer base units.
///
/// `to_base_units(5, 18)` yields `5 * 10^18`. Values carrying more
/// fractional digits than `decimals` are rejected rather than truncated.
pub fn to_base_units(value: Decimal, decimals: u32) -> Result<u128, UnitsError> {
    if value < Decimal::ZERO {
        return Err(UnitsError::Negative);
    }

    let value = value.normalize();
    let scale = value.scale();
    if scale > decimals {
        return Err(UnitsError::TooPrecise { scale, decimals });
    }

    let mantissa = u128::try_from(value.mantissa()).map_err(|_| UnitsError::Negative)?;
    mantissa
        .checked_mul(multiplier(decimals - scale)?)
        .ok_or(UnitsError::Overflow)
}

/// Collapse integer base units back into a decimal value.
pub fn from_base_units(raw: u128, decimals: u32) -> Result<Decimal, UnitsError> {
    let raw = i128::try_from(raw).map_err(|_| UnitsError::Overflow)?;
    Decimal::try_from_i128_with_scale(raw, decimals)
        .map(|d| d.normalize())
        .map_err(|_| UnitsError::Overflow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const WEI: u128 = 1_000_000_000_000_000_000;

    #[test]
    fn demo_values_expand_to_wei() {
        assert_eq!(to_base_units(dec!(5), ETHER_DECIMALS), Ok(5 * WEI));
        assert_eq!(to_base_units(dec!(2), ETHER_DECIMALS), Ok(2 * WEI));
    }

    #[test]
    fn demo_values_round_trip() {
        let energy = to_base_units(dec!(5), ETHER_DECIMALS).unwrap();
        let price = to_base_units(dec!(2), ETHER_DECIMALS).unwrap();
        assert_eq!(energy / multiplier(ETHER_DECIMALS).unwrap(), 5);
        assert_eq!(price / multiplier(ETHER_DECIMALS).unwrap(), 2);
        assert_eq!(from_base_units(energy, ETHER_DECIMALS), Ok(dec!(5)));
        assert_eq!(from_base_units(price, ETHER_DECIMALS), Ok(dec!(2)));
    }

    #[test]
    fn fractional_values_are_exact() {
        assert_eq!(to_base_units(dec!(0.5), ETHER_DECIMALS), Ok(WEI / 2));
        assert_eq!(to_base_units(dec!(1.250), 3), Ok(1_250));
        // Trailing zeros do not count against precision.
        assert_eq!(to_base_units(dec!(7.000), 0), Ok(7));
    }

    #[test]
    fn rejects_negative_and_over_precise() {
        assert_eq!(to_base_units(dec!(-1), ETHER_DECIMALS), Err(UnitsError::Negative));
        assert_eq!(
            to_base_units(dec!(0.001), 2),
            Err(UnitsError::TooPrecise { scale: 3, decimals: 2 })
        );
    }

    #[test]
    fn rejects_overflow() {
        assert_eq!(multiplier(MAX_DECIMALS + 1), Err(UnitsError::Overflow));
        assert_eq!(to_base_units(dec!(1000), MAX_DECIMALS), Err(UnitsError::Overflow));
    }

    #[test]
    fn zero_is_zero() {
        assert_eq!(to_base_units(Decimal::ZERO, ETHER_DECIMALS), Ok(0));
    }
}
