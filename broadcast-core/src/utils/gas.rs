//! # Gas Conversion
//!
//! Gas amounts are configured in gwei and sent in wei.

use ethers::types::U256;
use ethers::utils::parse_units;

use crate::error::ConfigError;

/// Precision kept when converting gwei to wei.
const GWEI_DECIMALS: usize = 9;

/// Convert a gwei amount to wei.
///
/// Anything finer than 1 wei is truncated.
pub fn gwei_to_wei(gwei: f64) -> Result<U256, ConfigError> {
    if !gwei.is_finite() || gwei < 0.0 {
        return Err(ConfigError::InvalidValue {
            field: "gas".to_string(),
            reason: format!("expected a non-negative gwei amount, got {}", gwei),
        });
    }

    let text = format!("{:.*}", GWEI_DECIMALS, gwei);
    parse_units(&text, "gwei")
        .map(Into::into)
        .map_err(|e| ConfigError::InvalidValue {
            field: "gas".to_string(),
            reason: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gwei_to_wei() {
        assert_eq!(gwei_to_wei(1.0).unwrap(), U256::from(1_000_000_000u64));
        assert_eq!(gwei_to_wei(0.5).unwrap(), U256::from(500_000_000u64));
        assert_eq!(gwei_to_wei(0.000000001).unwrap(), U256::from(1u64));
        assert_eq!(gwei_to_wei(10.0).unwrap(), U256::from(10_000_000_000u64));
    }

    #[test]
    fn test_gwei_to_wei_rejects_bad_amounts() {
        assert!(gwei_to_wei(-1.0).is_err());
        assert!(gwei_to_wei(f64::NAN).is_err());
        assert!(gwei_to_wei(f64::INFINITY).is_err());
    }
}
