// Utility modules

use ethers::types::U256;
use ethers::utils::format_ether;
use rust_decimal::Decimal;

use crate::error::{AppError, Result};

/// Converts an unsigned fixed-point integer (e.g. a 6-decimal USD amount or
/// an 8-decimal feed answer) into an exact decimal.
pub fn fixed_point_to_decimal(value: U256, scale: u32) -> Result<Decimal> {
    if value > U256::from(i128::MAX as u128) {
        return Err(AppError::BlockchainRPC(format!(
            "Fixed-point value out of range: {}",
            value
        )));
    }
    Decimal::try_from_i128_with_scale(value.as_u128() as i128, scale)
        .map_err(|e| AppError::BlockchainRPC(format!("Fixed-point value out of range: {}", e)))
}

/// Wei rendered in ether with trailing zeros trimmed: `10000000000000000`
/// becomes `0.01`.
pub fn display_ether(wei: U256) -> String {
    let formatted = format_ether(wei);
    if !formatted.contains('.') {
        return formatted;
    }
    formatted
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// `MM:SS`; minutes keep counting past 59.
pub fn format_mm_ss(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
