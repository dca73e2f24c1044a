//! Decimal normalization of bridged amounts.
//!
//! Amounts travel over the wire with at most 8 decimals of precision.
//! Tokens with more native decimals have the excess digits chopped off
//! before sending; the receiving side scales back up, so the truncated
//! remainder is never credited anywhere.

const WIRE_DECIMALS: u8 = 8;

fn multiplier(decimals: u8) -> u128 {
    10u128.pow(u32::from(decimals.max(WIRE_DECIMALS) - WIRE_DECIMALS))
}

/// Rounds `amount` down to the precision that survives the wire, in native
/// units. This is the amount that should actually be debited from the
/// sender.
pub fn truncate_amount(amount: u128, decimals: u8) -> u128 {
    // chop off dust
    amount - amount % multiplier(decimals)
}

/// Converts a native `amount` to its wire representation.
pub fn normalize_amount(amount: u128, decimals: u8) -> u128 {
    amount / multiplier(decimals)
}

/// Converts a wire `amount` back to native units on the receiving side.
pub fn denormalize_amount(amount: u128, decimals: u8) -> u128 {
    amount.checked_mul(multiplier(decimals)).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eighteen_decimals_scale_down_and_back() {
        let raw = 110_000 * 10u128.pow(18);
        let normalized = normalize_amount(raw, 18);
        assert_eq!(normalized, 110_000 * 10u128.pow(8));
        // nothing was truncated, so scaling back is lossless
        assert_eq!(denormalize_amount(normalized, 18), raw);
    }

    #[test]
    fn eight_or_fewer_decimals_pass_through() {
        assert_eq!(normalize_amount(31337, 8), 31337);
        assert_eq!(normalize_amount(31337, 6), 31337);
        assert_eq!(truncate_amount(31337, 8), 31337);
        assert_eq!(denormalize_amount(31337, 6), 31337);
    }

    #[test]
    fn dust_is_chopped_not_rounded() {
        // 9 decimals: only the last digit is dust
        assert_eq!(truncate_amount(31337, 9), 31330);
        assert_eq!(normalize_amount(31337, 9), 3133);
        assert_eq!(denormalize_amount(3133, 9), 31330);
    }

    #[test]
    fn tiny_amount_normalizes_to_zero() {
        assert_eq!(normalize_amount(9, 18), 0);
    }
}
