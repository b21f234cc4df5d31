//! Decimal-string to base-unit conversion with width validation.
//!
//! Amounts arrive as human-entered decimal strings, optionally in scientific
//! notation. Scaling by the token's fractional digits is deferred to the
//! emitted source (`10 ** decimals()`), so conversion here only normalizes the
//! digits and proves the result fits the target integer width, both before and
//! after a conservative simulation of the runtime scaling.

use num_bigint::BigUint;
use num_traits::One;

use crate::error::OptionsError;

/// Integer width an amount must fit into, together with the fractional-digit
/// convention assumed when simulating post-scaling overflow. The assumption is
/// a fixed per-target constant even where on-chain decimals are configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetWidth {
    pub bits: u32,
    pub assumed_decimals: u32,
    /// Whether overflow messages spell out the assumed decimals.
    pub note_decimals: bool,
}

/// 256-bit amounts with the common 18-decimal convention.
pub const UINT256: TargetWidth = TargetWidth {
    bits: 256,
    assumed_decimals: 18,
    note_decimals: false,
};

/// 64-bit amounts with 6 assumed decimals, as used by confidential targets.
pub const UINT64: TargetWidth = TargetWidth {
    bits: 64,
    assumed_decimals: 6,
    note_decimals: true,
};

pub fn uint_max(bits: u32) -> BigUint {
    (BigUint::one() << bits) - BigUint::one()
}

/// Parses a non-negative integer string, mapping any failure to a
/// field-scoped error.
pub fn to_big_uint(value: &str, field: &str) -> Result<BigUint, OptionsError> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(OptionsError::single(field, "Not a valid number"));
    }
    value
        .parse()
        .map_err(|_| OptionsError::single(field, "Not a valid number"))
}

pub fn validate_uint(value: BigUint, bits: u32, field: &str) -> Result<BigUint, OptionsError> {
    if value > uint_max(bits) {
        Err(OptionsError::single(
            field,
            format!("Value is greater than uint{bits} max value"),
        ))
    } else {
        Ok(value)
    }
}

pub fn to_uint(value: &str, bits: u32, field: &str) -> Result<BigUint, OptionsError> {
    validate_uint(to_big_uint(value, field)?, bits, field)
}

/// A validated premint amount in base units, before the runtime scaling the
/// emitted constructor applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremintAmount {
    /// Normalized digit string, suitable for direct emission.
    pub units: String,
    /// Fractional digits folded into `units`; positive values reduce the
    /// runtime exponent.
    pub decimal_place: i64,
    pub base_units: BigUint,
}

impl PremintAmount {
    /// The symbolic exponent the emitted source multiplies by. The target's
    /// `decimals()` stays a runtime call; only the already-consumed fractional
    /// digits are subtracted.
    pub fn scaling_expression(&self) -> String {
        if self.decimal_place <= 0 {
            "decimals()".to_string()
        } else {
            format!("(decimals() - {})", self.decimal_place)
        }
    }
}

/// Converts a decimal amount string into validated base units.
///
/// Returns `Ok(None)` when the normalized amount is zero (nothing to mint).
/// Malformed input, a value beyond the width, or a simulated post-scaling
/// overflow are all field-scoped errors.
pub fn premint_amount(
    amount: &str,
    field: &str,
    width: TargetWidth,
) -> Result<Option<PremintAmount>, OptionsError> {
    let parts = parse_decimal(amount)
        .ok_or_else(|| OptionsError::single(field, "Not a valid number"))?;

    let integer = parts.integer.trim_start_matches('0');
    let fraction = parts.fraction.trim_end_matches('0');
    if integer.is_empty() && fraction.is_empty() {
        return Ok(None);
    }

    let decimal_place = fraction.len() as i64 - i64::from(parts.exponent);
    let mut units = String::with_capacity(integer.len() + fraction.len());
    units.push_str(integer);
    units.push_str(fraction);
    for _ in decimal_place..0 {
        units.push('0');
    }

    let base_units = to_uint(&units, width.bits, field)?;
    check_scaled_overflow(&base_units, decimal_place, width, field)?;

    Ok(Some(PremintAmount {
        units,
        decimal_place,
        base_units,
    }))
}

struct DecimalParts<'a> {
    integer: &'a str,
    fraction: &'a str,
    exponent: u32,
}

// Matches `^(\d*)(?:\.(\d+))?(?:e(\d+))?$`.
fn parse_decimal(amount: &str) -> Option<DecimalParts<'_>> {
    let (mantissa, exponent) = match amount.split_once('e') {
        Some((mantissa, exponent)) => {
            if exponent.is_empty() || !exponent.bytes().all(|b| b.is_ascii_digit()) {
                return None;
            }
            (mantissa, exponent.parse().ok()?)
        }
        None => (amount, 0),
    };

    let (integer, fraction) = match mantissa.split_once('.') {
        Some((integer, fraction)) => {
            if fraction.is_empty() {
                return None;
            }
            (integer, fraction)
        }
        None => (mantissa, ""),
    };

    let digits_only = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !digits_only(integer) || !digits_only(fraction) {
        return None;
    }

    Some(DecimalParts {
        integer,
        fraction,
        exponent,
    })
}

fn scale_by_power_of_ten(base: &BigUint, exponent: i64) -> BigUint {
    let ten = BigUint::from(10u32);
    if exponent < 0 {
        base / ten.pow(-exponent as u32)
    } else {
        base * ten.pow(exponent as u32)
    }
}

/// Simulates the runtime scaling against the width's assumed decimals. This
/// is a conservative pre-check: actual on-chain decimals may differ, but the
/// assumed constant is part of the target convention.
fn check_scaled_overflow(
    base_units: &BigUint,
    decimal_place: i64,
    width: TargetWidth,
    field: &str,
) -> Result<(), OptionsError> {
    let assumed_exp = if decimal_place <= 0 {
        i64::from(width.assumed_decimals)
    } else {
        i64::from(width.assumed_decimals) - decimal_place
    };

    if scale_by_power_of_ten(base_units, assumed_exp) > uint_max(width.bits) {
        let mut message = format!(
            "Amount would overflow uint{} after applying decimals",
            width.bits
        );
        if width.note_decimals {
            message.push_str(&format!(", assuming {} decimals", width.assumed_decimals));
        }
        return Err(OptionsError::single(field, message));
    }
    Ok(())
}
