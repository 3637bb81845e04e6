use rust_decimal::Decimal;

use crate::driver::DriverResultSet;
use crate::error::DriverError;
use crate::types::{DecodeRule, RowValues, decode_rule};

/// Decode column `index` (1-based) of the current row.
///
/// The column is read as a string first so that a NULL never reaches a typed accessor.
pub(crate) fn decode_column(
    rs: &mut dyn DriverResultSet,
    index: usize,
    type_code: i32,
) -> Result<RowValues, DriverError> {
    let Some(text) = rs.get_string(index)? else {
        return Ok(RowValues::Null);
    };
    match decode_rule(type_code) {
        DecodeRule::Integer => rs.get_long(index).map(RowValues::Int),
        DecodeRule::Float => rs.get_double(index).map(RowValues::Float),
        DecodeRule::Text => Ok(RowValues::Text(text)),
        DecodeRule::Boolean => rs.get_boolean(index).map(RowValues::Bool),
        DecodeRule::Decimal => parse_decimal(&text).map(RowValues::Decimal),
        DecodeRule::Object => rs.get_object(index),
    }
}

/// Exact decimal from the driver's text. Never goes through a binary float and never rounds.
///
/// Text that is not a number fails with SQLSTATE 22018. A number with more digits than a
/// `Decimal` holds fails with 22003.
pub(crate) fn parse_decimal(text: &str) -> Result<Decimal, DriverError> {
    let trimmed = text.trim();
    Decimal::from_str_exact(trimmed)
        .ok()
        .or_else(|| parse_exact_scientific(trimmed))
        .ok_or_else(|| {
            if trimmed.parse::<f64>().is_ok_and(f64::is_finite) {
                DriverError::new(format!("{text:?} does not fit an exact decimal"))
                    .with_sql_state("22003")
            } else {
                DriverError::new(format!("cannot parse {text:?} as decimal")).with_sql_state("22018")
            }
        })
}

/// `1.5e2` style text, shifted by the exponent on the integer mantissa.
fn parse_exact_scientific(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = text.split_once(['e', 'E'])?;
    let mantissa = Decimal::from_str_exact(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    let scale = i64::from(mantissa.scale()) - exponent;
    if scale >= 0 {
        Decimal::try_from_i128_with_scale(mantissa.mantissa(), u32::try_from(scale).ok()?).ok()
    } else {
        let factor = 10_i128.checked_pow(u32::try_from(-scale).ok()?)?;
        Decimal::try_from_i128_with_scale(mantissa.mantissa().checked_mul(factor)?, 0).ok()
    }
}
