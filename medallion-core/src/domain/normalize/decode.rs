// medallion-core/src/domain/normalize/decode.rs
//
// Field-level decoders for the Bronze -> Silver cast.

use chrono::{Days, NaiveDate};
use miette::Diagnostic;
use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use std::str::FromStr;
use std::sync::OnceLock;
use thiserror::Error;

use crate::domain::record::{RawField, RawValue};

/// Fractional digits kept on every monetary amount (DECIMAL(10, 2)).
pub const MONEY_SCALE: u32 = 2;

/// Largest magnitude a DECIMAL(10, 2) can hold, exclusive.
const MONEY_LIMIT: Decimal = Decimal::from_parts(100_000_000, 0, 0, false, 0);

/// Integer digits of a DECIMAL(10, 2).
const MONEY_INTEGER_DIGITS: usize = 8;

/// Plain fixed-point text: optional sign, digits, optional fraction.
fn re_fixed_point() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([+-]?)([0-9]*)(?:\.([0-9]*))?$")
            .unwrap_or_else(|_| Regex::new("$^").unwrap_or_else(|_| unreachable!()))
    })
}

/// Sign, integer digits and fraction digits of fixed-point text.
/// `None` unless the text is a plain decimal with at least one digit.
fn split_fixed_point(text: &str) -> Option<(bool, &str, &str)> {
    let caps = re_fixed_point().captures(text)?;
    let int = caps.get(2).map_or("", |m| m.as_str());
    let frac = caps.get(3).map_or("", |m| m.as_str());
    if int.is_empty() && frac.is_empty() {
        return None;
    }
    Some((&caps[1] == "-", int, frac))
}

/// Day 0 of the spreadsheet serial date system (day 1 is 1899-12-31).
pub fn serial_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1899, 12, 30).unwrap_or(NaiveDate::MIN)
}

#[derive(Error, Debug, Clone, PartialEq, Diagnostic, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecodeError {
    #[error("row {row}: '{field}' is missing")]
    #[diagnostic(code(medallion::decode::missing))]
    Missing { row: usize, field: RawField },

    #[error("row {row}: '{field}' is not a valid serial date: {value}")]
    #[diagnostic(
        code(medallion::decode::date),
        help("Dates are exported as a non-negative number of days since 1899-12-30.")
    )]
    InvalidDate {
        row: usize,
        field: RawField,
        value: String,
    },

    #[error("row {row}: '{field}' is not a valid amount: {value}")]
    #[diagnostic(
        code(medallion::decode::amount),
        help("Amounts use a comma decimal separator, e.g. '10,50'.")
    )]
    InvalidAmount {
        row: usize,
        field: RawField,
        value: String,
    },

    #[error("row {row}: '{field}' does not fit DECIMAL(10, 2): {value}")]
    #[diagnostic(code(medallion::decode::amount_range))]
    AmountOutOfRange {
        row: usize,
        field: RawField,
        value: String,
    },

    #[error("row {row}: '{field}' is not a valid identifier: {value}")]
    #[diagnostic(code(medallion::decode::identifier))]
    InvalidIdentifier {
        row: usize,
        field: RawField,
        value: String,
    },
}

impl DecodeError {
    pub fn row(&self) -> usize {
        match self {
            Self::Missing { row, .. }
            | Self::InvalidDate { row, .. }
            | Self::InvalidAmount { row, .. }
            | Self::AmountOutOfRange { row, .. }
            | Self::InvalidIdentifier { row, .. } => *row,
        }
    }
}

/// Integral value of a cell. Accepts integers, integral floats and
/// integral text ("45000", " 45000 ", "45000.0").
fn integral(value: &RawValue) -> Option<i64> {
    match value {
        RawValue::Null => None,
        RawValue::Integer(v) => Some(*v),
        RawValue::Float(v) => {
            if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
                Some(*v as i64)
            } else {
                None
            }
        }
        RawValue::Text(s) => {
            let s = s.trim();
            split_fixed_point(s)?;
            if let Ok(v) = s.parse::<i64>() {
                return Some(v);
            }
            let d = Decimal::from_str(s).ok()?;
            if d.fract().is_zero() {
                d.to_i64()
            } else {
                None
            }
        }
    }
}

pub fn decode_identifier(row: usize, field: RawField, value: &RawValue) -> Result<i64, DecodeError> {
    if value.is_null() {
        return Err(DecodeError::Missing { row, field });
    }
    integral(value).ok_or_else(|| DecodeError::InvalidIdentifier {
        row,
        field,
        value: value.to_string(),
    })
}

/// Decodes a serial day offset against 1899-12-30.
pub fn decode_serial_date(
    row: usize,
    field: RawField,
    value: &RawValue,
) -> Result<NaiveDate, DecodeError> {
    if value.is_null() {
        return Err(DecodeError::Missing { row, field });
    }
    let invalid = || DecodeError::InvalidDate {
        row,
        field,
        value: value.to_string(),
    };

    let offset = integral(value).ok_or_else(invalid)?;
    let offset = u64::try_from(offset).map_err(|_| invalid())?;
    serial_epoch()
        .checked_add_days(Days::new(offset))
        .ok_or_else(invalid)
}

/// Parses a locale amount ("10,50") into a DECIMAL(10, 2).
///
/// Only the first comma is turned into a period, so grouped thousands
/// ("1.234,56") are rejected rather than silently misread. Text is rounded
/// from its exact digits, half-to-even, and the result always has scale 2.
pub fn decode_amount(row: usize, field: RawField, value: &RawValue) -> Result<Decimal, DecodeError> {
    let invalid = || DecodeError::InvalidAmount {
        row,
        field,
        value: value.to_string(),
    };
    let out_of_range = || DecodeError::AmountOutOfRange {
        row,
        field,
        value: value.to_string(),
    };

    let amount = match value {
        RawValue::Null => return Err(DecodeError::Missing { row, field }),
        RawValue::Integer(v) => to_money(Decimal::from(*v)),
        RawValue::Float(v) => to_money(Decimal::try_from(*v).map_err(|_| invalid())?),
        RawValue::Text(s) => {
            let text = s.trim().replacen(',', ".", 1);
            let (negative, int, frac) = split_fixed_point(&text).ok_or_else(invalid)?;
            let int = int.trim_start_matches('0');
            if int.len() > MONEY_INTEGER_DIGITS {
                return Err(out_of_range());
            }
            round_digits(negative, int, frac).ok_or_else(invalid)?
        }
    };

    if amount.abs() >= MONEY_LIMIT {
        return Err(out_of_range());
    }
    Ok(amount)
}

/// Half-to-even rounding to scale 2 on decimal digits, with no
/// intermediate precision limit.
fn round_digits(negative: bool, int: &str, frac: &str) -> Option<Decimal> {
    let kept: String = frac.chars().chain(std::iter::repeat('0')).take(2).collect();
    let mut cents: i64 = format!("{int}{kept}").parse().ok()?;

    let mut dropped = frac.get(2..).unwrap_or("").bytes();
    let round_up = match dropped.next() {
        Some(b'6'..=b'9') => true,
        Some(b'5') => dropped.any(|d| d != b'0') || cents % 2 == 1,
        _ => false,
    };
    if round_up {
        cents += 1;
    }
    if negative {
        cents = -cents;
    }
    Some(Decimal::new(cents, MONEY_SCALE))
}

/// Rounds half-to-even and pins the scale to exactly 2 digits.
pub fn to_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointNearestEven);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Renders an amount the way the export writes it ("10,50").
pub fn format_amount(value: Decimal) -> String {
    to_money(value).to_string().replacen('.', ",", 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    const ROW: usize = 7;

    fn amount(text: &str) -> Result<Decimal, DecodeError> {
        decode_amount(ROW, RawField::OrderValue, &RawValue::from(text))
    }

    fn date(value: RawValue) -> Result<NaiveDate, DecodeError> {
        decode_serial_date(ROW, RawField::SaleDate, &value)
    }

    #[test]
    fn test_serial_date_decoding() -> Result<()> {
        assert_eq!(date(RawValue::Integer(45000))?, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(date(RawValue::Integer(1))?, NaiveDate::from_ymd_opt(1899, 12, 31).unwrap());
        assert_eq!(date(RawValue::Integer(0))?, serial_epoch());
        assert_eq!(date(RawValue::from(" 45000 "))?, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(date(RawValue::from("45000.0"))?, NaiveDate::from_ymd_opt(2023, 3, 15).unwrap());
        assert_eq!(date(RawValue::Float(45001.0))?, NaiveDate::from_ymd_opt(2023, 3, 16).unwrap());
        Ok(())
    }

    #[test]
    fn test_serial_date_rejects_bad_offsets() {
        assert!(matches!(date(RawValue::Integer(-1)), Err(DecodeError::InvalidDate { .. })));
        assert!(matches!(date(RawValue::from("abc")), Err(DecodeError::InvalidDate { .. })));
        assert!(matches!(date(RawValue::Float(45000.5)), Err(DecodeError::InvalidDate { .. })));
        assert!(matches!(date(RawValue::Null), Err(DecodeError::Missing { row: ROW, .. })));
    }

    #[test]
    fn test_amount_uses_comma_separator() -> Result<()> {
        assert_eq!(amount("10,50")?.to_string(), "10.50");
        assert_eq!(amount(" 1,00 ")?.to_string(), "1.00");
        assert_eq!(amount("7")?.to_string(), "7.00");
        // Already period-formatted values still parse.
        assert_eq!(amount("3.5")?.to_string(), "3.50");
        assert_eq!(amount("-2,25")?.to_string(), "-2.25");
        Ok(())
    }

    #[test]
    fn test_amount_rounds_half_to_even() -> Result<()> {
        assert_eq!(amount("0,125")?.to_string(), "0.12");
        assert_eq!(amount("0,135")?.to_string(), "0.14");
        assert_eq!(amount("2,675")?.to_string(), "2.68");
        Ok(())
    }

    #[test]
    fn test_amount_rounds_from_every_digit() -> Result<()> {
        // More digits than a 96-bit decimal can hold; the tail decides the tie.
        assert_eq!(amount("0,0050000000000000000000000000001")?.to_string(), "0.01");
        assert_eq!(amount("0,00500000000000000000000000000000")?.to_string(), "0.00");
        assert_eq!(amount("0,0049999999999999999999999999999999")?.to_string(), "0.00");
        assert_eq!(amount("-0,015")?.to_string(), "-0.02");
        assert_eq!(amount("000000000012,3")?.to_string(), "12.30");
        assert_eq!(amount(",5")?.to_string(), "0.50");
        assert!(matches!(
            amount("123456789012345678901234567890"),
            Err(DecodeError::AmountOutOfRange { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_amount_rejects_malformed_text() {
        assert!(matches!(amount("1.234,56"), Err(DecodeError::InvalidAmount { .. })));
        assert!(matches!(amount("R$ 10,00"), Err(DecodeError::InvalidAmount { .. })));
        assert!(matches!(amount(""), Err(DecodeError::InvalidAmount { .. })));
        assert!(matches!(amount("1_0,50"), Err(DecodeError::InvalidAmount { .. })));
        assert!(matches!(amount("1e3"), Err(DecodeError::InvalidAmount { .. })));
        assert!(matches!(amount(","), Err(DecodeError::InvalidAmount { .. })));
        assert!(matches!(amount("--1"), Err(DecodeError::InvalidAmount { .. })));
        assert!(matches!(
            decode_amount(ROW, RawField::StoreIncentive, &RawValue::Null),
            Err(DecodeError::Missing { field: RawField::StoreIncentive, .. })
        ));
    }

    #[test]
    fn test_amount_range_matches_decimal_10_2() -> Result<()> {
        assert_eq!(amount("99999999,99")?.to_string(), "99999999.99");
        assert!(matches!(amount("100000000,00"), Err(DecodeError::AmountOutOfRange { .. })));
        Ok(())
    }

    #[test]
    fn test_amount_from_numeric_cells() -> Result<()> {
        let from_int = decode_amount(ROW, RawField::DeliveryFee, &RawValue::Integer(5))?;
        assert_eq!(from_int.to_string(), "5.00");
        let from_float = decode_amount(ROW, RawField::DeliveryFee, &RawValue::Float(4.99))?;
        assert_eq!(from_float.to_string(), "4.99");
        Ok(())
    }

    #[test]
    fn test_decode_then_format_is_idempotent() -> Result<()> {
        let samples = ["10,50", "0,125", "0,135", "1", "-3,999", "12345,6", "0,005", "99,995"];
        for sample in samples {
            let once = format_amount(amount(sample)?);
            let twice = format_amount(amount(&once)?);
            assert_eq!(once, twice, "not idempotent for {sample}");
        }
        Ok(())
    }

    #[test]
    fn test_identifier_decoding() -> Result<()> {
        let id = |v: RawValue| decode_identifier(ROW, RawField::EntityId, &v);
        assert_eq!(id(RawValue::Integer(53018))?, 53018);
        assert_eq!(id(RawValue::from("53018"))?, 53018);
        assert_eq!(id(RawValue::Float(53018.0))?, 53018);
        assert!(matches!(id(RawValue::from("53A")), Err(DecodeError::InvalidIdentifier { .. })));
        assert!(matches!(id(RawValue::Null), Err(DecodeError::Missing { .. })));
        Ok(())
    }

    #[test]
    fn test_error_reports_row() {
        let err = amount("oops").unwrap_err();
        assert_eq!(err.row(), ROW);
        assert!(err.to_string().contains("order_value"));
    }
}
