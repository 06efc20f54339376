//! Currency and amount rendering for the signed callback fields.
//!
//! MOLPay signs the amount with the currency's minor-unit precision and sends
//! Malaysian Ringgit as `RM` rather than its ISO code. Both quirks have to be
//! reproduced exactly for the skey to match.

use crate::{Result, VerificationError};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// ISO 4217 currencies without a minor unit.
const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
    "BIF", "CLP", "DJF", "GNF", "ISK", "JPY", "KMF", "KRW", "PYG", "RWF", "UGX", "UYI", "VND",
    "VUV", "XAF", "XOF", "XPF",
];

/// ISO 4217 currencies with a three-digit minor unit.
const THREE_DECIMAL_CURRENCIES: &[&str] = &["BHD", "IQD", "JOD", "KWD", "LYD", "OMR", "TND"];

/// Minor-unit precision used when none is known for a currency.
const DEFAULT_DECIMAL_PLACES: u32 = 2;

/// Map a merchant currency code to the form MOLPay puts in the skey.
///
/// `MYR` becomes `RM`; every other code, including the empty string, passes
/// through unchanged.
///
/// # Examples
///
/// ```
/// use molpay_lib::currency::normalize_currency;
///
/// assert_eq!(normalize_currency("MYR"), "RM");
/// assert_eq!(normalize_currency("USD"), "USD");
/// ```
pub fn normalize_currency(code: &str) -> &str {
    if code == "MYR" {
        "RM"
    } else {
        code
    }
}

/// Number of fractional digits the amount is signed with.
pub fn decimal_places(currency: &str) -> u32 {
    if ZERO_DECIMAL_CURRENCIES.contains(&currency) {
        0
    } else if THREE_DECIMAL_CURRENCIES.contains(&currency) {
        3
    } else {
        DEFAULT_DECIMAL_PLACES
    }
}

/// Render an amount the way MOLPay signs it.
///
/// The value is rounded half away from zero to the currency's precision and
/// always printed with exactly that many fractional digits, so `"10"` and
/// `"10.00"` yield the same string for `MYR`.
///
/// # Errors
///
/// Returns [`VerificationError::InvalidAmount`] unless the amount is a plain
/// `digits[.digits]` string (no sign, exponent or whitespace), or when it is too
/// large to carry the currency's fractional digits.
///
/// # Examples
///
/// ```
/// use molpay_lib::currency::format_amount;
///
/// assert_eq!(format_amount("10", "MYR").unwrap(), "10.00");
/// assert_eq!(format_amount("1500.4", "JPY").unwrap(), "1500");
/// assert_eq!(format_amount("1", "BHD").unwrap(), "1.000");
/// ```
pub fn format_amount(amount: &str, currency: &str) -> Result<String> {
    if !is_plain_decimal(amount) {
        return Err(VerificationError::invalid_amount(
            amount,
            "expected digits with an optional decimal fraction",
        ));
    }

    let value = Decimal::from_str(amount)
        .map_err(|e| VerificationError::invalid_amount(amount, e.to_string()))?;

    let places = decimal_places(currency);
    let mut rounded = value.round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(places);

    // rescale leaves the value untouched when the digits do not fit
    if rounded.scale() != places {
        return Err(VerificationError::invalid_amount(
            amount,
            format!("too large to render with {} decimal places", places),
        ));
    }

    Ok(rounded.to_string())
}

/// `digits` or `digits.digits`, ASCII only.
fn is_plain_decimal(s: &str) -> bool {
    let (whole, fraction) = match s.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (s, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());

    all_digits(whole) && fraction.map_or(true, all_digits)
}
