//! skey derivation and verification.
//!
//! MOLPay authenticates a callback with a two-stage MD5 chain:
//!
//! ```text
//! pre_skey = md5(tranID ‖ orderid ‖ status ‖ domain ‖ amount ‖ currency)
//! skey     = md5(paydate ‖ domain ‖ pre_skey ‖ appcode ‖ verify_key)
//! ```
//!
//! The algorithm and field order are dictated by the processor and have to be
//! reproduced bit for bit. MD5 is weak, so the strength of the scheme rests on
//! the secrecy of the verify key.
//!
//! Every function here is pure: no I/O, no logging, no shared state.

use crate::currency::{format_amount, normalize_currency};
use crate::errors::{Field, VerificationError};
use crate::outcome::{TransactionOutcome, VerifiedOutcome};
use crate::Result;

/// Fields required to derive the stage-one digest, in the order they are checked.
pub const STAGE_ONE_FIELDS: [Field; 6] = [
    Field::Amount,
    Field::Currency,
    Field::Domain,
    Field::Status,
    Field::TransactionId,
    Field::TransactionReference,
];

/// Fields required to derive the stage-two digest, in the order they are checked.
pub const STAGE_TWO_FIELDS: [Field; 4] = [
    Field::AppCode,
    Field::Domain,
    Field::PayDate,
    Field::VerifyKey,
];

/// Lowercase hex MD5 of `input`.
pub fn md5_hex(input: &str) -> String {
    format!("{:x}", md5::compute(input.as_bytes()))
}

/// Derive the stage-one digest ("pre-skey").
///
/// # Errors
///
/// [`VerificationError::Validation`] naming the first missing field of
/// [`STAGE_ONE_FIELDS`]; [`VerificationError::InvalidAmount`] if the amount
/// cannot be formatted.
pub fn stage_one_digest(outcome: &TransactionOutcome) -> Result<String> {
    outcome.require_all(&STAGE_ONE_FIELDS)?;

    let currency = outcome.require(Field::Currency)?;
    let amount = format_amount(outcome.require(Field::Amount)?, currency)?;

    let mut input = String::new();
    input.push_str(outcome.require(Field::TransactionReference)?);
    input.push_str(outcome.require(Field::TransactionId)?);
    input.push_str(outcome.require(Field::Status)?);
    input.push_str(outcome.require(Field::Domain)?);
    input.push_str(&amount);
    input.push_str(normalize_currency(currency));

    Ok(md5_hex(&input))
}

/// Derive the stage-two digest, i.e. the skey MOLPay should have sent.
///
/// The stage-two fields are checked before stage one is derived, so a missing
/// verify key is reported even when every stage-one field is present.
pub fn stage_two_digest(outcome: &TransactionOutcome) -> Result<String> {
    outcome.require_all(&STAGE_TWO_FIELDS)?;

    let pre_skey = stage_one_digest(outcome)?;

    let mut input = String::new();
    input.push_str(outcome.require(Field::PayDate)?);
    input.push_str(outcome.require(Field::Domain)?);
    input.push_str(&pre_skey);
    input.push_str(outcome.require(Field::AppCode)?);
    input.push_str(outcome.require(Field::VerifyKey)?);

    Ok(md5_hex(&input))
}

/// Verify a MOLPay callback.
///
/// 1. An error message from MOLPay rejects the callback as
///    [`VerificationError::Upstream`] without checking the skey.
/// 2. The received skey must be present.
/// 3. The expected skey is derived; validation errors propagate unchanged.
/// 4. The two are compared with exact string equality.
///
/// On success only status, order number and MOLPay transaction ID are returned.
///
/// # Examples
///
/// ```
/// use molpay_lib::{signature, TransactionOutcome, VerificationError};
///
/// let outcome = TransactionOutcome::new()
///     .with_amount("10.00")
///     .with_currency("MYR")
///     .with_domain("D1")
///     .with_status("00")
///     .with_transaction_id("ORD1")
///     .with_transaction_reference("TXN1")
///     .with_app_code("APP")
///     .with_pay_date("2024-01-01 10:00:00")
///     .with_verify_key("key");
///
/// let skey = signature::stage_two_digest(&outcome).unwrap();
///
/// let verified = signature::verify(&outcome.clone().with_signature(skey)).unwrap();
/// assert_eq!(verified.transaction_id, "ORD1");
///
/// let forged = outcome.with_signature("0".repeat(32));
/// assert_eq!(signature::verify(&forged), Err(VerificationError::SignatureMismatch));
/// ```
pub fn verify(outcome: &TransactionOutcome) -> Result<VerifiedOutcome> {
    if let Some(message) = &outcome.error_message {
        return Err(VerificationError::Upstream(message.clone()));
    }

    let received = outcome.require(Field::ReceivedSignature)?;
    let expected = stage_two_digest(outcome)?;

    // Plain equality: both sides are lowercase hex by construction.
    if expected != received {
        return Err(VerificationError::SignatureMismatch);
    }

    Ok(VerifiedOutcome {
        status: outcome.require(Field::Status)?.to_string(),
        transaction_id: outcome.require(Field::TransactionId)?.to_string(),
        transaction_reference: outcome.require(Field::TransactionReference)?.to_string(),
    })
}

/// Stateless verifier, for callers that want a value to hold or share.
#[derive(Clone, Copy, Debug, Default)]
pub struct SignatureVerifier;

impl SignatureVerifier {
    /// Create a verifier.
    pub fn new() -> Self {
        Self
    }

    /// See [`normalize_currency`].
    pub fn normalize_currency<'a>(&self, code: &'a str) -> &'a str {
        normalize_currency(code)
    }

    /// See [`stage_one_digest`].
    pub fn stage_one_digest(&self, outcome: &TransactionOutcome) -> Result<String> {
        stage_one_digest(outcome)
    }

    /// See [`stage_two_digest`].
    pub fn stage_two_digest(&self, outcome: &TransactionOutcome) -> Result<String> {
        stage_two_digest(outcome)
    }

    /// See [`verify`].
    pub fn verify(&self, outcome: &TransactionOutcome) -> Result<VerifiedOutcome> {
        verify(outcome)
    }
}
