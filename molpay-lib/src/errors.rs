//! Error types for MOLPay callback verification.
//!
//! Every rejection is returned as a value. The variants are kept distinct so a
//! caller can never mistake a forged callback for a missing parameter or for an
//! error the processor reported itself.

use std::fmt;

/// Error codes for FFI and service integration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum VerificationErrorCode {
    /// A required callback field was missing
    ValidationFailed = 5001,
    /// The amount could not be rendered in its signed form
    InvalidAmount = 5002,
    /// MOLPay reported an error in the callback itself
    Upstream = 6000,
    /// The received skey does not match the derived one
    SignatureMismatch = 6001,
}

/// A callback parameter taking part in verification.
///
/// `as_str` yields the parameter name used by the gateway protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Amount,
    Currency,
    Domain,
    Status,
    TransactionId,
    TransactionReference,
    AppCode,
    PayDate,
    VerifyKey,
    ReceivedSignature,
}

impl Field {
    /// Protocol name of the parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Currency => "currency",
            Self::Domain => "domain",
            Self::Status => "status",
            Self::TransactionId => "transactionId",
            Self::TransactionReference => "transactionReference",
            Self::AppCode => "appCode",
            Self::PayDate => "payDate",
            Self::VerifyKey => "verifyKey",
            Self::ReceivedSignature => "receivedSignature",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reasons a MOLPay callback is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// A required field was absent or empty.
    #[error("The {0} parameter is required")]
    Validation(Field),

    /// The amount is present but cannot be formatted for signing.
    #[error("invalid amount {value:?}: {reason}")]
    InvalidAmount {
        /// Amount as received
        value: String,
        /// Why it was rejected
        reason: String,
    },

    /// MOLPay flagged the transaction with an error message. Surfaced verbatim.
    #[error("{0}")]
    Upstream(String),

    /// The derived skey does not match the received one.
    #[error("Invalid security key")]
    SignatureMismatch,
}

impl VerificationError {
    /// Get the error code for FFI/service integration.
    pub fn code(&self) -> VerificationErrorCode {
        match self {
            Self::Validation(_) => VerificationErrorCode::ValidationFailed,
            Self::InvalidAmount { .. } => VerificationErrorCode::InvalidAmount,
            Self::Upstream(_) => VerificationErrorCode::Upstream,
            Self::SignatureMismatch => VerificationErrorCode::SignatureMismatch,
        }
    }

    /// Get the error message as an owned String (useful for FFI).
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Verification is deterministic, so retrying can never turn a rejection
    /// into an acceptance.
    pub fn is_retryable(&self) -> bool {
        false
    }

    /// Returns true when the callback may have been forged or tampered with.
    pub fn is_security_failure(&self) -> bool {
        matches!(self, Self::SignatureMismatch)
    }

    /// The missing field, for validation failures.
    pub fn missing_field(&self) -> Option<Field> {
        match self {
            Self::Validation(field) => Some(*field),
            _ => None,
        }
    }

    /// Create an invalid amount error.
    pub fn invalid_amount(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to deliver the IPN acknowledgement to MOLPay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AcknowledgeError {
    /// The transport could not deliver the request.
    #[error("transport error: {0}")]
    Transport(String),

    /// MOLPay answered with an unexpected response.
    #[error("acknowledgement rejected: {0}")]
    Rejected(String),
}

impl AcknowledgeError {
    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            VerificationError::Validation(Field::Amount).code(),
            VerificationErrorCode::ValidationFailed
        );
        assert_eq!(
            VerificationError::Upstream("x".into()).code(),
            VerificationErrorCode::Upstream
        );
        assert_eq!(
            VerificationError::SignatureMismatch.code(),
            VerificationErrorCode::SignatureMismatch
        );
        assert_eq!(VerificationErrorCode::SignatureMismatch as i32, 6001);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            VerificationError::SignatureMismatch.to_string(),
            "Invalid security key"
        );
        assert_eq!(
            VerificationError::Upstream("Bank declined".into()).to_string(),
            "Bank declined"
        );
        assert_eq!(
            VerificationError::Validation(Field::PayDate).to_string(),
            "The payDate parameter is required"
        );
    }

    #[test]
    fn test_never_retryable() {
        let errors = [
            VerificationError::Validation(Field::Status),
            VerificationError::invalid_amount("abc", "not a number"),
            VerificationError::Upstream("timeout".into()),
            VerificationError::SignatureMismatch,
        ];
        for err in errors {
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn test_security_failure_only_for_mismatch() {
        assert!(VerificationError::SignatureMismatch.is_security_failure());
        assert!(!VerificationError::Upstream("x".into()).is_security_failure());
        assert_eq!(
            VerificationError::Validation(Field::VerifyKey).missing_field(),
            Some(Field::VerifyKey)
        );
        assert_eq!(VerificationError::SignatureMismatch.missing_field(), None);
    }
}
