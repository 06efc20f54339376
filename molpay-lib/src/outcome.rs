//! Callback data as received from MOLPay and as handed back once verified.

use crate::config::MerchantConfig;
use crate::errors::{Field, VerificationError};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction result parameters from a MOLPay return or notification callback.
///
/// Every field is optional because the callback is untrusted input. Presence is
/// checked lazily, when a digest is derived, so the error names the first field
/// missing for the stage that needs it. Fields stay public for building and
/// merging an outcome; verification only ever borrows it, so the data that was
/// checked is the data that was received.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TransactionOutcome {
    /// Amount as a fixed-point decimal string, e.g. "10.00".
    pub amount: Option<String>,
    /// Currency code as known to the merchant, e.g. "MYR".
    #[serde(alias = "currency")]
    pub currency_code: Option<String>,
    /// Merchant ID at MOLPay.
    #[serde(alias = "domain")]
    pub domain_id: Option<String>,
    /// Merchant order or invoice number.
    pub transaction_id: Option<String>,
    /// Transaction ID generated by MOLPay.
    pub transaction_reference: Option<String>,
    /// Payment status code, see [`PaymentStatus`].
    pub status: Option<String>,
    /// Bank approval code.
    pub app_code: Option<String>,
    /// Date and time of the transaction as formatted by MOLPay.
    pub pay_date: Option<String>,
    /// Verify key issued to the merchant by MOLPay.
    ///
    /// Never read from or written to the wire; it comes from configuration.
    #[serde(skip)]
    pub verify_key: Option<String>,
    /// The skey sent with the callback.
    #[serde(alias = "sKey")]
    pub received_signature: Option<String>,
    /// Set when MOLPay reports an error instead of a payment result.
    pub error_message: Option<String>,
}

impl TransactionOutcome {
    /// Create an empty outcome.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the amount.
    pub fn with_amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Set the currency code.
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency_code = Some(currency.into());
        self
    }

    /// Set the merchant domain.
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain_id = Some(domain.into());
        self
    }

    /// Set the merchant order number.
    pub fn with_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }

    /// Set the MOLPay transaction ID.
    pub fn with_transaction_reference(mut self, reference: impl Into<String>) -> Self {
        self.transaction_reference = Some(reference.into());
        self
    }

    /// Set the status code.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Set the bank approval code.
    pub fn with_app_code(mut self, app_code: impl Into<String>) -> Self {
        self.app_code = Some(app_code.into());
        self
    }

    /// Set the payment date.
    pub fn with_pay_date(mut self, pay_date: impl Into<String>) -> Self {
        self.pay_date = Some(pay_date.into());
        self
    }

    /// Set the verify key.
    pub fn with_verify_key(mut self, verify_key: impl Into<String>) -> Self {
        self.verify_key = Some(verify_key.into());
        self
    }

    /// Set the received skey.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.received_signature = Some(signature.into());
        self
    }

    /// Set the error message reported by MOLPay.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Fill in merchant settings the callback does not carry.
    ///
    /// The verify key is always replaced by the configured one. The domain is
    /// taken from configuration only when the callback carries none.
    pub fn with_merchant(mut self, config: &MerchantConfig) -> Self {
        self.verify_key = Some(config.verify_key.clone());
        if self.domain_id.is_none() {
            self.domain_id = Some(config.merchant_id.clone());
        }
        self
    }

    /// Look up a field taking part in verification.
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::Amount => &self.amount,
            Field::Currency => &self.currency_code,
            Field::Domain => &self.domain_id,
            Field::Status => &self.status,
            Field::TransactionId => &self.transaction_id,
            Field::TransactionReference => &self.transaction_reference,
            Field::AppCode => &self.app_code,
            Field::PayDate => &self.pay_date,
            Field::VerifyKey => &self.verify_key,
            Field::ReceivedSignature => &self.received_signature,
        };
        value.as_deref()
    }

    /// Fetch a field that must be present and non-empty.
    pub fn require(&self, field: Field) -> Result<&str> {
        match self.get(field) {
            Some(value) if !value.is_empty() => Ok(value),
            _ => Err(VerificationError::Validation(field)),
        }
    }

    /// Check that all `fields` are present, stopping at the first missing one.
    pub fn require_all(&self, fields: &[Field]) -> Result<()> {
        fields.iter().try_for_each(|field| self.require(*field).map(|_| ()))
    }
}

// Hand-written so the verify key never ends up in logs.
impl fmt::Debug for TransactionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransactionOutcome")
            .field("amount", &self.amount)
            .field("currency_code", &self.currency_code)
            .field("domain_id", &self.domain_id)
            .field("transaction_id", &self.transaction_id)
            .field("transaction_reference", &self.transaction_reference)
            .field("status", &self.status)
            .field("app_code", &self.app_code)
            .field("pay_date", &self.pay_date)
            .field("verify_key", &self.verify_key.as_ref().map(|_| "<redacted>"))
            .field("received_signature", &self.received_signature)
            .field("error_message", &self.error_message)
            .finish()
    }
}

/// MOLPay payment status codes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum PaymentStatus {
    /// "00"
    Success,
    /// "11"
    Failure,
    /// "22"
    Pending,
    /// Any code the protocol does not define.
    Unknown(String),
}

impl PaymentStatus {
    pub const SUCCESS: &'static str = "00";
    pub const FAILURE: &'static str = "11";
    pub const PENDING: &'static str = "22";

    /// Parse a raw status code.
    pub fn from_code(code: &str) -> Self {
        match code {
            Self::SUCCESS => Self::Success,
            Self::FAILURE => Self::Failure,
            Self::PENDING => Self::Pending,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The raw status code.
    pub fn as_code(&self) -> &str {
        match self {
            Self::Success => Self::SUCCESS,
            Self::Failure => Self::FAILURE,
            Self::Pending => Self::PENDING,
            Self::Unknown(code) => code,
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Failure => write!(f, "failure"),
            Self::Pending => write!(f, "pending"),
            Self::Unknown(code) => write!(f, "unknown status {}", code),
        }
    }
}

/// The part of a callback that is handed to the application after the skey
/// checks out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifiedOutcome {
    /// Raw status code, passed through unchanged.
    pub status: String,
    /// Merchant order number.
    pub transaction_id: String,
    /// MOLPay transaction ID.
    pub transaction_reference: String,
}

impl VerifiedOutcome {
    /// Interpret the status code.
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_code(&self.status)
    }

    /// True for status "00".
    pub fn is_successful(&self) -> bool {
        self.payment_status() == PaymentStatus::Success
    }

    /// True for status "22".
    pub fn is_pending(&self) -> bool {
        self.payment_status() == PaymentStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_treats_empty_as_missing() {
        let outcome = TransactionOutcome::new().with_amount("").with_status("00");
        assert_eq!(
            outcome.require(Field::Amount),
            Err(VerificationError::Validation(Field::Amount))
        );
        assert_eq!(outcome.require(Field::Status), Ok("00"));
        assert_eq!(
            outcome.require(Field::PayDate),
            Err(VerificationError::Validation(Field::PayDate))
        );
    }

    #[test]
    fn test_require_all_reports_first_missing() {
        let outcome = TransactionOutcome::new().with_amount("1.00");
        let err = outcome
            .require_all(&[Field::Amount, Field::Currency, Field::Domain])
            .unwrap_err();
        assert_eq!(err, VerificationError::Validation(Field::Currency));
    }

    #[test]
    fn test_with_merchant_overrides_verify_key() {
        let config = MerchantConfig::new("CONFIG_DOMAIN", "config-key");

        let outcome = TransactionOutcome::new()
            .with_domain("CALLBACK_DOMAIN")
            .with_verify_key("foreign-key")
            .with_merchant(&config);
        assert_eq!(outcome.domain_id.as_deref(), Some("CALLBACK_DOMAIN"));
        assert_eq!(outcome.verify_key.as_deref(), Some("config-key"));

        let outcome = TransactionOutcome::new().with_merchant(&config);
        assert_eq!(outcome.domain_id.as_deref(), Some("CONFIG_DOMAIN"));
    }

    #[test]
    fn test_serialize_omits_verify_key() {
        let outcome = TransactionOutcome::new()
            .with_status("00")
            .with_verify_key("super-secret");
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(!json.contains("super-secret"));
        assert!(!json.contains("verifyKey"));
    }

    #[test]
    fn test_debug_redacts_verify_key() {
        let outcome = TransactionOutcome::new().with_verify_key("super-secret");
        let debug = format!("{:?}", outcome);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_deserialize_camel_case_and_aliases() {
        let outcome: TransactionOutcome = serde_json::from_str(
            r#"{"amount":"10.00","currency":"MYR","domain":"D1","sKey":"abc","payDate":"2024-01-01","verifyKey":"foreign"}"#,
        )
        .unwrap();
        assert_eq!(outcome.currency_code.as_deref(), Some("MYR"));
        assert_eq!(outcome.domain_id.as_deref(), Some("D1"));
        assert_eq!(outcome.received_signature.as_deref(), Some("abc"));
        assert_eq!(outcome.pay_date.as_deref(), Some("2024-01-01"));
        assert!(outcome.error_message.is_none());
        assert!(outcome.verify_key.is_none());
    }

    #[test]
    fn test_payment_status_codes() {
        assert_eq!(PaymentStatus::from_code("00"), PaymentStatus::Success);
        assert_eq!(PaymentStatus::from_code("11"), PaymentStatus::Failure);
        assert_eq!(PaymentStatus::from_code("22"), PaymentStatus::Pending);
        assert_eq!(
            PaymentStatus::from_code("99"),
            PaymentStatus::Unknown("99".into())
        );
        assert_eq!(PaymentStatus::Unknown("99".into()).as_code(), "99");
    }

    #[test]
    fn test_verified_outcome_helpers() {
        let verified = VerifiedOutcome {
            status: "22".into(),
            transaction_id: "ORD1".into(),
            transaction_reference: "TXN1".into(),
        };
        assert!(verified.is_pending());
        assert!(!verified.is_successful());
    }
}
