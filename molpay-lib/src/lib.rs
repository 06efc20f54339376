//! MOLPay purchase completion.
//!
//! When a customer finishes paying, MOLPay calls the merchant back with the
//! transaction result and an `skey` hash. This crate decides whether such a
//! callback is authentic and turns it into a verified outcome for the
//! application.
//!
//! The crate stays stateless and does no I/O of its own: the HTTP layer that
//! receives callbacks and delivers IPN acknowledgements is injected by the
//! caller through [`IpnAcknowledger`].
//!
//! # Example
//!
//! ```
//! use molpay_lib::{verify, MerchantConfig, TransactionOutcome, VerificationError};
//!
//! let config = MerchantConfig::new("D100", "secretKey123");
//!
//! let outcome = TransactionOutcome::new()
//!     .with_amount("25.50")
//!     .with_currency("MYR")
//!     .with_status("00")
//!     .with_transaction_id("INV001")
//!     .with_transaction_reference("MP556677")
//!     .with_app_code("APP1")
//!     .with_pay_date("2024-01-01 10:00:00")
//!     .with_signature("not-the-right-skey")
//!     .with_merchant(&config);
//!
//! assert_eq!(verify(&outcome), Err(VerificationError::SignatureMismatch));
//! ```

pub mod config;
pub mod currency;
pub mod errors;
pub mod ipn;
pub mod outcome;
pub mod prelude;
pub mod purchase;
pub mod signature;

pub use config::MerchantConfig;
pub use currency::{format_amount, normalize_currency};
pub use errors::{AcknowledgeError, Field, VerificationError, VerificationErrorCode};
pub use ipn::{IpnAcknowledger, IpnPayload};
pub use outcome::{PaymentStatus, TransactionOutcome, VerifiedOutcome};
pub use purchase::{complete_purchase, CompletePurchaseResponse, CompletionError};
pub use signature::{stage_one_digest, stage_two_digest, verify, SignatureVerifier};

/// Common result alias for verification operations.
pub type Result<T> = std::result::Result<T, VerificationError>;
