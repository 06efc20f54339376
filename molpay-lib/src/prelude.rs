//! Prelude module for convenient imports.
//!
//! ```rust
//! use molpay_lib::prelude::*;
//!
//! let outcome = TransactionOutcome::new().with_status("00");
//! assert_eq!(
//!     verify(&outcome),
//!     Err(VerificationError::Validation(Field::ReceivedSignature))
//! );
//! ```

// Callback data
pub use crate::outcome::{PaymentStatus, TransactionOutcome, VerifiedOutcome};

// Verification
pub use crate::signature::{verify, SignatureVerifier};

// Error handling
pub use crate::errors::{AcknowledgeError, Field, VerificationError, VerificationErrorCode};
pub use crate::Result;

// Configuration and completion
pub use crate::config::MerchantConfig;
pub use crate::ipn::{IpnAcknowledger, IpnPayload};
pub use crate::purchase::{complete_purchase, CompletePurchaseResponse, CompletionError};
