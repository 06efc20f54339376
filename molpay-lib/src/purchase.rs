//! Purchase completion: verify the callback, then optionally acknowledge it.

use crate::config::MerchantConfig;
use crate::errors::{AcknowledgeError, VerificationError};
use crate::ipn::{IpnAcknowledger, IpnPayload};
use crate::outcome::{PaymentStatus, TransactionOutcome, VerifiedOutcome};
use crate::signature;

/// Result of a completed purchase, handed to the merchant application.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletePurchaseResponse {
    outcome: VerifiedOutcome,
}

impl CompletePurchaseResponse {
    /// Wrap a verified outcome.
    pub fn new(outcome: VerifiedOutcome) -> Self {
        Self { outcome }
    }

    /// The verified callback data.
    pub fn outcome(&self) -> &VerifiedOutcome {
        &self.outcome
    }

    /// Consume the response, returning the verified outcome.
    pub fn into_outcome(self) -> VerifiedOutcome {
        self.outcome
    }

    /// Payment went through.
    pub fn is_successful(&self) -> bool {
        self.outcome.is_successful()
    }

    /// Payment is still being processed by the bank.
    pub fn is_pending(&self) -> bool {
        self.outcome.is_pending()
    }

    /// Completion never redirects.
    pub fn is_redirect(&self) -> bool {
        false
    }

    /// Merchant order number.
    pub fn transaction_id(&self) -> &str {
        &self.outcome.transaction_id
    }

    /// MOLPay transaction ID.
    pub fn transaction_reference(&self) -> &str {
        &self.outcome.transaction_reference
    }

    /// Short human readable description of the status.
    pub fn message(&self) -> String {
        match self.outcome.payment_status() {
            PaymentStatus::Success => "Payment successful".to_string(),
            PaymentStatus::Failure => "Payment failed".to_string(),
            PaymentStatus::Pending => "Payment pending".to_string(),
            PaymentStatus::Unknown(code) => format!("Unknown payment status {}", code),
        }
    }
}

/// Why a purchase could not be completed.
#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    /// The callback was rejected. No acknowledgement was sent.
    #[error(transparent)]
    Verification(#[from] VerificationError),

    /// The callback is authentic but the IPN acknowledgement failed. The
    /// verified outcome is still returned so the order can be processed.
    #[error("callback verified but IPN acknowledgement failed: {source}")]
    Acknowledge {
        /// The verified callback data
        outcome: VerifiedOutcome,
        /// Delivery failure
        source: AcknowledgeError,
    },
}

/// Verify a callback and, when enabled, acknowledge it to MOLPay.
///
/// The merchant settings are merged into `outcome` (see
/// [`TransactionOutcome::with_merchant`]) before verification. The
/// acknowledgement is only sent for a verified callback and only when
/// `config.enable_ipn` is set.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        skip(outcome, config, acknowledger),
        fields(order = ?outcome.transaction_id, tran_id = ?outcome.transaction_reference)
    )
)]
pub async fn complete_purchase(
    outcome: &TransactionOutcome,
    config: &MerchantConfig,
    acknowledger: &dyn IpnAcknowledger,
) -> Result<CompletePurchaseResponse, CompletionError> {
    let merged = outcome.clone().with_merchant(config);

    let verified = match signature::verify(&merged) {
        Ok(verified) => verified,
        Err(err) => {
            #[cfg(feature = "tracing")]
            {
                if err.is_security_failure() {
                    tracing::warn!(code = ?err.code(), "rejected MOLPay callback: {err}");
                } else {
                    tracing::debug!(code = ?err.code(), "rejected MOLPay callback: {err}");
                }
            }
            return Err(err.into());
        }
    };

    if config.enable_ipn {
        let payload = IpnPayload::from_outcome(&merged);
        if let Err(source) = acknowledger.acknowledge(config.ipn_endpoint(), &payload).await {
            #[cfg(feature = "tracing")]
            tracing::warn!("IPN acknowledgement failed: {source}");
            return Err(CompletionError::Acknowledge {
                outcome: verified,
                source,
            });
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(endpoint = config.ipn_endpoint(), "IPN acknowledged");
    }

    Ok(CompletePurchaseResponse::new(verified))
}
