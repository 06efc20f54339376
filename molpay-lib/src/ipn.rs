//! IPN (Instant Payment Notification) acknowledgement.
//!
//! After a callback has been verified the merchant may echo it back to MOLPay
//! so the processor knows the notification arrived. Delivery is done by the
//! embedding application through [`IpnAcknowledger`]; this module only builds
//! the request.

use crate::errors::AcknowledgeError;
use crate::outcome::TransactionOutcome;
use async_trait::async_trait;
use serde::Serialize;

/// Marker parameter MOLPay expects on every acknowledgement.
pub const TREQ_PARAM: (&str, &str) = ("treq", "1");

/// Parameters of an IPN acknowledgement, under their MOLPay wire names.
///
/// Order is fixed so the encoded body is deterministic. Fields absent from the
/// callback are left out.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct IpnPayload {
    params: Vec<(&'static str, String)>,
}

impl IpnPayload {
    /// Build the acknowledgement for a received callback.
    pub fn from_outcome(outcome: &TransactionOutcome) -> Self {
        let wire = [
            ("tranID", &outcome.transaction_reference),
            ("orderid", &outcome.transaction_id),
            ("status", &outcome.status),
            ("domain", &outcome.domain_id),
            ("amount", &outcome.amount),
            ("currency", &outcome.currency_code),
            ("appcode", &outcome.app_code),
            ("paydate", &outcome.pay_date),
            ("skey", &outcome.received_signature),
        ];

        let mut params: Vec<(&'static str, String)> = wire
            .into_iter()
            .filter_map(|(name, value)| value.as_ref().map(|v| (name, v.clone())))
            .collect();
        params.push((TREQ_PARAM.0, TREQ_PARAM.1.to_string()));

        Self { params }
    }

    /// The parameters in wire order.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// Value of a single parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Delivers IPN acknowledgements to MOLPay.
///
/// Implementations own the HTTP client along with any timeout and retry
/// policy.
#[async_trait]
pub trait IpnAcknowledger: Send + Sync {
    /// POST `payload` to `endpoint`.
    async fn acknowledge(
        &self,
        endpoint: &str,
        payload: &IpnPayload,
    ) -> Result<(), AcknowledgeError>;
}
