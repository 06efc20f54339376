//! Merchant configuration.
//!
//! Where the settings are stored is up to the embedding application; this
//! module only defines their shape and a loader for environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Live IPN acknowledgement endpoint.
pub const IPN_ENDPOINT_LIVE: &str = "https://www.onlinepayment.com.my/MOLPay/API/chkstat/returnipn.php";

/// Sandbox IPN acknowledgement endpoint.
pub const IPN_ENDPOINT_SANDBOX: &str = "https://sandbox.molpay.com/MOLPay/API/chkstat/returnipn.php";

/// Settings for one MOLPay merchant account.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchantConfig {
    /// Merchant ID (the `domain` parameter).
    pub merchant_id: String,

    /// Verify key issued by MOLPay. Never sent over the wire.
    pub verify_key: String,

    /// Echo verified callbacks back to MOLPay as an IPN acknowledgement.
    #[serde(default)]
    pub enable_ipn: bool,

    /// Use the sandbox endpoints.
    #[serde(default)]
    pub test_mode: bool,
}

impl MerchantConfig {
    /// Create a new merchant configuration.
    pub fn new(merchant_id: impl Into<String>, verify_key: impl Into<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            verify_key: verify_key.into(),
            enable_ipn: false,
            test_mode: false,
        }
    }

    /// Enable or disable IPN acknowledgement.
    pub fn with_ipn(mut self, enabled: bool) -> Self {
        self.enable_ipn = enabled;
        self
    }

    /// Switch between sandbox and live endpoints.
    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    /// IPN endpoint for the configured mode.
    pub fn ipn_endpoint(&self) -> &'static str {
        if self.test_mode {
            IPN_ENDPOINT_SANDBOX
        } else {
            IPN_ENDPOINT_LIVE
        }
    }

    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Load merchant configuration from environment variables.
    ///
    /// Required variables:
    /// - `MOLPAY_MERCHANT_ID` - Merchant ID
    /// - `MOLPAY_VERIFY_KEY` - Verify key
    ///
    /// Optional variables:
    /// - `MOLPAY_ENABLE_IPN` - Send IPN acknowledgements (default: false)
    /// - `MOLPAY_TEST_MODE` - Use sandbox endpoints (default: false)
    ///
    /// # Example
    ///
    /// ```bash
    /// export MOLPAY_MERCHANT_ID=mymerchant
    /// export MOLPAY_VERIFY_KEY=0123456789abcdef
    /// export MOLPAY_ENABLE_IPN=true
    /// ```
    pub fn from_env() -> Option<Self> {
        let merchant_id = std::env::var("MOLPAY_MERCHANT_ID").ok()?;
        let verify_key = std::env::var("MOLPAY_VERIFY_KEY").ok()?;

        let mut config = Self::new(merchant_id, verify_key);

        if let Some(enabled) = env_flag("MOLPAY_ENABLE_IPN") {
            config = config.with_ipn(enabled);
        }

        if let Some(test_mode) = env_flag("MOLPAY_TEST_MODE") {
            config = config.with_test_mode(test_mode);
        }

        Some(config)
    }
}

impl fmt::Debug for MerchantConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerchantConfig")
            .field("merchant_id", &self.merchant_id)
            .field("verify_key", &"<redacted>")
            .field("enable_ipn", &self.enable_ipn)
            .field("test_mode", &self.test_mode)
            .finish()
    }
}

fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().and_then(|s| parse_flag(&s))
}

/// Parse a boolean flag value.
fn parse_flag(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
