//! Merchant Callback Example
//!
//! This example shows a merchant handling a MOLPay return callback:
//! - Merging merchant settings into the callback
//! - Verifying the skey
//! - Acknowledging via IPN
//! - Mapping the status code to an order state
//!
//! # Usage
//!
//! ```bash
//! cargo run --example merchant_callback
//! ```

use async_trait::async_trait;
use molpay_lib::{
    complete_purchase, stage_two_digest, AcknowledgeError, CompletionError, IpnAcknowledger,
    IpnPayload, MerchantConfig, PaymentStatus, TransactionOutcome,
};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq)]
enum OrderStatus {
    AwaitingPayment,
    Paid,
    PaymentFailed,
    PaymentPending,
}

/// Prints the acknowledgement instead of POSTing it.
struct PrintingAcknowledger;

#[async_trait]
impl IpnAcknowledger for PrintingAcknowledger {
    async fn acknowledge(
        &self,
        endpoint: &str,
        payload: &IpnPayload,
    ) -> Result<(), AcknowledgeError> {
        println!("   -> IPN to {}", endpoint);
        for (name, value) in payload.params() {
            println!("      {} = {}", name, value);
        }
        Ok(())
    }
}

/// Simulate what MOLPay sends back for an order.
fn simulated_callback(order_id: &str, status: &str, verify_key: &str) -> TransactionOutcome {
    let outcome = TransactionOutcome::new()
        .with_amount("25.50")
        .with_currency("MYR")
        .with_domain("demo_merchant")
        .with_status(status)
        .with_transaction_id(order_id)
        .with_transaction_reference(format!("MP{}", order_id))
        .with_app_code("APP1")
        .with_pay_date("2024-01-01 10:00:00");

    let skey = stage_two_digest(&outcome.clone().with_verify_key(verify_key))
        .unwrap_or_default();
    outcome.with_signature(skey)
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    println!("=== MOLPay Merchant Callback Example ===\n");

    let config = MerchantConfig::from_env()
        .unwrap_or_else(|| MerchantConfig::new("demo_merchant", "demo_verify_key"))
        .with_ipn(true)
        .with_test_mode(true);
    println!("Config: {:?}\n", config);

    let mut orders: HashMap<String, OrderStatus> = ["INV001", "INV002", "INV003", "INV004"]
        .iter()
        .map(|id| (id.to_string(), OrderStatus::AwaitingPayment))
        .collect();

    let callbacks = vec![
        simulated_callback("INV001", "00", &config.verify_key),
        simulated_callback("INV002", "11", &config.verify_key),
        simulated_callback("INV003", "22", &config.verify_key),
        // Signed with the wrong key: a forged callback
        simulated_callback("INV004", "00", "attacker_key"),
    ];

    let acknowledger = PrintingAcknowledger;

    for callback in callbacks {
        let order_id = callback.transaction_id.clone().unwrap_or_default();
        println!("Callback for {}:", order_id);

        match complete_purchase(&callback, &config, &acknowledger).await {
            Ok(response) => {
                let new_status = match response.outcome().payment_status() {
                    PaymentStatus::Success => OrderStatus::Paid,
                    PaymentStatus::Failure => OrderStatus::PaymentFailed,
                    PaymentStatus::Pending => OrderStatus::PaymentPending,
                    PaymentStatus::Unknown(_) => OrderStatus::AwaitingPayment,
                };
                println!("   {} ({:?})", response.message(), new_status);
                orders.insert(order_id, new_status);
            }
            Err(CompletionError::Verification(err)) => {
                println!("   rejected: {} (code {:?})", err, err.code());
            }
            Err(CompletionError::Acknowledge { outcome, source }) => {
                println!(
                    "   verified {} but IPN failed: {}",
                    outcome.transaction_reference, source
                );
            }
        }
        println!();
    }

    println!("Final order states:");
    let mut ids: Vec<_> = orders.keys().cloned().collect();
    ids.sort();
    for id in ids {
        println!("   {}: {:?}", id, orders[&id]);
    }
}
