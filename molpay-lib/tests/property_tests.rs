//! Property-based tests for skey derivation and verification.
//!
//! These tests use proptest to verify invariants across a wide range of inputs.

#[cfg(test)]
mod signature_properties {
    use molpay_lib::signature::md5_hex;
    use molpay_lib::{
        normalize_currency, stage_one_digest, stage_two_digest, verify, TransactionOutcome,
        VerificationError,
    };
    use proptest::prelude::*;

    fn outcome_strategy() -> impl Strategy<Value = TransactionOutcome> {
        (
            "[A-Z0-9]{1,12}",
            "[A-Za-z0-9-]{1,16}",
            prop_oneof![Just("00"), Just("11"), Just("22")],
            "[A-Za-z0-9_]{1,10}",
            (0u64..10_000_000u64),
            prop_oneof![Just("MYR"), Just("USD"), Just("SGD"), Just("THB")],
            "[A-Za-z0-9]{1,8}",
            "[0-9 :-]{1,19}",
            "[a-f0-9]{32}",
        )
            .prop_map(
                |(reference, order, status, domain, cents, currency, app, date, key)| {
                    TransactionOutcome::new()
                        .with_transaction_reference(reference)
                        .with_transaction_id(order)
                        .with_status(status)
                        .with_domain(domain)
                        .with_amount(format!("{}.{:02}", cents / 100, cents % 100))
                        .with_currency(currency)
                        .with_app_code(app)
                        .with_pay_date(date)
                        .with_verify_key(key)
                },
            )
    }

    proptest! {
        /// Only MYR is rewritten
        #[test]
        fn currency_passthrough(code in "[A-Z]{0,4}") {
            let normalized = normalize_currency(&code);
            if code == "MYR" {
                prop_assert_eq!(normalized, "RM");
            } else {
                prop_assert_eq!(normalized, code.as_str());
            }
        }

        /// Stage one is the MD5 of the plain concatenation for pre-formatted amounts
        #[test]
        fn stage_one_matches_formula(outcome in outcome_strategy()) {
            let expected = md5_hex(&format!(
                "{}{}{}{}{}{}",
                outcome.transaction_reference.as_deref().unwrap(),
                outcome.transaction_id.as_deref().unwrap(),
                outcome.status.as_deref().unwrap(),
                outcome.domain_id.as_deref().unwrap(),
                outcome.amount.as_deref().unwrap(),
                normalize_currency(outcome.currency_code.as_deref().unwrap()),
            ));
            prop_assert_eq!(stage_one_digest(&outcome).unwrap(), expected);
        }

        /// Derivation is deterministic and independent of the received skey
        #[test]
        fn derivation_deterministic(outcome in outcome_strategy(), skey in "[a-f0-9]{32}") {
            let first = stage_two_digest(&outcome).unwrap();
            let second = stage_two_digest(&outcome).unwrap();
            let signed = stage_two_digest(&outcome.clone().with_signature(skey)).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(&first, &signed);
        }

        /// The derived skey always verifies and echoes the three identifiers
        #[test]
        fn derived_skey_verifies(outcome in outcome_strategy()) {
            let skey = stage_two_digest(&outcome).unwrap();
            let verified = verify(&outcome.clone().with_signature(skey)).unwrap();
            prop_assert_eq!(Some(verified.status.as_str()), outcome.status.as_deref());
            prop_assert_eq!(Some(verified.transaction_id.as_str()), outcome.transaction_id.as_deref());
            prop_assert_eq!(
                Some(verified.transaction_reference.as_str()),
                outcome.transaction_reference.as_deref()
            );
        }

        /// Changing a single character of the skey always yields a mismatch
        #[test]
        fn single_char_change_rejected(
            outcome in outcome_strategy(),
            index in 0usize..32,
            replacement in prop::char::range('0', 'z'),
        ) {
            let skey = stage_two_digest(&outcome).unwrap();
            let mut chars: Vec<char> = skey.chars().collect();
            prop_assume!(chars[index] != replacement);
            chars[index] = replacement;
            let tampered: String = chars.into_iter().collect();

            prop_assert_eq!(
                verify(&outcome.with_signature(tampered)),
                Err(VerificationError::SignatureMismatch)
            );
        }

        /// An error message always wins over a valid skey
        #[test]
        fn error_message_always_upstream(outcome in outcome_strategy(), message in ".{0,40}") {
            let skey = stage_two_digest(&outcome).unwrap();
            let outcome = outcome.with_signature(skey).with_error_message(message.clone());
            prop_assert_eq!(verify(&outcome), Err(VerificationError::Upstream(message)));
        }
    }
}
