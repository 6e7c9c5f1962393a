//! Property-based tests for [`super::reversal::ReversalService`].

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use ledger_shared::types::AccountId;

use super::error::ReversalError;
use super::reversal::{OriginalEntry, ReversalInput, ReversalService};

/// A nonzero amount with at most 4 decimal places, as the ledger stores.
fn nonzero_amount() -> impl Strategy<Value = Decimal> {
    prop_oneof![
        (1i64..100_000_000i64).prop_map(|c| Decimal::new(c, 4)),
        (1i64..100_000_000i64).prop_map(|c| Decimal::new(-c, 4)),
    ]
}

fn single_leg() -> impl Strategy<Value = Vec<OriginalEntry>> {
    nonzero_amount().prop_map(|amount| {
        vec![OriginalEntry {
            account_id: AccountId::new(),
            amount,
        }]
    })
}

/// A balanced two-leg transfer: one leg, then its exact negation.
fn balanced_transfer_legs() -> impl Strategy<Value = Vec<OriginalEntry>> {
    nonzero_amount().prop_map(|amount| {
        vec![
            OriginalEntry {
                account_id: AccountId::new(),
                amount,
            },
            OriginalEntry {
                account_id: AccountId::new(),
                amount: -amount,
            },
        ]
    })
}

/// An unbalanced two-leg set: a perturbation guarantees the sum is nonzero.
fn unbalanced_two_legs() -> impl Strategy<Value = Vec<OriginalEntry>> {
    (nonzero_amount(), 1i64..1000i64).prop_map(|(amount, drift)| {
        vec![
            OriginalEntry {
                account_id: AccountId::new(),
                amount,
            },
            OriginalEntry {
                account_id: AccountId::new(),
                amount: -amount + Decimal::new(drift, 4),
            },
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// A single-leg original (a deposit or a withdrawal) is always
    /// reversible: I1 only constrains multi-leg originals.
    #[test]
    fn prop_single_leg_original_always_reversible(entries in single_leg()) {
        let original_amount = entries[0].amount;
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: entries,
            reason: "test".to_string(),
        };
        let output = ReversalService::create_reversing_entries(&input).unwrap();
        prop_assert_eq!(output.reversing_entries.len(), 1);
        prop_assert_eq!(output.reversing_entries[0].amount, -original_amount);
    }

    /// A balanced multi-leg original (e.g. a transfer's two legs) is
    /// always reversible, and the reversing entries themselves sum to
    /// zero.
    #[test]
    fn prop_balanced_multi_leg_original_reverses_to_balanced(entries in balanced_transfer_legs()) {
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: entries,
            reason: "test".to_string(),
        };
        let output = ReversalService::create_reversing_entries(&input).unwrap();
        let total: Decimal = output.reversing_entries.iter().map(|e| e.amount).sum();
        prop_assert_eq!(total, Decimal::ZERO);
    }

    /// An unbalanced multi-leg original is always rejected.
    #[test]
    fn prop_unbalanced_multi_leg_original_rejected(entries in unbalanced_two_legs()) {
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: entries,
            reason: "test".to_string(),
        };
        prop_assert!(matches!(
            ReversalService::create_reversing_entries(&input),
            Err(ReversalError::OriginalUnbalanced(_))
        ));
    }

    /// Every reversing entry negates its original entry's amount while
    /// keeping the same account, regardless of leg count.
    #[test]
    fn prop_reversing_entries_negate_and_preserve_account(entries in balanced_transfer_legs()) {
        let originals = entries.clone();
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: entries,
            reason: "test".to_string(),
        };
        let output = ReversalService::create_reversing_entries(&input).unwrap();
        for (original, reversing) in originals.iter().zip(output.reversing_entries.iter()) {
            prop_assert_eq!(reversing.account_id, original.account_id);
            prop_assert_eq!(reversing.amount, -original.amount);
        }
    }
}
