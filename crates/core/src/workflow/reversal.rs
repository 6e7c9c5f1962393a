//! Reversal service: constructs the negating entries for a compensating
//! transaction when voiding a completed transaction.
//!
//! Grounded on the teacher's `ReversalService` (debit/credit swap, memo
//! prefix), adapted to this domain's signed-amount entry model: a
//! reversal negates each original entry's signed amount rather than
//! swapping separate debit/credit columns.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::ReversalError;
use ledger_shared::types::AccountId;

/// One leg of the original transaction being reversed.
#[derive(Debug, Clone)]
pub struct OriginalEntry {
    /// The account the original entry posted to.
    pub account_id: AccountId,
    /// The original entry's signed amount (negative = debit).
    pub amount: Decimal,
}

/// Input for creating a reversing transaction.
#[derive(Debug, Clone)]
pub struct ReversalInput {
    /// The id of the original transaction being voided.
    pub original_transaction_id: Uuid,
    /// The original entries to negate.
    pub original_entries: Vec<OriginalEntry>,
    /// The reason for voiding, recorded in the reversal's description.
    pub reason: String,
}

/// A single negating entry ready to post against the reversing
/// transaction.
#[derive(Debug, Clone)]
pub struct ReversingEntry {
    /// The account to post to (same as the original entry's).
    pub account_id: AccountId,
    /// The negated signed amount.
    pub amount: Decimal,
}

/// Output of constructing a reversal.
#[derive(Debug)]
pub struct ReversalOutput {
    /// The negating entries, one per original entry.
    pub reversing_entries: Vec<ReversingEntry>,
    /// Description to store on the new reversing transaction header.
    pub description: String,
}

/// Stateless service for creating reversing entries.
pub struct ReversalService;

impl ReversalService {
    /// Validates that the original entries are balanced (I1 held at
    /// posting time) and negates each one for the reversing transaction.
    ///
    /// # Errors
    ///
    /// Returns `ReversalError::OriginalUnbalanced` if the original
    /// entries do not sum to zero.
    pub fn create_reversing_entries(input: &ReversalInput) -> Result<ReversalOutput, ReversalError> {
        if !Self::validate_reversal(&input.original_entries) {
            return Err(ReversalError::OriginalUnbalanced(
                input.original_transaction_id,
            ));
        }

        let reversing_entries = input
            .original_entries
            .iter()
            .map(|entry| ReversingEntry {
                account_id: entry.account_id,
                amount: -entry.amount,
            })
            .collect();

        Ok(ReversalOutput {
            reversing_entries,
            description: format!(
                "Reversal of transaction {}. Reason: {}",
                input.original_transaction_id, input.reason
            ),
        })
    }

    /// Returns true if the original entries are safe to reverse.
    ///
    /// I1 (entries sum to zero) only constrains multi-leg originals such
    /// as a transfer's two legs. A single-leg original (a deposit or a
    /// withdrawal) has nothing to balance against and is trivially valid
    /// to reverse: negating its one entry is itself a balanced pair once
    /// posted, so the zero-sum check is skipped for the `len() <= 1`
    /// case rather than applied to the lone entry's own amount.
    #[must_use]
    pub fn validate_reversal(original_entries: &[OriginalEntry]) -> bool {
        if original_entries.len() <= 1 {
            return true;
        }
        let total: Decimal = original_entries.iter().map(|e| e.amount).sum();
        total == Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn balanced_entries() -> Vec<OriginalEntry> {
        vec![
            OriginalEntry {
                account_id: AccountId::new(),
                amount: dec!(-100),
            },
            OriginalEntry {
                account_id: AccountId::new(),
                amount: dec!(100),
            },
        ]
    }

    #[test]
    fn test_create_reversing_entries_negates_amounts() {
        let entries = balanced_entries();
        let original_account = entries[0].account_id;
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: entries,
            reason: "duplicate entry".to_string(),
        };

        let output = ReversalService::create_reversing_entries(&input).unwrap();

        assert_eq!(output.reversing_entries.len(), 2);
        assert_eq!(output.reversing_entries[0].account_id, original_account);
        assert_eq!(output.reversing_entries[0].amount, dec!(100));
        assert_eq!(output.reversing_entries[1].amount, dec!(-100));
    }

    #[test]
    fn test_create_reversing_entries_description_names_reason() {
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: balanced_entries(),
            reason: "customer dispute".to_string(),
        };

        let output = ReversalService::create_reversing_entries(&input).unwrap();

        assert!(output.description.contains("Reversal of transaction"));
        assert!(output.description.contains("customer dispute"));
    }

    #[test]
    fn test_reversing_entries_still_balance() {
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: balanced_entries(),
            reason: "test".to_string(),
        };

        let output = ReversalService::create_reversing_entries(&input).unwrap();
        let total: Decimal = output.reversing_entries.iter().map(|e| e.amount).sum();
        assert_eq!(total, Decimal::ZERO);
    }

    #[test]
    fn test_validate_reversal_balanced() {
        assert!(ReversalService::validate_reversal(&balanced_entries()));
    }

    #[test]
    fn test_validate_reversal_unbalanced() {
        let entries = vec![
            OriginalEntry {
                account_id: AccountId::new(),
                amount: dec!(100),
            },
            OriginalEntry {
                account_id: AccountId::new(),
                amount: dec!(-50),
            },
        ];
        assert!(!ReversalService::validate_reversal(&entries));
    }

    #[test]
    fn test_create_reversing_entries_rejects_unbalanced_multi_leg_original() {
        let entries = vec![
            OriginalEntry {
                account_id: AccountId::new(),
                amount: dec!(100),
            },
            OriginalEntry {
                account_id: AccountId::new(),
                amount: dec!(-30),
            },
        ];
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: entries,
            reason: "bug".to_string(),
        };
        assert!(matches!(
            ReversalService::create_reversing_entries(&input),
            Err(ReversalError::OriginalUnbalanced(_))
        ));
    }

    #[test]
    fn test_create_reversing_entries_accepts_single_leg_original() {
        let entries = vec![OriginalEntry {
            account_id: AccountId::new(),
            amount: dec!(100),
        }];
        let input = ReversalInput {
            original_transaction_id: Uuid::new_v4(),
            original_entries: entries,
            reason: "duplicate deposit".to_string(),
        };

        let output = ReversalService::create_reversing_entries(&input).unwrap();
        assert_eq!(output.reversing_entries.len(), 1);
        assert_eq!(output.reversing_entries[0].amount, dec!(-100));
    }

    #[test]
    fn test_validate_reversal_empty_is_trivially_balanced() {
        assert!(ReversalService::validate_reversal(&[]));
    }
}
