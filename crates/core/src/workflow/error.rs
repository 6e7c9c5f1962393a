//! Reversal error types.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur while constructing or validating a reversal.
#[derive(Debug, Error)]
pub enum ReversalError {
    /// The transaction being reversed is not in a terminal, reversible
    /// state (only `completed` transactions may be reversed).
    #[error("transaction {0} is not completed and cannot be reversed")]
    NotCompleted(Uuid),

    /// The transaction being reversed has already been reversed once.
    #[error("transaction {0} has already been reversed")]
    AlreadyReversed(Uuid),

    /// The original entries supplied for reversal do not sum to zero,
    /// meaning the original transaction itself violated I1.
    #[error("original transaction {0} entries are not balanced and cannot be reversed")]
    OriginalUnbalanced(Uuid),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_transaction() {
        let id = Uuid::nil();
        assert!(ReversalError::NotCompleted(id).to_string().contains(&id.to_string()));
        assert!(
            ReversalError::AlreadyReversed(id)
                .to_string()
                .contains(&id.to_string())
        );
    }
}
