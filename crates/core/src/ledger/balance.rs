//! Balance arithmetic.
//!
//! `transaction_entries.amount` is a signed decimal (negative = debit,
//! positive = credit); `balance_after` is always `prior_balance + amount`,
//! computed inside the locked section the repository holds and written
//! atomically with the entry (spec.md §4.1 "balance-after computation").

use rust_decimal::Decimal;

/// Computes the balance immediately after posting a signed entry amount.
#[must_use]
pub fn balance_after(prior_balance: Decimal, signed_amount: Decimal) -> Decimal {
    prior_balance + signed_amount
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_balance_after_credit() {
        assert_eq!(balance_after(dec!(1000), dec!(200)), dec!(1200));
    }

    #[test]
    fn test_balance_after_debit() {
        assert_eq!(balance_after(dec!(1000), dec!(-200)), dec!(800));
    }

    #[test]
    fn test_balance_after_exact_scale() {
        assert_eq!(
            balance_after(dec!(1000.0000), dec!(-1000.0000)),
            dec!(0.0000)
        );
    }
}
