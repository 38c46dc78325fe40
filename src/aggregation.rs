//! Balance and total calculations over a transaction list.
//!
//! The functions here take the in-memory transaction list (typically the
//! latest store snapshot) rather than querying the database so the same
//! figures can be derived for any subset of rows.

use crate::{currency::format_brl, models::Transaction, models::TransactionKind};

/// Sums the amounts of all income transactions.
pub fn total_income(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind == TransactionKind::Income)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Sums the amounts of all transactions that are not income.
pub fn total_expense(transactions: &[Transaction]) -> f64 {
    transactions
        .iter()
        .filter(|transaction| transaction.kind != TransactionKind::Income)
        .map(|transaction| transaction.amount)
        .sum()
}

/// Calculates the account balance: income minus expenses.
pub fn balance(transactions: &[Transaction]) -> f64 {
    total_income(transactions) - total_expense(transactions)
}

/// Formats the total income as a Brazilian real amount.
pub fn total_income_display(transactions: &[Transaction]) -> String {
    format_brl(total_income(transactions))
}

/// Formats the total expense as a Brazilian real amount.
pub fn total_expense_display(transactions: &[Transaction]) -> String {
    format_brl(total_expense(transactions))
}

/// Formats the balance as a Brazilian real amount.
pub fn balance_display(transactions: &[Transaction]) -> String {
    format_brl(balance(transactions))
}

#[cfg(test)]
mod aggregation_tests {
    use time::macros::date;

    use crate::models::{Transaction, TransactionKind};

    use super::{
        balance, balance_display, total_expense, total_expense_display, total_income,
        total_income_display,
    };

    fn create_test_transaction(amount: f64, kind: TransactionKind) -> Transaction {
        Transaction {
            id: 1,
            title: "Test".to_owned(),
            amount,
            date: date!(2024 - 01 - 15),
            kind,
        }
    }

    fn sample_transactions() -> Vec<Transaction> {
        vec![
            create_test_transaction(60.0, TransactionKind::Income),
            create_test_transaction(40.0, TransactionKind::Income),
            create_test_transaction(25.0, TransactionKind::Expense),
            create_test_transaction(15.0, TransactionKind::Expense),
        ]
    }

    #[test]
    fn totals_split_by_kind() {
        let transactions = sample_transactions();

        assert_eq!(total_income(&transactions), 100.0);
        assert_eq!(total_expense(&transactions), 40.0);
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let transactions = sample_transactions();

        assert_eq!(
            balance(&transactions),
            total_income(&transactions) - total_expense(&transactions)
        );
        assert_eq!(balance(&transactions), 60.0);
    }

    #[test]
    fn adding_an_income_raises_balance_and_income_only() {
        let mut transactions = sample_transactions();
        let before = (
            balance(&transactions),
            total_income(&transactions),
            total_expense(&transactions),
        );

        transactions.push(create_test_transaction(30.0, TransactionKind::Income));

        assert_eq!(balance(&transactions), before.0 + 30.0);
        assert_eq!(total_income(&transactions), before.1 + 30.0);
        assert_eq!(total_expense(&transactions), before.2);
    }

    #[test]
    fn adding_an_expense_lowers_balance_and_raises_expense_only() {
        let mut transactions = sample_transactions();
        let before = (
            balance(&transactions),
            total_income(&transactions),
            total_expense(&transactions),
        );

        transactions.push(create_test_transaction(30.0, TransactionKind::Expense));

        assert_eq!(balance(&transactions), before.0 - 30.0);
        assert_eq!(total_income(&transactions), before.1);
        assert_eq!(total_expense(&transactions), before.2 + 30.0);
    }

    #[test]
    fn empty_list_has_zero_totals() {
        assert_eq!(total_income(&[]), 0.0);
        assert_eq!(total_expense(&[]), 0.0);
        assert_eq!(balance(&[]), 0.0);
    }

    #[test]
    fn display_totals_use_brazilian_real_format() {
        let transactions = sample_transactions();

        assert_eq!(total_income_display(&transactions), "R$ 100,00");
        assert_eq!(total_expense_display(&transactions), "R$ 40,00");
        assert_eq!(balance_display(&transactions), "R$ 60,00");
    }

    #[test]
    fn negative_balance_is_formatted_with_sign() {
        let transactions = vec![
            create_test_transaction(10.0, TransactionKind::Income),
            create_test_transaction(50.0, TransactionKind::Expense),
        ];

        assert_eq!(balance(&transactions), -40.0);
        assert_eq!(balance_display(&transactions), "-R$ 40,00");
    }
}
