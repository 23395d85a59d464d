//! Creating, editing and deleting transactions while keeping each budget's
//! spent total equal to the sum of its transactions.
//!
//! Every step is a separate statement against the store. When a later step
//! fails the earlier ones are not undone automatically, so each operation
//! orders its steps and compensates in the way described on the function.

use rusqlite::Connection;

use crate::{
    Error, UserID,
    budget::{Budget, BudgetId, adjust_budget_spent, get_budget, get_budgets, validate_amount},
    transaction::{
        NewTransaction, Transaction, TransactionId,
        core::{delete_transaction_row, get_transaction, insert_transaction, update_transaction},
    },
};

/// Record a transaction and add its amount to the budget's spent total.
///
/// Returns the new transaction and the user's budgets after the update.
///
/// If the budget update fails, the inserted transaction is deleted again so
/// that no transaction exists without being counted.
///
/// # Errors
///
/// Returns:
/// - [Error::InvalidAmount] if the amount is not greater than zero.
/// - [Error::InvalidBudget] if the budget does not exist or belongs to another user.
/// - [Error::TransactionRolledBack] if the budget update failed and the transaction was removed.
/// - [Error::RollbackFailed] if the budget update failed and the transaction could not be removed.
pub fn create_transaction(
    new_transaction: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<(Transaction, Vec<Budget>), Error> {
    validate_amount(new_transaction.amount)?;
    ensure_budget_exists(new_transaction.budget_id, user_id, connection)?;

    let transaction = insert_transaction(&new_transaction, user_id, connection)?;

    if let Err(error) = adjust_budget_spent(
        transaction.budget_id,
        user_id,
        transaction.amount,
        connection,
    ) {
        tracing::error!(
            "Could not add transaction {} to budget {}: {error}. Rolling back.",
            transaction.id,
            transaction.budget_id
        );

        return match delete_transaction_row(transaction.id, user_id, connection) {
            Ok(()) => Err(Error::TransactionRolledBack),
            Err(rollback_error) => {
                tracing::error!(
                    "Could not roll back transaction {}: {rollback_error}. \
                    Budget {} no longer matches its transactions.",
                    transaction.id,
                    transaction.budget_id
                );
                Err(Error::RollbackFailed {
                    transaction_id: transaction.id,
                })
            }
        };
    }

    let budgets = get_budgets(user_id, connection)?;

    Ok((transaction, budgets))
}

/// Replace the fields of a transaction and move its amount between budget totals.
///
/// When the budget is unchanged the budget's spent total changes by the
/// difference between the new and old amounts. When the budget changes the
/// old amount is taken off the old budget and the new amount is added to the
/// new budget. If the old budget has been deleted there is nothing to take
/// the old amount off.
///
/// Returns the user's budgets after the update.
///
/// # Errors
///
/// Returns:
/// - [Error::InvalidAmount] if the amount is not greater than zero.
/// - [Error::InvalidBudget] if the new budget does not exist or belongs to another user.
/// - [Error::UpdateMissingTransaction] if the transaction does not exist.
/// - [Error::BudgetReconciliation] if the transaction was updated but a budget
///   total could not be adjusted. The update is kept in that case.
pub fn edit_transaction(
    transaction_id: TransactionId,
    changes: NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    validate_amount(changes.amount)?;
    ensure_budget_exists(changes.budget_id, user_id, connection)?;

    let original = match get_transaction(transaction_id, user_id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::UpdateMissingTransaction),
        Err(error) => return Err(error),
    };

    update_transaction(transaction_id, user_id, &changes, connection)?;

    let reconciliation_error = |budget_id: BudgetId, error: Error| {
        tracing::error!(
            "Transaction {transaction_id} was updated but budget {budget_id} could not be \
            adjusted: {error}. The budget total needs to be reconciled."
        );
        Error::BudgetReconciliation {
            transaction_id,
            budget_id,
        }
    };

    if original.budget_id == changes.budget_id {
        let delta = changes.amount - original.amount;

        if delta != 0.0 {
            adjust_budget_spent(changes.budget_id, user_id, delta, connection)
                .map_err(|error| reconciliation_error(changes.budget_id, error))?;
        }
    } else {
        match adjust_budget_spent(original.budget_id, user_id, -original.amount, connection) {
            Ok(()) => {}
            Err(Error::UpdateMissingBudget) => tracing::warn!(
                "Budget {} of transaction {transaction_id} no longer exists, \
                skipping the decrement.",
                original.budget_id
            ),
            Err(error) => return Err(reconciliation_error(original.budget_id, error)),
        }

        adjust_budget_spent(changes.budget_id, user_id, changes.amount, connection)
            .map_err(|error| reconciliation_error(changes.budget_id, error))?;
    }

    get_budgets(user_id, connection)
}

/// Take a transaction's amount off its budget's spent total, then delete the transaction.
///
/// The transaction is only deleted once the budget update has succeeded, so
/// a failure leaves both untouched. A transaction whose budget has been
/// deleted is deleted directly.
///
/// Returns the user's budgets after the update.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingTransaction] if the transaction does not
/// exist, or the error from the failed step.
pub fn delete_transaction(
    transaction_id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Budget>, Error> {
    let transaction = match get_transaction(transaction_id, user_id, connection) {
        Ok(transaction) => transaction,
        Err(Error::NotFound) => return Err(Error::DeleteMissingTransaction),
        Err(error) => return Err(error),
    };

    match adjust_budget_spent(
        transaction.budget_id,
        user_id,
        -transaction.amount,
        connection,
    ) {
        Ok(()) => {}
        Err(Error::UpdateMissingBudget) => tracing::warn!(
            "Budget {} of transaction {transaction_id} no longer exists, \
            deleting the transaction without a decrement.",
            transaction.budget_id
        ),
        Err(error) => {
            tracing::error!(
                "Could not take transaction {transaction_id} off budget {}: {error}",
                transaction.budget_id
            );
            return Err(error);
        }
    }

    delete_transaction_row(transaction_id, user_id, connection).inspect_err(|error| {
        tracing::error!(
            "Budget {} was decremented but transaction {transaction_id} could not be deleted: \
            {error}. The budget total needs to be reconciled.",
            transaction.budget_id
        )
    })?;

    get_budgets(user_id, connection)
}

fn ensure_budget_exists(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    match get_budget(budget_id, user_id, connection) {
        Ok(_) => Ok(()),
        Err(Error::NotFound) => Err(Error::InvalidBudget(budget_id)),
        Err(error) => Err(error),
    }
}

#[cfg(test)]
mod balance_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, UserID,
        budget::{Budget, BudgetId, BudgetTitle, create_budget, delete_budget, get_budget},
        db::initialize,
        transaction::{
            NewTransaction, TransactionTitle, count_transactions, create_transaction,
            delete_transaction, edit_transaction, get_transaction,
        },
    };

    const USER: UserID = UserID::new(1);

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn new_budget(title: &str, amount: f64, connection: &Connection) -> Budget {
        create_budget(BudgetTitle::new_unchecked(title), amount, USER, connection).unwrap()
    }

    fn new_transaction(amount: f64, budget_id: BudgetId) -> NewTransaction {
        NewTransaction {
            title: TransactionTitle::new_unchecked("Test"),
            amount,
            date: date!(2025 - 05 - 20),
            budget_id,
        }
    }

    fn spent(budget_id: BudgetId, connection: &Connection) -> f64 {
        get_budget(budget_id, USER, connection).unwrap().spent
    }

    fn sum_of_transactions(budget_id: BudgetId, connection: &Connection) -> f64 {
        connection
            .query_row(
                "SELECT ROUND(COALESCE(SUM(amount), 0), 2) FROM \"transaction\"
                WHERE budget_id = ?1",
                [budget_id],
                |row| row.get(0),
            )
            .unwrap()
    }

    #[track_caller]
    fn assert_budget_matches_transactions(budget_id: BudgetId, connection: &Connection) {
        assert_eq!(
            spent(budget_id, connection),
            sum_of_transactions(budget_id, connection),
            "spent total of budget {budget_id} does not match its transactions"
        );
    }

    fn fail_spent_updates(connection: &Connection) {
        connection
            .execute_batch(
                "CREATE TRIGGER fail_spent_update BEFORE UPDATE OF spent ON budget
                BEGIN SELECT RAISE(ABORT, 'forced budget failure'); END;",
            )
            .unwrap();
    }

    fn fail_transaction_deletes(connection: &Connection) {
        connection
            .execute_batch(
                "CREATE TRIGGER fail_transaction_delete BEFORE DELETE ON \"transaction\"
                BEGIN SELECT RAISE(ABORT, 'forced delete failure'); END;",
            )
            .unwrap();
    }

    fn fail_transaction_updates(connection: &Connection) {
        connection
            .execute_batch(
                "CREATE TRIGGER fail_transaction_update BEFORE UPDATE ON \"transaction\"
                BEGIN SELECT RAISE(ABORT, 'forced update failure'); END;",
            )
            .unwrap();
    }

    #[test]
    fn create_adds_amount_to_budget() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        create_transaction(new_transaction(100.0, budget.id), USER, &connection).unwrap();

        let (transaction, budgets) =
            create_transaction(new_transaction(50.0, budget.id), USER, &connection).unwrap();

        assert_eq!(spent(budget.id, &connection), 150.0);
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].spent, 150.0);
        assert_eq!(
            get_transaction(transaction.id, USER, &connection).unwrap().amount,
            50.0
        );
    }

    #[test]
    fn create_rejects_non_positive_amount() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);

        let result = create_transaction(new_transaction(0.0, budget.id), USER, &connection);

        assert_eq!(result, Err(Error::InvalidAmount(0.0)));
        assert_eq!(count_transactions(USER, &connection), Ok(0));
    }

    #[test]
    fn create_rejects_missing_budget() {
        let connection = get_test_connection();

        let result = create_transaction(new_transaction(10.0, 42), USER, &connection);

        assert_eq!(result, Err(Error::InvalidBudget(42)));
        assert_eq!(count_transactions(USER, &connection), Ok(0));
    }

    #[test]
    fn create_rejects_other_users_budget() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);

        let result =
            create_transaction(new_transaction(10.0, budget.id), UserID::new(2), &connection);

        assert_eq!(result, Err(Error::InvalidBudget(budget.id)));
        assert_eq!(spent(budget.id, &connection), 0.0);
    }

    #[test]
    fn create_rolls_back_when_budget_update_fails() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        create_transaction(new_transaction(100.0, budget.id), USER, &connection).unwrap();
        fail_spent_updates(&connection);

        let result = create_transaction(new_transaction(50.0, budget.id), USER, &connection);

        assert_eq!(result, Err(Error::TransactionRolledBack));
        assert_eq!(count_transactions(USER, &connection), Ok(1));
        assert_eq!(spent(budget.id, &connection), 100.0);
        assert_budget_matches_transactions(budget.id, &connection);
    }

    #[test]
    fn create_reports_failed_rollback() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        fail_spent_updates(&connection);
        fail_transaction_deletes(&connection);

        let result = create_transaction(new_transaction(50.0, budget.id), USER, &connection);

        let Err(Error::RollbackFailed { transaction_id }) = result else {
            panic!("want Error::RollbackFailed, got {result:?}");
        };
        // The orphaned row is left for an operator to reconcile.
        assert!(get_transaction(transaction_id, USER, &connection).is_ok());
        assert_eq!(spent(budget.id, &connection), 0.0);
    }

    #[test]
    fn edit_within_budget_applies_difference() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        create_transaction(new_transaction(100.0, budget.id), USER, &connection).unwrap();
        let (transaction, _) =
            create_transaction(new_transaction(20.0, budget.id), USER, &connection).unwrap();
        assert_eq!(spent(budget.id, &connection), 120.0);

        let budgets = edit_transaction(
            transaction.id,
            new_transaction(35.0, budget.id),
            USER,
            &connection,
        )
        .unwrap();

        assert_eq!(budgets[0].spent, 135.0);
        assert_eq!(spent(budget.id, &connection), 135.0);
        assert_budget_matches_transactions(budget.id, &connection);
    }

    #[test]
    fn edit_to_other_budget_moves_amount() {
        let connection = get_test_connection();
        let b = new_budget("B", 400.0, &connection);
        let c = new_budget("C", 400.0, &connection);
        create_transaction(new_transaction(100.0, b.id), USER, &connection).unwrap();
        let (moved, _) =
            create_transaction(new_transaction(20.0, b.id), USER, &connection).unwrap();
        create_transaction(new_transaction(50.0, c.id), USER, &connection).unwrap();

        edit_transaction(moved.id, new_transaction(20.0, c.id), USER, &connection).unwrap();

        assert_eq!(spent(b.id, &connection), 100.0);
        assert_eq!(spent(c.id, &connection), 70.0);
        assert_budget_matches_transactions(b.id, &connection);
        assert_budget_matches_transactions(c.id, &connection);
    }

    #[test]
    fn edit_of_orphan_skips_missing_budget() {
        let connection = get_test_connection();
        let old = new_budget("Old", 100.0, &connection);
        let new = new_budget("New", 100.0, &connection);
        let (transaction, _) =
            create_transaction(new_transaction(30.0, old.id), USER, &connection).unwrap();
        delete_budget(old.id, USER, &connection).unwrap();

        edit_transaction(transaction.id, new_transaction(30.0, new.id), USER, &connection)
            .unwrap();

        assert_eq!(spent(new.id, &connection), 30.0);
        assert_budget_matches_transactions(new.id, &connection);
    }

    #[test]
    fn edit_rejects_missing_budget_without_changes() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        let (transaction, _) =
            create_transaction(new_transaction(20.0, budget.id), USER, &connection).unwrap();

        let result = edit_transaction(transaction.id, new_transaction(20.0, 99), USER, &connection);

        assert_eq!(result, Err(Error::InvalidBudget(99)));
        assert_eq!(
            get_transaction(transaction.id, USER, &connection)
                .unwrap()
                .budget_id,
            budget.id
        );
    }

    #[test]
    fn edit_missing_transaction_fails() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);

        let result = edit_transaction(7, new_transaction(20.0, budget.id), USER, &connection);

        assert_eq!(result, Err(Error::UpdateMissingTransaction));
    }

    #[test]
    fn edit_aborts_when_row_update_fails() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        let (transaction, _) =
            create_transaction(new_transaction(20.0, budget.id), USER, &connection).unwrap();
        fail_transaction_updates(&connection);

        let result = edit_transaction(
            transaction.id,
            new_transaction(90.0, budget.id),
            USER,
            &connection,
        );

        assert!(matches!(result, Err(Error::SqlError(_))));
        assert_eq!(spent(budget.id, &connection), 20.0);
    }

    #[test]
    fn edit_reports_reconciliation_when_budget_update_fails() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        let (transaction, _) =
            create_transaction(new_transaction(20.0, budget.id), USER, &connection).unwrap();
        fail_spent_updates(&connection);

        let result = edit_transaction(
            transaction.id,
            new_transaction(35.0, budget.id),
            USER,
            &connection,
        );

        assert_eq!(
            result,
            Err(Error::BudgetReconciliation {
                transaction_id: transaction.id,
                budget_id: budget.id,
            })
        );
        // The row update is kept, the budget is not.
        assert_eq!(
            get_transaction(transaction.id, USER, &connection)
                .unwrap()
                .amount,
            35.0
        );
        assert_eq!(spent(budget.id, &connection), 20.0);
    }

    #[test]
    fn delete_takes_amount_off_budget() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        create_transaction(new_transaction(100.0, budget.id), USER, &connection).unwrap();
        let (transaction, _) =
            create_transaction(new_transaction(30.0, budget.id), USER, &connection).unwrap();
        assert_eq!(spent(budget.id, &connection), 130.0);

        let budgets = delete_transaction(transaction.id, USER, &connection).unwrap();

        assert_eq!(budgets[0].spent, 100.0);
        assert_eq!(
            get_transaction(transaction.id, USER, &connection),
            Err(Error::NotFound)
        );
        assert_budget_matches_transactions(budget.id, &connection);
    }

    #[test]
    fn delete_keeps_transaction_when_budget_update_fails() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        let (transaction, _) =
            create_transaction(new_transaction(30.0, budget.id), USER, &connection).unwrap();
        fail_spent_updates(&connection);

        let result = delete_transaction(transaction.id, USER, &connection);

        assert!(matches!(result, Err(Error::SqlError(_))));
        assert!(get_transaction(transaction.id, USER, &connection).is_ok());
        assert_budget_matches_transactions(budget.id, &connection);
    }

    #[test]
    fn delete_of_orphan_removes_row() {
        let connection = get_test_connection();
        let budget = new_budget("Groceries", 400.0, &connection);
        let (transaction, _) =
            create_transaction(new_transaction(30.0, budget.id), USER, &connection).unwrap();
        delete_budget(budget.id, USER, &connection).unwrap();

        let budgets = delete_transaction(transaction.id, USER, &connection).unwrap();

        assert!(budgets.is_empty());
        assert_eq!(count_transactions(USER, &connection), Ok(0));
    }

    #[test]
    fn delete_missing_transaction_fails() {
        let connection = get_test_connection();

        assert_eq!(
            delete_transaction(5, USER, &connection),
            Err(Error::DeleteMissingTransaction)
        );
    }

    #[test]
    fn spent_matches_transactions_after_many_operations() {
        let connection = get_test_connection();
        let food = new_budget("Food", 500.0, &connection);
        let fuel = new_budget("Fuel", 200.0, &connection);

        let (bread, _) =
            create_transaction(new_transaction(4.5, food.id), USER, &connection).unwrap();
        let (petrol, _) =
            create_transaction(new_transaction(60.0, fuel.id), USER, &connection).unwrap();
        let (snacks, _) =
            create_transaction(new_transaction(12.25, food.id), USER, &connection).unwrap();
        edit_transaction(bread.id, new_transaction(6.0, food.id), USER, &connection).unwrap();
        edit_transaction(snacks.id, new_transaction(12.25, fuel.id), USER, &connection).unwrap();
        delete_transaction(petrol.id, USER, &connection).unwrap();
        create_transaction(new_transaction(75.0, fuel.id), USER, &connection).unwrap();

        assert_budget_matches_transactions(food.id, &connection);
        assert_budget_matches_transactions(fuel.id, &connection);
        assert_eq!(spent(food.id, &connection), 6.0);
        assert_eq!(spent(fuel.id, &connection), 87.25);
    }

    #[test]
    fn spent_returns_to_zero_after_removing_inexact_amounts() {
        let connection = get_test_connection();
        let food = new_budget("Food", 50.0, &connection);

        let (first, _) =
            create_transaction(new_transaction(0.1, food.id), USER, &connection).unwrap();
        let (second, _) =
            create_transaction(new_transaction(0.2, food.id), USER, &connection).unwrap();
        assert_eq!(spent(food.id, &connection), 0.3);
        assert_budget_matches_transactions(food.id, &connection);

        edit_transaction(first.id, new_transaction(0.7, food.id), USER, &connection).unwrap();
        assert_eq!(spent(food.id, &connection), 0.9);

        delete_transaction(first.id, USER, &connection).unwrap();
        delete_transaction(second.id, USER, &connection).unwrap();

        assert_eq!(spent(food.id, &connection), 0.0);
    }

    #[test]
    fn orphans_do_not_attach_to_a_budget_created_later() {
        let connection = get_test_connection();
        let old = new_budget("Old", 100.0, &connection);
        let (orphan, _) =
            create_transaction(new_transaction(30.0, old.id), USER, &connection).unwrap();
        delete_budget(old.id, USER, &connection).unwrap();

        let new = new_budget("New", 100.0, &connection);
        assert_ne!(new.id, old.id);
        assert_budget_matches_transactions(new.id, &connection);

        delete_transaction(orphan.id, USER, &connection).unwrap();

        assert_eq!(spent(new.id, &connection), 0.0);
        assert_budget_matches_transactions(new.id, &connection);
    }
}
