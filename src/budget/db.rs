//! Database operations for budgets.
//!
//! Every query is scoped to the owning user, so a budget ID belonging to
//! another user behaves the same as a missing budget.

use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::{
    Error, UserID,
    budget::{Budget, BudgetId, BudgetTitle},
};

/// Create a budget with nothing spent and return it with its generated ID.
///
/// The caller should validate `amount` with [crate::budget::validate_amount].
pub fn create_budget(
    title: BudgetTitle,
    amount: f64,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "INSERT INTO budget (user_id, title, amount, spent, created_at)
            VALUES (?1, ?2, ?3, 0, ?4)
            RETURNING id, user_id, title, amount, spent, created_at;",
        )?
        .query_row(
            (
                user_id.as_i64(),
                title.as_ref(),
                amount,
                OffsetDateTime::now_utc(),
            ),
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a single budget by ID.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` has no budget with `budget_id`.
pub fn get_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Budget, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, amount, spent, created_at
            FROM budget
            WHERE id = :id AND user_id = :user_id;",
        )?
        .query_row(
            &[(":id", &budget_id), (":user_id", &user_id.as_i64())],
            map_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve all of a user's budgets, oldest first.
pub fn get_budgets(user_id: UserID, connection: &Connection) -> Result<Vec<Budget>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, title, amount, spent, created_at
            FROM budget
            WHERE user_id = :user_id
            ORDER BY created_at ASC, id ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_budget| maybe_budget.map_err(|error| error.into()))
        .collect()
}

/// Update a budget's title and allocation. The spent total is left untouched.
///
/// # Errors
///
/// Returns an [Error::UpdateMissingBudget] if the budget does not exist.
pub fn update_budget(
    budget_id: BudgetId,
    user_id: UserID,
    title: BudgetTitle,
    amount: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE budget SET title = ?1, amount = ?2 WHERE id = ?3 AND user_id = ?4",
        (title.as_ref(), amount, budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(())
}

/// Delete a budget by ID.
///
/// Transactions assigned to the budget are kept and keep their budget ID.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingBudget] if the budget does not exist.
pub fn delete_budget(
    budget_id: BudgetId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM budget WHERE id = ?1 AND user_id = ?2",
        (budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingBudget);
    }

    Ok(())
}

/// Add `delta` to a budget's spent total in a single statement.
///
/// The increment happens inside SQLite, so concurrent adjustments never
/// overwrite each other. `delta` may be negative. The total is rounded to
/// cents so that adding and removing the same amounts returns it to exactly
/// where it started.
///
/// # Errors
///
/// Returns an [Error::UpdateMissingBudget] if the budget does not exist.
pub fn adjust_budget_spent(
    budget_id: BudgetId,
    user_id: UserID,
    delta: f64,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE budget SET spent = ROUND(spent + ?1, 2) WHERE id = ?2 AND user_id = ?3",
        (delta, budget_id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingBudget);
    }

    Ok(())
}

/// Initialize the budget table and indexes.
pub fn create_budget_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS budget (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            spent REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_budget_user_id ON budget(user_id);",
    )?;

    Ok(())
}

fn map_row(row: &Row) -> Result<Budget, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let raw_title: String = row.get(2)?;
    let title = BudgetTitle::new_unchecked(&raw_title);
    let amount = row.get(3)?;
    let spent = row.get(4)?;
    let created_at = row.get(5)?;

    Ok(Budget {
        id,
        user_id,
        title,
        amount,
        spent,
        created_at,
    })
}
