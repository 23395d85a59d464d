//! Defines the core data models and database queries for transactions.

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{Error, UserID, budget::BudgetId};

// ============================================================================
// MODELS
// ============================================================================

/// Database identifier for a transaction.
pub type TransactionId = i64;

/// A validated, non-empty transaction title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct TransactionTitle(String);

impl TransactionTitle {
    /// Create a transaction title.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTransactionTitle] if `title` is empty or only
    /// whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyTransactionTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a transaction title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for TransactionTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for TransactionTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single spend recorded against exactly one budget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transaction {
    /// The ID of the transaction.
    pub id: TransactionId,
    /// The user that recorded the transaction.
    pub user_id: UserID,
    /// The budget the amount counts towards.
    ///
    /// May refer to a budget that has since been deleted.
    pub budget_id: BudgetId,
    /// What the money was spent on.
    pub title: TransactionTitle,
    /// How much was spent, always greater than zero.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
}

/// The user supplied fields of a transaction, used both to record a new
/// transaction and to replace the fields of an existing one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    /// What the money was spent on.
    pub title: TransactionTitle,
    /// How much was spent, must be greater than zero.
    pub amount: f64,
    /// When the money was spent.
    pub date: Date,
    /// The budget the amount counts towards.
    pub budget_id: BudgetId,
}

/// A transaction joined with the title of its budget for display.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    pub id: TransactionId,
    pub title: String,
    pub amount: f64,
    pub date: Date,
    pub budget_id: BudgetId,
    /// `None` when the budget has been deleted.
    pub budget_title: Option<String>,
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert a transaction row and return it with its generated ID.
///
/// This only writes the row. Use [crate::transaction::create_transaction] to
/// also count the amount towards the budget.
pub fn insert_transaction(
    transaction: &NewTransaction,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "INSERT INTO \"transaction\" (user_id, budget_id, title, amount, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            RETURNING id, user_id, budget_id, title, amount, date",
        )?
        .query_row(
            (
                user_id.as_i64(),
                transaction.budget_id,
                transaction.title.as_ref(),
                transaction.amount,
                transaction.date,
            ),
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Retrieve a transaction by its ID.
///
/// # Errors
///
/// Returns an [Error::NotFound] if `user_id` has no transaction with `id`.
pub fn get_transaction(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Transaction, Error> {
    connection
        .prepare(
            "SELECT id, user_id, budget_id, title, amount, date
            FROM \"transaction\"
            WHERE id = :id AND user_id = :user_id",
        )?
        .query_row(
            &[(":id", &id), (":user_id", &user_id.as_i64())],
            map_transaction_row,
        )
        .map_err(|error| error.into())
}

/// Replace every user supplied field of a transaction row.
///
/// # Errors
///
/// Returns an [Error::UpdateMissingTransaction] if the transaction does not exist.
pub fn update_transaction(
    id: TransactionId,
    user_id: UserID,
    changes: &NewTransaction,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE \"transaction\"
        SET title = ?1, amount = ?2, date = ?3, budget_id = ?4
        WHERE id = ?5 AND user_id = ?6",
        (
            changes.title.as_ref(),
            changes.amount,
            changes.date,
            changes.budget_id,
            id,
            user_id.as_i64(),
        ),
    )?;

    if rows_affected == 0 {
        return Err(Error::UpdateMissingTransaction);
    }

    Ok(())
}

/// Delete the transaction row with `id`.
///
/// # Errors
///
/// Returns an [Error::DeleteMissingTransaction] if the transaction does not exist.
pub fn delete_transaction_row(
    id: TransactionId,
    user_id: UserID,
    connection: &Connection,
) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "DELETE FROM \"transaction\" WHERE id = ?1 AND user_id = ?2",
        (id, user_id.as_i64()),
    )?;

    if rows_affected == 0 {
        return Err(Error::DeleteMissingTransaction);
    }

    Ok(())
}

/// Get one page of a user's transactions, newest first.
///
/// `page` starts at 1. Pages past the end are empty.
pub fn get_transaction_rows(
    user_id: UserID,
    page: u64,
    page_size: u64,
    connection: &Connection,
) -> Result<Vec<TransactionRow>, Error> {
    let limit = i64::try_from(page_size).map_err(|_| Error::PageOutOfRange)?;
    let offset = page
        .saturating_sub(1)
        .checked_mul(page_size)
        .and_then(|offset| i64::try_from(offset).ok())
        .ok_or(Error::PageOutOfRange)?;

    connection
        .prepare(
            "SELECT t.id, t.title, t.amount, t.date, t.budget_id, b.title
            FROM \"transaction\" t
            LEFT JOIN budget b ON b.id = t.budget_id AND b.user_id = t.user_id
            WHERE t.user_id = ?1
            ORDER BY t.date DESC, t.id DESC
            LIMIT ?2 OFFSET ?3",
        )?
        .query_map((user_id.as_i64(), limit, offset), |row| {
            Ok(TransactionRow {
                id: row.get(0)?,
                title: row.get(1)?,
                amount: row.get(2)?,
                date: row.get(3)?,
                budget_id: row.get(4)?,
                budget_title: row.get(5)?,
            })
        })?
        .map(|maybe_row| maybe_row.map_err(|error| error.into()))
        .collect()
}

/// Count how many transactions a user has recorded.
pub fn count_transactions(user_id: UserID, connection: &Connection) -> Result<u64, Error> {
    let count: i64 = connection.query_row(
        "SELECT COUNT(id) FROM \"transaction\" WHERE user_id = ?1",
        [user_id.as_i64()],
        |row| row.get(0),
    )?;

    Ok(count.unsigned_abs())
}

/// Create the transaction table and its indexes.
///
/// `budget_id` has no foreign key because deleting a budget leaves its
/// transactions in place.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id INTEGER NOT NULL,
            budget_id INTEGER NOT NULL,
            title TEXT NOT NULL,
            amount REAL NOT NULL CHECK (amount > 0),
            date TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_transaction_user_id ON \"transaction\"(user_id);
        CREATE INDEX IF NOT EXISTS idx_transaction_budget_id ON \"transaction\"(budget_id);",
    )?;

    Ok(())
}

fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    let raw_title: String = row.get(3)?;

    Ok(Transaction {
        id: row.get(0)?,
        user_id: UserID::new(row.get(1)?),
        budget_id: row.get(2)?,
        title: TransactionTitle::new_unchecked(&raw_title),
        amount: row.get(4)?,
        date: row.get(5)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
