//! Defines the app level error type and conversions to rendered HTML pages and alerts.
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

use crate::{
    alert::Alert, budget::BudgetId, html::error_view, internal_server_error::InternalServerError,
    not_found::NotFoundError, transaction::TransactionId,
};

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The session token cookie is missing from the cookie jar in the request.
    #[error("no session cookie in the cookie jar")]
    CookieMissing,

    /// The session token cookie could not be decoded.
    #[error("could not parse the session token: {0}")]
    InvalidToken(String),

    /// The session token has passed its expiry time.
    #[error("the session token has expired")]
    TokenExpired,

    /// Extending the session would overflow the date-time range.
    #[error("could not compute a new session expiry")]
    InvalidCookieExpiry,

    /// The request did not carry a valid session.
    #[error("the request is not authenticated")]
    Unauthorized,

    /// An empty string was used to create a budget title.
    #[error("Budget title cannot be empty")]
    EmptyBudgetTitle,

    /// An empty string was used to create a transaction title.
    #[error("Transaction title cannot be empty")]
    EmptyTransactionTitle,

    /// An amount that is zero, negative or not a finite number.
    ///
    /// Both budget allocations and transaction amounts must be strictly positive.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A transaction was submitted without choosing a budget.
    #[error("no budget was selected for the transaction")]
    NoBudgetSelected,

    /// The budget ID does not refer to a budget owned by the acting user.
    #[error("the budget ID {0} does not refer to a valid budget")]
    InvalidBudget(BudgetId),

    /// The budget update after inserting a transaction failed and the
    /// inserted transaction was deleted again.
    #[error("the budget could not be updated so the new transaction was rolled back")]
    TransactionRolledBack,

    /// The budget update after inserting a transaction failed and deleting
    /// the inserted transaction failed as well.
    ///
    /// The transaction row exists but is not counted in its budget's spent
    /// total. Operators must reconcile the budget manually.
    #[error("could not roll back transaction {transaction_id} after a failed budget update")]
    RollbackFailed {
        /// The transaction that could not be removed.
        transaction_id: TransactionId,
    },

    /// A transaction was updated but adjusting the spent total of one of its
    /// budgets failed afterwards.
    ///
    /// The edit is not compensated, so the budget total no longer matches its
    /// transactions until reconciled.
    #[error("transaction {transaction_id} was updated but budget {budget_id} could not be reconciled")]
    BudgetReconciliation {
        /// The transaction that was edited.
        transaction_id: TransactionId,
        /// The budget whose spent total could not be adjusted.
        budget_id: BudgetId,
    },

    /// The requested resource was not found.
    ///
    /// For HTTP request handlers, the client should check that the parameters
    /// (e.g., ID) are correct and that the resource has been created.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// Tried to update a budget that does not exist
    #[error("tried to update a budget that is not in the database")]
    UpdateMissingBudget,

    /// Tried to delete a budget that does not exist
    #[error("tried to delete a budget that is not in the database")]
    DeleteMissingBudget,

    /// Tried to update a transaction that does not exist
    #[error("tried to update a transaction that is not in the database")]
    UpdateMissingTransaction,

    /// Tried to delete a transaction that does not exist
    #[error("tried to delete a transaction that is not in the database")]
    DeleteMissingTransaction,

    /// The requested page of transactions lies outside the range the store can address.
    #[error("the page or page size is too large")]
    PageOutOfRange,

    /// The chat proxy has no API key for the generative language service.
    #[error("the generative language API key is not configured")]
    ChatApiKeyMissing,

    /// The request to the generative language service failed or returned
    /// something other than JSON.
    #[error("chat request failed: {0}")]
    ChatRequestFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound => NotFoundError.into_response(),
            Error::Unauthorized
            | Error::CookieMissing
            | Error::InvalidToken(_)
            | Error::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                Html(
                    error_view(
                        "Unauthorized",
                        "401",
                        "You are not signed in.",
                        "Your session is missing or has expired. Sign in again to continue.",
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::InvalidTimezoneError(timezone) => InternalServerError {
                description: "Invalid Timezone Settings",
                fix: &format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            }
            .into_response(),
            Error::PageOutOfRange => (
                StatusCode::BAD_REQUEST,
                Html(
                    error_view(
                        "Bad Request",
                        "400",
                        "That page does not exist.",
                        "Try a smaller page number or page size.",
                    )
                    .into_string(),
                ),
            )
                .into_response(),
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// Convert the error into an HTTP response with an HTML alert.
    pub fn into_alert_response(self) -> Response {
        let (status_code, message, details) = match self {
            Error::Unauthorized
            | Error::CookieMissing
            | Error::InvalidToken(_)
            | Error::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "Your session has expired",
                "Sign in again to continue.".to_owned(),
            ),
            Error::EmptyBudgetTitle => (
                StatusCode::BAD_REQUEST,
                "Invalid budget title",
                "Budget title cannot be empty.".to_owned(),
            ),
            Error::EmptyTransactionTitle => (
                StatusCode::BAD_REQUEST,
                "Invalid transaction title",
                "Transaction title cannot be empty.".to_owned(),
            ),
            Error::InvalidAmount(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid amount",
                "Amount must be greater than 0.".to_owned(),
            ),
            Error::NoBudgetSelected => (
                StatusCode::BAD_REQUEST,
                "No budget selected",
                "Please select a budget to add transactions.".to_owned(),
            ),
            Error::InvalidBudget(_) => (
                StatusCode::BAD_REQUEST,
                "Invalid budget",
                "Selected budget not found. Please try again.".to_owned(),
            ),
            Error::TransactionRolledBack => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error updating budget",
                "Transaction has been rolled back. Please try again.".to_owned(),
            ),
            Error::BudgetReconciliation { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Budget totals may be out of date",
                "The transaction was saved but its budget could not be updated. \
                Check the server logs and reconcile the budget."
                    .to_owned(),
            ),
            Error::UpdateMissingBudget => (
                StatusCode::NOT_FOUND,
                "Could not update budget",
                "The budget could not be found.".to_owned(),
            ),
            Error::DeleteMissingBudget => (
                StatusCode::NOT_FOUND,
                "Could not delete budget",
                "The budget could not be found. \
                Try refreshing the page to see if the budget has already been deleted."
                    .to_owned(),
            ),
            Error::UpdateMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not update transaction",
                "The transaction could not be found.".to_owned(),
            ),
            Error::DeleteMissingTransaction => (
                StatusCode::NOT_FOUND,
                "Could not delete transaction",
                "The transaction could not be found. \
                Try refreshing the page to see if the transaction has already been deleted."
                    .to_owned(),
            ),
            Error::NotFound => (
                StatusCode::NOT_FOUND,
                "Not found",
                "The requested item could not be found.".to_owned(),
            ),
            Error::InvalidTimezoneError(timezone) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Invalid Timezone Settings",
                format!(
                    "Could not get local timezone \"{timezone}\". Check your server settings and \
                    ensure the timezone has been set to valid, canonical timezone string"
                ),
            ),
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong",
                "An unexpected error occurred, check the server logs for more details.".to_owned(),
            ),
        };

        let alert = Alert::Error {
            message: message.to_owned(),
            details,
        };

        (status_code, alert.into_html()).into_response()
    }
}
