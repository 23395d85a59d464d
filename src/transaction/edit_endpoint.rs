use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error, UserID, endpoints,
    transaction::{TransactionId, edit_transaction, form::TransactionForm},
};

/// The state needed to edit a transaction.
#[derive(Debug, Clone)]
pub struct EditTransactionState {
    /// The database connection for managing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct QueryParams {
    /// The page to go back to once the transaction has been saved.
    pub redirect_url: Option<String>,
}

impl QueryParams {
    /// The redirect URL if it is a path on this site, otherwise the dashboard.
    pub fn redirect_url_or_dashboard(&self) -> String {
        match &self.redirect_url {
            // Browsers treat "//host" and "/\host" as links to another site.
            Some(url) if url.starts_with('/') && !url.starts_with("//") && !url.starts_with("/\\") => {
                url.clone()
            }
            _ => endpoints::DASHBOARD_VIEW.to_owned(),
        }
    }
}

pub async fn edit_transaction_endpoint(
    State(state): State<EditTransactionState>,
    Path(transaction_id): Path<TransactionId>,
    Extension(user_id): Extension<UserID>,
    Query(query_params): Query<QueryParams>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let changes = match form.validate() {
        Ok(changes) => changes,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    if let Err(error) = edit_transaction(transaction_id, changes, user_id, &connection) {
        tracing::error!("Could not update transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    (
        HxRedirect(query_params.redirect_url_or_dashboard()),
        StatusCode::SEE_OTHER,
    )
        .into_response()
}
