use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Path, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    budget::{Budget, get_budgets},
    endpoints::{self, format_endpoint},
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    transaction::{
        Transaction, TransactionId,
        edit_endpoint::QueryParams,
        form::{TransactionFormDefaults, transaction_form_fields},
        get_transaction,
    },
};

/// The state needed for the edit transaction page.
#[derive(Debug, Clone)]
pub struct EditTransactionPageState {
    /// The database connection for reading the transaction and budgets.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditTransactionPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Renders the page for editing a transaction.
pub async fn get_edit_transaction_page(
    State(state): State<EditTransactionPageState>,
    Path(transaction_id): Path<TransactionId>,
    Extension(user_id): Extension<UserID>,
    Query(query_params): Query<QueryParams>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let transaction =
        get_transaction(transaction_id, user_id, &connection).inspect_err(|error| {
            if *error != Error::NotFound {
                tracing::error!("Failed to retrieve transaction {transaction_id}: {error}");
            }
        })?;

    let budgets = get_budgets(user_id, &connection).inspect_err(|error| {
        tracing::error!("Failed to retrieve budgets for edit transaction page: {error}")
    })?;

    let redirect_url = query_params.redirect_url_or_dashboard();

    Ok(edit_transaction_view(&transaction, &budgets, &redirect_url).into_response())
}

fn edit_transaction_view(
    transaction: &Transaction,
    budgets: &[Budget],
    redirect_url: &str,
) -> Markup {
    let nav_bar =
        NavBar::new(&format_endpoint(endpoints::EDIT_TRANSACTION_VIEW, transaction.id)).into_html();
    let update_url = format!(
        "{}?{}",
        format_endpoint(endpoints::TRANSACTION_API, transaction.id),
        serde_urlencoded::to_string([("redirect_url", redirect_url)]).unwrap_or_default()
    );
    let fields = transaction_form_fields(
        &TransactionFormDefaults {
            title: Some(transaction.title.as_ref()),
            amount: Some(transaction.amount),
            date: transaction.date,
            budget_id: Some(transaction.budget_id),
        },
        budgets,
    );

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_url)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-semibold" { "Edit transaction" }

                @if !budgets.iter().any(|budget| budget.id == transaction.budget_id) {
                    p class="text-sm text-amber-600 dark:text-amber-400"
                    {
                        "The budget for this transaction has been deleted. Choose a new budget."
                    }
                }

                (fields)

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Transaction" }
            }

            a href=(redirect_url) class={ "mt-4 " (LINK_STYLE) } { "Cancel" }
        }
    };

    base("Edit Transaction", &[dollar_input_styles()], &content)
}
