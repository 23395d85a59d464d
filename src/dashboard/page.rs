//! The dashboard: budget cards, the forms for adding budgets and transactions,
//! and a page of the user's transactions.

use std::sync::{Arc, Mutex};

use axum::{
    Extension,
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;
use time::Date;

use crate::{
    AppState, Error, UserID,
    budget::{Budget, budget_cards_view, create_budget_form_view, get_budgets},
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, CARD_STYLE, PAGE_CONTAINER_STYLE, base, dollar_input_styles},
    navigation::NavBar,
    pagination::{PaginationConfig, create_pagination_indicators, page_count},
    timezone::local_today,
    transaction::{
        TablePosition, TransactionFormDefaults, count_transactions, get_transaction_rows,
        transaction_form_fields, transactions_table_view,
    },
};

/// The state needed for the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading budgets and transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
    /// The config that controls how to display pages of transactions.
    pub pagination_config: PaginationConfig,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
            pagination_config: state.pagination_config.clone(),
        }
    }
}

/// Which page of transactions to show.
#[derive(Debug, Default, Deserialize)]
pub struct Pagination {
    /// The 1-based page number.
    pub page: Option<u64>,
    /// The number of transactions per page.
    pub per_page: Option<u64>,
}

/// Display the user's budgets and transactions.
///
/// Out of range page numbers are clamped to the first or last page.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    Extension(user_id): Extension<UserID>,
    Query(pagination): Query<Pagination>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)
        .inspect_err(|error| tracing::error!("could not get today's date: {error}"))?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budgets = get_budgets(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not get budgets: {error}"))?;

    let config = &state.pagination_config;
    let per_page = pagination
        .per_page
        .filter(|per_page| *per_page > 0)
        .unwrap_or(config.default_page_size);
    let transaction_count = count_transactions(user_id, &connection)
        .inspect_err(|error| tracing::error!("could not count transactions: {error}"))?;
    let page_count = page_count(transaction_count, per_page);
    let page = pagination
        .page
        .unwrap_or(config.default_page)
        .clamp(1, page_count);

    let rows = get_transaction_rows(user_id, page, per_page, &connection)
        .inspect_err(|error| tracing::error!("could not get transactions: {error}"))?;
    let indicators = create_pagination_indicators(page, page_count, config.max_pages);

    let position = TablePosition {
        base_url: endpoints::DASHBOARD_VIEW,
        page,
        per_page,
    };
    let table = transactions_table_view(&rows, &indicators, &position);

    Ok(dashboard_view(&budgets, today, table).into_response())
}

fn dashboard_view(budgets: &[Budget], today: Date, transactions_table: Markup) -> Markup {
    let nav_bar = NavBar::new(endpoints::DASHBOARD_VIEW).into_html();

    let content = html! {
        (nav_bar)

        div class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full max-w-screen-xl space-y-8"
            {
                (budget_cards_view(budgets))

                div class="grid grid-cols-1 md:grid-cols-2 gap-8"
                {
                    div class=(CARD_STYLE) { (create_budget_form_view()) }
                    div class=(CARD_STYLE) { (new_transaction_form_view(budgets, today)) }
                }

                (transactions_table)
            }
        }
    };

    base("Dashboard", &[dollar_input_styles()], &content)
}

fn new_transaction_form_view(budgets: &[Budget], today: Date) -> Markup {
    if budgets.is_empty() {
        return html! {
            h2 class="text-xl font-semibold mb-4" { "New transaction" }

            p class="text-gray-600 dark:text-gray-400"
            {
                "Create a budget first, then you can add transactions to it."
            }
        };
    }

    let fields = transaction_form_fields(
        &TransactionFormDefaults {
            title: None,
            amount: None,
            date: today,
            budget_id: None,
        },
        budgets,
    );

    html! {
        form
            hx-post=(endpoints::TRANSACTIONS_API)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            h2 class="text-xl font-semibold" { "New transaction" }

            (fields)

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Transaction" }
        }
    }
}
