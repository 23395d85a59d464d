//! Budget editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Extension, Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error, UserID,
    budget::{
        Budget, BudgetId, BudgetTitle, domain::BudgetFormData, get_budget, update_budget,
        validate_amount, view::budget_form_fields,
    },
    endpoints,
    html::{BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, LINK_STYLE, base, dollar_input_styles},
    navigation::NavBar,
};

/// The state needed for the edit budget page and endpoint.
#[derive(Debug, Clone)]
pub struct EditBudgetState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditBudgetState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the budget editing page.
pub async fn get_edit_budget_page(
    Path(budget_id): Path<BudgetId>,
    State(state): State<EditBudgetState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let budget = get_budget(budget_id, user_id, &connection).inspect_err(|error| {
        if *error != Error::NotFound {
            tracing::error!("Failed to retrieve budget {budget_id}: {error}");
        }
    })?;

    Ok(edit_budget_view(&budget).into_response())
}

/// Handle budget update form submission.
///
/// Only the title and allocation change. The spent total is owned by the
/// transaction operations.
pub async fn update_budget_endpoint(
    Path(budget_id): Path<BudgetId>,
    State(state): State<EditBudgetState>,
    Extension(user_id): Extension<UserID>,
    Form(form_data): Form<BudgetFormData>,
) -> Response {
    let title = match BudgetTitle::new(&form_data.title) {
        Ok(title) => title,
        Err(error) => return error.into_alert_response(),
    };

    let amount = match validate_amount(form_data.amount) {
        Ok(amount) => amount,
        Err(error) => return error.into_alert_response(),
    };

    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    match update_budget(budget_id, user_id, title, amount, &connection) {
        Ok(()) => (
            HxRedirect(endpoints::DASHBOARD_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingBudget) => Error::UpdateMissingBudget.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating budget {budget_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}

fn edit_budget_view(budget: &Budget) -> Markup {
    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id);
    let update_endpoint = endpoints::format_endpoint(endpoints::BUDGET_API, budget.id);
    let nav_bar = NavBar::new(&edit_endpoint).into_html();

    let content = html! {
        (nav_bar)

        div class=(FORM_CONTAINER_STYLE)
        {
            form
                hx-put=(update_endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                h2 class="text-xl font-semibold" { "Edit budget" }

                (budget_form_fields(budget.title.as_ref(), Some(budget.amount)))

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Budget" }
            }

            a href=(endpoints::DASHBOARD_VIEW) class={ "mt-4 " (LINK_STYLE) } { "Cancel" }
        }
    };

    base("Edit Budget", &[dollar_input_styles()], &content)
}
