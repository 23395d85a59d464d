//! The paths for the app's pages and API routes.
//!
//! Paths containing a parameter such as `{budget_id}` can be filled in with
//! [format_endpoint].

pub const ROOT: &str = "/";
pub const DASHBOARD_VIEW: &str = "/dashboard";
pub const INTERNAL_ERROR_VIEW: &str = "/error";
pub const STATIC: &str = "/static";

pub const EDIT_BUDGET_VIEW: &str = "/budgets/{budget_id}/edit";
pub const BUDGETS_API: &str = "/api/budgets";
pub const BUDGET_API: &str = "/api/budgets/{budget_id}";

pub const EDIT_TRANSACTION_VIEW: &str = "/transactions/{transaction_id}/edit";
pub const TRANSACTIONS_API: &str = "/api/transactions";
pub const TRANSACTION_API: &str = "/api/transactions/{transaction_id}";

pub const CHAT_API: &str = "/api/chat";

/// Replace the first parameter in `endpoint_path` with `id`.
///
/// Paths without a parameter are returned unchanged.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let Some(param_start) = endpoint_path.find('{') else {
        return endpoint_path.to_owned();
    };

    let param_end = endpoint_path[param_start..]
        .find('}')
        .map(|offset| param_start + offset + 1)
        .unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
