//! Budgets: named spending allocations and the total spent against each.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod summary;
mod view;

pub use create::create_budget_endpoint;
pub use db::{
    adjust_budget_spent, create_budget, create_budget_table, delete_budget, get_budget,
    get_budgets, update_budget,
};
pub use delete::delete_budget_endpoint;
pub use domain::{Budget, BudgetId, BudgetTitle, validate_amount};
pub use edit::{get_edit_budget_page, update_budget_endpoint};
pub use summary::BudgetSummary;
pub use view::{budget_cards_view, create_budget_form_view};
