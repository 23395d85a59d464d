//! Budget cards and the budget form shown on the dashboard and edit page.

use maud::{Markup, html};

use crate::{
    budget::{Budget, BudgetSummary},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        edit_delete_action_links, format_currency,
    },
};

/// Renders the grid of budget cards, or a prompt to create one when there are none.
pub fn budget_cards_view(budgets: &[Budget]) -> Markup {
    html! {
        section class="w-full mb-8"
        {
            h2 class="text-xl font-semibold mb-4" { "Budgets" }

            @if budgets.is_empty() {
                p class="text-gray-600 dark:text-gray-400"
                {
                    "You have no budgets yet. Create one below to start tracking your spending."
                }
            } @else {
                div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4"
                {
                    @for budget in budgets {
                        (budget_card(budget))
                    }
                }
            }
        }
    }
}

fn budget_card(budget: &Budget) -> Markup {
    let summary = BudgetSummary::new(budget.amount, budget.spent);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_BUDGET_VIEW, budget.id);
    let delete_url = endpoints::format_endpoint(endpoints::BUDGET_API, budget.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? Its transactions will be kept.",
        budget.title
    );
    let bar_colour = if summary.is_over_budget {
        "bg-red-600 dark:bg-red-500"
    } else {
        "bg-blue-600 dark:bg-blue-500"
    };

    html! {
        div class=(CARD_STYLE) data-budget-card
        {
            div class="flex justify-between items-baseline mb-2"
            {
                h3 class="text-lg font-semibold truncate" title=(budget.title) { (budget.title) }

                span class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (format_currency(budget.spent)) " / " (format_currency(budget.amount))
                }
            }

            div
                class="w-full h-2.5 mb-2 rounded-full bg-gray-200 dark:bg-gray-700"
                role="progressbar"
                aria-valuemin="0"
                aria-valuemax="100"
                aria-valuenow=(summary.progress_percent())
            {
                div
                    class={ "h-2.5 rounded-full " (bar_colour) }
                    style={ "width: " (summary.progress_percent()) "%" }
                {}
            }

            @if summary.is_over_budget {
                p class="text-sm font-medium text-red-600 dark:text-red-400"
                {
                    "Over budget by " (format_currency(-summary.remaining))
                }
            } @else {
                p class="text-sm text-gray-600 dark:text-gray-400"
                {
                    (format_currency(summary.remaining)) " remaining"
                }
            }

            div class="flex gap-4 mt-3"
            {
                (edit_delete_action_links(
                    &edit_url,
                    &delete_url,
                    &confirm_message,
                    "closest [data-budget-card]",
                    "delete",
                ))
            }
        }
    }
}

/// The form fields shared by the create and edit budget forms.
pub fn budget_form_fields(title: &str, amount: Option<f64>) -> Markup {
    html! {
        div
        {
            label for="title" class=(FORM_LABEL_STYLE) { "Title" }

            input
                id="title"
                type="text"
                name="title"
                placeholder="Groceries"
                value=(title)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    id="amount"
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    placeholder="0.00"
                    value=[amount]
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

/// The form for creating a budget.
pub fn create_budget_form_view() -> Markup {
    html! {
        form
            hx-post=(endpoints::BUDGETS_API)
            hx-target-error="#alert-container"
            class="w-full space-y-4"
        {
            h2 class="text-xl font-semibold" { "New budget" }

            (budget_form_fields("", None))

            button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Budget" }
        }
    }
}
