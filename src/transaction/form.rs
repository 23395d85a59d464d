use maud::{Markup, html};
use serde::Deserialize;
use time::Date;

use crate::{
    Error,
    budget::{Budget, BudgetId, validate_amount},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    transaction::{NewTransaction, TransactionTitle},
};

/// The form data for creating or editing a transaction.
///
/// Must be extracted with `axum_extra`'s `Form` so that the empty
/// "Select a budget" option becomes `None`.
#[derive(Debug, Deserialize)]
pub struct TransactionForm {
    /// What the money was spent on.
    pub title: String,
    /// The value of the transaction in dollars.
    pub amount: f64,
    /// When the transaction occurred.
    pub date: Date,
    /// The budget the transaction counts towards.
    #[serde(default)]
    pub budget_id: Option<BudgetId>,
}

impl TransactionForm {
    /// Check the submitted fields.
    ///
    /// # Errors
    ///
    /// Returns an [Error::NoBudgetSelected], [Error::InvalidAmount] or
    /// [Error::EmptyTransactionTitle], checked in that order.
    pub fn validate(self) -> Result<NewTransaction, Error> {
        let budget_id = self.budget_id.ok_or(Error::NoBudgetSelected)?;
        let amount = validate_amount(self.amount)?;
        let title = TransactionTitle::new(&self.title)?;

        Ok(NewTransaction {
            title,
            amount,
            date: self.date,
            budget_id,
        })
    }
}

pub struct TransactionFormDefaults<'a> {
    pub title: Option<&'a str>,
    pub amount: Option<f64>,
    pub date: Date,
    pub budget_id: Option<BudgetId>,
}

pub fn transaction_form_fields(
    defaults: &TransactionFormDefaults<'_>,
    budgets: &[Budget],
) -> Markup {
    let amount_str = defaults.amount.map(|amount| format!("{amount:.2}"));

    html! {
        div
        {
            label for="transaction-title" class=(FORM_LABEL_STYLE) { "Title" }

            input
                name="title"
                id="transaction-title"
                type="text"
                placeholder="What was it for?"
                value=[defaults.title]
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="transaction-amount" class=(FORM_LABEL_STYLE) { "Amount" }

            div class="input-wrapper w-full"
            {
                input
                    name="amount"
                    id="transaction-amount"
                    type="number"
                    step="0.01"
                    placeholder="0.01"
                    min="0.01"
                    required
                    value=[amount_str.as_deref()]
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }

        div
        {
            label for="transaction-date" class=(FORM_LABEL_STYLE) { "Date" }

            input
                name="date"
                id="transaction-date"
                type="date"
                value=(defaults.date)
                required
                class=(FORM_TEXT_INPUT_STYLE);
        }

        div
        {
            label for="budget_id" class=(FORM_LABEL_STYLE) { "Budget" }

            select
                name="budget_id"
                id="budget_id"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="" { "Select a budget" }

                @for budget in budgets {
                    @if Some(budget.id) == defaults.budget_id {
                        option value=(budget.id) selected { (budget.title) }
                    } @else {
                        option value=(budget.id) { (budget.title) }
                    }
                }
            }
        }
    }
}
