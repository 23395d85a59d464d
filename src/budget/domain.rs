//! Core budget domain types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{Error, UserID};

/// A validated, non-empty budget title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
pub struct BudgetTitle(String);

impl BudgetTitle {
    /// Create a budget title.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyBudgetTitle] if `title` is empty or only whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyBudgetTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a budget title without validation.
    ///
    /// The caller should ensure that the string is not empty. Used when reading titles that were
    /// validated before they were stored.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for BudgetTitle {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for BudgetTitle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Database identifier for a budget.
pub type BudgetId = i64;

/// A named spending allocation and the running total spent against it.
///
/// `spent` always equals the sum of the amounts of the transactions assigned
/// to the budget. Only the transaction operations change it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Budget {
    /// The ID of the budget.
    pub id: BudgetId,
    /// The user that owns the budget.
    pub user_id: UserID,
    /// The name shown on the budget's card.
    pub title: BudgetTitle,
    /// The spending allocation, always greater than zero.
    pub amount: f64,
    /// The sum of the amounts of the budget's transactions.
    pub spent: f64,
    /// When the budget was created, used to order budgets on the dashboard.
    pub created_at: OffsetDateTime,
}

/// Form data for budget creation and editing.
#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetFormData {
    pub title: String,
    pub amount: f64,
}

/// Check that `amount` can be used as a budget allocation or transaction amount.
///
/// # Errors
///
/// Returns an [Error::InvalidAmount] if `amount` is zero, negative, infinite or NaN.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}


#[cfg(test)]
mod validate_amount_tests {
    use crate::{Error, budget::validate_amount};

    #[test]
    fn accepts_positive_amounts() {
        assert_eq!(validate_amount(0.01), Ok(0.01));
        assert_eq!(validate_amount(250.0), Ok(250.0));
    }

    #[test]
    fn rejects_zero_and_negative_amounts() {
        assert_eq!(validate_amount(0.0), Err(Error::InvalidAmount(0.0)));
        assert_eq!(validate_amount(-5.0), Err(Error::InvalidAmount(-5.0)));
    }

    #[test]
    fn rejects_non_finite_amounts() {
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }
}
