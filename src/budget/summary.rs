//! Spend-vs-remaining figures derived from a budget's allocation and spent total.

/// How much of a budget has been used.
///
/// Computed on every read from the budget's current `amount` and `spent`,
/// never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetSummary {
    /// `spent / amount`, so `1.0` means the budget is exactly used up.
    pub percent_spent: f64,
    /// Whether more than the allocation has been spent.
    pub is_over_budget: bool,
    /// `amount - spent`, negative when over budget.
    pub remaining: f64,
}

impl BudgetSummary {
    /// Summarize a budget with allocation `amount` and total `spent`.
    ///
    /// A zero allocation has a percent spent of zero while nothing is spent
    /// and infinity as soon as anything is.
    pub fn new(amount: f64, spent: f64) -> Self {
        let percent_spent = if amount == 0.0 {
            if spent == 0.0 { 0.0 } else { f64::INFINITY }
        } else {
            spent / amount
        };

        Self {
            percent_spent,
            is_over_budget: percent_spent > 1.0,
            remaining: amount - spent,
        }
    }

    /// The width of the progress bar as a whole percentage between 0 and 100.
    pub fn progress_percent(&self) -> u8 {
        if self.percent_spent.is_nan() {
            return 0;
        }

        (self.percent_spent * 100.0).round().clamp(0.0, 100.0) as u8
    }
}
