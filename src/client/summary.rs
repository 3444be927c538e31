use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::models::ExpenseDto;

/// Totals per category and overall for the expenses currently shown.
///
/// Aggregation is done on the client over whatever the list view last
/// loaded; the API only filters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    pub per_category: BTreeMap<String, Decimal>,
    pub total: Decimal,
}

impl Summary {
    pub fn from_expenses(expenses: &[ExpenseDto]) -> Self {
        let mut summary = Summary::default();
        for expense in expenses {
            *summary
                .per_category
                .entry(expense.category.clone())
                .or_default() += expense.amount;
            summary.total += expense.amount;
        }
        summary
    }

    pub fn category_total(&self, category: &str) -> Decimal {
        self.per_category
            .get(category)
            .copied()
            .unwrap_or_default()
    }
}
