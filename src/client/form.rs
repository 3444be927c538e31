use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::SUGGESTED_CATEGORIES;
use crate::models::{ExpenseDto, ExpenseId, ExpensePayload, format_date, parse_date};

/// Reasons a form submission is refused without contacting the server.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("please fill in the {0} field")]
    MissingField(&'static str),

    #[error("amount must be a number")]
    InvalidAmount,

    #[error("amount must be greater than 0")]
    NonPositiveAmount,

    #[error("date must look like YYYY-MM-DD")]
    InvalidDate,
}

/// The shared create/edit form. Fields hold exactly what the user typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseForm {
    /// The expense being edited, `None` when creating.
    pub editing: Option<ExpenseId>,
    pub amount: String,
    pub description: String,
    pub date: String,
    pub category: String,
}

impl ExpenseForm {
    /// An empty form for a new expense.
    pub fn new() -> Self {
        Self::default()
    }

    /// A form prefilled with `expense`, submitting updates to it.
    pub fn edit(expense: &ExpenseDto) -> Self {
        Self {
            editing: Some(expense.id),
            amount: expense.amount.to_string(),
            description: expense.description.clone(),
            // An unformattable date leaves the field empty for the user to fill.
            date: format_date(expense.date).unwrap_or_default(),
            category: expense.category.clone(),
        }
    }

    /// Categories offered in the picker. Any other text is accepted too.
    pub fn suggested_categories() -> &'static [&'static str] {
        &SUGGESTED_CATEGORIES
    }

    pub fn is_editing(&self) -> bool {
        self.editing.is_some()
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Checks the form and builds the request body.
    ///
    /// Every required field must be non-empty and the amount must be a
    /// number greater than zero. In edit mode the payload carries the id of
    /// the edited expense.
    pub fn to_payload(&self) -> Result<ExpensePayload, FormError> {
        let amount = self.amount.trim();
        let description = self.description.trim();
        let date = self.date.trim();
        let category = self.category.trim();

        for (value, field) in [
            (amount, "amount"),
            (description, "description"),
            (date, "date"),
            (category, "category"),
        ] {
            if value.is_empty() {
                return Err(FormError::MissingField(field));
            }
        }

        let amount = Decimal::from_str(amount).map_err(|_| FormError::InvalidAmount)?;
        if amount <= Decimal::ZERO {
            return Err(FormError::NonPositiveAmount);
        }
        let date = parse_date(date).map_err(|_| FormError::InvalidDate)?;

        Ok(ExpensePayload {
            id: self.editing,
            amount: Some(amount),
            description: Some(description.to_string()),
            date: Some(date),
            category: Some(category.to_string()),
        })
    }
}
