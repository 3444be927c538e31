use rust_decimal::Decimal;

use crate::constants::*;
use crate::error::Error;
use crate::models::{ExpenseFilter, ExpenseId, ExpenseInput, ExpensePayload, FieldError, NewExpense};

/// Checks a trimmed text field is present, non-blank and at most `max_length`
/// characters long.
pub fn validate_string_length(
    value: Option<&str>,
    field_name: &str,
    max_length: usize,
) -> Result<String, String> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(format!("{} is required", field_name));
    }
    if value.chars().count() > max_length {
        return Err(format!(
            "{} cannot exceed {} characters",
            field_name, max_length
        ));
    }
    Ok(value.to_string())
}

pub fn validate_amount(amount: Option<Decimal>) -> Result<Decimal, String> {
    let amount = amount.ok_or_else(|| "amount is required".to_string())?;
    if amount <= Decimal::ZERO {
        return Err("amount must be greater than 0".to_string());
    }
    if amount.normalize().scale() > MAX_AMOUNT_FRACTION_DIGITS {
        return Err(format!(
            "amount cannot have more than {} decimal places",
            MAX_AMOUNT_FRACTION_DIGITS
        ));
    }
    if amount > Decimal::new(MAX_AMOUNT_CENTS, 2) {
        return Err("amount is too large".to_string());
    }
    Ok(amount)
}

/// Validates a create or update body, collecting every failing field.
pub fn validate_expense(payload: &ExpensePayload) -> Result<ExpenseInput, Error> {
    let mut errors = Vec::new();

    let amount = validate_amount(payload.amount)
        .map_err(|message| errors.push(FieldError::new("amount", message)))
        .ok();
    let description = validate_string_length(
        payload.description.as_deref(),
        "description",
        MAX_DESCRIPTION_LENGTH,
    )
    .map_err(|message| errors.push(FieldError::new("description", message)))
    .ok();
    let date = match payload.date {
        Some(date) if date.year() < MIN_YEAR => {
            errors.push(FieldError::new("date", "date is out of range"));
            None
        }
        Some(date) => Some(date),
        None => {
            errors.push(FieldError::new("date", "date is required"));
            None
        }
    };
    let category = validate_string_length(
        payload.category.as_deref(),
        "category",
        MAX_CATEGORY_LENGTH,
    )
    .map_err(|message| errors.push(FieldError::new("category", message)))
    .ok();

    match (amount, description, date, category) {
        (Some(amount), Some(description), Some(date), Some(category)) if errors.is_empty() => {
            Ok(ExpenseInput {
                id: payload.id,
                expense: NewExpense {
                    amount,
                    description,
                    date,
                    category,
                },
            })
        }
        _ => Err(Error::Validation(errors)),
    }
}

/// Checks that an id embedded in an update body names the expense in the path.
pub fn validate_payload_id(path_id: ExpenseId, body_id: Option<ExpenseId>) -> Result<(), Error> {
    match body_id {
        Some(body_id) if body_id != path_id => Err(Error::IdMismatch {
            path: path_id,
            body: body_id,
        }),
        _ => Ok(()),
    }
}

pub fn validate_filter(filter: &ExpenseFilter) -> Result<(), Error> {
    if let Some(month) = filter.month {
        if !(1..=12).contains(&month) {
            return Err(Error::InvalidQuery(format!(
                "month must be between 1 and 12, got {}",
                month
            )));
        }
    }
    Ok(())
}
