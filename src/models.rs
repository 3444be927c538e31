use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt::Display, str::FromStr};
use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

pub type ExpenseId = i64;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// A stored expense, as handed out by the record store.
#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: ExpenseId,
    pub amount: Decimal,
    pub description: String,
    pub date: Date,
    pub category: String,
}

/// The validated fields of an expense that has no id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewExpense {
    pub amount: Decimal,
    pub description: String,
    pub date: Date,
    pub category: String,
}

/// A validated request body: the expense fields plus the id the client
/// embedded in the payload, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseInput {
    pub id: Option<ExpenseId>,
    pub expense: NewExpense,
}

/// The wire representation of an expense returned by the API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ExpenseDto {
    #[serde(alias = "Id")]
    pub id: ExpenseId,
    #[serde(alias = "Amount", with = "rust_decimal::serde::arbitrary_precision")]
    pub amount: Decimal,
    #[serde(alias = "Description")]
    pub description: String,
    #[serde(alias = "Date", with = "date_format")]
    pub date: Date,
    #[serde(alias = "Category")]
    pub category: String,
}

/// The body of a create or update request.
///
/// Every field is optional so that missing fields are reported by validation
/// as field-level errors instead of a deserialization failure.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExpensePayload {
    #[serde(default, alias = "Id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ExpenseId>,
    #[serde(
        default,
        alias = "Amount",
        with = "rust_decimal::serde::arbitrary_precision_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub amount: Option<Decimal>,
    #[serde(default, alias = "Description", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        alias = "Date",
        with = "date_format::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<Date>,
    #[serde(default, alias = "Category", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

/// Optional restrictions applied when listing expenses. Absent or empty fields
/// do not restrict anything; present fields are combined with AND.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<i32>,
    #[serde(
        default,
        deserialize_with = "empty_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub month: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl ExpenseFilter {
    /// The category restriction, ignoring empty strings.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref().filter(|category| !category.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn matches(&self, expense: &ExpenseDto) -> bool {
        self.year.is_none_or(|year| expense.date.year() == year)
            && self
                .month
                .is_none_or(|month| u8::from(expense.date.month()) == month)
            && self
                .category()
                .is_none_or(|category| expense.category == category)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// The JSON body of every error response.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorBody {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }
}

impl From<Expense> for ExpenseDto {
    fn from(expense: Expense) -> Self {
        ExpenseDto {
            id: expense.id,
            amount: expense.amount,
            description: expense.description,
            date: expense.date,
            category: expense.category,
        }
    }
}

/// Reads a query value that a cleared form field sends as `key=`. Blank
/// values count as absent.
fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) if !text.trim().is_empty() => text
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}

/// Parses either a plain `YYYY-MM-DD` date or an RFC 3339 timestamp. Timestamps
/// are converted to UTC before the calendar date is taken.
pub fn parse_date(text: &str) -> Result<Date, String> {
    let text = text.trim();
    if let Ok(date) = Date::parse(text, DATE_FORMAT) {
        return Ok(date);
    }

    OffsetDateTime::parse(text, &Rfc3339)
        .map(|timestamp| timestamp.to_offset(UtcOffset::UTC).date())
        .map_err(|_| format!("invalid date \"{}\", expected YYYY-MM-DD", text))
}

pub mod date_format {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(date: &Date, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = super::format_date(*date).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Date, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_date(&text).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use serde::{Deserialize, Deserializer, Serializer};
        use time::Date;

        pub fn serialize<S>(date: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
        {
            match date {
                Some(date) => {
                    let text = super::super::format_date(*date).map_err(serde::ser::Error::custom)?;
                    serializer.serialize_str(&text)
                }
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
        where
            D: Deserializer<'de>,
        {
            match Option::<String>::deserialize(deserializer)? {
                Some(text) => super::super::parse_date(&text)
                    .map(Some)
                    .map_err(serde::de::Error::custom),
                None => Ok(None),
            }
        }
    }
}
