//! The record store: persistence of expenses in the libsql database.
use async_trait::async_trait;
use libsql::{Connection, Value, params::Params};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use time::Date;

use crate::error::Error;
use crate::models::{Expense, ExpenseFilter, ExpenseId, NewExpense, format_date, parse_date};

const SELECT_EXPENSE_COLUMNS: &str =
    "SELECT id, amount_cents, description, date, category FROM expenses";

/// Storage operations the expense service relies on.
#[async_trait]
pub trait ExpenseRepository: Send + Sync {
    /// Expenses matching every present field of `filter`, most recent first.
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, Error>;

    async fn get(&self, id: ExpenseId) -> Result<Expense, Error>;

    /// Persists `expense` under a newly assigned id.
    async fn create(&self, expense: NewExpense) -> Result<Expense, Error>;

    /// Replaces every field of the expense `id`.
    ///
    /// Fails with [Error::NotFound] when the expense does not exist and with
    /// [Error::Conflict] when another write to the same expense won a race.
    async fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), Error>;

    async fn delete(&self, id: ExpenseId) -> Result<(), Error>;
}

/// Expense store backed by a single libsql connection.
///
/// A store is meant to live for one request: build it from a fresh
/// connection, use it, drop it.
#[derive(Clone)]
pub struct SqlExpenseStore {
    conn: Connection,
}

pub fn extract_expense_from_row(row: &libsql::Row) -> Result<Expense, Error> {
    let id: i64 = row.get(0)?;
    let amount_cents: i64 = row.get(1)?;
    let description: String = row.get(2)?;
    let date: String = row.get(3)?;
    let category: String = row.get(4)?;

    let date = parse_date(&date)
        .map_err(|e| Error::Database(format!("expense {} has a corrupt date: {}", id, e)))?;

    Ok(Expense {
        id,
        amount: Decimal::new(amount_cents, 2),
        description,
        date,
        category,
    })
}

fn date_to_text(date: Date) -> Result<String, Error> {
    format_date(date).map_err(|e| Error::Database(format!("date {} cannot be stored: {}", date, e)))
}

fn amount_to_cents(amount: Decimal) -> Result<i64, Error> {
    (amount * Decimal::ONE_HUNDRED)
        .trunc()
        .to_i64()
        .ok_or_else(|| Error::Database(format!("amount {} cannot be stored", amount)))
}

impl SqlExpenseStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub async fn exists(&self, id: ExpenseId) -> Result<bool, Error> {
        let mut rows = self
            .conn
            .query("SELECT 1 FROM expenses WHERE id = ?", [id])
            .await?;
        Ok(rows.next().await?.is_some())
    }

    /// The current write version of the expense `id`.
    pub async fn current_version(&self, id: ExpenseId) -> Result<i64, Error> {
        let mut rows = self
            .conn
            .query("SELECT version FROM expenses WHERE id = ?", [id])
            .await?;

        match rows.next().await? {
            Some(row) => Ok(row.get(0)?),
            None => Err(Error::NotFound(id)),
        }
    }

    /// Writes `expense` only if the stored row is still at `version`.
    ///
    /// When no row is written the store re-checks whether the expense exists
    /// to tell a deleted expense ([Error::NotFound]) from a lost race
    /// ([Error::Conflict]).
    pub async fn update_if_version(
        &self,
        id: ExpenseId,
        version: i64,
        expense: NewExpense,
    ) -> Result<(), Error> {
        let affected_rows = self
            .conn
            .execute(
                "UPDATE expenses SET amount_cents = ?, description = ?, date = ?, category = ?, version = version + 1 WHERE id = ? AND version = ?",
                (
                    amount_to_cents(expense.amount)?,
                    expense.description,
                    date_to_text(expense.date)?,
                    expense.category,
                    id,
                    version,
                ),
            )
            .await?;

        if affected_rows == 0 {
            return Err(self.resolve_write_conflict(id).await);
        }

        tracing::debug!("updated expense {} from version {}", id, version);
        Ok(())
    }

    async fn resolve_write_conflict(&self, id: ExpenseId) -> Error {
        match self.exists(id).await {
            Ok(true) => {
                tracing::warn!("concurrent write detected for expense {}", id);
                Error::Conflict(id)
            }
            Ok(false) => Error::NotFound(id),
            Err(error) => error,
        }
    }
}

#[async_trait]
impl ExpenseRepository for SqlExpenseStore {
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, Error> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();

        if let Some(year) = filter.year {
            conditions.push("CAST(strftime('%Y', date) AS INTEGER) = ?");
            params.push(Value::Integer(i64::from(year)));
        }
        if let Some(month) = filter.month {
            conditions.push("CAST(strftime('%m', date) AS INTEGER) = ?");
            params.push(Value::Integer(i64::from(month)));
        }
        if let Some(category) = filter.category() {
            conditions.push("category = ?");
            params.push(Value::Text(category.to_string()));
        }

        let mut query = SELECT_EXPENSE_COLUMNS.to_string();
        if !conditions.is_empty() {
            query.push_str(" WHERE ");
            query.push_str(&conditions.join(" AND "));
        }
        query.push_str(" ORDER BY date DESC, id ASC");

        let mut rows = self
            .conn
            .query(&query, Params::Positional(params))
            .await?;

        let mut expenses = Vec::new();
        while let Some(row) = rows.next().await? {
            expenses.push(extract_expense_from_row(&row)?);
        }

        tracing::debug!("listed {} expenses for {:?}", expenses.len(), filter);
        Ok(expenses)
    }

    async fn get(&self, id: ExpenseId) -> Result<Expense, Error> {
        let mut rows = self
            .conn
            .query(&format!("{} WHERE id = ?", SELECT_EXPENSE_COLUMNS), [id])
            .await?;

        match rows.next().await? {
            Some(row) => extract_expense_from_row(&row),
            None => Err(Error::NotFound(id)),
        }
    }

    async fn create(&self, expense: NewExpense) -> Result<Expense, Error> {
        self.conn
            .execute(
                "INSERT INTO expenses (amount_cents, description, date, category) VALUES (?, ?, ?, ?)",
                (
                    amount_to_cents(expense.amount)?,
                    expense.description.as_str(),
                    date_to_text(expense.date)?,
                    expense.category.as_str(),
                ),
            )
            .await?;
        let id = self.conn.last_insert_rowid();

        tracing::debug!("created expense {}", id);
        Ok(Expense {
            id,
            amount: expense.amount,
            description: expense.description,
            date: expense.date,
            category: expense.category,
        })
    }

    async fn update(&self, id: ExpenseId, expense: NewExpense) -> Result<(), Error> {
        let version = self.current_version(id).await?;
        self.update_if_version(id, version, expense).await
    }

    async fn delete(&self, id: ExpenseId) -> Result<(), Error> {
        let affected_rows = self
            .conn
            .execute("DELETE FROM expenses WHERE id = ?", [id])
            .await?;

        if affected_rows == 0 {
            return Err(Error::NotFound(id));
        }

        tracing::debug!("deleted expense {}", id);
        Ok(())
    }
}
