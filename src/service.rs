//! Maps between the wire representation of expenses and the stored entities.
use crate::error::Error;
use crate::models::{ExpenseDto, ExpenseFilter, ExpenseId, ExpenseInput};
use crate::store::ExpenseRepository;
use crate::validation::{validate_filter, validate_payload_id};

pub struct ExpenseService<R> {
    repository: R,
}

impl<R: ExpenseRepository> ExpenseService<R> {
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    pub async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<ExpenseDto>, Error> {
        validate_filter(filter)?;
        let expenses = self.repository.list(filter).await?;
        Ok(expenses.into_iter().map(ExpenseDto::from).collect())
    }

    pub async fn get_by_id(&self, id: ExpenseId) -> Result<ExpenseDto, Error> {
        self.repository.get(id).await.map(ExpenseDto::from)
    }

    /// Creates an expense. Any id the client put in the payload is ignored,
    /// the store assigns one.
    pub async fn create(&self, input: ExpenseInput) -> Result<ExpenseDto, Error> {
        if let Some(id) = input.id {
            tracing::debug!("ignoring client supplied id {} on create", id);
        }
        let created = self.repository.create(input.expense).await?;
        Ok(ExpenseDto::from(created))
    }

    /// Replaces the expense `id`. The payload id, when present, must name the
    /// same expense; a mismatch is rejected without touching the store.
    pub async fn update(&self, id: ExpenseId, input: ExpenseInput) -> Result<(), Error> {
        validate_payload_id(id, input.id)?;
        self.repository.update(id, input.expense).await
    }

    pub async fn delete(&self, id: ExpenseId) -> Result<(), Error> {
        self.repository.delete(id).await
    }
}
