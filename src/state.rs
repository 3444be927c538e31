use axum::{extract::FromRequestParts, http::request::Parts};

use crate::database::{self, Db};
use crate::error::Error;
use crate::service::ExpenseService;
use crate::store::SqlExpenseStore;

/// Shared application state: the database handle, not a connection.
#[derive(Clone)]
pub struct AppState {
    pub db: Db,
}

impl AppState {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Builds a store on a fresh connection owned by the caller.
    pub async fn expense_store(&self) -> Result<SqlExpenseStore, Error> {
        let conn = database::connect(&self.db).await?;
        Ok(SqlExpenseStore::new(conn))
    }
}

/// Every request gets its own service, store and connection.
impl FromRequestParts<AppState> for ExpenseService<SqlExpenseStore> {
    type Rejection = Error;

    async fn from_request_parts(
        _parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(ExpenseService::new(state.expense_store().await?))
    }
}
