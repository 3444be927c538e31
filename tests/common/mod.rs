#![allow(dead_code)]

use expense_tracker::database::{Db, init_db};
use expense_tracker::models::{Expense, NewExpense};
use expense_tracker::state::AppState;
use expense_tracker::store::{ExpenseRepository, SqlExpenseStore};
use expense_tracker::build_router;
use rust_decimal::Decimal;
use tempfile::{TempDir, tempdir};
use time::Date;

/// Creates an isolated database in a fresh temporary directory.
///
/// The directory is removed when the returned `TempDir` is dropped, so keep
/// it alive for the duration of the test.
pub async fn setup_test_environment() -> (Db, TempDir) {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    let data_path = temp_dir
        .path()
        .to_str()
        .expect("Failed to convert path to string")
        .to_string();

    let db = init_db(&data_path)
        .await
        .unwrap_or_else(|e| panic!("Failed to initialize database at {}: {}", data_path, e));

    (db, temp_dir)
}

/// A store on its own connection, like the one a request would get.
pub async fn open_store(db: &Db) -> SqlExpenseStore {
    AppState::new(db.clone())
        .expense_store()
        .await
        .expect("Failed to open expense store")
}

pub fn new_expense(amount_cents: i64, description: &str, date: Date, category: &str) -> NewExpense {
    NewExpense {
        amount: Decimal::new(amount_cents, 2),
        description: description.to_string(),
        date,
        category: category.to_string(),
    }
}

pub async fn create_test_expense(
    store: &SqlExpenseStore,
    amount_cents: i64,
    description: &str,
    date: Date,
    category: &str,
) -> Expense {
    store
        .create(new_expense(amount_cents, description, date, category))
        .await
        .unwrap_or_else(|e| panic!("Failed to insert test expense '{}': {}", description, e))
}

/// Serves the API on an ephemeral local port and returns its base URL.
pub async fn spawn_test_server() -> (String, TempDir) {
    let (db, temp_dir) = setup_test_environment().await;
    let app = build_router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let address = listener
        .local_addr()
        .expect("Failed to read test listener address");

    tokio::spawn(async move {
        axum::serve(listener, app)
            .await
            .expect("Test server stopped unexpectedly");
    });

    (format!("http://{}", address), temp_dir)
}
