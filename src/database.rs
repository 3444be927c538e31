use anyhow::Result;
use libsql::{Builder, Connection, Database};
use std::{path::Path, sync::Arc};

use crate::constants::{BUSY_TIMEOUT_MS, DATABASE_FILE_NAME};

const CREATE_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS expenses (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    amount_cents  INTEGER NOT NULL CHECK (amount_cents > 0),
    description   TEXT    NOT NULL,
    date          TEXT    NOT NULL,
    category      TEXT    NOT NULL,
    version       INTEGER NOT NULL DEFAULT 1
);
"#;

const CREATE_EXPENSES_DATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses (date DESC, id ASC);";

pub type Db = Arc<Database>;

/// Expense database (expenses.db) under `data_dir`, with the schema in place.
pub async fn init_db(data_dir: &str) -> Result<Db> {
    tokio::fs::create_dir_all(data_dir).await?;
    let path = Path::new(data_dir).join(DATABASE_FILE_NAME);
    let db = Builder::new_local(path).build().await?;

    let conn = db.connect()?;
    conn.execute(CREATE_EXPENSES_TABLE, ()).await?;
    conn.execute(CREATE_EXPENSES_DATE_INDEX, ()).await?;

    tracing::debug!("expense database ready in {}", data_dir);
    Ok(Arc::new(db))
}

/// Opens a new connection for a single unit of work.
///
/// Connections are not shared between requests; concurrent writers wait on
/// the SQLite lock for up to [BUSY_TIMEOUT_MS] before failing.
pub async fn connect(db: &Db) -> Result<Connection, libsql::Error> {
    let conn = db.connect()?;
    let mut rows = conn
        .query(&format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS), ())
        .await?;
    while rows.next().await?.is_some() {}
    Ok(conn)
}
