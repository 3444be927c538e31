// Server configuration
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: &str = "3000";
pub const DEFAULT_DATA_PATH: &str = "data";
pub const DEFAULT_LOG_FILTER: &str = "expense_tracker=info,tower_http=info";

// Database
pub const DATABASE_FILE_NAME: &str = "expenses.db";
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

// Validation limits
pub const MAX_DESCRIPTION_LENGTH: usize = 200;
pub const MAX_CATEGORY_LENGTH: usize = 50;
pub const MAX_AMOUNT_FRACTION_DIGITS: u32 = 2;
/// Largest storable amount in cents, matching a decimal(18,2) column.
pub const MAX_AMOUNT_CENTS: i64 = 999_999_999_999_999_999;
pub const MIN_YEAR: i32 = 1;

// Categories offered by the client form. The server accepts any category.
pub const SUGGESTED_CATEGORIES: [&str; 6] = [
    "Food",
    "Transport",
    "Housing",
    "Entertainment",
    "Health",
    "Other",
];

// Error messages
pub const ERR_VALIDATION: &str = "validation failed";
pub const ERR_INVALID_BODY: &str = "invalid request body";
pub const ERR_INTERNAL: &str = "Internal server error";
