pub mod client;
pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod expenses;
pub mod logging;
pub mod models;
pub mod routes;
pub mod service;
pub mod state;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::Error;
pub use routes::build_router;
pub use state::AppState;
