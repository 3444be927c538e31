//! Client-side state for the expense UI.
//!
//! Nothing here renders anything. The list view, the shared create/edit form
//! and the category summary hold the state a UI displays, and [api] talks to
//! the REST API.

pub mod api;
pub mod form;
pub mod list_view;
pub mod summary;

pub use api::{ExpenseApi, HttpExpenseApi};
pub use form::{ExpenseForm, FormError};
pub use list_view::{ListView, LoadState};
pub use summary::Summary;

/// Errors surfaced to the user as a banner message.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("could not reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("{message} (HTTP {status})")]
    Api { status: u16, message: String },

    /// The form was rejected before any request was made.
    #[error(transparent)]
    Form(#[from] FormError),
}
