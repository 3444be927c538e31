use super::{ClientError, ExpenseApi, ExpenseForm, Summary};
use crate::models::{ExpenseDto, ExpenseFilter, ExpenseId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed,
}

/// A list request that has been issued but not applied yet.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadTicket {
    pub sequence: u64,
    pub filter: ExpenseFilter,
}

/// State of the expense list screen.
///
/// The view starts in [LoadState::Loading] and goes back to it whenever the
/// filter changes. Every successful create, update or delete is followed by
/// a full reload of the filtered list; nothing is patched locally. Failed
/// requests leave the last loaded expenses in place and set an error
/// message for a banner.
pub struct ListView<A> {
    api: A,
    filter: ExpenseFilter,
    state: LoadState,
    expenses: Vec<ExpenseDto>,
    error: Option<String>,
    next_sequence: u64,
    last_applied: Option<u64>,
}

impl<A: ExpenseApi> ListView<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            filter: ExpenseFilter::default(),
            state: LoadState::Loading,
            expenses: Vec::new(),
            error: None,
            next_sequence: 0,
            last_applied: None,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn filter(&self) -> &ExpenseFilter {
        &self.filter
    }

    pub fn expenses(&self) -> &[ExpenseDto] {
        &self.expenses
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sequence number of the response currently displayed.
    pub fn last_applied(&self) -> Option<u64> {
        self.last_applied
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn summary(&self) -> Summary {
        Summary::from_expenses(&self.expenses)
    }

    /// Loads the list for the current filter.
    pub async fn reload(&mut self) {
        let ticket = self.begin_load();
        let result = self.api.list(&ticket.filter).await;
        self.finish_load(ticket, result);
    }

    pub async fn set_filter(&mut self, filter: ExpenseFilter) {
        self.filter = filter;
        self.reload().await;
    }

    /// Marks the view as loading and hands out the request to issue.
    ///
    /// Requests are not cancelled or de-duplicated. Whichever response is
    /// passed to [Self::finish_load] last is the one displayed.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.next_sequence += 1;
        self.state = LoadState::Loading;
        LoadTicket {
            sequence: self.next_sequence,
            filter: self.filter.clone(),
        }
    }

    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: Result<Vec<ExpenseDto>, ClientError>,
    ) {
        match result {
            Ok(expenses) => {
                self.expenses = expenses;
                self.state = LoadState::Loaded;
                self.error = None;
            }
            Err(error) => {
                tracing::warn!("loading expenses failed: {}", error);
                self.state = LoadState::Failed;
                self.error = Some(format!("Could not load expenses: {}", error));
            }
        }
        self.last_applied = Some(ticket.sequence);
    }

    /// Submits the form as a create or an update, then reloads the list.
    ///
    /// An invalid form is refused without issuing any request.
    pub async fn submit(&mut self, form: &ExpenseForm) -> Result<(), ClientError> {
        let payload = match form.to_payload() {
            Ok(payload) => payload,
            Err(error) => {
                self.error = Some(error.to_string());
                return Err(error.into());
            }
        };

        let result = match form.editing {
            Some(id) => self.api.update(id, &payload).await,
            None => self.api.create(&payload).await.map(|_| ()),
        };

        match result {
            Ok(()) => {
                self.error = None;
                self.reload().await;
                Ok(())
            }
            Err(error) => {
                self.error = Some(format!("Could not save the expense: {}", error));
                Err(error)
            }
        }
    }

    /// Deletes the expense `id` once `confirm` agrees, then reloads the list.
    ///
    /// Returns `Ok(false)` when the user declined and no request was made.
    pub async fn delete<F>(&mut self, id: ExpenseId, confirm: F) -> Result<bool, ClientError>
    where
        F: FnOnce(ExpenseId) -> bool,
    {
        if !confirm(id) {
            return Ok(false);
        }

        match self.api.delete(id).await {
            Ok(()) => {
                self.error = None;
                self.reload().await;
                Ok(true)
            }
            Err(error) => {
                self.error = Some(format!("Could not delete the expense: {}", error));
                Err(error)
            }
        }
    }
}
