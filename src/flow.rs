// src/flow.rs

//! Listing/detail view flow shared by every admin screen.
//!
//! ```text
//! Loading ──fetch──▶ Loaded ──select──▶ DetailOpen ──close──▶ Loaded
//!                      │
//!                      └──request delete──▶ DeleteConfirm ──cancel / deleted + re-fetch──▶ Loaded
//! ```
//!
//! Failures are reported and the flow stops: a failed fetch lands in an
//! empty `Loaded` list, a failed delete returns to `Loaded` with the list
//! untouched. Nothing is retried.

use std::mem;

use thiserror::Error;

use crate::{
    models::{Entity, exam_result::ExamResult, load_all},
    state::SharedStore,
    stats,
    store::{Filter, StoreError},
};

#[derive(Debug, Clone, PartialEq)]
pub enum ListingState<T> {
    Loading,
    Loaded(Vec<T>),
    DetailOpen { items: Vec<T>, selected: String },
    DeleteConfirm { items: Vec<T>, pending: String },
}

impl<T> ListingState<T> {
    fn name(&self) -> &'static str {
        match self {
            ListingState::Loading => "Loading",
            ListingState::Loaded(_) => "Loaded",
            ListingState::DetailOpen { .. } => "DetailOpen",
            ListingState::DeleteConfirm { .. } => "DeleteConfirm",
        }
    }

    pub fn items(&self) -> &[T] {
        match self {
            ListingState::Loading => &[],
            ListingState::Loaded(items)
            | ListingState::DetailOpen { items, .. }
            | ListingState::DeleteConfirm { items, .. } => items,
        }
    }
}

#[derive(Debug)]
pub enum ListingEvent<T> {
    Fetched(Result<Vec<T>, StoreError>),
    Select(String),
    Close,
    RequestDelete(String),
    Cancel,
    /// Deletion succeeded; carries the outcome of the follow-up re-fetch.
    Deleted(Result<Vec<T>, StoreError>),
    DeleteFailed,
}

impl<T> ListingEvent<T> {
    fn name(&self) -> &'static str {
        match self {
            ListingEvent::Fetched(_) => "Fetched",
            ListingEvent::Select(_) => "Select",
            ListingEvent::Close => "Close",
            ListingEvent::RequestDelete(_) => "RequestDelete",
            ListingEvent::Cancel => "Cancel",
            ListingEvent::Deleted(_) => "Deleted",
            ListingEvent::DeleteFailed => "DeleteFailed",
        }
    }
}

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("cannot handle {event} while {state}")]
    InvalidTransition {
        state: &'static str,
        event: &'static str,
    },

    #[error("no item with id '{0}' in the current list")]
    UnknownItem(String),

    #[error("write failed: {0}")]
    Write(#[from] StoreError),
}

/// Fetch outcome under the report-and-stop policy.
fn settle<T>(fetched: Result<Vec<T>, StoreError>, context: &str) -> Vec<T> {
    fetched.unwrap_or_else(|e| {
        tracing::error!("Error fetching {}: {}", context, e);
        Vec::new()
    })
}

impl<T: Entity> ListingState<T> {
    /// Applies one event. On error the state is left unchanged.
    pub fn apply(&mut self, event: ListingEvent<T>) -> Result<(), FlowError> {
        let invalid = FlowError::InvalidTransition {
            state: self.name(),
            event: event.name(),
        };

        let next = match (mem::replace(self, ListingState::Loading), event) {
            (ListingState::Loading, ListingEvent::Fetched(fetched)) => {
                ListingState::Loaded(settle(fetched, "listing"))
            }
            (ListingState::Loaded(items), ListingEvent::Select(id)) => {
                if !items.iter().any(|i| i.id() == id) {
                    *self = ListingState::Loaded(items);
                    return Err(FlowError::UnknownItem(id));
                }
                ListingState::DetailOpen { items, selected: id }
            }
            (ListingState::DetailOpen { items, .. }, ListingEvent::Close) => {
                ListingState::Loaded(items)
            }
            (ListingState::Loaded(items), ListingEvent::RequestDelete(id)) => {
                if !items.iter().any(|i| i.id() == id) {
                    *self = ListingState::Loaded(items);
                    return Err(FlowError::UnknownItem(id));
                }
                ListingState::DeleteConfirm { items, pending: id }
            }
            (ListingState::DeleteConfirm { items, .. }, ListingEvent::Cancel)
            | (ListingState::DeleteConfirm { items, .. }, ListingEvent::DeleteFailed) => {
                ListingState::Loaded(items)
            }
            (ListingState::DeleteConfirm { .. }, ListingEvent::Deleted(refetched)) => {
                ListingState::Loaded(settle(refetched, "listing after delete"))
            }
            (previous, _) => {
                *self = previous;
                return Err(invalid);
            }
        };

        *self = next;
        Ok(())
    }
}

/// Drives a [`ListingState`] against the document store.
///
/// This is the client-side view model of an admin screen. It follows the
/// report-and-stop policy above; the HTTP handlers instead answer a failed
/// fetch with a 500.
pub struct ListingFlow<T: Entity> {
    store: SharedStore,
    filter: Option<Filter>,
    ordering: Option<fn(&mut [T])>,
    state: ListingState<T>,
}

impl<T: Entity> ListingFlow<T> {
    /// A flow over the whole collection, or the part matching `filter`.
    pub fn new(store: SharedStore, filter: Option<Filter>) -> Self {
        Self {
            store,
            filter,
            ordering: None,
            state: ListingState::Loading,
        }
    }

    /// Orders every fetched list before it enters the state.
    pub fn with_ordering(mut self, ordering: fn(&mut [T])) -> Self {
        self.ordering = Some(ordering);
        self
    }

    pub fn state(&self) -> &ListingState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        self.state.items()
    }

    /// The item shown in the detail view, if one is open.
    pub fn selected(&self) -> Option<&T> {
        match &self.state {
            ListingState::DetailOpen { items, selected } => {
                items.iter().find(|i| i.id() == selected)
            }
            _ => None,
        }
    }

    async fn fetch(&self) -> Result<Vec<T>, StoreError> {
        let mut items = load_all::<T>(self.store.as_ref(), self.filter.as_ref()).await?;
        if let Some(order) = self.ordering {
            order(&mut items);
        }
        Ok(items)
    }

    /// `Loading → Loaded`. A failed fetch is logged and yields an empty list.
    pub async fn load(&mut self) -> Result<(), FlowError> {
        let fetched = self.fetch().await;
        self.state.apply(ListingEvent::Fetched(fetched))
    }

    pub fn select(&mut self, id: &str) -> Result<&T, FlowError> {
        self.state.apply(ListingEvent::Select(id.to_string()))?;
        self.selected().ok_or_else(|| FlowError::UnknownItem(id.to_string()))
    }

    pub fn close(&mut self) -> Result<(), FlowError> {
        self.state.apply(ListingEvent::Close)
    }

    pub fn request_delete(&mut self, id: &str) -> Result<(), FlowError> {
        self.state.apply(ListingEvent::RequestDelete(id.to_string()))
    }

    pub fn cancel(&mut self) -> Result<(), FlowError> {
        self.state.apply(ListingEvent::Cancel)
    }

    /// Deletes the pending item and re-fetches the list.
    ///
    /// A failed delete is logged and returned so the caller can notify the
    /// user; the flow goes back to `Loaded` with the previous list.
    pub async fn confirm_delete(&mut self) -> Result<(), FlowError> {
        let pending = match &self.state {
            ListingState::DeleteConfirm { pending, .. } => pending.clone(),
            other => {
                return Err(FlowError::InvalidTransition {
                    state: other.name(),
                    event: "ConfirmDelete",
                });
            }
        };

        if let Err(e) = self.store.delete(T::COLLECTION, &pending).await {
            tracing::error!("Error deleting {} from {}: {}", pending, T::COLLECTION, e);
            self.state.apply(ListingEvent::DeleteFailed)?;
            return Err(FlowError::Write(e));
        }

        let refetched = self.fetch().await;
        self.state.apply(ListingEvent::Deleted(refetched))
    }
}

/// Results screen of one module: submissions most recent first.
pub fn exam_results(store: SharedStore, module_id: &str) -> ListingFlow<ExamResult> {
    ListingFlow::new(store, Some(Filter::eq("moduleId", module_id)))
        .with_ordering(stats::sort_by_submission_desc)
}
