// tests/flow_tests.rs

use std::sync::Arc;

use async_trait::async_trait;
use finlit_admin::{
    flow::{self, FlowError, ListingFlow, ListingState},
    models::category::EventCategory,
    state::SharedStore,
    store::{Document, DocumentStore, Fields, Filter, InMemoryStore, StoreError, fields},
};
use serde_json::json;

/// Wraps an in-memory store and fails the operations it is told to.
struct FlakyStore {
    inner: InMemoryStore,
    fail_reads: bool,
    fail_deletes: bool,
}

fn outage() -> StoreError {
    StoreError::Backend("store unavailable".to_string())
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        if self.fail_reads {
            return Err(outage());
        }
        self.inner.list(collection).await
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        if self.fail_reads {
            return Err(outage());
        }
        self.inner.get(collection, id).await
    }

    async fn add(&self, collection: &str, data: Fields) -> Result<String, StoreError> {
        self.inner.add(collection, data).await
    }

    async fn update(&self, collection: &str, id: &str, partial: Fields) -> Result<(), StoreError> {
        self.inner.update(collection, id, partial).await
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<bool, StoreError> {
        if self.fail_deletes {
            return Err(outage());
        }
        self.inner.delete(collection, id).await
    }

    async fn query(&self, collection: &str, filter: &Filter) -> Result<Vec<Document>, StoreError> {
        if self.fail_reads {
            return Err(outage());
        }
        self.inner.query(collection, filter).await
    }
}

async fn seeded_results() -> InMemoryStore {
    let store = InMemoryStore::new();
    for (id, module, total, submitted) in [
        ("r1", "m1", 90.0, "2024-01-01T08:00:00Z"),
        ("r2", "m1", 70.0, "2024-03-01T08:00:00Z"),
        ("r3", "m1", 50.0, "2024-02-01T08:00:00Z"),
        ("r4", "m2", 20.0, "2024-04-01T08:00:00Z"),
    ] {
        store
            .insert_with_id(
                "exam_results",
                id,
                fields(json!({
                    "userDisplayName": format!("Student {}", id),
                    "userEmail": format!("{}@finlit.test", id),
                    "moduleId": module,
                    "submittedAt": submitted,
                    "totalScore": total,
                    "answers": [],
                })),
            )
            .await;
    }
    store
}

fn ids<T: finlit_admin::models::Entity>(items: &[T]) -> Vec<&str> {
    items.iter().map(|i| i.id()).collect()
}

#[tokio::test]
async fn results_flow_lists_module_results_newest_first() {
    let store: SharedStore = Arc::new(seeded_results().await);
    let mut flow = flow::exam_results(store, "m1");

    assert!(matches!(flow.state(), ListingState::Loading));
    flow.load().await.unwrap();

    assert_eq!(ids(flow.items()), vec!["r2", "r3", "r1"]);
}

#[tokio::test]
async fn detail_opens_and_closes_without_touching_the_list() {
    let store: SharedStore = Arc::new(seeded_results().await);
    let mut flow = flow::exam_results(store, "m1");
    flow.load().await.unwrap();

    let selected = flow.select("r3").unwrap();
    assert_eq!(selected.total_score, 50.0);
    assert!(matches!(flow.state(), ListingState::DetailOpen { .. }));

    flow.close().unwrap();
    assert!(flow.selected().is_none());
    assert_eq!(flow.items().len(), 3);

    assert!(matches!(flow.select("r4"), Err(FlowError::UnknownItem(_))));
}

#[tokio::test]
async fn confirmed_delete_refetches_the_list() {
    let store: SharedStore = Arc::new(seeded_results().await);
    let mut flow = flow::exam_results(store.clone(), "m1");
    flow.load().await.unwrap();

    flow.request_delete("r2").unwrap();
    flow.confirm_delete().await.unwrap();

    assert!(matches!(flow.state(), ListingState::Loaded(_)));
    assert_eq!(ids(flow.items()), vec!["r3", "r1"]);
    assert!(store.get("exam_results", "r2").await.unwrap().is_none());
}

#[tokio::test]
async fn cancelled_delete_keeps_everything() {
    let store: SharedStore = Arc::new(seeded_results().await);
    let mut flow = flow::exam_results(store.clone(), "m1");
    flow.load().await.unwrap();

    flow.request_delete("r1").unwrap();
    flow.cancel().unwrap();

    assert_eq!(flow.items().len(), 3);
    assert!(store.get("exam_results", "r1").await.unwrap().is_some());
    // Nothing pending any more
    assert!(matches!(
        flow.confirm_delete().await,
        Err(FlowError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn failed_delete_is_reported_and_list_is_kept() {
    let store: SharedStore = Arc::new(FlakyStore {
        inner: seeded_results().await,
        fail_reads: false,
        fail_deletes: true,
    });
    let mut flow = flow::exam_results(store.clone(), "m1");
    flow.load().await.unwrap();

    flow.request_delete("r1").unwrap();
    let outcome = flow.confirm_delete().await;

    assert!(matches!(outcome, Err(FlowError::Write(_))));
    assert!(matches!(flow.state(), ListingState::Loaded(_)));
    assert_eq!(ids(flow.items()), vec!["r2", "r3", "r1"]);
}

#[tokio::test]
async fn failed_fetch_lands_in_an_empty_list() {
    let store: SharedStore = Arc::new(FlakyStore {
        inner: seeded_results().await,
        fail_reads: true,
        fail_deletes: false,
    });
    let mut flow: ListingFlow<EventCategory> = ListingFlow::new(store, None);

    flow.load().await.unwrap();

    assert!(matches!(flow.state(), ListingState::Loaded(items) if items.is_empty()));
}
