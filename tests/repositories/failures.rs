use std::sync::Arc;

use farmdesk::backend::{BulkResponse, FieldError, RecordResult, StoreHandle};
use farmdesk::constants::{TABLE_FARMS, TABLE_TASKS};
use farmdesk::entities::{Crop, Farm, FarmDraft, FinancialEntry, FinancialSummary, Task, TaskDraft};
use farmdesk::notify::MemoryNotifier;
use farmdesk::{Repository, RepositoryError};
use serde_json::json;

use crate::{record, Fixture};

fn farm(name: &str) -> FarmDraft {
    FarmDraft {
        name: name.to_string(),
        location: "Valley Road".to_string(),
        size: 3.0,
        size_unit: "acres".to_string(),
    }
}

#[tokio::test]
async fn test_empty_handle_degrades_every_operation() {
    let notifier = MemoryNotifier::new();
    let handle = StoreHandle::empty();
    let farms: Repository<Farm> = Repository::new(handle.clone(), Arc::new(notifier.clone()));
    let crops: Repository<Crop> = Repository::new(handle.clone(), Arc::new(notifier.clone()));
    let tasks: Repository<Task> = Repository::new(handle.clone(), Arc::new(notifier.clone()));
    let financials: Repository<FinancialEntry> = Repository::new(handle, Arc::new(notifier.clone()));

    assert!(farms.get_all().await.is_empty());
    assert!(farms.get_by_id(1).await.is_none());
    assert!(farms.create(&farm("North")).await.is_none());
    assert!(farms.update(1, &farm("North")).await.is_none());
    assert!(!farms.delete(1).await);
    assert!(crops.get_by_farm_id(1).await.is_empty());
    assert!(tasks.get_upcoming().await.is_empty());
    assert!(tasks.toggle_complete(1).await.is_none());
    assert_eq!(financials.get_summary().await, FinancialSummary::default());

    assert!(matches!(farms.try_get_all().await, Err(RepositoryError::Unavailable)));
    assert!(matches!(tasks.try_toggle_complete("x").await, Err(RepositoryError::Unavailable)));
    assert!(notifier.is_empty());
}

#[tokio::test]
async fn test_handle_installed_later_is_picked_up() {
    let fixture = Fixture::new();
    let handle = StoreHandle::empty();
    let farms: Repository<Farm> = Repository::new(handle.clone(), Arc::new(fixture.notifier.clone()));
    assert!(farms.create(&farm("North")).await.is_none());

    handle.install(fixture.store.clone());
    assert!(farms.create(&farm("North")).await.is_some());

    handle.clear();
    assert!(farms.get_all().await.is_empty());
}

#[tokio::test]
async fn test_rejected_get_all_notifies() {
    let fixture = Fixture::new();
    fixture.store.reject_next("Invalid project").await;

    assert!(fixture.repo::<Farm>().get_all().await.is_empty());
    assert_eq!(fixture.notifier.messages(), vec!["Invalid project"]);
}

#[tokio::test]
async fn test_rejected_lookups_only_log() {
    let fixture = Fixture::new();
    fixture.store.reject_next("Invalid project").await;
    fixture.store.reject_next("Invalid project").await;

    assert!(fixture.repo::<Farm>().get_by_id(1).await.is_none());
    assert!(fixture.repo::<Crop>().get_by_farm_id(1).await.is_empty());
    assert!(fixture.notifier.is_empty());
}

#[tokio::test]
async fn test_rejected_writes_notify() {
    let fixture = Fixture::new();
    let farms = fixture.repo::<Farm>();
    fixture.store.reject_next("Quota exceeded").await;
    fixture.store.reject_next("Read only").await;
    fixture.store.reject_next("Locked").await;

    assert!(farms.create(&farm("North")).await.is_none());
    assert!(farms.update(1, &farm("North")).await.is_none());
    assert!(!farms.delete(1).await);
    assert_eq!(fixture.notifier.messages(), vec!["Quota exceeded", "Read only", "Locked"]);
}

#[tokio::test]
async fn test_transport_failure_is_not_notified() {
    let fixture = Fixture::new();
    fixture.store.fail_next_transport("connection refused").await;

    let result = fixture.repo::<Farm>().try_get_all().await;
    assert!(matches!(result, Err(RepositoryError::Store(_))));
    assert!(fixture.notifier.is_empty());
}

#[tokio::test]
async fn test_mixed_bulk_returns_first_success() {
    let fixture = Fixture::new();
    fixture
        .store
        .respond_next_bulk(BulkResponse::ok(vec![
            RecordResult::failed(
                vec![FieldError {
                    field_label: "Size".to_string(),
                    message: "must be positive".to_string(),
                }],
                Some("Record rejected".to_string()),
            ),
            RecordResult::succeeded(Some(record(json!({"Id": 41, "Name": "North", "size_c": 3})))),
        ]))
        .await;

    let created = fixture.repo::<Farm>().create(&farm("North")).await.unwrap();
    assert_eq!(created.id, 41);
    assert_eq!(created.size, 3.0);
    assert_eq!(fixture.notifier.messages(), vec!["Size: must be positive", "Record rejected"]);
}

#[tokio::test]
async fn test_required_field_rejects_the_only_record() {
    let fixture = Fixture::new();
    fixture.store.require_field(TABLE_FARMS, "location_c", "Location").await;

    let mut draft = farm("North");
    draft.location = String::new();
    let result = fixture.repo::<Farm>().try_create(&draft).await;

    assert!(matches!(result, Err(RepositoryError::NoRecordSucceeded { failed: 1 })));
    assert_eq!(fixture.notifier.messages(), vec!["Location: is required"]);
}

#[tokio::test]
async fn test_update_missing_record_fails() {
    let fixture = Fixture::new();
    let tasks = fixture.repo::<Task>();

    let result = tasks.update(77, &TaskDraft::default()).await;
    assert!(result.is_none());
    assert_eq!(fixture.notifier.messages(), vec!["Record 77 not found"]);
}

#[tokio::test]
async fn test_success_without_results_is_an_error() {
    let fixture = Fixture::new();
    fixture
        .store
        .respond_next_bulk(BulkResponse {
            success: true,
            message: None,
            results: None,
        })
        .await;

    let result = fixture.repo::<Farm>().try_delete(1).await;
    assert!(matches!(result, Err(RepositoryError::MissingResults)));
}

#[tokio::test]
async fn test_malformed_row_fails_the_read() {
    let fixture = Fixture::new();
    fixture
        .store
        .seed(TABLE_TASKS, record(json!({"title_c": 5, "completed_c": false})))
        .await;

    let result = fixture.repo::<Task>().try_get_all().await;
    assert!(matches!(result, Err(RepositoryError::Mapping(_))));
}
