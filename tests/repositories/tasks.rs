use chrono::{DateTime, TimeZone, Utc};
use farmdesk::constants::TABLE_TASKS;
use farmdesk::entities::{Task, TaskDraft};
use serde_json::json;

use crate::{record, Fixture};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap()
}

fn draft(title: &str, due_date: &str) -> TaskDraft {
    TaskDraft {
        title: title.to_string(),
        description: Some("Check the irrigation lines".to_string()),
        due_date: due_date.to_string(),
        priority: "high".to_string(),
        completed: true,
        recurring: false,
        farm_id: "1".to_string(),
    }
}

async fn seed_task(fixture: &Fixture, title: &str, due: &str, completed: bool) -> i64 {
    fixture
        .store
        .seed(
            TABLE_TASKS,
            record(json!({
                "Name": title,
                "title_c": title,
                "dueDate_c": due,
                "priority_c": "medium",
                "completed_c": completed,
                "farmId_c": 1
            })),
        )
        .await
}

#[tokio::test]
async fn test_create_always_starts_incomplete() {
    let fixture = Fixture::new();
    let tasks = fixture.repo::<Task>();

    let created = tasks
        .create(&draft("Water seedlings", "2025-06-02T09:00:00.000Z"))
        .await
        .unwrap();
    assert!(!created.completed);
    assert_eq!(created.title, "Water seedlings");
    assert_eq!(created.farm_id, "1");

    let raw = fixture.store.raw(TABLE_TASKS, created.id).await.unwrap();
    assert_eq!(raw.get("completed_c"), Some(&json!(false)));
    assert_eq!(raw.get("Name"), Some(&json!("Water seedlings")));
}

#[tokio::test]
async fn test_task_without_farm_is_stored_unlinked() {
    let fixture = Fixture::new();
    let tasks = fixture.repo::<Task>();

    let mut unlinked = draft("Order seed", "2025-06-05T09:00:00.000Z");
    unlinked.farm_id = String::new();
    let created = tasks.create(&unlinked).await.unwrap();
    assert_eq!(created.farm_id, "");
}

#[tokio::test]
async fn test_upcoming_filters_window_and_completion() {
    let fixture = Fixture::new();
    seed_task(&fixture, "Too late", "2025-06-09T08:00:00.000Z", false).await;
    seed_task(&fixture, "Friday", "2025-06-06T10:00:00.000Z", false).await;
    seed_task(&fixture, "Already done", "2025-06-03T10:00:00.000Z", true).await;
    seed_task(&fixture, "Overdue", "2025-05-31T10:00:00.000Z", false).await;
    seed_task(&fixture, "Tomorrow", "2025-06-02T07:00:00.000Z", false).await;
    seed_task(&fixture, "Window end", "2025-06-08T08:00:00.000Z", false).await;

    let upcoming = fixture.repo::<Task>().get_upcoming_at(now()).await;
    let titles: Vec<&str> = upcoming.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, vec!["Tomorrow", "Friday", "Window end"]);
    assert!(upcoming.iter().all(|t| !t.completed));
}

#[tokio::test]
async fn test_upcoming_compares_instants_across_offsets() {
    let fixture = Fixture::new();
    seed_task(&fixture, "Window end", "2025-06-08T08:00:00Z", false).await;
    seed_task(&fixture, "Tomorrow", "2025-06-02T09:00:00+02:00", false).await;
    seed_task(&fixture, "Earlier today", "2025-06-01T09:00:00+02:00", false).await;

    let titles: Vec<String> = fixture
        .repo::<Task>()
        .get_upcoming_at(now())
        .await
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, vec!["Tomorrow", "Window end"]);
}

#[tokio::test]
async fn test_upcoming_custom_window() {
    let fixture = Fixture::new();
    seed_task(&fixture, "Tomorrow", "2025-06-02T07:00:00.000Z", false).await;
    seed_task(&fixture, "Next month", "2025-06-20T07:00:00.000Z", false).await;

    let tasks = fixture.repo::<Task>();
    assert_eq!(tasks.get_upcoming_within(now(), 1).await.len(), 1);
    assert_eq!(tasks.get_upcoming_within(now(), 30).await.len(), 2);
}

#[tokio::test]
async fn test_upcoming_rejection_is_log_only() {
    let fixture = Fixture::new();
    fixture.store.reject_next("Query failed").await;

    assert!(fixture.repo::<Task>().get_upcoming_at(now()).await.is_empty());
    assert!(fixture.notifier.is_empty());
}

#[tokio::test]
async fn test_toggle_twice_restores_state() {
    let fixture = Fixture::new();
    let tasks = fixture.repo::<Task>();
    let id = seed_task(&fixture, "Feed hens", "2025-06-02T07:00:00.000Z", false).await;

    let first = tasks.toggle_complete(id).await.expect("toggle should succeed");
    assert!(first.completed);
    assert_eq!(first.title, "Feed hens");

    let second = tasks.toggle_complete(id).await.expect("toggle should succeed");
    assert!(!second.completed);
    assert_eq!(second, tasks.get_by_id(id).await.unwrap());
}

#[tokio::test]
async fn test_toggle_missing_task() {
    let fixture = Fixture::new();
    let tasks = fixture.repo::<Task>();

    assert!(tasks.toggle_complete(12).await.is_none());
    assert!(matches!(
        tasks.try_toggle_complete(12).await,
        Err(farmdesk::RepositoryError::NotFound { kind: "task", id: 12 })
    ));
    // Only the two lookups reached the store
    assert_eq!(fixture.store.call_count(), 2);
}

#[tokio::test]
async fn test_tasks_by_farm() {
    let fixture = Fixture::new();
    let tasks = fixture.repo::<Task>();
    seed_task(&fixture, "Feed hens", "2025-06-02T07:00:00.000Z", false).await;
    let mut other = draft("Fix fence", "2025-06-04T07:00:00.000Z");
    other.farm_id = "2".to_string();
    tasks.create(&other).await.unwrap();

    let farm_two = tasks.get_by_farm_id(2).await;
    assert_eq!(farm_two.len(), 1);
    assert_eq!(farm_two[0].title, "Fix fence");
}

#[tokio::test]
async fn test_create_then_get_by_id() {
    let fixture = Fixture::new();
    let tasks = fixture.repo::<Task>();

    let created = tasks
        .create(&draft("Water seedlings", "2025-06-02T09:00:00.000Z"))
        .await
        .unwrap();
    assert_eq!(tasks.get_by_id(created.id).await, Some(created));

    let mut bare = draft("Order seed", "2025-06-05T09:00:00.000Z");
    bare.description = None;
    bare.recurring = true;
    let created = tasks.create(&bare).await.unwrap();
    assert_eq!(tasks.get_by_id(created.id).await, Some(created));
}
