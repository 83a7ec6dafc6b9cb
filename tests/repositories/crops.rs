use farmdesk::backend::memory::InMemoryStore;
use farmdesk::constants::TABLE_CROPS;
use farmdesk::entities::{Crop, CropDraft};
use serde_json::json;

use crate::{record, Fixture};

fn tomatoes(farm_id: &str) -> CropDraft {
    CropDraft {
        farm_id: farm_id.to_string(),
        crop_type: "Tomatoes".to_string(),
        field_location: "Greenhouse 2".to_string(),
        planting_date: "2025-03-01".to_string(),
        expected_harvest_date: "2025-07-15".to_string(),
        status: "growing".to_string(),
        notes: None,
    }
}

#[tokio::test]
async fn test_create_maps_relation_and_display_name() {
    let fixture = Fixture::new();
    let crops = fixture.repo::<Crop>();

    let created = crops.create(&tomatoes("3")).await.expect("crop should be created");
    assert_eq!(created.farm_id, "3");
    assert_eq!(created.crop_type, "Tomatoes");
    assert!(created.notes.is_none());

    let raw = fixture.store.raw(TABLE_CROPS, created.id).await.unwrap();
    assert_eq!(raw.get("farmId_c"), Some(&json!(3)));
    assert_eq!(raw.get("Name"), Some(&json!("Tomatoes")));
    assert_eq!(raw.get("cropType_c"), Some(&json!("Tomatoes")));
}

#[tokio::test]
async fn test_non_numeric_farm_id_fails_before_store() {
    let fixture = Fixture::new();
    let crops = fixture.repo::<Crop>();

    assert!(crops.create(&tomatoes("north")).await.is_none());
    assert_eq!(fixture.store.call_count(), 0);
}

#[tokio::test]
async fn test_get_by_farm_id_filters() {
    let fixture = Fixture::new();
    let crops = fixture.repo::<Crop>();
    crops.create(&tomatoes("1")).await.unwrap();
    crops.create(&tomatoes("2")).await.unwrap();
    crops.create(&tomatoes("1")).await.unwrap();

    let farm_one = crops.get_by_farm_id(1).await;
    assert_eq!(farm_one.len(), 2);
    assert!(farm_one.iter().all(|c| c.farm_id == "1"));

    assert_eq!(crops.get_by_farm_id("2").await.len(), 1);
    assert!(crops.get_by_farm_id(7).await.is_empty());
}

#[tokio::test]
async fn test_embedded_relations_are_normalized() {
    let fixture = Fixture::with_store(InMemoryStore::new().with_embedded_relation("farmId_c"));
    let crops = fixture.repo::<Crop>();
    crops.create(&tomatoes("5")).await.unwrap();

    let all = crops.get_all().await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].farm_id, "5");

    // Filtering compares against the embedded id
    assert_eq!(crops.get_by_farm_id(5).await.len(), 1);
}

#[tokio::test]
async fn test_seeded_relation_forms() {
    let fixture = Fixture::new();
    fixture
        .store
        .seed(TABLE_CROPS, record(json!({"cropType_c": "Corn", "farmId_c": {"Id": 8, "Name": "East"}})))
        .await;
    fixture
        .store
        .seed(TABLE_CROPS, record(json!({"cropType_c": "Beans", "farmId_c": "8"})))
        .await;
    fixture
        .store
        .seed(TABLE_CROPS, record(json!({"cropType_c": "Kale", "farmId_c": null})))
        .await;

    let farm_ids: Vec<String> = fixture.repo::<Crop>().get_all().await.into_iter().map(|c| c.farm_id).collect();
    assert_eq!(farm_ids, vec!["8", "8", ""]);
}

#[tokio::test]
async fn test_update_keeps_notes() {
    let fixture = Fixture::new();
    let crops = fixture.repo::<Crop>();
    let created = crops.create(&tomatoes("1")).await.unwrap();

    let mut draft = CropDraft::from(created.clone());
    draft.status = "harvested".to_string();
    draft.notes = Some("Good yield".to_string());

    let updated = crops.update(created.id, &draft).await.unwrap();
    assert_eq!(updated.status, "harvested");
    assert_eq!(updated.notes.as_deref(), Some("Good yield"));
    assert_eq!(updated.farm_id, "1");
}

#[tokio::test]
async fn test_create_then_get_by_id() {
    let fixture = Fixture::new();
    let crops = fixture.repo::<Crop>();

    let created = crops.create(&tomatoes("4")).await.unwrap();
    assert_eq!(crops.get_by_id(created.id).await, Some(created));

    let mut with_notes = tomatoes("4");
    with_notes.notes = Some("Staked".to_string());
    let created = crops.create(&with_notes).await.unwrap();
    assert_eq!(crops.get_by_id(created.id).await, Some(created));
}

#[tokio::test]
async fn test_delete_then_get_by_id() {
    let fixture = Fixture::new();
    let crops = fixture.repo::<Crop>();
    let created = crops.create(&tomatoes("4")).await.unwrap();

    assert!(crops.delete(created.id).await);
    assert!(crops.get_by_id(created.id).await.is_none());
    assert!(crops.get_by_farm_id(4).await.is_empty());
}
