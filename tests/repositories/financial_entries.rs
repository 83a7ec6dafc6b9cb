use farmdesk::constants::TABLE_FINANCIAL_ENTRIES;
use farmdesk::entities::{FinancialEntry, FinancialEntryDraft, FinancialSummary};
use serde_json::json;

use crate::Fixture;

fn entry(entry_type: &str, amount: f64, farm_id: &str) -> FinancialEntryDraft {
    FinancialEntryDraft {
        entry_type: entry_type.to_string(),
        amount,
        category: "sales".to_string(),
        description: format!("{} of {}", entry_type, amount),
        date: "2025-05-20".to_string(),
        farm_id: farm_id.to_string(),
    }
}

#[tokio::test]
async fn test_create_maps_type_and_amount() {
    let fixture = Fixture::new();
    let financials = fixture.repo::<FinancialEntry>();

    let created = financials.create(&entry("income", 250.0, "1")).await.unwrap();
    assert!(created.is_income());
    assert_eq!(created.amount, 250.0);

    let raw = fixture.store.raw(TABLE_FINANCIAL_ENTRIES, created.id).await.unwrap();
    assert_eq!(raw.get("type_c"), Some(&json!("income")));
    assert_eq!(raw.get("Name"), Some(&json!("income of 250")));
}

#[tokio::test]
async fn test_summary_over_all_entries() {
    let fixture = Fixture::new();
    let financials = fixture.repo::<FinancialEntry>();
    financials.create(&entry("income", 1200.0, "1")).await.unwrap();
    financials.create(&entry("expense", 300.5, "1")).await.unwrap();
    financials.create(&entry("expense", 99.5, "2")).await.unwrap();

    assert_eq!(
        financials.get_summary().await,
        FinancialSummary {
            total_income: 1200.0,
            total_expenses: 400.0,
            net_balance: 800.0,
        }
    );
}

#[tokio::test]
async fn test_summary_for_farm() {
    let fixture = Fixture::new();
    let financials = fixture.repo::<FinancialEntry>();
    financials.create(&entry("income", 100.0, "1")).await.unwrap();
    financials.create(&entry("expense", 30.0, "2")).await.unwrap();

    let summary = financials.get_summary_for_farm(2).await;
    assert_eq!(summary.total_income, 0.0);
    assert_eq!(summary.total_expenses, 30.0);
    assert_eq!(summary.net_balance, -30.0);
}

#[tokio::test]
async fn test_summary_empty_store_is_zero() {
    let fixture = Fixture::new();
    assert_eq!(
        fixture.repo::<FinancialEntry>().get_summary().await,
        FinancialSummary::default()
    );
}

#[tokio::test]
async fn test_summary_zeroed_on_transport_failure() {
    let fixture = Fixture::new();
    let financials = fixture.repo::<FinancialEntry>();
    financials.create(&entry("income", 100.0, "1")).await.unwrap();
    fixture.store.fail_next_transport("connection reset").await;

    assert_eq!(financials.get_summary().await, FinancialSummary::default());
    assert!(financials.try_get_summary().await.is_ok());
}

#[tokio::test]
async fn test_amount_from_form_text() {
    let fixture = Fixture::new();
    let draft: FinancialEntryDraft = serde_json::from_value(json!({
        "type": "expense",
        "amount": "42.10",
        "category": "feed",
        "farmId": "1"
    }))
    .unwrap();

    let created = fixture.repo::<FinancialEntry>().create(&draft).await.unwrap();
    assert_eq!(created.amount, 42.10);
    assert!(!created.is_income());
}

#[tokio::test]
async fn test_create_then_get_by_id() {
    let fixture = Fixture::new();
    let financials = fixture.repo::<FinancialEntry>();

    let created = financials.create(&entry("expense", 18.75, "2")).await.unwrap();
    let fetched = financials.get_by_id(created.id).await;
    assert_eq!(fetched.as_ref().map(|e| e.amount), Some(18.75));
    assert_eq!(fetched.as_ref().map(|e| e.farm_id.as_str()), Some("2"));
    assert_eq!(fetched, Some(created));
}
