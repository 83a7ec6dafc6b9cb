//! Read-only overview assembled from every repository.
//!
//! The four reads run concurrently. Each one degrades on its own, so a
//! snapshot is always produced even when some of the calls fail.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::backend::StoreHandle;
use crate::constants::DEFAULT_UPCOMING_WINDOW_DAYS;
use crate::entities::{Farm, FinancialSummary, Task};
use crate::notify::Notifier;
use crate::repositories::{CropRepository, FarmRepository, FinancialRepository, TaskRepository};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub farms: Vec<Farm>,
    pub upcoming_tasks: Vec<Task>,
    pub summary: FinancialSummary,
    /// Crop count keyed by farm id. Every known farm has an entry.
    pub crops_per_farm: BTreeMap<String, usize>,
}

pub struct Dashboard {
    pub farms: FarmRepository,
    pub crops: CropRepository,
    pub tasks: TaskRepository,
    pub financials: FinancialRepository,
    upcoming_window_days: i64,
}

impl Dashboard {
    pub fn new(store: StoreHandle, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            farms: FarmRepository::new(store.clone(), Arc::clone(&notifier)),
            crops: CropRepository::new(store.clone(), Arc::clone(&notifier)),
            tasks: TaskRepository::new(store.clone(), Arc::clone(&notifier)),
            financials: FinancialRepository::new(store, notifier),
            upcoming_window_days: DEFAULT_UPCOMING_WINDOW_DAYS,
        }
    }

    pub fn with_upcoming_window(mut self, days: i64) -> Self {
        self.upcoming_window_days = days;
        self
    }

    pub async fn load(&self) -> DashboardSnapshot {
        self.load_at(Utc::now()).await
    }

    pub async fn load_at(&self, now: DateTime<Utc>) -> DashboardSnapshot {
        let (farms, upcoming_tasks, summary, crops) = tokio::join!(
            self.farms.get_all(),
            self.tasks.get_upcoming_within(now, self.upcoming_window_days),
            self.financials.get_summary(),
            self.crops.get_all(),
        );

        let mut crops_per_farm: BTreeMap<String, usize> =
            farms.iter().map(|farm| (farm.id.to_string(), 0)).collect();
        for crop in &crops {
            *crops_per_farm.entry(crop.farm_id.clone()).or_insert(0) += 1;
        }

        info!(
            "Dashboard loaded: {} farms, {} upcoming tasks, {} crops",
            farms.len(),
            upcoming_tasks.len(),
            crops.len()
        );

        DashboardSnapshot {
            farms,
            upcoming_tasks,
            summary,
            crops_per_farm,
        }
    }
}
