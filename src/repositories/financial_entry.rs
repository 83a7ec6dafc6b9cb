//! Financial summary over stored entries.

use log::error;

use super::{Repository, RepositoryError};
use crate::entities::{FinancialEntry, FinancialSummary};
use crate::schema::IntoRecordId;

impl Repository<FinancialEntry> {
    pub async fn try_get_summary(&self) -> Result<FinancialSummary, RepositoryError> {
        let entries = self.try_get_all().await?;
        Ok(FinancialSummary::from_entries(&entries))
    }

    /// Totals over every entry; zeroed on failure.
    pub async fn get_summary(&self) -> FinancialSummary {
        self.try_get_summary().await.unwrap_or_else(|e| {
            error!("Error calculating financial summary: {}", e);
            FinancialSummary::default()
        })
    }

    /// Totals over one farm's entries; zeroed on failure.
    pub async fn get_summary_for_farm(&self, farm_id: impl IntoRecordId) -> FinancialSummary {
        match self.try_get_by_farm_id(farm_id).await {
            Ok(entries) => FinancialSummary::from_entries(&entries),
            Err(e) => {
                error!("Error calculating financial summary by farm: {}", e);
                FinancialSummary::default()
            }
        }
    }
}
