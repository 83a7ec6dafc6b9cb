use serde::{Deserialize, Serialize};

use super::{Entity, FarmScoped};
use crate::constants::{ENTRY_TYPE_INCOME, TABLE_FINANCIAL_ENTRIES};
use crate::schema::{lenient_f64, FieldKind, FieldMapping, Schema};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FinancialEntry {
    #[serde(rename = "Id")]
    pub id: i64,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub amount: f64,
    pub category: String,
    pub description: String,
    pub date: String,
    pub farm_id: String,
}

impl FinancialEntry {
    pub fn is_income(&self) -> bool {
        self.entry_type == ENTRY_TYPE_INCOME
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialEntryDraft {
    #[serde(rename = "type")]
    pub entry_type: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub farm_id: String,
}

/// Income, expenses and their difference over a set of entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub net_balance: f64,
}

impl FinancialSummary {
    /// Sum `amount` per side: entries typed "income" count as income, every
    /// other type counts as an expense.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a FinancialEntry>) -> Self {
        let (total_income, total_expenses) = entries.into_iter().fold((0.0, 0.0), |(income, expenses), entry| {
            if entry.is_income() {
                (income + entry.amount, expenses)
            } else {
                (income, expenses + entry.amount)
            }
        });

        Self {
            total_income,
            total_expenses,
            net_balance: total_income - total_expenses,
        }
    }
}

pub static FINANCIAL_ENTRY_SCHEMA: Schema = Schema {
    table: TABLE_FINANCIAL_ENTRIES,
    fields: &[
        FieldMapping::new("type_c", "type", FieldKind::Text),
        FieldMapping::new("amount_c", "amount", FieldKind::Number),
        FieldMapping::new("category_c", "category", FieldKind::Text),
        FieldMapping::new("description_c", "description", FieldKind::Text),
        FieldMapping::new("date_c", "date", FieldKind::Text),
        FieldMapping::new("farmId_c", "farmId", FieldKind::Relation),
    ],
    display_field: Some("description"),
};

impl Entity for FinancialEntry {
    type Draft = FinancialEntryDraft;
    const KIND: &'static str = "financial entry";

    fn schema() -> &'static Schema {
        &FINANCIAL_ENTRY_SCHEMA
    }
}

impl FarmScoped for FinancialEntry {}

impl From<FinancialEntry> for FinancialEntryDraft {
    fn from(entry: FinancialEntry) -> Self {
        Self {
            entry_type: entry.entry_type,
            amount: entry.amount,
            category: entry.category,
            description: entry.description,
            date: entry.date,
            farm_id: entry.farm_id,
        }
    }
}
