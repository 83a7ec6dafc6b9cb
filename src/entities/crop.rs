use serde::{Deserialize, Serialize};

use super::{Entity, FarmScoped};
use crate::constants::TABLE_CROPS;
use crate::schema::{FieldKind, FieldMapping, Schema};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Crop {
    #[serde(rename = "Id")]
    pub id: i64,
    pub farm_id: String,
    pub crop_type: String,
    pub field_location: String,
    pub planting_date: String,
    pub expected_harvest_date: String,
    pub status: String,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CropDraft {
    pub farm_id: String,
    pub crop_type: String,
    pub field_location: String,
    pub planting_date: String,
    pub expected_harvest_date: String,
    pub status: String,
    pub notes: Option<String>,
}

pub static CROP_SCHEMA: Schema = Schema {
    table: TABLE_CROPS,
    fields: &[
        FieldMapping::new("farmId_c", "farmId", FieldKind::Relation),
        FieldMapping::new("cropType_c", "cropType", FieldKind::Text),
        FieldMapping::new("fieldLocation_c", "fieldLocation", FieldKind::Text),
        FieldMapping::new("plantingDate_c", "plantingDate", FieldKind::Text),
        FieldMapping::new("expectedHarvestDate_c", "expectedHarvestDate", FieldKind::Text),
        FieldMapping::new("status_c", "status", FieldKind::Text),
        FieldMapping::new("notes_c", "notes", FieldKind::Text),
    ],
    display_field: Some("cropType"),
};

impl Entity for Crop {
    type Draft = CropDraft;
    const KIND: &'static str = "crop";

    fn schema() -> &'static Schema {
        &CROP_SCHEMA
    }
}

impl FarmScoped for Crop {}

impl From<Crop> for CropDraft {
    fn from(crop: Crop) -> Self {
        Self {
            farm_id: crop.farm_id,
            crop_type: crop.crop_type,
            field_location: crop.field_location,
            planting_date: crop.planting_date,
            expected_harvest_date: crop.expected_harvest_date,
            status: crop.status,
            notes: crop.notes,
        }
    }
}
