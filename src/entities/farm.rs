use serde::{Deserialize, Serialize};

use super::Entity;
use crate::constants::{FIELD_NAME, TABLE_FARMS};
use crate::schema::{lenient_f64, FieldKind, FieldMapping, Schema};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Farm {
    #[serde(rename = "Id")]
    pub id: i64,
    pub name: String,
    pub location: String,
    pub size: f64,
    pub size_unit: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmDraft {
    pub name: String,
    #[serde(default)]
    pub location: String,
    #[serde(deserialize_with = "lenient_f64")]
    pub size: f64,
    #[serde(default)]
    pub size_unit: String,
}

pub static FARM_SCHEMA: Schema = Schema {
    table: TABLE_FARMS,
    fields: &[
        FieldMapping::new(FIELD_NAME, "name", FieldKind::Text),
        FieldMapping::new("location_c", "location", FieldKind::Text),
        FieldMapping::new("size_c", "size", FieldKind::Number),
        FieldMapping::new("sizeUnit_c", "sizeUnit", FieldKind::Text),
    ],
    display_field: None,
};

impl Entity for Farm {
    type Draft = FarmDraft;
    const KIND: &'static str = "farm";

    fn schema() -> &'static Schema {
        &FARM_SCHEMA
    }
}

impl From<Farm> for FarmDraft {
    fn from(farm: Farm) -> Self {
        Self {
            name: farm.name,
            location: farm.location,
            size: farm.size,
            size_unit: farm.size_unit,
        }
    }
}
