//! Field mapping between external records and domain objects.
//!
//! Each entity declares a [`Schema`]: the table it lives in and a fixed,
//! total table of `external field -> domain field` pairs. [`map_record`]
//! turns a stored record into a domain object, [`to_record`] turns a draft
//! back into a record, applying the type coercions each field kind needs.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::backend::Record;
use crate::constants::{FIELD_ID, FIELD_NAME};

/// Errors raised while converting between records and domain objects.
#[derive(Debug, thiserror::Error)]
pub enum MappingError {
    #[error("Invalid record id '{0}'")]
    InvalidId(String),

    #[error("Record has no Id")]
    MissingId,

    #[error("Field '{field}' expects a relation id, got {value}")]
    InvalidRelation { field: &'static str, value: Value },

    #[error("Field '{field}' expects a number, got {value}")]
    InvalidNumber { field: &'static str, value: Value },

    #[error("Expected a JSON object")]
    NotAnObject,

    #[error("Failed to decode record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// How a field's value is coerced when crossing the mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Parsed to a JSON number on write.
    Number,
    Boolean,
    /// Normalised to a string id on read, parsed to an integer on write.
    Relation,
}

#[derive(Clone, Copy, Debug)]
pub struct FieldMapping {
    pub external: &'static str,
    pub domain: &'static str,
    pub kind: FieldKind,
}

impl FieldMapping {
    pub const fn new(external: &'static str, domain: &'static str, kind: FieldKind) -> Self {
        Self { external, domain, kind }
    }
}

/// Fixed mapping for one entity type.
#[derive(Debug)]
pub struct Schema {
    pub table: &'static str,
    pub fields: &'static [FieldMapping],
    /// Domain field copied into the store's `Name` column on write, for
    /// entities that do not map `Name` themselves.
    pub display_field: Option<&'static str>,
}

impl Schema {
    /// Field selection for reads: `Id`, `Name`, then every mapped field.
    pub fn selection(&self) -> Vec<&'static str> {
        let mut names = vec![FIELD_ID, FIELD_NAME];
        for mapping in self.fields {
            if !names.contains(&mapping.external) {
                names.push(mapping.external);
            }
        }
        names
    }
}

/// A record identifier as the store may send it.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Int(i64),
    Text(String),
}

/// A relation column: either a bare identifier or an expanded lookup object.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationRef {
    Embedded {
        #[serde(rename = "Id")]
        id: Identifier,
    },
    Bare(Identifier),
}

impl RelationRef {
    pub fn id_string(&self) -> Option<String> {
        let id = match self {
            RelationRef::Embedded { id } | RelationRef::Bare(id) => id,
        };
        match id {
            Identifier::Int(n) => Some(n.to_string()),
            Identifier::Text(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Identifier::Text(_) => None,
        }
    }
}

/// Normalise a relation value to its string id.
///
/// `3`, `"3"` and `{"Id": 3, "Name": "North"}` all yield `Some("3")`; null,
/// empty strings and objects without an `Id` yield `None`.
pub fn normalize_relation(value: &Value) -> Option<String> {
    RelationRef::deserialize(value).ok().and_then(|r| r.id_string())
}

/// Values accepted wherever a record id is expected.
pub trait IntoRecordId {
    fn into_record_id(self) -> Result<i64, MappingError>;
}

impl IntoRecordId for i64 {
    fn into_record_id(self) -> Result<i64, MappingError> {
        Ok(self)
    }
}

impl IntoRecordId for i32 {
    fn into_record_id(self) -> Result<i64, MappingError> {
        Ok(i64::from(self))
    }
}

impl IntoRecordId for u32 {
    fn into_record_id(self) -> Result<i64, MappingError> {
        Ok(i64::from(self))
    }
}

impl IntoRecordId for u64 {
    fn into_record_id(self) -> Result<i64, MappingError> {
        i64::try_from(self).map_err(|_| MappingError::InvalidId(self.to_string()))
    }
}

impl IntoRecordId for usize {
    fn into_record_id(self) -> Result<i64, MappingError> {
        i64::try_from(self).map_err(|_| MappingError::InvalidId(self.to_string()))
    }
}

impl IntoRecordId for &str {
    fn into_record_id(self) -> Result<i64, MappingError> {
        self.trim()
            .parse::<i64>()
            .map_err(|_| MappingError::InvalidId(self.to_string()))
    }
}

impl IntoRecordId for &String {
    fn into_record_id(self) -> Result<i64, MappingError> {
        self.as_str().into_record_id()
    }
}

impl IntoRecordId for String {
    fn into_record_id(self) -> Result<i64, MappingError> {
        self.as_str().into_record_id()
    }
}

fn read_value(kind: FieldKind, value: &Value) -> Option<Value> {
    match (kind, value) {
        (_, Value::Null) => None,
        (FieldKind::Relation, v) => normalize_relation(v).map(Value::String),
        (FieldKind::Number, Value::String(s)) => s.trim().parse::<f64>().ok().and_then(number),
        (FieldKind::Boolean, Value::String(s)) => s.parse::<bool>().ok().map(Value::Bool),
        (_, v) => Some(v.clone()),
    }
}

fn write_value(mapping: &FieldMapping, value: Value) -> Result<Value, MappingError> {
    match (mapping.kind, value) {
        (_, Value::Null) => Ok(Value::Null),
        (FieldKind::Relation, Value::Number(n)) if n.is_i64() => Ok(Value::Number(n)),
        (FieldKind::Relation, Value::String(s)) if s.trim().is_empty() => Ok(Value::Null),
        (FieldKind::Relation, value) => match normalize_relation(&value).and_then(|id| id.parse::<i64>().ok()) {
            Some(id) => Ok(Value::from(id)),
            None => Err(MappingError::InvalidRelation {
                field: mapping.domain,
                value,
            }),
        },
        (FieldKind::Number, Value::Number(n)) => Ok(Value::Number(n)),
        (FieldKind::Number, value) => value
            .as_str()
            .and_then(|s| s.trim().parse::<f64>().ok())
            .and_then(number)
            .ok_or(MappingError::InvalidNumber {
                field: mapping.domain,
                value,
            }),
        (_, value) => Ok(value),
    }
}

fn number(n: f64) -> Option<Value> {
    Number::from_f64(n).map(Value::Number)
}

/// Map a stored record to a domain object through `schema`.
///
/// Missing and null external fields are left out, so domain types fill them
/// from their serde defaults.
pub fn map_record<T: DeserializeOwned>(record: &Record, schema: &Schema) -> Result<T, MappingError> {
    let id = record.get(FIELD_ID).ok_or(MappingError::MissingId)?;
    let mut domain = serde_json::Map::new();
    domain.insert(FIELD_ID.to_string(), id.clone());

    for mapping in schema.fields {
        if let Some(value) = record.get(mapping.external).and_then(|v| read_value(mapping.kind, v)) {
            domain.insert(mapping.domain.to_string(), value);
        }
    }

    Ok(serde_json::from_value(Value::Object(domain))?)
}

/// Map a domain-shaped draft to an external record through `schema`.
pub fn to_record<D: Serialize>(draft: &D, schema: &Schema) -> Result<Record, MappingError> {
    let Value::Object(mut source) = serde_json::to_value(draft)? else {
        return Err(MappingError::NotAnObject);
    };

    let mut record = Record::new();
    if let Some(display) = schema.display_field {
        if let Some(value) = source.get(display) {
            record.insert(FIELD_NAME.to_string(), value.clone());
        }
    }
    for mapping in schema.fields {
        let value = source.remove(mapping.domain).unwrap_or(Value::Null);
        record.insert(mapping.external.to_string(), write_value(mapping, value)?);
    }

    Ok(record)
}

/// Deserialize a number that may arrive as a numeric string (form input).
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrText {
        Number(f64),
        Text(String),
    }

    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| serde::de::Error::custom(format!("invalid number '{}'", s))),
    }
}
