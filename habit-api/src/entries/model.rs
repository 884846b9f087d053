//! Entry storage record, public representation and request bodies

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::handlers::ApiError;
use crate::pagination::KeysetRecord;
use crate::shaping::Shapeable;

const MAX_NOTES_LEN: usize = 1000;

/// How an entry was recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntrySource {
    Manual,
    Automation,
    FileImport,
}

impl fmt::Display for EntrySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Manual => write!(f, "manual"),
            Self::Automation => write!(f, "automation"),
            Self::FileImport => write!(f, "fileImport"),
        }
    }
}

/// Stored entry, owned by exactly one user
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: String,
    pub user_id: String,
    pub habit_id: String,
    pub value: i32,
    pub notes: Option<String>,
    pub source: EntrySource,
    pub external_id: Option<String>,
    pub is_archived: bool,
    pub date: NaiveDate,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
}

impl Entry {
    /// New manual entry with a fresh `e_<uuidv7>` id
    pub fn create(user_id: &str, request: CreateEntryRequest) -> Self {
        Self {
            id: format!("e_{}", uuid::Uuid::now_v7()),
            user_id: user_id.to_string(),
            habit_id: request.habit_id,
            value: request.value,
            notes: request.notes,
            source: EntrySource::Manual,
            external_id: None,
            is_archived: false,
            date: request.date,
            created_at_utc: Utc::now(),
            updated_at_utc: None,
        }
    }

    pub fn apply_update(&mut self, request: UpdateEntryRequest) {
        self.value = request.value;
        self.notes = request.notes;
        self.date = request.date;
        self.updated_at_utc = Some(Utc::now());
    }

    pub fn set_archived(&mut self, archived: bool) {
        self.is_archived = archived;
        self.updated_at_utc = Some(Utc::now());
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }
}

impl KeysetRecord for Entry {
    fn keyset_date(&self) -> NaiveDate {
        self.date
    }

    fn keyset_id(&self) -> &str {
        &self.id
    }
}

/// Public representation of an entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDto {
    pub id: String,
    pub habit_id: String,
    pub value: i32,
    pub notes: Option<String>,
    pub source: EntrySource,
    pub external_id: Option<String>,
    pub is_archived: bool,
    pub date: NaiveDate,
    pub created_at_utc: DateTime<Utc>,
    pub updated_at_utc: Option<DateTime<Utc>>,
}

impl From<Entry> for EntryDto {
    fn from(entry: Entry) -> Self {
        Self {
            id: entry.id,
            habit_id: entry.habit_id,
            value: entry.value,
            notes: entry.notes,
            source: entry.source,
            external_id: entry.external_id,
            is_archived: entry.is_archived,
            date: entry.date,
            created_at_utc: entry.created_at_utc,
            updated_at_utc: entry.updated_at_utc,
        }
    }
}

impl Shapeable for EntryDto {
    fn describe_fields() -> Vec<&'static str> {
        vec![
            "id",
            "habitId",
            "value",
            "notes",
            "source",
            "externalId",
            "isArchived",
            "date",
            "createdAtUtc",
            "updatedAtUtc",
        ]
    }

    fn field_value(&self, name: &str) -> Option<Value> {
        let value = match name {
            "id" => serde_json::to_value(&self.id),
            "habitId" => serde_json::to_value(&self.habit_id),
            "value" => serde_json::to_value(self.value),
            "notes" => serde_json::to_value(&self.notes),
            "source" => serde_json::to_value(self.source),
            "externalId" => serde_json::to_value(&self.external_id),
            "isArchived" => serde_json::to_value(self.is_archived),
            "date" => serde_json::to_value(self.date),
            "createdAtUtc" => serde_json::to_value(self.created_at_utc),
            "updatedAtUtc" => serde_json::to_value(self.updated_at_utc),
            _ => return None,
        };
        value.ok()
    }
}

/// Body of `POST /entries`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntryRequest {
    pub habit_id: String,
    pub value: i32,
    #[serde(default)]
    pub notes: Option<String>,
    pub date: NaiveDate,
}

impl CreateEntryRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ApiError> {
        if self.habit_id.trim().is_empty() {
            return Err(ApiError::bad_request("HabitId cannot be empty."));
        }
        validate_common(self.value, self.notes.as_deref(), self.date, today)
    }
}

/// Body of `PUT /entries/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntryRequest {
    pub value: i32,
    #[serde(default)]
    pub notes: Option<String>,
    pub date: NaiveDate,
}

impl UpdateEntryRequest {
    pub fn validate(&self, today: NaiveDate) -> Result<(), ApiError> {
        validate_common(self.value, self.notes.as_deref(), self.date, today)
    }
}

fn validate_common(
    value: i32,
    notes: Option<&str>,
    date: NaiveDate,
    today: NaiveDate,
) -> Result<(), ApiError> {
    if value <= 0 {
        return Err(ApiError::bad_request("Value must be greater than 0."));
    }
    if notes.is_some_and(|n| n.chars().count() > MAX_NOTES_LEN) {
        return Err(ApiError::bad_request(format!(
            "Notes must be at most {MAX_NOTES_LEN} characters."
        )));
    }
    if date > today {
        return Err(ApiError::bad_request("Date cannot be in the future."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaping::{DataShaper, FieldSet};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn create(value: i32, date: NaiveDate) -> CreateEntryRequest {
        CreateEntryRequest {
            habit_id: "h_1".into(),
            value,
            notes: None,
            date,
        }
    }

    #[test]
    fn test_source_wire_names() {
        assert_eq!(serde_json::to_value(EntrySource::FileImport).unwrap(), "fileImport");
        assert_eq!(EntrySource::FileImport.to_string(), "fileImport");
        let parsed: EntrySource = serde_json::from_str("\"automation\"").unwrap();
        assert_eq!(parsed, EntrySource::Automation);
    }

    #[test]
    fn test_create_assigns_prefixed_id() {
        let entry = Entry::create("u_1", create(3, day(1)));
        assert!(entry.id.starts_with("e_"));
        assert_eq!(entry.source, EntrySource::Manual);
        assert!(!entry.is_archived);
        assert!(entry.updated_at_utc.is_none());
    }

    #[test]
    fn test_validation() {
        assert!(create(1, day(10)).validate(day(10)).is_ok());
        assert!(create(0, day(10)).validate(day(10)).is_err());
        assert!(create(1, day(11)).validate(day(10)).is_err());

        let mut blank = create(1, day(1));
        blank.habit_id = "  ".into();
        assert!(blank.validate(day(10)).is_err());

        let long = UpdateEntryRequest {
            value: 1,
            notes: Some("x".repeat(1001)),
            date: day(1),
        };
        assert!(long.validate(day(10)).is_err());
    }

    #[test]
    fn test_shaped_keys_match_serialized_keys() {
        let dto = EntryDto::from(Entry::create("u_1", create(2, day(4))));
        let shaped = DataShaper::shape(&dto, &FieldSet::all());
        let serialized = serde_json::to_value(&dto).unwrap();

        assert_eq!(Value::Object(shaped), serialized);
    }

    #[test]
    fn test_user_id_is_not_exposed() {
        assert!(!EntryDto::describe_fields().contains(&"userId"));
    }
}
