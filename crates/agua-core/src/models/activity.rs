// ABOUTME: Water-usage activity models stored in Firestore by the mobile app
// ABOUTME: ActivityType catalog entries, per-day records, and logged activity entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Agua Contributors

use chrono::{DateTime, NaiveDate, Utc};

use super::document::{Document, FieldValue, Fields};
use crate::constants::{defaults, fields};
use crate::errors::{AppError, AppResult};

/// Reusable definition of a water-consuming activity and its per-unit cost
///
/// No id is set client-side; the store assigns one on insert.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityType {
    /// Display name, e.g. "Ducha"
    pub name: String,
    /// Liters consumed per one unit of activity
    pub liters_per_unit: f64,
    /// Household category label, e.g. "Higiene"
    pub category: String,
    /// Measurement unit label, e.g. "minutos"
    pub unit: String,
    /// Short display glyph
    pub icon: String,
}

impl ActivityType {
    /// Firestore fields for this activity type
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        Fields::new()
            .with(fields::NAME, self.name.as_str())
            .with(fields::LITERS_PER_UNIT, self.liters_per_unit)
            .with(fields::CATEGORY, self.category.as_str())
            .with(fields::UNIT, self.unit.as_str())
            .with(fields::ICON, self.icon.as_str())
    }

    /// Read an activity type back from a stored document
    ///
    /// # Errors
    ///
    /// Returns an error if the `name` field is missing.
    pub fn from_document(document: &Document) -> AppResult<Self> {
        let doc = &document.fields;
        let name = doc.string(fields::NAME).ok_or_else(|| {
            AppError::invalid_format(format!("{} has no `name` field", document.path))
        })?;

        Ok(Self {
            name: name.to_owned(),
            liters_per_unit: doc.number_or_zero(fields::LITERS_PER_UNIT),
            category: doc.string(fields::CATEGORY).unwrap_or_default().to_owned(),
            unit: doc.string(fields::UNIT).unwrap_or_default().to_owned(),
            icon: doc.string(fields::ICON).unwrap_or_default().to_owned(),
        })
    }

    /// Liters consumed by `quantity` units of this activity
    #[must_use]
    pub fn liters_for(&self, quantity: f64) -> f64 {
        quantity * self.liters_per_unit
    }
}

/// Per-user, per-day aggregate stored under `users/{userId}/daily_records`
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    /// Start of the day the record covers
    pub date: DateTime<Utc>,
    /// `YYYY-MM-DD` key used for lookups
    pub date_key: String,
    /// Sum of `litersUsed` over the record's activities
    pub total_liters: f64,
    /// Number of activities logged that day
    pub activities_count: i64,
}

impl DailyRecord {
    /// Firestore fields for this record
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        Fields::new()
            .with(fields::DATE, self.date)
            .with(fields::DATE_KEY, self.date_key.as_str())
            .with(fields::TOTAL_LITERS, self.total_liters)
            .with(fields::ACTIVITIES_COUNT, self.activities_count)
    }

    /// Read a record back from its fields; absent numbers default to zero
    #[must_use]
    pub fn from_fields(doc: &Fields) -> Self {
        Self {
            date: doc.timestamp(fields::DATE).unwrap_or_default(),
            date_key: doc.string(fields::DATE_KEY).unwrap_or_default().to_owned(),
            total_liters: doc.number_or_zero(fields::TOTAL_LITERS),
            activities_count: doc.number_or_zero(fields::ACTIVITIES_COUNT) as i64,
        }
    }
}

/// A logged use of an [`ActivityType`]
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityEntry {
    /// Id of the `activity_types` document this entry refers to
    pub activity_type_id: String,
    /// Denormalized activity name
    pub activity_name: String,
    /// Units performed
    pub quantity: f64,
    /// `quantity × litersPerUnit`
    pub liters_used: f64,
    /// Denormalized category
    pub category: String,
    /// Denormalized icon
    pub icon: String,
    /// When the activity was logged
    pub timestamp: DateTime<Utc>,
}

impl ActivityEntry {
    /// Log `quantity` units of `activity_type`
    #[must_use]
    pub fn log(
        activity_type_id: impl Into<String>,
        activity_type: &ActivityType,
        quantity: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            activity_type_id: activity_type_id.into(),
            activity_name: activity_type.name.clone(),
            quantity,
            liters_used: activity_type.liters_for(quantity),
            category: activity_type.category.clone(),
            icon: activity_type.icon.clone(),
            timestamp,
        }
    }

    /// Firestore fields for this entry
    #[must_use]
    pub fn to_fields(&self) -> Fields {
        Fields::new()
            .with(fields::ACTIVITY_TYPE_ID, self.activity_type_id.as_str())
            .with(fields::ACTIVITY_NAME, self.activity_name.as_str())
            .with(fields::QUANTITY, self.quantity)
            .with(fields::LITERS_USED, self.liters_used)
            .with(fields::CATEGORY, self.category.as_str())
            .with(fields::ICON, self.icon.as_str())
            .with(fields::TIMESTAMP, self.timestamp)
    }
}

/// A `global_stats` document as read by the inspection tools
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalStats {
    /// Document id (`YYYY-MM-DD` or the legacy `water_consumption`)
    pub id: String,
    /// Total liters recorded in the document (zero when absent)
    pub total_liters: f64,
    /// `dateKey` field, only present on per-day documents
    pub date_key: Option<String>,
    /// Server-side time of the last update
    pub last_update: Option<DateTime<Utc>>,
}

impl GlobalStats {
    /// Read stats from a `global_stats` document
    #[must_use]
    pub fn from_document(document: &Document) -> Self {
        let doc = &document.fields;
        Self {
            id: document.id.clone(),
            total_liters: doc.number_or_zero(fields::TOTAL_LITERS),
            date_key: doc.string(fields::DATE_KEY).map(str::to_owned),
            last_update: doc.timestamp(fields::LAST_UPDATE),
        }
    }
}

/// `dateKey` representation of a calendar day
#[must_use]
pub fn date_key(date: NaiveDate) -> String {
    date.format(defaults::DATE_KEY_FORMAT).to_string()
}

/// Parse a `dateKey` back into a calendar day
///
/// # Errors
///
/// Returns an error if `key` is not formatted as `YYYY-MM-DD`.
pub fn parse_date_key(key: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(key, defaults::DATE_KEY_FORMAT)
        .map_err(|e| AppError::invalid_input(format!("Invalid date key '{key}': {e}")))
}

/// Equality filter value for a `dateKey` lookup
#[must_use]
pub fn date_key_value(date: NaiveDate) -> FieldValue {
    FieldValue::String(date_key(date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shower() -> ActivityType {
        ActivityType {
            name: "Ducha".into(),
            liters_per_unit: 8.0,
            category: "Higiene".into(),
            unit: "minutos".into(),
            icon: "🚿".into(),
        }
    }

    #[test]
    fn test_activity_type_fields_use_camel_case() {
        let fields = shower().to_fields();
        let names: Vec<&str> = fields.names().collect();
        assert_eq!(
            names,
            vec!["category", "icon", "litersPerUnit", "name", "unit"]
        );
        assert_eq!(
            fields.get("litersPerUnit"),
            Some(&FieldValue::Double(8.0))
        );
    }

    #[test]
    fn test_activity_type_from_document() {
        let doc = Document::new("activity_types/abc", shower().to_fields());
        let parsed = ActivityType::from_document(&doc).unwrap();
        assert_eq!(parsed, shower());

        let nameless = Document::new("activity_types/x", Fields::new().with("unit", "veces"));
        assert!(ActivityType::from_document(&nameless).is_err());
    }

    #[test]
    fn test_entry_liters_used_is_quantity_times_rate() {
        let entry = ActivityEntry::log("abc123", &shower(), 10.0, Utc::now());
        assert!((entry.liters_used - 80.0).abs() < f64::EPSILON);
        assert_eq!(entry.activity_name, "Ducha");
        assert_eq!(entry.icon, "🚿");
    }

    #[test]
    fn test_daily_record_defaults_missing_numbers() {
        let fields = Fields::new().with("dateKey", "2025-12-09");
        let record = DailyRecord::from_fields(&fields);
        assert_eq!(record.date_key, "2025-12-09");
        assert!(record.total_liters.abs() < f64::EPSILON);
        assert_eq!(record.activities_count, 0);
    }

    #[test]
    fn test_date_key_format() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(date_key(date), "2025-03-07");
        assert_eq!(parse_date_key("2025-03-07").unwrap(), date);
        assert!(parse_date_key("07/03/2025").is_err());
    }
}
