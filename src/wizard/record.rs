//! Stage sub-records and the aggregated form record

use super::stage::StageId;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Accepted date input layouts; the first one is the canonical ISO form
const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// A single answer inside a stage sub-record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    /// Calendar date, `None` when left blank
    Date(Option<NaiveDate>),
    /// Acknowledgement checkbox
    Flag(bool),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    /// Interpret raw date input.
    ///
    /// Blank input becomes a null date. Input that does not parse is kept
    /// as text so the validator can report it instead of silently dropping it.
    pub fn date_from_input(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return FieldValue::Date(None);
        }
        match parse_date(raw) {
            Some(date) => FieldValue::Date(Some(date)),
            None => FieldValue::Text(raw.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.trim().is_empty(),
            FieldValue::Date(d) => d.is_none(),
            FieldValue::Flag(b) => !*b,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            FieldValue::Date(d) => *d,
            _ => None,
        }
    }

    /// Text used when loading the value back into an input buffer
    pub fn to_input(&self) -> String {
        match self {
            FieldValue::Text(s) => s.clone(),
            FieldValue::Date(Some(d)) => format_date(*d),
            FieldValue::Date(None) => String::new(),
            FieldValue::Flag(true) => "yes".to_string(),
            FieldValue::Flag(false) => String::new(),
        }
    }
}

/// Parse a calendar date in any accepted input layout
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw.trim(), fmt).ok())
}

/// ISO calendar-date rendering
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_INPUT_FORMATS[0]).to_string()
}

/// Field name to value mapping for one stage
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageData {
    values: BTreeMap<String, FieldValue>,
}

impl StageData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.values.insert(name.into(), value);
    }

    /// Builder-style insert, handy for assembling sample data
    pub fn with(mut self, name: impl Into<String>, value: FieldValue) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.values.get(name)
    }

    /// Text value of a field, `None` for missing or non-text fields
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(FieldValue::as_text)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, FieldValue)> for StageData {
    fn from_iter<T: IntoIterator<Item = (K, FieldValue)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

/// Aggregated answers of every completed stage.
///
/// The record is never mutated in place: [`merge`] produces a new record
/// sharing the untouched sub-records with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRecord {
    stages: BTreeMap<StageId, Arc<StageData>>,
}

impl FormRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self, stage: StageId) -> Option<&StageData> {
        self.stages.get(&stage).map(Arc::as_ref)
    }

    pub fn contains(&self, stage: StageId) -> bool {
        self.stages.contains_key(&stage)
    }

    /// Completed stages in wizard order
    pub fn stages(&self) -> impl Iterator<Item = (StageId, &StageData)> {
        self.stages.iter().map(|(id, data)| (*id, data.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Return a record equal to `record` except that `stage` holds `data`.
///
/// No validation happens here; callers validate first.
pub fn merge(record: &FormRecord, stage: StageId, data: StageData) -> FormRecord {
    let mut stages = record.stages.clone();
    stages.insert(stage, Arc::new(data));
    FormRecord { stages }
}
