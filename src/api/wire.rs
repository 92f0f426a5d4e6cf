//! Request and response shapes of the application API

use super::error::GatewayError;
use crate::wizard::{format_date, parse_date, FieldKind, FieldValue, FormRecord, StageId, WireRule};
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

/// Reshape the stage-keyed record into the body of `POST /applications`.
///
/// Every declared field of every stage is written; consent fields are left
/// out, optional identifiers become `null` when blank and dates are rendered
/// as ISO calendar dates.
pub fn application_payload(record: &FormRecord) -> Result<Value, GatewayError> {
    let mut body = Map::new();

    for stage in StageId::ALL {
        let data = record.stage(stage).ok_or_else(|| {
            GatewayError::Unknown(format!("{} has not been completed", stage.title()))
        })?;

        let mut section = Map::new();
        for field in &stage.definition().fields {
            if field.wire == WireRule::Omit {
                continue;
            }
            let value = data.get(field.name).cloned().unwrap_or_else(|| field.missing_value());
            section.insert(field.name.to_string(), wire_value(field.kind, field.wire, &value));
        }
        body.insert(stage.key().to_string(), Value::Object(section));
    }

    Ok(Value::Object(body))
}

fn wire_value(kind: FieldKind, rule: WireRule, value: &FieldValue) -> Value {
    if kind == FieldKind::Date {
        let date = value
            .as_date()
            .or_else(|| value.as_text().and_then(parse_date));
        return date.map_or(Value::Null, |d| Value::String(format_date(d)));
    }

    let text = value.to_input();
    if rule == WireRule::NullIfEmpty && text.trim().is_empty() {
        Value::Null
    } else {
        Value::String(text)
    }
}

/// Accept identifiers sent either as JSON numbers or strings
fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(i64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}

/// Successful answer to a submission
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SubmissionReceipt {
    /// Reference identifier to quote in follow-ups
    #[serde(deserialize_with = "id_as_string")]
    pub application_id: String,
    #[serde(default)]
    pub submission_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Row of `GET /applications`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationSummary {
    #[serde(deserialize_with = "id_as_string")]
    pub application_id: String,
    #[serde(default)]
    pub submission_reason: String,
    #[serde(default)]
    pub entity_type: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub existing_npi: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub submission_date: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// Page of submitted applications
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationList {
    #[serde(default)]
    pub applications: Vec<ApplicationSummary>,
    #[serde(default)]
    pub total: usize,
}

/// Answer of `GET /applications/{id}`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ApplicationDetail {
    #[serde(deserialize_with = "id_as_string")]
    pub application_id: String,
    #[serde(default)]
    pub data: Value,
}
