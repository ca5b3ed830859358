//! Wire helpers shared by the backend models.
//!
//! The backend identifies documents with `_id` (sometimes `id`, sometimes a
//! number) and either embeds related students or sends only their id, so the
//! deserializers here are deliberately lenient.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Deserialize an id that may arrive as a string or a number.
pub fn id_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    match Value::deserialize(d)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

/// Like `id_string`, but `null`/missing becomes `None`.
pub fn opt_id_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Option::<Value>::deserialize(d)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!("invalid id: {other}"))),
    }
}

/// Deserialize a number that may arrive as a JSON string (`"1500.00"`).
pub fn lenient_f64<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    match Value::deserialize(d)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => Ok(s.trim().parse().unwrap_or(0.0)),
        _ => Ok(0.0),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileSummary {
    #[serde(default, rename = "roomNumber")]
    pub room_number: Option<String>,
}

/// Embedded student document, as returned by populated backend queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentSummary {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, rename = "studentProfile")]
    pub student_profile: Option<ProfileSummary>,
}

/// A reference to a student: either the populated document or a bare id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StudentRef {
    Populated(StudentSummary),
    Id(#[serde(deserialize_with = "id_string")] String),
}

impl StudentRef {
    pub fn id(&self) -> &str {
        match self {
            StudentRef::Populated(s) => &s.id,
            StudentRef::Id(id) => id,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            StudentRef::Populated(s) if !s.name.is_empty() => Some(&s.name),
            _ => None,
        }
    }

    pub fn display_name(&self) -> String {
        self.name().unwrap_or("Unknown").to_string()
    }

    pub fn room_number(&self) -> String {
        match self {
            StudentRef::Populated(s) => s
                .student_profile
                .as_ref()
                .and_then(|p| p.room_number.clone())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
            StudentRef::Id(_) => "N/A".to_string(),
        }
    }
}

/// Initials for avatar badges: "Jane Q Doe" -> "JQD".
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|part| part.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

/// Parse the timestamp formats the backend emits (RFC 3339 or a bare date).
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local));
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|dt| dt.and_local_timezone(Local).single())
}

/// `09:05 AM`, or `None` for missing/unparseable timestamps.
pub fn format_time(raw: Option<&str>) -> Option<String> {
    raw.and_then(parse_timestamp)
        .map(|dt| dt.format("%I:%M %p").to_string())
}

/// `Oct 18, 2026`, falling back to the raw text.
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%b %d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `YYYY-MM-DD` prefix of a timestamp, for `<input type="date">` values.
pub fn date_input_value(raw: &str) -> String {
    raw.get(..10)
        .filter(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").is_ok())
        .map(str::to_string)
        .unwrap_or_default()
}

/// Philippine peso with thousands separators: `₱12,345.50`.
pub fn format_php(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}₱{}.{:02}", if negative { "-" } else { "" }, grouped, cents % 100)
}

/// "in-progress" -> "In-progress", "present" -> "Present".
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_ref_accepts_id_and_document() {
        let bare: StudentRef = serde_json::from_str(r#""S100""#).unwrap();
        assert_eq!(bare.id(), "S100");
        assert_eq!(bare.display_name(), "Unknown");

        let numeric: StudentRef = serde_json::from_str("42").unwrap();
        assert_eq!(numeric.id(), "42");

        let doc: StudentRef = serde_json::from_str(
            r#"{"_id":"S100","name":"Jane Doe","studentProfile":{"roomNumber":"204"}}"#,
        )
        .unwrap();
        assert_eq!(doc.id(), "S100");
        assert_eq!(doc.name(), Some("Jane Doe"));
        assert_eq!(doc.room_number(), "204");
    }

    #[test]
    fn peso_formatting() {
        assert_eq!(format_php(0.0), "₱0.00");
        assert_eq!(format_php(1500.5), "₱1,500.50");
        assert_eq!(format_php(1234567.0), "₱1,234,567.00");
        assert_eq!(format_php(-12.5), "-₱12.50");
    }

    #[test]
    fn initials_and_capitalize() {
        assert_eq!(initials("jane q  doe"), "JQD");
        assert_eq!(initials(""), "");
        assert_eq!(capitalize("in-progress"), "In-progress");
    }

    #[test]
    fn time_formatting_rejects_garbage() {
        assert_eq!(format_time(None), None);
        assert_eq!(format_time(Some("not a date")), None);
        assert!(format_time(Some("2026-10-18T08:30:00Z")).is_some());
        assert_eq!(date_input_value("2026-10-18T00:00:00.000Z"), "2026-10-18");
        assert_eq!(date_input_value("2026-10-18"), "2026-10-18");
        assert_eq!(date_input_value("soon"), "");
    }
}
