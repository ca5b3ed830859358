use std::fmt;

use qrcode::QrCode;
use qrcode::render::svg;
use serde::Serialize;
use serde_json::Value;

use crate::api::ApiError;
use crate::models::account::SessionUser;

/// Contents of a student's QR code: `{"id": ..., "name": ..., "room": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScanPayload {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScanError {
    /// Nothing was scanned.
    Empty,
    /// The scanned text is not JSON.
    Malformed(String),
    /// JSON without a usable `id`.
    MissingId,
    /// The backend refused or could not be reached.
    Api(ApiError),
}

impl ScanError {
    /// Operator-facing text: the server message verbatim when there is one.
    pub fn message(&self) -> String {
        match self {
            ScanError::Empty => "Scan a QR code first.".to_string(),
            ScanError::Malformed(e) => format!("Invalid QR Code: {e}"),
            ScanError::MissingId => "Invalid QR Code: Missing ID".to_string(),
            ScanError::Api(ApiError::Status { message: Some(m), .. }) => m.clone(),
            ScanError::Api(ApiError::Status { status, .. }) => {
                format!("Request failed with status code {status}")
            }
            ScanError::Api(ApiError::Transport(e)) if !e.is_empty() => e.clone(),
            ScanError::Api(_) => "Invalid QR Code or Scan Failed".to_string(),
        }
    }

    /// True when the failure happened before any request was made.
    pub fn is_local(&self) -> bool {
        !matches!(self, ScanError::Api(_))
    }
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for ScanError {}

impl From<ApiError> for ScanError {
    fn from(e: ApiError) -> Self {
        ScanError::Api(e)
    }
}

impl ScanPayload {
    pub fn for_student(user: &SessionUser) -> Self {
        Self {
            id: user.id.clone(),
            name: Some(user.name.clone()),
            room: Some(user.room_number()),
        }
    }

    /// Decode scanned text. The `id` may be a string or a number but must not
    /// be empty; `name` and `room` are optional.
    pub fn decode(raw: &str) -> Result<Self, ScanError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ScanError::Empty);
        }

        let value: Value =
            serde_json::from_str(raw).map_err(|e| ScanError::Malformed(e.to_string()))?;

        let id = match value.get("id") {
            Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(ScanError::MissingId),
        };
        let text = |key: &str| {
            value
                .get(key)
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };

        Ok(Self {
            id,
            name: text("name"),
            room: text("room"),
        })
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Render the payload as an inline SVG QR code.
    pub fn to_svg(&self) -> Result<String, qrcode::types::QrError> {
        let code = QrCode::new(self.to_json().as_bytes())?;
        Ok(code
            .render::<svg::Color>()
            .min_dimensions(256, 256)
            .dark_color(svg::Color("#001F3F"))
            .light_color(svg::Color("#FFFFFF"))
            .build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_full_payload() {
        let p = ScanPayload::decode(r#"{"id":"S100","name":"Jane Doe","room":"204"}"#).unwrap();
        assert_eq!(p.id, "S100");
        assert_eq!(p.name.as_deref(), Some("Jane Doe"));
        assert_eq!(p.room.as_deref(), Some("204"));
    }

    #[test]
    fn numeric_id_is_accepted() {
        let p = ScanPayload::decode(r#"{"id":42}"#).unwrap();
        assert_eq!(p.id, "42");
        assert_eq!(p.name, None);
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(ScanPayload::decode("   "), Err(ScanError::Empty));
        assert!(matches!(ScanPayload::decode("S100"), Err(ScanError::Malformed(_))));
        assert_eq!(ScanPayload::decode(r#"{"name":"Jane"}"#), Err(ScanError::MissingId));
        assert_eq!(ScanPayload::decode(r#"{"id":""}"#), Err(ScanError::MissingId));
        assert_eq!(ScanPayload::decode("[1,2]"), Err(ScanError::MissingId));
        assert_eq!(
            ScanError::MissingId.message(),
            "Invalid QR Code: Missing ID"
        );
    }

    #[test]
    fn api_errors_surface_server_message() {
        let err = ScanError::Api(ApiError::Status {
            status: 409,
            message: Some("Duplicate attendance".into()),
            code: None,
        });
        assert_eq!(err.message(), "Duplicate attendance");
        assert!(!err.is_local());
        assert_eq!(
            ScanError::Api(ApiError::Decode(String::new())).message(),
            "Invalid QR Code or Scan Failed"
        );
    }

    #[test]
    fn json_round_trips_through_decode() {
        let p = ScanPayload {
            id: "S1".into(),
            name: Some("A B".into()),
            room: Some("N/A".into()),
        };
        assert_eq!(ScanPayload::decode(&p.to_json()).unwrap(), p);
        assert!(p.to_svg().unwrap().contains("<svg"));
    }
}
