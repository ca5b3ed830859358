use std::fmt;

use serde_json::Value;

/// Failure of a call to the dormitory backend.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// The backend answered with a non-success status.
    Status {
        status: u16,
        message: Option<String>,
        code: Option<String>,
    },
    /// The request never produced a response (connect, timeout, TLS...).
    Transport(String),
    /// A success response whose body did not match the expected shape.
    Decode(String),
}

impl ApiError {
    /// Build a status error from the raw response body. Understands
    /// `{ "message": ..., "code": ... }` and validation bodies of the form
    /// `{ "errors": { "field": ["first message", ...] } }`, where the first
    /// listed message wins over `message`.
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: Option<Value> = serde_json::from_str(body).ok();
        let field = |key: &str| {
            parsed
                .as_ref()
                .and_then(|v| v.get(key))
                .and_then(Value::as_str)
                .map(str::to_string)
                .filter(|s| !s.is_empty())
        };

        let validation = parsed
            .as_ref()
            .and_then(|v| v.get("errors"))
            .and_then(Value::as_object)
            .and_then(|errors| errors.values().next())
            .and_then(Value::as_array)
            .and_then(|messages| messages.first())
            .and_then(Value::as_str)
            .map(str::to_string);

        ApiError::Status {
            status,
            message: validation.or_else(|| field("message")),
            code: field("code"),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }

    /// The server message verbatim, or `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// 403 raised for accounts an administrator has not approved yet.
    pub fn is_pending_approval(&self) -> bool {
        match self {
            ApiError::Status { status: 403, code, message } => {
                code.as_deref() == Some("PENDING_APPROVAL")
                    || message.as_deref().is_some_and(|m| m.contains("pending"))
            }
            _ => false,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Status { status, message: Some(m), .. } => write!(f, "{status}: {m}"),
            ApiError::Status { status, .. } => write!(f, "backend returned {status}"),
            ApiError::Transport(e) => write!(f, "transport error: {e}"),
            ApiError::Decode(e) => write!(f, "unexpected response: {e}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_and_code_are_extracted() {
        let err = ApiError::from_body(403, r#"{"message":"Account pending","code":"PENDING_APPROVAL"}"#);
        assert_eq!(err.server_message(), Some("Account pending"));
        assert!(err.is_pending_approval());
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn validation_errors_take_precedence() {
        let err = ApiError::from_body(
            422,
            r#"{"message":"The given data was invalid.","errors":{"email":["The email has already been taken."]}}"#,
        );
        assert_eq!(err.user_message("Registration failed"), "The email has already been taken.");
    }

    #[test]
    fn non_json_body_uses_fallback() {
        let err = ApiError::from_body(502, "<html>Bad gateway</html>");
        assert_eq!(err.user_message("Operation failed."), "Operation failed.");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    fn transport_errors_have_no_server_message() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(err.user_message("Failed to load rooms"), "Failed to load rooms");
        assert!(!err.is_pending_approval());
    }
}
