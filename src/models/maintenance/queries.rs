use serde_json::json;

use crate::api::{ApiError, Backend};
use super::types::{MaintenanceInput, MaintenanceRequest};

/// All tickets visible to the caller; the backend scopes students to their own.
pub async fn find_all(api: &Backend, status: Option<&str>) -> Result<Vec<MaintenanceRequest>, ApiError> {
    let query: Vec<(&str, String)> = status
        .filter(|s| !s.is_empty())
        .map(|s| vec![("status", s.to_string())])
        .unwrap_or_default();
    api.get_with("/api/maintenance", &query).await
}

pub async fn find_by_student(api: &Backend, student_id: &str) -> Result<Vec<MaintenanceRequest>, ApiError> {
    api.get_with("/api/maintenance", &[("student_id", student_id.to_string())])
        .await
}

pub async fn create(api: &Backend, input: &MaintenanceInput) -> Result<(), ApiError> {
    api.post_ok("/api/maintenance", input).await
}

pub async fn update_status(api: &Backend, id: &str, status: &str) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/maintenance/{id}"), &json!({ "status": status })).await
}

pub async fn delete(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/api/maintenance/{id}")).await
}
