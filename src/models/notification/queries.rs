use serde_json::json;

use crate::api::{ApiError, Backend};
use super::types::{Notification, unread_count};

pub async fn find_mine(api: &Backend) -> Result<Vec<Notification>, ApiError> {
    api.get("/api/notifications").await
}

/// Unread count for the page header; a failed fetch shows zero.
pub async fn count_unread(api: &Backend) -> usize {
    match find_mine(api).await {
        Ok(list) => unread_count(&list),
        Err(e) => {
            log::debug!("Could not load notifications: {e}");
            0
        }
    }
}

pub async fn mark_read(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/notifications/{id}/read"), &json!({})).await
}

pub async fn mark_all_read(api: &Backend) -> Result<(), ApiError> {
    api.put_ok("/api/notifications/read-all", &json!({})).await
}
