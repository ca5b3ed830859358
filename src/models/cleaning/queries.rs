use crate::api::{ApiError, Backend};
use super::types::{CleaningInput, CleaningSchedule};

pub async fn find_all(api: &Backend) -> Result<Vec<CleaningSchedule>, ApiError> {
    api.get("/api/cleaning-schedule").await
}

pub async fn create(api: &Backend, input: &CleaningInput) -> Result<(), ApiError> {
    api.post_ok("/api/cleaning-schedule", input).await
}

pub async fn update(api: &Backend, id: &str, input: &CleaningInput) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/cleaning-schedule/{id}"), input).await
}

pub async fn delete(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/api/cleaning-schedule/{id}")).await
}
