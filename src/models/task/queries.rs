use crate::api::{ApiError, Backend};
use super::types::{Task, TaskInput};

pub async fn find_all(api: &Backend) -> Result<Vec<Task>, ApiError> {
    api.get("/api/tasks").await
}

pub async fn create(api: &Backend, input: &TaskInput) -> Result<(), ApiError> {
    api.post_ok("/api/tasks", input).await
}

pub async fn update(api: &Backend, id: &str, input: &TaskInput) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/tasks/{id}"), input).await
}

pub async fn delete(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/api/tasks/{id}")).await
}
