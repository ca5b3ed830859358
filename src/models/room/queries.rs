use crate::api::{ApiError, Backend};
use super::types::{Room, RoomInput};

pub async fn find_all(api: &Backend) -> Result<Vec<Room>, ApiError> {
    api.get("/api/rooms").await
}

pub async fn create(api: &Backend, input: &RoomInput) -> Result<(), ApiError> {
    api.post_ok("/api/rooms", input).await
}

pub async fn update(api: &Backend, id: &str, input: &RoomInput) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/rooms/{id}"), input).await
}

pub async fn delete(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/api/rooms/{id}")).await
}
