use crate::api::{ApiError, Backend};
use super::types::{Announcement, AnnouncementInput, sort_newest_first};

pub async fn find_all(api: &Backend) -> Result<Vec<Announcement>, ApiError> {
    let mut list: Vec<Announcement> = api.get("/api/announcements").await?;
    sort_newest_first(&mut list);
    Ok(list)
}

pub async fn create(api: &Backend, input: &AnnouncementInput) -> Result<(), ApiError> {
    api.post_ok("/api/announcements", input).await
}

pub async fn delete(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/api/announcements/{id}")).await
}
