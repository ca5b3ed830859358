use crate::api::{ApiError, Backend};
use super::types::{LogFilter, SystemLog};

pub async fn find_filtered(api: &Backend, filter: &LogFilter) -> Result<Vec<SystemLog>, ApiError> {
    api.get_with("/api/logs", &filter.query_params()).await
}
