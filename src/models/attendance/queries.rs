use chrono::NaiveDate;
use crate::api::{ApiError, Backend};
use super::types::{AttendanceLog, CheckIn, CheckOut};

pub async fn find_by_date(api: &Backend, date: NaiveDate) -> Result<Vec<AttendanceLog>, ApiError> {
    let date = date.format("%Y-%m-%d").to_string();
    api.get_with("/api/attendance", &[("date", date)]).await
}

pub async fn find_by_student(api: &Backend, student_id: &str) -> Result<Vec<AttendanceLog>, ApiError> {
    api.get_with("/api/attendance", &[("student_id", student_id.to_string())])
        .await
}

pub async fn create(api: &Backend, body: &CheckIn) -> Result<(), ApiError> {
    api.post_ok("/api/attendance", body).await
}

pub async fn check_in_existing(api: &Backend, id: &str, body: &CheckIn) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/attendance/{id}"), body).await
}

pub async fn check_out(api: &Backend, id: &str, body: &CheckOut) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/attendance/{id}"), body).await
}
