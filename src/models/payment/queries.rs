use reqwest::multipart::{Form, Part};
use serde_json::json;

use crate::api::{ApiError, Backend};
use super::types::{BulkPaymentRow, Payment, PaymentInput};

pub async fn find_all(api: &Backend) -> Result<Vec<Payment>, ApiError> {
    api.get("/api/payments").await
}

pub async fn find_by_student(api: &Backend, student_id: &str) -> Result<Vec<Payment>, ApiError> {
    api.get_with("/api/payments", &[("student_id", student_id.to_string())])
        .await
}

/// Payments of the signed-in student.
pub async fn find_mine(api: &Backend) -> Result<Vec<Payment>, ApiError> {
    api.get("/api/payments/my-history").await
}

pub async fn create(api: &Backend, input: &PaymentInput) -> Result<(), ApiError> {
    api.post_ok("/api/payments", input).await
}

pub async fn update(api: &Backend, id: &str, input: &PaymentInput) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/payments/{id}"), input).await
}

pub async fn delete(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/api/payments/{id}")).await
}

pub async fn create_bulk(api: &Backend, rows: &[BulkPaymentRow]) -> Result<(), ApiError> {
    api.post_ok("/api/payments/bulk", &json!({ "payments": rows })).await
}

pub async fn mark_paid(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.patch_ok(&format!("/api/payments/{id}"), &json!({ "status": "paid" })).await
}

pub async fn submit_receipt_link(api: &Backend, id: &str, url: &str) -> Result<(), ApiError> {
    let body = json!({ "status": "paid", "receiptUrl": url });
    api.put_ok(&format!("/api/payments/{id}"), &body).await
}

/// Upload a receipt image or PDF as `receipt_image`.
pub async fn submit_receipt_file(
    api: &Backend,
    id: &str,
    file_name: String,
    content_type: &str,
    bytes: Vec<u8>,
) -> Result<(), ApiError> {
    let part = Part::bytes(bytes)
        .file_name(file_name)
        .mime_str(content_type)?;
    let form = Form::new().text("status", "paid").part("receipt_image", part);
    api.put_multipart_ok(&format!("/api/payments/{id}"), form).await
}
