use serde_json::json;

use crate::api::{ApiError, Backend};
use super::types::{Employee, PendingUser, StaffInput, Student, StudentHistory, StudentInput};

pub async fn find_students(api: &Backend) -> Result<Vec<Student>, ApiError> {
    api.get("/api/students").await
}

pub async fn create_student(api: &Backend, input: &StudentInput) -> Result<(), ApiError> {
    api.post_ok("/api/students", input).await
}

pub async fn update_student(api: &Backend, id: &str, input: &StudentInput) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/students/{id}"), input).await
}

pub async fn delete_student(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.delete(&format!("/api/students/{id}")).await
}

pub async fn find_history(api: &Backend, id: &str) -> Result<StudentHistory, ApiError> {
    api.get(&format!("/api/users/{id}/history")).await
}

pub async fn find_employees(api: &Backend) -> Result<Vec<Employee>, ApiError> {
    api.get("/api/users/staff").await
}

pub async fn create_employee(api: &Backend, input: &StaffInput) -> Result<(), ApiError> {
    api.post_ok("/api/users/staff", input).await
}

pub async fn update_role(api: &Backend, id: &str, role: &str) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/users/{id}/role"), &json!({ "role": role })).await
}

pub async fn find_pending(api: &Backend) -> Result<Vec<PendingUser>, ApiError> {
    api.get("/api/users/pending").await
}

pub async fn approve(api: &Backend, id: &str) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/users/{id}/approve"), &json!({})).await
}

pub async fn reject(api: &Backend, id: &str, reason: &str) -> Result<(), ApiError> {
    api.put_ok(&format!("/api/users/{id}/reject"), &json!({ "reason": reason })).await
}
