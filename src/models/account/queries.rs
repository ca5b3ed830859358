use serde_json::json;

use crate::api::{ApiError, Backend};
use super::types::{AuthResponse, LoginRequest, ProfileUpdate, RegisterRequest};

pub async fn login(api: &Backend, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
    api.post("/api/auth/login", &LoginRequest { email, password }).await
}

pub async fn google_login(api: &Backend, credential: &str) -> Result<AuthResponse, ApiError> {
    api.post("/api/auth/google", &json!({ "token": credential })).await
}

pub async fn register(api: &Backend, req: &RegisterRequest) -> Result<(), ApiError> {
    api.post_ok("/api/auth/register", req).await
}

pub async fn verify_otp(api: &Backend, email: &str, otp: &str) -> Result<(), ApiError> {
    api.post_ok("/api/auth/verify-otp", &json!({ "email": email, "otp": otp })).await
}

pub async fn resend_otp(api: &Backend, email: &str) -> Result<(), ApiError> {
    api.post_ok("/api/auth/resend-otp", &json!({ "email": email })).await
}

pub async fn forgot_password(api: &Backend, email: &str) -> Result<(), ApiError> {
    api.post_ok("/api/auth/forgot-password", &json!({ "email": email })).await
}

pub async fn reset_password(
    api: &Backend,
    email: &str,
    otp: &str,
    password: &str,
) -> Result<(), ApiError> {
    let body = json!({ "email": email, "otp": otp, "password": password });
    api.post_ok("/api/auth/reset-password", &body).await
}

pub async fn update_profile(api: &Backend, update: &ProfileUpdate) -> Result<AuthResponse, ApiError> {
    api.put("/api/auth/profile", update).await
}
