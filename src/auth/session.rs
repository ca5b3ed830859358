use actix_session::Session;

use crate::api::{ApiClient, Backend};
use crate::auth::roles;
use crate::errors::AppError;
use crate::models::account::SessionUser;

const TOKEN_KEY: &str = "token";
const USER_KEY: &str = "user";
const PERMISSIONS_KEY: &str = "permissions";
const FLASH_KEY: &str = "flash";

/// Wrapper around permission codes with a `has()` method for use in Askama templates.
#[derive(Debug, Clone, Default)]
pub struct Permissions(pub Vec<String>);

impl Permissions {
    pub fn has(&self, code: &str) -> bool {
        self.0.iter().any(|p| p == code)
    }

    pub fn from_csv(csv: &str) -> Self {
        let codes = csv
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();
        Permissions(codes)
    }

    pub fn to_csv(&self) -> String {
        self.0.join(",")
    }
}

/// Store the bearer token and user after a successful sign-in.
pub fn sign_in(session: &Session, token: &str, user: &SessionUser) -> Result<(), AppError> {
    session.renew();
    session
        .insert(TOKEN_KEY, token)
        .map_err(|e| AppError::Session(format!("Failed to store token: {e}")))?;
    set_user(session, user)
}

/// Replace the stored user (and the permissions derived from its role).
pub fn set_user(session: &Session, user: &SessionUser) -> Result<(), AppError> {
    let permissions = roles::permissions_for(&user.role);
    session
        .insert(USER_KEY, user)
        .map_err(|e| AppError::Session(format!("Failed to store user: {e}")))?;
    session
        .insert(PERMISSIONS_KEY, permissions.to_csv())
        .map_err(|e| AppError::Session(format!("Failed to store permissions: {e}")))?;
    Ok(())
}

pub fn get_token(session: &Session) -> Option<String> {
    session.get::<String>(TOKEN_KEY).unwrap_or(None)
}

pub fn get_user(session: &Session) -> Option<SessionUser> {
    session.get::<SessionUser>(USER_KEY).unwrap_or(None)
}

pub fn is_signed_in(session: &Session) -> bool {
    get_token(session).is_some() && get_user(session).is_some()
}

/// The signed-in user, or a session error (which redirects to the login page).
pub fn require_user(session: &Session) -> Result<SessionUser, AppError> {
    get_user(session).ok_or_else(|| AppError::Session("No user in session".to_string()))
}

pub fn get_permissions(session: &Session) -> Result<Permissions, String> {
    match session.get::<String>(PERMISSIONS_KEY) {
        Ok(Some(csv)) => Ok(Permissions::from_csv(&csv)),
        Ok(None) => Err("No permissions in session".to_string()),
        Err(e) => Err(format!("Session error: {}", e)),
    }
}

/// A backend handle carrying this session's bearer token.
pub fn backend(api: &ApiClient, session: &Session) -> Backend {
    api.backend(get_token(session))
}

pub fn set_flash(session: &Session, message: impl Into<String>) {
    let _ = session.insert(FLASH_KEY, message.into());
}

pub fn take_flash(session: &Session) -> Option<String> {
    let flash = session.get::<String>(FLASH_KEY).unwrap_or(None);
    if flash.is_some() {
        session.remove(FLASH_KEY);
    }
    flash
}

/// Check permission; returns Err(AppError) if denied.
pub fn require_permission(session: &Session, code: &str) -> Result<(), AppError> {
    let permissions = get_permissions(session)
        .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;

    if permissions.has(code) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(code.to_string()))
    }
}
