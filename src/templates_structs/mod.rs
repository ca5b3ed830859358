// Template context structures for Askama templates, organized by domain.
// All types are re-exported: `use dormsync::templates_structs::*`

use actix_session::Session;

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{self, Permissions, get_permissions, take_flash};
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::nav_item::{self, NavModule};
use crate::models::notification;
use crate::models::user::role_label;

/// Common context shared by all authenticated pages.
/// Templates access these as `ctx.username`, `ctx.nav_modules`, etc.
pub struct PageContext {
    pub username: String,
    pub avatar_initial: String,
    pub role: String,
    pub role_label: String,
    pub permissions: Permissions,
    pub flash: Option<String>,
    pub nav_modules: Vec<NavModule>,
    pub app_name: String,
    pub csrf_token: String,
    pub unread_count: usize,
    pub poll_secs: u64,
}

impl PageContext {
    pub async fn build(
        session: &Session,
        api: &ApiClient,
        config: &AppConfig,
        current_path: &str,
    ) -> Result<Self, AppError> {
        let user = session::require_user(session)?;
        let permissions = get_permissions(session)
            .map_err(|e| AppError::Session(format!("Failed to get permissions: {}", e)))?;
        let flash = take_flash(session);
        let nav_modules = nav_item::find_navigation(&permissions, current_path);
        let csrf_token = csrf::get_or_create_token(session);
        let avatar_initial = user.name.chars().next().unwrap_or('?').to_uppercase().to_string();
        let unread_count = if permissions.has("notifications.view") {
            notification::count_unread(&session::backend(api, session)).await
        } else {
            0
        };
        Ok(Self {
            username: user.name,
            avatar_initial,
            role_label: role_label(&user.role),
            role: user.role,
            permissions,
            flash,
            nav_modules,
            app_name: config.app_name.clone(),
            csrf_token,
            unread_count,
            poll_secs: config.notification_poll_secs,
        })
    }

    /// Context for pages reachable before approval: no navigation, no polling.
    pub fn minimal(session: &Session, config: &AppConfig) -> Result<Self, AppError> {
        let user = session::require_user(session)?;
        Ok(Self {
            avatar_initial: user.name.chars().next().unwrap_or('?').to_uppercase().to_string(),
            role_label: role_label(&user.role),
            username: user.name,
            role: user.role,
            permissions: Permissions::default(),
            flash: take_flash(session),
            nav_modules: Vec::new(),
            app_name: config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            unread_count: 0,
            poll_secs: 0,
        })
    }
}

/// Context for the signed-out pages (login, registration, OTP, reset).
pub struct PublicContext {
    pub app_name: String,
    pub csrf_token: String,
    pub flash: Option<String>,
}

impl PublicContext {
    pub fn build(session: &Session, config: &AppConfig) -> Self {
        Self {
            app_name: config.app_name.clone(),
            csrf_token: csrf::get_or_create_token(session),
            flash: take_flash(session),
        }
    }
}

mod account;
mod announcement;
mod attendance;
mod cleaning;
mod dashboard;
mod landing;
mod maintenance;
mod notification_pages;
mod payment;
mod room;
mod system_log;
mod task;
mod user;

pub use account::*;
pub use announcement::*;
pub use attendance::*;
pub use cleaning::*;
pub use dashboard::*;
pub use landing::*;
pub use maintenance::*;
pub use notification_pages::*;
pub use payment::*;
pub use room::*;
pub use system_log::*;
pub use task::*;
pub use user::*;
