use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{list_or_flash, write_failed};
use crate::models::notification::{self, NotificationFeed, unread_count};
use crate::templates_structs::{NotificationListTemplate, PageContext};

/// Entries returned to the header poller.
const FEED_LIMIT: usize = 10;

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "notifications.view")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/notifications").await?;
    let backend = session::backend(&api, &session);
    let notifications = list_or_flash(
        notification::find_mine(&backend).await,
        &mut ctx,
        "Failed to load notifications",
    )?;
    let unread = unread_count(&notifications);

    render(NotificationListTemplate { ctx, notifications, unread })
}

/// JSON for the header badge and dropdown, polled by `notifications.js`.
pub async fn feed(api: web::Data<ApiClient>, session: Session) -> Result<HttpResponse, AppError> {
    require_permission(&session, "notifications.view")?;

    let list = notification::find_mine(&session::backend(&api, &session)).await?;
    Ok(HttpResponse::Ok().json(NotificationFeed::from_list(&list, FEED_LIMIT)))
}

pub async fn mark_read(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "notifications.view")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    if let Err(e) = notification::mark_read(&session::backend(&api, &session), &id).await {
        write_failed(&session, e, "Failed to update notification")?;
    }
    Ok(redirect("/notifications"))
}

pub async fn mark_all_read(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "notifications.view")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    match notification::mark_all_read(&session::backend(&api, &session)).await {
        Ok(()) => set_flash(&session, "All notifications marked as read"),
        Err(e) => write_failed(&session, e, "Failed to update notifications")?,
    }
    Ok(redirect("/notifications"))
}
