use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{list_or_flash, write_failed};
use crate::models::announcement::{self, AnnouncementForm, PRIORITIES};
use crate::templates_structs::{AnnouncementListTemplate, PageContext};

async fn list_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    form: AnnouncementForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let mut ctx = PageContext::build(session, api, config, "/announcements").await?;
    let backend = session::backend(api, session);
    let announcements = list_or_flash(
        announcement::find_all(&backend).await,
        &mut ctx,
        "Failed to load announcements",
    )?;

    render(AnnouncementListTemplate {
        can_manage: ctx.permissions.has("announcements.manage"),
        ctx,
        announcements,
        form,
        priorities: PRIORITIES.to_vec(),
        errors,
    })
}

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "announcements.view")?;
    let form = AnnouncementForm { priority: "normal".to_string(), ..AnnouncementForm::default() };
    list_page(&api, &config, &session, form, vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<AnnouncementForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "announcements.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match announcement::create(&session::backend(&api, &session), &input).await {
            Ok(()) => {
                log::info!("Announcement '{}' posted", input.title);
                set_flash(&session, "Announcement posted successfully");
                return Ok(redirect("/announcements"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to post announcement")],
        },
        Err(errors) => errors,
    };

    list_page(&api, &config, &session, form, errors).await
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "announcements.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match announcement::delete(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Announcement {id} deleted");
            set_flash(&session, "Announcement deleted");
        }
        Err(e) => write_failed(&session, e, "Failed to delete announcement")?,
    }
    Ok(redirect("/announcements"))
}
