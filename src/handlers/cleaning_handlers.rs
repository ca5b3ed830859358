use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::{ApiClient, Backend};
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{list_or_flash, write_failed};
use crate::models::cleaning::{self, CleaningForm, CleaningSchedule, split_by_status};
use crate::models::room;
use crate::templates_structs::{CleaningFormTemplate, CleaningListTemplate, PageContext};

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "cleaning.view")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/cleaning").await?;
    let backend = session::backend(&api, &session);
    let all = list_or_flash(cleaning::find_all(&backend).await, &mut ctx, "Failed to load cleaning schedules")?;
    let (pending, completed) = split_by_status(all);

    render(CleaningListTemplate {
        can_manage: ctx.permissions.has("cleaning.manage"),
        ctx,
        pending,
        completed,
    })
}

async fn form_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    form_action: String,
    form_title: &str,
    form: CleaningForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, api, config, "/cleaning").await?;
    let rooms = room::find_all(&session::backend(api, session)).await.unwrap_or_default();
    render(CleaningFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        form,
        rooms,
        errors,
    })
}

async fn find_schedule(backend: &Backend, id: &str) -> Result<CleaningSchedule, AppError> {
    cleaning::find_all(backend)
        .await?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or(AppError::NotFound)
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "cleaning.manage")?;
    form_page(&api, &config, &session, "/cleaning".into(), "Add Schedule", CleaningForm::new_schedule(), vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<CleaningForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "cleaning.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match cleaning::create(&session::backend(&api, &session), &input).await {
            Ok(()) => {
                log::info!("Cleaning of '{}' scheduled for {}", input.area, input.scheduled_date);
                set_flash(&session, "Schedule added successfully");
                return Ok(redirect("/cleaning"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save schedule")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, "/cleaning".into(), "Add Schedule", form, errors).await
}

pub async fn edit_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "cleaning.manage")?;

    let id = path.into_inner();
    let existing = find_schedule(&session::backend(&api, &session), &id).await?;
    let form = CleaningForm::from_schedule(&existing);
    form_page(&api, &config, &session, format!("/cleaning/{id}"), "Edit Schedule", form, vec![]).await
}

pub async fn update(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CleaningForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "cleaning.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match cleaning::update(&session::backend(&api, &session), &id, &input).await {
            Ok(()) => {
                log::info!("Cleaning schedule {id} updated");
                set_flash(&session, "Schedule updated successfully");
                return Ok(redirect("/cleaning"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save schedule")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, format!("/cleaning/{id}"), "Edit Schedule", form, errors).await
}

pub async fn complete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "cleaning.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let backend = session::backend(&api, &session);
    let existing = find_schedule(&backend, &id).await?;

    match cleaning::update(&backend, &id, &existing.completed_input()).await {
        Ok(()) => {
            log::info!("Cleaning schedule {id} completed");
            set_flash(&session, "Marked as completed");
        }
        Err(e) => write_failed(&session, e, "Failed to update schedule")?,
    }
    Ok(redirect("/cleaning"))
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "cleaning.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match cleaning::delete(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Cleaning schedule {id} deleted");
            set_flash(&session, "Schedule deleted successfully");
        }
        Err(e) => write_failed(&session, e, "Failed to delete schedule")?,
    }
    Ok(redirect("/cleaning"))
}
