use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{ListQuery, list_href, list_or_flash, write_failed};
use crate::models::maintenance::{
    self, MAINTENANCE_STATUSES, MaintenanceForm, StatusForm, URGENCIES, is_valid_status,
};
use crate::models::pagination::paginate;
use crate::templates_structs::{MaintenanceFormTemplate, MaintenanceListTemplate, PageContext};

const PER_PAGE: usize = 10;

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "maintenance.view")?;

    let user = session::require_user(&session)?;
    let mut ctx = PageContext::build(&session, &api, &config, "/maintenance").await?;
    let backend = session::backend(&api, &session);
    let can_manage = ctx.permissions.has("maintenance.manage");

    let status_filter = query.status();
    let result = if can_manage {
        maintenance::find_all(&backend, Some(&status_filter)).await
    } else {
        maintenance::find_by_student(&backend, &user.id).await
    };
    let mut requests = list_or_flash(result, &mut ctx, "Failed to load maintenance requests")?;
    if !status_filter.is_empty() {
        requests.retain(|r| r.status == status_filter);
    }
    requests.sort_by(|a, b| b.created_at.cmp(&a.created_at));

    let page = paginate(requests, query.page(), PER_PAGE);
    let pager = page.pager(&list_href("/maintenance", &[("status", &status_filter)]));

    render(MaintenanceListTemplate {
        can_delete: ctx.permissions.has("maintenance.delete"),
        can_file: ctx.permissions.has("maintenance.own"),
        can_manage,
        ctx,
        requests: page.items,
        pager,
        status_filter,
        statuses: MAINTENANCE_STATUSES.to_vec(),
    })
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "maintenance.own")?;

    let ctx = PageContext::build(&session, &api, &config, "/maintenance").await?;
    let form = MaintenanceForm { urgency: "low".to_string(), ..MaintenanceForm::default() };
    render(MaintenanceFormTemplate { ctx, form, urgencies: URGENCIES.to_vec(), errors: vec![] })
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<MaintenanceForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "maintenance.own")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match maintenance::create(&session::backend(&api, &session), &input).await {
            Ok(()) => {
                log::info!("Maintenance request '{}' filed", input.title);
                set_flash(&session, "Maintenance request submitted");
                return Ok(redirect("/maintenance"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to submit request")],
        },
        Err(errors) => errors,
    };

    let ctx = PageContext::build(&session, &api, &config, "/maintenance").await?;
    render(MaintenanceFormTemplate { ctx, form, urgencies: URGENCIES.to_vec(), errors })
}

pub async fn update_status(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<StatusForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "maintenance.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    if !is_valid_status(&form.status) {
        set_flash(&session, "Invalid status");
        return Ok(redirect("/maintenance"));
    }

    match maintenance::update_status(&session::backend(&api, &session), &id, &form.status).await {
        Ok(()) => {
            log::info!("Maintenance request {id} is now {}", form.status);
            set_flash(&session, "Status updated");
        }
        Err(e) => write_failed(&session, e, "Failed to update status")?,
    }
    Ok(redirect("/maintenance"))
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "maintenance.delete")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match maintenance::delete(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Maintenance request {id} deleted");
            set_flash(&session, "Request deleted");
        }
        Err(e) => write_failed(&session, e, "Failed to delete request")?,
    }
    Ok(redirect("/maintenance"))
}
