use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{ListQuery, list_or_flash, write_failed};
use crate::models::user::{self, EMPLOYEE_ROLES, RejectForm, RoleForm, StaffForm};
use crate::templates_structs::{
    ApprovalListTemplate, EmployeeFormTemplate, EmployeeListTemplate, PageContext,
};

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "staff.manage")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/employees").await?;
    let backend = session::backend(&api, &session);
    let all = list_or_flash(user::find_employees(&backend).await, &mut ctx, "Failed to load employees")?;

    let search = query.search();
    let employees = all.into_iter().filter(|e| e.matches(&search)).collect();
    render(EmployeeListTemplate {
        can_change_roles: ctx.permissions.has("staff.roles"),
        ctx,
        employees,
        search,
        roles: EMPLOYEE_ROLES.to_vec(),
    })
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "staff.manage")?;

    let ctx = PageContext::build(&session, &api, &config, "/employees").await?;
    render(EmployeeFormTemplate { ctx, form: StaffForm::default(), errors: vec![] })
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<StaffForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "staff.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match user::create_employee(&session::backend(&api, &session), &input).await {
            Ok(()) => {
                log::info!("Employee {} created", input.email);
                set_flash(&session, "Employee added successfully");
                return Ok(redirect("/employees"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to add employee")],
        },
        Err(errors) => errors,
    };

    let ctx = PageContext::build(&session, &api, &config, "/employees").await?;
    render(EmployeeFormTemplate {
        ctx,
        form: StaffForm { password: String::new(), ..form },
        errors,
    })
}

pub async fn change_role(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<RoleForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "staff.roles")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    if !EMPLOYEE_ROLES.contains(&form.role.as_str()) {
        set_flash(&session, "Please choose a valid role");
        return Ok(redirect("/employees"));
    }

    match user::update_role(&session::backend(&api, &session), &id, &form.role).await {
        Ok(()) => {
            log::info!("User {id} is now {}", form.role);
            set_flash(&session, "Role updated successfully");
        }
        Err(e) => write_failed(&session, e, "Failed to update role")?,
    }
    Ok(redirect("/employees"))
}

pub async fn approvals(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "approvals.manage")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/approvals").await?;
    let backend = session::backend(&api, &session);
    let pending = list_or_flash(user::find_pending(&backend).await, &mut ctx, "Failed to load pending registrations")?;
    render(ApprovalListTemplate { ctx, pending })
}

pub async fn approve(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "approvals.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match user::approve(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Registration {id} approved");
            set_flash(&session, "Student approved successfully");
        }
        Err(e) => write_failed(&session, e, "Failed to approve student")?,
    }
    Ok(redirect("/approvals"))
}

pub async fn reject(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<RejectForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "approvals.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let reason = form.reason.trim();
    if reason.is_empty() {
        set_flash(&session, "Please provide a reason for rejection");
        return Ok(redirect("/approvals"));
    }

    match user::reject(&session::backend(&api, &session), &id, reason).await {
        Ok(()) => {
            log::info!("Registration {id} rejected");
            set_flash(&session, "Registration rejected");
        }
        Err(e) => write_failed(&session, e, "Failed to reject student")?,
    }
    Ok(redirect("/approvals"))
}
