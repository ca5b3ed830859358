use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Datelike, Local};
use serde::Deserialize;

use crate::api::{ApiClient, Backend};
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{list_or_flash, write_failed};
use crate::models::room;
use crate::models::task::calendar::{WEEKDAY_HEADERS, build_month, parse_month};
use crate::models::task::{self, TASK_TYPES, Task, TaskForm};
use crate::templates_structs::{PageContext, TaskCalendarTemplate, TaskFormTemplate};

#[derive(Deserialize)]
pub struct CalendarQuery {
    month: Option<String>,
}

pub async fn calendar(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<CalendarQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "tasks.view")?;

    let now = Local::now().naive_local();
    let today = now.date();
    let month = query
        .month
        .as_deref()
        .and_then(parse_month)
        .or_else(|| today.with_day(1))
        .unwrap_or(today);

    let mut ctx = PageContext::build(&session, &api, &config, "/tasks").await?;
    let backend = session::backend(&api, &session);
    let tasks = list_or_flash(task::find_all(&backend).await, &mut ctx, "Failed to load tasks")?;

    let calendar = build_month(month, &tasks, today, now);
    let mut rows: Vec<(Task, _)> = tasks
        .into_iter()
        .filter(|t| {
            t.due()
                .is_some_and(|d| d.year() == month.year() && d.month() == month.month())
        })
        .map(|t| {
            let kind = t.kind(now);
            (t, kind)
        })
        .collect();
    rows.sort_by_key(|(t, _)| t.due());

    render(TaskCalendarTemplate {
        can_manage: ctx.permissions.has("tasks.manage"),
        ctx,
        calendar,
        weekdays: WEEKDAY_HEADERS.to_vec(),
        rows,
    })
}

async fn form_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    form_action: String,
    form_title: &str,
    form: TaskForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, api, config, "/tasks").await?;
    let rooms = room::find_all(&session::backend(api, session)).await.unwrap_or_default();
    render(TaskFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        form,
        rooms,
        types: TASK_TYPES.to_vec(),
        errors,
    })
}

/// The task with `id`, unless it is a holiday (holidays are read-only).
async fn find_editable(backend: &Backend, session: &Session, id: &str) -> Result<Option<Task>, AppError> {
    let Some(found) = task::find_all(backend).await?.into_iter().find(|t| t.id == id) else {
        return Err(AppError::NotFound);
    };
    if found.is_holiday() {
        set_flash(session, "Holidays cannot be changed");
        return Ok(None);
    }
    Ok(Some(found))
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "tasks.manage")?;
    form_page(&api, &config, &session, "/tasks".into(), "Add Task", TaskForm::new_task(), vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<TaskForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "tasks.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match task::create(&session::backend(&api, &session), &input).await {
            Ok(()) => {
                log::info!("Task '{}' created", input.title);
                set_flash(&session, "Task added successfully");
                return Ok(redirect("/tasks"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save task")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, "/tasks".into(), "Add Task", form, errors).await
}

pub async fn edit_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "tasks.manage")?;

    let id = path.into_inner();
    let Some(existing) = find_editable(&session::backend(&api, &session), &session, &id).await? else {
        return Ok(redirect("/tasks"));
    };
    let form = TaskForm::from_task(&existing);
    form_page(&api, &config, &session, format!("/tasks/{id}"), "Edit Task", form, vec![]).await
}

pub async fn update(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<TaskForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "tasks.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let backend = session::backend(&api, &session);
    if find_editable(&backend, &session, &id).await?.is_none() {
        return Ok(redirect("/tasks"));
    }

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match task::update(&backend, &id, &input).await {
            Ok(()) => {
                log::info!("Task {id} updated");
                set_flash(&session, "Task updated successfully");
                return Ok(redirect("/tasks"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save task")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, format!("/tasks/{id}"), "Edit Task", form, errors).await
}

pub async fn complete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "tasks.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let backend = session::backend(&api, &session);
    let Some(existing) = find_editable(&backend, &session, &id).await? else {
        return Ok(redirect("/tasks"));
    };

    match task::update(&backend, &id, &existing.completed_input()).await {
        Ok(()) => {
            log::info!("Task {id} completed");
            set_flash(&session, "Task marked as completed");
        }
        Err(e) => write_failed(&session, e, "Failed to update task")?,
    }
    Ok(redirect("/tasks"))
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "tasks.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let backend = session::backend(&api, &session);
    if find_editable(&backend, &session, &id).await?.is_none() {
        return Ok(redirect("/tasks"));
    }

    match task::delete(&backend, &id).await {
        Ok(()) => {
            log::info!("Task {id} deleted");
            set_flash(&session, "Task deleted successfully");
        }
        Err(e) => write_failed(&session, e, "Failed to delete task")?,
    }
    Ok(redirect("/tasks"))
}
