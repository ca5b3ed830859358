use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::{ApiClient, Backend};
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{ListQuery, list_href, list_or_flash, write_failed};
use crate::models::pagination::paginate;
use crate::models::{room, user};
use crate::models::user::StudentForm;
use crate::templates_structs::{
    PageContext, StudentFormTemplate, StudentHistoryTemplate, StudentListTemplate,
};

const PER_PAGE: usize = 10;

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.view")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/students").await?;
    let backend = session::backend(&api, &session);
    let all = list_or_flash(user::find_students(&backend).await, &mut ctx, "Failed to load students")?;

    let search = query.search();
    let matching: Vec<_> = all.into_iter().filter(|s| s.matches(&search)).collect();
    let page = paginate(matching, query.page(), PER_PAGE);
    let pager = page.pager(&list_href("/students", &[("q", &search)]));

    render(StudentListTemplate {
        can_manage: ctx.permissions.has("students.manage"),
        ctx,
        students: page.items,
        pager,
        search,
    })
}

async fn form_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    form_action: String,
    form_title: &str,
    form: StudentForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, api, config, "/students").await?;
    let rooms = room::find_all(&session::backend(api, session)).await.unwrap_or_default();
    render(StudentFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        form,
        rooms,
        errors,
    })
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.manage")?;
    let form = StudentForm::new_student();
    form_page(&api, &config, &session, "/students".into(), "Add Student", form, vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<StudentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match user::create_student(&session::backend(&api, &session), &input).await {
            Ok(()) => {
                log::info!("Student {} created", input.student_id);
                set_flash(&session, "Student added successfully");
                return Ok(redirect("/students"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save student")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, "/students".into(), "Add Student", form, errors).await
}

async fn find_student(backend: &Backend, id: &str) -> Result<user::Student, AppError> {
    user::find_students(backend)
        .await?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or(AppError::NotFound)
}

pub async fn edit_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.manage")?;

    let id = path.into_inner();
    let student = find_student(&session::backend(&api, &session), &id).await?;
    let form = StudentForm::from_student(&student);
    form_page(&api, &config, &session, format!("/students/{id}"), "Edit Student", form, vec![]).await
}

pub async fn update(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<StudentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match user::update_student(&session::backend(&api, &session), &id, &input).await {
            Ok(()) => {
                log::info!("Student {id} updated");
                set_flash(&session, "Student updated successfully");
                return Ok(redirect("/students"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save student")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, format!("/students/{id}"), "Edit Student", form, errors).await
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match user::delete_student(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Student {id} deleted");
            set_flash(&session, "Student deleted successfully");
        }
        Err(e) => write_failed(&session, e, "Failed to delete student")?,
    }
    Ok(redirect("/students"))
}

pub async fn history(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "students.view")?;

    let id = path.into_inner();
    let backend = session::backend(&api, &session);
    let history = match user::find_history(&backend, &id).await {
        Ok(h) => h,
        Err(e) if e.is_not_found() => return Err(AppError::NotFound),
        Err(e) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            set_flash(&session, e.user_message("Failed to load student history"));
            return Ok(redirect("/students"));
        }
    };

    let ctx = PageContext::build(&session, &api, &config, "/students").await?;
    render(StudentHistoryTemplate { ctx, history })
}
