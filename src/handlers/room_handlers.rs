use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{ListQuery, list_or_flash, write_failed};
use crate::models::room::{self, ROOM_STATUSES, RoomForm};
use crate::templates_structs::{PageContext, RoomFormTemplate, RoomListTemplate};

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "rooms.manage")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/rooms").await?;
    let backend = session::backend(&api, &session);
    let all = list_or_flash(room::find_all(&backend).await, &mut ctx, "Failed to load rooms")?;

    let search = query.search();
    let rooms = room::search(&all, &search).into_iter().cloned().collect();
    render(RoomListTemplate { ctx, rooms, search })
}

async fn form_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    form_action: String,
    form_title: &str,
    form: RoomForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, api, config, "/rooms").await?;
    render(RoomFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        form,
        statuses: ROOM_STATUSES.to_vec(),
        errors,
    })
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "rooms.manage")?;
    form_page(&api, &config, &session, "/rooms".into(), "Add Room", RoomForm::new_room(), vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<RoomForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "rooms.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let backend = session::backend(&api, &session);
    let existing = room::find_all(&backend).await.unwrap_or_default();
    let form = form.into_inner();

    let errors = match form.validate(&existing, None) {
        Ok(input) => match room::create(&backend, &input).await {
            Ok(()) => {
                log::info!("Room {} created", input.room_number);
                set_flash(&session, "Room added successfully");
                return Ok(redirect("/rooms"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save room")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, "/rooms".into(), "Add Room", form, errors).await
}

pub async fn edit_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "rooms.manage")?;

    let id = path.into_inner();
    let rooms = room::find_all(&session::backend(&api, &session)).await?;
    let Some(existing) = rooms.iter().find(|r| r.id == id) else {
        return Err(AppError::NotFound);
    };

    let form = RoomForm::from_room(existing);
    form_page(&api, &config, &session, format!("/rooms/{id}"), "Edit Room", form, vec![]).await
}

pub async fn update(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<RoomForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "rooms.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let backend = session::backend(&api, &session);
    let existing = room::find_all(&backend).await.unwrap_or_default();
    let form = form.into_inner();

    let errors = match form.validate(&existing, Some(&id)) {
        Ok(input) => match room::update(&backend, &id, &input).await {
            Ok(()) => {
                log::info!("Room {id} updated");
                set_flash(&session, "Room updated successfully");
                return Ok(redirect("/rooms"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save room")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, format!("/rooms/{id}"), "Edit Room", form, errors).await
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "rooms.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match room::delete(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Room {id} deleted");
            set_flash(&session, "Room deleted successfully");
        }
        Err(e) => write_failed(&session, e, "Failed to delete room")?,
    }
    Ok(redirect("/rooms"))
}
