use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::ApiClient;
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::models::account::{self, AuthResponse, CompleteProfileForm, ProfileForm};
use crate::templates_structs::{
    CompleteProfileTemplate, PageContext, PendingTemplate, ProfileTemplate,
};

/// Replace the session user with the one the backend returned. The current
/// token is kept unless a new one came back.
fn store_updated_user(session: &Session, resp: &AuthResponse) -> Result<(), AppError> {
    match &resp.token {
        Some(token) => session::sign_in(session, token, &resp.user),
        None => session::set_user(session, &resp.user),
    }
}

pub async fn form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "profile.edit")?;

    let user = session::require_user(&session)?;
    let ctx = PageContext::build(&session, &api, &config, "/profile").await?;
    render(ProfileTemplate {
        ctx,
        form: ProfileForm::from_user(&user),
        user,
        errors: vec![],
    })
}

pub async fn submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<ProfileForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "profile.edit")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let user = session::require_user(&session)?;
    let form = form.into_inner();

    let mut errors = form.errors();
    if errors.is_empty() {
        let backend = session::backend(&api, &session);
        match account::update_profile(&backend, &form.to_update(&user)).await {
            Ok(resp) => {
                store_updated_user(&session, &resp)?;
                log::info!("User {} updated their profile", resp.user.email);
                set_flash(&session, "Profile updated successfully");
                return Ok(redirect("/profile"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => errors.push(e.user_message("Failed to update profile")),
        }
    }

    let ctx = PageContext::build(&session, &api, &config, "/profile").await?;
    render(ProfileTemplate {
        ctx,
        user,
        form: ProfileForm { password: String::new(), confirm_password: String::new(), ..form },
        errors,
    })
}

pub async fn complete_form(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user = session::require_user(&session)?;
    if user.has_student_id() {
        return Ok(redirect("/pending"));
    }

    let ctx = PageContext::minimal(&session, &config)?;
    let form = CompleteProfileForm {
        phone_number: user.phone_number(),
        emergency_contact_name: user.emergency_contact_name(),
        emergency_contact_phone: user.emergency_contact_phone(),
        ..CompleteProfileForm::default()
    };
    render(CompleteProfileTemplate { ctx, form, errors: vec![] })
}

pub async fn complete_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<CompleteProfileForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let mut errors = form.errors();
    if errors.is_empty() {
        let backend = session::backend(&api, &session);
        match account::update_profile(&backend, &form.to_update()).await {
            Ok(resp) => {
                store_updated_user(&session, &resp)?;
                set_flash(&session, "Profile submitted. An administrator will review it shortly.");
                return Ok(redirect("/pending"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => errors.push(e.user_message("Failed to save your profile")),
        }
    }

    let ctx = PageContext::minimal(&session, &config)?;
    render(CompleteProfileTemplate { ctx, form, errors })
}

pub async fn pending(
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    let user = session::require_user(&session)?;
    if !user.is_awaiting_validation() {
        return Ok(redirect("/dashboard"));
    }
    if !user.has_student_id() {
        return Ok(redirect("/profile/complete"));
    }

    let ctx = PageContext::minimal(&session, &config)?;
    render(PendingTemplate { ctx, user })
}
