use std::net::{IpAddr, Ipv4Addr};

use actix_session::Session;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;

use crate::api::ApiClient;
use crate::auth::session::{self, set_flash};
use crate::auth::{csrf, rate_limit::RateLimiter, validate};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::models::account::{
    self, EmailForm, GoogleForm, LoginForm, OtpForm, RegisterForm, ResetPasswordForm,
};
use crate::templates_structs::{
    ForgotPasswordTemplate, LoginTemplate, PublicContext, RegisterTemplate, ResetPasswordTemplate,
    VerifyOtpTemplate,
};

const OTP_EMAIL_KEY: &str = "otp_email";
const RESET_EMAIL_KEY: &str = "reset_email";

const PENDING_APPROVAL: &str = "Account is pending approval. Please wait for admin confirmation.";

#[derive(Deserialize)]
pub struct CsrfOnly {
    pub csrf_token: String,
}

#[derive(Deserialize)]
pub struct LoginQuery {
    expired: Option<String>,
    rejected: Option<String>,
}

fn client_ip(req: &HttpRequest) -> IpAddr {
    req.peer_addr()
        .map(|addr| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED))
}

fn login_template(
    session: &Session,
    config: &AppConfig,
    error: Option<String>,
    email: &str,
) -> LoginTemplate {
    LoginTemplate {
        page: PublicContext::build(session, config),
        error,
        email: email.to_string(),
        google_client_id: config.google_client_id.clone(),
    }
}

pub async fn login_page(
    session: Session,
    config: web::Data<AppConfig>,
    query: web::Query<LoginQuery>,
) -> Result<HttpResponse, AppError> {
    if query.expired.is_some() {
        session.purge();
        set_flash(&session, "Your session has expired. Please sign in again.");
    } else if query.rejected.is_some() {
        session.purge();
        set_flash(&session, "Your account has been rejected.");
    } else if session::is_signed_in(&session) {
        return Ok(redirect("/dashboard"));
    }

    render(login_template(&session, &config, None, ""))
}

pub async fn login_submit(
    req: HttpRequest,
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<LoginForm>,
    limiter: web::Data<RateLimiter>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    // Rate-limit check before contacting the backend
    let ip = client_ip(&req);
    if limiter.is_blocked(ip) {
        log::warn!("Login blocked for {ip}: too many failed attempts");
        let error = "Too many failed login attempts. Please try again later.".to_string();
        return render(login_template(&session, &config, Some(error), &form.email));
    }

    let backend = api.backend(None);
    let error = match account::login(&backend, form.email.trim(), &form.password).await {
        Ok(resp) => match resp.token {
            Some(token) => {
                limiter.clear(ip);
                session::sign_in(&session, &token, &resp.user)?;
                log::info!("User {} signed in", resp.user.email);
                return Ok(redirect("/dashboard"));
            }
            None => "Invalid credentials".to_string(),
        },
        Err(e) if e.is_pending_approval() => PENDING_APPROVAL.to_string(),
        Err(e) => {
            if e.status().is_some() {
                limiter.record_failure(ip);
            }
            e.user_message("Invalid credentials")
        }
    };

    render(login_template(&session, &config, Some(error), &form.email))
}

pub async fn google_submit(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<GoogleForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if form.credential.trim().is_empty() {
        set_flash(&session, "Google login failed.");
        return Ok(redirect("/login"));
    }

    match account::google_login(&api.backend(None), &form.credential).await {
        Ok(resp) if resp.user.status == "pending" => {
            set_flash(&session, "Registration successful. Please wait for admin approval.");
            Ok(redirect("/login"))
        }
        Ok(resp) => match resp.token {
            Some(token) => {
                session::sign_in(&session, &token, &resp.user)?;
                log::info!("User {} signed in with Google", resp.user.email);
                Ok(redirect("/dashboard"))
            }
            None => {
                set_flash(&session, "Google login failed.");
                Ok(redirect("/login"))
            }
        },
        Err(e) => {
            let message = if e.is_pending_approval() { PENDING_APPROVAL } else { "Google login failed." };
            set_flash(&session, message);
            Ok(redirect("/login"))
        }
    }
}

pub async fn register_page(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    render(RegisterTemplate {
        page: PublicContext::build(&session, &config),
        errors: vec![],
        form: RegisterForm::default(),
    })
}

pub async fn register_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<RegisterForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    let form = form.into_inner();

    let mut errors = form.errors();
    if errors.is_empty() {
        match account::register(&api.backend(None), &form.to_request()).await {
            Ok(()) => {
                let email = form.email.trim().to_string();
                let _ = session.insert(OTP_EMAIL_KEY, &email);
                set_flash(&session, format!("We sent a verification code to {email}."));
                return Ok(redirect("/verify-otp"));
            }
            Err(e) => errors.push(e.user_message("Registration failed")),
        }
    }

    render(RegisterTemplate {
        page: PublicContext::build(&session, &config),
        errors,
        form: RegisterForm { password: String::new(), confirm_password: String::new(), ..form },
    })
}

pub async fn verify_otp_page(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let email = session.get::<String>(OTP_EMAIL_KEY).unwrap_or(None).unwrap_or_default();
    render(VerifyOtpTemplate {
        page: PublicContext::build(&session, &config),
        error: None,
        email,
    })
}

pub async fn verify_otp_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<OtpForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let error = match validate::validate_email(&form.email).or_else(|| validate::validate_otp(&form.otp)) {
        Some(e) => e,
        None => match account::verify_otp(&api.backend(None), form.email.trim(), form.otp.trim()).await {
            Ok(()) => {
                session.remove(OTP_EMAIL_KEY);
                set_flash(&session, "Account created. Please wait for admin approval.");
                return Ok(redirect("/login"));
            }
            Err(e) => e.user_message("Verification failed"),
        },
    };

    render(VerifyOtpTemplate {
        page: PublicContext::build(&session, &config),
        error: Some(error),
        email: form.email.clone(),
    })
}

pub async fn resend_otp(
    api: web::Data<ApiClient>,
    session: Session,
    form: web::Form<EmailForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    if let Some(e) = validate::validate_email(&form.email) {
        set_flash(&session, e);
        return Ok(redirect("/verify-otp"));
    }
    let email = form.email.trim().to_string();
    match account::resend_otp(&api.backend(None), &email).await {
        Ok(()) => {
            let _ = session.insert(OTP_EMAIL_KEY, &email);
            set_flash(&session, format!("A new code has been sent to {email}."));
        }
        Err(e) => set_flash(&session, e.user_message("Could not resend the code")),
    }
    Ok(redirect("/verify-otp"))
}

pub async fn forgot_password_page(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    render(ForgotPasswordTemplate {
        page: PublicContext::build(&session, &config),
        error: None,
        email: String::new(),
    })
}

pub async fn forgot_password_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<EmailForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let error = match validate::validate_email(&form.email) {
        Some(e) => e,
        None => {
            let email = form.email.trim().to_string();
            match account::forgot_password(&api.backend(None), &email).await {
                Ok(()) => {
                    let _ = session.insert(RESET_EMAIL_KEY, &email);
                    set_flash(&session, "If the address is registered, a reset code has been sent.");
                    return Ok(redirect("/reset-password"));
                }
                Err(e) => e.user_message("Could not send a reset code"),
            }
        }
    };

    render(ForgotPasswordTemplate {
        page: PublicContext::build(&session, &config),
        error: Some(error),
        email: form.email.clone(),
    })
}

pub async fn reset_password_page(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    let email = session.get::<String>(RESET_EMAIL_KEY).unwrap_or(None).unwrap_or_default();
    render(ResetPasswordTemplate {
        page: PublicContext::build(&session, &config),
        errors: vec![],
        email,
    })
}

pub async fn reset_password_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<ResetPasswordForm>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let mut errors = form.errors();
    if errors.is_empty() {
        let result = account::reset_password(
            &api.backend(None),
            form.email.trim(),
            form.otp.trim(),
            &form.password,
        )
        .await;
        match result {
            Ok(()) => {
                session.remove(RESET_EMAIL_KEY);
                set_flash(&session, "Password updated. Please sign in.");
                return Ok(redirect("/login"));
            }
            Err(e) => errors.push(e.user_message("Password reset failed")),
        }
    }

    render(ResetPasswordTemplate {
        page: PublicContext::build(&session, &config),
        errors,
        email: form.email.clone(),
    })
}

pub async fn logout(
    session: Session,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    csrf::validate_csrf(&session, &form.csrf_token)?;
    session.purge();
    Ok(redirect("/login"))
}
