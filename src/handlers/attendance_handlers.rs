use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::api::ApiClient;
use crate::attendance::{ScanError, ScanPayload, process_scan};
use crate::auth::csrf;
use crate::auth::session::{self, require_permission};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::handlers::{list_href, list_or_flash};
use crate::models::attendance::{self, AttendanceStats};
use crate::models::pagination::paginate;
use crate::templates_structs::{
    AttendanceListTemplate, MyIdTemplate, PageContext, ScanNotice, ScanTemplate,
};

const PER_PAGE: usize = 10;

#[derive(Deserialize)]
pub struct AttendanceQuery {
    date: Option<String>,
    page: Option<usize>,
}

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<AttendanceQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "attendance.manage")?;

    let date = query
        .date
        .as_deref()
        .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
        .unwrap_or_else(|| Utc::now().date_naive());

    let mut ctx = PageContext::build(&session, &api, &config, "/attendance").await?;
    let backend = session::backend(&api, &session);
    let logs = list_or_flash(attendance::find_by_date(&backend, date).await, &mut ctx, "Failed to load attendance")?;
    let stats = AttendanceStats::from_logs(&logs);

    let date_value = date.format("%Y-%m-%d").to_string();
    let page = paginate(logs, query.page.unwrap_or(1), PER_PAGE);
    let pager = page.pager(&list_href("/attendance", &[("date", &date_value)]));

    render(AttendanceListTemplate {
        ctx,
        logs: page.items,
        pager,
        stats,
        date: date_value,
        date_display: date.format("%B %d, %Y").to_string(),
    })
}

pub async fn scan_page(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "attendance.manage")?;

    let ctx = PageContext::build(&session, &api, &config, "/attendance").await?;
    render(ScanTemplate { ctx, notice: None })
}

#[derive(Deserialize)]
pub struct ScanForm {
    #[serde(default)]
    payload: String,
    csrf_token: String,
}

pub async fn scan_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<ScanForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "attendance.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let backend = session::backend(&api, &session);
    let notice = match process_scan(&backend, &form.payload, Utc::now()).await {
        Ok(outcome) => ScanNotice {
            title: outcome.title().to_string(),
            message: outcome.message(),
            is_error: false,
        },
        Err(ScanError::Api(e)) if e.is_unauthorized() => return Err(e.into()),
        Err(e) => {
            if e.is_local() {
                log::info!("Rejected scan: {e}");
            } else {
                log::warn!("Scan failed: {e}");
            }
            ScanNotice {
                title: "Error".to_string(),
                message: e.message(),
                is_error: true,
            }
        }
    };

    let ctx = PageContext::build(&session, &api, &config, "/attendance").await?;
    render(ScanTemplate { ctx, notice: Some(notice) })
}

pub async fn my_id(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "attendance.own")?;

    let user = session::require_user(&session)?;
    let mut ctx = PageContext::build(&session, &api, &config, "/my-id").await?;

    let qr_svg = ScanPayload::for_student(&user).to_svg().unwrap_or_else(|e| {
        log::error!("Could not render QR code for {}: {e}", user.id);
        String::new()
    });

    let backend = session::backend(&api, &session);
    let mut history = list_or_flash(
        attendance::find_by_student(&backend, &user.id).await,
        &mut ctx,
        "Failed to load attendance history",
    )?;
    history.sort_by(|a, b| b.date.cmp(&a.date));

    render(MyIdTemplate { ctx, user, qr_svg, history })
}
