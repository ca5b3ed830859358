use actix_session::Session;
use actix_web::http::header;
use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;

use crate::api::ApiClient;
use crate::auth::session::{self, require_permission};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::handlers::{list_href, list_or_flash};
use crate::models::pagination::paginate;
use crate::models::system_log::{self, LogFilter, SystemLog, to_csv};
use crate::templates_structs::{LogListTemplate, PageContext};

const PER_PAGE: usize = 20;

#[derive(Debug, Default, Deserialize)]
pub struct LogQuery {
    #[serde(default)]
    action: String,
    #[serde(default)]
    start_date: String,
    #[serde(default)]
    end_date: String,
    #[serde(default)]
    q: String,
    page: Option<usize>,
}

impl LogQuery {
    fn filter(&self) -> LogFilter {
        LogFilter {
            action: self.action.trim().to_string(),
            start_date: self.start_date.trim().to_string(),
            end_date: self.end_date.trim().to_string(),
        }
    }

    fn params(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("action", self.action.trim()),
            ("start_date", self.start_date.trim()),
            ("end_date", self.end_date.trim()),
            ("q", self.q.trim()),
        ]
    }
}

fn search(logs: Vec<SystemLog>, q: &str) -> Vec<SystemLog> {
    logs.into_iter().filter(|l| l.matches(q)).collect()
}

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "logs.view")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/logs").await?;
    let filter = query.filter();
    let backend = session::backend(&api, &session);
    let logs = list_or_flash(system_log::find_filtered(&backend, &filter).await, &mut ctx, "Failed to load logs")?;
    let logs = search(logs, query.q.trim());

    let params = query.params();
    let page = paginate(logs, query.page.unwrap_or(1), PER_PAGE);
    let pager = page.pager(&list_href("/logs", &params));

    render(LogListTemplate {
        ctx,
        logs: page.items,
        pager,
        filter,
        search: query.q.trim().to_string(),
        export_href: list_href("/logs/export", &params),
    })
}

/// The filtered log as a CSV download.
pub async fn export(
    api: web::Data<ApiClient>,
    session: Session,
    query: web::Query<LogQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "logs.view")?;

    let backend = session::backend(&api, &session);
    let logs = system_log::find_filtered(&backend, &query.filter()).await?;
    let logs = search(logs, query.q.trim());
    log::info!("Exporting {} log entries", logs.len());

    let filename = format!("system-logs-{}.csv", Utc::now().format("%Y-%m-%d"));
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(to_csv(&logs)))
}
