use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Local, Timelike, Utc};

use crate::api::ApiClient;
use crate::auth::session::{self, require_permission};
use crate::config::AppConfig;
use crate::errors::{AppError, render};
use crate::models::dashboard::{DashboardStats, StudentOverview, time_greeting};
use crate::templates_structs::{AdminDashboardTemplate, PageContext, StudentDashboardTemplate};

pub async fn index(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "dashboard.view")?;

    let user = session::require_user(&session)?;
    let ctx = PageContext::build(&session, &api, &config, "/dashboard").await?;
    let greeting = time_greeting(Local::now().hour(), &ctx.username);
    let backend = session::backend(&api, &session);

    if user.role == "student" {
        let room_number = user.room_number();
        let overview = StudentOverview::load(&backend, &room_number).await;
        return render(StudentDashboardTemplate { ctx, greeting, room_number, overview });
    }

    let today = Utc::now().date_naive();
    let stats = DashboardStats::load(
        &backend,
        today,
        ctx.permissions.has("approvals.manage"),
        ctx.permissions.has("payments.manage"),
    )
    .await;

    render(AdminDashboardTemplate {
        ctx,
        greeting,
        today: Local::now().format("%A, %B %d, %Y").to_string(),
        stats,
    })
}
