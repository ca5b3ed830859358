use askama::Template;

use crate::models::dashboard::{DashboardStats, StudentOverview};
use super::PageContext;

#[derive(Template)]
#[template(path = "dashboard/admin.html")]
pub struct AdminDashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub today: String,
    pub stats: DashboardStats,
}

#[derive(Template)]
#[template(path = "dashboard/student.html")]
pub struct StudentDashboardTemplate {
    pub ctx: PageContext,
    pub greeting: String,
    pub room_number: String,
    pub overview: StudentOverview,
}
