use askama::Template;

use crate::models::account::SessionUser;
use crate::models::attendance::{AttendanceLog, AttendanceStats};
use crate::models::pagination::Pager;
use super::PageContext;

#[derive(Template)]
#[template(path = "attendance/list.html")]
pub struct AttendanceListTemplate {
    pub ctx: PageContext,
    pub logs: Vec<AttendanceLog>,
    pub pager: Pager,
    pub stats: AttendanceStats,
    pub date: String,
    pub date_display: String,
}

/// Result panel shown after a scan.
pub struct ScanNotice {
    pub title: String,
    pub message: String,
    pub is_error: bool,
}

#[derive(Template)]
#[template(path = "attendance/scan.html")]
pub struct ScanTemplate {
    pub ctx: PageContext,
    pub notice: Option<ScanNotice>,
}

#[derive(Template)]
#[template(path = "attendance/my_id.html")]
pub struct MyIdTemplate {
    pub ctx: PageContext,
    pub user: SessionUser,
    pub qr_svg: String,
    pub history: Vec<AttendanceLog>,
}
