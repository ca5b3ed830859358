use askama::Template;

use crate::models::maintenance::{MaintenanceForm, MaintenanceRequest};
use crate::models::pagination::Pager;
use super::PageContext;

#[derive(Template)]
#[template(path = "maintenance/list.html")]
pub struct MaintenanceListTemplate {
    pub ctx: PageContext,
    pub requests: Vec<MaintenanceRequest>,
    pub pager: Pager,
    pub status_filter: String,
    pub statuses: Vec<&'static str>,
    pub can_manage: bool,
    pub can_delete: bool,
    pub can_file: bool,
}

#[derive(Template)]
#[template(path = "maintenance/form.html")]
pub struct MaintenanceFormTemplate {
    pub ctx: PageContext,
    pub form: MaintenanceForm,
    pub urgencies: Vec<&'static str>,
    pub errors: Vec<String>,
}
