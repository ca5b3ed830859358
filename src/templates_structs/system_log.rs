use askama::Template;

use crate::models::pagination::Pager;
use crate::models::system_log::{LogFilter, SystemLog};
use super::PageContext;

#[derive(Template)]
#[template(path = "logs/list.html")]
pub struct LogListTemplate {
    pub ctx: PageContext,
    pub logs: Vec<SystemLog>,
    pub pager: Pager,
    pub filter: LogFilter,
    pub search: String,
    pub export_href: String,
}
