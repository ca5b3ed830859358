use askama::Template;

use crate::models::announcement::{Announcement, AnnouncementForm};
use super::PageContext;

#[derive(Template)]
#[template(path = "announcements/list.html")]
pub struct AnnouncementListTemplate {
    pub ctx: PageContext,
    pub announcements: Vec<Announcement>,
    pub can_manage: bool,
    pub form: AnnouncementForm,
    pub priorities: Vec<&'static str>,
    pub errors: Vec<String>,
}
