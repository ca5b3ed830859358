use askama::Template;

use crate::models::notification::Notification;
use super::PageContext;

#[derive(Template)]
#[template(path = "notifications/list.html")]
pub struct NotificationListTemplate {
    pub ctx: PageContext,
    pub notifications: Vec<Notification>,
    pub unread: usize,
}
