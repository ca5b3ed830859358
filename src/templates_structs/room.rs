use askama::Template;

use crate::models::room::{Room, RoomForm};
use super::PageContext;

#[derive(Template)]
#[template(path = "rooms/list.html")]
pub struct RoomListTemplate {
    pub ctx: PageContext,
    pub rooms: Vec<Room>,
    pub search: String,
}

#[derive(Template)]
#[template(path = "rooms/form.html")]
pub struct RoomFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: RoomForm,
    pub statuses: Vec<&'static str>,
    pub errors: Vec<String>,
}
