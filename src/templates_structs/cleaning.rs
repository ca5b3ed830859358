use askama::Template;

use crate::models::cleaning::{CleaningForm, CleaningSchedule};
use crate::models::room::Room;
use super::PageContext;

#[derive(Template)]
#[template(path = "cleaning/list.html")]
pub struct CleaningListTemplate {
    pub ctx: PageContext,
    pub pending: Vec<CleaningSchedule>,
    pub completed: Vec<CleaningSchedule>,
    pub can_manage: bool,
}

#[derive(Template)]
#[template(path = "cleaning/form.html")]
pub struct CleaningFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: CleaningForm,
    pub rooms: Vec<Room>,
    pub errors: Vec<String>,
}
