use askama::Template;

use crate::models::room::Room;
use crate::models::task::calendar::MonthCalendar;
use crate::models::task::{Task, TaskForm, TaskKind};
use super::PageContext;

#[derive(Template)]
#[template(path = "tasks/calendar.html")]
pub struct TaskCalendarTemplate {
    pub ctx: PageContext,
    pub calendar: MonthCalendar,
    pub weekdays: Vec<&'static str>,
    pub rows: Vec<(Task, TaskKind)>,
    pub can_manage: bool,
}

#[derive(Template)]
#[template(path = "tasks/form.html")]
pub struct TaskFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: TaskForm,
    pub rooms: Vec<Room>,
    pub types: Vec<&'static str>,
    pub errors: Vec<String>,
}
