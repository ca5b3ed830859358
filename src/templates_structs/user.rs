use askama::Template;

use crate::models::pagination::Pager;
use crate::models::room::Room;
use crate::models::user::{Employee, PendingUser, StaffForm, Student, StudentForm, StudentHistory};
use super::PageContext;

#[derive(Template)]
#[template(path = "students/list.html")]
pub struct StudentListTemplate {
    pub ctx: PageContext,
    pub students: Vec<Student>,
    pub pager: Pager,
    pub search: String,
    pub can_manage: bool,
}

#[derive(Template)]
#[template(path = "students/form.html")]
pub struct StudentFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: StudentForm,
    pub rooms: Vec<Room>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "students/history.html")]
pub struct StudentHistoryTemplate {
    pub ctx: PageContext,
    pub history: StudentHistory,
}

#[derive(Template)]
#[template(path = "employees/list.html")]
pub struct EmployeeListTemplate {
    pub ctx: PageContext,
    pub employees: Vec<Employee>,
    pub search: String,
    pub can_change_roles: bool,
    pub roles: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "employees/form.html")]
pub struct EmployeeFormTemplate {
    pub ctx: PageContext,
    pub form: StaffForm,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "approvals/list.html")]
pub struct ApprovalListTemplate {
    pub ctx: PageContext,
    pub pending: Vec<PendingUser>,
}
