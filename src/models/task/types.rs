use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::common::{capitalize, id_string};

pub const TASK_TYPES: [&str; 4] = ["cleaning", "maintenance", "inspection", "other"];

fn default_type() -> String {
    "cleaning".to_string()
}

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default = "default_type", rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub area: String,
    #[serde(default, rename = "assignedRoom", alias = "assigned_room")]
    pub assigned_room: String,
    #[serde(default, rename = "dueDate", alias = "due_date")]
    pub due_date: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, rename = "isHoliday", alias = "is_holiday")]
    pub is_holiday: bool,
}

/// How a task is drawn on the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Holiday,
    Completed,
    Overdue,
    Upcoming,
}

impl TaskKind {
    pub fn css_class(&self) -> &'static str {
        match self {
            TaskKind::Holiday => "event-holiday",
            TaskKind::Completed => "event-completed",
            TaskKind::Overdue => "event-overdue",
            TaskKind::Upcoming => "event-upcoming",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Holiday => "Holiday",
            TaskKind::Completed => "Completed",
            TaskKind::Overdue => "Overdue",
            TaskKind::Upcoming => "Upcoming",
        }
    }
}

/// Parse a due date: RFC 3339, a `datetime-local` value, or a bare date.
pub fn parse_due(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw.get(..10)?, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

impl Task {
    pub fn due(&self) -> Option<NaiveDateTime> {
        parse_due(&self.due_date)
    }

    pub fn is_holiday(&self) -> bool {
        self.is_holiday || self.task_type == "holiday"
    }

    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn kind(&self, now: NaiveDateTime) -> TaskKind {
        if self.is_holiday() {
            TaskKind::Holiday
        } else if self.is_completed() {
            TaskKind::Completed
        } else if self.due().is_some_and(|due| due < now) {
            TaskKind::Overdue
        } else {
            TaskKind::Upcoming
        }
    }

    /// Calendar label: holidays show their title, tasks add the room.
    pub fn event_title(&self) -> String {
        if self.is_holiday() {
            return self.title.clone();
        }
        let room = if self.assigned_room.is_empty() { "Unassigned" } else { &self.assigned_room };
        format!("{} (Room {room})", self.title)
    }

    pub fn type_label(&self) -> String {
        capitalize(&self.task_type)
    }

    pub fn due_display(&self) -> String {
        self.due()
            .map(|d| d.format("%b %d, %Y %I:%M %p").to_string())
            .unwrap_or_else(|| self.due_date.clone())
    }

    /// Value for a `datetime-local` input.
    pub fn due_input(&self) -> String {
        self.due()
            .map(|d| d.format("%Y-%m-%dT%H:%M").to_string())
            .unwrap_or_default()
    }

    pub fn notes_display(&self) -> String {
        self.notes.clone().filter(|n| !n.is_empty()).unwrap_or_else(|| "None".to_string())
    }

    /// The same task with its status set to completed.
    pub fn completed_input(&self) -> TaskInput {
        TaskInput {
            title: self.title.clone(),
            task_type: self.task_type.clone(),
            area: self.area.clone(),
            assigned_room: self.assigned_room.clone(),
            due_date: self.due_date.clone(),
            status: "completed".to_string(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

/// Body of `POST /api/tasks` and `PUT /api/tasks/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskInput {
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: String,
    pub area: String,
    pub assigned_room: String,
    pub due_date: String,
    pub status: String,
    pub notes: String,
}

pub const TASK_STATUSES: [&str; 2] = ["pending", "completed"];

/// Task editor form. `due_date` comes from a `datetime-local` input.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskForm {
    pub title: String,
    #[serde(rename = "type")]
    pub task_type: String,
    #[serde(default)]
    pub area: String,
    pub assigned_room: String,
    pub due_date: String,
    pub status: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl TaskForm {
    pub fn new_task() -> Self {
        Self {
            task_type: default_type(),
            status: default_status(),
            ..Self::default()
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            title: task.title.clone(),
            task_type: task.task_type.clone(),
            area: task.area.clone(),
            assigned_room: task.assigned_room.clone(),
            due_date: task.due_input(),
            status: task.status.clone(),
            notes: task.notes.clone().unwrap_or_default(),
            csrf_token: String::new(),
        }
    }

    pub fn validate(&self) -> Result<TaskInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.title, "Title", 200));
        errors.extend(validate::validate_required(&self.assigned_room, "Assigned room", 20));
        if self.due_date.trim().is_empty() {
            errors.push("Due date is required".to_string());
        } else if parse_due(self.due_date.trim()).is_none() {
            errors.push("Due date must be a valid date".to_string());
        }
        errors.extend(validate::validate_choice(&self.task_type, "Type", &TASK_TYPES));
        errors.extend(validate::validate_choice(&self.status, "Status", &TASK_STATUSES));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(TaskInput {
            title: self.title.trim().to_string(),
            task_type: self.task_type.clone(),
            area: self.area.trim().to_string(),
            assigned_room: self.assigned_room.trim().to_string(),
            due_date: self.due_date.trim().to_string(),
            status: self.status.clone(),
            notes: self.notes.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(status: &str, due: &str) -> Task {
        Task {
            id: "t1".into(),
            title: "Inspection".into(),
            task_type: default_type(),
            area: "Hall".into(),
            assigned_room: "101".into(),
            due_date: due.into(),
            status: status.into(),
            notes: None,
            is_holiday: false,
        }
    }

    fn at(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M").unwrap()
    }

    #[test]
    fn classifies_tasks() {
        let now = at("2026-10-18T12:00");
        assert_eq!(task("pending", "2026-10-17T09:00").kind(now), TaskKind::Overdue);
        assert_eq!(task("pending", "2026-10-19T09:00").kind(now), TaskKind::Upcoming);
        assert_eq!(task("completed", "2026-10-17T09:00").kind(now), TaskKind::Completed);

        let mut holiday = task("pending", "2026-10-17");
        holiday.is_holiday = true;
        assert_eq!(holiday.kind(now), TaskKind::Holiday);
        assert_eq!(holiday.event_title(), "Inspection");
    }

    #[test]
    fn parses_datetime_local_values() {
        let t = task("pending", "2026-10-19T09:30");
        assert_eq!(t.due_input(), "2026-10-19T09:30");
        assert_eq!(t.event_title(), "Inspection (Room 101)");
        assert_eq!(parse_due("2026-10-19").map(|d| d.date()), NaiveDate::from_ymd_opt(2026, 10, 19));
        assert_eq!(parse_due("later"), None);
    }

    #[test]
    fn completing_keeps_other_fields() {
        let input = task("pending", "2026-10-19T09:30").completed_input();
        assert_eq!(input.status, "completed");
        assert_eq!(input.assigned_room, "101");
        let json = serde_json::to_value(&input).unwrap();
        assert_eq!(json["assignedRoom"], "101");
        assert_eq!(json["type"], "cleaning");
    }

    #[test]
    fn task_form_requires_room_and_due_date() {
        let form = TaskForm { title: "Inspection".into(), ..TaskForm::new_task() };
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Assigned room is required".to_string(), "Due date is required".to_string()]
        );
        let ok = TaskForm {
            assigned_room: "204".into(),
            due_date: "2026-10-20T09:30".into(),
            ..form
        };
        assert_eq!(ok.validate().unwrap().due_date, "2026-10-20T09:30");
    }
}
