use chrono::{Local, NaiveDate, NaiveDateTime};

use crate::api::{ApiError, Backend};
use crate::models::announcement::{self, Announcement};
use crate::models::payment::{self, Payment};
use crate::models::task::{self, Task, TaskKind};
use crate::models::{attendance, maintenance, room, user};

/// Greeting for the hour of day, e.g. "Good morning, Jane".
pub fn time_greeting(hour: u32, name: &str) -> String {
    let period = match hour {
        5..=11 => "Good morning",
        12..=16 => "Good afternoon",
        _ => "Good evening",
    };
    let first = name.split_whitespace().next().unwrap_or(name);
    format!("{period}, {first}")
}

/// Counters for the staff and administrator dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DashboardStats {
    pub total_rooms: usize,
    pub available_rooms: usize,
    pub students: usize,
    pub pending_approvals: usize,
    pub awaiting_verification: usize,
    pub overdue_payments: usize,
    pub open_maintenance: usize,
    pub present_today: usize,
    pub show_approvals: bool,
    pub show_payments: bool,
}

fn count_or_zero<T>(source: &str, result: Result<Vec<T>, ApiError>, f: impl Fn(&[T]) -> usize) -> usize {
    match result {
        Ok(items) => f(&items),
        Err(e) => {
            log::warn!("Dashboard: {source} unavailable: {e}");
            0
        }
    }
}

impl DashboardStats {
    /// Fetch every source concurrently. A source that fails counts as zero.
    pub async fn load(api: &Backend, today: NaiveDate, show_approvals: bool, show_payments: bool) -> Self {
        let (rooms, students, pending, payments, tickets, logs) = tokio::join!(
            room::find_all(api),
            user::find_students(api),
            async {
                if show_approvals { user::find_pending(api).await } else { Ok(Vec::new()) }
            },
            async {
                if show_payments { payment::find_all(api).await } else { Ok(Vec::new()) }
            },
            maintenance::find_all(api, None),
            attendance::find_by_date(api, today),
        );

        Self {
            total_rooms: count_or_zero("rooms", rooms.clone(), |r| r.len()),
            available_rooms: count_or_zero("rooms", rooms, |r| {
                r.iter().filter(|room| room.status == "Available").count()
            }),
            students: count_or_zero("students", students, |s| s.len()),
            pending_approvals: count_or_zero("approvals", pending, |p| p.len()),
            awaiting_verification: count_or_zero("payments", payments.clone(), |p| {
                p.iter().filter(|p| p.status == "submitted").count()
            }),
            overdue_payments: count_or_zero("payments", payments, |p| {
                p.iter().filter(|p| p.status == "overdue").count()
            }),
            open_maintenance: count_or_zero("maintenance", tickets, |t| {
                t.iter().filter(|t| t.is_open()).count()
            }),
            present_today: count_or_zero("attendance", logs, |l| {
                l.iter().filter(|log| log.has_time_in()).count()
            }),
            show_approvals,
            show_payments,
        }
    }
}

pub const STUDENT_ANNOUNCEMENTS: usize = 3;
pub const STUDENT_TASKS: usize = 5;

/// What a student sees on their dashboard.
#[derive(Debug, Clone, Default)]
pub struct StudentOverview {
    pub outstanding: Vec<Payment>,
    pub announcements: Vec<Announcement>,
    pub upcoming_tasks: Vec<Task>,
}

impl StudentOverview {
    pub fn outstanding_total(&self) -> String {
        crate::models::common::format_php(self.outstanding.iter().map(|p| p.amount).sum())
    }

    pub async fn load(api: &Backend, room_number: &str) -> Self {
        let (payments, announcements, tasks) = tokio::join!(
            payment::find_mine(api),
            announcement::find_all(api),
            task::find_all(api),
        );
        let now = Local::now().naive_local();

        Self {
            outstanding: payments
                .unwrap_or_default()
                .into_iter()
                .filter(Payment::is_outstanding)
                .collect(),
            announcements: announcements
                .unwrap_or_default()
                .into_iter()
                .take(STUDENT_ANNOUNCEMENTS)
                .collect(),
            upcoming_tasks: upcoming_for_room(tasks.unwrap_or_default(), room_number, now),
        }
    }
}

/// Upcoming tasks for `room_number` (and holidays), soonest first.
pub fn upcoming_for_room(tasks: Vec<Task>, room_number: &str, now: NaiveDateTime) -> Vec<Task> {
    let mut upcoming: Vec<Task> = tasks
        .into_iter()
        .filter(|t| t.kind(now) == TaskKind::Upcoming || t.kind(now) == TaskKind::Holiday)
        .filter(|t| t.due().is_some_and(|d| d >= now))
        .filter(|t| t.is_holiday() || t.assigned_room.eq_ignore_ascii_case(room_number))
        .collect();
    upcoming.sort_by_key(|t| t.due());
    upcoming.truncate(STUDENT_TASKS);
    upcoming
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_follows_the_clock() {
        assert_eq!(time_greeting(8, "Jane Doe"), "Good morning, Jane");
        assert_eq!(time_greeting(13, "Jane Doe"), "Good afternoon, Jane");
        assert_eq!(time_greeting(22, "Jane Doe"), "Good evening, Jane");
        assert_eq!(time_greeting(3, ""), "Good evening, ");
    }

    #[test]
    fn upcoming_tasks_are_filtered_by_room() {
        let tasks: Vec<Task> = serde_json::from_str(
            r#"[
                {"_id":"1","title":"Inspect","assignedRoom":"204","dueDate":"2026-10-20T09:00","status":"pending"},
                {"_id":"2","title":"Clean","assignedRoom":"101","dueDate":"2026-10-20T09:00","status":"pending"},
                {"_id":"3","title":"Old","assignedRoom":"204","dueDate":"2026-10-01T09:00","status":"pending"},
                {"_id":"4","title":"All Saints","type":"holiday","dueDate":"2026-11-01","status":"pending"},
                {"_id":"5","title":"Done","assignedRoom":"204","dueDate":"2026-10-21T09:00","status":"completed"}
            ]"#,
        )
        .unwrap();
        let now = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let ids: Vec<String> = upcoming_for_room(tasks, "204", now).into_iter().map(|t| t.id).collect();
        assert_eq!(ids, vec!["1".to_string(), "4".to_string()]);
    }
}
