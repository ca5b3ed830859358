use serde::{Deserialize, Serialize};

use crate::models::common::{StudentRef, format_date, format_time, id_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
    Excused,
}

impl AttendanceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "present",
            AttendanceStatus::Absent => "absent",
            AttendanceStatus::Late => "late",
            AttendanceStatus::Excused => "excused",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AttendanceStatus::Present => "Present",
            AttendanceStatus::Absent => "Absent",
            AttendanceStatus::Late => "Late",
            AttendanceStatus::Excused => "Excused",
        }
    }
}

/// One student's attendance for one calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceLog {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    /// `None` when the student document was deleted and could not be populated.
    #[serde(default)]
    pub student: Option<StudentRef>,
    #[serde(default)]
    pub date: String,
    #[serde(default, rename = "timeIn", alias = "check_in")]
    pub time_in: Option<String>,
    #[serde(default, rename = "timeOut", alias = "check_out")]
    pub time_out: Option<String>,
    pub status: AttendanceStatus,
}

impl AttendanceLog {
    pub fn student_id(&self) -> Option<&str> {
        self.student.as_ref().map(StudentRef::id)
    }

    pub fn student_name(&self) -> Option<&str> {
        self.student.as_ref().and_then(StudentRef::name)
    }

    pub fn student_display(&self) -> String {
        self.student_name().unwrap_or("Unknown").to_string()
    }

    pub fn student_room(&self) -> String {
        self.student
            .as_ref()
            .map(StudentRef::room_number)
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn has_time_in(&self) -> bool {
        self.time_in.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn has_time_out(&self) -> bool {
        self.time_out.as_deref().is_some_and(|t| !t.is_empty())
    }

    pub fn date_display(&self) -> String {
        format_date(&self.date)
    }

    pub fn time_in_display(&self) -> String {
        format_time(self.time_in.as_deref()).unwrap_or_else(|| "-".to_string())
    }

    pub fn time_out_display(&self) -> String {
        format_time(self.time_out.as_deref()).unwrap_or_else(|| "-".to_string())
    }
}

/// Body of a check-in (`POST`, or `PUT` over an existing record without `timeIn`).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub student: String,
    pub date: String,
    pub status: AttendanceStatus,
    pub time_in: String,
}

/// Body of a check-out. `timeIn` is never sent, so the server keeps it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOut {
    pub student: String,
    pub date: String,
    pub time_out: String,
}

/// Per-day counters shown above the attendance table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttendanceStats {
    pub total: usize,
    pub present: usize,
    pub late: usize,
    pub absent: usize,
}

impl AttendanceStats {
    pub fn from_logs(logs: &[AttendanceLog]) -> Self {
        let count = |s: AttendanceStatus| logs.iter().filter(|l| l.status == s).count();
        Self {
            total: logs.len(),
            present: count(AttendanceStatus::Present),
            late: count(AttendanceStatus::Late),
            absent: count(AttendanceStatus::Absent),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orphaned_student_does_not_break_the_day() {
        let logs: Vec<AttendanceLog> = serde_json::from_str(
            r#"[
                {"_id":"a","student":null,"date":"2026-10-18","status":"absent"},
                {"_id":"b","date":"2026-10-18","status":"absent"},
                {"_id":"c","student":"S100","date":"2026-10-18","status":"present",
                 "timeIn":"2026-10-18T08:00:00.000Z"}
            ]"#,
        )
        .unwrap();

        assert_eq!(logs.len(), 3);
        assert_eq!(logs[0].student_id(), None);
        assert_eq!(logs[0].student_display(), "Unknown");
        assert_eq!(logs[0].student_room(), "N/A");
        assert_eq!(logs[1].student_id(), None);
        assert_eq!(logs[2].student_id(), Some("S100"));
        assert_eq!(AttendanceStats::from_logs(&logs).absent, 2);
    }
}
