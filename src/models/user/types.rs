use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::account::StudentProfile;
use crate::models::attendance::AttendanceStatus;
use crate::models::common::{
    date_input_value, format_date, format_time, id_string, initials, opt_id_string,
};
use crate::models::maintenance::MaintenanceRequest;
use crate::models::payment::Payment;

/// A student account as listed by `/api/students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "studentId", alias = "student_id", deserialize_with = "opt_id_string")]
    pub student_id: Option<String>,
    #[serde(default, rename = "studentProfile", alias = "student_profile")]
    pub student_profile: Option<StudentProfile>,
}

impl Student {
    fn profile(&self) -> StudentProfile {
        self.student_profile.clone().unwrap_or_default()
    }

    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    pub fn student_id_display(&self) -> String {
        self.student_id.clone().unwrap_or_else(|| "-".to_string())
    }

    pub fn room_number(&self) -> String {
        self.profile()
            .room_number
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn room_id(&self) -> String {
        self.profile().room_id.unwrap_or_default()
    }

    pub fn phone_number(&self) -> String {
        self.profile().phone_number.unwrap_or_default()
    }

    pub fn emergency_contact_name(&self) -> String {
        self.profile().emergency_contact_name.unwrap_or_default()
    }

    pub fn emergency_contact_phone(&self) -> String {
        self.profile().emergency_contact_phone.unwrap_or_default()
    }

    pub fn status(&self) -> String {
        self.profile().status.unwrap_or_else(|| "active".to_string())
    }

    pub fn name_parts(&self) -> NameParts {
        NameParts::split(&self.name)
    }

    /// Case-insensitive match on name, email or student id.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&q)
            || self.email.to_lowercase().contains(&q)
            || self
                .student_id
                .as_deref()
                .is_some_and(|s| s.to_lowercase().contains(&q))
    }
}

/// A full name split back into form fields.
///
/// The last word is the last name; a trailing one- or two-letter word before
/// it (optionally ending in `.`) is taken as the middle initial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameParts {
    pub first: String,
    pub middle_initial: String,
    pub last: String,
}

impl NameParts {
    pub fn split(name: &str) -> Self {
        let mut words: Vec<&str> = name.split_whitespace().collect();
        let Some(last) = words.pop() else {
            return Self::default();
        };
        if words.is_empty() {
            return Self { first: last.to_string(), ..Self::default() };
        }
        let mut middle_initial = String::new();
        if words.len() > 1 {
            if let Some(candidate) = words.last() {
                if candidate.trim_end_matches('.').chars().count() <= 2 {
                    middle_initial = candidate.to_string();
                    words.pop();
                }
            }
        }
        Self {
            first: words.join(" "),
            middle_initial,
            last: last.to_string(),
        }
    }
}

/// Body of `POST /api/students` and `PUT /api/students/{id}`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StudentInput {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub middle_initial: Option<String>,
    pub email: String,
    pub room_id: String,
    pub phone_number: String,
    pub enrollment_date: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

impl Employee {
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    pub fn role_label(&self) -> String {
        role_label(&self.role)
    }

    pub fn status_display(&self) -> String {
        self.status.clone().unwrap_or_else(|| "active".to_string())
    }

    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        q.is_empty() || self.name.to_lowercase().contains(&q) || self.email.to_lowercase().contains(&q)
    }
}

/// Roles an employee may be given from the role editor.
pub const EMPLOYEE_ROLES: [&str; 3] = ["staff", "manager", "admin"];

pub fn role_label(role: &str) -> String {
    match role {
        "super_admin" => "Super Admin".to_string(),
        "admin" => "Admin".to_string(),
        "manager" => "Manager".to_string(),
        "staff" => "Staff".to_string(),
        "student" => "Student".to_string(),
        other => other.to_string(),
    }
}

/// Body of `POST /api/users/staff`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffInput {
    pub first_name: String,
    pub last_name: String,
    pub middle_initial: String,
    pub email: String,
    pub password: String,
}

/// A registration waiting for approval.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingUser {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default, rename = "studentId", alias = "student_id", deserialize_with = "opt_id_string")]
    pub student_id: Option<String>,
    #[serde(default, rename = "studentProfile", alias = "student_profile")]
    pub student_profile: Option<StudentProfile>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

impl PendingUser {
    pub fn initials(&self) -> String {
        initials(&self.name)
    }

    pub fn student_id_display(&self) -> String {
        self.student_id.clone().unwrap_or_else(|| "N/A".to_string())
    }

    pub fn phone_number(&self) -> String {
        self.student_profile
            .as_ref()
            .and_then(|p| p.phone_number.clone())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn registered_on(&self) -> String {
        self.created_at.as_deref().map(format_date).unwrap_or_default()
    }
}

/// `GET /api/users/{id}/history`.
#[derive(Debug, Clone, Deserialize)]
pub struct StudentHistory {
    pub student: HistoryStudent,
    #[serde(default)]
    pub attendance: Vec<HistoryAttendance>,
    #[serde(default)]
    pub payments: Vec<Payment>,
    #[serde(default)]
    pub maintenance: Vec<MaintenanceRequest>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryStudent {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default, rename = "roomNumber", alias = "room_number")]
    pub room_number: Option<String>,
}

impl HistoryStudent {
    pub fn room_display(&self) -> String {
        self.room_number.clone().unwrap_or_else(|| "N/A".to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryAttendance {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub date: String,
    pub status: AttendanceStatus,
    #[serde(default, rename = "timeIn")]
    pub time_in: Option<String>,
    #[serde(default, rename = "timeOut")]
    pub time_out: Option<String>,
    #[serde(default)]
    pub remarks: Option<String>,
}

impl HistoryAttendance {
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

pub const STUDENT_STATUSES: [&str; 2] = ["active", "inactive"];

/// Student editor form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentForm {
    pub student_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_initial: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub room_id: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub enrollment_date: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl StudentForm {
    pub fn new_student() -> Self {
        Self {
            status: "active".to_string(),
            ..Self::default()
        }
    }

    pub fn from_student(student: &Student) -> Self {
        let parts = student.name_parts();
        let profile = student.profile();
        Self {
            student_id: student.student_id.clone().unwrap_or_default(),
            first_name: parts.first,
            last_name: parts.last,
            middle_initial: parts.middle_initial,
            email: student.email.clone(),
            room_id: student.room_id(),
            phone_number: student.phone_number(),
            enrollment_date: profile
                .enrollment_date
                .as_deref()
                .map(date_input_value)
                .unwrap_or_default(),
            emergency_contact_name: student.emergency_contact_name(),
            emergency_contact_phone: student.emergency_contact_phone(),
            status: student.status(),
            csrf_token: String::new(),
        }
    }

    pub fn validate(&self) -> Result<StudentInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.student_id, "Student ID", 50));
        errors.extend(validate::validate_required(&self.first_name, "First name", 100));
        errors.extend(validate::validate_required(&self.last_name, "Last name", 100));
        errors.extend(validate::validate_optional(&self.middle_initial, "Middle initial", 3));
        if !self.email.trim().is_empty() {
            errors.extend(validate::validate_email(&self.email));
        }
        errors.extend(validate::validate_choice(&self.status, "Status", &STUDENT_STATUSES));
        if !errors.is_empty() {
            return Err(errors);
        }

        let middle = self.middle_initial.trim();
        Ok(StudentInput {
            student_id: self.student_id.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            middle_initial: (!middle.is_empty()).then(|| middle.to_string()),
            email: self.email.trim().to_string(),
            room_id: self.room_id.trim().to_string(),
            phone_number: self.phone_number.trim().to_string(),
            enrollment_date: self.enrollment_date.trim().to_string(),
            emergency_contact_name: self.emergency_contact_name.trim().to_string(),
            emergency_contact_phone: self.emergency_contact_phone.trim().to_string(),
            status: self.status.clone(),
        })
    }
}

/// Add-employee form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StaffForm {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_initial: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl StaffForm {
    pub fn validate(&self) -> Result<StaffInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.first_name, "First name", 100));
        errors.extend(validate::validate_required(&self.last_name, "Last name", 100));
        errors.extend(validate::validate_email(&self.email));
        errors.extend(validate::validate_password(&self.password));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(StaffInput {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            middle_initial: self.middle_initial.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct RoleForm {
    pub role: String,
    pub csrf_token: String,
}

#[derive(Debug, Deserialize)]
pub struct RejectForm {
    #[serde(default)]
    pub reason: String,
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_names_back_into_fields() {
        assert_eq!(
            NameParts::split("Jane Q. Doe"),
            NameParts { first: "Jane".into(), middle_initial: "Q.".into(), last: "Doe".into() }
        );
        assert_eq!(
            NameParts::split("Mary Ann Santos"),
            NameParts { first: "Mary Ann".into(), middle_initial: String::new(), last: "Santos".into() }
        );
        assert_eq!(NameParts::split("Cher").first, "Cher");
        assert_eq!(NameParts::split("  "), NameParts::default());
    }

    #[test]
    fn student_search_covers_id() {
        let s: Student = serde_json::from_str(
            r#"{"_id":"u1","name":"Jane Doe","email":"jane@dorm.ph","studentId":"2021-0042"}"#,
        )
        .unwrap();
        assert!(s.matches("jane"));
        assert!(s.matches("0042"));
        assert!(s.matches(""));
        assert!(!s.matches("bob"));
        assert_eq!(s.room_number(), "N/A");
        assert_eq!(s.status(), "active");
    }

    #[test]
    fn student_input_omits_missing_initial() {
        let input = StudentInput { student_id: "S1".into(), ..Default::default() };
        let json = serde_json::to_value(&input).unwrap();
        assert!(json.get("middle_initial").is_none());
        assert_eq!(json["student_id"], "S1");
    }

    #[test]
    fn student_form_requires_id_and_names() {
        let errors = StudentForm::new_student().validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors[0], "Student ID is required");
    }

    #[test]
    fn student_form_builds_input() {
        let form = StudentForm {
            student_id: " 2021-0042 ".into(),
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            middle_initial: "Q".into(),
            ..StudentForm::new_student()
        };
        let input = form.validate().unwrap();
        assert_eq!(input.student_id, "2021-0042");
        assert_eq!(input.middle_initial.as_deref(), Some("Q"));
        assert_eq!(input.status, "active");
    }

    #[test]
    fn staff_form_needs_password() {
        let form = StaffForm {
            first_name: "Ana".into(),
            last_name: "Cruz".into(),
            email: "ana@dorm.ph".into(),
            password: "short".into(),
            ..StaffForm::default()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Password must be at least 8 characters".to_string()]
        );
    }
}
