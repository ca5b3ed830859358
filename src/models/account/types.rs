use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::common::{id_string, opt_id_string};

/// Student-specific part of a user document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentProfile {
    #[serde(default, alias = "room_id", rename = "roomId", deserialize_with = "opt_id_string", skip_serializing_if = "Option::is_none")]
    pub room_id: Option<String>,
    #[serde(default, alias = "room_number", rename = "roomNumber", skip_serializing_if = "Option::is_none")]
    pub room_number: Option<String>,
    #[serde(default, alias = "phone_number", rename = "phoneNumber", skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, alias = "emergency_contact_name", rename = "emergencyContactName", skip_serializing_if = "Option::is_none")]
    pub emergency_contact_name: Option<String>,
    #[serde(default, alias = "emergency_contact_phone", rename = "emergencyContactPhone", skip_serializing_if = "Option::is_none")]
    pub emergency_contact_phone: Option<String>,
    #[serde(default, alias = "enrollment_date", rename = "enrollmentDate", skip_serializing_if = "Option::is_none")]
    pub enrollment_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

fn default_status() -> String {
    "approved".to_string()
}

/// The signed-in user as kept in the session.
///
/// The login, OAuth and profile endpoints all return this flat document,
/// usually with a `token` alongside.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default, rename = "studentId", alias = "student_id", deserialize_with = "opt_id_string")]
    pub student_id: Option<String>,
    #[serde(default, rename = "studentProfile", alias = "student_profile")]
    pub student_profile: Option<StudentProfile>,
}

impl SessionUser {
    /// Account status, preferring the user status over the profile status.
    pub fn effective_status(&self) -> &str {
        if !self.status.is_empty() {
            return &self.status;
        }
        self.student_profile
            .as_ref()
            .and_then(|p| p.status.as_deref())
            .unwrap_or("approved")
    }

    pub fn is_rejected(&self) -> bool {
        self.effective_status() == "rejected"
    }

    pub fn is_awaiting_validation(&self) -> bool {
        matches!(self.effective_status(), "pending" | "unverified")
    }

    pub fn has_student_id(&self) -> bool {
        self.student_id.as_deref().is_some_and(|s| !s.trim().is_empty())
    }

    pub fn room_number(&self) -> String {
        self.student_profile
            .as_ref()
            .and_then(|p| p.room_number.clone())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn phone_number(&self) -> String {
        self.profile().phone_number.clone().unwrap_or_default()
    }

    pub fn emergency_contact_name(&self) -> String {
        self.profile().emergency_contact_name.clone().unwrap_or_default()
    }

    pub fn emergency_contact_phone(&self) -> String {
        self.profile().emergency_contact_phone.clone().unwrap_or_default()
    }

    pub fn student_id_or_na(&self) -> String {
        self.student_id.clone().unwrap_or_else(|| "N/A".to_string())
    }

    fn profile(&self) -> StudentProfile {
        self.student_profile.clone().unwrap_or_default()
    }
}

/// Response of `/api/auth/login`, `/api/auth/google` and `/api/auth/profile`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(flatten)]
    pub user: SessionUser,
}

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub student_id: String,
    pub password: String,
    pub role: &'static str,
    pub student_profile: StudentProfile,
}

/// Body of `PUT /api/auth/profile`. Only populated fields are sent.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_profile: Option<StudentProfile>,
}

/// Full name as the registration form composes it: `First [M ]Last`.
pub fn compose_name(first: &str, middle_initial: &str, last: &str) -> String {
    let mi = middle_initial.trim();
    let middle = if mi.is_empty() { String::new() } else { format!("{mi} ") };
    format!("{} {}{}", first.trim(), middle, last.trim())
        .trim()
        .to_string()
}

/// Submitted sign-in form.
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    pub csrf_token: String,
}

/// Submitted student registration form. Also re-rendered on error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub middle_initial: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl RegisterForm {
    pub fn errors(&self) -> Vec<String> {
        [
            validate::validate_required(&self.first_name, "First name", 100),
            validate::validate_required(&self.last_name, "Last name", 100),
            validate::validate_optional(&self.middle_initial, "Middle initial", 5),
            validate::validate_email(&self.email),
            validate::validate_required(&self.student_id, "Student ID", 50),
            validate::validate_password(&self.password),
            validate::validate_confirmation(&self.password, &self.confirm_password),
        ]
        .into_iter()
        .flatten()
        .collect()
    }

    pub fn to_request(&self) -> RegisterRequest {
        RegisterRequest {
            name: compose_name(&self.first_name, &self.middle_initial, &self.last_name),
            email: self.email.trim().to_string(),
            student_id: self.student_id.trim().to_string(),
            password: self.password.clone(),
            role: "student",
            student_profile: StudentProfile {
                room_number: Some("TBD".to_string()),
                phone_number: Some(String::new()),
                emergency_contact_name: Some(String::new()),
                emergency_contact_phone: Some(String::new()),
                status: Some("active".to_string()),
                ..StudentProfile::default()
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct OtpForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    pub csrf_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmailForm {
    #[serde(default)]
    pub email: String,
    pub csrf_token: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetPasswordForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub otp: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    pub csrf_token: String,
}

impl ResetPasswordForm {
    pub fn errors(&self) -> Vec<String> {
        [
            validate::validate_email(&self.email),
            validate::validate_otp(&self.otp),
            validate::validate_password(&self.password),
            validate::validate_confirmation(&self.password, &self.confirm_password),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// Posted by the Google Identity callback.
#[derive(Debug, Deserialize)]
pub struct GoogleForm {
    #[serde(default)]
    pub credential: String,
    pub csrf_token: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirm_password: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl ProfileForm {
    pub fn from_user(user: &SessionUser) -> Self {
        Self {
            name: user.name.clone(),
            email: user.email.clone(),
            phone_number: user.phone_number(),
            emergency_contact_name: user.emergency_contact_name(),
            emergency_contact_phone: user.emergency_contact_phone(),
            ..Self::default()
        }
    }

    /// The password is only checked when a new one was typed.
    pub fn errors(&self) -> Vec<String> {
        let mut errors: Vec<String> = [
            validate::validate_required(&self.name, "Name", 150),
            validate::validate_email(&self.email),
        ]
        .into_iter()
        .flatten()
        .collect();
        if !self.password.is_empty() {
            errors.extend(validate::validate_password(&self.password));
            errors.extend(validate::validate_confirmation(&self.password, &self.confirm_password));
        }
        errors
    }

    /// Students also send their contact details; staff only name and email.
    pub fn to_update(&self, user: &SessionUser) -> ProfileUpdate {
        let student_profile = (user.role == "student").then(|| StudentProfile {
            phone_number: Some(self.phone_number.trim().to_string()),
            emergency_contact_name: Some(self.emergency_contact_name.trim().to_string()),
            emergency_contact_phone: Some(self.emergency_contact_phone.trim().to_string()),
            ..user.student_profile.clone().unwrap_or_default()
        });
        ProfileUpdate {
            name: Some(self.name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            password: (!self.password.is_empty()).then(|| self.password.clone()),
            student_profile,
            ..ProfileUpdate::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompleteProfileForm {
    #[serde(default)]
    pub student_id: String,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default)]
    pub emergency_contact_name: String,
    #[serde(default)]
    pub emergency_contact_phone: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl CompleteProfileForm {
    pub fn errors(&self) -> Vec<String> {
        if self.student_id.trim().is_empty() || self.phone_number.trim().is_empty() {
            return vec!["Please fill in all required fields.".to_string()];
        }
        Vec::new()
    }

    /// The profile stays `pending` until an administrator approves it.
    pub fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            student_id: Some(self.student_id.trim().to_string()),
            student_profile: Some(StudentProfile {
                phone_number: Some(self.phone_number.trim().to_string()),
                emergency_contact_name: Some(self.emergency_contact_name.trim().to_string()),
                emergency_contact_phone: Some(self.emergency_contact_phone.trim().to_string()),
                status: Some("pending".to_string()),
                ..StudentProfile::default()
            }),
            ..ProfileUpdate::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_flattens_user() {
        let raw = r#"{"_id":"u1","name":"Jane Doe","email":"jane@dorm.ph","role":"student",
                      "token":"abc","studentId":"2021-001",
                      "studentProfile":{"roomNumber":"204","phoneNumber":"0917"}}"#;
        let resp: AuthResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(resp.token.as_deref(), Some("abc"));
        assert_eq!(resp.user.id, "u1");
        assert_eq!(resp.user.status, "approved");
        assert_eq!(resp.user.room_number(), "204");
        assert!(resp.user.has_student_id());
        assert!(!resp.user.is_awaiting_validation());
    }

    #[test]
    fn snake_case_profile_is_accepted() {
        let raw = r#"{"id":7,"name":"A","email":"a@b.c","role":"student","status":"pending",
                      "student_profile":{"room_number":"101","room_id":3}}"#;
        let user: SessionUser = serde_json::from_str(raw).unwrap();
        assert_eq!(user.id, "7");
        assert!(user.is_awaiting_validation());
        assert!(!user.has_student_id());
        let profile = user.student_profile.unwrap();
        assert_eq!(profile.room_id.as_deref(), Some("3"));
        assert_eq!(profile.room_number.as_deref(), Some("101"));
    }

    #[test]
    fn compose_name_skips_missing_initial() {
        assert_eq!(compose_name("Jane", "", "Doe"), "Jane Doe");
        assert_eq!(compose_name(" Jane ", "Q.", " Doe"), "Jane Q. Doe");
    }

    #[test]
    fn registration_checks_fields_before_sending() {
        let mut form = RegisterForm {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@dorm.ph".into(),
            student_id: "2021-001".into(),
            password: "secret123".into(),
            confirm_password: "secret124".into(),
            ..RegisterForm::default()
        };
        assert_eq!(form.errors(), vec!["Passwords do not match".to_string()]);

        form.confirm_password = "secret123".into();
        assert!(form.errors().is_empty());
        let req = serde_json::to_value(form.to_request()).unwrap();
        assert_eq!(req["name"], "Jane Doe");
        assert_eq!(req["studentId"], "2021-001");
        assert_eq!(req["role"], "student");
        assert_eq!(req["studentProfile"]["roomNumber"], "TBD");
        assert_eq!(req["studentProfile"]["status"], "active");
    }

    #[test]
    fn profile_password_is_optional() {
        let form = ProfileForm { name: "Jane".into(), email: "jane@dorm.ph".into(), ..ProfileForm::default() };
        assert!(form.errors().is_empty());
        let with_mismatch = ProfileForm { password: "newpassword".into(), confirm_password: "x".into(), ..form };
        assert_eq!(with_mismatch.errors(), vec!["Passwords do not match".to_string()]);
    }

    #[test]
    fn completing_profile_keeps_it_pending() {
        let form = CompleteProfileForm { student_id: " S9 ".into(), phone_number: "0917".into(), ..Default::default() };
        assert!(form.errors().is_empty());
        let body = serde_json::to_value(form.to_update()).unwrap();
        assert_eq!(body["studentId"], "S9");
        assert_eq!(body["studentProfile"]["status"], "pending");
        assert!(body.get("password").is_none());
        assert!(CompleteProfileForm::default().errors().len() == 1);
    }
}
