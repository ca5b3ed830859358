use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::common::{StudentRef, capitalize, format_date, id_string};

pub const URGENCIES: [&str; 3] = ["low", "medium", "high"];
pub const MAINTENANCE_STATUSES: [&str; 3] = ["pending", "in-progress", "resolved"];

fn default_urgency() -> String {
    "low".to_string()
}

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaintenanceRequest {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default = "default_urgency")]
    pub urgency: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub student: Option<StudentRef>,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

impl MaintenanceRequest {
    pub fn urgency_label(&self) -> String {
        capitalize(&self.urgency)
    }

    pub fn urgency_class(&self) -> &'static str {
        match self.urgency.as_str() {
            "high" => "danger",
            "medium" => "warning",
            _ => "muted",
        }
    }

    pub fn status_label(&self) -> String {
        match self.status.as_str() {
            "in-progress" => "In Progress".to_string(),
            other => capitalize(other),
        }
    }

    pub fn status_class(&self) -> &'static str {
        match self.status.as_str() {
            "resolved" => "success",
            "in-progress" => "info",
            _ => "warning",
        }
    }

    pub fn location_display(&self) -> String {
        self.location.clone().filter(|l| !l.is_empty()).unwrap_or_else(|| "-".to_string())
    }

    pub fn reporter(&self) -> String {
        self.student
            .as_ref()
            .map(StudentRef::display_name)
            .unwrap_or_else(|| "-".to_string())
    }

    pub fn filed_on(&self) -> String {
        self.created_at.as_deref().map(format_date).unwrap_or_default()
    }

    pub fn is_open(&self) -> bool {
        self.status != "resolved"
    }

    /// The status a staff member moves the ticket to next, if any.
    pub fn next_status(&self) -> Option<&'static str> {
        match self.status.as_str() {
            "pending" => Some("in-progress"),
            "in-progress" => Some("resolved"),
            _ => None,
        }
    }

    pub fn next_action(&self) -> &'static str {
        match self.next_status() {
            Some("in-progress") => "Start Work",
            Some(_) => "Mark Resolved",
            None => "",
        }
    }
}

/// Body of `POST /api/maintenance`.
#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceInput {
    pub title: String,
    pub description: String,
    pub location: String,
    pub urgency: String,
}

pub fn is_valid_status(status: &str) -> bool {
    MAINTENANCE_STATUSES.contains(&status)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MaintenanceForm {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub location: String,
    pub urgency: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl MaintenanceForm {
    pub fn validate(&self) -> Result<MaintenanceInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.title, "Title", 200));
        errors.extend(validate::validate_required(&self.description, "Description", 2000));
        errors.extend(validate::validate_optional(&self.location, "Location", 200));
        errors.extend(validate::validate_choice(&self.urgency, "Urgency", &URGENCIES));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(MaintenanceInput {
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            location: self.location.trim().to_string(),
            urgency: self.urgency.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct StatusForm {
    pub status: String,
    pub csrf_token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_moves_forward_only() {
        let mut req: MaintenanceRequest =
            serde_json::from_str(r#"{"_id":"m1","title":"Leak","description":"Sink"}"#).unwrap();
        assert_eq!(req.next_status(), Some("in-progress"));
        assert_eq!(req.next_action(), "Start Work");
        req.status = "in-progress".into();
        assert_eq!(req.next_status(), Some("resolved"));
        assert_eq!(req.status_label(), "In Progress");
        req.status = "resolved".into();
        assert_eq!(req.next_status(), None);
        assert!(!req.is_open());
    }

    #[test]
    fn validates_status_values() {
        assert!(is_valid_status("in-progress"));
        assert!(!is_valid_status("done"));
    }

    #[test]
    fn ticket_form_checks_urgency() {
        let form = MaintenanceForm {
            title: "Leaking faucet".into(),
            description: "Bathroom sink drips all night".into(),
            location: "Room 204".into(),
            urgency: "critical".into(),
            csrf_token: String::new(),
        };
        assert_eq!(form.validate().unwrap_err(), vec!["Urgency is not a valid choice".to_string()]);
        let ok = MaintenanceForm { urgency: "high".into(), ..form };
        assert_eq!(ok.validate().unwrap().location, "Room 204");
    }
}
