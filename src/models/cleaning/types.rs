use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::common::{date_input_value, format_date, id_string};

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleaningSchedule {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub area: String,
    #[serde(default, rename = "assignedTo", alias = "assigned_to")]
    pub assigned_to: String,
    #[serde(default, rename = "scheduledDate", alias = "scheduled_date")]
    pub scheduled_date: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CleaningSchedule {
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }

    pub fn date_display(&self) -> String {
        format_date(&self.scheduled_date)
    }

    pub fn date_input(&self) -> String {
        date_input_value(&self.scheduled_date)
    }

    pub fn notes_display(&self) -> String {
        self.notes.clone().unwrap_or_default()
    }

    pub fn completed_input(&self) -> CleaningInput {
        CleaningInput {
            area: self.area.clone(),
            assigned_to: self.assigned_to.clone(),
            scheduled_date: self.scheduled_date.clone(),
            status: "completed".to_string(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }
}

/// Body of `POST /api/cleaning-schedule` and `PUT /api/cleaning-schedule/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CleaningInput {
    pub area: String,
    pub assigned_to: String,
    pub scheduled_date: String,
    pub status: String,
    pub notes: String,
}

/// Split into (pending, completed), each ordered by scheduled date.
pub fn split_by_status(mut all: Vec<CleaningSchedule>) -> (Vec<CleaningSchedule>, Vec<CleaningSchedule>) {
    all.sort_by(|a, b| a.scheduled_date.cmp(&b.scheduled_date));
    all.into_iter().partition(|s| !s.is_completed())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CleaningForm {
    pub area: String,
    pub assigned_to: String,
    pub scheduled_date: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl CleaningForm {
    pub fn new_schedule() -> Self {
        Self {
            status: default_status(),
            ..Self::default()
        }
    }

    pub fn from_schedule(s: &CleaningSchedule) -> Self {
        Self {
            area: s.area.clone(),
            assigned_to: s.assigned_to.clone(),
            scheduled_date: s.date_input(),
            status: s.status.clone(),
            notes: s.notes_display(),
            csrf_token: String::new(),
        }
    }

    pub fn validate(&self) -> Result<CleaningInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.area, "Area", 200));
        errors.extend(validate::validate_required(&self.assigned_to, "Assigned room", 20));
        errors.extend(validate::validate_date(&self.scheduled_date, "Date"));
        if !errors.is_empty() {
            return Err(errors);
        }
        let status = if self.status == "completed" { "completed" } else { "pending" };
        Ok(CleaningInput {
            area: self.area.trim().to_string(),
            assigned_to: self.assigned_to.trim().to_string(),
            scheduled_date: self.scheduled_date.trim().to_string(),
            status: status.to_string(),
            notes: self.notes.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_and_orders_schedules() {
        let all: Vec<CleaningSchedule> = serde_json::from_str(
            r#"[{"_id":"c1","area":"Hall","assignedTo":"101","scheduledDate":"2026-10-20","status":"pending"},
                {"_id":"c2","area":"Lobby","assignedTo":"102","scheduledDate":"2026-10-19","status":"completed"},
                {"_id":"c3","area":"Stairs","assignedTo":"103","scheduledDate":"2026-10-18"}]"#,
        )
        .unwrap();
        let (pending, done) = split_by_status(all);
        let ids: Vec<&str> = pending.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, ["c3", "c1"]);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].completed_input().assigned_to, "102");
    }

    #[test]
    fn cleaning_form_requires_area_room_and_date() {
        assert_eq!(CleaningForm::new_schedule().validate().unwrap_err().len(), 3);
        let form = CleaningForm {
            area: "Lobby".into(),
            assigned_to: "101".into(),
            scheduled_date: "2026-10-19".into(),
            status: "bogus".into(),
            ..CleaningForm::default()
        };
        assert_eq!(form.validate().unwrap().status, "pending");
    }
}
