use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::common::{StudentRef, capitalize, format_date, id_string};

pub const PRIORITIES: [&str; 3] = ["normal", "important", "urgent"];

fn default_priority() -> String {
    "normal".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
    #[serde(default)]
    pub author: Option<StudentRef>,
}

impl Announcement {
    pub fn priority_label(&self) -> String {
        capitalize(&self.priority)
    }

    pub fn priority_class(&self) -> &'static str {
        match self.priority.as_str() {
            "urgent" => "danger",
            "important" => "warning",
            _ => "info",
        }
    }

    pub fn posted_on(&self) -> String {
        self.created_at.as_deref().map(format_date).unwrap_or_default()
    }

    pub fn author_name(&self) -> String {
        self.author
            .as_ref()
            .and_then(|a| a.name())
            .unwrap_or("Administration")
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementInput {
    pub title: String,
    pub content: String,
    pub priority: String,
}

/// Newest first; undated entries sink to the bottom.
pub fn sort_newest_first(list: &mut [Announcement]) {
    list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnnouncementForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl AnnouncementForm {
    pub fn validate(&self) -> Result<AnnouncementInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.title, "Title", 200));
        errors.extend(validate::validate_required(&self.content, "Content", 5000));
        if !errors.is_empty() {
            return Err(errors);
        }
        let priority = if PRIORITIES.contains(&self.priority.as_str()) {
            self.priority.clone()
        } else {
            default_priority()
        };
        Ok(AnnouncementInput {
            title: self.title.trim().to_string(),
            content: self.content.trim().to_string(),
            priority,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first() {
        let mut list: Vec<Announcement> = serde_json::from_str(
            r#"[{"_id":"a1","title":"Old","content":"x","createdAt":"2026-09-01T00:00:00Z"},
                {"_id":"a2","title":"Undated","content":"x"},
                {"_id":"a3","title":"New","content":"x","createdAt":"2026-10-01T00:00:00Z",
                 "author":{"_id":"u1","name":"Dorm Office"}}]"#,
        )
        .unwrap();
        sort_newest_first(&mut list);
        let ids: Vec<&str> = list.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, ["a3", "a1", "a2"]);
        assert_eq!(list[0].author_name(), "Dorm Office");
        assert_eq!(list[1].author_name(), "Administration");
    }

    #[test]
    fn announcement_needs_title_and_content() {
        let form = AnnouncementForm { title: "Water interruption".into(), ..Default::default() };
        assert_eq!(form.validate().unwrap_err(), vec!["Content is required".to_string()]);
        let ok = AnnouncementForm { content: "No water 9am to noon.".into(), ..form };
        assert_eq!(ok.validate().unwrap().priority, "normal");
    }
}
