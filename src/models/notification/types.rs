use serde::{Deserialize, Serialize};

use crate::models::common::{format_date, format_time, id_string};

fn default_kind() -> String {
    "info".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub message: String,
    #[serde(default = "default_kind", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default, rename = "createdAt", alias = "created_at")]
    pub created_at: Option<String>,
}

impl Notification {
    pub fn received(&self) -> String {
        match self.created_at.as_deref() {
            Some(raw) => {
                let time = format_time(Some(raw)).unwrap_or_default();
                format!("{} {time}", format_date(raw)).trim().to_string()
            }
            None => String::new(),
        }
    }

    pub fn kind_class(&self) -> &'static str {
        match self.kind.as_str() {
            "success" => "success",
            "warning" => "warning",
            "error" => "danger",
            _ => "info",
        }
    }
}

pub fn unread_count(list: &[Notification]) -> usize {
    list.iter().filter(|n| !n.read).count()
}

/// JSON served to the header poller.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationFeed {
    pub unread: usize,
    pub notifications: Vec<FeedItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedItem {
    pub id: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub read: bool,
    pub received: String,
}

impl NotificationFeed {
    /// Feed of the newest `limit` notifications with the total unread count.
    pub fn from_list(list: &[Notification], limit: usize) -> Self {
        Self {
            unread: unread_count(list),
            notifications: list
                .iter()
                .take(limit)
                .map(|n| FeedItem {
                    id: n.id.clone(),
                    message: n.message.clone(),
                    kind: n.kind.clone(),
                    read: n.read,
                    received: n.received(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feed_counts_unread_across_whole_list() {
        let list: Vec<Notification> = serde_json::from_str(
            r#"[{"_id":"n1","message":"Rent due","type":"warning","read":false},
                {"_id":"n2","message":"Welcome","read":true},
                {"_id":"n3","message":"Receipt approved","type":"success","read":false}]"#,
        )
        .unwrap();
        let feed = NotificationFeed::from_list(&list, 1);
        assert_eq!(feed.unread, 2);
        assert_eq!(feed.notifications.len(), 1);
        assert_eq!(list[1].kind, "info");
        let json = serde_json::to_value(&feed).unwrap();
        assert_eq!(json["notifications"][0]["type"], "warning");
    }
}
