use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::common::{format_date, format_time, id_string};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogUser {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemLog {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub user: Option<LogUser>,
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub details: Value,
    #[serde(default, rename = "ipAddress", alias = "ip_address")]
    pub ip_address: String,
    #[serde(default)]
    pub timestamp: String,
}

impl SystemLog {
    /// Details as text; structured details are shown as compact JSON.
    pub fn details_text(&self) -> String {
        match &self.details {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn user_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.name.clone())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn user_role(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.role.clone())
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn user_email(&self) -> String {
        self.user.as_ref().map(|u| u.email.clone()).unwrap_or_default()
    }

    /// `Jane Doe (admin)`, as exported.
    pub fn user_label(&self) -> String {
        format!("{} ({})", self.user_name(), self.user_role())
    }

    pub fn when(&self) -> String {
        let time = format_time(Some(&self.timestamp)).unwrap_or_default();
        format!("{} {time}", format_date(&self.timestamp)).trim().to_string()
    }

    pub fn action_class(&self) -> &'static str {
        let action = self.action.to_uppercase();
        if action.contains("DELETE") || action.contains("REJECT") || action.contains("FAIL") {
            "danger"
        } else if action.contains("LOGIN") || action.contains("LOGOUT") {
            "info"
        } else {
            "muted"
        }
    }

    /// Case-insensitive search over user, action and details.
    pub fn matches(&self, query: &str) -> bool {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return true;
        }
        [self.user_name(), self.user_email(), self.action.clone(), self.details_text()]
            .iter()
            .any(|field| field.to_lowercase().contains(&q))
    }
}

/// Filters sent to `GET /api/logs`. Empty fields are not sent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LogFilter {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
}

impl LogFilter {
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        [
            ("action", &self.action),
            ("startDate", &self.start_date),
            ("endDate", &self.end_date),
        ]
        .into_iter()
        .filter(|(_, v)| !v.trim().is_empty())
        .map(|(k, v)| (k, v.trim().to_string()))
        .collect()
    }
}

fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// CSV with the columns Timestamp, User, Action, Details and IP.
pub fn to_csv(logs: &[SystemLog]) -> String {
    let mut csv = String::from("Timestamp,User,Action,Details,IP\n");
    for log in logs {
        csv.push_str(&format!(
            "{},{},{},{},{}\n",
            escape_csv(&log.timestamp),
            escape_csv(&log.user_label()),
            escape_csv(&log.action),
            escape_csv(&log.details_text()),
            escape_csv(&log.ip_address),
        ));
    }
    csv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<SystemLog> {
        serde_json::from_str(
            r#"[{"_id":"l1","user":{"name":"Ana Cruz","email":"ana@dorm.ph","role":"admin"},
                 "action":"PAYMENT_UPDATE","details":"Marked paid, ref \"A1\"","ipAddress":"10.0.0.1",
                 "timestamp":"2026-10-18T08:00:00Z"},
                {"_id":"l2","action":"LOGIN","details":{"ok":true},"ipAddress":"10.0.0.2",
                 "timestamp":"2026-10-18T09:00:00Z"}]"#,
        )
        .unwrap()
    }

    #[test]
    fn csv_escapes_commas_and_quotes() {
        let csv = to_csv(&sample());
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Timestamp,User,Action,Details,IP");
        assert_eq!(
            lines[1],
            r#"2026-10-18T08:00:00Z,Ana Cruz (admin),PAYMENT_UPDATE,"Marked paid, ref ""A1""",10.0.0.1"#
        );
        assert_eq!(lines[2], r#"2026-10-18T09:00:00Z,Unknown (N/A),LOGIN,"{""ok"":true}",10.0.0.2"#);
    }

    #[test]
    fn search_and_filters() {
        let logs = sample();
        assert!(logs[0].matches("ana"));
        assert!(logs[0].matches("marked"));
        assert!(!logs[1].matches("ana"));

        let filter = LogFilter { action: " LOGIN ".into(), start_date: String::new(), end_date: "2026-10-18".into() };
        assert_eq!(
            filter.query_params(),
            vec![("action", "LOGIN".to_string()), ("endDate", "2026-10-18".to_string())]
        );
    }
}
