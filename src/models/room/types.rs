use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::common::{format_php, id_string, lenient_f64};

pub const ROOM_STATUSES: [&str; 3] = ["Available", "Occupied", "Maintenance"];

pub const ROOM_FEATURES: [&str; 5] = [
    "Air Conditioning",
    "Wi-Fi",
    "Private Bathroom",
    "Study Desk",
    "Balcony",
];

fn default_status() -> String {
    "Available".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(rename = "roomNumber", alias = "room_number")]
    pub room_number: String,
    #[serde(default)]
    pub capacity: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default, rename = "students_count", alias = "studentsCount")]
    pub students_count: Option<u32>,
}

impl Room {
    pub fn price_display(&self) -> String {
        format_php(self.price)
    }

    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    pub fn occupancy(&self) -> String {
        match self.students_count {
            Some(n) => format!("{n}/{}", self.capacity),
            None => self.capacity.to_string(),
        }
    }

    /// Badge class suffix for the status pill.
    pub fn status_class(&self) -> &'static str {
        match self.status.as_str() {
            "Available" => "success",
            "Occupied" => "info",
            _ => "warning",
        }
    }
}

/// Body of `POST /api/rooms` and `PUT /api/rooms/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomInput {
    pub room_number: String,
    pub capacity: u32,
    pub price: f64,
    pub status: String,
    pub features: Vec<String>,
}

/// Case-insensitive search on room number.
pub fn search<'a>(rooms: &'a [Room], query: &str) -> Vec<&'a Room> {
    let q = query.trim().to_lowercase();
    rooms
        .iter()
        .filter(|r| q.is_empty() || r.room_number.to_lowercase().contains(&q))
        .collect()
}

/// True when another room (not `editing_id`) already uses `number`.
pub fn is_duplicate_number(rooms: &[Room], number: &str, editing_id: Option<&str>) -> bool {
    let number = number.trim();
    rooms
        .iter()
        .filter(|r| Some(r.id.as_str()) != editing_id)
        .any(|r| r.room_number.trim().eq_ignore_ascii_case(number))
}

/// Room editor form. Each feature is a checkbox; an unchecked box is absent
/// from the submitted body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoomForm {
    pub room_number: String,
    pub capacity: String,
    pub price: String,
    pub status: String,
    #[serde(default)]
    pub air_conditioning: Option<String>,
    #[serde(default)]
    pub wifi: Option<String>,
    #[serde(default)]
    pub private_bathroom: Option<String>,
    #[serde(default)]
    pub study_desk: Option<String>,
    #[serde(default)]
    pub balcony: Option<String>,
    #[serde(default)]
    pub csrf_token: String,
}

impl RoomForm {
    pub fn new_room() -> Self {
        Self {
            capacity: "1".to_string(),
            status: default_status(),
            ..Self::default()
        }
    }

    pub fn from_room(room: &Room) -> Self {
        let flag = |feature: &str| room.has_feature(feature).then(|| "on".to_string());
        Self {
            room_number: room.room_number.clone(),
            capacity: room.capacity.to_string(),
            price: format!("{:.2}", room.price),
            status: room.status.clone(),
            air_conditioning: flag(ROOM_FEATURES[0]),
            wifi: flag(ROOM_FEATURES[1]),
            private_bathroom: flag(ROOM_FEATURES[2]),
            study_desk: flag(ROOM_FEATURES[3]),
            balcony: flag(ROOM_FEATURES[4]),
            csrf_token: String::new(),
        }
    }

    /// Checked features, in display order.
    pub fn features(&self) -> Vec<String> {
        let flags = [
            &self.air_conditioning,
            &self.wifi,
            &self.private_bathroom,
            &self.study_desk,
            &self.balcony,
        ];
        ROOM_FEATURES
            .iter()
            .zip(flags)
            .filter(|(_, flag)| flag.is_some())
            .map(|(feature, _)| feature.to_string())
            .collect()
    }

    /// Validate against the loaded room list; `editing_id` is the room being
    /// edited, if any.
    pub fn validate(&self, rooms: &[Room], editing_id: Option<&str>) -> Result<RoomInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.room_number, "Room number", 20));
        let capacity = match validate::parse_count(&self.capacity, "Capacity") {
            Ok(0) => {
                errors.push("Capacity must be at least 1".to_string());
                0
            }
            Ok(n) => n,
            Err(e) => {
                errors.push(e);
                0
            }
        };
        let price = validate::parse_amount(&self.price, "Price").unwrap_or_else(|e| {
            errors.push(e);
            0.0
        });
        errors.extend(validate::validate_choice(&self.status, "Status", &ROOM_STATUSES));
        if errors.is_empty() && is_duplicate_number(rooms, &self.room_number, editing_id) {
            errors.push("Room number already exists".to_string());
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(RoomInput {
            room_number: self.room_number.trim().to_string(),
            capacity,
            price,
            status: self.status.clone(),
            features: self.features(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(id: &str, number: &str) -> Room {
        Room {
            id: id.into(),
            room_number: number.into(),
            capacity: 2,
            price: 1500.0,
            status: default_status(),
            features: vec!["Wi-Fi".into()],
            students_count: Some(1),
        }
    }

    #[test]
    fn duplicate_check_ignores_the_room_being_edited() {
        let rooms = vec![room("r1", "101"), room("r2", "102")];
        assert!(is_duplicate_number(&rooms, "101", None));
        assert!(is_duplicate_number(&rooms, " 101 ", Some("r2")));
        assert!(!is_duplicate_number(&rooms, "101", Some("r1")));
        assert!(!is_duplicate_number(&rooms, "103", None));
    }

    #[test]
    fn search_is_case_insensitive() {
        let rooms = vec![room("r1", "A-101"), room("r2", "B-202")];
        assert_eq!(search(&rooms, "a-1").len(), 1);
        assert_eq!(search(&rooms, "").len(), 2);
    }

    #[test]
    fn price_may_arrive_as_text() {
        let r: Room = serde_json::from_str(
            r#"{"_id":"r1","roomNumber":"101","capacity":4,"price":"2500.00","students_count":3}"#,
        )
        .unwrap();
        assert_eq!(r.price_display(), "₱2,500.00");
        assert_eq!(r.occupancy(), "3/4");
        assert_eq!(r.status, "Available");
    }

    fn form(number: &str) -> RoomForm {
        RoomForm {
            room_number: number.into(),
            capacity: "2".into(),
            price: "1800".into(),
            status: "Available".into(),
            wifi: Some("on".into()),
            balcony: Some("on".into()),
            ..RoomForm::default()
        }
    }

    #[test]
    fn form_rejects_duplicate_number_before_any_request() {
        let rooms = vec![room("r1", "101")];
        assert_eq!(
            form("101").validate(&rooms, None).unwrap_err(),
            vec!["Room number already exists".to_string()]
        );
        let input = form("101").validate(&rooms, Some("r1")).unwrap();
        assert_eq!(input.features, vec!["Wi-Fi".to_string(), "Balcony".to_string()]);
        assert_eq!(input.capacity, 2);
    }

    #[test]
    fn form_round_trips_a_room() {
        let f = RoomForm::from_room(&room("r1", "101"));
        assert_eq!(f.features(), vec!["Wi-Fi".to_string()]);
        assert_eq!(f.price, "1500.00");
    }
}
