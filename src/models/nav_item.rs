use crate::auth::session::Permissions;

pub struct NavModule {
    pub label: String,
    pub url: String,
    pub is_active: bool,
}

/// (label, url, required permission), in display order.
const NAV_ITEMS: &[(&str, &str, &str)] = &[
    ("Dashboard", "/dashboard", "dashboard.view"),
    ("Rooms", "/rooms", "rooms.manage"),
    ("Students", "/students", "students.view"),
    ("Employees", "/employees", "staff.manage"),
    ("Approvals", "/approvals", "approvals.manage"),
    ("Payments", "/payments", "payments.manage"),
    ("My Payments", "/my-payments", "payments.own"),
    ("Maintenance", "/maintenance", "maintenance.view"),
    ("Attendance", "/attendance", "attendance.manage"),
    ("My Digital ID", "/my-id", "attendance.own"),
    ("Tasks", "/tasks", "tasks.view"),
    ("Cleaning", "/cleaning", "cleaning.view"),
    ("Announcements", "/announcements", "announcements.view"),
    ("System Logs", "/logs", "logs.view"),
];

/// Header navigation for the given permissions. The entry whose URL is the
/// longest prefix of `current_path` is marked active.
pub fn find_navigation(permissions: &Permissions, current_path: &str) -> Vec<NavModule> {
    let active = NAV_ITEMS
        .iter()
        .filter(|(_, url, _)| is_under(current_path, url))
        .max_by_key(|(_, url, _)| url.len())
        .map(|(_, url, _)| *url);

    NAV_ITEMS
        .iter()
        .filter(|(_, _, code)| permissions.has(code))
        .map(|(label, url, _)| NavModule {
            label: label.to_string(),
            url: url.to_string(),
            is_active: Some(*url) == active,
        })
        .collect()
}

fn is_under(path: &str, url: &str) -> bool {
    path == url || path.strip_prefix(url).is_some_and(|rest| rest.starts_with('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_by_permission_and_marks_active() {
        let perms = Permissions(vec!["dashboard.view".into(), "payments.own".into()]);
        let nav = find_navigation(&perms, "/my-payments/p1/receipt");
        let labels: Vec<&str> = nav.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(labels, ["Dashboard", "My Payments"]);
        assert!(nav[1].is_active);
        assert!(!nav[0].is_active);
    }

    #[test]
    fn prefix_must_end_at_a_segment() {
        assert!(is_under("/payments/new", "/payments"));
        assert!(!is_under("/payments-report", "/payments"));
    }
}
