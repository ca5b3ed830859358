//! Role to permission mapping.
//!
//! The backend only knows roles; pages and navigation check permission codes
//! derived from the role at sign-in.

use crate::auth::session::Permissions;

const ADMIN: &[&str] = &[
    "dashboard.view",
    "profile.edit",
    "notifications.view",
    "rooms.manage",
    "students.view",
    "students.manage",
    "staff.manage",
    "approvals.manage",
    "payments.manage",
    "maintenance.view",
    "maintenance.manage",
    "maintenance.delete",
    "attendance.manage",
    "tasks.view",
    "tasks.manage",
    "cleaning.view",
    "cleaning.manage",
    "announcements.view",
    "announcements.manage",
    "logs.view",
];

const STAFF: &[&str] = &[
    "dashboard.view",
    "profile.edit",
    "notifications.view",
    "rooms.manage",
    "students.view",
    "maintenance.view",
    "maintenance.manage",
    "attendance.manage",
    "tasks.view",
    "tasks.manage",
    "cleaning.view",
    "cleaning.manage",
    "announcements.view",
];

const STUDENT: &[&str] = &[
    "dashboard.view",
    "profile.edit",
    "notifications.view",
    "payments.own",
    "maintenance.view",
    "maintenance.own",
    "attendance.own",
    "tasks.view",
    "cleaning.view",
    "announcements.view",
];

pub fn permissions_for(role: &str) -> Permissions {
    let codes: &[&str] = match role {
        "super_admin" | "admin" | "manager" => ADMIN,
        "staff" => STAFF,
        "student" => STUDENT,
        _ => &[],
    };
    let mut perms: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
    if role == "super_admin" {
        perms.push("staff.roles".to_string());
    }
    Permissions(perms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_super_admin_edits_roles() {
        assert!(permissions_for("super_admin").has("staff.roles"));
        assert!(!permissions_for("admin").has("staff.roles"));
        assert!(permissions_for("manager").has("staff.manage"));
    }

    #[test]
    fn staff_and_students_are_scoped() {
        let staff = permissions_for("staff");
        assert!(staff.has("attendance.manage"));
        assert!(!staff.has("payments.manage"));
        assert!(!staff.has("logs.view"));

        let student = permissions_for("student");
        assert!(student.has("payments.own"));
        assert!(student.has("attendance.own"));
        assert!(!student.has("rooms.manage"));

        assert!(permissions_for("visitor").0.is_empty());
    }
}
