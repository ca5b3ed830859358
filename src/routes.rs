use actix_web::{HttpResponse, web};

use crate::auth;
use crate::handlers::{
    announcement_handlers, attendance_handlers, auth_handlers, cleaning_handlers, dashboard,
    employee_handlers, landing, log_handlers, maintenance_handlers, notification_handlers,
    payment_handlers, profile_handlers, room_handlers, student_handlers, task_handlers,
};

/// Every page route. The caller wraps the app in the session middleware and
/// supplies `ApiClient`, `AppConfig` and `RateLimiter` as app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        // Public routes
        .route("/login", web::get().to(auth_handlers::login_page))
        .route("/login", web::post().to(auth_handlers::login_submit))
        .route("/auth/google", web::post().to(auth_handlers::google_submit))
        .route("/register", web::get().to(auth_handlers::register_page))
        .route("/register", web::post().to(auth_handlers::register_submit))
        .route("/verify-otp", web::get().to(auth_handlers::verify_otp_page))
        .route("/verify-otp", web::post().to(auth_handlers::verify_otp_submit))
        .route("/verify-otp/resend", web::post().to(auth_handlers::resend_otp))
        .route("/forgot-password", web::get().to(auth_handlers::forgot_password_page))
        .route("/forgot-password", web::post().to(auth_handlers::forgot_password_submit))
        .route("/reset-password", web::get().to(auth_handlers::reset_password_page))
        .route("/reset-password", web::post().to(auth_handlers::reset_password_submit))
        // Landing page; signed-in users are sent on to the dashboard
        .route("/", web::get().to(landing::index))
        // Protected routes; `/new` paths come before `/{id}` ones
        .service(
            web::scope("")
                .wrap(actix_web::middleware::from_fn(auth::middleware::require_auth))
                .route("/dashboard", web::get().to(dashboard::index))
                .route("/logout", web::post().to(auth_handlers::logout))
                // Account
                .route("/profile", web::get().to(profile_handlers::form))
                .route("/profile", web::post().to(profile_handlers::submit))
                .route("/profile/complete", web::get().to(profile_handlers::complete_form))
                .route("/profile/complete", web::post().to(profile_handlers::complete_submit))
                .route("/pending", web::get().to(profile_handlers::pending))
                // Rooms
                .route("/rooms", web::get().to(room_handlers::list))
                .route("/rooms/new", web::get().to(room_handlers::new_form))
                .route("/rooms", web::post().to(room_handlers::create))
                .route("/rooms/{id}/edit", web::get().to(room_handlers::edit_form))
                .route("/rooms/{id}", web::post().to(room_handlers::update))
                .route("/rooms/{id}/delete", web::post().to(room_handlers::delete))
                // Students
                .route("/students", web::get().to(student_handlers::list))
                .route("/students/new", web::get().to(student_handlers::new_form))
                .route("/students", web::post().to(student_handlers::create))
                .route("/students/{id}/edit", web::get().to(student_handlers::edit_form))
                .route("/students/{id}/history", web::get().to(student_handlers::history))
                .route("/students/{id}", web::post().to(student_handlers::update))
                .route("/students/{id}/delete", web::post().to(student_handlers::delete))
                // Employees and approvals
                .route("/employees", web::get().to(employee_handlers::list))
                .route("/employees/new", web::get().to(employee_handlers::new_form))
                .route("/employees", web::post().to(employee_handlers::create))
                .route("/employees/{id}/role", web::post().to(employee_handlers::change_role))
                .route("/approvals", web::get().to(employee_handlers::approvals))
                .route("/approvals/{id}/approve", web::post().to(employee_handlers::approve))
                .route("/approvals/{id}/reject", web::post().to(employee_handlers::reject))
                // Payments
                .route("/payments", web::get().to(payment_handlers::list))
                .route("/payments/new", web::get().to(payment_handlers::new_form))
                .route("/payments", web::post().to(payment_handlers::create))
                .route("/payments/bulk", web::get().to(payment_handlers::bulk_form))
                .route("/payments/bulk", web::post().to(payment_handlers::bulk_create))
                .route("/payments/{id}/edit", web::get().to(payment_handlers::edit_form))
                .route("/payments/{id}/receipt", web::get().to(payment_handlers::receipt))
                .route("/payments/{id}/mark-paid", web::post().to(payment_handlers::mark_paid))
                .route("/payments/{id}", web::post().to(payment_handlers::update))
                .route("/payments/{id}/delete", web::post().to(payment_handlers::delete))
                .route("/my-payments", web::get().to(payment_handlers::my_list))
                .route("/my-payments/{id}/receipt", web::get().to(payment_handlers::upload_form))
                .route("/my-payments/{id}/receipt", web::post().to(payment_handlers::upload_submit))
                // Maintenance
                .route("/maintenance", web::get().to(maintenance_handlers::list))
                .route("/maintenance/new", web::get().to(maintenance_handlers::new_form))
                .route("/maintenance", web::post().to(maintenance_handlers::create))
                .route("/maintenance/{id}/status", web::post().to(maintenance_handlers::update_status))
                .route("/maintenance/{id}/delete", web::post().to(maintenance_handlers::delete))
                // Attendance
                .route("/attendance", web::get().to(attendance_handlers::list))
                .route("/attendance/scan", web::get().to(attendance_handlers::scan_page))
                .route("/attendance/scan", web::post().to(attendance_handlers::scan_submit))
                .route("/my-id", web::get().to(attendance_handlers::my_id))
                // Tasks
                .route("/tasks", web::get().to(task_handlers::calendar))
                .route("/tasks/new", web::get().to(task_handlers::new_form))
                .route("/tasks", web::post().to(task_handlers::create))
                .route("/tasks/{id}/edit", web::get().to(task_handlers::edit_form))
                .route("/tasks/{id}", web::post().to(task_handlers::update))
                .route("/tasks/{id}/complete", web::post().to(task_handlers::complete))
                .route("/tasks/{id}/delete", web::post().to(task_handlers::delete))
                // Cleaning
                .route("/cleaning", web::get().to(cleaning_handlers::list))
                .route("/cleaning/new", web::get().to(cleaning_handlers::new_form))
                .route("/cleaning", web::post().to(cleaning_handlers::create))
                .route("/cleaning/{id}/edit", web::get().to(cleaning_handlers::edit_form))
                .route("/cleaning/{id}", web::post().to(cleaning_handlers::update))
                .route("/cleaning/{id}/complete", web::post().to(cleaning_handlers::complete))
                .route("/cleaning/{id}/delete", web::post().to(cleaning_handlers::delete))
                // Announcements
                .route("/announcements", web::get().to(announcement_handlers::list))
                .route("/announcements", web::post().to(announcement_handlers::create))
                .route("/announcements/{id}/delete", web::post().to(announcement_handlers::delete))
                // Notifications
                .route("/notifications", web::get().to(notification_handlers::list))
                .route("/notifications/feed", web::get().to(notification_handlers::feed))
                .route("/notifications/read-all", web::post().to(notification_handlers::mark_all_read))
                .route("/notifications/{id}/read", web::post().to(notification_handlers::mark_read))
                // System logs
                .route("/logs", web::get().to(log_handlers::list))
                .route("/logs/export", web::get().to(log_handlers::export)),
        );
}

/// Fallback for unmatched paths.
pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound()
        .content_type("text/html; charset=utf-8")
        .body(include_str!("../templates/errors/404.html"))
}
