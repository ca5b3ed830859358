use actix_session::Session;
use actix_web::{HttpResponse, web};
use chrono::{Datelike, Local};

use crate::auth::session;
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::templates_structs::{LandingTemplate, Location, PublicContext};

const HIGHLIGHTS: [&str; 3] = [
    "Instant maintenance requests",
    "Secure online payments",
    "Community events & updates",
];

const FEATURES: [(&str, &str); 6] = [
    (
        "Community Connection",
        "Connect with fellow residents, join study groups, and take part in dorm activities.",
    ),
    (
        "Quick Maintenance",
        "Submit repair requests instantly and follow their status from your phone.",
    ),
    (
        "Easy Payments",
        "View your billing history and submit rent receipts without the hassle.",
    ),
    (
        "Safety First",
        "QR check-in and check-out keeps an accurate record of who is in the building.",
    ),
    (
        "Stay Informed",
        "Never miss an announcement about building updates, events, or deadlines.",
    ),
    (
        "Cleaning & Tasks",
        "See the cleaning schedule and upcoming tasks for your room on one calendar.",
    ),
];

const LOCATION: Location = Location {
    campus: "Bukidnon State University",
    address: "Malaybalay City, Bukidnon 8700",
    email: "hello@dormsync.com",
    map_src: "https://maps.google.com/maps?q=Bukidnon+State+University,+Malaybalay+City,+Bukidnon,+8700&z=15&output=embed",
};

/// Public front page. Signed-in users go straight to their dashboard.
pub async fn index(
    session: Session,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse, AppError> {
    if session::is_signed_in(&session) {
        return Ok(redirect("/dashboard"));
    }

    render(LandingTemplate {
        page: PublicContext::build(&session, &config),
        highlights: HIGHLIGHTS.to_vec(),
        features: FEATURES.to_vec(),
        location: LOCATION,
        year: Local::now().year(),
    })
}
