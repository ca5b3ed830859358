use actix_session::SessionExt;
use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::auth::session;
use crate::models::account::SessionUser;

/// Paths an account that is not yet approved may still open.
const AWAITING_APPROVAL_PATHS: [&str; 3] = ["/pending", "/profile/complete", "/logout"];

/// Where a signed-in user must be sent instead of `path`, if anywhere.
///
/// Rejected accounts are signed out. Accounts awaiting validation are held on
/// the complete-profile page until they have a student id, then on the
/// pending page.
pub fn gate_redirect(user: &SessionUser, path: &str) -> Option<&'static str> {
    if user.is_rejected() {
        return Some("/login?rejected=1");
    }
    if user.is_awaiting_validation() && !AWAITING_APPROVAL_PATHS.contains(&path) {
        return Some(if user.has_student_id() { "/pending" } else { "/profile/complete" });
    }
    None
}

/// Middleware function that checks for an authenticated session.
/// Redirects to /login if no session found.
pub async fn require_auth(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let session = req.get_session();

    let target = match (session::get_token(&session), session::get_user(&session)) {
        (Some(_), Some(user)) => {
            let target = gate_redirect(&user, req.path());
            if user.is_rejected() {
                log::info!("Signing out rejected account {}", user.email);
                session.purge();
            }
            target
        }
        _ => Some("/login"),
    };

    if let Some(location) = target {
        let response = HttpResponse::SeeOther()
            .insert_header(("Location", location))
            .finish();
        return Ok(req.into_response(response).map_into_right_body());
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(status: &str, student_id: Option<&str>) -> SessionUser {
        let mut json = serde_json::json!({
            "_id": "u1", "name": "Jane", "email": "j@d.ph", "role": "student", "status": status
        });
        if let Some(id) = student_id {
            json["studentId"] = id.into();
        }
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn approved_users_pass() {
        assert_eq!(gate_redirect(&user("approved", Some("S1")), "/dashboard"), None);
        assert_eq!(gate_redirect(&user("active", None), "/payments"), None);
    }

    #[test]
    fn pending_users_are_held() {
        assert_eq!(gate_redirect(&user("pending", None), "/dashboard"), Some("/profile/complete"));
        assert_eq!(gate_redirect(&user("unverified", Some("S1")), "/dashboard"), Some("/pending"));
        assert_eq!(gate_redirect(&user("pending", Some("S1")), "/pending"), None);
        assert_eq!(gate_redirect(&user("pending", None), "/logout"), None);
    }

    #[test]
    fn rejected_users_are_signed_out() {
        assert_eq!(gate_redirect(&user("rejected", Some("S1")), "/pending"), Some("/login?rejected=1"));
    }
}
