pub mod announcement_handlers;
pub mod attendance_handlers;
pub mod auth_handlers;
pub mod cleaning_handlers;
pub mod dashboard;
pub mod employee_handlers;
pub mod landing;
pub mod log_handlers;
pub mod maintenance_handlers;
pub mod notification_handlers;
pub mod payment_handlers;
pub mod profile_handlers;
pub mod room_handlers;
pub mod student_handlers;
pub mod task_handlers;

use serde::Deserialize;

use crate::api::ApiError;
use crate::errors::AppError;
use crate::templates_structs::PageContext;

/// Query string shared by the searchable, paginated list pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub q: Option<String>,
    pub status: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1)
    }

    pub fn search(&self) -> String {
        self.q.as_deref().unwrap_or("").trim().to_string()
    }

    pub fn status(&self) -> String {
        self.status.as_deref().unwrap_or("").trim().to_string()
    }
}

/// `path` with the non-empty `params` as its query string, for pager and
/// export links.
pub fn list_href(path: &str, params: &[(&str, &str)]) -> String {
    let kept: Vec<(&str, &str)> = params
        .iter()
        .copied()
        .filter(|(_, v)| !v.trim().is_empty())
        .collect();
    match serde_urlencoded::to_string(&kept) {
        Ok(qs) if !qs.is_empty() => format!("{path}?{qs}"),
        _ => path.to_string(),
    }
}

/// Items of a list fetch. A 401 ends the session; any other failure shows
/// an empty list with `message` in the page's flash slot.
pub fn list_or_flash<T>(
    result: Result<Vec<T>, ApiError>,
    ctx: &mut PageContext,
    message: &str,
) -> Result<Vec<T>, AppError> {
    match result {
        Ok(items) => Ok(items),
        Err(e) if e.is_unauthorized() => Err(e.into()),
        Err(e) => {
            log::warn!("{message}: {e}");
            ctx.flash.get_or_insert_with(|| e.user_message(message));
            Ok(Vec::new())
        }
    }
}

/// Flash for a failed write: the server message verbatim or `fallback`.
/// A 401 is returned as an error so the session ends.
pub fn write_failed(session: &actix_session::Session, e: ApiError, fallback: &str) -> Result<(), AppError> {
    if e.is_unauthorized() {
        return Err(e.into());
    }
    crate::auth::session::set_flash(session, e.user_message(fallback));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_href_skips_empty_params_and_encodes() {
        assert_eq!(list_href("/students", &[("q", "")]), "/students");
        assert_eq!(
            list_href("/logs", &[("action", "LOGIN"), ("q", "ana cruz&co")]),
            "/logs?action=LOGIN&q=ana+cruz%26co"
        );
    }
}
