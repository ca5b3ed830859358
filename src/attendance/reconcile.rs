use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::api::{ApiError, Backend};
use crate::models::attendance::{self, AttendanceLog, AttendanceStatus, CheckIn, CheckOut};
use super::scan::{ScanError, ScanPayload};

/// The backend calls a scan needs. Implemented by `Backend`; tests supply
/// an in-memory fake.
#[allow(async_fn_in_trait)]
pub trait AttendanceApi {
    async fn logs_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceLog>, ApiError>;
    async fn create_check_in(&self, body: &CheckIn) -> Result<(), ApiError>;
    async fn check_in_existing(&self, log_id: &str, body: &CheckIn) -> Result<(), ApiError>;
    async fn check_out(&self, log_id: &str, body: &CheckOut) -> Result<(), ApiError>;
}

impl AttendanceApi for Backend {
    async fn logs_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceLog>, ApiError> {
        attendance::find_by_date(self, date).await
    }

    async fn create_check_in(&self, body: &CheckIn) -> Result<(), ApiError> {
        attendance::create(self, body).await
    }

    async fn check_in_existing(&self, log_id: &str, body: &CheckIn) -> Result<(), ApiError> {
        attendance::check_in_existing(self, log_id, body).await
    }

    async fn check_out(&self, log_id: &str, body: &CheckOut) -> Result<(), ApiError> {
        attendance::check_out(self, log_id, body).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanAction {
    CheckIn,
    CheckOut,
}

impl ScanAction {
    pub fn label(&self) -> &'static str {
        match self {
            ScanAction::CheckIn => "Check-In",
            ScanAction::CheckOut => "Check-Out",
        }
    }
}

/// What a scan should do given the student's log for today.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanDecision {
    /// No check-in yet. `existing_id` is set when a record without `timeIn`
    /// already exists (for example an "absent" entry) and must be updated.
    CheckIn { existing_id: Option<String> },
    CheckOut { log_id: String },
    AlreadyRecorded,
}

/// ABSENT -> CHECKED_IN -> CHECKED_IN_OUT; the last state is terminal.
pub fn decide(existing: Option<&AttendanceLog>) -> ScanDecision {
    match existing {
        None => ScanDecision::CheckIn { existing_id: None },
        Some(log) if !log.has_time_in() => ScanDecision::CheckIn {
            existing_id: Some(log.id.clone()),
        },
        Some(log) if !log.has_time_out() => ScanDecision::CheckOut {
            log_id: log.id.clone(),
        },
        Some(_) => ScanDecision::AlreadyRecorded,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Recorded { student_name: String, action: ScanAction },
    AlreadyRecorded { student_name: String },
}

impl ScanOutcome {
    pub fn title(&self) -> &'static str {
        match self {
            ScanOutcome::Recorded { .. } => "Success",
            ScanOutcome::AlreadyRecorded { .. } => "Already Recorded",
        }
    }

    pub fn message(&self) -> String {
        match self {
            ScanOutcome::Recorded { student_name, action } => {
                format!("{} recorded for {student_name}", action.label())
            }
            ScanOutcome::AlreadyRecorded { student_name } => {
                format!("{student_name} has already checked in and out today.")
            }
        }
    }
}

/// Reconcile one scan against today's attendance.
///
/// Today's logs are fetched on every call so a scan never acts on a list
/// loaded before an earlier scan. A payload that fails to decode returns
/// before any request is made, and a completed day issues no write.
pub async fn process_scan<A: AttendanceApi>(
    api: &A,
    raw: &str,
    now: DateTime<Utc>,
) -> Result<ScanOutcome, ScanError> {
    let payload = ScanPayload::decode(raw)?;

    let today = now.date_naive();
    let logs = api.logs_for_date(today).await?;
    let existing = logs.iter().find(|l| l.student_id() == Some(payload.id.as_str()));

    let student_name = payload
        .name
        .clone()
        .or_else(|| existing.and_then(AttendanceLog::student_name).map(str::to_string))
        .unwrap_or_else(|| payload.id.clone());

    let date = today.format("%Y-%m-%d").to_string();
    let stamp = now.to_rfc3339_opts(SecondsFormat::Millis, true);

    let action = match decide(existing) {
        ScanDecision::AlreadyRecorded => {
            log::info!("Scan for {} ignored: day already complete", payload.id);
            return Ok(ScanOutcome::AlreadyRecorded { student_name });
        }
        ScanDecision::CheckIn { existing_id } => {
            let body = CheckIn {
                student: payload.id.clone(),
                date,
                status: AttendanceStatus::Present,
                time_in: stamp,
            };
            match existing_id {
                Some(id) => api.check_in_existing(&id, &body).await?,
                None => api.create_check_in(&body).await?,
            }
            ScanAction::CheckIn
        }
        ScanDecision::CheckOut { log_id } => {
            let body = CheckOut {
                student: payload.id.clone(),
                date,
                time_out: stamp,
            };
            api.check_out(&log_id, &body).await?;
            ScanAction::CheckOut
        }
    };

    log::info!("{} recorded for student {}", action.label(), payload.id);
    Ok(ScanOutcome::Recorded { student_name, action })
}
