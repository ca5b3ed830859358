//! Shared test infrastructure.
//!
//! `FakeAttendance` stands in for the backend's attendance endpoints: it keeps
//! today's logs in memory, applies writes the way the server would, and
//! records every call so tests can assert on the exact requests a scan made.

#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;

use dormsync::api::ApiError;
use dormsync::attendance::AttendanceApi;
use dormsync::models::attendance::{AttendanceLog, AttendanceStatus, CheckIn, CheckOut};
use dormsync::models::common::StudentRef;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(NaiveDate),
    Create(CheckIn),
    CheckInExisting(String, CheckIn),
    CheckOut(String, CheckOut),
}

#[derive(Default)]
pub struct FakeAttendance {
    logs: Mutex<Vec<AttendanceLog>>,
    calls: Mutex<Vec<Call>>,
    fail_with: Mutex<Option<ApiError>>,
    fail_writes: Mutex<Option<ApiError>>,
}

impl FakeAttendance {
    pub fn with_logs(logs: Vec<AttendanceLog>) -> Self {
        Self {
            logs: Mutex::new(logs),
            ..Self::default()
        }
    }

    /// Every later call fails with `error`.
    pub fn failing(error: ApiError) -> Self {
        Self {
            fail_with: Mutex::new(Some(error)),
            ..Self::default()
        }
    }

    /// Reads succeed; every create or update fails with `error`.
    pub fn failing_writes(logs: Vec<AttendanceLog>, error: ApiError) -> Self {
        Self {
            logs: Mutex::new(logs),
            fail_writes: Mutex::new(Some(error)),
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::Fetch(_)))
            .collect()
    }

    pub fn logs(&self) -> Vec<AttendanceLog> {
        self.logs.lock().unwrap().clone()
    }

    fn record(&self, call: Call) -> Result<(), ApiError> {
        let is_write = !matches!(call, Call::Fetch(_));
        self.calls.lock().unwrap().push(call);

        let mut failure = self.fail_with.lock().unwrap().clone();
        if is_write && failure.is_none() {
            failure = self.fail_writes.lock().unwrap().clone();
        }
        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl AttendanceApi for FakeAttendance {
    async fn logs_for_date(&self, date: NaiveDate) -> Result<Vec<AttendanceLog>, ApiError> {
        self.record(Call::Fetch(date))?;
        Ok(self.logs())
    }

    async fn create_check_in(&self, body: &CheckIn) -> Result<(), ApiError> {
        self.record(Call::Create(body.clone()))?;
        let mut logs = self.logs.lock().unwrap();
        let id = format!("log{}", logs.len() + 1);
        logs.push(AttendanceLog {
            id,
            student: Some(StudentRef::Id(body.student.clone())),
            date: body.date.clone(),
            time_in: Some(body.time_in.clone()),
            time_out: None,
            status: body.status,
        });
        Ok(())
    }

    async fn check_in_existing(&self, log_id: &str, body: &CheckIn) -> Result<(), ApiError> {
        self.record(Call::CheckInExisting(log_id.to_string(), body.clone()))?;
        if let Some(log) = self.logs.lock().unwrap().iter_mut().find(|l| l.id == log_id) {
            log.time_in = Some(body.time_in.clone());
            log.status = body.status;
        }
        Ok(())
    }

    async fn check_out(&self, log_id: &str, body: &CheckOut) -> Result<(), ApiError> {
        self.record(Call::CheckOut(log_id.to_string(), body.clone()))?;
        if let Some(log) = self.logs.lock().unwrap().iter_mut().find(|l| l.id == log_id) {
            log.time_out = Some(body.time_out.clone());
        }
        Ok(())
    }
}

/// A log for `student` on `date` in the given state.
pub fn log(
    id: &str,
    student: &str,
    date: &str,
    time_in: Option<&str>,
    time_out: Option<&str>,
    status: AttendanceStatus,
) -> AttendanceLog {
    AttendanceLog {
        id: id.to_string(),
        student: Some(StudentRef::Id(student.to_string())),
        date: date.to_string(),
        time_in: time_in.map(str::to_string),
        time_out: time_out.map(str::to_string),
        status,
    }
}
