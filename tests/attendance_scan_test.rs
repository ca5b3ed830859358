//! QR scan reconciliation tests: one scan per state of the student's day,
//! against an in-memory attendance backend.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;

use dormsync::api::ApiError;
use dormsync::attendance::{ScanAction, ScanError, ScanOutcome, process_scan};
use dormsync::models::attendance::{AttendanceLog, AttendanceStatus, CheckIn, CheckOut};
use common::*;

const S100: &str = r#"{"id":"S100","name":"Ana Cruz","room":"101"}"#;

fn at(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 18, hour, minute, 0).unwrap()
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
}

#[tokio::test]
async fn test_three_scans_walk_the_day() {
    let api = FakeAttendance::default();

    let first = process_scan(&api, S100, at(8, 0)).await.unwrap();
    assert_eq!(
        first,
        ScanOutcome::Recorded { student_name: "Ana Cruz".into(), action: ScanAction::CheckIn }
    );
    assert_eq!(first.message(), "Check-In recorded for Ana Cruz");

    let second = process_scan(&api, S100, at(17, 30)).await.unwrap();
    assert_eq!(
        second,
        ScanOutcome::Recorded { student_name: "Ana Cruz".into(), action: ScanAction::CheckOut }
    );

    let third = process_scan(&api, S100, at(18, 0)).await.unwrap();
    assert_eq!(third, ScanOutcome::AlreadyRecorded { student_name: "Ana Cruz".into() });
    assert_eq!(third.title(), "Already Recorded");

    assert_eq!(
        api.writes(),
        vec![
            Call::Create(CheckIn {
                student: "S100".into(),
                date: "2026-10-18".into(),
                status: AttendanceStatus::Present,
                time_in: "2026-10-18T08:00:00.000Z".into(),
            }),
            Call::CheckOut(
                "log1".into(),
                CheckOut {
                    student: "S100".into(),
                    date: "2026-10-18".into(),
                    time_out: "2026-10-18T17:30:00.000Z".into(),
                }
            ),
        ]
    );

    // Every scan re-reads today's logs.
    let fetches = api.calls().iter().filter(|c| matches!(c, Call::Fetch(_))).count();
    assert_eq!(fetches, 3);
    assert!(api.calls().contains(&Call::Fetch(today())));
}

#[tokio::test]
async fn test_invalid_payloads_make_no_requests() {
    let api = FakeAttendance::default();

    let missing = process_scan(&api, r#"{"name":"Ana Cruz"}"#, at(8, 0)).await.unwrap_err();
    assert_eq!(missing, ScanError::MissingId);
    assert_eq!(missing.message(), "Invalid QR Code: Missing ID");

    let blank_id = process_scan(&api, r#"{"id":"  "}"#, at(8, 0)).await.unwrap_err();
    assert_eq!(blank_id, ScanError::MissingId);

    let garbage = process_scan(&api, "not json", at(8, 0)).await.unwrap_err();
    assert!(matches!(garbage, ScanError::Malformed(_)));
    assert!(garbage.is_local());

    let empty = process_scan(&api, "   ", at(8, 0)).await.unwrap_err();
    assert_eq!(empty, ScanError::Empty);

    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn test_absent_record_is_updated_not_duplicated() {
    let api = FakeAttendance::with_logs(vec![log(
        "a1",
        "S100",
        "2026-10-18",
        None,
        None,
        AttendanceStatus::Absent,
    )]);

    let outcome = process_scan(&api, S100, at(7, 45)).await.unwrap();
    assert_eq!(
        outcome,
        ScanOutcome::Recorded { student_name: "Ana Cruz".into(), action: ScanAction::CheckIn }
    );

    let writes = api.writes();
    assert_eq!(writes.len(), 1);
    match &writes[0] {
        Call::CheckInExisting(id, body) => {
            assert_eq!(id, "a1");
            assert_eq!(body.status, AttendanceStatus::Present);
            assert_eq!(body.time_in, "2026-10-18T07:45:00.000Z");
        }
        other => panic!("expected an update of the absent record, got {other:?}"),
    }

    let logs = api.logs();
    assert_eq!(logs.len(), 1);
    assert!(logs[0].has_time_in());
}

#[tokio::test]
async fn test_name_falls_back_to_log_then_id() {
    let populated: AttendanceLog = serde_json::from_value(json!({
        "_id": "l7",
        "student": {
            "_id": "S200",
            "name": "Ben Reyes",
            "studentProfile": { "roomNumber": "204" }
        },
        "date": "2026-10-18",
        "timeIn": "2026-10-18T08:10:00.000Z",
        "status": "present"
    }))
    .unwrap();
    let api = FakeAttendance::with_logs(vec![populated]);

    let outcome = process_scan(&api, r#"{"id":"S200"}"#, at(16, 0)).await.unwrap();
    assert_eq!(
        outcome,
        ScanOutcome::Recorded { student_name: "Ben Reyes".into(), action: ScanAction::CheckOut }
    );

    let unknown = process_scan(&api, r#"{"id": 12345}"#, at(16, 5)).await.unwrap();
    assert_eq!(
        unknown,
        ScanOutcome::Recorded { student_name: "12345".into(), action: ScanAction::CheckIn }
    );
}

#[tokio::test]
async fn test_other_students_logs_are_ignored() {
    let api = FakeAttendance::with_logs(vec![log(
        "x1",
        "S999",
        "2026-10-18",
        Some("2026-10-18T07:00:00.000Z"),
        Some("2026-10-18T15:00:00.000Z"),
        AttendanceStatus::Present,
    )]);

    let outcome = process_scan(&api, S100, at(8, 0)).await.unwrap();
    assert!(matches!(outcome, ScanOutcome::Recorded { action: ScanAction::CheckIn, .. }));
    assert!(matches!(api.writes()[0], Call::Create(_)));
}

#[tokio::test]
async fn test_backend_message_is_shown_verbatim() {
    let api = FakeAttendance::failing(ApiError::Status {
        status: 500,
        message: Some("Database unavailable".into()),
        code: None,
    });

    let err = process_scan(&api, S100, at(8, 0)).await.unwrap_err();
    assert!(!err.is_local());
    assert_eq!(err.message(), "Database unavailable");
    assert!(api.writes().is_empty());
}

#[tokio::test]
async fn test_orphaned_log_is_skipped() {
    let orphan: AttendanceLog = serde_json::from_value(json!({
        "_id": "gone",
        "student": null,
        "date": "2026-10-18",
        "status": "absent"
    }))
    .unwrap();
    let open = log(
        "a1",
        "S100",
        "2026-10-18",
        Some("2026-10-18T08:00:00.000Z"),
        None,
        AttendanceStatus::Present,
    );
    let api = FakeAttendance::with_logs(vec![orphan, open]);

    let outcome = process_scan(&api, S100, at(17, 0)).await.unwrap();
    assert_eq!(
        outcome,
        ScanOutcome::Recorded { student_name: "Ana Cruz".into(), action: ScanAction::CheckOut }
    );
    assert!(matches!(&api.writes()[..], [Call::CheckOut(id, _)] if id == "a1"));
}

#[tokio::test]
async fn test_rejected_check_in_is_not_reported_as_recorded() {
    let api = FakeAttendance::failing_writes(
        vec![],
        ApiError::Status {
            status: 422,
            message: Some("Student is not enrolled".into()),
            code: None,
        },
    );

    let err = process_scan(&api, S100, at(8, 0)).await.unwrap_err();
    assert!(!err.is_local());
    assert_eq!(err.message(), "Student is not enrolled");
    assert_eq!(api.writes().len(), 1);
    assert!(api.logs().is_empty());
}

#[tokio::test]
async fn test_rejected_check_out_leaves_the_log_open() {
    let api = FakeAttendance::failing_writes(
        vec![log(
            "a1",
            "S100",
            "2026-10-18",
            Some("2026-10-18T08:00:00.000Z"),
            None,
            AttendanceStatus::Present,
        )],
        ApiError::Status { status: 500, message: None, code: None },
    );

    let err = process_scan(&api, S100, at(17, 0)).await.unwrap_err();
    assert_eq!(err.message(), "Request failed with status code 500");
    assert!(matches!(&api.writes()[..], [Call::CheckOut(..)]));
    assert!(!api.logs()[0].has_time_out());
}
