//! QR check-in/check-out.
//!
//! Students show a QR code carrying `{id, name, room}`; the operator's scan is
//! reconciled against today's attendance logs:
//!
//! ```text
//! no log / no timeIn  --scan-->  POST/PUT timeIn   (CHECKED_IN)
//! timeIn, no timeOut  --scan-->  PUT timeOut       (CHECKED_IN_OUT)
//! timeIn and timeOut  --scan-->  no request, "already checked in and out"
//! ```
//!
//! Two operators scanning the same student at the same moment can both see
//! "no log" and create two check-ins; the backend owns uniqueness.

pub mod reconcile;
pub mod scan;

pub use reconcile::{AttendanceApi, ScanAction, ScanDecision, ScanOutcome, decide, process_scan};
pub use scan::{ScanError, ScanPayload};
