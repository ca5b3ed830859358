use serde::{Deserialize, Serialize};

use crate::auth::validate;
use crate::models::common::{
    StudentRef, capitalize, date_input_value, format_date, format_php, id_string, lenient_f64,
};

pub const PAYMENT_TYPES: [&str; 4] = ["rent", "utilities", "deposit", "other"];
pub const PAYMENT_STATUSES: [&str; 5] = ["pending", "submitted", "paid", "verified", "overdue"];

fn default_type() -> String {
    "rent".to_string()
}

fn default_status() -> String {
    "pending".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    #[serde(rename = "_id", alias = "id", deserialize_with = "id_string")]
    pub id: String,
    #[serde(default)]
    pub student: Option<StudentRef>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(default = "default_type", rename = "type")]
    pub payment_type: String,
    #[serde(default, rename = "dueDate", alias = "due_date")]
    pub due_date: String,
    #[serde(default = "default_status")]
    pub status: String,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, rename = "receiptUrl", alias = "receipt_url")]
    pub receipt_url: Option<String>,
    #[serde(default, rename = "paidDate", alias = "paid_date")]
    pub paid_date: Option<String>,
}

impl Payment {
    pub fn amount_display(&self) -> String {
        format_php(self.amount)
    }

    pub fn due_display(&self) -> String {
        format_date(&self.due_date)
    }

    pub fn due_input(&self) -> String {
        date_input_value(&self.due_date)
    }

    pub fn type_label(&self) -> String {
        capitalize(&self.payment_type)
    }

    pub fn status_label(&self) -> String {
        match self.status.as_str() {
            "submitted" => "Awaiting Approval".to_string(),
            other => capitalize(other),
        }
    }

    pub fn status_class(&self) -> &'static str {
        match self.status.as_str() {
            "paid" | "verified" => "success",
            "submitted" => "info",
            "overdue" => "danger",
            _ => "warning",
        }
    }

    pub fn student_id(&self) -> String {
        self.student.as_ref().map(|s| s.id().to_string()).unwrap_or_default()
    }

    pub fn student_name(&self) -> String {
        self.student
            .as_ref()
            .map(StudentRef::display_name)
            .unwrap_or_else(|| "Unknown".to_string())
    }

    pub fn notes_display(&self) -> String {
        self.notes.clone().unwrap_or_default()
    }

    pub fn receipt(&self) -> Option<&str> {
        self.receipt_url.as_deref().filter(|r| !r.trim().is_empty())
    }

    pub fn receipt_is_pdf(&self) -> bool {
        self.receipt()
            .is_some_and(|r| r.to_lowercase().ends_with(".pdf"))
    }

    /// Students may submit a receipt only while the payment is outstanding.
    pub fn accepts_receipt(&self) -> bool {
        matches!(self.status.as_str(), "pending" | "overdue")
    }

    pub fn is_outstanding(&self) -> bool {
        self.accepts_receipt()
    }
}

/// Resolve a stored receipt path against the backend, leaving absolute
/// links untouched.
pub fn receipt_href(base_url: &str, receipt: &str) -> String {
    if receipt.starts_with("http://") || receipt.starts_with("https://") {
        receipt.to_string()
    } else if receipt.starts_with('/') {
        format!("{base_url}{receipt}")
    } else {
        format!("{base_url}/{receipt}")
    }
}

/// Body of `POST /api/payments` and `PUT /api/payments/{id}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub student: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub due_date: String,
    pub status: String,
    pub notes: String,
    pub receipt_url: String,
}

/// One row of `POST /api/payments/bulk`.
#[derive(Debug, Clone, Serialize)]
pub struct BulkPaymentRow {
    pub student_id: String,
    pub amount: f64,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub due_date: String,
    pub status: String,
    pub notes: String,
    #[serde(rename = "receiptUrl")]
    pub receipt_url: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaymentSummary {
    pub total: f64,
    pub pending: usize,
    pub overdue: usize,
    pub awaiting_approval: usize,
}

impl PaymentSummary {
    pub fn from_payments(payments: &[Payment]) -> Self {
        let count = |s: &str| payments.iter().filter(|p| p.status == s).count();
        Self {
            total: payments.iter().map(|p| p.amount).sum(),
            pending: count("pending"),
            overdue: count("overdue"),
            awaiting_approval: count("submitted"),
        }
    }

    pub fn total_display(&self) -> String {
        format_php(self.total)
    }
}

/// Admin payment editor form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentForm {
    pub student: String,
    pub amount: String,
    #[serde(rename = "type")]
    pub payment_type: String,
    pub due_date: String,
    pub status: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub receipt_url: String,
    #[serde(default)]
    pub csrf_token: String,
}

impl PaymentForm {
    pub fn new_payment() -> Self {
        Self {
            payment_type: default_type(),
            status: default_status(),
            ..Self::default()
        }
    }

    pub fn from_payment(p: &Payment) -> Self {
        Self {
            student: p.student_id(),
            amount: format!("{:.2}", p.amount),
            payment_type: p.payment_type.clone(),
            due_date: p.due_input(),
            status: p.status.clone(),
            notes: p.notes.clone().unwrap_or_default(),
            receipt_url: p.receipt_url.clone().unwrap_or_default(),
            csrf_token: String::new(),
        }
    }

    pub fn validate(&self) -> Result<PaymentInput, Vec<String>> {
        let mut errors = Vec::new();
        errors.extend(validate::validate_required(&self.student, "Student", 64));
        let amount = validate::parse_amount(&self.amount, "Amount").unwrap_or_else(|e| {
            errors.push(e);
            0.0
        });
        errors.extend(validate::validate_date(&self.due_date, "Due date"));
        errors.extend(validate::validate_choice(&self.payment_type, "Type", &PAYMENT_TYPES));
        errors.extend(validate::validate_choice(&self.status, "Status", &PAYMENT_STATUSES));
        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(PaymentInput {
            student: self.student.trim().to_string(),
            amount,
            payment_type: self.payment_type.clone(),
            due_date: self.due_date.trim().to_string(),
            status: self.status.clone(),
            notes: self.notes.trim().to_string(),
            receipt_url: self.receipt_url.trim().to_string(),
        })
    }
}

/// One row of the bulk payment editor, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkRowForm {
    pub student: String,
    pub amount: String,
    pub payment_type: String,
    pub due_date: String,
    pub status: String,
    pub notes: String,
}

impl BulkRowForm {
    fn is_blank(&self) -> bool {
        self.student.trim().is_empty()
            && self.amount.trim().is_empty()
            && self.due_date.trim().is_empty()
    }
}

/// The bulk editor posts its rows as repeated `student`, `amount`, `type`,
/// `due_date`, `status` and `notes` keys; a `student` key starts a new row.
#[derive(Debug, Clone, Default)]
pub struct BulkPaymentForm {
    pub rows: Vec<BulkRowForm>,
    pub csrf_token: String,
}

pub const BULK_BLANK_ROWS: usize = 5;

impl BulkPaymentForm {
    pub fn blank() -> Self {
        let row = BulkRowForm {
            payment_type: default_type(),
            status: default_status(),
            ..BulkRowForm::default()
        };
        Self {
            rows: vec![row; BULK_BLANK_ROWS],
            csrf_token: String::new(),
        }
    }

    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut form = Self::default();
        for (key, value) in pairs {
            if key == "csrf_token" {
                form.csrf_token = value;
                continue;
            }
            if key == "student" || form.rows.is_empty() {
                form.rows.push(BulkRowForm::default());
            }
            let Some(row) = form.rows.last_mut() else { continue };
            match key.as_str() {
                "student" => row.student = value,
                "amount" => row.amount = value,
                "type" => row.payment_type = value,
                "due_date" => row.due_date = value,
                "status" => row.status = value,
                "notes" => row.notes = value,
                _ => {}
            }
        }
        form
    }

    /// Every non-blank row must have a student, an amount and a due date.
    pub fn validate(&self) -> Result<Vec<BulkPaymentRow>, Vec<String>> {
        let mut errors = Vec::new();
        let mut rows = Vec::new();
        for (i, row) in self.rows.iter().enumerate().filter(|(_, r)| !r.is_blank()) {
            let n = i + 1;
            if row.student.trim().is_empty() || row.amount.trim().is_empty() || row.due_date.trim().is_empty() {
                errors.push(format!("Row {n}: student, amount and due date are required"));
                continue;
            }
            let amount = match validate::parse_amount(&row.amount, "Amount") {
                Ok(a) => a,
                Err(e) => {
                    errors.push(format!("Row {n}: {e}"));
                    continue;
                }
            };
            if let Some(e) = validate::validate_date(&row.due_date, "Due date") {
                errors.push(format!("Row {n}: {e}"));
                continue;
            }
            let payment_type = if PAYMENT_TYPES.contains(&row.payment_type.as_str()) {
                row.payment_type.clone()
            } else {
                default_type()
            };
            let status = if PAYMENT_STATUSES.contains(&row.status.as_str()) {
                row.status.clone()
            } else {
                default_status()
            };
            rows.push(BulkPaymentRow {
                student_id: row.student.trim().to_string(),
                amount,
                payment_type,
                due_date: row.due_date.trim().to_string(),
                status,
                notes: row.notes.trim().to_string(),
                receipt_url: String::new(),
            });
        }
        if errors.is_empty() && rows.is_empty() {
            errors.push("Add at least one payment".to_string());
        }
        if errors.is_empty() { Ok(rows) } else { Err(errors) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment(status: &str, amount: f64) -> Payment {
        Payment {
            id: "p1".into(),
            student: None,
            amount,
            payment_type: default_type(),
            due_date: "2026-10-01".into(),
            status: status.into(),
            notes: None,
            receipt_url: None,
            paid_date: None,
        }
    }

    #[test]
    fn summary_counts_by_status() {
        let list = vec![
            payment("pending", 1000.0),
            payment("overdue", 500.0),
            payment("submitted", 250.5),
            payment("paid", 100.0),
        ];
        let s = PaymentSummary::from_payments(&list);
        assert_eq!(s.pending, 1);
        assert_eq!(s.overdue, 1);
        assert_eq!(s.awaiting_approval, 1);
        assert_eq!(s.total_display(), "₱1,850.50");
    }

    #[test]
    fn only_outstanding_payments_take_receipts() {
        assert!(payment("pending", 1.0).accepts_receipt());
        assert!(payment("overdue", 1.0).accepts_receipt());
        assert!(!payment("submitted", 1.0).accepts_receipt());
        assert!(!payment("paid", 1.0).accepts_receipt());
    }

    #[test]
    fn populated_student_and_text_amount() {
        let p: Payment = serde_json::from_str(
            r#"{"_id":"p9","student":{"_id":"s1","name":"Jane Doe"},"amount":"1200",
                "type":"utilities","dueDate":"2026-11-05T00:00:00.000Z","status":"submitted",
                "receiptUrl":"/uploads/r.PDF"}"#,
        )
        .unwrap();
        assert_eq!(p.student_name(), "Jane Doe");
        assert_eq!(p.student_id(), "s1");
        assert_eq!(p.amount_display(), "₱1,200.00");
        assert_eq!(p.due_input(), "2026-11-05");
        assert_eq!(p.status_label(), "Awaiting Approval");
        assert!(p.receipt_is_pdf());
    }

    #[test]
    fn receipt_links_resolve_against_backend() {
        let base = "http://api.local";
        assert_eq!(receipt_href(base, "/uploads/a.png"), "http://api.local/uploads/a.png");
        assert_eq!(receipt_href(base, "uploads/a.png"), "http://api.local/uploads/a.png");
        assert_eq!(receipt_href(base, "https://x.io/a"), "https://x.io/a");
    }

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn bulk_rows_are_grouped_by_student_key() {
        let form = BulkPaymentForm::from_pairs(pairs(&[
            ("csrf_token", "t"),
            ("student", "u1"), ("amount", "1500"), ("type", "rent"), ("due_date", "2026-11-01"), ("status", "pending"), ("notes", ""),
            ("student", ""), ("amount", ""), ("type", "rent"), ("due_date", ""), ("status", "pending"), ("notes", ""),
            ("student", "u2"), ("amount", "300"), ("type", "utilities"), ("due_date", "2026-11-05"), ("status", "pending"), ("notes", "water"),
        ]));
        assert_eq!(form.csrf_token, "t");
        assert_eq!(form.rows.len(), 3);
        let rows = form.validate().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].student_id, "u2");
        assert_eq!(rows[1].payment_type, "utilities");
    }

    #[test]
    fn bulk_partial_row_is_an_error() {
        let form = BulkPaymentForm::from_pairs(pairs(&[
            ("student", "u1"), ("amount", ""), ("due_date", "2026-11-01"),
        ]));
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Row 1: student, amount and due date are required".to_string()]
        );
        assert_eq!(
            BulkPaymentForm::blank().validate().unwrap_err(),
            vec!["Add at least one payment".to_string()]
        );
    }

    #[test]
    fn payment_form_requires_positive_amount() {
        let form = PaymentForm {
            student: "u1".into(),
            amount: "0".into(),
            due_date: "2026-11-01".into(),
            ..PaymentForm::new_payment()
        };
        assert_eq!(
            form.validate().unwrap_err(),
            vec!["Amount must be a number greater than zero".to_string()]
        );
    }
}
