use askama::Template;

use crate::models::pagination::Pager;
use crate::models::payment::{BulkPaymentForm, Payment, PaymentForm, PaymentSummary};
use crate::models::user::Student;
use super::PageContext;

#[derive(Template)]
#[template(path = "payments/list.html")]
pub struct PaymentListTemplate {
    pub ctx: PageContext,
    pub payments: Vec<Payment>,
    pub pager: Pager,
    pub summary: PaymentSummary,
    pub status_filter: String,
    pub search: String,
    pub statuses: Vec<&'static str>,
}

#[derive(Template)]
#[template(path = "payments/form.html")]
pub struct PaymentFormTemplate {
    pub ctx: PageContext,
    pub form_action: String,
    pub form_title: String,
    pub form: PaymentForm,
    pub students: Vec<Student>,
    pub types: Vec<&'static str>,
    pub statuses: Vec<&'static str>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "payments/bulk.html")]
pub struct BulkPaymentTemplate {
    pub ctx: PageContext,
    pub form: BulkPaymentForm,
    pub students: Vec<Student>,
    pub types: Vec<&'static str>,
    pub errors: Vec<String>,
}

#[derive(Template)]
#[template(path = "payments/receipt.html")]
pub struct ReceiptTemplate {
    pub ctx: PageContext,
    pub payment: Payment,
    pub receipt_href: Option<String>,
}

#[derive(Template)]
#[template(path = "payments/mine.html")]
pub struct MyPaymentsTemplate {
    pub ctx: PageContext,
    pub payments: Vec<Payment>,
    pub pager: Pager,
    pub summary: PaymentSummary,
}

#[derive(Template)]
#[template(path = "payments/upload.html")]
pub struct ReceiptUploadTemplate {
    pub ctx: PageContext,
    pub payment: Payment,
    pub link: String,
    pub error: Option<String>,
}
