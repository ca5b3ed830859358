use actix_multipart::form::{MultipartForm, bytes::Bytes as FileBytes, text::Text};
use actix_session::Session;
use actix_web::{HttpResponse, web};

use crate::api::{ApiClient, Backend};
use crate::auth::csrf;
use crate::auth::session::{self, require_permission, set_flash};
use crate::config::AppConfig;
use crate::errors::{AppError, redirect, render};
use crate::handlers::auth_handlers::CsrfOnly;
use crate::handlers::{ListQuery, list_href, list_or_flash, write_failed};
use crate::models::pagination::paginate;
use crate::models::payment::{
    self, BulkPaymentForm, PAYMENT_STATUSES, PAYMENT_TYPES, Payment, PaymentForm, PaymentSummary,
    receipt_href,
};
use crate::models::user;
use crate::templates_structs::{
    BulkPaymentTemplate, MyPaymentsTemplate, PageContext, PaymentFormTemplate,
    PaymentListTemplate, ReceiptTemplate, ReceiptUploadTemplate,
};

const PER_PAGE: usize = 10;

pub async fn list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/payments").await?;
    let backend = session::backend(&api, &session);
    let all = list_or_flash(payment::find_all(&backend).await, &mut ctx, "Failed to load payments")?;
    let summary = PaymentSummary::from_payments(&all);

    let search = query.search();
    let status_filter = query.status();
    let needle = search.to_lowercase();
    let matching: Vec<Payment> = all
        .into_iter()
        .filter(|p| status_filter.is_empty() || p.status == status_filter)
        .filter(|p| needle.is_empty() || p.student_name().to_lowercase().contains(&needle))
        .collect();

    let page = paginate(matching, query.page(), PER_PAGE);
    let pager = page.pager(&list_href("/payments", &[("q", &search), ("status", &status_filter)]));

    render(PaymentListTemplate {
        ctx,
        payments: page.items,
        pager,
        summary,
        status_filter,
        search,
        statuses: PAYMENT_STATUSES.to_vec(),
    })
}

async fn form_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    form_action: String,
    form_title: &str,
    form: PaymentForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, api, config, "/payments").await?;
    let students = user::find_students(&session::backend(api, session)).await.unwrap_or_default();
    render(PaymentFormTemplate {
        ctx,
        form_action,
        form_title: form_title.to_string(),
        form,
        students,
        types: PAYMENT_TYPES.to_vec(),
        statuses: PAYMENT_STATUSES.to_vec(),
        errors,
    })
}

async fn find_payment(backend: &Backend, id: &str) -> Result<Payment, AppError> {
    payment::find_all(backend)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or(AppError::NotFound)
}

pub async fn new_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;
    let form = PaymentForm::new_payment();
    form_page(&api, &config, &session, "/payments".into(), "Add Payment", form, vec![]).await
}

pub async fn create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    form: web::Form<PaymentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match payment::create(&session::backend(&api, &session), &input).await {
            Ok(()) => {
                log::info!("Payment of {} created for {}", input.amount, input.student);
                set_flash(&session, "Payment added successfully");
                return Ok(redirect("/payments"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save payment")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, "/payments".into(), "Add Payment", form, errors).await
}

pub async fn edit_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;

    let id = path.into_inner();
    let existing = find_payment(&session::backend(&api, &session), &id).await?;
    let form = PaymentForm::from_payment(&existing);
    form_page(&api, &config, &session, format!("/payments/{id}"), "Edit Payment", form, vec![]).await
}

pub async fn update(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<PaymentForm>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    let form = form.into_inner();
    let errors = match form.validate() {
        Ok(input) => match payment::update(&session::backend(&api, &session), &id, &input).await {
            Ok(()) => {
                log::info!("Payment {id} updated");
                set_flash(&session, "Payment updated successfully");
                return Ok(redirect("/payments"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to save payment")],
        },
        Err(errors) => errors,
    };

    form_page(&api, &config, &session, format!("/payments/{id}"), "Edit Payment", form, errors).await
}

pub async fn delete(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match payment::delete(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Payment {id} deleted");
            set_flash(&session, "Payment deleted successfully");
        }
        Err(e) => write_failed(&session, e, "Failed to delete payment")?,
    }
    Ok(redirect("/payments"))
}

async fn bulk_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    form: BulkPaymentForm,
    errors: Vec<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, api, config, "/payments").await?;
    let students = user::find_students(&session::backend(api, session)).await.unwrap_or_default();
    render(BulkPaymentTemplate {
        ctx,
        form,
        students,
        types: PAYMENT_TYPES.to_vec(),
        errors,
    })
}

pub async fn bulk_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;
    bulk_page(&api, &config, &session, BulkPaymentForm::blank(), vec![]).await
}

pub async fn bulk_create(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    pairs: web::Form<Vec<(String, String)>>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;

    let form = BulkPaymentForm::from_pairs(pairs.into_inner());
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let errors = match form.validate() {
        Ok(rows) => match payment::create_bulk(&session::backend(&api, &session), &rows).await {
            Ok(()) => {
                log::info!("{} payments created in bulk", rows.len());
                set_flash(&session, format!("{} payments added successfully", rows.len()));
                return Ok(redirect("/payments"));
            }
            Err(e) if e.is_unauthorized() => return Err(e.into()),
            Err(e) => vec![e.user_message("Failed to create payments")],
        },
        Err(errors) => errors,
    };

    bulk_page(&api, &config, &session, form, errors).await
}

pub async fn receipt(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;

    let payment = find_payment(&session::backend(&api, &session), &path.into_inner()).await?;
    let receipt_href = payment.receipt().map(|r| receipt_href(api.base_url(), r));
    let ctx = PageContext::build(&session, &api, &config, "/payments").await?;
    render(ReceiptTemplate { ctx, payment, receipt_href })
}

pub async fn mark_paid(
    api: web::Data<ApiClient>,
    session: Session,
    path: web::Path<String>,
    form: web::Form<CsrfOnly>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.manage")?;
    csrf::validate_csrf(&session, &form.csrf_token)?;

    let id = path.into_inner();
    match payment::mark_paid(&session::backend(&api, &session), &id).await {
        Ok(()) => {
            log::info!("Payment {id} marked as paid");
            set_flash(&session, "Payment marked as paid");
        }
        Err(e) => write_failed(&session, e, "Failed to update payment")?,
    }
    Ok(redirect("/payments"))
}

pub async fn my_list(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    query: web::Query<ListQuery>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.own")?;

    let mut ctx = PageContext::build(&session, &api, &config, "/my-payments").await?;
    let backend = session::backend(&api, &session);
    let all = list_or_flash(payment::find_mine(&backend).await, &mut ctx, "Failed to load your payments")?;
    let summary = PaymentSummary::from_payments(&all);

    let page = paginate(all, query.page(), PER_PAGE);
    let pager = page.pager("/my-payments");
    render(MyPaymentsTemplate { ctx, payments: page.items, pager, summary })
}

async fn find_my_payment(backend: &Backend, id: &str) -> Result<Payment, AppError> {
    payment::find_mine(backend)
        .await?
        .into_iter()
        .find(|p| p.id == id)
        .ok_or(AppError::NotFound)
}

async fn upload_page(
    api: &ApiClient,
    config: &AppConfig,
    session: &Session,
    payment: Payment,
    link: String,
    error: Option<String>,
) -> Result<HttpResponse, AppError> {
    let ctx = PageContext::build(session, api, config, "/my-payments").await?;
    render(ReceiptUploadTemplate { ctx, payment, link, error })
}

pub async fn upload_form(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.own")?;

    let payment = find_my_payment(&session::backend(&api, &session), &path.into_inner()).await?;
    if !payment.accepts_receipt() {
        set_flash(&session, "This payment is not awaiting a receipt");
        return Ok(redirect("/my-payments"));
    }
    upload_page(&api, &config, &session, payment, String::new(), None).await
}

/// Receipt submission: an image or PDF file, or a link to one.
#[derive(MultipartForm)]
pub struct ReceiptUpload {
    pub csrf_token: Text<String>,
    #[multipart(limit = "10MB")]
    pub receipt_image: Option<FileBytes>,
    pub receipt_url: Option<Text<String>>,
}

/// What the student submitted, once empty inputs are discarded.
enum Receipt {
    File { name: String, content_type: String, bytes: Vec<u8> },
    Link(String),
}

fn accepted_type(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type == "application/pdf"
}

fn read_receipt(upload: ReceiptUpload) -> Result<Receipt, String> {
    if let Some(file) = upload.receipt_image.filter(|f| !f.data.is_empty()) {
        let content_type = file
            .content_type
            .as_ref()
            .map(|m| m.essence_str().to_string())
            .unwrap_or_default();
        if !accepted_type(&content_type) {
            return Err("Please upload an image or PDF file.".to_string());
        }
        return Ok(Receipt::File {
            name: file.file_name.unwrap_or_else(|| "receipt".to_string()),
            content_type,
            bytes: file.data.to_vec(),
        });
    }

    match upload.receipt_url.map(|t| t.into_inner().trim().to_string()) {
        Some(link) if !link.is_empty() => Ok(Receipt::Link(link)),
        _ => Err("Please select an image file or paste a link.".to_string()),
    }
}

pub async fn upload_submit(
    api: web::Data<ApiClient>,
    config: web::Data<AppConfig>,
    session: Session,
    path: web::Path<String>,
    MultipartForm(upload): MultipartForm<ReceiptUpload>,
) -> Result<HttpResponse, AppError> {
    require_permission(&session, "payments.own")?;
    csrf::validate_csrf(&session, &upload.csrf_token)?;

    let id = path.into_inner();
    let backend = session::backend(&api, &session);
    let typed_link = upload
        .receipt_url
        .as_ref()
        .map(|t| t.trim().to_string())
        .unwrap_or_default();

    let error = match read_receipt(upload) {
        Err(e) => e,
        Ok(receipt) => {
            let result = match receipt {
                Receipt::File { name, content_type, bytes } => {
                    payment::submit_receipt_file(&backend, &id, name, &content_type, bytes).await
                }
                Receipt::Link(link) => payment::submit_receipt_link(&backend, &id, &link).await,
            };
            match result {
                Ok(()) => {
                    log::info!("Receipt submitted for payment {id}");
                    set_flash(&session, "Receipt submitted. It will be verified by the administration.");
                    return Ok(redirect("/my-payments"));
                }
                Err(e) if e.is_unauthorized() => return Err(e.into()),
                Err(e) => e.user_message("Failed to submit receipt"),
            }
        }
    };

    let payment = find_my_payment(&backend, &id).await?;
    upload_page(&api, &config, &session, payment, typed_link, Some(error)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_images_and_pdfs_are_accepted() {
        assert!(accepted_type("image/png"));
        assert!(accepted_type("application/pdf"));
        assert!(!accepted_type("text/html"));
        assert!(!accepted_type(""));
    }

    #[test]
    fn empty_submission_is_rejected_locally() {
        let upload = ReceiptUpload {
            csrf_token: Text("t".to_string()),
            receipt_image: None,
            receipt_url: Some(Text("   ".to_string())),
        };
        assert_eq!(
            read_receipt(upload).err().as_deref(),
            Some("Please select an image file or paste a link.")
        );
    }
}
