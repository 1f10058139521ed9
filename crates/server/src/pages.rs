use crate::admin;
use crate::metrics::inc_verification;
use crate::state::AppState;
use crate::views::{self, CertificateFields};
use axum::Form;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use certverify_common::error::CertError;
use certverify_common::models::{CreateCertificate, CreateSigner, UpdateCertificate};
use certverify_common::state::RecordKind;
use certverify_common::verification::{self, Verification};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

const CERTIFICATE_SAVE_FAILED: &str = "Gagal menyimpan sertifikat. Pastikan nomor sertifikat unik.";
const SIGNER_SAVE_FAILED: &str = "Gagal menyimpan penandatangan.";
const LOAD_FAILED: &str = "Gagal memuat data. Silakan coba lagi.";

type PageResult = std::result::Result<Response, Response>;

fn verification_status<T>(outcome: &Verification<T>) -> StatusCode {
    match outcome {
        Verification::Verified(_) => StatusCode::OK,
        Verification::NotFound => StatusCode::NOT_FOUND,
        Verification::Inactive => StatusCode::GONE,
    }
}

/// 管理页面的错误提示：校验失败显示具体原因，其余显示通用提示
fn admin_message(err: &CertError, fallback: &'static str) -> String {
    match err {
        CertError::Validation(_) | CertError::BadRequest(_) => err.to_string(),
        _ => fallback.to_string(),
    }
}

fn admin_status(err: &CertError) -> StatusCode {
    if err.is_server_error() {
        error!(error = %err, "admin action failed");
    }
    err.axum_status_code()
}

fn failure_response(err: &CertError) -> Response {
    let message = match err {
        CertError::NotFound(_) => "Data tidak ditemukan.".to_string(),
        _ => admin_message(err, LOAD_FAILED),
    };
    (admin_status(err), Html(views::admin_error_page(&message))).into_response()
}

fn parse_id(raw: &str) -> std::result::Result<Uuid, Response> {
    Uuid::parse_str(raw).map_err(|_| failure_response(&CertError::not_found(raw.to_string())))
}

pub async fn landing() -> Html<String> {
    Html(views::landing_page())
}

pub async fn admin_home() -> Redirect {
    Redirect::to("/admin/certificates")
}

// ============ 公开验证 ============

pub async fn verify_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match verification::verify_certificate(&state.store, &id).await {
        Ok(outcome) => {
            inc_verification(RecordKind::Certificate.as_str(), outcome.outcome());
            let page = views::certificate_verification_page(&outcome, &Utc::now().fixed_offset());
            (verification_status(&outcome), Html(page)).into_response()
        }
        Err(err) => {
            error!(error = %err, "certificate verification failed");
            inc_verification(RecordKind::Certificate.as_str(), "error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(views::verification_failure_page()),
            )
                .into_response()
        }
    }
}

pub async fn verify_signature(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    match verification::verify_signer(&state.store, &id).await {
        Ok(outcome) => {
            inc_verification(RecordKind::Signer.as_str(), outcome.outcome());
            let page = views::signer_verification_page(&outcome, &Utc::now().fixed_offset());
            (verification_status(&outcome), Html(page)).into_response()
        }
        Err(err) => {
            error!(error = %err, "signer verification failed");
            inc_verification(RecordKind::Signer.as_str(), "error");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Html(views::verification_failure_page()),
            )
                .into_response()
        }
    }
}

// ============ 证书管理 ============

#[derive(Debug, Deserialize)]
pub struct CertificateForm {
    pub no_sertifikat: String,
    pub nama_peserta: String,
    pub nama_kegiatan: String,
    #[serde(default)]
    pub tanggal_ditetapkan: String,
}

impl CertificateForm {
    fn issue_date(&self) -> Result<Option<NaiveDate>, CertError> {
        let raw = self.tanggal_ditetapkan.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| CertError::validation("tanggal_ditetapkan must be YYYY-MM-DD"))
    }

    fn fields(&self) -> CertificateFields {
        CertificateFields {
            no_sertifikat: self.no_sertifikat.clone(),
            nama_peserta: self.nama_peserta.clone(),
            nama_kegiatan: self.nama_kegiatan.clone(),
            tanggal_ditetapkan: self.tanggal_ditetapkan.clone(),
        }
    }
}

async fn certificate_table(state: &AppState) -> Result<std::sync::Arc<str>, CertError> {
    let cache = state.store.views();
    if let Some(cached) = cache.get(RecordKind::Certificate).await {
        return Ok(cached);
    }
    let generation = cache.generation(RecordKind::Certificate).await;
    let rows = state.store.list_certificates_with_signers().await?;
    let table = views::certificate_table(&rows);
    Ok(cache.put(RecordKind::Certificate, generation, table).await)
}

async fn render_certificates(
    state: &AppState,
    status: StatusCode,
    fields: &CertificateFields,
    error: Option<&str>,
) -> Response {
    match certificate_table(state).await {
        Ok(table) => (
            status,
            Html(views::certificates_page(&table, fields, error)),
        )
            .into_response(),
        Err(err) => failure_response(&err),
    }
}

pub async fn certificates_page(State(state): State<AppState>) -> Response {
    render_certificates(&state, StatusCode::OK, &CertificateFields::default(), None).await
}

pub async fn create_certificate(
    State(state): State<AppState>,
    Form(form): Form<CertificateForm>,
) -> Response {
    let result = match form.issue_date() {
        Ok(tanggal_ditetapkan) => {
            let input = CreateCertificate {
                no_sertifikat: form.no_sertifikat.clone(),
                nama_peserta: form.nama_peserta.clone(),
                nama_kegiatan: form.nama_kegiatan.clone(),
                tanggal_ditetapkan,
                pdf_url: None,
                signer_id: None,
                competency_units: None,
            };
            admin::submit_certificate(&state, input).await.map(|_| ())
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(()) => Redirect::to("/admin/certificates").into_response(),
        Err(err) => {
            let message = admin_message(&err, CERTIFICATE_SAVE_FAILED);
            render_certificates(&state, admin_status(&err), &form.fields(), Some(&message)).await
        }
    }
}

pub async fn edit_certificate_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    let id = parse_id(&id)?;
    let certificate = state
        .store
        .get_certificate(id)
        .await
        .map_err(|err| failure_response(&err))?
        .ok_or_else(|| failure_response(&CertError::not_found(format!("certificate {id}"))))?;
    let fields = CertificateFields::from(&certificate);
    Ok(Html(views::certificate_edit_page(&certificate, &fields, None)).into_response())
}

pub async fn update_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<CertificateForm>,
) -> PageResult {
    let id = parse_id(&id)?;
    let result = match form.issue_date() {
        Ok(tanggal_ditetapkan) => {
            let patch = UpdateCertificate {
                no_sertifikat: Some(form.no_sertifikat.clone()),
                nama_peserta: Some(form.nama_peserta.clone()),
                nama_kegiatan: Some(form.nama_kegiatan.clone()),
                // 表单留空表示不修改日期
                tanggal_ditetapkan: tanggal_ditetapkan.map(Some),
                ..Default::default()
            };
            admin::edit_certificate(&state, id, patch).await
        }
        Err(err) => Err(err),
    };

    match result {
        Ok(_) => Ok(Redirect::to("/admin/certificates").into_response()),
        Err(err @ CertError::NotFound(_)) => Err(failure_response(&err)),
        Err(err) => {
            let certificate = state
                .store
                .get_certificate(id)
                .await
                .map_err(|e| failure_response(&e))?
                .ok_or_else(|| {
                    failure_response(&CertError::not_found(format!("certificate {id}")))
                })?;
            let message = admin_message(&err, CERTIFICATE_SAVE_FAILED);
            Ok((
                admin_status(&err),
                Html(views::certificate_edit_page(
                    &certificate,
                    &form.fields(),
                    Some(&message),
                )),
            )
                .into_response())
        }
    }
}

pub async fn toggle_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    let id = parse_id(&id)?;
    admin::toggle_certificate(&state, id)
        .await
        .map_err(|err| failure_response(&err))?;
    Ok(Redirect::to("/admin/certificates").into_response())
}

pub async fn certificate_qr_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PageResult {
    let id = parse_id(&id)?;
    let qr = admin::certificate_qr(&state, id)
        .await
        .map_err(|err| failure_response(&err))?;
    Ok(Html(views::certificate_qr_page(&qr)).into_response())
}

// ============ 签署人管理 ============

async fn signer_table(state: &AppState) -> Result<std::sync::Arc<str>, CertError> {
    let cache = state.store.views();
    if let Some(cached) = cache.get(RecordKind::Signer).await {
        return Ok(cached);
    }
    let generation = cache.generation(RecordKind::Signer).await;
    let rows = state.store.list_signers().await?;
    let table = views::signer_table(&rows);
    Ok(cache.put(RecordKind::Signer, generation, table).await)
}

async fn render_signers(state: &AppState, status: StatusCode, error: Option<&str>) -> Response {
    match signer_table(state).await {
        Ok(table) => (status, Html(views::signers_page(&table, error))).into_response(),
        Err(err) => failure_response(&err),
    }
}

pub async fn signers_page(State(state): State<AppState>) -> Response {
    render_signers(&state, StatusCode::OK, None).await
}

pub async fn create_signer(
    State(state): State<AppState>,
    Form(form): Form<CreateSigner>,
) -> Response {
    match admin::submit_signer(&state, form).await {
        Ok(_) => Redirect::to("/admin/signers").into_response(),
        Err(err) => {
            let message = admin_message(&err, SIGNER_SAVE_FAILED);
            render_signers(&state, admin_status(&err), Some(&message)).await
        }
    }
}

pub async fn toggle_signer(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id)?;
    admin::toggle_signer(&state, id)
        .await
        .map_err(|err| failure_response(&err))?;
    Ok(Redirect::to("/admin/signers").into_response())
}

pub async fn signer_qr_page(State(state): State<AppState>, Path(id): Path<String>) -> PageResult {
    let id = parse_id(&id)?;
    let (signer, panel) = admin::signer_qr(&state, id)
        .await
        .map_err(|err| failure_response(&err))?;
    Ok(Html(views::signer_qr_page(&signer, &panel)).into_response())
}
