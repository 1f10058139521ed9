//! 管理端流程
//!
//! HTML 页面与 JSON 接口共用：校验输入、写入存储、生成二维码。

use crate::state::AppState;
use certverify_common::entities::{certificates, signers};
use certverify_common::error::{CertError, Result};
use certverify_common::links::download_filename;
use certverify_common::models::{CreateCertificate, CreateSigner, UpdateCertificate, UpdateSigner};
use certverify_common::qr::{self, QrImage};
use certverify_common::validation::{
    into_result, validate_create_certificate, validate_create_signer, validate_update_certificate,
    validate_update_signer,
};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// 单个二维码及其下载信息
#[derive(Debug, Clone)]
pub struct QrPanel {
    pub verification_url: String,
    pub image: QrImage,
    pub filename: String,
}

impl QrPanel {
    fn encode(state: &AppState, verification_url: String, filename: String) -> Result<Self> {
        let image = qr::encode_png(&verification_url, &state.qr)?;
        Ok(Self {
            verification_url,
            image,
            filename,
        })
    }

    pub fn summary(&self) -> QrSummary {
        QrSummary {
            verification_url: self.verification_url.clone(),
            filename: self.filename.clone(),
            data_url: self.image.data_url(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QrSummary {
    pub verification_url: String,
    pub filename: String,
    pub data_url: String,
}

/// 证书二维码页面所需数据：证书码与签署人码
#[derive(Debug, Clone)]
pub struct CertificateQr {
    pub certificate: certificates::Model,
    pub certificate_qr: QrPanel,
    pub signer: signers::Model,
    pub signer_qr: QrPanel,
}

// ============ 签署人 ============

pub async fn submit_signer(state: &AppState, input: CreateSigner) -> Result<signers::Model> {
    into_result(validate_create_signer(&input))?;
    let signer = state.store.create_signer(input).await?;
    info!(signer_id = %signer.id, "signer created");
    Ok(signer)
}

pub async fn edit_signer(
    state: &AppState,
    id: Uuid,
    patch: UpdateSigner,
) -> Result<signers::Model> {
    into_result(validate_update_signer(&patch))?;
    state.store.update_signer(id, patch).await
}

pub async fn toggle_signer(state: &AppState, id: Uuid) -> Result<signers::Model> {
    let signer = state
        .store
        .get_signer(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("signer {id}")))?;
    let patch = UpdateSigner {
        status: Some(signer.status.toggle()),
        ..Default::default()
    };
    let updated = state.store.update_signer(id, patch).await?;
    info!(signer_id = %id, status = updated.status.as_str(), "signer status toggled");
    Ok(updated)
}

pub async fn signer_qr(state: &AppState, id: Uuid) -> Result<(signers::Model, QrPanel)> {
    let signer = state
        .store
        .get_signer(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("signer {id}")))?;
    let panel = QrPanel::encode(
        state,
        state.links.signature(signer.id),
        download_filename("qr-signature", &signer.no_kegiatan),
    )?;
    Ok((signer, panel))
}

// ============ 证书 ============

/// 新建证书。未指定签署人时同时创建占位签署人并关联
pub async fn submit_certificate(
    state: &AppState,
    input: CreateCertificate,
) -> Result<(certificates::Model, Option<signers::Model>)> {
    into_result(validate_create_certificate(&input))?;

    if input.signer_id.is_some() {
        let certificate = state.store.create_certificate(input).await?;
        info!(certificate_id = %certificate.id, "certificate created");
        return Ok((certificate, None));
    }

    let (certificate, signer) = state
        .store
        .create_certificate_with_signer(input, &state.default_signer_name)
        .await?;
    info!(
        certificate_id = %certificate.id,
        signer_id = %signer.id,
        "certificate created with signer"
    );
    Ok((certificate, Some(signer)))
}

pub async fn edit_certificate(
    state: &AppState,
    id: Uuid,
    patch: UpdateCertificate,
) -> Result<certificates::Model> {
    into_result(validate_update_certificate(&patch))?;
    state.store.update_certificate(id, patch).await
}

pub async fn toggle_certificate(state: &AppState, id: Uuid) -> Result<certificates::Model> {
    let certificate = state
        .store
        .get_certificate(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("certificate {id}")))?;
    let patch = UpdateCertificate {
        status: Some(certificate.status.toggle()),
        ..Default::default()
    };
    let updated = state.store.update_certificate(id, patch).await?;
    info!(certificate_id = %id, status = updated.status.as_str(), "certificate status toggled");
    Ok(updated)
}

/// 生成证书与签署人的二维码；旧证书没有关联签署人时先补建
pub async fn certificate_qr(state: &AppState, id: Uuid) -> Result<CertificateQr> {
    let (certificate, signer) = state
        .store
        .attach_new_signer(id, &state.default_signer_name)
        .await?;

    let certificate_qr = QrPanel::encode(
        state,
        state.links.certificate(certificate.id),
        download_filename("qr-certificate", &certificate.no_sertifikat),
    )?;
    let signer_qr = QrPanel::encode(
        state,
        state.links.signature(signer.id),
        download_filename("qr-signature", &signer.no_kegiatan),
    )?;

    Ok(CertificateQr {
        certificate,
        certificate_qr,
        signer,
        signer_qr,
    })
}

pub async fn certificate_qr_panel(state: &AppState, id: Uuid) -> Result<QrPanel> {
    let certificate = state
        .store
        .get_certificate(id)
        .await?
        .ok_or_else(|| CertError::not_found(format!("certificate {id}")))?;
    QrPanel::encode(
        state,
        state.links.certificate(certificate.id),
        download_filename("qr-certificate", &certificate.no_sertifikat),
    )
}
