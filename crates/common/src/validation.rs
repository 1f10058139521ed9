//! 输入验证模块
//!
//! 写入存储之前的字段检查，供 JSON API 与 HTML 表单共享。

use crate::error::CertError;
use crate::models::{CreateCertificate, CreateSigner, UpdateCertificate, UpdateSigner};

const MAX_NUMBER_LEN: usize = 100;
const MAX_NAME_LEN: usize = 255;

/// 验证错误类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// 必填字段为空
    Required { field: &'static str },

    /// 字段超出长度限制
    TooLong { field: &'static str, max: usize },

    /// 链接格式错误
    InvalidUrl { field: &'static str },
}

impl ValidationError {
    /// 获取错误的详细描述
    pub fn description(&self) -> String {
        match self {
            Self::Required { field } => format!("{} is required", field),
            Self::TooLong { field, max } => {
                format!("{} exceeds {} characters", field, max)
            }
            Self::InvalidUrl { field } => format!("{} must be an http(s) URL", field),
        }
    }
}

/// 将验证错误列表合并为一个 `CertError::Validation`
pub fn into_result(errors: Vec<ValidationError>) -> Result<(), CertError> {
    if errors.is_empty() {
        return Ok(());
    }
    let joined = errors
        .iter()
        .map(ValidationError::description)
        .collect::<Vec<_>>()
        .join("; ");
    Err(CertError::validation(joined))
}

fn check_text(
    field: &'static str,
    value: &str,
    max: usize,
    errors: &mut Vec<ValidationError>,
) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.push(ValidationError::Required { field });
    } else if trimmed.chars().count() > max {
        errors.push(ValidationError::TooLong { field, max });
    }
}

fn check_pdf_url(value: &str, errors: &mut Vec<ValidationError>) {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return;
    }
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        errors.push(ValidationError::InvalidUrl { field: "pdf_url" });
    }
}

pub fn validate_create_signer(input: &CreateSigner) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_text("nama_lengkap", &input.nama_lengkap, MAX_NAME_LEN, &mut errors);
    check_text("no_kegiatan", &input.no_kegiatan, MAX_NUMBER_LEN, &mut errors);
    errors
}

pub fn validate_update_signer(patch: &UpdateSigner) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(name) = &patch.nama_lengkap {
        check_text("nama_lengkap", name, MAX_NAME_LEN, &mut errors);
    }
    if let Some(number) = &patch.no_kegiatan {
        check_text("no_kegiatan", number, MAX_NUMBER_LEN, &mut errors);
    }
    errors
}

pub fn validate_create_certificate(input: &CreateCertificate) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    check_text("no_sertifikat", &input.no_sertifikat, MAX_NUMBER_LEN, &mut errors);
    check_text("nama_peserta", &input.nama_peserta, MAX_NAME_LEN, &mut errors);
    check_text("nama_kegiatan", &input.nama_kegiatan, MAX_NAME_LEN, &mut errors);
    if let Some(url) = &input.pdf_url {
        check_pdf_url(url, &mut errors);
    }
    errors
}

pub fn validate_update_certificate(patch: &UpdateCertificate) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    if let Some(number) = &patch.no_sertifikat {
        check_text("no_sertifikat", number, MAX_NUMBER_LEN, &mut errors);
    }
    if let Some(name) = &patch.nama_peserta {
        check_text("nama_peserta", name, MAX_NAME_LEN, &mut errors);
    }
    if let Some(program) = &patch.nama_kegiatan {
        check_text("nama_kegiatan", program, MAX_NAME_LEN, &mut errors);
    }
    if let Some(url) = &patch.pdf_url {
        check_pdf_url(url, &mut errors);
    }
    errors
}
