use crate::entities::RecordStatus;
use crate::entities::certificates::CompetencyUnits;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateSigner {
    pub nama_lengkap: String,
    pub no_kegiatan: String,
}

/// 签署人创建后允许修改的字段
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateSigner {
    pub nama_lengkap: Option<String>,
    pub no_kegiatan: Option<String>,
    pub status: Option<RecordStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateCertificate {
    pub no_sertifikat: String,
    pub nama_peserta: String,
    pub nama_kegiatan: String,
    pub tanggal_ditetapkan: Option<NaiveDate>,
    pub pdf_url: Option<String>,
    pub signer_id: Option<Uuid>,
    pub competency_units: Option<CompetencyUnits>,
}

/// 证书创建后允许修改的字段；`signer_id` 不在其中
///
/// `tanggal_ditetapkan`：字段缺省为不修改，显式 `null` 为清空。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateCertificate {
    pub no_sertifikat: Option<String>,
    pub nama_peserta: Option<String>,
    pub nama_kegiatan: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "::serde_with::rust::double_option"
    )]
    pub tanggal_ditetapkan: Option<Option<NaiveDate>>,
    pub pdf_url: Option<String>,
    pub status: Option<RecordStatus>,
    pub competency_units: Option<CompetencyUnits>,
}

impl UpdateSigner {
    pub fn is_empty(&self) -> bool {
        self.nama_lengkap.is_none() && self.no_kegiatan.is_none() && self.status.is_none()
    }
}

impl UpdateCertificate {
    pub fn is_empty(&self) -> bool {
        self.no_sertifikat.is_none()
            && self.nama_peserta.is_none()
            && self.nama_kegiatan.is_none()
            && self.tanggal_ditetapkan.is_none()
            && self.pdf_url.is_none()
            && self.status.is_none()
            && self.competency_units.is_none()
    }
}
