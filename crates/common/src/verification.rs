//! 验证流程
//!
//! 由请求路径中的标识符解析记录：不存在为 `NotFound`，存在但未启用为
//! `Inactive`，否则为 `Verified`。每次解析只做一次读取，不重试。

use crate::competency::units_or_default;
use crate::entities::certificates::CompetencyUnit;
use crate::entities::{Activatable, certificates, signers};
use crate::error::Result;
use crate::store::RecordStore;
use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "record", rename_all = "snake_case")]
pub enum Verification<T> {
    Verified(T),
    NotFound,
    Inactive,
}

impl<T> Verification<T> {
    pub fn outcome(&self) -> &'static str {
        match self {
            Self::Verified(_) => "verified",
            Self::NotFound => "not_found",
            Self::Inactive => "inactive",
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self, Self::Verified(_))
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Verification<U> {
        match self {
            Self::Verified(record) => Verification::Verified(f(record)),
            Self::NotFound => Verification::NotFound,
            Self::Inactive => Verification::Inactive,
        }
    }
}

/// 对单次读取的结果做状态判定
pub fn evaluate<T: Activatable>(row: Option<T>) -> Verification<T> {
    match row {
        None => Verification::NotFound,
        Some(record) if !record.status().is_active() => Verification::Inactive,
        Some(record) => Verification::Verified(record),
    }
}

/// 路径参数不是合法 UUID 时视同不存在
pub fn parse_record_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

/// 证书验证通过后对外展示的字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateView {
    pub id: Uuid,
    pub no_sertifikat: String,
    pub nama_peserta: String,
    pub nama_kegiatan: String,
    pub tanggal_ditetapkan: Option<NaiveDate>,
    pub competency_units: Vec<CompetencyUnit>,
}

impl From<certificates::Model> for CertificateView {
    fn from(model: certificates::Model) -> Self {
        let competency_units = units_or_default(model.competency_units.as_ref());
        Self {
            id: model.id,
            no_sertifikat: model.no_sertifikat,
            nama_peserta: model.nama_peserta,
            nama_kegiatan: model.nama_kegiatan,
            tanggal_ditetapkan: model.tanggal_ditetapkan,
            competency_units,
        }
    }
}

/// 签署日期的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignedOnSource {
    Certificate,
    Registration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignerView {
    pub id: Uuid,
    pub nama_lengkap: String,
    pub no_kegiatan: String,
    pub signed_on: NaiveDate,
    pub signed_on_source: SignedOnSource,
}

impl SignerView {
    /// 关联证书有签发日期时以其为签署日期，否则取签署人创建日期
    pub fn new(signer: signers::Model, certificate: Option<&certificates::Model>) -> Self {
        let (signed_on, signed_on_source) =
            match certificate.and_then(|c| c.tanggal_ditetapkan) {
                Some(date) => (date, SignedOnSource::Certificate),
                None => (signer.created_at.date_naive(), SignedOnSource::Registration),
            };
        Self {
            id: signer.id,
            nama_lengkap: signer.nama_lengkap,
            no_kegiatan: signer.no_kegiatan,
            signed_on,
            signed_on_source,
        }
    }
}

pub async fn verify_certificate(
    store: &RecordStore,
    raw_id: &str,
) -> Result<Verification<CertificateView>> {
    let Some(id) = parse_record_id(raw_id) else {
        return Ok(Verification::NotFound);
    };
    let row = store.get_certificate(id).await?;
    Ok(evaluate(row).map(CertificateView::from))
}

pub async fn verify_signer(store: &RecordStore, raw_id: &str) -> Result<Verification<SignerView>> {
    let Some(id) = parse_record_id(raw_id) else {
        return Ok(Verification::NotFound);
    };
    match evaluate(store.get_signer(id).await?) {
        Verification::Verified(signer) => {
            let certificate = store.find_certificate_by_signer(signer.id).await?;
            Ok(Verification::Verified(SignerView::new(
                signer,
                certificate.as_ref(),
            )))
        }
        Verification::NotFound => Ok(Verification::NotFound),
        Verification::Inactive => Ok(Verification::Inactive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::competency::default_competency_units;
    use crate::entities::RecordStatus;
    use crate::models::{UpdateCertificate, UpdateSigner};
    use crate::store::tests::{create_test_store, new_certificate};

    #[tokio::test]
    async fn unknown_or_malformed_id_is_not_found() {
        let store = create_test_store().await;
        let random = Uuid::new_v4().to_string();
        assert_eq!(
            verify_certificate(&store, &random).await.unwrap(),
            Verification::NotFound
        );
        assert_eq!(
            verify_signer(&store, &random).await.unwrap(),
            Verification::NotFound
        );
        assert_eq!(
            verify_certificate(&store, "not-a-uuid").await.unwrap(),
            Verification::NotFound
        );
    }

    #[tokio::test]
    async fn verified_certificate_shows_default_units() {
        let store = create_test_store().await;
        let (certificate, _) = store
            .create_certificate_with_signer(new_certificate("CERT-001"), "Ketua LPK")
            .await
            .unwrap();

        let outcome = verify_certificate(&store, &certificate.id.to_string())
            .await
            .unwrap();
        let Verification::Verified(view) = outcome else {
            panic!("expected verified, got {outcome:?}");
        };
        assert_eq!(view.nama_peserta, "Jane Doe");
        assert_eq!(view.no_sertifikat, "CERT-001");
        assert_eq!(view.competency_units, default_competency_units().0);
    }

    #[tokio::test]
    async fn toggled_certificate_is_inactive() {
        let store = create_test_store().await;
        let certificate = store
            .create_certificate(new_certificate("CERT-010"))
            .await
            .unwrap();
        store
            .update_certificate(
                certificate.id,
                UpdateCertificate {
                    status: Some(certificate.status.toggle()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(
            verify_certificate(&store, &certificate.id.to_string())
                .await
                .unwrap(),
            Verification::Inactive
        );
    }

    #[tokio::test]
    async fn signer_uses_certificate_issue_date() {
        let store = create_test_store().await;
        let mut input = new_certificate("CERT-020");
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        input.tanggal_ditetapkan = Some(date);
        let (_, signer) = store
            .create_certificate_with_signer(input, "Ketua LPK")
            .await
            .unwrap();

        let outcome = verify_signer(&store, &signer.id.to_string()).await.unwrap();
        let Verification::Verified(view) = outcome else {
            panic!("expected verified, got {outcome:?}");
        };
        assert_eq!(view.signed_on, date);
        assert_eq!(view.signed_on_source, SignedOnSource::Certificate);
        assert_eq!(view.no_kegiatan, "CERT-020");
    }

    #[tokio::test]
    async fn signer_without_dated_certificate_uses_registration() {
        let store = create_test_store().await;
        let (_, signer) = store
            .create_certificate_with_signer(new_certificate("CERT-021"), "Ketua LPK")
            .await
            .unwrap();

        let outcome = verify_signer(&store, &signer.id.to_string()).await.unwrap();
        let Verification::Verified(view) = outcome else {
            panic!("expected verified, got {outcome:?}");
        };
        assert_eq!(view.signed_on, signer.created_at.date_naive());
        assert_eq!(view.signed_on_source, SignedOnSource::Registration);
    }

    #[tokio::test]
    async fn deactivated_signer_is_inactive() {
        let store = create_test_store().await;
        let (_, signer) = store
            .create_certificate_with_signer(new_certificate("CERT-001"), "Ketua LPK")
            .await
            .unwrap();
        let updated = store
            .update_signer(
                signer.id,
                UpdateSigner {
                    status: Some(RecordStatus::Inactive),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, RecordStatus::Inactive);

        assert_eq!(
            verify_signer(&store, &signer.id.to_string()).await.unwrap(),
            Verification::Inactive
        );
    }

    #[test]
    fn outcome_serializes_tagged() {
        let outcome: Verification<u8> = Verification::NotFound;
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            serde_json::json!({"outcome": "not_found"})
        );
        assert_eq!(
            serde_json::to_value(Verification::Verified(7u8)).unwrap(),
            serde_json::json!({"outcome": "verified", "record": 7})
        );
    }
}
