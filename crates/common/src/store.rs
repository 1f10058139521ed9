//! 记录存储网关
//!
//! 对证书与签署人两类记录的增查改封装。存储错误原样上抛，不做重试；
//! 每次成功写入后使对应类型的管理列表缓存失效。

use crate::competency::default_competency_units;
use crate::entities::{RecordStatus, certificates, signers};
use crate::error::{CertError, Result, map_write_error};
use crate::models::{CreateCertificate, CreateSigner, UpdateCertificate, UpdateSigner};
use crate::state::{ListViewCache, RecordKind};
use crate::{txn, txn_with};
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

pub type CertificateWithSigner = (certificates::Model, Option<signers::Model>);

#[derive(Clone)]
pub struct RecordStore {
    db: DatabaseConnection,
    views: ListViewCache,
}

impl RecordStore {
    pub fn new(db: DatabaseConnection, views: ListViewCache) -> Self {
        Self { db, views }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn views(&self) -> &ListViewCache {
        &self.views
    }

    // ============ 签署人 ============

    pub async fn list_signers(&self) -> Result<Vec<signers::Model>> {
        let list = signers::Entity::find()
            .order_by_desc(signers::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(list)
    }

    pub async fn list_active_signers(&self) -> Result<Vec<signers::Model>> {
        let list = signers::Entity::find()
            .filter(signers::Column::Status.eq(RecordStatus::Active))
            .order_by_desc(signers::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(list)
    }

    pub async fn get_signer(&self, id: Uuid) -> Result<Option<signers::Model>> {
        Ok(signers::Entity::find_by_id(id).one(&self.db).await?)
    }

    pub async fn create_signer(&self, input: CreateSigner) -> Result<signers::Model> {
        let signer = insert_signer(&self.db, input).await?;
        self.views.invalidate(RecordKind::Signer).await;
        Ok(signer)
    }

    pub async fn update_signer(&self, id: Uuid, patch: UpdateSigner) -> Result<signers::Model> {
        let signer = signers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CertError::not_found(format!("signer {id}")))?;
        if patch.is_empty() {
            return Ok(signer);
        }

        let mut active: signers::ActiveModel = signer.into();
        if let Some(nama_lengkap) = patch.nama_lengkap {
            active.nama_lengkap = Set(nama_lengkap.trim().to_string());
        }
        if let Some(no_kegiatan) = patch.no_kegiatan {
            active.no_kegiatan = Set(no_kegiatan.trim().to_string());
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }

        let updated = active.update(&self.db).await.map_err(map_write_error)?;
        // 证书列表同时展示签署人姓名与状态
        self.views.invalidate(RecordKind::Signer).await;
        self.views.invalidate(RecordKind::Certificate).await;
        Ok(updated)
    }

    // ============ 证书 ============

    pub async fn list_certificates(&self) -> Result<Vec<certificates::Model>> {
        let list = certificates::Entity::find()
            .order_by_desc(certificates::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(list)
    }

    pub async fn list_certificates_with_signers(&self) -> Result<Vec<CertificateWithSigner>> {
        let list = certificates::Entity::find()
            .find_also_related(signers::Entity)
            .order_by_desc(certificates::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(list)
    }

    pub async fn get_certificate(&self, id: Uuid) -> Result<Option<certificates::Model>> {
        Ok(certificates::Entity::find_by_id(id).one(&self.db).await?)
    }

    /// 按签署人反查证书，多于一条时取最新的
    pub async fn find_certificate_by_signer(
        &self,
        signer_id: Uuid,
    ) -> Result<Option<certificates::Model>> {
        let certificate = certificates::Entity::find()
            .filter(certificates::Column::SignerId.eq(signer_id))
            .order_by_desc(certificates::Column::CreatedAt)
            .one(&self.db)
            .await?;
        Ok(certificate)
    }

    pub async fn create_certificate(
        &self,
        input: CreateCertificate,
    ) -> Result<certificates::Model> {
        if let Some(signer_id) = input.signer_id {
            if self.get_signer(signer_id).await?.is_none() {
                return Err(CertError::validation(format!(
                    "signer {signer_id} does not exist"
                )));
            }
        }
        let certificate = insert_certificate(&self.db, input).await?;
        self.views.invalidate(RecordKind::Certificate).await;
        Ok(certificate)
    }

    /// 在同一事务中先创建签署人，再创建引用它的证书；任一步失败均整体回滚
    pub async fn create_certificate_with_signer(
        &self,
        input: CreateCertificate,
        signer_name: &str,
    ) -> Result<(certificates::Model, signers::Model)> {
        let signer_name = signer_name.to_string();
        let (certificate, signer) = txn!(&self.db, |txn| {
            insert_certificate_with_signer(txn, input, signer_name).await
        })?;

        self.views.invalidate(RecordKind::Signer).await;
        self.views.invalidate(RecordKind::Certificate).await;
        Ok((certificate, signer))
    }

    pub async fn update_certificate(
        &self,
        id: Uuid,
        patch: UpdateCertificate,
    ) -> Result<certificates::Model> {
        let certificate = certificates::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CertError::not_found(format!("certificate {id}")))?;
        if patch.is_empty() {
            return Ok(certificate);
        }

        let mut active: certificates::ActiveModel = certificate.into();
        if let Some(no_sertifikat) = patch.no_sertifikat {
            active.no_sertifikat = Set(no_sertifikat.trim().to_string());
        }
        if let Some(nama_peserta) = patch.nama_peserta {
            active.nama_peserta = Set(nama_peserta.trim().to_string());
        }
        if let Some(nama_kegiatan) = patch.nama_kegiatan {
            active.nama_kegiatan = Set(nama_kegiatan.trim().to_string());
        }
        if let Some(tanggal_ditetapkan) = patch.tanggal_ditetapkan {
            active.tanggal_ditetapkan = Set(tanggal_ditetapkan);
        }
        if let Some(pdf_url) = patch.pdf_url {
            active.pdf_url = Set(pdf_url.trim().to_string());
        }
        if let Some(status) = patch.status {
            active.status = Set(status);
        }
        if let Some(units) = patch.competency_units {
            active.competency_units = Set(Some(units));
        }

        let updated = active.update(&self.db).await.map_err(map_write_error)?;
        self.views.invalidate(RecordKind::Certificate).await;
        Ok(updated)
    }

    /// 为尚未关联签署人的证书补建签署人并写回关联
    ///
    /// 已有有效关联时直接返回现有签署人，不会重复创建；
    /// 并发补建时只有一方的关联写入生效，另一方新建的签署人随即删除。
    pub async fn attach_new_signer(
        &self,
        certificate_id: Uuid,
        signer_name: &str,
    ) -> Result<(certificates::Model, signers::Model)> {
        let (certificate, signer, created) = txn_with!(
            &self.db,
            |txn, signer_name| { link_new_signer(txn, certificate_id, signer_name).await },
            signer_name.to_string()
        )?;

        if created {
            self.views.invalidate(RecordKind::Signer).await;
            self.views.invalidate(RecordKind::Certificate).await;
        }
        Ok((certificate, signer))
    }
}

async fn insert_signer<C: ConnectionTrait>(db: &C, input: CreateSigner) -> Result<signers::Model> {
    let active = signers::ActiveModel {
        id: Set(Uuid::new_v4()),
        nama_lengkap: Set(input.nama_lengkap.trim().to_string()),
        no_kegiatan: Set(input.no_kegiatan.trim().to_string()),
        status: Set(RecordStatus::Active),
        created_at: Set(Utc::now().into()),
    };
    active.insert(db).await.map_err(map_write_error)
}

async fn insert_certificate<C: ConnectionTrait>(
    db: &C,
    input: CreateCertificate,
) -> Result<certificates::Model> {
    let competency_units = input
        .competency_units
        .unwrap_or_else(default_competency_units);
    let active = certificates::ActiveModel {
        id: Set(Uuid::new_v4()),
        no_sertifikat: Set(input.no_sertifikat.trim().to_string()),
        nama_peserta: Set(input.nama_peserta.trim().to_string()),
        nama_kegiatan: Set(input.nama_kegiatan.trim().to_string()),
        tanggal_ditetapkan: Set(input.tanggal_ditetapkan),
        pdf_url: Set(input.pdf_url.map(|u| u.trim().to_string()).unwrap_or_default()),
        status: Set(RecordStatus::Active),
        competency_units: Set(Some(competency_units)),
        signer_id: Set(input.signer_id),
        created_at: Set(Utc::now().into()),
    };
    active.insert(db).await.map_err(map_write_error)
}

async fn insert_certificate_with_signer<C: ConnectionTrait>(
    db: &C,
    input: CreateCertificate,
    signer_name: String,
) -> Result<(certificates::Model, signers::Model)> {
    let signer = insert_signer(
        db,
        CreateSigner {
            nama_lengkap: signer_name,
            no_kegiatan: input.no_sertifikat.clone(),
        },
    )
    .await?;
    let certificate = insert_certificate(
        db,
        CreateCertificate {
            signer_id: Some(signer.id),
            ..input
        },
    )
    .await?;
    Ok((certificate, signer))
}

async fn link_new_signer<C: ConnectionTrait>(
    db: &C,
    certificate_id: Uuid,
    signer_name: String,
) -> Result<(certificates::Model, signers::Model, bool)> {
    let certificate = certificates::Entity::find_by_id(certificate_id)
        .one(db)
        .await?
        .ok_or_else(|| CertError::not_found(format!("certificate {certificate_id}")))?;

    if let Some(signer) = linked_signer(db, &certificate).await? {
        return Ok((certificate, signer, false));
    }
    claim_signer_link(db, certificate, signer_name).await
}

async fn linked_signer<C: ConnectionTrait>(
    db: &C,
    certificate: &certificates::Model,
) -> Result<Option<signers::Model>> {
    match certificate.signer_id {
        Some(signer_id) => Ok(signers::Entity::find_by_id(signer_id).one(db).await?),
        None => Ok(None),
    }
}

/// 新建签署人，并仅在证书的关联仍是读取时的值时写入
///
/// 条件不成立说明已被其他请求补建：删除刚建的签署人，返回现有关联。
async fn claim_signer_link<C: ConnectionTrait>(
    db: &C,
    certificate: certificates::Model,
    signer_name: String,
) -> Result<(certificates::Model, signers::Model, bool)> {
    let signer = insert_signer(
        db,
        CreateSigner {
            nama_lengkap: signer_name,
            no_kegiatan: certificate.no_sertifikat.clone(),
        },
    )
    .await?;

    let unchanged = match certificate.signer_id {
        Some(previous) => certificates::Column::SignerId.eq(previous),
        None => certificates::Column::SignerId.is_null(),
    };
    let claimed = certificates::Entity::update_many()
        .col_expr(certificates::Column::SignerId, Expr::value(signer.id))
        .filter(certificates::Column::Id.eq(certificate.id))
        .filter(unchanged)
        .exec(db)
        .await
        .map_err(map_write_error)?;

    if claimed.rows_affected == 0 {
        signers::Entity::delete_by_id(signer.id).exec(db).await?;
        let current = certificates::Entity::find_by_id(certificate.id)
            .one(db)
            .await?
            .ok_or_else(|| CertError::not_found(format!("certificate {}", certificate.id)))?;
        let existing = linked_signer(db, &current).await?.ok_or_else(|| {
            CertError::conflict(format!("certificate {} signer link changed", current.id))
        })?;
        tracing::debug!(
            certificate_id = %current.id,
            signer_id = %existing.id,
            "signer link already backfilled"
        );
        return Ok((current, existing, false));
    }

    let certificate = certificates::Model {
        signer_id: Some(signer.id),
        ..certificate
    };
    tracing::info!(
        certificate_id = %certificate.id,
        signer_id = %signer.id,
        "backfilled signer link"
    );
    Ok((certificate, signer, true))
}
