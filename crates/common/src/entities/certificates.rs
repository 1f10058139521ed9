use super::RecordStatus;
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 单个能力单元（编号、单元代码、单元标题）
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyUnit {
    pub no: i32,
    pub kode_unit: String,
    pub judul_unit: String,
}

/// 有序的能力单元列表，以 JSON 数组内嵌存储
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct CompetencyUnits(pub Vec<CompetencyUnit>);

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "certificates")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub no_sertifikat: String,
    pub nama_peserta: String,
    pub nama_kegiatan: String,
    pub tanggal_ditetapkan: Option<Date>,
    pub pdf_url: String,
    pub status: RecordStatus,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub competency_units: Option<CompetencyUnits>,
    pub signer_id: Option<Uuid>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Signer,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Signer => Entity::belongs_to(super::signers::Entity)
                .from(Column::SignerId)
                .to(super::signers::Column::Id)
                .into(),
        }
    }
}

impl Related<super::signers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Signer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
