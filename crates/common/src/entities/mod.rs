pub mod certificates;
pub mod signers;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 记录启用状态，持久化为 `aktif` / `nonaktif`
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RecordStatus {
    #[sea_orm(string_value = "aktif")]
    #[serde(rename = "aktif")]
    Active,
    #[sea_orm(string_value = "nonaktif")]
    #[serde(rename = "nonaktif")]
    Inactive,
}

impl RecordStatus {
    pub fn toggle(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::Active,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "aktif",
            Self::Inactive => "nonaktif",
        }
    }
}

impl Default for RecordStatus {
    fn default() -> Self {
        Self::Active
    }
}

/// 带启用状态的记录
pub trait Activatable {
    fn status(&self) -> RecordStatus;
}

impl Activatable for certificates::Model {
    fn status(&self) -> RecordStatus {
        self.status
    }
}

impl Activatable for signers::Model {
    fn status(&self) -> RecordStatus {
        self.status
    }
}
