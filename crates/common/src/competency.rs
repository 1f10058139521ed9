//! 标准能力单元列表
//!
//! 新建证书未提供能力单元时使用该列表，验证页面遇到缺失列表的旧记录时同样回退到它。

use crate::entities::certificates::{CompetencyUnit, CompetencyUnits};

const STANDARD_UNITS: [(&str, &str); 12] = [
    (
        "F.42PPT01.001.1",
        "Menerapkan Ketentuan K3 dan Lingkungan (K3L) Pengeboran Air Tanah",
    ),
    (
        "F.42PPT01.002.1",
        "Melaksanakan Mobilisasi dan Demobilisasi Peralatan Pengeboran",
    ),
    (
        "F.42PPT01.003.1",
        "Melakukan Persiapan Pengeboran Air Tanah (Setting Rig)",
    ),
    (
        "F.42PPT01.004.1",
        "Mengoperasikan Mesin Bor Air Tanah (Rotary/Percussion)",
    ),
    ("F.42PPT01.005.1", "Melakukan Pengeboran Awal (Pilot Hole)"),
    (
        "F.42PPT01.006.1",
        "Mengambil Sampel Tanah/Batuan (Cutting/Coring Sederhana)",
    ),
    (
        "F.42PPT01.007.1",
        "Melakukan Pemasangan Konstruksi Sumur (Casing & Screen)",
    ),
    (
        "F.42PPT01.008.1",
        "Melakukan Penimbunan Kerikil Pembalut (Gravel Pack) & Grouting",
    ),
    (
        "F.42PPT01.009.1",
        "Melakukan Pembersihan Sumur (Well Development)",
    ),
    ("F.42PPT01.010.1", "Melakukan Uji Pemompaan (Pumping Test)"),
    ("F.42PPT01.011.1", "Melakukan Penyelesaian Sumur (Finishing)"),
    (
        "F.42PPT01.012.1",
        "Membuat Laporan Hasil Pengeboran Air Tanah",
    ),
];

/// 返回 12 项标准能力单元，顺序固定
pub fn default_competency_units() -> CompetencyUnits {
    CompetencyUnits(
        STANDARD_UNITS
            .iter()
            .enumerate()
            .map(|(idx, (kode, judul))| CompetencyUnit {
                no: idx as i32 + 1,
                kode_unit: (*kode).to_string(),
                judul_unit: (*judul).to_string(),
            })
            .collect(),
    )
}

/// 记录自带列表时原样返回，否则回退到标准列表
pub fn units_or_default(units: Option<&CompetencyUnits>) -> Vec<CompetencyUnit> {
    match units {
        Some(units) => units.0.clone(),
        None => default_competency_units().0,
    }
}
