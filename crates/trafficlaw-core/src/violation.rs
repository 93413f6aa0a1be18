//! Violation catalog record types shared across the workspace.

use serde::{Deserialize, Serialize};

/// Vehicle class a violation applies to.
///
/// Wire values match the catalog JSON (`loai_phuong_tien`). "Unknown" is the
/// absence of a category, not a variant: a record without the field and a
/// query naming no vehicle are both represented as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VehicleCategory {
    #[serde(rename = "xe_may_chuyen_dung")]
    SpecialPurposeMotorbike,
    #[serde(rename = "xe_moto_xe_may")]
    MotorbikeOrMoped,
    #[serde(rename = "xe_oto")]
    Car,
    #[serde(rename = "xe_dap")]
    Bicycle,
    #[serde(rename = "nguoi_di_bo")]
    Pedestrian,
}

impl VehicleCategory {
    /// The catalog wire name, e.g. `xe_moto_xe_may`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SpecialPurposeMotorbike => "xe_may_chuyen_dung",
            Self::MotorbikeOrMoped => "xe_moto_xe_may",
            Self::Car => "xe_oto",
            Self::Bicycle => "xe_dap",
            Self::Pedestrian => "nguoi_di_bo",
        }
    }
}

impl std::fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One violation catalog entry.
///
/// `description` is the text embedded and matched against queries; the rest
/// is the penalty record shown to the user. Optional fields stay `None` when
/// the catalog omits them, keeping "no points deducted" and "points unknown"
/// distinguishable. Wire names are the Vietnamese keys of the original
/// catalog format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViolationRecord {
    /// Behaviour description, e.g. "xe máy vượt đèn đỏ". Required: an entry
    /// without matchable text cannot participate in retrieval.
    #[serde(rename = "mo_ta")]
    pub description: String,
    #[serde(rename = "ten_vi_pham")]
    pub violation_name: Option<String>,
    /// Legal article reference, e.g. "Điều 6".
    #[serde(rename = "dieu_khoan")]
    pub legal_article: Option<String>,
    /// Fine as printed in the decree, e.g. "800.000đ" (kept as text: amounts
    /// are ranges or formatted figures, never arithmetic inputs).
    #[serde(rename = "muc_phat")]
    pub penalty_amount: Option<String>,
    /// Driving-licence points deducted (the 12-point system).
    #[serde(rename = "tru_diem")]
    pub points_deducted: Option<u32>,
    #[serde(rename = "loai_phuong_tien")]
    pub vehicle_category: Option<VehicleCategory>,
}
