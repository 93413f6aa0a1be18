//! Answer rendering for the interactive loop.
//!
//! Every absent field renders as a placeholder, never an error: the catalog
//! is allowed to carry sparse records.

use std::fmt::Write;

use trafficlaw_core::ViolationRecord;

/// Placeholder for absent fields.
pub const UNKNOWN: &str = "Không rõ";

/// Printed after every answer or miss.
pub const SEPARATOR: &str = "------------------------------------------------------------";

pub const NO_MATCH_MESSAGE: &str = "\
Xin lỗi, tôi chưa hiểu câu hỏi của bạn.
Hãy mô tả rõ hành vi, ví dụ:
- 'Xe máy vượt đèn đỏ'
- 'Ô tô bóp còi trong khu dân cư'
- 'Người đi bộ băng qua đường sai chỗ'";

/// Render one matched violation as the labelled answer card.
pub fn format_answer(record: &ViolationRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "**Loại phương tiện:** {}",
        record
            .vehicle_category
            .map_or(UNKNOWN, |category| category.as_str())
    );
    let _ = writeln!(
        out,
        "**Hành vi vi phạm:** {}",
        record.violation_name.as_deref().unwrap_or(UNKNOWN)
    );
    let _ = writeln!(
        out,
        "**Điều khoản:** {}",
        record.legal_article.as_deref().unwrap_or(UNKNOWN)
    );
    let _ = writeln!(
        out,
        "**Mức phạt:** {}",
        record.penalty_amount.as_deref().unwrap_or(UNKNOWN)
    );
    let _ = writeln!(
        out,
        "**Trừ điểm:** {} điểm",
        record.points_deducted.unwrap_or(0)
    );
    let _ = writeln!(out, "**Mô tả:** {}", record.description);
    out
}
