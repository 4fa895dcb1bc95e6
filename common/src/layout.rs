//! レポートレイアウト定義
//!
//! CLIレポートとデスクトップビューアで同じ順序・ラベルを使うための表

use crate::prompts::{KEY_ASSUMPTIONS, KEY_ESTIMATED_DEPTH, KEY_REASONING};

/// レポートに表示するフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportField {
    /// DepthEstimate のJSONキー
    pub key: &'static str,
    /// 表示ラベル
    pub label: &'static str,
}

/// 表示順
pub const REPORT_FIELDS: &[ReportField] = &[
    ReportField {
        key: KEY_ESTIMATED_DEPTH,
        label: "Estimated Depth",
    },
    ReportField {
        key: KEY_REASONING,
        label: "Reasoning",
    },
    ReportField {
        key: KEY_ASSUMPTIONS,
        label: "Assumptions",
    },
];

/// 値が無いときの表示
pub const ABSENT_VALUE: &str = "None";
