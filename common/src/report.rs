//! 結果表示モジュール
//!
//! DepthEstimate / ParseFailure をユーザー向けのテキストに整形する。
//! 欠けたフィールドは "None" と表示する。

use crate::error::ParseFailure;
use crate::layout::{ABSENT_VALUE, REPORT_FIELDS};
use crate::types::{DepthEstimate, Interpretation};

/// パース失敗時の通知
pub const PARSE_FAILURE_NOTICE: &str = "Failed to parse response.";

/// 成功時の見出し
pub const SUCCESS_NOTICE: &str = "Analysis Complete";

/// 出力形式
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportStyle {
    /// ラベル付きプレーンテキスト（デフォルト）
    #[default]
    Text,
    /// マークダウン
    Markdown,
    /// Interpretation のJSON
    Json,
}

impl std::str::FromStr for ReportStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Ok(ReportStyle::Text),
            "markdown" | "md" => Ok(ReportStyle::Markdown),
            "json" => Ok(ReportStyle::Json),
            _ => Err(format!("Unknown format: {}. Use text, markdown, or json", s)),
        }
    }
}

impl std::fmt::Display for ReportStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStyle::Text => write!(f, "text"),
            ReportStyle::Markdown => write!(f, "markdown"),
            ReportStyle::Json => write!(f, "json"),
        }
    }
}

/// ラベル付きの行で表示
///
/// ```
/// use depth_estimator_common::{render_text, DepthEstimate};
///
/// let estimate = DepthEstimate::new(Some("1 m (3.3 ft)".into()), None, None);
/// let text = render_text(&estimate);
/// assert!(text.contains("Estimated Depth: 1 m (3.3 ft)"));
/// assert!(text.contains("Reasoning: None"));
/// ```
pub fn render_text(estimate: &DepthEstimate) -> String {
    REPORT_FIELDS
        .iter()
        .map(|field| format!("{}: {}", field.label, display_value(estimate.value_by_key(field.key))))
        .collect::<Vec<_>>()
        .join("\n")
}

/// マークダウンで表示（見出し + 箇条書き）
pub fn render_markdown(estimate: &DepthEstimate) -> String {
    let mut fields = REPORT_FIELDS.iter();
    let mut lines = Vec::new();

    if let Some(head) = fields.next() {
        lines.push(format!(
            "### {}: **{}**",
            head.label,
            display_value(estimate.value_by_key(head.key))
        ));
    }
    for field in fields {
        lines.push(format!(
            "- **{}:** {}",
            field.label,
            display_value(estimate.value_by_key(field.key))
        ));
    }

    lines.join("\n")
}

/// パース失敗の表示（通知 + 生テキスト）
pub fn render_failure(failure: &ParseFailure) -> String {
    format!("{}\nRaw Response:\n{}", PARSE_FAILURE_NOTICE, failure.raw())
}

/// Interpretation を指定形式で表示
pub fn render(interpretation: &Interpretation, style: ReportStyle) -> String {
    match (style, interpretation) {
        (ReportStyle::Json, _) => serde_json::to_string_pretty(interpretation).unwrap_or_default(),
        (ReportStyle::Text, Interpretation::Estimate(estimate)) => {
            format!("{}\n{}", SUCCESS_NOTICE, render_text(estimate))
        }
        (ReportStyle::Markdown, Interpretation::Estimate(estimate)) => {
            format!("{}\n\n{}", SUCCESS_NOTICE, render_markdown(estimate))
        }
        (_, Interpretation::Unparsed(failure)) => render_failure(failure),
    }
}

fn display_value(value: Option<&str>) -> &str {
    value.unwrap_or(ABSENT_VALUE)
}
