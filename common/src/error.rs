//! エラー型定義

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// モデル応答を期待したJSONオブジェクトとして読めなかった
///
/// `raw` は正規化前の元テキスト（ユーザーがそのまま確認できるように保持）。
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("could not parse response as a depth estimate: {reason}")]
pub struct ParseFailure {
    raw: String,
    reason: String,
}

impl ParseFailure {
    pub fn new(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// 元の応答テキスト
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// デコーダのエラーメッセージ
    pub fn reason(&self) -> &str {
        &self.reason
    }
}
