//! 深さ推定結果の型定義
//!
//! CLIとデスクトップビューアで共有される型:
//! - DepthEstimate: モデル応答から取り出した推定結果（3フィールド）
//! - Interpretation: 1回の解析サイクルの結果（推定結果 or パース失敗）

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ParseFailure;
use crate::prompts::{KEY_ASSUMPTIONS, KEY_ESTIMATED_DEPTH, KEY_REASONING};

/// 深さ推定結果
///
/// 3フィールドとも不透明な文字列として扱う（単位・数値は解釈しない）。
/// キーが欠けている場合は `None`。構築後は変更不可。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepthEstimate {
    #[serde(rename = "estimated_depth_meters", default, deserialize_with = "lenient_text")]
    estimated_depth: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    reasoning: Option<String>,

    #[serde(default, deserialize_with = "lenient_text")]
    assumptions: Option<String>,
}

impl DepthEstimate {
    pub fn new(
        estimated_depth: Option<String>,
        reasoning: Option<String>,
        assumptions: Option<String>,
    ) -> Self {
        Self {
            estimated_depth,
            reasoning,
            assumptions,
        }
    }

    /// 推定深さ（例: "2.5 m (approx. 8.2 ft)"）
    pub fn estimated_depth(&self) -> Option<&str> {
        self.estimated_depth.as_deref()
    }

    /// 推定根拠
    pub fn reasoning(&self) -> Option<&str> {
        self.reasoning.as_deref()
    }

    /// 前提条件
    pub fn assumptions(&self) -> Option<&str> {
        self.assumptions.as_deref()
    }

    /// JSONキー名でフィールドを取得（レポート描画用）
    pub fn value_by_key(&self, key: &str) -> Option<&str> {
        match key {
            KEY_ESTIMATED_DEPTH => self.estimated_depth(),
            KEY_REASONING => self.reasoning(),
            KEY_ASSUMPTIONS => self.assumptions(),
            _ => None,
        }
    }

    /// 3フィールドすべてが欠けているか
    pub fn is_empty(&self) -> bool {
        self.estimated_depth.is_none() && self.reasoning.is_none() && self.assumptions.is_none()
    }
}

/// 解析サイクルの結果
///
/// パース失敗もサイクルとしては成功扱い（生テキストを表示するため）。
/// CLIの `--format json` 出力とデスクトップビューアの受け渡しに使う。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Interpretation {
    Estimate(DepthEstimate),
    Unparsed(ParseFailure),
}

impl Interpretation {
    pub fn estimate(&self) -> Option<&DepthEstimate> {
        match self {
            Interpretation::Estimate(estimate) => Some(estimate),
            Interpretation::Unparsed(_) => None,
        }
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self, Interpretation::Estimate(_))
    }
}

impl From<Result<DepthEstimate, ParseFailure>> for Interpretation {
    fn from(result: Result<DepthEstimate, ParseFailure>) -> Self {
        match result {
            Ok(estimate) => Interpretation::Estimate(estimate),
            Err(failure) => Interpretation::Unparsed(failure),
        }
    }
}

/// 任意のJSON値をテキストに寄せる
///
/// 文字列はそのまま、数値・真偽値はJSON表記、null は欠損、
/// 配列・オブジェクトはコンパクトなJSON文字列にする。
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_text))
}

fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
