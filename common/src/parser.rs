//! モデル応答パーサー
//!
//! Geminiなどのモデル応答テキストからJSONオブジェクトを取り出し、
//! DepthEstimate に変換する

use serde_json::Value;

use crate::error::ParseFailure;
use crate::types::{DepthEstimate, Interpretation};

/// モデルがJSONを包むことがあるフェンスの開始マーカー
pub const FENCE_OPEN: &str = "```json";

/// フェンスの終了マーカー
pub const FENCE_CLOSE: &str = "```";

/// 既知のラッパー文字列を除去する
///
/// 前後の空白を除き、`FENCE_OPEN` と `FENCE_CLOSE` を出現位置に関係なく
/// すべて取り除いてから再度 trim する。
/// マークダウンパーサーではなく、この2つのリテラルだけを対象にしたベストエフォート処理。
///
/// # Examples
/// ```
/// use depth_estimator_common::strip_wrapper_literals;
///
/// let cleaned = strip_wrapper_literals("```json\n{\"a\": 1}\n```");
/// assert_eq!(cleaned, "{\"a\": 1}");
/// ```
pub fn strip_wrapper_literals(text: &str) -> String {
    text.trim()
        .replace(FENCE_OPEN, "")
        .replace(FENCE_CLOSE, "")
        .trim()
        .to_string()
}

/// モデル応答を DepthEstimate に変換
///
/// 処理順:
/// 1. `strip_wrapper_literals` で正規化
/// 2. 正規化後の文字列全体をJSONオブジェクトとしてデコード
/// 3. JSONとして読めない場合のみ、最初の `{` から最後の `}` までを再デコード（前後の説明文対策）
///
/// JSONとしては正しいがオブジェクトでない値（配列・文字列など）は即座に失敗とする。
///
/// # Arguments
/// * `raw` - モデル応答の生テキスト
///
/// # Returns
/// * `Ok(DepthEstimate)` - デコード成功（欠けたキーは `None`）
/// * `Err(ParseFailure)` - オブジェクトとして読めない場合。元の `raw` を保持
pub fn interpret_response(raw: &str) -> Result<DepthEstimate, ParseFailure> {
    let normalized = strip_wrapper_literals(raw);

    match serde_json::from_str::<Value>(&normalized) {
        Ok(value) => decode_object(value).map_err(|reason| ParseFailure::new(raw, reason)),
        Err(err) => {
            // JSONとして読めない場合のみ前後の説明文を疑う
            let fallback = object_span(&normalized)
                .filter(|span| span.len() < normalized.len())
                .and_then(|span| serde_json::from_str::<Value>(span).ok())
                .and_then(|value| decode_object(value).ok());
            fallback.ok_or_else(|| ParseFailure::new(raw, err.to_string()))
        }
    }
}

/// `interpret_response` の結果を Interpretation にまとめる
pub fn interpret(raw: &str) -> Interpretation {
    interpret_response(raw).into()
}

fn decode_object(value: Value) -> Result<DepthEstimate, String> {
    if !value.is_object() {
        return Err(format!("expected a JSON object, found {}", kind_of(&value)));
    }

    serde_json::from_value(value).map_err(|e| e.to_string())
}

/// 最初の `{` から最後の `}` までの範囲
fn object_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end > start {
        Some(&text[start..=end])
    } else {
        None
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
