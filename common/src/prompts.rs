//! プロンプト定義モジュール
//!
//! CLIとデスクトップビューアで共有される固定プロンプト:
//! - KEY_*: モデルに返させるJSONのキー名
//! - DEPTH_ESTIMATION_PROMPT: 掘削深さ推定用プロンプト

/// 推定深さのキー（フィートとメートルを併記した文字列）
pub const KEY_ESTIMATED_DEPTH: &str = "estimated_depth_meters";

/// 推定根拠のキー
pub const KEY_REASONING: &str = "reasoning";

/// 前提条件のキー
pub const KEY_ASSUMPTIONS: &str = "assumptions";

/// 掘削深さ推定プロンプト
///
/// ユーザーが変更するものではなく設定定数として扱う。
pub const DEPTH_ESTIMATION_PROMPT: &str = r#"You are a highly skilled construction analysis AI, trained to interpret excavation and trench images with expert-level precision.

Your task is to examine the uploaded image of a construction site, trench, hole, or pit, and **estimate the vertical depth from the original ground surface level to the bottom of the excavation**.

Key instructions:
- Focus only on the **vertical depth from ground surface** to the **bottom of the trench/hole/pit**.
- **Do NOT include soil piles, debris, or elevated edges** as part of the depth.
- Use visible **reference objects** such as workers, tools, machinery, safety barriers, or shadows to infer scale.
- If there is no clear reference, make a **reasonable assumption**, but state it clearly.

Respond strictly in the following JSON format:
{
"estimated_depth_meters": "<estimated depth in foot and in meter as a string>",
"reasoning": "<brief reasoning using visual evidence such as shadows, body proportions, or object sizes>",
"assumptions": "<any assumptions made about object size, camera angle, or missing context>"
}

Important: Only return the JSON object. Do NOT include markdown, commentary, or explanation outside the JSON format."#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_names_all_keys() {
        assert!(DEPTH_ESTIMATION_PROMPT.contains(KEY_ESTIMATED_DEPTH));
        assert!(DEPTH_ESTIMATION_PROMPT.contains(KEY_REASONING));
        assert!(DEPTH_ESTIMATION_PROMPT.contains(KEY_ASSUMPTIONS));
    }

    #[test]
    fn test_prompt_forbids_markdown() {
        assert!(DEPTH_ESTIMATION_PROMPT.contains("Only return the JSON object"));
        assert!(DEPTH_ESTIMATION_PROMPT.contains("Do NOT include markdown"));
    }

    #[test]
    fn test_prompt_excludes_soil_piles() {
        assert!(DEPTH_ESTIMATION_PROMPT.contains("soil piles"));
        assert!(DEPTH_ESTIMATION_PROMPT.contains("reference objects"));
    }
}
