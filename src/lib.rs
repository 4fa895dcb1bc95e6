//! 掘削現場写真の深さ推定
//!
//! 写真と固定プロンプトを Gemini に送り、応答のJSONを DepthEstimate として表示する。

pub mod cli;
pub mod config;
pub mod error;
pub mod estimator;
pub mod image_source;
pub mod vision;
