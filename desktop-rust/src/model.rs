use depth_estimator_common::Interpretation;
use std::path::PathBuf;

/// 1回のアップロードに対する状態
#[derive(Debug, Clone, Default)]
pub enum Outcome {
    #[default]
    Idle,
    Analyzing,
    Complete(Interpretation),
    /// 通信・サービス・画像読み込みのエラー
    Failed(String),
}

#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub image_path: Option<PathBuf>,
    pub outcome: Outcome,
}

impl AppState {
    pub fn is_busy(&self) -> bool {
        matches!(self.outcome, Outcome::Analyzing)
    }
}
