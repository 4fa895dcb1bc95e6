use crate::error::{DepthError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// APIキーの環境変数
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// モデル名の環境変数
pub const MODEL_ENV: &str = "HOLE_DEPTH_MODEL";

pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// 実行時設定
///
/// 起動時に一度だけ構築し、Gemini クライアントへ明示的に渡す。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base_url: String,
    pub max_image_size: u32,
    pub timeout_seconds: u64,
    pub temperature: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            max_image_size: 1568,
            timeout_seconds: 120,
            temperature: 0.1,
        }
    }
}

impl Config {
    /// 設定ファイルを読み込み、環境変数で上書き
    pub fn load() -> Result<Self> {
        let config = Self::load_from(&Self::config_path()?)?;
        Ok(config.with_env_overrides(
            std::env::var(API_KEY_ENV).ok(),
            std::env::var(MODEL_ENV).ok(),
        ))
    }

    /// 指定パスから読み込み（ファイルが無ければデフォルト）
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| DepthError::Config(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| DepthError::Config("home directory not found".into()))?;
        Ok(home.join(".config").join("hole-depth").join("config.json"))
    }

    /// 環境変数の値を優先（空文字は無視）
    pub fn with_env_overrides(mut self, api_key: Option<String>, model: Option<String>) -> Self {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.api_key = Some(key);
        }
        if let Some(model) = model.filter(|m| !m.trim().is_empty()) {
            self.model = model;
        }
        self
    }

    pub fn get_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(DepthError::MissingApiKey)
    }

    /// APIキーを設定ファイルへ保存
    ///
    /// 保存するのはファイルの内容にこの項目を反映したもの。環境変数由来の値は書き込まない。
    pub fn set_api_key(&mut self, key: String) -> Result<()> {
        Self::update_file(&Self::config_path()?, |stored| stored.api_key = Some(key.clone()))?;
        self.api_key = Some(key);
        Ok(())
    }

    pub fn set_model(&mut self, model: String) -> Result<()> {
        Self::update_file(&Self::config_path()?, |stored| stored.model = model.clone())?;
        self.model = model;
        Ok(())
    }

    /// ファイルを読み直して1項目だけ更新し、書き戻す
    pub fn update_file(path: &Path, update: impl FnOnce(&mut Config)) -> Result<()> {
        let mut stored = Self::load_from(path)?;
        update(&mut stored);
        stored.save_to(path)
    }
}
