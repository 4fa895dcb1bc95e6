use thiserror::Error;

#[derive(Error, Debug)]
pub enum DepthError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Gemini API key is not set. Export GEMINI_API_KEY or run `hole-depth-estimator config --set-api-key YOUR_KEY`")]
    MissingApiKey,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported image type: {0} (use jpg, jpeg or png)")]
    UnsupportedImage(String),

    #[error("Image load error: {0}")]
    ImageLoad(String),

    /// 外部サービス呼び出しの失敗（通信・認証・クォータ・サービスエラー）
    #[error("API Error: {0}")]
    ApiCall(String),

    #[error("JSON error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Input error: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, DepthError>;
