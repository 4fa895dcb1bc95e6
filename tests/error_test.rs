//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use depth_estimator_common::{interpret_response, ParseFailure};
use hole_depth_estimator::error::DepthError;
use hole_depth_estimator::image_source::load_image;
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像
#[test]
fn test_load_nonexistent_image() {
    let result = load_image(Path::new("/nonexistent/path/12345.jpg"), 1568);
    assert!(matches!(result, Err(DepthError::FileNotFound(_))));
}

/// ディレクトリを画像として渡した場合
#[test]
fn test_load_directory_as_image() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = load_image(dir.path(), 1568);
    assert!(matches!(result, Err(DepthError::FileNotFound(_))));
}

/// 拡張子は正しいが中身が画像でない
#[test]
fn test_load_text_with_jpg_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("fake.jpg");
    std::fs::write(&path, "hello").unwrap();

    let result = load_image(&path, 1568);
    assert!(matches!(result, Err(DepthError::ImageLoad(_))));
}

/// DepthErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        DepthError::Config("broken config".to_string()),
        DepthError::FileNotFound("site.jpg".to_string()),
        DepthError::UnsupportedImage("site.gif".to_string()),
        DepthError::ImageLoad("truncated".to_string()),
        DepthError::ApiCall("503: unavailable".to_string()),
        DepthError::Prompt("not a terminal".to_string()),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "empty error message: {:?}", err);
    }
}

/// 通信エラーはラベル付きで表示
#[test]
fn test_api_error_label() {
    let err = DepthError::ApiCall("429 RESOURCE_EXHAUSTED: quota".to_string());
    assert_eq!(format!("{}", err), "API Error: 429 RESOURCE_EXHAUSTED: quota");
}

/// MissingApiKeyエラーのメッセージ確認
#[test]
fn test_missing_api_key_message() {
    let display = format!("{}", DepthError::MissingApiKey);
    assert!(display.contains("GEMINI_API_KEY"));
    assert!(display.contains("config --set-api-key"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: DepthError = io_err.into();

    assert!(matches!(err, DepthError::Io(_)));
    assert!(format!("{}", err).contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: DepthError = json_err.into();

    assert!(matches!(err, DepthError::JsonParse(_)));
}

/// パース失敗はクラッシュせず元テキストを返す
#[test]
fn test_parse_failure_is_value_not_panic() {
    let inputs = ["", "{", "}{", "```json```", "[1,2", "\u{0}", "{\"estimated_depth_meters\":"];
    for raw in inputs {
        let failure: ParseFailure = interpret_response(raw).unwrap_err();
        assert_eq!(failure.raw(), raw);
    }
}
