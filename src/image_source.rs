//! アップロード画像の読み込み
//!
//! jpg/jpeg/png のみ受け付け、長辺が上限を超える場合は縮小してから送信する。
//! 画像の中身（掘削現場かどうか等）は検証しない。

use crate::error::{DepthError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// 送信用の画像
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl UploadedImage {
    /// メモリ上の画像から作成
    ///
    /// `max_image_size` が 0 の場合は縮小しない。
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>, max_image_size: u32) -> Result<Self> {
        let file_name = file_name.into();

        let format = image::guess_format(&bytes)
            .map_err(|e| DepthError::ImageLoad(format!("{}: {}", file_name, e)))?;
        let mime_type = match format {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            other => {
                return Err(DepthError::UnsupportedImage(format!(
                    "{} ({:?})",
                    file_name, other
                )))
            }
        };

        let img = image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| DepthError::ImageLoad(format!("{}: {}", file_name, e)))?;
        let (width, height) = (img.width(), img.height());

        if max_image_size == 0 || width.max(height) <= max_image_size {
            return Ok(Self {
                file_name,
                mime_type,
                data: bytes,
                width,
                height,
            });
        }

        // アスペクト比を維持して長辺を max_image_size に合わせる
        let resized = img.resize(max_image_size, max_image_size, image::imageops::FilterType::Lanczos3);
        debug!(
            "resized {}: {}x{} -> {}x{}",
            file_name,
            width,
            height,
            resized.width(),
            resized.height()
        );
        let data = encode(&resized, format)
            .map_err(|e| DepthError::ImageLoad(format!("{}: {}", file_name, e)))?;

        Ok(Self {
            file_name,
            mime_type,
            data,
            width: resized.width(),
            height: resized.height(),
        })
    }

    /// インラインデータ用のBase64文字列
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// 画像ファイルを読み込む
pub fn load_image(path: &Path, max_image_size: u32) -> Result<UploadedImage> {
    if !path.is_file() {
        return Err(DepthError::FileNotFound(path.display().to_string()));
    }

    if !is_supported_path(path) {
        return Err(DepthError::UnsupportedImage(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let bytes = std::fs::read(path)?;
    debug!("read {} ({} bytes)", path.display(), bytes.len());

    UploadedImage::from_bytes(file_name, bytes, max_image_size)
}

/// 拡張子が jpg/jpeg/png か（大文字小文字を区別しない）
pub fn is_supported_path(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

fn encode(img: &DynamicImage, format: ImageFormat) -> std::result::Result<Vec<u8>, image::ImageError> {
    let mut buffer = Cursor::new(Vec::new());
    match format {
        // JPEGはアルファ非対応
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut buffer, format)?,
        _ => img.write_to(&mut buffer, format)?,
    }
    Ok(buffer.into_inner())
}
