//! 深さ推定フロー
//!
//! 画像 → Gemini → 応答解釈 の1サイクルを実行する。
//! 通信・サービスエラーは Err(ApiCall)、パース失敗は Ok(Interpretation::Unparsed)。

use crate::error::Result;
use crate::image_source::{load_image, UploadedImage};
use crate::vision::VisionModelClient;
use depth_estimator_common::{interpret, Interpretation, DEPTH_ESTIMATION_PROMPT};
use std::path::Path;
use tracing::{info, warn};

pub async fn estimate_depth<C>(client: &C, image: &UploadedImage) -> Result<Interpretation>
where
    C: VisionModelClient + ?Sized,
{
    info!(
        "analyzing {} ({}x{}, {} bytes) with {}",
        image.file_name,
        image.width,
        image.height,
        image.data.len(),
        client.model()
    );

    let raw = client.generate(DEPTH_ESTIMATION_PROMPT, image).await?;
    info!("response received: {} chars", raw.chars().count());

    let interpretation = interpret(&raw);
    if let Interpretation::Unparsed(failure) = &interpretation {
        warn!("response could not be parsed: {}", failure.reason());
    }

    Ok(interpretation)
}

/// ファイルを読み込んでから推定
pub async fn estimate_file<C>(client: &C, path: &Path, max_image_size: u32) -> Result<Interpretation>
where
    C: VisionModelClient + ?Sized,
{
    let image = load_image(path, max_image_size)?;
    estimate_depth(client, &image).await
}
