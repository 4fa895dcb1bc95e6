use anyhow::{bail, Context, Result};
use depth_estimator_common::Interpretation;
use std::path::{Path, PathBuf};
use std::process::Command;

const CLI_NAME: &str = "hole-depth-estimator";

/// CLIで1枚推定し、JSON出力を Interpretation として読む
///
/// CLIが失敗終了した場合は stderr をエラーメッセージにする。
pub fn run_estimate(cli: &Path, image: &Path) -> Result<Interpretation> {
    let output = Command::new(cli)
        .args(["estimate", image.to_string_lossy().as_ref(), "--format", "json"])
        .output()
        .with_context(|| format!("run {}", cli.display()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("{}", last_line(&stderr));
    }

    parse_cli_output(&output.stdout)
}

pub fn parse_cli_output(stdout: &[u8]) -> Result<Interpretation> {
    let interpretation: Interpretation =
        serde_json::from_slice(stdout).context("parse estimate output")?;
    Ok(interpretation)
}

pub fn resolve_cli_binary() -> PathBuf {
    let file_name = format!("{}{}", CLI_NAME, std::env::consts::EXE_SUFFIX);
    let exe = std::env::current_exe().ok();
    if let Some(base_dir) = exe.as_ref().and_then(|p| p.parent()) {
        let local = base_dir.join(&file_name);
        if local.exists() {
            return local;
        }
        if let Some(target_dir) = base_dir.parent() {
            for profile in ["debug", "release"] {
                let sibling = target_dir.join(profile).join(&file_name);
                if sibling.exists() {
                    return sibling;
                }
            }
        }
    }
    PathBuf::from(CLI_NAME)
}

/// ログ行を除いた最後のメッセージ行
fn last_line(stderr: &str) -> String {
    stderr
        .lines()
        .rev()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("estimate failed")
        .to_string()
}
