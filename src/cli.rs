use clap::{Parser, Subcommand};
use depth_estimator_common::ReportStyle;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hole-depth-estimator")]
#[command(about = "Estimate the depth of a hole or excavation site from a photo", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 写真から深さを推定（画像を省略すると対話モード）
    Estimate {
        /// 画像ファイル (jpg/jpeg/png)
        image: Option<PathBuf>,

        /// 出力形式 (text/markdown/json)
        #[arg(short, long, default_value = "text")]
        format: ReportStyle,

        /// 使用するGeminiモデル（設定ファイルより優先）
        #[arg(short, long)]
        model: Option<String>,
    },

    /// 保存済みのモデル応答テキストを解釈して表示
    Interpret {
        /// 応答テキストファイル（省略または - で標準入力）
        input: Option<PathBuf>,

        /// 出力形式 (text/markdown/json)
        #[arg(short, long, default_value = "text")]
        format: ReportStyle,
    },

    /// 設定を表示/編集
    Config {
        /// APIキーを設定
        #[arg(long)]
        set_api_key: Option<String>,

        /// モデルを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
