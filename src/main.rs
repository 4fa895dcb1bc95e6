use clap::Parser;
use depth_estimator_common::{interpret, render, Interpretation, ReportStyle};
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use hole_depth_estimator::{cli, config, error, estimator, vision};
use cli::{Cli, Commands};
use config::Config;
use error::{DepthError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;
use vision::GeminiClient;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// ログはstderrへ（stdoutはレポート用）
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Estimate { image, format, model } => {
            let mut config = Config::load()?;
            if let Some(model) = model {
                config.model = model;
            }
            let client = GeminiClient::new(&config)?;

            match image {
                Some(path) => {
                    let interpretation = analyze(&client, &path, config.max_image_size).await?;
                    println!("{}", render(&interpretation, format));
                }
                None => run_interactive(&client, config.max_image_size, format).await?,
            }
        }

        Commands::Interpret { input, format } => {
            let raw = read_input(input.as_deref())?;
            println!("{}", render(&interpret(&raw), format));
        }

        Commands::Config { set_api_key, set_model, show } => {
            let mut config = Config::load()?;

            if let Some(key) = set_api_key {
                config.set_api_key(key)?;
                println!("API key saved");
            }

            if let Some(model) = set_model {
                config.set_model(model)?;
                println!("Model saved");
            }

            if show {
                println!("Config:");
                println!("  path: {}", Config::config_path()?.display());
                println!("  model: {}", config.model);
                println!("  api base url: {}", config.api_base_url);
                println!("  max image size: {}px", config.max_image_size);
                println!("  timeout: {}s", config.timeout_seconds);
                println!("  api key: {}", if config.get_api_key().is_ok() { "set" } else { "not set" });
            }
        }
    }

    Ok(())
}

/// 1サイクル実行（スピナー付き）
async fn analyze(client: &GeminiClient, path: &Path, max_image_size: u32) -> Result<Interpretation> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner());
    spinner.set_message("Analyzing image...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = estimator::estimate_file(client, path, max_image_size).await;
    spinner.finish_and_clear();
    result
}

/// 対話モード: 画像パスを聞いて推定を繰り返す
///
/// 1枚ごとのエラーは表示して続行する。
async fn run_interactive(client: &GeminiClient, max_image_size: u32, format: ReportStyle) -> Result<()> {
    let theme = ColorfulTheme::default();

    println!("Hole Depth Estimator");
    println!("Upload an image of a hole or excavation site to estimate its depth.\n");

    loop {
        let input: String = Input::with_theme(&theme)
            .with_prompt("Image path (jpg/jpeg/png)")
            .interact_text()
            .map_err(|e| DepthError::Prompt(e.to_string()))?;
        let path = PathBuf::from(input.trim().trim_matches(|c: char| c == '"' || c == '\''));

        match analyze(client, &path, max_image_size).await {
            Ok(interpretation) => println!("\n{}\n", render(&interpretation, format)),
            Err(e) => eprintln!("\n{}\n", e),
        }

        let again = Confirm::with_theme(&theme)
            .with_prompt("Analyze another image?")
            .default(true)
            .interact()
            .map_err(|e| DepthError::Prompt(e.to_string()))?;
        if !again {
            break;
        }
    }

    Ok(())
}

fn read_input(input: Option<&Path>) -> Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            if !path.is_file() {
                return Err(DepthError::FileNotFound(path.display().to_string()));
            }
            Ok(std::fs::read_to_string(path)?)
        }
        _ => {
            let mut raw = String::new();
            std::io::stdin().read_to_string(&mut raw)?;
            Ok(raw)
        }
    }
}
