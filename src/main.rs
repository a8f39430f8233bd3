//! # Android 多密度资源生成工具 — 命令行入口
//!
//! 本文件仅负责参数解析、日志初始化与结果输出。
//! 业务逻辑分布在各子模块中，详见 `lib.rs` 架构文档。

use std::path::PathBuf;
use std::process::ExitCode;

use android_asset_generator::asset_generator::{AssetServiceState, AssetSummary};
use android_asset_generator::error::AppError;
use android_asset_generator::settings::{self, GeneratorSettings};
use android_asset_generator::storage::{self, ExportSummary};
use clap::Parser;
use serde::Serialize;

/// 由一张 xxxhdpi 基准图生成 mdpi ~ xxxhdpi 全套 drawable 资源。
#[derive(Debug, Parser)]
#[command(name = "android-asset-generator", version, about)]
struct Cli {
    /// 基准图路径（仅支持 PNG / JPEG）
    input: PathBuf,

    /// 输出格式：png / jpeg / webp
    #[arg(short, long)]
    format: Option<String>,

    /// 需要生成的密度，逗号分隔，例如 mdpi,hdpi,xxxhdpi
    #[arg(short, long, value_delimiter = ',')]
    densities: Option<Vec<String>>,

    /// 缩放档位：quality / balanced / speed
    #[arg(short, long)]
    profile: Option<String>,

    /// JPEG 编码质量（1~100）
    #[arg(long)]
    jpeg_quality: Option<u8>,

    /// JSON 设置文件，命令行参数优先
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 输出目录
    #[arg(short, long, default_value = ".")]
    out: PathBuf,

    /// 同时写出 android-assets.zip
    #[arg(long)]
    zip: bool,

    /// 不写出单个资源文件（配合 --zip 使用）
    #[arg(long)]
    no_files: bool,

    /// 以 JSON 输出结果
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct RunReport {
    source: String,
    width: u32,
    height: u32,
    format: String,
    assets: Vec<AssetSummary>,
    exports: Vec<ExportSummary>,
}

#[derive(Debug, Serialize)]
struct ErrorReport<'a> {
    code: &'static str,
    error: &'a AppError,
}

async fn run(cli: &Cli) -> Result<RunReport, AppError> {
    let file_settings = match &cli.config {
        Some(path) => settings::load_settings(path)?,
        None => GeneratorSettings::default(),
    };
    let cli_settings = GeneratorSettings {
        format: cli.format.clone(),
        densities: cli.densities.clone(),
        profile: cli.profile.clone(),
        jpeg_quality: cli.jpeg_quality,
    };

    let service = AssetServiceState::new();
    file_settings.merged_with(cli_settings).apply(&service).await?;

    let input = cli.input.to_string_lossy().to_string();
    let assets = service.load_file(&input).await?;

    let generator = service.generator();
    let (width, height) = generator
        .source_image()?
        .map(|source| (source.width(), source.height()))
        .unwrap_or((0, 0));
    let format = generator.output_format()?.to_string();

    let mut exports = Vec::new();
    if !cli.no_files {
        exports.push(storage::export_assets(&service.rendered_assets(), &cli.out)?);
    }
    if cli.zip {
        let archive = service.build_archive()?;
        exports.push(storage::export_archive(&archive, &cli.out)?);
    }

    Ok(RunReport {
        source: input,
        width,
        height,
        format,
        assets,
        exports,
    })
}

fn print_report(report: &RunReport) {
    println!("基准图: {} ({}x{})", report.source, report.width, report.height);
    println!("输出格式: {}", report.format);
    for asset in &report.assets {
        println!(
            "  {:<32} {:>5}x{:<5} {}",
            asset.file_name, asset.width, asset.height, asset.size_label
        );
    }
    for export in &report.exports {
        for file in &export.files {
            println!("已写出: {}", file);
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match run(&cli).await {
        Ok(report) => {
            if cli.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{}", json),
                    Err(err) => {
                        log::error!("序列化结果失败: {err}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                print_report(&report);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            if cli.json {
                let payload = ErrorReport {
                    code: err.code(),
                    error: &err,
                };
                if let Ok(json) = serde_json::to_string_pretty(&payload) {
                    println!("{}", json);
                }
            }
            log::error!("生成失败: {err}");
            ExitCode::FAILURE
        }
    }
}
