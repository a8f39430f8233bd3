//! 生成结果写出模块
//!
//! # 设计思路
//!
//! 将已发布的结果集写到磁盘，目录结构与压缩包内部一致：
//!
//! ```text
//! <out>/drawable-mdpi/asset.png
//! <out>/drawable-hdpi/asset.png
//! <out>/android-assets.zip
//! ```
//!
//! # 实现思路
//!
//! - 输出目录不存在时自动 `create_dir_all`，避免上层判断。
//! - 所有可能失败的操作均返回 `Result`，不使用 `expect()` / `unwrap()`。

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::asset_generator::{AssetArchive, RenderedAssetSet};
use crate::error::AppError;

/// 写出结果信息（路径 + 占用大小 + 文件数）
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    pub path: String,
    pub total_size: u64,
    pub file_count: u64,
    pub files: Vec<String>,
}

/// 确保输出目录存在。
pub fn ensure_output_dir(dir: &Path) -> Result<PathBuf, AppError> {
    if !dir.exists() {
        fs::create_dir_all(dir).map_err(|e| {
            AppError::Storage(format!("创建输出目录 '{}' 失败: {}", dir.display(), e))
        })?;
    }
    if !dir.is_dir() {
        return Err(AppError::Storage(format!("'{}' 不是目录", dir.display())));
    }
    Ok(dir.to_path_buf())
}

/// 逐个写出资源：`<out>/drawable-<density>/asset.<ext>`。
pub fn export_assets(assets: &RenderedAssetSet, out_dir: &Path) -> Result<ExportSummary, AppError> {
    let dir = ensure_output_dir(out_dir)?;
    let mut total_size: u64 = 0;
    let mut files = Vec::with_capacity(assets.len());

    for asset in assets.iter() {
        let path = dir.join(asset.file_name());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::Storage(format!("创建目录 '{}' 失败: {}", parent.display(), e))
            })?;
        }
        fs::write(&path, &asset.bytes)?;
        total_size += asset.bytes.len() as u64;
        files.push(path.to_string_lossy().to_string());
    }

    log::info!("💾 已写出 {} 个资源到 {}", files.len(), dir.display());

    Ok(ExportSummary {
        path: dir.to_string_lossy().to_string(),
        total_size,
        file_count: files.len() as u64,
        files,
    })
}

/// 写出压缩包：`<out>/android-assets.zip`。
pub fn export_archive(archive: &AssetArchive, out_dir: &Path) -> Result<ExportSummary, AppError> {
    let dir = ensure_output_dir(out_dir)?;
    let path = dir.join(archive.file_name);
    fs::write(&path, &archive.bytes)?;

    log::info!("💾 已写出压缩包 {}（{} 个条目）", path.display(), archive.entries.len());

    Ok(ExportSummary {
        path: dir.to_string_lossy().to_string(),
        total_size: archive.bytes.len() as u64,
        file_count: 1,
        files: vec![path.to_string_lossy().to_string()],
    })
}
