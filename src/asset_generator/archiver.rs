//! # 打包模块
//!
//! 把当前发布的结果集打成一个 zip，每个密度一个条目：
//!
//! ```text
//! android-assets.zip
//! ├── drawable-mdpi/asset.png
//! ├── drawable-hdpi/asset.png
//! └── ...
//! ```
//!
//! 压缩包按需即时生成，不做缓存。

use bytes::Bytes;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::source::RenderedAssetSet;
use super::AssetError;

/// 压缩包下载文件名。
pub const ARCHIVE_FILE_NAME: &str = "android-assets.zip";

/// 打包结果。
#[derive(Debug, Clone)]
pub struct AssetArchive {
    pub file_name: &'static str,
    /// 条目路径，顺序与写入顺序一致。
    pub entries: Vec<String>,
    pub bytes: Bytes,
}

/// 将结果集写入 zip。
///
/// 结果集为空时生成一个合法的空压缩包。
pub fn build_archive(assets: &RenderedAssetSet) -> Result<AssetArchive, AssetError> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = Vec::with_capacity(assets.len());

    for asset in assets.iter() {
        let path = asset.file_name();
        zip.start_file(path.as_str(), options)
            .map_err(|e| AssetError::Archive(format!("创建条目 {} 失败：{}", path, e)))?;
        zip.write_all(&asset.bytes)
            .map_err(|e| AssetError::Archive(format!("写入条目 {} 失败：{}", path, e)))?;
        entries.push(path);
    }

    let cursor = zip
        .finish()
        .map_err(|e| AssetError::Archive(format!("生成压缩包失败：{}", e)))?;
    let bytes = cursor.into_inner();

    log::info!(
        "📦 压缩包生成完成 - 条目: {} 体积: {:.1} KB",
        entries.len(),
        bytes.len() as f64 / 1024.0
    );

    Ok(AssetArchive {
        file_name: ARCHIVE_FILE_NAME,
        entries,
        bytes: bytes.into(),
    })
}
