//! # 数据源与中间模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“流水线中间结果”解耦：
//! - `ImageSource` 表示外部来源语义
//! - `RawImageData` 表示已加载但未解码的字节
//! - `SourceImage` 表示解码完成、只读共享的基准图
//! - `RenderedAsset` / `RenderedAssetSet` 表示一次生成的发布结果

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use image::RgbaImage;

use super::{Density, OutputFormat};

/// 基准图输入来源。
pub enum ImageSource {
    /// Base64（支持 Data URL 与纯 Base64 字符串）。
    Base64(String),
    /// 本地文件路径来源。
    FilePath(String),
    /// 已在内存中的原始字节。
    Bytes(Vec<u8>),
}

/// 加载阶段输出：原始字节与来源标识。
pub(crate) struct RawImageData {
    /// 原始图片字节。
    pub(crate) bytes: Vec<u8>,
    /// 来源提示（用于日志与诊断）。
    pub(crate) source_hint: &'static str,
}

/// 解码后的基准图。
///
/// 创建后不可变，多个密度任务通过 `Arc` 只读共享。
#[derive(Debug)]
pub struct SourceImage {
    pub(crate) pixels: RgbaImage,
    pub(crate) mime_type: &'static str,
    pub(crate) byte_len: usize,
}

impl SourceImage {
    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// 输入文件的 MIME 类型（`image/png` 或 `image/jpeg`）。
    pub fn mime_type(&self) -> &'static str {
        self.mime_type
    }

    /// 输入文件的原始字节数。
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }
}

/// 单个密度档位的生成结果。
#[derive(Debug, Clone)]
pub struct RenderedAsset {
    pub density: Density,
    pub format: OutputFormat,
    pub width: u32,
    pub height: u32,
    pub bytes: Bytes,
}

impl RenderedAsset {
    /// 建议文件路径：`drawable-<density>/asset.<ext>`。
    pub fn file_name(&self) -> String {
        self.format.entry_path(self.density)
    }

    /// 预览用的 Data URL。
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.format.mime_type(),
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// 体积展示文案，例如 `12.3 KB`。
    pub fn size_label(&self) -> String {
        format!("{:.1} KB", self.bytes.len() as f64 / 1024.0)
    }
}

/// 一次生成流程发布的完整结果集。
///
/// 整体替换，不做增量修改；读者拿到的总是某一轮生成的完整快照。
#[derive(Debug, Clone, Default)]
pub struct RenderedAssetSet {
    pub(crate) generation: u64,
    pub(crate) format: OutputFormat,
    pub(crate) assets: BTreeMap<Density, RenderedAsset>,
}

impl RenderedAssetSet {
    pub(crate) fn new(generation: u64, format: OutputFormat) -> Self {
        Self {
            generation,
            format,
            assets: BTreeMap::new(),
        }
    }

    /// 产出该结果集的生成序号，0 表示尚未生成。
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn get(&self, density: Density) -> Option<&RenderedAsset> {
        self.assets.get(&density)
    }

    pub fn densities(&self) -> Vec<Density> {
        self.assets.keys().copied().collect()
    }

    /// 按密度从低到高遍历。
    pub fn iter(&self) -> impl Iterator<Item = &RenderedAsset> {
        self.assets.values()
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.assets.values().map(|asset| asset.bytes.len()).sum()
    }

    pub(crate) fn insert(&mut self, asset: RenderedAsset) {
        self.assets.insert(asset.density, asset);
    }
}
