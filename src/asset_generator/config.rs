//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `AssetConfig`，保证运行时行为可观测、可调整、可测试。
//! 其中缩放档位（quality / balanced / speed）作为高层语义，映射到底层滤镜。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的平衡配置。
//! - `ResizeProfile` 负责档位字符串解析与反向输出。
//! - `apply_resize_profile` 将档位转换为具体滤镜。
//! - `infer_resize_profile` 用于从当前配置反推档位。
//!
//! 所有档位都使用平滑滤镜，不提供最近邻插值。

use image::imageops::FilterType;

use super::AssetError;

/// JPEG 默认编码质量（与浏览器 `toBlob` 默认值一致）。
pub const DEFAULT_JPEG_QUALITY: u8 = 92;

/// 资源生成配置。
///
/// 字段覆盖了读取、解码、缩放与编码四个阶段。
#[derive(Debug, Clone)]
pub struct AssetConfig {
    /// 读取原始字节时允许的最大文件体积（字节）。
    pub max_file_size: u64,
    /// 解码后的像素上限（`width * height`）。
    pub max_decoded_pixels: u64,
    /// 解码阶段允许的预计内存上限（按 RGBA 估算，字节）。
    pub max_decoded_bytes: u64,
    /// 缩放滤镜策略。
    pub resize_filter: FilterType,
    /// JPEG 编码质量（1~100）。
    pub jpeg_quality: u8,
    /// JPEG 不支持透明通道，透明像素合成到该底色上。
    pub jpeg_background: [u8; 3],
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            max_decoded_pixels: 40_000_000,
            max_decoded_bytes: 160 * 1024 * 1024,
            resize_filter: FilterType::CatmullRom,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            jpeg_background: [0, 0, 0],
        }
    }
}

/// 缩放档位（面向用户语义）。
///
/// - `Quality`：Lanczos3，边缘最锐利
/// - `Balanced`：CatmullRom，默认
/// - `Speed`：双线性
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeProfile {
    Quality,
    Balanced,
    Speed,
}

impl ResizeProfile {
    /// 从外部字符串解析档位。
    ///
    /// # 示例
    /// ```rust
    /// use android_asset_generator::asset_generator::ResizeProfile;
    ///
    /// let p = ResizeProfile::from_str("balanced")?;
    /// assert_eq!(p.as_str(), "balanced");
    /// # Ok::<(), android_asset_generator::asset_generator::AssetError>(())
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(profile: &str) -> Result<Self, AssetError> {
        match profile.trim().to_lowercase().as_str() {
            "quality" => Ok(Self::Quality),
            "balanced" => Ok(Self::Balanced),
            "speed" => Ok(Self::Speed),
            other => Err(AssetError::InvalidFormat(format!(
                "未知缩放档位：{}（可选：quality / balanced / speed）",
                other
            ))),
        }
    }

    /// 将档位输出为稳定字符串。
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Quality => "quality",
            Self::Balanced => "balanced",
            Self::Speed => "speed",
        }
    }

    fn filter(self) -> FilterType {
        match self {
            Self::Quality => FilterType::Lanczos3,
            Self::Balanced => FilterType::CatmullRom,
            Self::Speed => FilterType::Triangle,
        }
    }
}

impl AssetConfig {
    /// 基于当前滤镜反推缩放档位。
    pub(crate) fn infer_resize_profile(&self) -> ResizeProfile {
        match self.resize_filter {
            FilterType::Lanczos3 => ResizeProfile::Quality,
            FilterType::Triangle | FilterType::Nearest => ResizeProfile::Speed,
            FilterType::CatmullRom | FilterType::Gaussian => ResizeProfile::Balanced,
        }
    }

    /// 应用指定缩放档位到实际参数。
    pub(crate) fn apply_resize_profile(&mut self, profile: ResizeProfile) {
        self.resize_filter = profile.filter();
    }

    /// 校验并设置 JPEG 质量。
    pub(crate) fn set_jpeg_quality(&mut self, quality: u8) -> Result<(), AssetError> {
        if !(1..=100).contains(&quality) {
            return Err(AssetError::InvalidFormat(format!(
                "jpeg_quality 必须在 1~100 之间：{}",
                quality
            )));
        }
        self.jpeg_quality = quality;
        Ok(())
    }
}
