//! # 解码与缩放流水线模块
//!
//! ## 设计思路
//!
//! 将“字节 → 基准图 → 各密度栅格”的过程集中管理，并在关键节点增加资源上限控制。
//! 优先做尺寸检查，再进行完整解码，降低恶意输入触发高内存开销的风险。
//!
//! ## 实现思路
//!
//! 1. 签名校验（仅 PNG / JPEG）并读取 header 尺寸
//! 2. 按像素与内存上限快速拒绝
//! 3. 完整解码为 RGBA
//! 4. 每个密度独立缩放：目标尺寸 = round(原尺寸 × 档位系数 / 4)
//!
//! 每次缩放都在自己的输出缓冲上进行，基准图只读借用，不存在共享画布。

use fast_image_resize as fr;
use image::imageops::FilterType;
use image::{DynamicImage, ImageBuffer, ImageFormat, RgbaImage};
use std::io::Cursor;

use super::source::{RawImageData, RenderedAsset, SourceImage};
use super::{AssetConfig, AssetError, AssetGenerator, Density, OutputFormat};

impl AssetGenerator {
    /// 将原始字节解码为基准图。
    pub(super) fn decode_source(
        raw: RawImageData,
        config: &AssetConfig,
    ) -> Result<SourceImage, AssetError> {
        let mime_type = Self::validate_intake_signature(&raw.bytes)?;
        let format = if mime_type == "image/png" {
            ImageFormat::Png
        } else {
            ImageFormat::Jpeg
        };

        let (header_width, header_height) = Self::inspect_dimensions_from_memory(&raw.bytes)?;
        Self::validate_pixel_limits(config, header_width, header_height)?;
        Self::validate_decoded_memory_limits(config, header_width, header_height)?;

        let decoded = image::load_from_memory_with_format(&raw.bytes, format)
            .map_err(|e| AssetError::Decode(format!("图片解码失败：{}", e)))?;

        let pixels = decoded.to_rgba8();
        let (width, height) = pixels.dimensions();
        Self::validate_pixel_limits(config, width, height)?;

        if width == 0 || height == 0 {
            return Err(AssetError::Decode("图片尺寸为 0".to_string()));
        }

        log::info!(
            "✅ 基准图解码成功 - 来源: {} 类型: {} 尺寸: {}x{}",
            raw.source_hint,
            mime_type,
            width,
            height
        );

        Ok(SourceImage {
            pixels,
            mime_type,
            byte_len: raw.bytes.len(),
        })
    }

    /// 仅通过内存中的图片头信息读取宽高。
    ///
    /// 用于在完整解码前做像素限制检查。
    fn inspect_dimensions_from_memory(bytes: &[u8]) -> Result<(u32, u32), AssetError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| AssetError::InvalidFormat(format!("无法识别图片格式：{}", e)))?;

        reader
            .into_dimensions()
            .map_err(|e| AssetError::InvalidFormat(format!("无法读取图片尺寸：{}", e)))
    }

    /// 校验像素数量是否超过配置上限。
    fn validate_pixel_limits(config: &AssetConfig, width: u32, height: u32) -> Result<(), AssetError> {
        let pixels = (width as u64)
            .checked_mul(height as u64)
            .ok_or_else(|| AssetError::ResourceLimit("图片像素数溢出".to_string()))?;

        if pixels > config.max_decoded_pixels {
            return Err(AssetError::ResourceLimit(format!(
                "图片像素过大：{} 像素（限制：{} 像素）",
                pixels, config.max_decoded_pixels
            )));
        }

        Ok(())
    }

    fn validate_decoded_memory_limits(
        config: &AssetConfig,
        width: u32,
        height: u32,
    ) -> Result<(), AssetError> {
        let estimated = (width as u64)
            .checked_mul(height as u64)
            .and_then(|pixels| pixels.checked_mul(4))
            .ok_or_else(|| AssetError::ResourceLimit("图片解码内存估算溢出".to_string()))?;

        if estimated > config.max_decoded_bytes {
            return Err(AssetError::ResourceLimit(format!(
                "图片解码预计内存过大：{:.2} MB（限制：{:.2} MB）",
                estimated as f64 / 1024.0 / 1024.0,
                config.max_decoded_bytes as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(())
    }

    /// 生成单个密度档位：缩放 + 编码。
    ///
    /// 在阻塞线程中执行，只读借用基准图。
    pub(super) fn render_density(
        source: &SourceImage,
        density: Density,
        format: OutputFormat,
        config: &AssetConfig,
    ) -> Result<RenderedAsset, AssetError> {
        let raster = Self::resample_for_density(source, density, config.resize_filter)?;
        let (width, height) = raster.dimensions();
        let bytes = Self::encode_raster(&raster, format, config)?;

        Ok(RenderedAsset {
            density,
            format,
            width,
            height,
            bytes: bytes.into(),
        })
    }

    /// 按密度档位缩放基准图。
    ///
    /// 基准档位（xxxhdpi）同样走一遍缩放流程，得到等尺寸的新栅格。
    pub(crate) fn resample_for_density(
        source: &SourceImage,
        density: Density,
        filter: FilterType,
    ) -> Result<RgbaImage, AssetError> {
        let filter = Self::smooth_filter(filter);
        let (target_width, target_height) = density.target_size(source.width(), source.height());

        if target_width == 0 || target_height == 0 {
            return Err(AssetError::Resample(format!(
                "{} 目标尺寸为 0（基准图 {}x{} 过小）",
                density,
                source.width(),
                source.height()
            )));
        }

        log::debug!(
            "🧩 缩放 {}：{}x{} -> {}x{}（filter={:?}）",
            density,
            source.width(),
            source.height(),
            target_width,
            target_height,
            filter
        );

        match Self::resize_with_fast_image_resize(&source.pixels, target_width, target_height, filter) {
            Ok(resized) => Ok(resized),
            Err(err) => {
                log::warn!(
                    "⚠️ fast_image_resize 缩放失败，回退 image::resize_exact：{}",
                    err
                );
                let fallback = DynamicImage::ImageRgba8(source.pixels.clone())
                    .resize_exact(target_width, target_height, filter);
                Ok(fallback.to_rgba8())
            }
        }
    }

    fn resize_with_fast_image_resize(
        src: &RgbaImage,
        target_width: u32,
        target_height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, AssetError> {
        let (src_width, src_height) = src.dimensions();

        let src_image = fr::images::ImageRef::new(
            src_width,
            src_height,
            src.as_raw(),
            fr::PixelType::U8x4,
        )
        .map_err(|e| AssetError::Resample(format!("构建源图像缓冲失败：{}", e)))?;

        let mut dst_image = fr::images::Image::new(target_width, target_height, fr::PixelType::U8x4);

        let mut resizer = fr::Resizer::new();
        let options = fr::ResizeOptions::new().resize_alg(fr::ResizeAlg::Convolution(
            Self::to_fast_filter(filter),
        ));

        resizer
            .resize(&src_image, &mut dst_image, Some(&options))
            .map_err(|e| AssetError::Resample(format!("fast_image_resize 执行失败：{}", e)))?;

        ImageBuffer::from_raw(target_width, target_height, dst_image.into_vec())
            .ok_or_else(|| AssetError::Resample("fast_image_resize 输出缓冲长度异常".to_string()))
    }

    /// 最近邻不做平滑，按双线性处理。
    fn smooth_filter(filter: FilterType) -> FilterType {
        match filter {
            FilterType::Nearest => FilterType::Triangle,
            other => other,
        }
    }

    fn to_fast_filter(filter: FilterType) -> fr::FilterType {
        match filter {
            FilterType::Nearest | FilterType::Triangle => fr::FilterType::Bilinear,
            FilterType::CatmullRom => fr::FilterType::CatmullRom,
            FilterType::Gaussian => fr::FilterType::Mitchell,
            FilterType::Lanczos3 => fr::FilterType::Lanczos3,
        }
    }
}
