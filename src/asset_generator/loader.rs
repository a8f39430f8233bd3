//! # 加载与校验模块
//!
//! ## 设计思路
//!
//! 统一处理不同来源（Base64 / 本地文件 / 内存字节）的原始字节加载，并在“尽可能早”的阶段执行输入校验。
//! 目标是尽快失败：不合法的输入不会进入解码，也不会改动生成器状态。
//!
//! ## 实现思路
//!
//! - Base64：格式解析 + 解码前体积预估 + 解码后体积限制。
//! - 文件：存在性 + metadata 体积限制 + 读取。
//! - 所有来源最后统一做文件签名（magic bytes）校验，仅接受 PNG / JPEG。

use base64::{Engine as _, engine::general_purpose};
use std::path::Path;

use super::source::{ImageSource, RawImageData};
use super::{AssetConfig, AssetError, AssetGenerator};

/// 允许作为基准图的输入类型。输出支持 WEBP，但输入不接受。
const ACCEPTED_INTAKE_MIME_TYPES: [&str; 2] = ["image/png", "image/jpeg"];

impl AssetGenerator {
    /// 按来源加载原始字节。
    pub(super) fn load_raw(
        source: ImageSource,
        config: &AssetConfig,
    ) -> Result<RawImageData, AssetError> {
        match source {
            ImageSource::Base64(data) => Self::load_from_base64(&data, config),
            ImageSource::FilePath(path) => Self::load_from_file(&path, config),
            ImageSource::Bytes(bytes) => Self::load_from_bytes(bytes, config),
        }
    }

    /// 从 Base64 字符串加载图片原始字节。
    fn load_from_base64(data: &str, config: &AssetConfig) -> Result<RawImageData, AssetError> {
        log::info!("📝 开始处理 base64 图片");

        let bytes = Self::parse_base64_with_limit(data, config.max_file_size)?;

        if bytes.len() as u64 > config.max_file_size {
            return Err(AssetError::ResourceLimit(format!(
                "Base64 解码后体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(RawImageData {
            bytes,
            source_hint: "base64",
        })
    }

    /// 从本地路径加载图片原始字节。
    fn load_from_file(path: &str, config: &AssetConfig) -> Result<RawImageData, AssetError> {
        log::info!("📁 开始读取本地图片 - 路径: {}", path);

        let file_path = Path::new(path);
        if !file_path.exists() {
            return Err(AssetError::FileSystem(format!("文件不存在：{}", path)));
        }

        let metadata = std::fs::metadata(file_path)
            .map_err(|e| AssetError::FileSystem(format!("无法读取文件信息：{}", e)))?;

        if metadata.len() > config.max_file_size {
            return Err(AssetError::ResourceLimit(format!(
                "文件过大：{:.2} MB（限制：{:.2} MB）",
                metadata.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        let bytes = std::fs::read(file_path)
            .map_err(|e| AssetError::FileSystem(format!("无法读取图片文件：{}", e)))?;

        Ok(RawImageData {
            bytes,
            source_hint: "file",
        })
    }

    fn load_from_bytes(bytes: Vec<u8>, config: &AssetConfig) -> Result<RawImageData, AssetError> {
        if bytes.len() as u64 > config.max_file_size {
            return Err(AssetError::ResourceLimit(format!(
                "图片体积过大：{:.2} MB（限制：{:.2} MB）",
                bytes.len() as f64 / 1024.0 / 1024.0,
                config.max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        Ok(RawImageData {
            bytes,
            source_hint: "bytes",
        })
    }

    fn estimate_base64_decoded_upper_bound_len(base64_data: &str) -> Result<u64, AssetError> {
        let len = base64_data.trim().len() as u64;
        let groups = len
            .checked_add(3)
            .ok_or_else(|| AssetError::ResourceLimit("Base64 输入长度溢出".to_string()))?
            / 4;

        groups
            .checked_mul(3)
            .ok_or_else(|| AssetError::ResourceLimit("Base64 解码体积估算溢出".to_string()))
    }

    /// 解析 Base64 输入（支持 Data URL / 纯 Base64），解码前先按预估体积拒绝超限输入。
    fn parse_base64_with_limit(data: &str, max_file_size: u64) -> Result<Vec<u8>, AssetError> {
        let normalized = data.trim();

        let payload = if normalized.starts_with("data:") {
            let base64_start = normalized
                .find(";base64,")
                .ok_or_else(|| AssetError::InvalidFormat("缺少 base64 标记".to_string()))?;
            &normalized[base64_start + 8..]
        } else {
            normalized
        };

        let estimated_len = Self::estimate_base64_decoded_upper_bound_len(payload)?;
        if estimated_len > max_file_size {
            return Err(AssetError::ResourceLimit(format!(
                "Base64 预计解码体积过大：{:.2} MB（限制：{:.2} MB）",
                estimated_len as f64 / 1024.0 / 1024.0,
                max_file_size as f64 / 1024.0 / 1024.0
            )));
        }

        general_purpose::STANDARD
            .decode(payload)
            .map_err(|e| AssetError::Decode(format!("Base64 解码失败：{}", e)))
    }

    /// 通过文件签名校验输入类型，仅接受 PNG / JPEG。
    ///
    /// 返回识别出的 MIME 类型。
    pub(super) fn validate_intake_signature(bytes: &[u8]) -> Result<&'static str, AssetError> {
        if bytes.is_empty() {
            return Err(AssetError::InvalidFormat("图片内容为空".to_string()));
        }

        let kind = infer::get(bytes)
            .ok_or_else(|| AssetError::InvalidFormat("无法识别图片类型".to_string()))?;

        if !ACCEPTED_INTAKE_MIME_TYPES.contains(&kind.mime_type()) {
            return Err(AssetError::InvalidFormat(format!(
                "请上传 PNG 或 JPEG 图片（当前类型：{}）",
                kind.mime_type()
            )));
        }

        Ok(kind.mime_type())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;

    fn encode_test_image(format: ImageFormat) -> Vec<u8> {
        let img = ImageBuffer::from_fn(8, 8, |x, y| Rgba([(x * 30) as u8, (y * 30) as u8, 90, 255]));
        let dyn_img = match format {
            ImageFormat::Jpeg => DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(img).to_rgb8()),
            _ => DynamicImage::ImageRgba8(img),
        };
        let mut cursor = Cursor::new(Vec::new());
        dyn_img
            .write_to(&mut cursor, format)
            .expect("failed to encode test image");
        cursor.into_inner()
    }

    #[test]
    fn intake_accepts_png_and_jpeg() {
        let png = encode_test_image(ImageFormat::Png);
        let jpeg = encode_test_image(ImageFormat::Jpeg);

        assert_eq!(
            AssetGenerator::validate_intake_signature(&png).expect("png accepted"),
            "image/png"
        );
        assert_eq!(
            AssetGenerator::validate_intake_signature(&jpeg).expect("jpeg accepted"),
            "image/jpeg"
        );
    }

    #[test]
    fn intake_rejects_webp_gif_and_text() {
        let webp = encode_test_image(ImageFormat::WebP);
        let gif = encode_test_image(ImageFormat::Gif);

        for bytes in [webp, gif, b"hello world".to_vec(), Vec::new()] {
            assert!(matches!(
                AssetGenerator::validate_intake_signature(&bytes),
                Err(AssetError::InvalidFormat(_))
            ));
        }
    }

    #[test]
    fn base64_accepts_data_url_and_plain_payload() {
        let png = encode_test_image(ImageFormat::Png);
        let encoded = general_purpose::STANDARD.encode(&png);
        let config = AssetConfig::default();

        let from_url = AssetGenerator::load_raw(
            ImageSource::Base64(format!("data:image/png;base64,{}", encoded)),
            &config,
        )
        .expect("data url should load");
        assert_eq!(from_url.bytes, png);
        assert_eq!(from_url.source_hint, "base64");

        let plain = AssetGenerator::load_raw(ImageSource::Base64(encoded), &config)
            .expect("plain base64 should load");
        assert_eq!(plain.bytes, png);
    }

    #[test]
    fn parse_base64_with_limit_rejects_large_payload_before_decode() {
        let huge = "A".repeat(1024 * 1024);
        let result = AssetGenerator::parse_base64_with_limit(&huge, 32);

        assert!(matches!(result, Err(AssetError::ResourceLimit(_))));
    }

    #[test]
    fn data_url_without_marker_is_rejected() {
        let result = AssetGenerator::parse_base64_with_limit("data:image/png,abcd", 1024);
        assert!(matches!(result, Err(AssetError::InvalidFormat(_))));
    }

    #[test]
    fn missing_file_is_reported() {
        let result = AssetGenerator::load_raw(
            ImageSource::FilePath("/definitely/not/here.png".to_string()),
            &AssetConfig::default(),
        );
        assert!(matches!(result, Err(AssetError::FileSystem(_))));
    }

    #[test]
    fn oversized_bytes_are_rejected() {
        let mut config = AssetConfig::default();
        config.max_file_size = 4;

        let result = AssetGenerator::load_raw(ImageSource::Bytes(vec![0u8; 16]), &config);
        assert!(matches!(result, Err(AssetError::ResourceLimit(_))));
    }
}
