//! # 编码模块
//!
//! 将缩放后的 RGBA 栅格序列化为 PNG / JPEG / WEBP 字节。
//!
//! - PNG、WEBP 使用无损编码
//! - JPEG 使用配置中的固定质量；不支持透明通道，先按底色合成

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbImage, RgbaImage};

use super::{AssetConfig, AssetError, AssetGenerator, OutputFormat};

impl AssetGenerator {
    /// 按输出格式编码栅格。
    ///
    /// 编码结果为空视为失败，对应的密度会被跳过。
    pub(crate) fn encode_raster(
        raster: &RgbaImage,
        format: OutputFormat,
        config: &AssetConfig,
    ) -> Result<Vec<u8>, AssetError> {
        let (width, height) = raster.dimensions();
        let mut buffer = Vec::new();

        let result = match format {
            OutputFormat::Png => PngEncoder::new(&mut buffer).write_image(
                raster.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            OutputFormat::Webp => WebPEncoder::new_lossless(&mut buffer).write_image(
                raster.as_raw(),
                width,
                height,
                ExtendedColorType::Rgba8,
            ),
            OutputFormat::Jpeg => {
                let flattened = Self::flatten_alpha(raster, config.jpeg_background);
                JpegEncoder::new_with_quality(&mut buffer, config.jpeg_quality).write_image(
                    flattened.as_raw(),
                    width,
                    height,
                    ExtendedColorType::Rgb8,
                )
            }
        };

        result.map_err(|e| AssetError::Encode(format!("{} 编码失败：{}", format, e)))?;

        if buffer.is_empty() {
            return Err(AssetError::Encode(format!("{} 编码结果为空", format)));
        }

        Ok(buffer)
    }

    /// 将 RGBA 按 alpha 合成到纯色底上。
    fn flatten_alpha(raster: &RgbaImage, background: [u8; 3]) -> RgbImage {
        RgbImage::from_fn(raster.width(), raster.height(), |x, y| {
            let [r, g, b, a] = raster.get_pixel(x, y).0;
            let alpha = a as u16;
            let blend = |fg: u8, bg: u8| -> u8 {
                ((fg as u16 * alpha + bg as u16 * (255 - alpha) + 127) / 255) as u8
            };
            image::Rgb([blend(r, background[0]), blend(g, background[1]), blend(b, background[2])])
        })
    }
}
