//! # 服务层
//!
//! ## 设计思路
//!
//! `AssetServiceState` 面向外层入口（CLI、设置文件），接收字符串参数，
//! 解析后转交 `AssetGenerator`。好处：
//! 1. 外层不需要了解枚举类型与解析规则
//! 2. 测试可创建独立实例，减少共享状态副作用
//!
//! ## 实现思路
//!
//! 对外仅暴露少量稳定 API：
//! - `load_file` / `load_base64`：加载基准图并生成
//! - `set_output_format` / `toggle_density` / `select_densities`：修改输入并重新生成
//! - `set_resize_profile` / `get_resize_profile`：切换缩放档位
//! - `list_assets`：输出可序列化的结果摘要

use std::sync::Arc;

use serde::Serialize;

use super::{
    AssetArchive, AssetConfig, AssetError, AssetGenerator, Density, DensitySelection, GeneratorStatus,
    ImageSource, OutputFormat, RenderedAssetSet, ResizeProfile,
};

/// 单个资源的展示摘要。
#[derive(Debug, Clone, Serialize)]
pub struct AssetSummary {
    pub density: &'static str,
    pub file_name: String,
    pub mime_type: &'static str,
    pub width: u32,
    pub height: u32,
    pub size_bytes: usize,
    pub size_label: String,
}

impl AssetSummary {
    fn from_set(set: &RenderedAssetSet) -> Vec<Self> {
        set.iter()
            .map(|asset| Self {
                density: asset.density.as_str(),
                file_name: asset.file_name(),
                mime_type: asset.format.mime_type(),
                width: asset.width,
                height: asset.height,
                size_bytes: asset.bytes.len(),
                size_label: asset.size_label(),
            })
            .collect()
    }
}

/// 资源生成服务状态。
pub struct AssetServiceState {
    generator: AssetGenerator,
}

impl AssetServiceState {
    /// 使用默认配置创建服务状态。
    ///
    /// # 示例
    /// ```rust
    /// use android_asset_generator::asset_generator::AssetServiceState;
    ///
    /// let service = AssetServiceState::new();
    /// assert_eq!(service.get_resize_profile()?, "balanced");
    /// # Ok::<(), android_asset_generator::asset_generator::AssetError>(())
    /// ```
    pub fn new() -> Self {
        Self::with_config(AssetConfig::default())
    }

    /// 使用自定义配置创建服务状态。
    pub fn with_config(config: AssetConfig) -> Self {
        Self {
            generator: AssetGenerator::new(config),
        }
    }

    pub fn generator(&self) -> &AssetGenerator {
        &self.generator
    }

    /// 读取本地文件作为基准图。
    pub async fn load_file(&self, path: &str) -> Result<Vec<AssetSummary>, AssetError> {
        let set = self
            .generator
            .load_source(ImageSource::FilePath(path.to_string()))
            .await?;
        Ok(AssetSummary::from_set(&set))
    }

    /// 以 Base64 / Data URL 作为基准图。
    pub async fn load_base64(&self, data: &str) -> Result<Vec<AssetSummary>, AssetError> {
        let set = self
            .generator
            .load_source(ImageSource::Base64(data.to_string()))
            .await?;
        Ok(AssetSummary::from_set(&set))
    }

    pub async fn set_output_format(&self, format: &str) -> Result<Vec<AssetSummary>, AssetError> {
        let format: OutputFormat = format.parse()?;
        let set = self.generator.set_output_format(format).await?;
        Ok(AssetSummary::from_set(&set))
    }

    pub async fn toggle_density(&self, density: &str) -> Result<Vec<AssetSummary>, AssetError> {
        let density: Density = density.parse()?;
        let set = self.generator.toggle_density(density).await?;
        Ok(AssetSummary::from_set(&set))
    }

    /// 仅保留给定密度的勾选。任一名称非法时整体拒绝，不修改状态。
    pub async fn select_densities<S: AsRef<str>>(
        &self,
        densities: &[S],
    ) -> Result<Vec<AssetSummary>, AssetError> {
        let parsed = densities
            .iter()
            .map(|name| name.as_ref().parse::<Density>())
            .collect::<Result<Vec<_>, _>>()?;

        let set = self
            .generator
            .set_density_selection(DensitySelection::only(parsed))
            .await?;
        Ok(AssetSummary::from_set(&set))
    }

    /// 设置缩放档位。
    ///
    /// 已加载基准图时需调用 `regenerate` 才会按新档位重新生成。
    pub fn set_resize_profile(&self, profile: &str) -> Result<(), AssetError> {
        let profile = ResizeProfile::from_str(profile)?;
        self.generator.set_resize_profile(profile)
    }

    /// 获取当前生效缩放档位（字符串）。
    pub fn get_resize_profile(&self) -> Result<String, AssetError> {
        let profile = self.generator.get_resize_profile()?;
        Ok(profile.as_str().to_string())
    }

    pub fn set_jpeg_quality(&self, quality: u8) -> Result<(), AssetError> {
        self.generator.set_jpeg_quality(quality)
    }

    pub async fn regenerate(&self) -> Result<Vec<AssetSummary>, AssetError> {
        let set = self.generator.regenerate().await?;
        Ok(AssetSummary::from_set(&set))
    }

    pub fn list_assets(&self) -> Vec<AssetSummary> {
        AssetSummary::from_set(&self.generator.rendered_assets())
    }

    pub fn rendered_assets(&self) -> Arc<RenderedAssetSet> {
        self.generator.rendered_assets()
    }

    pub fn build_archive(&self) -> Result<AssetArchive, AssetError> {
        self.generator.build_archive()
    }

    pub fn status(&self) -> &'static str {
        match self.generator.status() {
            GeneratorStatus::Idle => "idle",
            GeneratorStatus::Generating => "generating",
        }
    }
}

impl Default for AssetServiceState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{Engine as _, engine::general_purpose};
    use image::{DynamicImage, ImageBuffer, ImageFormat, Rgba};
    use std::io::Cursor;
    use std::thread;

    fn png_data_url(width: u32, height: u32) -> String {
        let img = ImageBuffer::from_fn(width, height, |x, y| Rgba([x as u8, y as u8, 128, 255]));
        let mut cursor = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut cursor, ImageFormat::Png)
            .expect("failed to encode test image");
        format!(
            "data:image/png;base64,{}",
            general_purpose::STANDARD.encode(cursor.into_inner())
        )
    }

    #[test]
    fn service_set_and_get_profile_roundtrip() {
        let service = AssetServiceState::new();

        for profile in ["quality", "speed", "balanced"] {
            service.set_resize_profile(profile).expect("set profile should succeed");
            assert_eq!(service.get_resize_profile().expect("get profile"), profile);
        }
    }

    #[test]
    fn service_rejects_invalid_profile() {
        let service = AssetServiceState::new();

        let result = service.set_resize_profile("unknown-profile");
        assert!(matches!(result, Err(AssetError::InvalidFormat(_))));
    }

    #[test]
    fn service_profile_concurrent_access_stress() {
        let service = Arc::new(AssetServiceState::new());

        let workers = 8;
        let iterations = 200;

        let mut handles = Vec::with_capacity(workers);
        for worker_id in 0..workers {
            let service = Arc::clone(&service);
            handles.push(thread::spawn(move || {
                let profiles = ["quality", "balanced", "speed"];

                for i in 0..iterations {
                    let profile = profiles[(worker_id + i) % profiles.len()];
                    service.set_resize_profile(profile).expect("set profile should succeed");

                    let current = service.get_resize_profile().expect("get profile should succeed");
                    assert!(matches!(current.as_str(), "quality" | "balanced" | "speed"));
                }
            }));
        }

        for handle in handles {
            handle.join().expect("worker thread should not panic");
        }
    }

    #[tokio::test]
    async fn load_base64_and_switch_format() {
        let service = AssetServiceState::new();

        let summaries = service
            .load_base64(&png_data_url(64, 32))
            .await
            .expect("load should succeed");
        assert_eq!(summaries.len(), 5);
        assert_eq!(summaries[0].file_name, "drawable-mdpi/asset.png");
        assert_eq!((summaries[0].width, summaries[0].height), (16, 8));

        let summaries = service.set_output_format("jpeg").await.expect("format should apply");
        assert!(summaries.iter().all(|s| s.mime_type == "image/jpeg"));
        assert_eq!(summaries[4].file_name, "drawable-xxxhdpi/asset.jpeg");
        assert_eq!(service.status(), "idle");
    }

    #[tokio::test]
    async fn select_densities_rejects_unknown_names_without_mutation() {
        let service = AssetServiceState::new();
        service
            .load_base64(&png_data_url(32, 32))
            .await
            .expect("load should succeed");

        let result = service.select_densities(&["mdpi", "ldpi"]).await;
        assert!(matches!(result, Err(AssetError::InvalidFormat(_))));
        assert_eq!(service.list_assets().len(), 5);

        let summaries = service
            .select_densities(&["drawable-xhdpi", "mdpi"])
            .await
            .expect("selection should apply");
        let names: Vec<_> = summaries.iter().map(|s| s.density).collect();
        assert_eq!(names, vec!["mdpi", "xhdpi"]);
    }

    #[tokio::test]
    async fn regenerate_applies_new_profile_keeping_dimensions() {
        let service = AssetServiceState::new();
        service
            .load_base64(&png_data_url(40, 40))
            .await
            .expect("load should succeed");
        let before = service.rendered_assets();

        service.set_resize_profile("quality").expect("profile should apply");
        service.regenerate().await.expect("regenerate should succeed");
        let after = service.rendered_assets();

        assert!(after.generation() > before.generation());
        assert_eq!(after.densities(), before.densities());
    }
}
