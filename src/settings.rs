//! 生成器设置文件
//!
//! # 设计思路
//!
//! 允许通过 JSON 文件预设输出格式、密度勾选、缩放档位与 JPEG 质量，
//! 省去每次在命令行重复传参。设置只在启动时读取，运行中不回写。
//!
//! ```json
//! {
//!   "format": "webp",
//!   "densities": ["mdpi", "xxhdpi"],
//!   "profile": "quality",
//!   "jpeg_quality": 85
//! }
//! ```
//!
//! 所有字段均可省略，省略即沿用默认值。

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::asset_generator::AssetServiceState;
use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorSettings {
    pub format: Option<String>,
    pub densities: Option<Vec<String>>,
    pub profile: Option<String>,
    pub jpeg_quality: Option<u8>,
}

impl GeneratorSettings {
    /// 命令行参数覆盖设置文件：`other` 中存在的字段优先。
    pub fn merged_with(self, other: GeneratorSettings) -> GeneratorSettings {
        GeneratorSettings {
            format: other.format.or(self.format),
            densities: other.densities.or(self.densities),
            profile: other.profile.or(self.profile),
            jpeg_quality: other.jpeg_quality.or(self.jpeg_quality),
        }
    }

    /// 将设置应用到服务。应在加载基准图之前调用，避免多余的生成轮次。
    pub async fn apply(&self, service: &AssetServiceState) -> Result<(), AppError> {
        if let Some(profile) = &self.profile {
            service.set_resize_profile(profile)?;
        }
        if let Some(quality) = self.jpeg_quality {
            service.set_jpeg_quality(quality)?;
        }
        if let Some(format) = &self.format {
            service.set_output_format(format).await?;
        }
        if let Some(densities) = &self.densities {
            service.select_densities(densities.as_slice()).await?;
        }
        Ok(())
    }
}

/// 读取设置文件。
pub fn load_settings(path: &Path) -> Result<GeneratorSettings, AppError> {
    let content = fs::read_to_string(path)
        .map_err(|e| AppError::Settings(format!("读取 {} 失败: {}", path.display(), e)))?;

    serde_json::from_str::<GeneratorSettings>(&content)
        .map_err(|e| AppError::Settings(format!("解析 {} 失败: {}", path.display(), e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asset_generator::{Density, OutputFormat};
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_file(prefix: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("clock should be after epoch")
            .as_nanos();
        std::env::temp_dir().join(format!("{}-{}-{}.json", prefix, std::process::id(), nanos))
    }

    #[test]
    fn load_settings_parses_partial_file() {
        let path = unique_temp_file("settings-partial");
        fs::write(&path, r#"{ "format": "webp", "densities": ["mdpi"] }"#).expect("write settings");

        let settings = load_settings(&path).expect("settings should parse");
        let _ = fs::remove_file(&path);

        assert_eq!(settings.format.as_deref(), Some("webp"));
        assert_eq!(settings.densities, Some(vec!["mdpi".to_string()]));
        assert_eq!(settings.profile, None);
    }

    #[test]
    fn load_settings_rejects_unknown_fields() {
        let path = unique_temp_file("settings-unknown");
        fs::write(&path, r#"{ "colour": "red" }"#).expect("write settings");

        let result = load_settings(&path);
        let _ = fs::remove_file(&path);

        assert!(matches!(result, Err(AppError::Settings(_))));
    }

    #[test]
    fn missing_settings_file_is_reported() {
        let result = load_settings(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(AppError::Settings(_))));
    }

    #[test]
    fn cli_values_override_file_values() {
        let file = GeneratorSettings {
            format: Some("png".to_string()),
            profile: Some("speed".to_string()),
            ..Default::default()
        };
        let cli = GeneratorSettings {
            format: Some("jpeg".to_string()),
            jpeg_quality: Some(70),
            ..Default::default()
        };

        let merged = file.merged_with(cli);
        assert_eq!(merged.format.as_deref(), Some("jpeg"));
        assert_eq!(merged.profile.as_deref(), Some("speed"));
        assert_eq!(merged.jpeg_quality, Some(70));
        assert_eq!(merged.densities, None);
    }

    #[tokio::test]
    async fn apply_updates_service_state() {
        let service = AssetServiceState::new();
        let settings = GeneratorSettings {
            format: Some("webp".to_string()),
            densities: Some(vec!["hdpi".to_string(), "xxxhdpi".to_string()]),
            profile: Some("quality".to_string()),
            jpeg_quality: Some(80),
        };

        settings.apply(&service).await.expect("apply should succeed");

        let generator = service.generator();
        assert_eq!(generator.output_format().expect("format"), OutputFormat::Webp);
        assert_eq!(
            generator.density_selection().expect("selection").selected(),
            vec![Density::Hdpi, Density::Xxxhdpi]
        );
        assert_eq!(service.get_resize_profile().expect("profile"), "quality");
    }

    #[tokio::test]
    async fn apply_rejects_invalid_values() {
        let service = AssetServiceState::new();
        let settings = GeneratorSettings {
            jpeg_quality: Some(0),
            ..Default::default()
        };

        assert!(matches!(settings.apply(&service).await, Err(AppError::Asset(_))));
    }
}
