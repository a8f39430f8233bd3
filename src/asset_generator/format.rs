//! 输出编码格式。

use std::fmt;
use std::str::FromStr;

use super::AssetError;

/// 资源输出格式，默认 PNG。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 3] = [OutputFormat::Png, OutputFormat::Jpeg, OutputFormat::Webp];

    /// 文件扩展名，同时也是格式名（`asset.jpeg` 而非 `asset.jpg`）。
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// 单个资源的建议路径：`drawable-<density>/asset.<ext>`。
    pub fn entry_path(self, density: super::Density) -> String {
        format!("{}/asset.{}", density.folder_name(), self.extension())
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = AssetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            other => Err(AssetError::InvalidFormat(format!(
                "未知输出格式：{}（可选：png / jpeg / webp）",
                other
            ))),
        }
    }
}
