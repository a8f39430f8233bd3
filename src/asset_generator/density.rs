//! # 密度表模块
//!
//! ## 设计思路
//!
//! Android 按屏幕密度把 drawable 资源分桶存放。这里以 `xxxhdpi` 为基准图，
//! 其余档位按相对比例缩小：
//!
//! ```text
//! mdpi    1.0   → 1/4
//! hdpi    1.5   → 3/8
//! xhdpi   2.0   → 1/2
//! xxhdpi  3.0   → 3/4
//! xxxhdpi 4.0   → 原尺寸
//! ```
//!
//! `DensitySelection` 记录用户勾选状态，默认全选。

use std::fmt;
use std::str::FromStr;

use super::AssetError;

/// 基准档位（`xxxhdpi`）的缩放系数。
pub const REFERENCE_SCALE: f64 = 4.0;

/// Android 屏幕密度档位。
///
/// 声明顺序即输出与打包顺序。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Density {
    Mdpi,
    Hdpi,
    Xhdpi,
    Xxhdpi,
    Xxxhdpi,
}

impl Density {
    pub const ALL: [Density; 5] = [
        Density::Mdpi,
        Density::Hdpi,
        Density::Xhdpi,
        Density::Xxhdpi,
        Density::Xxxhdpi,
    ];

    /// 相对缩放系数。
    pub fn scale(self) -> f64 {
        match self {
            Self::Mdpi => 1.0,
            Self::Hdpi => 1.5,
            Self::Xhdpi => 2.0,
            Self::Xxhdpi => 3.0,
            Self::Xxxhdpi => 4.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mdpi => "mdpi",
            Self::Hdpi => "hdpi",
            Self::Xhdpi => "xhdpi",
            Self::Xxhdpi => "xxhdpi",
            Self::Xxxhdpi => "xxxhdpi",
        }
    }

    /// 资源目录名，例如 `drawable-hdpi`。
    pub fn folder_name(self) -> String {
        format!("drawable-{}", self.as_str())
    }

    /// 相对基准档位的缩放比例。
    pub fn ratio(self) -> f64 {
        self.scale() / REFERENCE_SCALE
    }

    /// 由基准图尺寸计算该档位的目标尺寸（四舍五入到整像素）。
    ///
    /// 结果可能为 0（例如 1x1 的基准图在 mdpi 下），由缩放阶段拒绝。
    pub fn target_size(self, width: u32, height: u32) -> (u32, u32) {
        let ratio = self.ratio();
        (
            (width as f64 * ratio).round() as u32,
            (height as f64 * ratio).round() as u32,
        )
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Density {
    type Err = AssetError;

    /// 同时接受 `hdpi` 与 `drawable-hdpi` 两种写法。
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_lowercase();
        let name = normalized
            .strip_prefix("drawable-")
            .unwrap_or(normalized.as_str());

        Density::ALL
            .into_iter()
            .find(|density| density.as_str() == name)
            .ok_or_else(|| {
                AssetError::InvalidFormat(format!(
                    "未知密度档位：{}（可选：mdpi / hdpi / xhdpi / xxhdpi / xxxhdpi）",
                    value
                ))
            })
    }
}

/// 密度勾选状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DensitySelection {
    flags: [bool; Density::ALL.len()],
}

impl Default for DensitySelection {
    fn default() -> Self {
        Self::all()
    }
}

impl DensitySelection {
    pub fn all() -> Self {
        Self {
            flags: [true; Density::ALL.len()],
        }
    }

    pub fn none() -> Self {
        Self {
            flags: [false; Density::ALL.len()],
        }
    }

    /// 仅勾选给定档位。
    pub fn only<I>(densities: I) -> Self
    where
        I: IntoIterator<Item = Density>,
    {
        let mut selection = Self::none();
        for density in densities {
            selection.set(density, true);
        }
        selection
    }

    pub fn is_selected(&self, density: Density) -> bool {
        self.flags[density.index()]
    }

    pub fn set(&mut self, density: Density, selected: bool) {
        self.flags[density.index()] = selected;
    }

    pub fn toggle(&mut self, density: Density) {
        let flag = &mut self.flags[density.index()];
        *flag = !*flag;
    }

    /// 已勾选档位，按密度从低到高排列。
    pub fn selected(&self) -> Vec<Density> {
        Density::ALL
            .into_iter()
            .filter(|density| self.is_selected(*density))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.flags.iter().filter(|flag| **flag).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}
