//! 统一错误类型模块
//!
//! # 设计思路
//!
//! 定义全局统一的 `AppError` 枚举，替代各模块中分散的
//! `.map_err(|e| e.to_string())`、`format!(...)`、`expect()` 等不一致模式。
//!
//! CLI 入口统一返回 `Result<T, AppError>`，`--json` 模式下通过 `Serialize`
//! 输出结构化的错误信息。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `AssetError` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串。

use serde::Serialize;

use crate::asset_generator::AssetError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 资源生成流水线错误（加载 / 解码 / 缩放 / 编码 / 打包）
    #[error("{0}")]
    Asset(#[from] AssetError),

    /// 文件系统 I/O 错误
    #[error("文件系统错误: {0}")]
    Io(#[from] std::io::Error),

    /// 输出目录不可用
    #[error("输出目录不可用: {0}")]
    Storage(String),

    /// 设置文件读取或解析失败
    #[error("设置文件错误: {0}")]
    Settings(String),
}

impl AppError {
    /// 稳定错误码，资源生成错误沿用 `AssetError::code`。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Asset(err) => err.code(),
            Self::Io(_) => "E_IO",
            Self::Storage(_) => "E_STORAGE",
            Self::Settings(_) => "E_SETTINGS",
        }
    }
}

/// 将错误序列化为人类可读的字符串。
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}
