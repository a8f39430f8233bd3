//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 使用单一错误枚举承载资源生成链路中的所有错误来源，避免字符串拼接式错误处理。
//! 通过 `thiserror` 保持人类可读错误，同时让调用侧可按分支匹配。
//!
//! `code()` / `stage()` 提供稳定的机器可读标识，供 CLI 的 JSON 输出与日志检索使用。

/// 资源生成统一错误类型。
///
/// 该类型会在应用层被上转为 `AppError`。
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("解码错误：{0}")]
    Decode(String),

    #[error("格式错误：{0}")]
    InvalidFormat(String),

    #[error("文件错误：{0}")]
    FileSystem(String),

    #[error("资源限制：{0}")]
    ResourceLimit(String),

    #[error("缩放错误：{0}")]
    Resample(String),

    #[error("编码错误：{0}")]
    Encode(String),

    #[error("打包错误：{0}")]
    Archive(String),

    #[error("任务执行失败：{0}")]
    Task(String),
}

impl AssetError {
    /// 稳定错误码。
    pub fn code(&self) -> &'static str {
        match self {
            Self::Decode(_) => "E_DECODE",
            Self::InvalidFormat(_) => "E_INVALID_FORMAT",
            Self::FileSystem(_) => "E_FILE_SYSTEM",
            Self::ResourceLimit(_) => "E_RESOURCE_LIMIT",
            Self::Resample(_) => "E_RESAMPLE",
            Self::Encode(_) => "E_ENCODE",
            Self::Archive(_) => "E_ARCHIVE",
            Self::Task(_) => "E_TASK",
        }
    }

    /// 出错所在的处理阶段。
    pub fn stage(&self) -> &'static str {
        match self {
            Self::InvalidFormat(_) | Self::FileSystem(_) => "load",
            Self::Decode(_) | Self::ResourceLimit(_) => "decode",
            Self::Resample(_) => "resample",
            Self::Encode(_) => "encode",
            Self::Archive(_) => "archive",
            Self::Task(_) => "generate",
        }
    }
}

impl From<AssetError> for String {
    /// 兼容部分仍使用字符串错误的调用点。
    fn from(error: AssetError) -> Self {
        error.to_string()
    }
}
