//! # 资源生成模块（asset_generator）
//!
//! ## 设计思路
//!
//! 该模块将“基准图加载校验 → 解码 → 各密度缩放 → 编码 → 打包”
//! 按职责拆分为多个子模块，避免单文件膨胀与耦合。
//!
//! - `service`：字符串入参的服务入口（CLI 与设置文件使用）
//! - `handler`：持有状态并编排整条生成流程（状态机 + 序号）
//! - `loader`：负责 Base64/文件/字节加载与输入类型校验
//! - `pipeline`：负责解码、像素限制、按密度缩放
//! - `encoder`：负责 PNG / JPEG / WEBP 编码
//! - `archiver`：负责打包 zip
//! - `density/format`：密度表与输出格式
//! - `config/error/source`：配置、错误、中间数据模型
//!
//! ## 新同事快速上手
//!
//! 可以按下面顺序理解调用链：
//!
//! ```text
//! main.rs / settings.rs
//!    ↓
//! service.rs（参数解析、服务入口）
//!    ↓
//! handler.rs（状态变更 → 领取序号 → 串行执行一轮生成）
//!    ├─ loader.rs（来源加载 + 体积/类型校验）
//!    ├─ pipeline.rs（解码 + 像素限制 + 缩放）
//!    ├─ encoder.rs（编码）
//!    └─ archiver.rs（按需打包）
//!    ↓
//! storage.rs（写出到磁盘）
//! ```

mod archiver;
mod config;
mod density;
mod encoder;
mod error;
mod format;
mod handler;
mod loader;
mod pipeline;
mod service;
mod source;

pub use archiver::{ARCHIVE_FILE_NAME, AssetArchive, build_archive};
pub use config::{AssetConfig, DEFAULT_JPEG_QUALITY, ResizeProfile};
pub use density::{Density, DensitySelection, REFERENCE_SCALE};
pub use error::AssetError;
pub use format::OutputFormat;
pub use handler::{AssetGenerator, GeneratorStatus};
pub use service::{AssetServiceState, AssetSummary};
pub use source::{ImageSource, RenderedAsset, RenderedAssetSet, SourceImage};
