//! # Android 多密度资源生成工具 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │              CLI (main.rs, clap + env_logger)             │
//! │        参数 ── settings.json ── 输出目录 / --json          │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓ Result<T, AppError>
//! ┌───────┼──────────────────────────────────────────────────┐
//! │       ↓            库 (Rust)                              │
//! │                                                          │
//! │  ┌─ error ────── AppError (统一错误类型)                  │
//! │  │                                                       │
//! │  ├─ settings ─── 设置文件解析与覆盖                       │
//! │  │                                                       │
//! │  ├─ asset_generator   基准图 → 多密度缩放 → 编码 → 打包   │
//! │  │   ├─ handler        状态机 + 生成序号 + 屏障汇总        │
//! │  │   ├─ pipeline       解码 / 缩放                         │
//! │  │   ├─ encoder        PNG / JPEG / WEBP                   │
//! │  │   └─ archiver       android-assets.zip                  │
//! │  │                                                       │
//! │  └─ storage            写出资源与压缩包                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`error`] | 统一错误类型 `AppError`，CLI 入口的返回类型 |
//! | [`asset_generator`] | 基准图加载校验、按密度缩放编码、结果发布与打包 |
//! | [`settings`] | JSON 设置文件读取，与命令行参数合并 |
//! | [`storage`] | 输出目录管理，写出单个资源与压缩包 |

pub mod asset_generator;
pub mod error;
pub mod settings;
pub mod storage;
