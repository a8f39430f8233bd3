//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `AssetGenerator` 持有一个生成器实例的全部状态：基准图、输出格式、密度勾选、
//! 已发布的结果集。基准图、格式、勾选任一变化（且已有基准图）都会触发一轮重新生成：
//!
//! ```text
//! Idle ──(变化)──▶ Generating ──(全部密度完成)──▶ Idle + 整体发布结果集
//! ```
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<AssetConfig>>` 支持运行时切档，单轮生成内使用同一配置快照。
//! - 每次触发在同一把状态锁内修改输入、登记在途轮次并递增生成序号。
//! - 每轮生成通过 `tokio::spawn` 独立运行，调用方中途放弃等待不影响该轮执行与发布。
//! - 各轮生成经由异步互斥锁串行执行；排队期间已被更新触发取代的轮次直接跳过，
//!   完成时序号已过期的结果直接丢弃，不会与新一轮结果混合发布。
//! - 每个密度在 `spawn_blocking` 中独立缩放编码，`JoinSet` 汇总（屏障），
//!   单个密度失败只记录日志并从结果中省略。

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard};
use std::time::Instant;

use tokio::task::JoinSet;

use super::archiver::{self, AssetArchive};
use super::source::{ImageSource, RenderedAssetSet, SourceImage};
use super::{AssetConfig, AssetError, Density, DensitySelection, OutputFormat, ResizeProfile};

/// 生成器状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorStatus {
    Idle,
    Generating,
}

/// 触发重新生成的输入。
struct GeneratorInputs {
    source: Option<Arc<SourceImage>>,
    format: OutputFormat,
    selection: DensitySelection,
}

/// 生成轮次共享的状态，由调用方与后台生成任务共同持有。
struct PassState {
    inputs: RwLock<GeneratorInputs>,
    published: RwLock<Arc<RenderedAssetSet>>,
    generation: AtomicU64,
    pending_passes: AtomicUsize,
    pass_lock: tokio::sync::Mutex<()>,
}

impl PassState {
    fn read_inputs(&self) -> Result<RwLockReadGuard<'_, GeneratorInputs>, AssetError> {
        self.inputs
            .read()
            .map_err(|_| AssetError::ResourceLimit("生成器状态读取锁已中毒".to_string()))
    }

    fn published(&self) -> Arc<RenderedAssetSet> {
        match self.published.read() {
            Ok(guard) => Arc::clone(&*guard),
            Err(poisoned) => Arc::clone(&*poisoned.into_inner()),
        }
    }

    fn is_latest(&self, pass_id: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == pass_id
    }
}

/// 在途轮次计数守卫，离开作用域时自动减一。
///
/// 在输入锁内创建，随生成任务一起移动，任务结束时释放。
struct PendingPassGuard(Arc<PassState>);

impl PendingPassGuard {
    fn new(state: &Arc<PassState>) -> Self {
        state.pending_passes.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(state))
    }
}

impl Drop for PendingPassGuard {
    fn drop(&mut self) {
        self.0.pending_passes.fetch_sub(1, Ordering::SeqCst);
    }
}

fn read_config(config: &RwLock<AssetConfig>) -> Result<AssetConfig, AssetError> {
    config
        .read()
        .map(|cfg| cfg.clone())
        .map_err(|_| AssetError::ResourceLimit("配置读取锁已中毒".to_string()))
}

/// Android 多密度资源生成器。
pub struct AssetGenerator {
    pub(super) config: Arc<RwLock<AssetConfig>>,
    state: Arc<PassState>,
}

impl AssetGenerator {
    /// 根据初始配置创建生成器：默认 PNG、全选密度、无基准图。
    ///
    /// # 示例
    /// ```rust
    /// use android_asset_generator::asset_generator::{AssetConfig, AssetGenerator, GeneratorStatus};
    ///
    /// let generator = AssetGenerator::new(AssetConfig::default());
    /// assert_eq!(generator.status(), GeneratorStatus::Idle);
    /// assert!(generator.rendered_assets().is_empty());
    /// ```
    pub fn new(config: AssetConfig) -> Self {
        Self {
            config: Arc::new(RwLock::new(config)),
            state: Arc::new(PassState {
                inputs: RwLock::new(GeneratorInputs {
                    source: None,
                    format: OutputFormat::default(),
                    selection: DensitySelection::default(),
                }),
                published: RwLock::new(Arc::new(RenderedAssetSet::default())),
                generation: AtomicU64::new(0),
                pending_passes: AtomicUsize::new(0),
                pass_lock: tokio::sync::Mutex::new(()),
            }),
        }
    }

    /// 获取配置快照。
    ///
    /// 作用：保证单轮生成使用一致参数。
    pub(super) fn config_snapshot(&self) -> Result<AssetConfig, AssetError> {
        read_config(&self.config)
    }

    fn with_config_mut<T>(
        &self,
        apply: impl FnOnce(&mut AssetConfig) -> Result<T, AssetError>,
    ) -> Result<T, AssetError> {
        let mut config = self
            .config
            .write()
            .map_err(|_| AssetError::ResourceLimit("配置写入锁已中毒".to_string()))?;
        apply(&mut config)
    }

    /// 设置缩放档位。只影响之后触发的生成。
    pub fn set_resize_profile(&self, profile: ResizeProfile) -> Result<(), AssetError> {
        self.with_config_mut(|config| {
            config.apply_resize_profile(profile);
            log::info!(
                "⚙️ 已切换缩放档位：{:?}（filter={:?}）",
                profile,
                config.resize_filter
            );
            Ok(())
        })
    }

    /// 获取当前生效缩放档位。
    pub fn get_resize_profile(&self) -> Result<ResizeProfile, AssetError> {
        Ok(self.config_snapshot()?.infer_resize_profile())
    }

    /// 设置 JPEG 编码质量（1~100）。只影响之后触发的生成。
    pub fn set_jpeg_quality(&self, quality: u8) -> Result<(), AssetError> {
        self.with_config_mut(|config| config.set_jpeg_quality(quality))
    }

    pub fn status(&self) -> GeneratorStatus {
        if self.state.pending_passes.load(Ordering::SeqCst) > 0 {
            GeneratorStatus::Generating
        } else {
            GeneratorStatus::Idle
        }
    }

    /// 当前已发布的结果集。
    pub fn rendered_assets(&self) -> Arc<RenderedAssetSet> {
        self.state.published()
    }

    pub fn output_format(&self) -> Result<OutputFormat, AssetError> {
        Ok(self.state.read_inputs()?.format)
    }

    pub fn density_selection(&self) -> Result<DensitySelection, AssetError> {
        Ok(self.state.read_inputs()?.selection)
    }

    pub fn source_image(&self) -> Result<Option<Arc<SourceImage>>, AssetError> {
        Ok(self.state.read_inputs()?.source.clone())
    }

    /// 加载新的基准图并重新生成。
    ///
    /// 输入不合法时直接返回错误，原有基准图与结果集保持不变。
    pub async fn load_source(&self, source: ImageSource) -> Result<Arc<RenderedAssetSet>, AssetError> {
        let config = self.config_snapshot()?;
        let load_start = Instant::now();

        let raw = Self::load_raw(source, &config)?;
        let decoded = tokio::task::spawn_blocking(move || Self::decode_source(raw, &config))
            .await
            .map_err(|e| AssetError::Task(format!("解码线程执行失败：{}", e)))??;

        log::info!(
            "✅ 基准图已就绪 - {}x{} load+decode={}ms",
            decoded.width(),
            decoded.height(),
            load_start.elapsed().as_millis()
        );

        let decoded = Arc::new(decoded);
        self.mutate_and_regenerate(move |inputs| {
            inputs.source = Some(decoded);
            true
        })
        .await
    }

    /// 切换输出格式。格式未变化时不触发生成。
    pub async fn set_output_format(
        &self,
        format: OutputFormat,
    ) -> Result<Arc<RenderedAssetSet>, AssetError> {
        self.mutate_and_regenerate(move |inputs| {
            let changed = inputs.format != format;
            inputs.format = format;
            changed
        })
        .await
    }

    /// 勾选 / 取消勾选单个密度。
    pub async fn set_density_selected(
        &self,
        density: Density,
        selected: bool,
    ) -> Result<Arc<RenderedAssetSet>, AssetError> {
        self.mutate_and_regenerate(move |inputs| {
            let changed = inputs.selection.is_selected(density) != selected;
            inputs.selection.set(density, selected);
            changed
        })
        .await
    }

    /// 翻转单个密度的勾选状态。
    pub async fn toggle_density(&self, density: Density) -> Result<Arc<RenderedAssetSet>, AssetError> {
        self.mutate_and_regenerate(move |inputs| {
            inputs.selection.toggle(density);
            true
        })
        .await
    }

    /// 整体替换密度勾选。
    pub async fn set_density_selection(
        &self,
        selection: DensitySelection,
    ) -> Result<Arc<RenderedAssetSet>, AssetError> {
        self.mutate_and_regenerate(move |inputs| {
            let changed = inputs.selection != selection;
            inputs.selection = selection;
            changed
        })
        .await
    }

    /// 用当前输入重新生成一轮（例如切换档位之后）。
    pub async fn regenerate(&self) -> Result<Arc<RenderedAssetSet>, AssetError> {
        self.mutate_and_regenerate(|_| true).await
    }

    /// 打包当前已发布的结果集。
    pub fn build_archive(&self) -> Result<AssetArchive, AssetError> {
        archiver::build_archive(&self.rendered_assets())
    }

    /// 在状态锁内修改输入、登记在途轮次并领取生成序号，然后在后台任务中执行该轮生成。
    ///
    /// 返回的 future 被丢弃时，后台任务照常完成并发布。
    async fn mutate_and_regenerate<F>(&self, mutate: F) -> Result<Arc<RenderedAssetSet>, AssetError>
    where
        F: FnOnce(&mut GeneratorInputs) -> bool,
    {
        let (pass_id, pending) = {
            let mut inputs = self
                .state
                .inputs
                .write()
                .map_err(|_| AssetError::ResourceLimit("生成器状态写入锁已中毒".to_string()))?;

            if !mutate(&mut inputs) || inputs.source.is_none() {
                return Ok(self.rendered_assets());
            }

            let pending = PendingPassGuard::new(&self.state);
            (self.state.generation.fetch_add(1, Ordering::SeqCst) + 1, pending)
        };

        let pass = tokio::spawn(Self::run_pass(
            Arc::clone(&self.state),
            Arc::clone(&self.config),
            pass_id,
            pending,
        ));

        pass.await
            .map_err(|e| AssetError::Task(format!("第 {} 轮生成任务异常结束：{}", pass_id, e)))?
    }

    async fn run_pass(
        state: Arc<PassState>,
        config: Arc<RwLock<AssetConfig>>,
        pass_id: u64,
        _pending: PendingPassGuard,
    ) -> Result<Arc<RenderedAssetSet>, AssetError> {
        let _serialized = state.pass_lock.lock().await;

        if !state.is_latest(pass_id) {
            log::debug!("⏭️ 第 {} 轮生成已被更新的触发取代，跳过", pass_id);
            return Ok(state.published());
        }

        let (source, format, densities) = {
            let inputs = state.read_inputs()?;
            match &inputs.source {
                Some(source) => (Arc::clone(source), inputs.format, inputs.selection.selected()),
                None => return Ok(state.published()),
            }
        };
        let config = Arc::new(read_config(&config)?);
        let pass_start = Instant::now();

        log::info!(
            "🚀 开始第 {} 轮生成 - 格式: {} 密度: {:?}",
            pass_id,
            format,
            densities
        );

        let mut tasks = JoinSet::new();
        for density in densities.iter().copied() {
            let source = Arc::clone(&source);
            let config = Arc::clone(&config);
            tasks.spawn_blocking(move || {
                (density, Self::render_density(&source, density, format, &config))
            });
        }

        let mut rendered = RenderedAssetSet::new(pass_id, format);
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(asset))) => rendered.insert(asset),
                Ok((density, Err(err))) => {
                    log::warn!("⚠️ {} 生成失败，已跳过：{}", density, err);
                }
                Err(err) => {
                    log::warn!("⚠️ 密度任务异常结束，已跳过：{}", err);
                }
            }
        }

        if !state.is_latest(pass_id) {
            log::debug!("🗑️ 第 {} 轮生成结果已过期，丢弃", pass_id);
            return Ok(state.published());
        }

        let rendered = Arc::new(rendered);
        {
            let mut published = state
                .published
                .write()
                .map_err(|_| AssetError::ResourceLimit("结果集写入锁已中毒".to_string()))?;
            *published = Arc::clone(&rendered);
        }

        log::info!(
            "✅ 第 {} 轮生成完成 - 成功: {}/{} 总体积: {:.1} KB 耗时: {}ms",
            pass_id,
            rendered.len(),
            densities.len(),
            rendered.total_bytes() as f64 / 1024.0,
            pass_start.elapsed().as_millis()
        );

        Ok(rendered)
    }
}
