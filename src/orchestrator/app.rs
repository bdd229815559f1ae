//! 应用主结构 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责资源管理和模式分发。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：启动日志、创建存储客户端
//! 2. **模式分发**：批量导入模式 / 工作表生成模式
//! 3. **资源管理**：持有 Browser，确保其生命周期覆盖整次生成
//! 4. **取消联动**：把 Ctrl-C 接到生成流程的取消句柄上
//!
//! ## 设计特点
//!
//! - **顶层编排**：不处理单个页面的细节
//! - **资源所有者**：唯一持有 Browser 的模块
//! - **向下委托**：委托 worksheet_processor 驱动一次生成运行

use anyhow::Result;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::import::{load_csv_file, parse_questions_csv};
use crate::infrastructure::RenderSurface;
use crate::models::{load_taxonomies, load_worksheet_request};
use crate::orchestrator::worksheet_processor::{
    process_worksheet, GenerationOutcome, OUTPUT_FILE_NAME,
};
use crate::services::PageRenderer;
use crate::store::QuestionStore;
use crate::utils::logging::{init_log_file, log_records_loaded, log_startup};
use crate::workflow::CancelHandle;

/// 应用主结构
pub struct App {
    config: Config,
    store: QuestionStore,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        init_log_file(&config.output_log_file)?;

        log_startup(OUTPUT_FILE_NAME);

        let store = QuestionStore::new(&config)?;

        Ok(Self { config, store })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        // 配置了导入文件时只执行批量导入
        if let Some(csv_path) = self.config.import_csv_file.clone() {
            return self.run_import(&csv_path).await;
        }

        self.run_generation().await
    }

    /// 批量导入模式
    async fn run_import(&self, csv_path: &str) -> Result<()> {
        info!("📥 批量导入模式: {}", csv_path);

        let text = load_csv_file(csv_path, self.config.max_csv_size).await?;
        let rows = parse_questions_csv(&text)?;

        if rows.is_empty() {
            warn!("⚠️ CSV 中没有可导入的行");
            return Ok(());
        }

        let inserted = self.store.insert_many(&rows).await?;
        info!("✅ 成功导入 {} 个题目", inserted);

        Ok(())
    }

    /// 工作表生成模式
    async fn run_generation(&self) -> Result<()> {
        // 本地分类标签只用于校验请求，未知标签不阻断生成
        let taxonomies = load_taxonomies(&self.config.taxonomy_file).await?;
        let request = load_worksheet_request(&self.config.worksheet_file).await?;

        if let Some(name) = &request.name {
            info!("工作表: {}", name);
        }
        if let Some(subject) = &request.subject {
            if !taxonomies.has_subject(subject) {
                warn!("⚠️ 请求的科目不在本地分类标签中: {}", subject);
            }
        }
        if let Some(level) = &request.level {
            if !taxonomies.has_level(level) {
                warn!("⚠️ 请求的级别不在本地分类标签中: {}", level);
            }
        }

        // 按请求顺序解析题目记录
        let records = self.store.fetch_by_ids(&request.question_ids).await?;
        log_records_loaded(request.question_ids.len(), records.len());

        // 浏览器与渲染表面（浏览器必须活过整次生成）
        let (_browser, page) = if self.config.launch_browser {
            browser::launch_headless_browser(self.config.render_width).await?
        } else {
            browser::connect_to_browser_and_page(self.config.browser_debug_port).await?
        };

        let surface = RenderSurface::new(page);
        let renderer = PageRenderer::new(surface, &self.config)?;

        // Ctrl-C 触发干净中止：不再调度后续任务，丢弃未完成的文档
        let cancel = CancelHandle::new();
        let ctrl_c_cancel = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("收到 Ctrl-C，正在取消生成...");
                ctrl_c_cancel.cancel();
            }
        });

        match process_worksheet(renderer, &records, &self.config, cancel).await? {
            GenerationOutcome::Saved(report) => {
                info!(
                    "📄 已保存: {} ({} 页)",
                    report.output_path, report.total_pages
                );
            }
            GenerationOutcome::Cancelled => {}
        }

        Ok(())
    }
}
