//! # Worksheet PDF
//!
//! 一个用于题库管理和工作表 PDF 生成的 Rust 应用程序
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `RenderSurface` - 唯一的 page owner，提供 mount() / measure() / capture() 能力
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个渲染任务或单页
//! - `MathNormalizer` - MathML → KaTeX 归一化能力
//! - `PageRenderer` - 单个任务的栅格化能力
//! - `PdfWriter` - PDF 页面累加能力
//! - `store/` - 远程题库的查询/增删改能力
//! - `import/` - CSV 批量导入能力
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次生成运行"的完整流程
//! - `RenderJob` - 任务封装（record + role + ordinal）
//! - `WorksheetFlow` - 状态机编排（题目遍 → 答案遍 → 序列化）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 应用入口，管理资源和模式分发
//! - `orchestrator/worksheet_processor` - 单次生成运行处理器，落盘和统计
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod import;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod store;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::{connect_to_browser_and_page, launch_headless_browser};
pub use config::Config;
pub use error::{AppError, AppResult};
pub use infrastructure::RenderSurface;
pub use models::{NewQuestion, QuestionRecord, Taxonomies, WorksheetRequest};
pub use orchestrator::{process_worksheet, App, GenerationOutcome, GenerationReport};
pub use services::{FinishedDocument, MathNormalizer, PageKind, PageRenderer, PdfWriter};
pub use store::{PageQuery, QuestionFilter, QuestionStore};
pub use workflow::{
    CancelHandle, FlowOutcome, PageImage, PageRole, RenderJob, RenderPage, WorksheetFlow,
};
