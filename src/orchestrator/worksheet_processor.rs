//! 工作表处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责驱动一次完整的生成运行，是工作表级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **流程调度**：创建并运行 `WorksheetFlow`
//! 2. **产物落盘**：把序列化好的 PDF 写到输出文件
//! 3. **统计输出**：从页面清单汇总题目页/答案页/跳过数量
//!
//! 完成回调约定：本函数恰好返回一次。Ok(Saved) 是成功通知，
//! Ok(Cancelled) 是干净中止，Err 是失败通知（此时没有任何产物落盘）

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::config::Config;
use crate::models::question::QuestionRecord;
use crate::services::pdf_writer::PageKind;
use crate::utils::logging::{print_final_stats, truncate_text};
use crate::workflow::render_job::{PageRole, RenderPage};
use crate::workflow::worksheet_flow::{CancelHandle, FlowOutcome, WorksheetFlow};

/// 输出文件名是固定约定，不开放配置
pub const OUTPUT_FILE_NAME: &str = "worksheet.pdf";

/// 一次成功运行的统计报告
#[derive(Debug)]
pub struct GenerationReport {
    pub total_pages: usize,
    pub question_pages: usize,
    pub answer_pages: usize,
    pub skipped_answers: usize,
    pub output_path: String,
}

/// 一次运行的最终结果
#[derive(Debug)]
pub enum GenerationOutcome {
    /// PDF 已写入输出文件
    Saved(GenerationReport),
    /// 运行被取消，没有产物
    Cancelled,
}

/// 驱动一次工作表生成运行
///
/// # 参数
/// - `renderer`: 页面渲染能力（独占渲染表面）
/// - `records`: 按文档顺序排列的题目列表
/// - `config`: 配置
/// - `cancel`: 取消句柄
pub async fn process_worksheet(
    renderer: impl RenderPage,
    records: &[QuestionRecord],
    config: &Config,
    cancel: CancelHandle,
) -> Result<GenerationOutcome> {
    for (index, record) in records.iter().enumerate() {
        debug!(
            "题目 {}: {}",
            index + 1,
            truncate_text(&record.question_body, 80)
        );
    }

    let flow = WorksheetFlow::new(renderer, cancel, config.page_top_margin_pt);

    let document = match flow.run(records).await.context("工作表生成失败")? {
        FlowOutcome::Completed(document) => document,
        FlowOutcome::Cancelled => {
            info!("🛑 生成被取消，没有生成文件");
            return Ok(GenerationOutcome::Cancelled);
        }
    };

    // 落盘也是终结阶段的一部分：写入失败同样致命
    tokio::fs::write(OUTPUT_FILE_NAME, &document.bytes)
        .await
        .with_context(|| format!("无法写入输出文件: {}", OUTPUT_FILE_NAME))?;

    let question_pages = count_content_pages(&document.manifest, PageRole::Question);
    let answer_pages = count_content_pages(&document.manifest, PageRole::Answer);
    let skipped_answers = records
        .iter()
        .filter(|record| !record.has_markscheme())
        .count();

    print_final_stats(
        document.manifest.len(),
        question_pages,
        answer_pages,
        skipped_answers,
    );

    Ok(GenerationOutcome::Saved(GenerationReport {
        total_pages: document.manifest.len(),
        question_pages,
        answer_pages,
        skipped_answers,
        output_path: OUTPUT_FILE_NAME.to_string(),
    }))
}

fn count_content_pages(manifest: &[PageKind], role: PageRole) -> usize {
    manifest
        .iter()
        .filter(|kind| matches!(kind, PageKind::Content { role: r, .. } if *r == role))
        .count()
}
