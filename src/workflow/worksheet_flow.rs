//! 工作表生成流程 - 流程层
//!
//! 核心职责：用显式的 (遍, 游标) 状态机驱动两遍遍历
//!
//! 流程顺序：
//! 1. Questions 标题页 → 逐题渲染题目页
//! 2. Answers 标题页（永远另起新页）→ 逐题渲染答案页（无评分标准则跳过）
//! 3. 序列化文档
//!
//! 文档累加器是循环里的一个 owned 值，生命周期恰好等于一次运行：
//! 任何渲染错误或取消都会让它随栈一起丢弃，半成品绝不外泄。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, error, info};

use crate::error::{AppError, AppResult};
use crate::models::question::QuestionRecord;
use crate::services::pdf_writer::{FinishedDocument, PdfWriter};
use crate::workflow::render_job::{PageRole, RenderJob, RenderPage};

/// 取消句柄（可克隆，跨任务共享）
///
/// 取消只在两个任务之间生效：当前渲染中的任务会先完成
#[derive(Debug, Clone, Default)]
pub struct CancelHandle(Arc<AtomicBool>);

impl CancelHandle {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 生成状态机的状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorState {
    RenderingQuestionTitlePage,
    RenderingQuestionPages,
    RenderingAnswerTitlePage,
    RenderingAnswerPages,
    Finalizing,
    Done,
    Failed,
}

/// 当前处于哪一遍
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Questions,
    Answers,
}

/// 遍历游标：pass 恰好从 Questions 切换到 Answers 一次，
/// 切换时 index 归零
#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    pub pass: Pass,
    pub index: usize,
}

/// 一次运行的结果
#[derive(Debug)]
pub enum FlowOutcome {
    /// 正常完成，文档已序列化
    Completed(FinishedDocument),
    /// 被调用方取消，未完成的文档已丢弃
    Cancelled,
}

/// 工作表生成流程
///
/// - 编排两遍遍历和章节标题页
/// - 同一时刻只有一个渲染任务在执行
/// - 游标只在上一页成功追加后才前进
/// - 不持有任何资源（page）
pub struct WorksheetFlow<R: RenderPage> {
    renderer: R,
    cancel: CancelHandle,
    top_margin_pt: f32,
}

impl<R: RenderPage> WorksheetFlow<R> {
    /// 创建新的生成流程
    pub fn new(renderer: R, cancel: CancelHandle, top_margin_pt: f32) -> Self {
        Self {
            renderer,
            cancel,
            top_margin_pt,
        }
    }

    /// 执行一次完整的生成运行
    ///
    /// 任何渲染或序列化错误都是致命的：整次运行终止，
    /// 文档丢弃，由调用方通知用户后从头重新发起
    pub async fn run(&self, records: &[QuestionRecord]) -> AppResult<FlowOutcome> {
        match self.drive(records).await {
            Ok(outcome) => Ok(outcome),
            Err(e) => {
                // 进入 Failed 终态：半成品文档已随累加器一起丢弃
                error!("❌ 工作表生成失败: {}", e);
                Err(e)
            }
        }
    }

    /// 状态机驱动循环
    async fn drive(&self, records: &[QuestionRecord]) -> AppResult<FlowOutcome> {
        let mut writer = PdfWriter::new("Worksheet", self.top_margin_pt);
        let mut cursor = Cursor {
            pass: Pass::Questions,
            index: 0,
        };

        // 空列表直接进入 Finalizing：空文档也是合法文档，
        // 渲染器一次都不会被调用
        let mut state = if records.is_empty() {
            GeneratorState::Finalizing
        } else {
            GeneratorState::RenderingQuestionTitlePage
        };

        info!("📄 开始生成工作表: {} 个题目", records.len());

        loop {
            if self.cancel.is_cancelled() {
                info!("生成已取消，丢弃未完成的文档");
                return Ok(FlowOutcome::Cancelled);
            }

            let next = match state {
                GeneratorState::RenderingQuestionTitlePage => {
                    writer.append_title_page(PageRole::Question.section_heading());
                    GeneratorState::RenderingQuestionPages
                }

                GeneratorState::RenderingQuestionPages => {
                    if cursor.index >= records.len() {
                        // 题目遍结束；答案章节永远从全新一页开始
                        cursor = Cursor {
                            pass: Pass::Answers,
                            index: 0,
                        };
                        GeneratorState::RenderingAnswerTitlePage
                    } else {
                        let ordinal = cursor.index + 1;
                        self.render_step(
                            &mut writer,
                            &records[cursor.index],
                            ordinal,
                            PageRole::Question,
                        )
                        .await?;
                        cursor.index += 1;
                        GeneratorState::RenderingQuestionPages
                    }
                }

                GeneratorState::RenderingAnswerTitlePage => {
                    writer.append_title_page(PageRole::Answer.section_heading());
                    GeneratorState::RenderingAnswerPages
                }

                GeneratorState::RenderingAnswerPages => {
                    if cursor.index >= records.len() {
                        GeneratorState::Finalizing
                    } else {
                        let ordinal = cursor.index + 1;
                        let record = &records[cursor.index];
                        if record.has_markscheme() {
                            self.render_step(&mut writer, record, ordinal, PageRole::Answer)
                                .await?;
                        } else {
                            // 静默跳过：不产页、不报错，后续答案的序号不重排
                            debug!("跳过答案页: 题目 {} 无评分标准", ordinal);
                        }
                        cursor.index += 1;
                        GeneratorState::RenderingAnswerPages
                    }
                }

                GeneratorState::Finalizing => {
                    let document = writer.finalize()?;
                    debug!("状态切换: Finalizing -> Done");
                    info!("✅ 工作表生成完成: 共 {} 页", document.page_count());
                    return Ok(FlowOutcome::Completed(document));
                }

                // 终态只通过 return 离开循环，不应再被驱动
                GeneratorState::Done | GeneratorState::Failed => {
                    return Err(AppError::Other(format!(
                        "状态机已到终态，不能继续驱动: {:?}",
                        state
                    )));
                }
            };

            if next != state {
                debug!("状态切换: {:?} -> {:?}", state, next);
            }
            state = next;
        }
    }

    /// 渲染一个任务并把结果追加为新页
    ///
    /// 只有页面成功追加后游标才会前进
    async fn render_step(
        &self,
        writer: &mut PdfWriter,
        record: &QuestionRecord,
        ordinal: usize,
        role: PageRole,
    ) -> AppResult<()> {
        let job = RenderJob {
            record,
            role,
            ordinal,
        };

        let image = self.renderer.render_page(&job).await?;
        writer.append_image_page(role, ordinal, &image)?;

        Ok(())
    }
}
