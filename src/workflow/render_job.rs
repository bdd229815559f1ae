//! 渲染任务类型 - 流程层
//!
//! RenderJob 由装配器的游标产生，由页面渲染器消费，从不持久化

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::question::QuestionRecord;

/// 页面角色：题目页或答案页
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRole {
    Question,
    Answer,
}

impl PageRole {
    /// 章节标题页的标题
    pub fn section_heading(self) -> &'static str {
        match self {
            PageRole::Question => "Questions",
            PageRole::Answer => "Answers",
        }
    }

    /// 内容页头部的标题（序号从 1 开始）
    pub fn page_title(self, ordinal: usize) -> String {
        match self {
            PageRole::Question => format!("Question {}", ordinal),
            PageRole::Answer => format!("Answer {}", ordinal),
        }
    }
}

/// 一次渲染任务：渲染第 ordinal 个记录的题目页或答案页
///
/// ordinal 始终反映记录在列表中的位置，与跳过的答案页无关
#[derive(Debug, Clone, Copy)]
pub struct RenderJob<'a> {
    pub record: &'a QuestionRecord,
    pub role: PageRole,
    pub ordinal: usize,
}

/// 一页的栅格化结果：JPEG 字节加像素尺寸
///
/// 每个 RenderJob 恰好产出一个 PageImage，被装配器消费后立即丢弃
#[derive(Debug, Clone)]
pub struct PageImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// 页面渲染能力（装配器依赖的接口）
///
/// 同一时刻只有一个任务在渲染：实现方独占挂载目标，
/// 必须在下一个任务开始前整体替换其内容
#[async_trait]
pub trait RenderPage {
    async fn render_page(&self, job: &RenderJob<'_>) -> AppResult<PageImage>;
}
