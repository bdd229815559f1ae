//! 页面渲染服务 - 业务能力层
//!
//! 把单个渲染任务变成一张页面图片：构建固定宽度的 HTML 片段、
//! 挂载到渲染表面、等待排版稳定、栅格化为高分辨率 JPEG。
//!
//! 渲染失败对整次生成是致命的：残缺的工作表比没有工作表更糟。

use std::time::Duration;

use async_trait::async_trait;
use image::GenericImageView;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, RenderError};
use crate::infrastructure::RenderSurface;
use crate::services::math_normalizer::MathNormalizer;
use crate::workflow::render_job::{PageImage, PageRole, RenderJob, RenderPage};

/// 内容容器的选择器（挂载目标，截图区域以它为准）
const CONTENT_SELECTOR: &str = ".content-wrapper";

/// 工作表页面样式（固定 800px 宽的打印版式）
const WORKSHEET_CSS: &str = r#"
      @import url('https://fonts.googleapis.com/css2?family=Inter:wght@400;500;600;700&display=swap');

      * {
        font-family: 'Inter', sans-serif;
      }

      body {
        margin: 0;
        background: white;
      }

      .content-wrapper {
        padding: 60px;
        background: white;
        width: 800px;
        box-sizing: border-box;
      }

      .header {
        margin-bottom: 36px;
        border-bottom: 2px solid #f3f4f6;
        padding-bottom: 24px;
      }

      .title {
        font-size: 20px;
        font-weight: 600;
        color: #111827;
        margin-bottom: 12px;
      }

      .metadata {
        font-size: 15px;
        color: #6b7280;
      }

      .body {
        font-size: 16px;
        line-height: 2.2;
        color: #1f2937;
        letter-spacing: 0.01em;
      }

      .body p {
        margin: 2em 0;
      }

      .body > *:first-child {
        margin-top: 0;
      }

      .body > *:last-child {
        margin-bottom: 0;
      }

      .math-rendered {
        margin: 3em 0;
        display: block;
        padding: 1em 0;
      }

      .katex-display {
        margin: 2.5em 0 !important;
      }

      .katex {
        font-size: 1.2em;
      }

      img {
        max-width: 100%;
        height: auto;
        margin: 2.5em 0;
      }

      ul, ol {
        margin: 2.5em 0;
        padding-left: 32px;
      }

      li {
        margin: 1.5em 0;
        line-height: 2.2;
      }

      li + li {
        margin-top: 2em;
      }

      table {
        width: 100%;
        border-collapse: collapse;
        margin: 2.5em 0;
      }

      th, td {
        border: 1px solid #e5e7eb;
        padding: 16px;
        text-align: left;
        line-height: 2;
      }

      th {
        background-color: #f9fafb;
      }

      blockquote {
        margin: 2.5em 0;
        padding: 1.5em;
        background: #f9fafb;
        border-left: 4px solid #e5e7eb;
        line-height: 2.2;
      }

      h1, h2, h3, h4, h5, h6 {
        margin-top: 3em;
        margin-bottom: 1.5em;
        line-height: 1.6;
      }
"#;

/// KaTeX 样式表（公式字体和布局必须由它提供）
const KATEX_STYLESHEET: &str =
    r#"<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css">"#;

/// 页面渲染服务
///
/// 职责：
/// - 独占渲染表面，同一时刻只渲染一个任务
/// - 每个任务整体替换表面内容，再等待固定的稳定间隔
/// - 栅格化内容容器，返回 JPEG 字节和像素尺寸
pub struct PageRenderer {
    surface: RenderSurface,
    normalizer: MathNormalizer,
    settle_interval: Duration,
    capture_scale: f64,
    jpeg_quality: i64,
    render_width: u32,
}

impl PageRenderer {
    /// 创建新的页面渲染服务
    pub fn new(surface: RenderSurface, config: &Config) -> AppResult<Self> {
        Ok(Self {
            surface,
            normalizer: MathNormalizer::new()?,
            settle_interval: Duration::from_millis(config.render_settle_ms),
            capture_scale: config.capture_scale,
            jpeg_quality: config.jpeg_quality,
            render_width: config.render_width,
        })
    }

    /// 构建一个任务的完整 HTML 文档
    ///
    /// 头部是角色标题加 level | subject | marks 元信息，
    /// 正文是归一化后的题目或评分标准
    fn build_document(&self, job: &RenderJob<'_>) -> AppResult<String> {
        let record = job.record;

        let raw_body = match job.role {
            PageRole::Question => record.question_body.as_str(),
            PageRole::Answer => record.markscheme_body.as_deref().ok_or_else(|| {
                AppError::Render(RenderError::MissingBody {
                    record_id: record.id.clone(),
                })
            })?,
        };

        let body = self.normalizer.normalize(raw_body);
        let title = job.role.page_title(job.ordinal);

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
{katex}
<style>{css}
      .content-wrapper {{ width: {width}px; }}
</style>
</head>
<body>
<div class="content-wrapper">
  <div class="header">
    <div class="title">{title}</div>
    <div class="metadata">{level} | {subject} | {marks} marks</div>
  </div>
  <div class="body">{body}</div>
</div>
</body>
</html>"#,
            katex = KATEX_STYLESHEET,
            css = WORKSHEET_CSS,
            width = self.render_width,
            title = title,
            level = record.level,
            subject = record.subject,
            marks = record.marks,
            body = body,
        ))
    }
}

#[async_trait]
impl RenderPage for PageRenderer {
    /// 渲染一个任务，产出恰好一张页面图片
    async fn render_page(&self, job: &RenderJob<'_>) -> AppResult<PageImage> {
        debug!(
            "渲染任务: {} (记录 {})",
            job.role.page_title(job.ordinal),
            job.record.id
        );

        // 1. 挂载（整体替换上一个任务的内容）
        let document = self.build_document(job)?;
        self.surface.mount(document).await?;

        // 2. 等待字体、样式表和公式排版稳定
        //    过早截图会得到内容缺失或被截断的页面
        sleep(self.settle_interval).await;

        // 3. 测量内容容器；不存在说明挂载失败，整次生成中止
        let rect = self
            .surface
            .measure(CONTENT_SELECTOR)
            .await?
            .ok_or_else(|| {
                AppError::Render(RenderError::MountTargetMissing {
                    selector: CONTENT_SELECTOR.to_string(),
                })
            })?;

        // 4. 栅格化
        let data = self
            .surface
            .capture(&rect, self.capture_scale, self.jpeg_quality)
            .await?;

        // 5. 解出像素尺寸
        let (width, height) = image::load_from_memory(&data)?.dimensions();
        let image = PageImage {
            width,
            height,
            data,
        };

        info!(
            "✓ {} 渲染完成 ({}x{} px)",
            job.role.page_title(job.ordinal),
            image.width,
            image.height
        );

        Ok(image)
    }
}
