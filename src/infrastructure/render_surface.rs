//! 渲染表面 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"挂载内容 / 执行 JS / 截图"的能力

use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport};
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::AppResult;

/// 元素在页面中的布局矩形（CSS 像素）
#[derive(Debug, Clone, Deserialize)]
pub struct ElementRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// 渲染表面
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 mount() / eval_as() / measure() / capture() 能力
/// - 不认识 QuestionRecord / RenderJob
/// - 不处理业务流程
pub struct RenderSurface {
    page: Page,
}

impl RenderSurface {
    /// 创建新的渲染表面
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 挂载一个完整的 HTML 文档，整体替换之前的内容
    ///
    /// 上一个任务的内容在这里被完全丢弃，保证两个任务之间
    /// 不会出现内容叠加
    pub async fn mount(&self, html: impl Into<String>) -> AppResult<()> {
        self.page.set_content(html.into()).await?;
        Ok(())
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> AppResult<T> {
        let result = self.page.evaluate(js_code.into()).await?;
        let typed_value = result.into_value()?;
        Ok(typed_value)
    }

    /// 测量选择器命中的第一个元素的布局矩形
    ///
    /// 元素不存在时返回 None（由调用方决定是否致命）
    pub async fn measure(&self, selector: &str) -> AppResult<Option<ElementRect>> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({});
                if (!el) {{
                    return null;
                }}
                const rect = el.getBoundingClientRect();
                return {{
                    x: rect.x,
                    y: rect.y,
                    width: rect.width,
                    height: rect.height
                }};
            }})()
            "#,
            serde_json::to_string(selector)?
        );

        let rect: Option<ElementRect> = self.eval_as(js_code).await?;
        Ok(rect)
    }

    /// 对指定矩形区域截图，返回 JPEG 字节
    ///
    /// scale 为超采样倍数，quality 为 JPEG 压缩质量
    pub async fn capture(
        &self,
        rect: &ElementRect,
        scale: f64,
        quality: i64,
    ) -> AppResult<Vec<u8>> {
        let clip = Viewport {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            scale,
        };

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Jpeg)
            .quality(quality)
            .clip(clip)
            .from_surface(true)
            .build();

        let bytes = self
            .page
            .screenshot(params)
            .await
            .map_err(crate::error::AppError::screenshot_failed)?;

        Ok(bytes)
    }
}
