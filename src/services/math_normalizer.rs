//! 数学标记归一化服务 - 业务能力层
//!
//! 把正文 HTML 里嵌入的 MathML 片段翻译成 TeX，再交给 KaTeX
//! 排版成可渲染的 HTML。翻译失败只影响单个元素，整篇文档继续。

use katex::{OptsBuilder, OutputType};
use regex::Regex;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, RenderError};

/// 可翻译的 MathML 标签集合
///
/// 元素内容中出现集合之外的标签时，该元素整体原样保留
static SUPPORTED_TAGS: phf::Set<&'static str> = phf::phf_set! {
    "mrow", "msup", "msub", "mi", "mn", "mo",
};

/// MathML 标签到 TeX 片段的确定性替换表（按表中顺序执行）
const TAG_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("<mrow>", "{"),
    ("</mrow>", "}"),
    ("<msup>", "^{"),
    ("</msup>", "}"),
    ("<msub>", "_{"),
    ("</msub>", "}"),
    ("<mi>", ""),
    ("</mi>", ""),
    ("<mn>", ""),
    ("</mn>", ""),
    ("<mo>", ""),
    ("</mo>", ""),
];

/// HTML 实体反转义表（&amp; 必须最后替换）
const ENTITY_SUBSTITUTIONS: &[(&str, &str)] = &[("&lt;", "<"), ("&gt;", ">"), ("&amp;", "&")];

/// 数学标记归一化服务
///
/// 职责：
/// - 定位正文中的每个 <math> 元素
/// - 翻译并用 KaTeX 排版，包在 .math-rendered 标记元素里
/// - 单个元素失败时原样保留该元素并记日志，绝不中断整篇文档
pub struct MathNormalizer {
    math_element: Regex,
    tag_name: Regex,
}

impl MathNormalizer {
    /// 创建新的归一化服务
    pub fn new() -> AppResult<Self> {
        let math_element = Regex::new(r"(?is)<math[^>]*>(.*?)</math>")
            .map_err(|e| AppError::Other(format!("编译 math 正则失败: {}", e)))?;
        let tag_name = Regex::new(r"</?([a-zA-Z][a-zA-Z0-9]*)")
            .map_err(|e| AppError::Other(format!("编译标签正则失败: {}", e)))?;

        Ok(Self {
            math_element,
            tag_name,
        })
    }

    /// 把 HTML 中的每个 <math> 元素替换为 KaTeX 渲染结果
    ///
    /// 没有数学标记的输入原样返回；失败的元素保留原文
    pub fn normalize(&self, html: &str) -> String {
        let mut output = String::with_capacity(html.len());
        let mut cursor = 0;

        for captures in self.math_element.captures_iter(html) {
            let whole = match captures.get(0) {
                Some(m) => m,
                None => continue,
            };
            let inner = captures.get(1).map(|m| m.as_str()).unwrap_or_default();

            output.push_str(&html[cursor..whole.start()]);

            match self.render_element(inner) {
                Ok(rendered) => {
                    output.push_str(r#"<span class="math-rendered">"#);
                    output.push_str(&rendered);
                    output.push_str("</span>");
                }
                Err(e) => {
                    // 单个元素失败：保留原文，继续处理后面的元素
                    warn!("数学标记翻译失败，保留原文: {}", e);
                    output.push_str(whole.as_str());
                }
            }

            cursor = whole.end();
        }

        if cursor == 0 {
            return html.to_string();
        }

        output.push_str(&html[cursor..]);
        output
    }

    /// 翻译并排版单个 math 元素的内容
    fn render_element(&self, inner: &str) -> AppResult<String> {
        let tex = self.convert_math_to_tex(inner)?;
        debug!("MathML 翻译结果: {}", tex);
        render_katex_display(&tex)
    }

    /// 把 MathML 内容翻译为线性 TeX 表达式
    ///
    /// 嵌套的 <math> 元素和不支持的标签都视为该元素的翻译失败
    pub fn convert_math_to_tex(&self, inner: &str) -> AppResult<String> {
        if inner.to_ascii_lowercase().contains("<math") {
            return Err(AppError::Render(RenderError::MathNested));
        }

        for captures in self.tag_name.captures_iter(inner) {
            let tag = captures
                .get(1)
                .map(|m| m.as_str().to_ascii_lowercase())
                .unwrap_or_default();
            if !SUPPORTED_TAGS.contains(tag.as_str()) {
                return Err(AppError::Render(RenderError::MathUnsupportedTag { tag }));
            }
        }

        let mut tex = inner.to_string();
        for (tag, replacement) in TAG_SUBSTITUTIONS {
            tex = tex.replace(tag, replacement);
        }
        for (entity, replacement) in ENTITY_SUBSTITUTIONS {
            tex = tex.replace(entity, replacement);
        }

        Ok(tex.trim().to_string())
    }
}

/// 用 KaTeX 把 TeX 表达式排版成 display 模式的 HTML 片段
fn render_katex_display(tex: &str) -> AppResult<String> {
    let opts = OptsBuilder::default()
        .display_mode(true)
        .output_type(OutputType::Html)
        .build()
        .map_err(|e| AppError::Other(format!("构建 KaTeX 选项失败: {}", e)))?;

    katex::render_with_opts(tex, opts).map_err(|e| {
        AppError::Render(RenderError::TypesetFailed {
            source: Box::new(e),
        })
    })
}
