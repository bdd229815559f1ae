//! PDF 写入服务 - 业务能力层
//!
//! 持有一次生成运行中的 PDF 累加器：追加章节标题页和内容图片页，
//! 最后一次性序列化。每页同时记入页面清单，供统计和测试使用。

use printpdf::{
    BuiltinFont, Color, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Point, Pt, RawImage, Rgb,
    TextItem, XObjectTransform,
};
use tracing::debug;

use crate::error::{AppError, AppResult, DocumentError};
use crate::workflow::render_job::{PageImage, PageRole};

// A4 纵向页面尺寸
const A4_WIDTH_MM: f32 = 210.0;
const A4_HEIGHT_MM: f32 = 297.0;
const A4_WIDTH_PT: f32 = 595.28;
const A4_HEIGHT_PT: f32 = 841.89;

/// 章节标题字号与基线距页面顶部的偏移
const HEADING_FONT_SIZE_PT: f32 = 24.0;
const HEADING_TOP_OFFSET_PT: f32 = 60.0;

/// Helvetica 粗体的平均字宽系数（用于标题水平居中的近似计算）
const HEADING_CHAR_WIDTH_RATIO: f32 = 0.56;

/// 页面清单条目：最终文档中每一页的种类，按页序排列
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// 章节标题页（"Questions" / "Answers"）
    SectionTitle(String),
    /// 内容页（role 页，序号为记录在列表中的位置）
    Content { role: PageRole, ordinal: usize },
}

/// 序列化完成的文档：PDF 字节加页面清单
#[derive(Debug)]
pub struct FinishedDocument {
    pub bytes: Vec<u8>,
    pub manifest: Vec<PageKind>,
}

impl FinishedDocument {
    pub fn page_count(&self) -> usize {
        self.manifest.len()
    }
}

/// PDF 写入服务
///
/// 职责：
/// - 独占一次生成运行的文档累加器
/// - 追加标题页 / 图片页，维护页面清单
/// - finalize() 恰好调用一次；中途丢弃即等于放弃整个文档
pub struct PdfWriter {
    doc: PdfDocument,
    manifest: Vec<PageKind>,
    top_margin_pt: f32,
}

impl PdfWriter {
    /// 创建新的 PDF 写入服务
    pub fn new(title: &str, top_margin_pt: f32) -> Self {
        Self {
            doc: PdfDocument::new(title),
            manifest: Vec::new(),
            top_margin_pt,
        }
    }

    /// 已追加的页数
    pub fn page_count(&self) -> usize {
        self.manifest.len()
    }

    /// 页面清单
    pub fn manifest(&self) -> &[PageKind] {
        &self.manifest
    }

    /// 追加一个只含居中章节标题的页面
    ///
    /// 标题页独占一页，后续内容从下一页开始
    pub fn append_title_page(&mut self, heading: &str) {
        let text_width =
            heading.chars().count() as f32 * HEADING_FONT_SIZE_PT * HEADING_CHAR_WIDTH_RATIO;
        let x = (A4_WIDTH_PT - text_width) / 2.0;
        let y = A4_HEIGHT_PT - HEADING_TOP_OFFSET_PT;

        let ops = vec![
            Op::SetFillColor {
                col: Color::Rgb(Rgb {
                    r: 17.0 / 255.0,
                    g: 24.0 / 255.0,
                    b: 39.0 / 255.0,
                    icc_profile: None,
                }),
            },
            Op::StartTextSection,
            Op::SetTextCursor {
                pos: Point {
                    x: Pt(x),
                    y: Pt(y),
                },
            },
            Op::SetFontSizeBuiltinFont {
                size: Pt(HEADING_FONT_SIZE_PT),
                font: BuiltinFont::HelveticaBold,
            },
            Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(heading.to_string())],
                font: BuiltinFont::HelveticaBold,
            },
            Op::EndTextSection,
        ];

        self.doc
            .pages
            .push(PdfPage::new(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), ops));
        self.manifest.push(PageKind::SectionTitle(heading.to_string()));
    }

    /// 把一张页面图片追加为新的内容页
    ///
    /// 图片等比缩放到可打印区域内，水平居中，距顶部固定边距
    pub fn append_image_page(
        &mut self,
        role: PageRole,
        ordinal: usize,
        image: &PageImage,
    ) -> AppResult<()> {
        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(&image.data, &mut warnings).map_err(|e| {
            AppError::Document(DocumentError::ImageEmbedFailed {
                message: e.to_string(),
            })
        })?;
        for warning in warnings {
            debug!("图片解码警告: {:?}", warning);
        }

        let image_id = self.doc.add_image(&raw);

        let img_width = image.width as f32;
        let img_height = image.height as f32;
        let ratio = (A4_WIDTH_PT / img_width).min(A4_HEIGHT_PT / img_height);
        let x = (A4_WIDTH_PT - img_width * ratio) / 2.0;
        let y = A4_HEIGHT_PT - self.top_margin_pt - img_height * ratio;

        let ops = vec![Op::UseXobject {
            id: image_id,
            transform: XObjectTransform {
                translate_x: Some(Pt(x)),
                translate_y: Some(Pt(y)),
                rotate: None,
                scale_x: Some(ratio),
                scale_y: Some(ratio),
                // 以 72 dpi 为基准，1 像素即 1 pt，与缩放比计算保持一致
                dpi: Some(72.0),
            },
        }];

        self.doc
            .pages
            .push(PdfPage::new(Mm(A4_WIDTH_MM), Mm(A4_HEIGHT_MM), ops));
        self.manifest.push(PageKind::Content { role, ordinal });

        Ok(())
    }

    /// 序列化整个文档
    ///
    /// 零内容页的文档同样合法（空列表生成空文档）
    pub fn finalize(self) -> AppResult<FinishedDocument> {
        let mut warnings = Vec::new();
        let bytes = self.doc.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in warnings {
            debug!("PDF序列化警告: {:?}", warning);
        }

        if bytes.is_empty() {
            return Err(AppError::Document(DocumentError::SerializeFailed {
                message: "序列化结果为空".to_string(),
            }));
        }

        Ok(FinishedDocument {
            bytes,
            manifest: self.manifest,
        })
    }
}
