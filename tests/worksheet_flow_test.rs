//! 生成状态机的排序与失败路径测试（不依赖浏览器）

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use worksheet_pdf::error::{AppError, AppResult};
use worksheet_pdf::services::PageKind;
use worksheet_pdf::workflow::{
    CancelHandle, FlowOutcome, PageImage, PageRole, RenderJob, RenderPage, WorksheetFlow,
};
use worksheet_pdf::{MathNormalizer, QuestionRecord};

/// 构造一张白色小图的 JPEG（PdfWriter 需要真实可解码的图片字节）
fn tiny_jpeg() -> PageImage {
    let img = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
        16,
        16,
        image::Rgb([255, 255, 255]),
    ));
    let mut bytes = Vec::new();
    img.write_to(
        &mut std::io::Cursor::new(&mut bytes),
        image::ImageFormat::Jpeg,
    )
    .expect("编码测试图片失败");

    PageImage {
        data: bytes,
        width: 16,
        height: 16,
    }
}

fn record(id: &str, markscheme: Option<&str>) -> QuestionRecord {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "question_title": "Algebra Basics",
        "level": "HL",
        "subject": "Mathematics",
        "marks": "6",
        "question_body": "<p>Solve for x.</p>",
        "markscheme_body": markscheme,
    }))
    .expect("构造测试记录失败")
}

type CallLog = Arc<Mutex<Vec<(PageRole, usize, String)>>>;

/// 记录每次调用的渲染器替身，可在指定任务上注入失败
struct MockRenderer {
    calls: CallLog,
    fail_on: Option<(PageRole, usize)>,
}

impl MockRenderer {
    fn new() -> (Self, CallLog) {
        let calls: CallLog = Arc::new(Mutex::new(Vec::new()));
        (
            Self {
                calls: calls.clone(),
                fail_on: None,
            },
            calls,
        )
    }

    fn failing_on(role: PageRole, ordinal: usize) -> (Self, CallLog) {
        let (mut renderer, calls) = Self::new();
        renderer.fail_on = Some((role, ordinal));
        (renderer, calls)
    }
}

#[async_trait]
impl RenderPage for MockRenderer {
    async fn render_page(&self, job: &RenderJob<'_>) -> AppResult<PageImage> {
        self.calls
            .lock()
            .expect("锁中毒")
            .push((job.role, job.ordinal, job.record.id.clone()));

        if let Some((role, ordinal)) = self.fail_on {
            if job.role == role && job.ordinal == ordinal {
                return Err(AppError::Other("注入的渲染失败".to_string()));
            }
        }

        Ok(tiny_jpeg())
    }
}

fn completed(outcome: FlowOutcome) -> worksheet_pdf::FinishedDocument {
    match outcome {
        FlowOutcome::Completed(document) => document,
        FlowOutcome::Cancelled => panic!("不应该被取消"),
    }
}

#[tokio::test]
async fn full_list_produces_two_title_pages_plus_two_pages_per_record() {
    let records = vec![
        record("q1", Some("<p>ms 1</p>")),
        record("q2", Some("<p>ms 2</p>")),
        record("q3", Some("<p>ms 3</p>")),
    ];

    let (renderer, _calls) = MockRenderer::new();
    let flow = WorksheetFlow::new(renderer, CancelHandle::new(), 40.0);
    let document = completed(flow.run(&records).await.expect("生成应该成功"));

    // 2 个标题页 + 每个记录一页题目一页答案
    assert_eq!(document.page_count(), 2 + 2 * records.len());
    assert!(!document.bytes.is_empty());

    let expected = vec![
        PageKind::SectionTitle("Questions".to_string()),
        PageKind::Content { role: PageRole::Question, ordinal: 1 },
        PageKind::Content { role: PageRole::Question, ordinal: 2 },
        PageKind::Content { role: PageRole::Question, ordinal: 3 },
        PageKind::SectionTitle("Answers".to_string()),
        PageKind::Content { role: PageRole::Answer, ordinal: 1 },
        PageKind::Content { role: PageRole::Answer, ordinal: 2 },
        PageKind::Content { role: PageRole::Answer, ordinal: 3 },
    ];
    assert_eq!(document.manifest, expected);
}

#[tokio::test]
async fn answers_title_page_immediately_follows_last_question_page() {
    let records = vec![
        record("q1", Some("<p>ms</p>")),
        record("q2", Some("<p>ms</p>")),
    ];

    let (renderer, _calls) = MockRenderer::new();
    let flow = WorksheetFlow::new(renderer, CancelHandle::new(), 40.0);
    let document = completed(flow.run(&records).await.expect("生成应该成功"));

    let answers_title_pos = document
        .manifest
        .iter()
        .position(|kind| *kind == PageKind::SectionTitle("Answers".to_string()))
        .expect("必须有 Answers 标题页");

    // 标题页紧跟最后一张题目内容页，其后第一页就是答案内容页
    assert_eq!(
        document.manifest[answers_title_pos - 1],
        PageKind::Content { role: PageRole::Question, ordinal: 2 }
    );
    assert_eq!(
        document.manifest[answers_title_pos + 1],
        PageKind::Content { role: PageRole::Answer, ordinal: 1 }
    );
}

#[tokio::test]
async fn record_without_markscheme_is_skipped_in_order() {
    // 记录 A 有评分标准，记录 B 没有：
    // 期望 [Q-title][Q1][Q2][A-title][A1]，其中 A1 是记录 A 的答案
    let records = vec![record("a", Some("<p>ms a</p>")), record("b", None)];

    let (renderer, calls) = MockRenderer::new();
    let flow = WorksheetFlow::new(renderer, CancelHandle::new(), 40.0);
    let document = completed(flow.run(&records).await.expect("生成应该成功"));

    let expected = vec![
        PageKind::SectionTitle("Questions".to_string()),
        PageKind::Content { role: PageRole::Question, ordinal: 1 },
        PageKind::Content { role: PageRole::Question, ordinal: 2 },
        PageKind::SectionTitle("Answers".to_string()),
        PageKind::Content { role: PageRole::Answer, ordinal: 1 },
    ];
    assert_eq!(document.manifest, expected);

    // 答案遍只渲染了记录 A；记录 B 的答案任务从未被调度
    let calls = calls.lock().expect("锁中毒");
    let answer_calls: Vec<_> = calls
        .iter()
        .filter(|(role, _, _)| *role == PageRole::Answer)
        .collect();
    assert_eq!(answer_calls.len(), 1);
    assert_eq!(answer_calls[0].2, "a");
}

#[tokio::test]
async fn skipped_answer_does_not_renumber_later_answers() {
    // 第 1 个记录没有评分标准，第 2 个有：
    // 答案页的序号必须还是 2，不重排
    let records = vec![record("a", None), record("b", Some("<p>ms b</p>"))];

    let (renderer, _calls) = MockRenderer::new();
    let flow = WorksheetFlow::new(renderer, CancelHandle::new(), 40.0);
    let document = completed(flow.run(&records).await.expect("生成应该成功"));

    assert_eq!(
        document.manifest.last(),
        Some(&PageKind::Content { role: PageRole::Answer, ordinal: 2 })
    );
}

#[tokio::test]
async fn empty_list_finalizes_without_invoking_renderer() {
    let (renderer, calls) = MockRenderer::new();
    let flow = WorksheetFlow::new(renderer, CancelHandle::new(), 40.0);

    let document = completed(flow.run(&[]).await.expect("空列表也应该成功"));

    assert!(document.manifest.is_empty());
    // 空文档也要序列化出合法的 PDF 字节
    assert!(!document.bytes.is_empty());
    assert!(calls.lock().expect("锁中毒").is_empty());
}

#[tokio::test]
async fn render_failure_aborts_run_without_delivering_document() {
    let records = vec![
        record("q1", Some("<p>ms</p>")),
        record("q2", Some("<p>ms</p>")),
        record("q3", Some("<p>ms</p>")),
        record("q4", Some("<p>ms</p>")),
        record("q5", Some("<p>ms</p>")),
    ];

    // 第 3 个题目页渲染失败
    let (renderer, calls) = MockRenderer::failing_on(PageRole::Question, 3);
    let flow = WorksheetFlow::new(renderer, CancelHandle::new(), 40.0);

    // 整次运行失败，没有任何文档交付
    let result = flow.run(&records).await;
    assert!(result.is_err());

    // 恰好调用了 3 次：q1、q2、q3（失败），之后不再调度任何任务
    let calls = calls.lock().expect("锁中毒");
    assert_eq!(calls.len(), 3);
    assert_eq!(calls[2].2, "q3");
}

#[tokio::test]
async fn cancellation_before_start_discards_everything() {
    let records = vec![record("q1", Some("<p>ms</p>"))];

    let (renderer, calls) = MockRenderer::new();
    let cancel = CancelHandle::new();
    cancel.cancel();

    let flow = WorksheetFlow::new(renderer, cancel, 40.0);
    let outcome = flow.run(&records).await.expect("取消不是错误");

    assert!(matches!(outcome, FlowOutcome::Cancelled));
    assert!(calls.lock().expect("锁中毒").is_empty());
}

/// 在替身渲染器里跑真实的数学归一化：
/// 单个公式翻译失败既不阻止该页生成，也不影响其他页
struct NormalizingRenderer {
    normalizer: MathNormalizer,
    bodies: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl RenderPage for NormalizingRenderer {
    async fn render_page(&self, job: &RenderJob<'_>) -> AppResult<PageImage> {
        let normalized = self.normalizer.normalize(&job.record.question_body);
        self.bodies.lock().expect("锁中毒").push(normalized);
        Ok(tiny_jpeg())
    }
}

#[tokio::test]
async fn math_translation_failure_does_not_block_page_emission() {
    let mut bad = record("bad-math", None);
    bad.question_body =
        "<p>Before</p><math><mfrac><mn>1</mn><mn>2</mn></mfrac></math><p>After</p>".to_string();
    let records = vec![bad, record("plain", None)];

    let bodies: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let renderer = NormalizingRenderer {
        normalizer: MathNormalizer::new().expect("创建归一化服务失败"),
        bodies: bodies.clone(),
    };

    let flow = WorksheetFlow::new(renderer, CancelHandle::new(), 40.0);
    let document = completed(flow.run(&records).await.expect("生成应该成功"));

    // 两张题目页都生成了（两个记录都没有评分标准，所以没有答案页）
    assert_eq!(document.page_count(), 2 + 2);

    // 失败的公式原样留在该页的正文里
    let bodies = bodies.lock().expect("锁中毒");
    assert!(bodies[0].contains("<math><mfrac>"));
    assert!(bodies[0].contains("<p>After</p>"));
}
