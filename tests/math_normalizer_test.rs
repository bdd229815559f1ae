//! MathML 归一化的翻译表与逐元素恢复测试

use worksheet_pdf::error::{AppError, RenderError};
use worksheet_pdf::MathNormalizer;

fn normalizer() -> MathNormalizer {
    MathNormalizer::new().expect("创建归一化服务失败")
}

#[test]
fn html_without_math_passes_through_unchanged() {
    let n = normalizer();
    let html = "<p>Plain <b>text</b> with no formulas.</p>";
    assert_eq!(n.normalize(html), html);
}

#[test]
fn simple_superscript_is_rendered_inline() {
    let n = normalizer();
    let html = "<p>Consider <math><mi>x</mi><msup><mn>2</mn></msup></math> here.</p>";

    let output = n.normalize(html);

    // 公式被 KaTeX 输出替换，并包在标记元素里
    assert!(output.contains(r#"<span class="math-rendered">"#));
    assert!(output.contains("katex"));
    assert!(!output.contains("<math>"));
    // 周围的内容原样保留
    assert!(output.starts_with("<p>Consider "));
    assert!(output.ends_with(" here.</p>"));
}

#[test]
fn tag_substitution_table_matches_the_dialect() {
    let n = normalizer();

    assert_eq!(
        n.convert_math_to_tex("<mi>x</mi><msup><mn>2</mn></msup>")
            .expect("翻译应该成功"),
        "x^{2}"
    );
    assert_eq!(
        n.convert_math_to_tex("<mrow><mi>a</mi><mo>+</mo><mi>b</mi></mrow>")
            .expect("翻译应该成功"),
        "{a+b}"
    );
    assert_eq!(
        n.convert_math_to_tex("<mi>a</mi><msub><mn>1</mn></msub>")
            .expect("翻译应该成功"),
        "a_{1}"
    );
}

#[test]
fn html_entities_are_unescaped_in_tex() {
    let n = normalizer();

    assert_eq!(
        n.convert_math_to_tex("<mi>x</mi><mo>&lt;</mo><mn>3</mn>")
            .expect("翻译应该成功"),
        "x<3"
    );
    assert_eq!(
        n.convert_math_to_tex("<mo>&amp;</mo>").expect("翻译应该成功"),
        "&"
    );
}

#[test]
fn unsupported_tag_fails_the_element_translation() {
    let n = normalizer();

    let result = n.convert_math_to_tex("<mfrac><mn>1</mn><mn>2</mn></mfrac>");
    assert!(matches!(
        result,
        Err(AppError::Render(RenderError::MathUnsupportedTag { ref tag })) if tag == "mfrac"
    ));
}

#[test]
fn unsupported_element_is_left_literally_in_the_document() {
    let n = normalizer();
    let html = "<p>A</p><math><mfrac><mn>1</mn><mn>2</mn></mfrac></math><p>B</p>";

    let output = n.normalize(html);

    // 失败的元素原样保留，其余内容不受影响
    assert_eq!(output, html);
}

#[test]
fn nested_math_is_a_translation_failure() {
    let n = normalizer();

    let result = n.convert_math_to_tex("<mrow><math><mi>x</mi></math></mrow>");
    assert!(matches!(
        result,
        Err(AppError::Render(RenderError::MathNested))
    ));

    // normalize 层面：外层元素整体原样保留
    let html = "<math><mrow><math><mi>x</mi></math></mrow></math>";
    let output = n.normalize(html);
    assert!(output.contains("<math><mrow>"));
    assert!(!output.contains("math-rendered"));
}

#[test]
fn one_failing_element_does_not_block_its_neighbours() {
    let n = normalizer();
    let html = concat!(
        "<math><mi>x</mi><msup><mn>2</mn></msup></math>",
        "<math><mfrac><mn>1</mn><mn>2</mn></mfrac></math>",
        "<math><mi>y</mi></math>",
    );

    let output = n.normalize(html);

    // 第 1、3 个公式渲染成功，第 2 个原样保留
    assert_eq!(output.matches("math-rendered").count(), 2);
    assert!(output.contains("<math><mfrac>"));
}
