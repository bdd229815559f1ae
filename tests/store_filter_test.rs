//! 筛选条件到 PostgREST 查询参数的翻译测试（纯函数，不发请求）

use worksheet_pdf::store::{parse_content_range_total, PageQuery, QuestionFilter};

#[test]
fn empty_filter_produces_no_params() {
    let filter = QuestionFilter::default();
    assert!(filter.to_query_params().is_empty());
}

#[test]
fn full_filter_translates_every_predicate() {
    let filter = QuestionFilter {
        subject: Some("Mathematics".to_string()),
        level: Some("HL".to_string()),
        title: Some("Algebra".to_string()),
        search: Some("integral".to_string()),
    };

    let params = filter.to_query_params();

    assert_eq!(
        params,
        vec![
            ("subject".to_string(), "eq.Mathematics".to_string()),
            ("level".to_string(), "eq.HL".to_string()),
            (
                "question_title".to_string(),
                "ilike.*Algebra*".to_string()
            ),
            (
                "or".to_string(),
                "(question_body.ilike.*integral*,reference_code.ilike.*integral*)".to_string()
            ),
        ]
    );
}

#[test]
fn search_only_filter_targets_body_and_reference_code() {
    let filter = QuestionFilter {
        search: Some("M21".to_string()),
        ..Default::default()
    };

    let params = filter.to_query_params();
    assert_eq!(params.len(), 1);
    assert_eq!(params[0].0, "or");
    assert!(params[0].1.contains("question_body.ilike.*M21*"));
    assert!(params[0].1.contains("reference_code.ilike.*M21*"));
}

#[test]
fn page_query_offsets_are_one_based() {
    assert_eq!(PageQuery::new(1, 10).offset(), 0);
    assert_eq!(PageQuery::new(2, 10).offset(), 10);
    assert_eq!(PageQuery::new(7, 25).offset(), 150);
    // 页码 0 按第 1 页处理
    assert_eq!(PageQuery::new(0, 10).offset(), 0);
}

#[test]
fn content_range_total_parses_exact_counts() {
    assert_eq!(parse_content_range_total("0-9/57"), Some(57));
    assert_eq!(parse_content_range_total("*/0"), Some(0));
    assert_eq!(parse_content_range_total("10-19/1234"), Some(1234));
    assert_eq!(parse_content_range_total("garbage"), None);
    assert_eq!(parse_content_range_total("0-9/*"), None);
}
