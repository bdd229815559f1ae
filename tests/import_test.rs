//! CSV 批量导入的解析与大小上限测试

use worksheet_pdf::error::{AppError, ImportError};
use worksheet_pdf::import::{load_csv_file, parse_questions_csv};

#[test]
fn headers_match_case_insensitively() {
    // 原始导出工具混用两种大小写习惯
    let csv = "\
Question_title,level,Subject,marks,Question_body,Markscheme_body
Algebra Basics,HL,Mathematics,6,<p>Solve.</p>,<p>Answer.</p>
";

    let rows = parse_questions_csv(csv).expect("解析应该成功");

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].question_title, "Algebra Basics");
    assert_eq!(rows[0].subject, "Mathematics");
    assert_eq!(rows[0].question_body, "<p>Solve.</p>");
    assert_eq!(rows[0].markscheme_body.as_deref(), Some("<p>Answer.</p>"));
}

#[test]
fn empty_optional_columns_become_none() {
    let csv = "\
question_title,level,subject,marks,question_body,markscheme_body,paper
Probability,SL,Mathematics,4,<p>Q</p>,,Paper 1
Statistics,SL,Mathematics,5,<p>Q</p>,<p>MS</p>,
";

    let rows = parse_questions_csv(csv).expect("解析应该成功");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].markscheme_body, None);
    assert_eq!(rows[0].paper.as_deref(), Some("Paper 1"));
    assert_eq!(rows[1].markscheme_body.as_deref(), Some("<p>MS</p>"));
    assert_eq!(rows[1].paper, None);
}

#[test]
fn missing_required_column_rejects_the_whole_file() {
    // 缺少 marks 列
    let csv = "\
question_title,level,subject,question_body
Algebra Basics,HL,Mathematics,<p>Solve.</p>
";

    let result = parse_questions_csv(csv);

    assert!(matches!(
        result,
        Err(AppError::Import(ImportError::MissingColumn { ref column })) if column == "marks"
    ));
}

#[test]
fn unknown_extra_columns_are_ignored() {
    let csv = "\
question_title,level,subject,marks,question_body,unrelated_column
Vectors,HL,Mathematics,7,<p>Q</p>,whatever
";

    let rows = parse_questions_csv(csv).expect("解析应该成功");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].marks, "7");
}

#[tokio::test]
async fn oversized_file_is_rejected_before_parsing() {
    let path = std::env::temp_dir().join(format!(
        "worksheet_pdf_import_test_{}.csv",
        std::process::id()
    ));
    let path_str = path.to_string_lossy().to_string();

    std::fs::write(&path, "question_title,level,subject,marks,question_body\n")
        .expect("写入临时文件失败");

    // 上限 10 字节，文件明显超过
    let result = load_csv_file(&path_str, 10).await;

    std::fs::remove_file(&path).ok();

    assert!(matches!(
        result,
        Err(AppError::Import(ImportError::FileTooLarge { .. }))
    ));
}
