//! CSV 批量导入 - 业务能力层
//!
//! 把分隔文本解析为待插入的题目行。列名大小写不敏感
//! （question_title 和 Question_title 等价），可选列的空串归一化为 None。

use std::collections::HashMap;
use std::path::Path;

use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult, ImportError};
use crate::models::question::NewQuestion;

/// 必填列（缺少任何一列整个文件都拒绝导入）
pub const REQUIRED_COLUMNS: &[&str] =
    &["question_title", "level", "subject", "marks", "question_body"];

/// 读取 CSV 文件内容，超过大小上限直接拒绝
pub async fn load_csv_file(path: &str, max_size: u64) -> AppResult<String> {
    if !Path::new(path).exists() {
        return Err(AppError::File(crate::error::FileError::NotFound {
            path: path.to_string(),
        }));
    }

    let metadata = fs::metadata(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))?;

    if metadata.len() > max_size {
        return Err(AppError::Import(ImportError::FileTooLarge {
            path: path.to_string(),
            size: metadata.len(),
            max: max_size,
        }));
    }

    fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))
}

/// 把 CSV 文本解析为题目行
///
/// 空行跳过；必填列缺失时报错；可选列取不到值或取到空串时为 None
pub fn parse_questions_csv(text: &str) -> AppResult<Vec<NewQuestion>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    // 列名统一转小写后建索引，实现大小写不敏感匹配
    let column_index: HashMap<String, usize> = reader
        .headers()?
        .iter()
        .enumerate()
        .map(|(i, name)| (name.to_ascii_lowercase(), i))
        .collect();

    for column in REQUIRED_COLUMNS {
        if !column_index.contains_key(*column) {
            return Err(AppError::Import(ImportError::MissingColumn {
                column: column.to_string(),
            }));
        }
    }

    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result?;

        let required = |name: &str| -> String {
            column_index
                .get(name)
                .and_then(|&i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        let optional = |name: &str| -> Option<String> {
            column_index
                .get(name)
                .and_then(|&i| record.get(i))
                .filter(|value| !value.is_empty())
                .map(str::to_string)
        };

        rows.push(NewQuestion {
            question_title: required("question_title"),
            level: required("level"),
            subject: required("subject"),
            marks: required("marks"),
            paper: optional("paper"),
            question_number: optional("question_number"),
            reference_code: optional("reference_code"),
            timezone: optional("timezone"),
            adapted_from: optional("adapted_from"),
            question_diagram: optional("question_diagram"),
            markscheme_image: optional("markscheme_image"),
            question_body: required("question_body"),
            markscheme_body: optional("markscheme_body"),
            examiner_report: optional("examiner_report"),
            published_date: optional("published_date"),
            question_html: optional("question_html"),
        });
    }

    info!("CSV 解析完成: {} 行", rows.len());

    Ok(rows)
}
