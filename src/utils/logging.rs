use anyhow::Result;
/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化 tracing 日志
///
/// RUST_LOG 存在时优先；否则 verbose 决定 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    // try_init: 测试里多次初始化不算错误
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .ok();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n工作表生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(output_pdf_file: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 工作表 PDF 生成模式");
    info!("📄 输出文件: {}", output_pdf_file);
    info!("{}", "=".repeat(60));
}

/// 记录题目加载信息
pub fn log_records_loaded(requested: usize, resolved: usize) {
    info!("✓ 工作表请求包含 {} 个题目，存储中解析到 {} 个", requested, resolved);
}

/// 打印最终统计信息
///
/// # 参数
/// - `total_pages`: 总页数
/// - `question_pages`: 题目页数
/// - `answer_pages`: 答案页数
/// - `skipped_answers`: 跳过的答案数
pub fn print_final_stats(
    total_pages: usize,
    question_pages: usize,
    answer_pages: usize,
    skipped_answers: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 生成完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("📄 总页数: {} (含 2 个章节标题页)", total_pages);
    info!("✅ 题目页: {}", question_pages);
    info!("✅ 答案页: {} (跳过 {} 个无评分标准的题目)", answer_pages, skipped_answers);
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
