use std::path::Path;

use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::taxonomy::Taxonomies;

/// 工作表生成请求（TOML 输入文件）
///
/// 文件中的 question_ids 顺序即为文档中的页面顺序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetRequest {
    /// 工作表名称（仅用于日志）
    #[serde(default)]
    pub name: Option<String>,
    /// 按文档顺序排列的题目ID列表
    pub question_ids: Vec<String>,
    /// 期望的科目（用于与本地分类标签做校验）
    #[serde(default)]
    pub subject: Option<String>,
    /// 期望的级别（用于与本地分类标签做校验）
    #[serde(default)]
    pub level: Option<String>,
}

/// 从 TOML 文件加载工作表请求
pub async fn load_worksheet_request(path: &str) -> AppResult<WorksheetRequest> {
    if !Path::new(path).exists() {
        return Err(AppError::File(crate::error::FileError::NotFound {
            path: path.to_string(),
        }));
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))?;

    let request: WorksheetRequest = toml::from_str(&content)?;

    info!(
        "已加载工作表请求: {} 个题目",
        request.question_ids.len()
    );

    Ok(request)
}

/// 从 TOML 文件加载分类标签
///
/// 文件不存在时退回默认种子列表；文件中缺失的字段同样退回默认值
pub async fn load_taxonomies(path: &str) -> AppResult<Taxonomies> {
    if !Path::new(path).exists() {
        info!("分类标签文件不存在，使用默认种子列表: {}", path);
        return Ok(Taxonomies::default());
    }

    let content = fs::read_to_string(path)
        .await
        .map_err(|e| AppError::file_read_failed(path, e))?;

    let taxonomies: Taxonomies = toml::from_str(&content)?;
    Ok(taxonomies)
}

/// 将分类标签保存到 TOML 文件（整体覆盖写入）
pub async fn save_taxonomies(path: &str, taxonomies: &Taxonomies) -> AppResult<()> {
    let content = toml::to_string_pretty(taxonomies)
        .map_err(|e| AppError::Other(format!("序列化分类标签失败: {}", e)))?;

    fs::write(path, content)
        .await
        .map_err(|e| AppError::file_write_failed(path, e))?;

    Ok(())
}
