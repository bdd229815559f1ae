//! 列表查询条件到 PostgREST 查询参数的翻译
//!
//! 纯函数，不发请求，单独测试

/// 题目列表的筛选条件
///
/// subject / level 是精确匹配，title 是子串匹配，
/// search 在题目正文和参考编号两个字段上做子串搜索
#[derive(Debug, Clone, Default)]
pub struct QuestionFilter {
    pub subject: Option<String>,
    pub level: Option<String>,
    pub title: Option<String>,
    pub search: Option<String>,
}

impl QuestionFilter {
    /// 翻译为 PostgREST 查询参数
    pub fn to_query_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(subject) = &self.subject {
            params.push(("subject".to_string(), format!("eq.{}", subject)));
        }
        if let Some(level) = &self.level {
            params.push(("level".to_string(), format!("eq.{}", level)));
        }
        if let Some(title) = &self.title {
            params.push(("question_title".to_string(), format!("ilike.*{}*", title)));
        }
        if let Some(search) = &self.search {
            params.push((
                "or".to_string(),
                format!(
                    "(question_body.ilike.*{}*,reference_code.ilike.*{}*)",
                    search, search
                ),
            ));
        }

        params
    }
}

/// 偏移式分页（页码从 1 开始）
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub page: usize,
    pub per_page: usize,
}

impl PageQuery {
    pub fn new(page: usize, per_page: usize) -> Self {
        Self {
            page: page.max(1),
            per_page,
        }
    }

    /// 该页第一行的偏移量
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.per_page
    }
}

/// 解析 Content-Range 头中的精确总数
///
/// PostgREST 在 Prefer: count=exact 时返回形如 "0-9/57" 或 "*/0" 的值
pub fn parse_content_range_total(header: &str) -> Option<usize> {
    header.rsplit('/').next()?.trim().parse().ok()
}
