//! 远程题库存储客户端 - 业务能力层
//!
//! 负责与 Supabase 的 PostgREST 接口交互：筛选分页查询、
//! 按ID取数、工作表候选池、增删改和批量插入。
//! 鉴权、存储和查询执行完全由远端负责。

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_RANGE};
use reqwest::{Client, Response};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, StoreError};
use crate::models::question::{NewQuestion, QuestionRecord};
use crate::store::filter::{parse_content_range_total, PageQuery, QuestionFilter};

/// 一页查询结果：记录加精确总数
#[derive(Debug)]
pub struct QuestionPageResult {
    pub records: Vec<QuestionRecord>,
    pub total: usize,
}

/// 远程题库存储客户端
pub struct QuestionStore {
    client: Client,
    base_url: String,
}

impl QuestionStore {
    /// 创建新的存储客户端
    pub fn new(config: &Config) -> AppResult<Self> {
        let mut headers = HeaderMap::new();

        let api_key = HeaderValue::from_str(&config.supabase_anon_key)
            .map_err(|e| AppError::Other(format!("非法的 API key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.supabase_anon_key))
            .map_err(|e| AppError::Other(format!("非法的 API key: {}", e)))?;

        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(
            "x-application-name",
            HeaderValue::from_static("question-bank"),
        );

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::Other(format!("构建 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    /// 筛选 + 分页查询，返回记录和精确总数
    pub async fn fetch_page(
        &self,
        filter: &QuestionFilter,
        page: PageQuery,
    ) -> AppResult<QuestionPageResult> {
        let endpoint = self.endpoint("questions");

        let mut params = vec![("select".to_string(), "*".to_string())];
        params.extend(filter.to_query_params());
        params.push(("order".to_string(), "created_at.desc".to_string()));
        params.push(("offset".to_string(), page.offset().to_string()));
        params.push(("limit".to_string(), page.per_page.to_string()));

        debug!("查询题目列表: {:?}", params);

        let response = self
            .client
            .get(&endpoint)
            .query(&params)
            .header("Prefer", "count=exact")
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        let response = ensure_success(&endpoint, response).await?;

        let total = response
            .headers()
            .get(CONTENT_RANGE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range_total)
            .ok_or_else(|| {
                AppError::Store(StoreError::ContentRangeMissing {
                    endpoint: endpoint.clone(),
                })
            })?;

        let records: Vec<QuestionRecord> = response
            .json()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        Ok(QuestionPageResult { records, total })
    }

    /// 按ID列表取记录，并按请求中的ID顺序重新排列
    ///
    /// PostgREST 不保证 in.(...) 的返回顺序，而工作表的页面顺序
    /// 必须严格等于请求顺序
    pub async fn fetch_by_ids(&self, ids: &[String]) -> AppResult<Vec<QuestionRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let endpoint = self.endpoint("questions");
        let params = vec![
            ("select".to_string(), "*".to_string()),
            ("id".to_string(), format!("in.({})", ids.join(","))),
        ];

        let response = self
            .client
            .get(&endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        let response = ensure_success(&endpoint, response).await?;

        let fetched: Vec<QuestionRecord> = response
            .json()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        let mut by_id: HashMap<String, QuestionRecord> = fetched
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();

        let mut ordered = Vec::with_capacity(ids.len());
        for id in ids {
            match by_id.remove(id) {
                Some(record) => ordered.push(record),
                None => warn!("⚠️ 存储中不存在请求的题目: {}", id),
            }
        }

        Ok(ordered)
    }

    /// 工作表生成候选池：按科目/级别精确匹配、标题子串匹配，
    /// 排除已接受的题目
    pub async fn generate_pool(
        &self,
        subject: &str,
        level: &str,
        title: &str,
        exclude_ids: &[String],
        limit: usize,
    ) -> AppResult<Vec<QuestionRecord>> {
        let endpoint = self.endpoint("questions");

        let mut params = vec![
            ("select".to_string(), "*".to_string()),
            ("subject".to_string(), format!("eq.{}", subject)),
            ("level".to_string(), format!("eq.{}", level)),
            ("question_title".to_string(), format!("ilike.*{}*", title)),
            ("limit".to_string(), limit.to_string()),
        ];
        if !exclude_ids.is_empty() {
            params.push(("id".to_string(), format!("not.in.({})", exclude_ids.join(","))));
        }

        let response = self
            .client
            .get(&endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        let response = ensure_success(&endpoint, response).await?;

        response
            .json()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))
    }

    /// 查询某科目的可用主题列表
    pub async fn fetch_topics(&self, subject: &str) -> AppResult<Vec<String>> {
        #[derive(serde::Deserialize)]
        struct TopicRow {
            topic: String,
        }

        let endpoint = self.endpoint("subject_topics");
        let params = vec![
            ("select".to_string(), "topic".to_string()),
            ("subject".to_string(), format!("eq.{}", subject)),
        ];

        let response = self
            .client
            .get(&endpoint)
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        let response = ensure_success(&endpoint, response).await?;

        let rows: Vec<TopicRow> = response
            .json()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        Ok(rows.into_iter().map(|row| row.topic).collect())
    }

    /// 插入单条记录
    pub async fn insert(&self, row: &NewQuestion) -> AppResult<()> {
        self.insert_many(std::slice::from_ref(row)).await.map(|_| ())
    }

    /// 批量插入记录，返回插入条数
    pub async fn insert_many(&self, rows: &[NewQuestion]) -> AppResult<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let endpoint = self.endpoint("questions");
        let response = self
            .client
            .post(&endpoint)
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        ensure_success(&endpoint, response).await?;
        Ok(rows.len())
    }

    /// 更新指定ID的记录
    pub async fn update(&self, id: &str, row: &NewQuestion) -> AppResult<()> {
        let endpoint = self.endpoint("questions");
        let response = self
            .client
            .patch(&endpoint)
            .query(&[("id", format!("eq.{}", id))])
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        ensure_success(&endpoint, response).await?;
        Ok(())
    }

    /// 删除指定ID的记录
    pub async fn delete(&self, id: &str) -> AppResult<()> {
        let endpoint = self.endpoint("questions");
        let response = self
            .client
            .delete(&endpoint)
            .query(&[("id", format!("eq.{}", id))])
            .send()
            .await
            .map_err(|e| AppError::store_request_failed(&endpoint, e))?;

        ensure_success(&endpoint, response).await?;
        Ok(())
    }
}

/// 非 2xx 响应统一转换为 BadResponse 错误
async fn ensure_success(endpoint: &str, response: Response) -> AppResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().await.ok().filter(|text| !text.is_empty());
    Err(AppError::Store(StoreError::BadResponse {
        endpoint: endpoint.to_string(),
        status: status.as_u16(),
        message,
    }))
}
