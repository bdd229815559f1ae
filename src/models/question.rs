use serde::{Deserialize, Serialize};

/// 题目记录（远程存储中 questions 表的完整行）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: String,
    pub question_title: String,
    pub level: String,
    pub subject: String,
    pub marks: String,
    #[serde(default)]
    pub paper: Option<String>,
    #[serde(default)]
    pub question_number: Option<String>,
    #[serde(default)]
    pub reference_code: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub adapted_from: Option<String>,
    #[serde(default)]
    pub question_diagram: Option<String>,
    #[serde(default)]
    pub markscheme_image: Option<String>,
    pub question_body: String,
    #[serde(default)]
    pub markscheme_body: Option<String>,
    #[serde(default)]
    pub examiner_report: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub question_html: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl QuestionRecord {
    /// 该记录是否带有评分标准（空白字符串视为缺失，答案页会被跳过）
    pub fn has_markscheme(&self) -> bool {
        self.markscheme_body
            .as_deref()
            .map(|body| !body.trim().is_empty())
            .unwrap_or(false)
    }
}

/// 新建题目（插入存储时使用，无 id 和时间戳）
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewQuestion {
    pub question_title: String,
    pub level: String,
    pub subject: String,
    pub marks: String,
    pub paper: Option<String>,
    pub question_number: Option<String>,
    pub reference_code: Option<String>,
    pub timezone: Option<String>,
    pub adapted_from: Option<String>,
    pub question_diagram: Option<String>,
    pub markscheme_image: Option<String>,
    pub question_body: String,
    pub markscheme_body: Option<String>,
    pub examiner_report: Option<String>,
    pub published_date: Option<String>,
    pub question_html: Option<String>,
}
