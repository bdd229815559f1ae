use serde::{Deserialize, Serialize};

/// 默认科目列表
pub const DEFAULT_SUBJECTS: &[&str] = &[
    "Mathematics",
    "Physics",
    "Chemistry",
    "Biology",
    "Computer Science",
];

/// 默认级别列表
pub const DEFAULT_LEVELS: &[&str] = &["HL", "SL"];

/// 默认题目标题列表
pub const DEFAULT_QUESTION_TITLES: &[&str] = &[
    "Algebra Basics",
    "Calculus Fundamentals",
    "Geometry Problems",
    "Linear Equations",
    "Matrices and Determinants",
    "Number Theory",
    "Probability",
    "Statistics",
    "Trigonometry",
    "Vector Analysis",
];

/// 三类可配置的分类标签（本地 TOML 持久化，缺失时退回默认种子）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomies {
    #[serde(default = "default_subjects")]
    pub subjects: Vec<String>,
    #[serde(default = "default_levels")]
    pub levels: Vec<String>,
    #[serde(default = "default_question_titles")]
    pub question_titles: Vec<String>,
}

fn default_subjects() -> Vec<String> {
    DEFAULT_SUBJECTS.iter().map(|s| s.to_string()).collect()
}

fn default_levels() -> Vec<String> {
    DEFAULT_LEVELS.iter().map(|s| s.to_string()).collect()
}

fn default_question_titles() -> Vec<String> {
    DEFAULT_QUESTION_TITLES.iter().map(|s| s.to_string()).collect()
}

impl Default for Taxonomies {
    fn default() -> Self {
        Self {
            subjects: default_subjects(),
            levels: default_levels(),
            question_titles: default_question_titles(),
        }
    }
}

impl Taxonomies {
    pub fn has_subject(&self, subject: &str) -> bool {
        self.subjects.iter().any(|s| s == subject)
    }

    pub fn has_level(&self, level: &str) -> bool {
        self.levels.iter().any(|l| l == level)
    }
}
