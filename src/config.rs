/// 程序配置文件
#[derive(Clone, Debug)]
pub struct Config {
    /// Supabase 项目地址
    pub supabase_url: String,
    /// Supabase 匿名密钥
    pub supabase_anon_key: String,
    /// 浏览器调试端口（连接已运行的浏览器时使用）
    pub browser_debug_port: u16,
    /// 是否自行启动无头浏览器（false 表示连接调试端口）
    pub launch_browser: bool,
    /// 渲染片段的逻辑宽度（像素）
    pub render_width: u32,
    /// 截图前的固定等待时间（毫秒），等待字体/样式/公式排版完成
    pub render_settle_ms: u64,
    /// 截图放大倍数（超采样以保证打印质量）
    pub capture_scale: f64,
    /// JPEG 压缩质量
    pub jpeg_quality: i64,
    /// 内容页图片距页面顶部的边距（pt）
    pub page_top_margin_pt: f32,
    /// 工作表请求文件（题目ID列表）
    pub worksheet_file: String,
    /// 分类标签持久化文件（科目/级别/标题）
    pub taxonomy_file: String,
    /// 批量导入的 CSV 文件（设置后程序只执行导入）
    pub import_csv_file: Option<String>,
    /// CSV 文件大小上限（字节）
    pub max_csv_size: u64,
    /// 列表查询每页条数
    pub items_per_page: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            supabase_url: "https://example.supabase.co".to_string(),
            supabase_anon_key: String::new(),
            browser_debug_port: 2001,
            launch_browser: true,
            render_width: 800,
            render_settle_ms: 1500,
            capture_scale: 3.0,
            jpeg_quality: 100,
            page_top_margin_pt: 40.0,
            worksheet_file: "worksheet.toml".to_string(),
            taxonomy_file: "taxonomy.toml".to_string(),
            import_csv_file: None,
            max_csv_size: 25 * 1024 * 1024,
            items_per_page: 10,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            supabase_url: std::env::var("SUPABASE_URL").unwrap_or(default.supabase_url),
            supabase_anon_key: std::env::var("SUPABASE_ANON_KEY").unwrap_or(default.supabase_anon_key),
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            launch_browser: std::env::var("LAUNCH_BROWSER").ok().and_then(|v| v.parse().ok()).unwrap_or(default.launch_browser),
            render_width: std::env::var("RENDER_WIDTH").ok().and_then(|v| v.parse().ok()).unwrap_or(default.render_width),
            render_settle_ms: std::env::var("RENDER_SETTLE_MS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.render_settle_ms),
            capture_scale: std::env::var("CAPTURE_SCALE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.capture_scale),
            jpeg_quality: std::env::var("JPEG_QUALITY").ok().and_then(|v| v.parse().ok()).unwrap_or(default.jpeg_quality),
            page_top_margin_pt: std::env::var("PAGE_TOP_MARGIN_PT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.page_top_margin_pt),
            worksheet_file: std::env::var("WORKSHEET_FILE").unwrap_or(default.worksheet_file),
            taxonomy_file: std::env::var("TAXONOMY_FILE").unwrap_or(default.taxonomy_file),
            import_csv_file: std::env::var("IMPORT_CSV_FILE").ok().filter(|v| !v.is_empty()),
            max_csv_size: std::env::var("MAX_CSV_SIZE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_csv_size),
            items_per_page: std::env::var("ITEMS_PER_PAGE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.items_per_page),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
        }
    }
}
