use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 启动无头浏览器并创建一个空白渲染页面
///
/// 生成流程独占这个页面作为离屏渲染表面，每个任务整体替换其内容
pub async fn launch_headless_browser(window_width: u32) -> Result<(Browser, Page)> {
    info!("🚀 启动无头浏览器...");

    let window_size_arg = format!("--window-size={},1200", window_width + 50);

    // 配置无头浏览器
    let config = BrowserConfig::builder()
        .new_headless_mode()
        .args(vec![
            "--disable-gpu",             // 无头模式下禁用 GPU
            "--no-sandbox",              // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage",   // 防止共享内存不足
            "--hide-scrollbars",         // 截图中不能出现滚动条
            "--remote-debugging-port=0", // 让浏览器自动选择端口
            window_size_arg.as_str(),
        ])
        .build()
        .map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            anyhow::anyhow!("配置无头浏览器失败: {}", e)
        })?;

    // 启动浏览器
    let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动无头浏览器失败: {}", e);
        anyhow::anyhow!("启动无头浏览器失败: {}", e)
    })?;
    debug!("无头浏览器启动成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    // 创建空白页面作为渲染表面
    let page = browser.new_page("about:blank").await.map_err(|e| {
        error!("创建渲染页面失败: {}", e);
        anyhow::anyhow!("创建渲染页面失败: {}", e)
    })?;

    info!("✅ 无头浏览器已就绪，渲染页面已创建");

    Ok((browser, page))
}
