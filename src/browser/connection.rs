use std::time::Duration;

use anyhow::Result;
use chromiumoxide::handler::HandlerConfig;
use chromiumoxide::Browser;
use tracing::{debug, error, info};

use crate::browser::session::BrowserSession;
use crate::error::ScraperError;

/// 通过调试端口连接到已运行的浏览器
///
/// 连接得到的会话不拥有浏览器进程，关闭会话时不会关闭浏览器。
pub async fn connect_to_browser(
    port: u16,
    request_timeout: Option<Duration>,
) -> Result<BrowserSession> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, handler) =
        Browser::connect_with_config(&browser_url, handler_config(request_timeout))
            .await
            .map_err(|e| {
                error!("连接浏览器失败: {}", e);
                ScraperError::BrowserLaunch { source: e }
            })?;
    debug!("浏览器连接成功");

    Ok(BrowserSession::spawn(browser, handler, false).await)
}

fn handler_config(request_timeout: Option<Duration>) -> HandlerConfig {
    let mut config = HandlerConfig::default();
    if let Some(timeout) = request_timeout {
        config.request_timeout = timeout;
    }
    config
}
