use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig};
use tracing::{debug, error, info};

use crate::browser::session::BrowserSession;
use crate::config::BrowserOptions;
use crate::error::ScraperError;

/// 根据配置构建浏览器启动参数
pub fn build_browser_config(options: &BrowserOptions) -> Result<BrowserConfig> {
    let mut builder = BrowserConfig::builder();
    builder = if options.headless {
        builder.new_headless_mode()
    } else {
        builder.with_head()
    };

    if let Some(executable) = options.chrome_executable.as_deref() {
        builder = builder.chrome_executable(Path::new(executable));
    }

    if let Some(timeout) = options.request_timeout() {
        builder = builder.request_timeout(timeout);
    }

    builder.args(options.args.clone()).build().map_err(|e| {
        error!("配置浏览器失败: {}", e);
        ScraperError::BrowserConfig(e).into()
    })
}

/// 启动无头浏览器
pub async fn launch_headless_browser(options: &BrowserOptions) -> Result<BrowserSession> {
    info!("🚀 启动浏览器...");
    debug!(
        "无头模式: {}, 可执行文件: {:?}",
        options.headless, options.chrome_executable
    );

    let config = build_browser_config(options)?;

    let (browser, handler) = Browser::launch(config).await.map_err(|e| {
        error!("启动浏览器失败: {}", e);
        ScraperError::BrowserLaunch { source: e }
    })?;
    debug!("浏览器启动成功");

    Ok(BrowserSession::spawn(browser, handler, true).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_with_custom_executable() {
        let options = BrowserOptions {
            chrome_executable: Some("/usr/bin/chromium".to_string()),
            ..BrowserOptions::default()
        };
        assert!(build_browser_config(&options).is_ok());
    }

    #[test]
    fn test_build_config_with_request_timeout() {
        let options = BrowserOptions {
            chrome_executable: Some("/usr/bin/chromium".to_string()),
            request_timeout_secs: Some(65),
            ..BrowserOptions::default()
        };
        assert!(build_browser_config(&options).is_ok());
    }
}
