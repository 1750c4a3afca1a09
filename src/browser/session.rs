use std::time::Duration;

use anyhow::Result;
use chromiumoxide::{Browser, Handler, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::config::BrowserOptions;

/// 浏览器会话
///
/// 持有 Browser 和后台事件处理任务，只能通过 [`BrowserSession::close`] 显式释放。
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    /// 是否由本程序启动（连接得到的浏览器不由我们关闭）
    owned: bool,
}

impl BrowserSession {
    /// 按配置启动或连接浏览器
    pub async fn open(options: &BrowserOptions) -> Result<Self> {
        match options.debug_port {
            Some(port) => {
                super::connection::connect_to_browser(port, options.request_timeout()).await
            }
            None => super::headless::launch_headless_browser(options).await,
        }
    }

    pub(crate) async fn spawn(browser: Browser, mut handler: Handler, owned: bool) -> Self {
        // 在后台处理浏览器事件
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        // 添加短暂延迟以等待浏览器状态同步
        sleep(Duration::from_millis(300)).await;

        Self {
            browser,
            handler_task,
            owned,
        }
    }

    /// 新建空白页面
    pub async fn new_page(&self) -> Result<Page> {
        let page = self.browser.new_page("about:blank").await.map_err(|e| {
            error!("创建页面失败: {}", e);
            e
        })?;
        debug!("已创建新页面");
        Ok(page)
    }

    /// 关闭会话
    pub async fn close(mut self) -> Result<()> {
        let result = if self.owned {
            match self.browser.close().await {
                Ok(_) => {
                    if let Err(e) = self.browser.wait().await {
                        warn!("等待浏览器进程退出失败: {}", e);
                    }
                    Ok(())
                }
                Err(e) => Err(e.into()),
            }
        } else {
            Ok(())
        };

        self.handler_task.abort();
        debug!("浏览器会话已关闭");
        result
    }
}
