//! 渲染面能力接口 - 基础设施层
//!
//! 抽象"可以导航、查询、滚动的页面"，上层只依赖这个 trait，
//! 测试时可以用内存中的假页面替换真实浏览器。

use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use tokio::time::{sleep, Instant};

/// `wait_for` 的轮询间隔
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// 导航参数
#[derive(Debug, Clone, Copy)]
pub struct NavigationOptions {
    /// 整个导航（含等待网络空闲）的超时
    pub timeout: Duration,
    /// 主框架到达 `networkAlmostIdle` 后再额外等待的时间
    pub quiescence: Duration,
}

impl Default for NavigationOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            quiescence: Duration::from_millis(500),
        }
    }
}

/// 渲染面
///
/// 所有查询都只看第一个匹配元素；元素不存在时返回 `None` / `false`，
/// 只有页面本身出错（脚本执行失败、连接断开）才返回 `Err`。
#[async_trait]
pub trait RenderSurface: Send + Sync {
    /// 导航到 URL 并等待网络空闲，超时返回 `ScraperError::NavigationTimeout`
    async fn navigate(&self, url: &str, options: NavigationOptions) -> Result<()>;

    /// 是否存在匹配元素
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// 第一个匹配元素的文本内容（已去除首尾空白）
    async fn read_text(&self, selector: &str) -> Result<Option<String>>;

    /// 第一个匹配元素的属性值
    async fn read_attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// 所有匹配元素的 href（按文档顺序）
    async fn read_links(&self, selector: &str) -> Result<Vec<String>>;

    /// 将容器向下滚动指定距离，容器不存在时返回 `false`
    async fn scroll_by(&self, container: &str, distance: i64) -> Result<bool>;

    /// 容器的内容高度，容器不存在时返回 `None`
    async fn content_extent(&self, container: &str) -> Result<Option<f64>>;

    /// 点击第一个匹配元素，元素不存在时返回 `false`
    async fn click(&self, selector: &str) -> Result<bool>;

    /// 等待元素出现，超时返回 `false`
    async fn wait_for(&self, selector: &str, timeout: Duration) -> Result<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            if self.exists(selector).await? {
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(WAIT_POLL_INTERVAL).await;
        }
    }
}
