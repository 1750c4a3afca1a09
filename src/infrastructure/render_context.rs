//! 渲染上下文 - 基础设施层
//!
//! 每个商家详情页在一个独立获取、用完即释放的上下文中访问。
//! 隔离粒度由 [`ContextStrategy`] 决定。

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chromiumoxide::Page;
use tracing::{debug, info, warn};

use crate::browser::BrowserSession;
use crate::config::{BrowserOptions, ContextStrategy};
use crate::infrastructure::js_executor::JsExecutor;
use crate::infrastructure::render_surface::RenderSurface;

/// 一次性渲染上下文，释放后不能再使用
#[async_trait]
pub trait RenderContext: Send + Sync {
    fn surface(&self) -> &dyn RenderSurface;

    /// 释放上下文占用的资源，重复调用是空操作
    async fn release(&mut self) -> Result<()>;
}

/// 渲染上下文的提供者
#[async_trait]
pub trait ContextProvider: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn RenderContext>>;
}

/// 上下文释放时要回收的资源
enum Lifetime {
    /// 共享标签页，不回收
    SharedTab,
    /// 独立标签页，释放时关闭
    Tab,
    /// 独立浏览器会话，释放时先关闭页面再关闭会话
    ///
    /// 通过调试端口连接的会话不会关闭用户的浏览器，只能靠关闭页面回收标签页。
    Browser(Option<BrowserSession>),
}

impl Lifetime {
    /// 释放时是否要关闭本上下文打开的页面
    fn closes_page(&self) -> bool {
        !matches!(self, Lifetime::SharedTab)
    }
}

/// 基于 chromiumoxide 的渲染上下文
pub struct ChromeContext {
    executor: JsExecutor,
    lifetime: Lifetime,
    released: bool,
}

impl ChromeContext {
    fn new(page: Page, lifetime: Lifetime) -> Self {
        Self {
            executor: JsExecutor::new(page),
            lifetime,
            released: false,
        }
    }
}

#[async_trait]
impl RenderContext for ChromeContext {
    fn surface(&self) -> &dyn RenderSurface {
        &self.executor
    }

    async fn release(&mut self) -> Result<()> {
        if self.released {
            return Ok(());
        }
        self.released = true;

        let page_closed = if self.lifetime.closes_page() {
            self.executor
                .page()
                .clone()
                .close()
                .await
                .map_err(anyhow::Error::from)
        } else {
            Ok(())
        };

        // 页面关闭失败也要继续关闭会话
        let session_closed = match &mut self.lifetime {
            Lifetime::Browser(session) => match session.take() {
                Some(session) => session.close().await,
                None => Ok(()),
            },
            Lifetime::SharedTab | Lifetime::Tab => Ok(()),
        };

        page_closed.and(session_closed)
    }
}

/// 按策略提供 chromiumoxide 上下文
///
/// 共享策略在 [`ChromeContextProvider::open`] 时启动浏览器，
/// 必须以 [`ChromeContextProvider::shutdown`] 结束。
pub struct ChromeContextProvider {
    strategy: ContextStrategy,
    options: BrowserOptions,
    shared: Option<BrowserSession>,
    shared_page: Option<Page>,
}

impl ChromeContextProvider {
    pub async fn open(strategy: ContextStrategy, options: BrowserOptions) -> Result<Self> {
        info!("🧭 详情页上下文策略: {:?}", strategy);

        let mut provider = Self {
            strategy,
            options,
            shared: None,
            shared_page: None,
        };

        if strategy == ContextStrategy::IsolatedBrowser {
            return Ok(provider);
        }

        let session = BrowserSession::open(&provider.options).await?;
        if strategy == ContextStrategy::SharedTab {
            match session.new_page().await {
                Ok(page) => provider.shared_page = Some(page),
                Err(e) => {
                    close_quietly(session).await;
                    return Err(e);
                }
            }
        }
        provider.shared = Some(session);

        Ok(provider)
    }

    /// 关闭共享浏览器（如有）
    pub async fn shutdown(self) -> Result<()> {
        if let Some(page) = self.shared_page {
            if let Err(e) = page.close().await {
                warn!("关闭共享页面失败: {}", e);
            }
        }
        match self.shared {
            Some(session) => session.close().await,
            None => Ok(()),
        }
    }

    fn shared_session(&self) -> Result<&BrowserSession> {
        self.shared
            .as_ref()
            .ok_or_else(|| anyhow!("共享浏览器未启动 (策略: {:?})", self.strategy))
    }
}

#[async_trait]
impl ContextProvider for ChromeContextProvider {
    async fn acquire(&self) -> Result<Box<dyn RenderContext>> {
        let context = match self.strategy {
            ContextStrategy::IsolatedBrowser => {
                let session = BrowserSession::open(&self.options).await?;
                match session.new_page().await {
                    Ok(page) => ChromeContext::new(page, Lifetime::Browser(Some(session))),
                    Err(e) => {
                        // 浏览器已启动但页面创建失败，同样要关闭浏览器
                        close_quietly(session).await;
                        return Err(e);
                    }
                }
            }
            ContextStrategy::IsolatedTab => {
                let page = self.shared_session()?.new_page().await?;
                ChromeContext::new(page, Lifetime::Tab)
            }
            ContextStrategy::SharedTab => {
                let page = self
                    .shared_page
                    .clone()
                    .ok_or_else(|| anyhow!("共享页面未创建"))?;
                ChromeContext::new(page, Lifetime::SharedTab)
            }
        };

        debug!("已获取渲染上下文 ({:?})", self.strategy);
        Ok(Box::new(context))
    }
}

async fn close_quietly(session: BrowserSession) {
    if let Err(e) = session.close().await {
        warn!("关闭浏览器失败: {}", e);
    }
}
