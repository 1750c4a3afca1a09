//! JS 执行器 - 基础设施层
//!
//! 持有唯一的 page 资源，只暴露"执行 JS"的能力，
//! 并在此基础上实现 [`RenderSurface`]。

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{
    EventLifecycleEvent, SetLifecycleEventsEnabledParams,
};
use chromiumoxide::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::time::{sleep, timeout};
use tracing::debug;

use crate::error::{ScraperError, ScraperResult};
use crate::infrastructure::render_surface::{NavigationOptions, RenderSurface};

/// 新文档开始加载的生命周期事件
const LIFECYCLE_INIT: &str = "init";

/// 500ms 内在途请求不超过 2 个
const LIFECYCLE_NETWORK_ALMOST_IDLE: &str = "networkAlmostIdle";

/// 页面脚本统一返回 `{ value }`，避免 `null` 结果无法反序列化
#[derive(Deserialize)]
struct Wrapped<T> {
    value: T,
}

/// JS 执行器
///
/// 职责：
/// - 持有唯一的 Page 资源
/// - 暴露 eval() 能力
/// - 不认识商家 / 链接
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于其他操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 执行返回 `{ value }` 的脚本并取出 value
    async fn query<T: DeserializeOwned>(&self, js_code: String) -> Result<T> {
        let wrapped: Wrapped<T> = self
            .eval_as(js_code)
            .await
            .map_err(|e| ScraperError::Script(format!("{:#}", e)))?;
        Ok(wrapped.value)
    }

    /// 导航并等待主框架本次加载的 `networkAlmostIdle` 事件，之后再等待 `settle`
    async fn goto_until_idle(&self, url: &str, settle: Duration) -> ScraperResult<()> {
        self.page
            .execute(SetLifecycleEventsEnabledParams::new(true))
            .await?;
        let main_frame = self.page.mainframe().await?.map(|f| f.inner().clone());

        // 先订阅再导航，避免错过事件
        let mut events = self.page.event_listener::<EventLifecycleEvent>().await?;
        let mut watcher = IdleWatcher::new(main_frame);

        self.page.goto(url).await?;

        while let Some(event) = events.next().await {
            if watcher.observe(event.frame_id.inner(), event.loader_id.inner(), &event.name) {
                debug!("网络已空闲: {}", url);
                if !settle.is_zero() {
                    sleep(settle).await;
                }
                return Ok(());
            }
        }

        Err(ScraperError::Script(format!("页面生命周期事件流已关闭: {}", url)))
    }
}

/// 跟踪主框架的生命周期事件
///
/// 只认可 `init` 之后、同一 loader 的 `networkAlmostIdle`，
/// 上一个文档或子框架的事件都会被忽略。
#[derive(Debug)]
struct IdleWatcher {
    main_frame: Option<String>,
    loader: Option<String>,
}

impl IdleWatcher {
    fn new(main_frame: Option<String>) -> Self {
        Self {
            main_frame,
            loader: None,
        }
    }

    /// 返回是否已达到网络空闲
    fn observe(&mut self, frame_id: &str, loader_id: &str, name: &str) -> bool {
        if self.main_frame.as_deref().is_some_and(|main| main != frame_id) {
            return false;
        }
        if name == LIFECYCLE_INIT {
            self.main_frame.get_or_insert_with(|| frame_id.to_string());
            self.loader = Some(loader_id.to_string());
            return false;
        }
        name == LIFECYCLE_NETWORK_ALMOST_IDLE && self.loader.as_deref() == Some(loader_id)
    }
}

/// 将字符串编码为 JS 字面量
fn js_str(value: &str) -> Result<String> {
    serde_json::to_string(value).context("无法编码脚本参数")
}

#[async_trait]
impl RenderSurface for JsExecutor {
    async fn navigate(&self, url: &str, options: NavigationOptions) -> Result<()> {
        debug!("导航到: {}", url);
        let navigation = self.goto_until_idle(url, options.quiescence);

        match timeout(options.timeout, navigation).await {
            Ok(result) => result.map_err(anyhow::Error::from),
            Err(_) => Err(ScraperError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: options.timeout.as_secs(),
            }
            .into()),
        }
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let js = format!(
            "({{ value: document.querySelector({}) !== null }})",
            js_str(selector)?
        );
        self.query(js).await
    }

    async fn read_text(&self, selector: &str) -> Result<Option<String>> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({});
                return {{ value: el ? (el.textContent || "").trim() : null }};
            }})()"#,
            js_str(selector)?
        );
        self.query(js).await
    }

    async fn read_attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({});
                return {{ value: el ? el.getAttribute({}) : null }};
            }})()"#,
            js_str(selector)?,
            js_str(name)?
        );
        self.query(js).await
    }

    async fn read_links(&self, selector: &str) -> Result<Vec<String>> {
        let js = format!(
            r#"({{ value: Array.from(document.querySelectorAll({})).map((el) => el.href).filter(Boolean) }})"#,
            js_str(selector)?
        );
        self.query(js).await
    }

    async fn scroll_by(&self, container: &str, distance: i64) -> Result<bool> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return {{ value: false }};
                el.scrollBy(0, {});
                return {{ value: true }};
            }})()"#,
            js_str(container)?,
            distance
        );
        self.query(js).await
    }

    async fn content_extent(&self, container: &str) -> Result<Option<f64>> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({});
                return {{ value: el ? el.scrollHeight : null }};
            }})()"#,
            js_str(container)?
        );
        self.query(js).await
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let js = format!(
            r#"(() => {{
                const el = document.querySelector({});
                if (!el) return {{ value: false }};
                el.click();
                return {{ value: true }};
            }})()"#,
            js_str(selector)?
        );
        self.query(js).await
    }
}
