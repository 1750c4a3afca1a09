// test_support - 内存中的假渲染面和假上下文提供者
//
// 可注入 FeedCollector / DetailScraper / Pipeline，用于不启动浏览器的测试。

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use crate::error::ScraperError;
use crate::infrastructure::{ContextProvider, NavigationOptions, RenderContext, RenderSurface};

/// 模拟的无限滚动列表：前 `growth_steps` 次滚动每次增长，之后高度不变
#[derive(Debug, Clone)]
struct FakeFeed {
    container: String,
    link_selector: String,
    growth_steps: usize,
    links_per_step: usize,
}

#[derive(Default)]
struct FakeState {
    texts: HashMap<String, String>,
    attributes: HashMap<(String, String), String>,
    elements: HashSet<String>,
    feed: Option<FakeFeed>,
    failing_urls: HashSet<String>,
    scrolls: usize,
    navigations: Vec<String>,
    clicks: Vec<String>,
}

/// 假渲染面
#[derive(Default)]
pub struct FakeSurface {
    state: Mutex<FakeState>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_text(self, selector: &str, text: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.texts.insert(selector.to_string(), text.to_string());
            state.elements.insert(selector.to_string());
        }
        self
    }

    pub fn with_attribute(self, selector: &str, name: &str, value: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state
                .attributes
                .insert((selector.to_string(), name.to_string()), value.to_string());
            state.elements.insert(selector.to_string());
        }
        self
    }

    pub fn with_element(self, selector: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .elements
            .insert(selector.to_string());
        self
    }

    /// 挂载一个结果列表，每次增长新增 `links_per_step` 个链接
    pub fn with_feed(
        self,
        container: &str,
        link_selector: &str,
        growth_steps: usize,
        links_per_step: usize,
    ) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.elements.insert(container.to_string());
            state.feed = Some(FakeFeed {
                container: container.to_string(),
                link_selector: link_selector.to_string(),
                growth_steps,
                links_per_step,
            });
        }
        self
    }

    /// 导航到该 URL 时返回超时错误
    pub fn fail_navigation(self, url: &str) -> Self {
        self.state
            .lock()
            .unwrap()
            .failing_urls
            .insert(url.to_string());
        self
    }

    pub fn scroll_count(&self) -> usize {
        self.state.lock().unwrap().scrolls
    }

    pub fn navigations(&self) -> Vec<String> {
        self.state.lock().unwrap().navigations.clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.state.lock().unwrap().clicks.clone()
    }
}

impl FakeFeed {
    fn revealed(&self, scrolls: usize) -> usize {
        scrolls.min(self.growth_steps)
    }
}

#[async_trait]
impl RenderSurface for FakeSurface {
    async fn navigate(&self, url: &str, options: NavigationOptions) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.navigations.push(url.to_string());
        if state.failing_urls.contains(url) {
            return Err(ScraperError::NavigationTimeout {
                url: url.to_string(),
                timeout_secs: options.timeout.as_secs(),
            }
            .into());
        }
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        Ok(self.state.lock().unwrap().elements.contains(selector))
    }

    async fn read_text(&self, selector: &str) -> Result<Option<String>> {
        Ok(self.state.lock().unwrap().texts.get(selector).cloned())
    }

    async fn read_attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .attributes
            .get(&(selector.to_string(), name.to_string()))
            .cloned())
    }

    async fn read_links(&self, selector: &str) -> Result<Vec<String>> {
        let state = self.state.lock().unwrap();
        let Some(feed) = state.feed.as_ref().filter(|f| f.link_selector == selector) else {
            return Ok(Vec::new());
        };
        // 每次扫描都返回全部已渲染的元素，模拟列表重复渲染
        let count = (feed.revealed(state.scrolls) + 1) * feed.links_per_step;
        Ok((0..count)
            .map(|i| format!("https://maps.example/place/{}", i))
            .collect())
    }

    async fn scroll_by(&self, container: &str, _distance: i64) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if !state.elements.contains(container) {
            return Ok(false);
        }
        state.scrolls += 1;
        Ok(true)
    }

    async fn content_extent(&self, container: &str) -> Result<Option<f64>> {
        let state = self.state.lock().unwrap();
        Ok(state
            .feed
            .as_ref()
            .filter(|f| f.container == container)
            .map(|f| 1000.0 + f.revealed(state.scrolls) as f64 * 500.0))
    }

    async fn click(&self, selector: &str) -> Result<bool> {
        let mut state = self.state.lock().unwrap();
        if !state.elements.contains(selector) {
            return Ok(false);
        }
        state.clicks.push(selector.to_string());
        Ok(true)
    }
}

/// 假上下文提供者：所有上下文共享同一个假渲染面，并统计获取/释放次数
pub struct FakeContextProvider {
    surface: Arc<FakeSurface>,
    acquired: Arc<AtomicUsize>,
    released: Arc<AtomicUsize>,
    fail_acquire_at: Option<usize>,
}

impl FakeContextProvider {
    pub fn new(surface: FakeSurface) -> Self {
        Self {
            surface: Arc::new(surface),
            acquired: Arc::new(AtomicUsize::new(0)),
            released: Arc::new(AtomicUsize::new(0)),
            fail_acquire_at: None,
        }
    }

    /// 第 `n` 次（从 1 开始）获取上下文时失败
    pub fn fail_acquire_at(mut self, n: usize) -> Self {
        self.fail_acquire_at = Some(n);
        self
    }

    pub fn surface(&self) -> &FakeSurface {
        &self.surface
    }

    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContextProvider for FakeContextProvider {
    async fn acquire(&self) -> Result<Box<dyn RenderContext>> {
        let attempt = self.acquired.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_acquire_at == Some(attempt) {
            anyhow::bail!("浏览器启动失败 (第 {} 次)", attempt);
        }
        Ok(Box::new(FakeContext {
            surface: Arc::clone(&self.surface),
            released: Arc::clone(&self.released),
            done: false,
        }))
    }
}

struct FakeContext {
    surface: Arc<FakeSurface>,
    released: Arc<AtomicUsize>,
    done: bool,
}

#[async_trait]
impl RenderContext for FakeContext {
    fn surface(&self) -> &dyn RenderSurface {
        self.surface.as_ref()
    }

    async fn release(&mut self) -> Result<()> {
        if !self.done {
            self.done = true;
            self.released.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
