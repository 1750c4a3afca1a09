//! 程序配置
//!
//! 优先级：默认值 → TOML 配置文件 → 环境变量 → 命令行参数

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

use crate::error::ScraperError;

/// 详情页渲染上下文的隔离策略
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ContextStrategy {
    /// 每个商家启动全新的浏览器实例（最稳，最慢）
    #[default]
    IsolatedBrowser,
    /// 共享一个浏览器，每个商家新开标签页
    IsolatedTab,
    /// 共享一个浏览器和同一个标签页（最快，状态会在商家之间残留）
    SharedTab,
}

impl FromStr for ContextStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "isolated-browser" => Ok(ContextStrategy::IsolatedBrowser),
            "isolated-tab" => Ok(ContextStrategy::IsolatedTab),
            "shared-tab" => Ok(ContextStrategy::SharedTab),
            other => Err(format!("未知的上下文策略: {}", other)),
        }
    }
}

/// 滚动收敛策略
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct ScrollPolicy {
    /// 每一步滚动的距离（像素）
    pub step_distance: i64,
    /// 每一步滚动后等待内容加载的时间（毫秒）
    pub settle_delay_ms: u64,
    /// 连续无增长次数超过该值即判定收敛
    pub max_no_growth: u32,
    /// 滚动步数硬上限
    pub max_steps: usize,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        Self {
            step_distance: 1000,
            settle_delay_ms: 3000,
            max_no_growth: 5,
            max_steps: 1000,
        }
    }
}

impl ScrollPolicy {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// 浏览器启动配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct BrowserOptions {
    /// 是否无头模式
    pub headless: bool,
    /// Chrome/Chromium 可执行文件路径，不设置时自动探测
    pub chrome_executable: Option<String>,
    /// 启动参数
    pub args: Vec<String>,
    /// 连接已运行浏览器的调试端口，设置后不再启动新浏览器
    pub debug_port: Option<u16>,
    /// 单个 CDP 请求的超时（秒），不设置时由 [`Config::browser_options`] 按导航超时推出
    pub request_timeout_secs: Option<u64>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            headless: true,
            chrome_executable: None,
            args: vec![
                "--no-sandbox".to_string(),
                "--disable-setuid-sandbox".to_string(),
                "--disable-gpu".to_string(),
            ],
            debug_port: None,
            request_timeout_secs: None,
        }
    }
}

impl BrowserOptions {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// CDP 请求超时比导航超时多出的余量，保证先触发导航超时
const REQUEST_TIMEOUT_MARGIN_SECS: u64 = 5;

/// 程序配置
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 搜索结果页 URL
    pub target_url: Option<String>,
    /// 中间链接文件
    pub links_file: String,
    /// 商家详情 JSON 输出
    pub details_file: String,
    /// 商家详情 CSV 输出
    pub details_csv: String,
    pub browser: BrowserOptions,
    /// 导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 网络空闲后额外等待的时间（毫秒）
    pub network_idle_ms: u64,
    /// cookie 弹窗选择器
    pub cookie_selector: String,
    /// cookie 弹窗等待时间（毫秒）
    pub cookie_timeout_ms: u64,
    /// 结果列表容器选择器
    pub feed_selector: String,
    /// 商家链接选择器
    pub business_link_selector: String,
    pub scroll: ScrollPolicy,
    pub context_strategy: ContextStrategy,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: None,
            links_file: "business_links.json".to_string(),
            details_file: "public/updated_business_details.json".to_string(),
            details_csv: "public/updated_business_details.csv".to_string(),
            browser: BrowserOptions::default(),
            navigation_timeout_secs: 60,
            network_idle_ms: 500,
            cookie_selector: "form:nth-child(2)".to_string(),
            cookie_timeout_ms: 5000,
            feed_selector: r#"div[role="feed"]"#.to_string(),
            business_link_selector: ".hfpxzc".to_string(),
            scroll: ScrollPolicy::default(),
            context_strategy: ContextStrategy::default(),
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → 配置文件（可选）→ 环境变量
    pub fn load(path: Option<&Path>) -> Result<Self, ScraperError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(config.apply_env())
    }

    /// 从 TOML 文件读取配置，缺省字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ScraperError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ScraperError::file(path.display().to_string(), e))?;
        Self::from_toml_str(&content).map_err(|source| ScraperError::ConfigParse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置
    pub fn apply_env(self) -> Self {
        Self::apply_vars(self, |name| std::env::var(name).ok())
    }

    fn apply_vars(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        fn parsed<T: FromStr>(var: &impl Fn(&str) -> Option<String>, name: &str) -> Option<T> {
            var(name).and_then(|v| v.trim().parse().ok())
        }

        if let Some(url) = var("TARGET_URL").filter(|v| !v.trim().is_empty()) {
            self.target_url = Some(url);
        }
        self.links_file = var("LINKS_FILE").unwrap_or(self.links_file);
        self.details_file = var("DETAILS_FILE").unwrap_or(self.details_file);
        self.details_csv = var("DETAILS_CSV").unwrap_or(self.details_csv);
        if let Some(exe) = var("CHROME_EXECUTABLE") {
            self.browser.chrome_executable = Some(exe);
        }
        if let Some(port) = parsed(&var, "BROWSER_DEBUG_PORT") {
            self.browser.debug_port = Some(port);
        }
        self.browser.headless = parsed(&var, "HEADLESS").unwrap_or(self.browser.headless);
        self.context_strategy = parsed(&var, "CONTEXT_STRATEGY").unwrap_or(self.context_strategy);
        self.navigation_timeout_secs =
            parsed(&var, "NAVIGATION_TIMEOUT_SECS").unwrap_or(self.navigation_timeout_secs);
        self.verbose_logging = parsed(&var, "VERBOSE_LOGGING").unwrap_or(self.verbose_logging);
        self
    }

    /// 启动或连接浏览器用的参数，补全 CDP 请求超时
    pub fn browser_options(&self) -> BrowserOptions {
        let mut options = self.browser.clone();
        options
            .request_timeout_secs
            .get_or_insert(self.navigation_timeout_secs + REQUEST_TIMEOUT_MARGIN_SECS);
        options
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout_secs)
    }

    pub fn network_idle(&self) -> Duration {
        Duration::from_millis(self.network_idle_ms)
    }

    pub fn cookie_timeout(&self) -> Duration {
        Duration::from_millis(self.cookie_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_match_scroll_policy() {
        let config = Config::default();
        assert_eq!(config.scroll.max_no_growth, 5);
        assert_eq!(config.scroll.step_distance, 1000);
        assert_eq!(config.scroll.settle_delay(), Duration::from_secs(3));
        assert_eq!(config.navigation_timeout(), Duration::from_secs(60));
        assert_eq!(config.context_strategy, ContextStrategy::IsolatedBrowser);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml_str(
            r#"
            links_file = "links.json"
            context_strategy = "shared-tab"

            [scroll]
            max_no_growth = 2
            "#,
        )
        .unwrap();

        assert_eq!(config.links_file, "links.json");
        assert_eq!(config.context_strategy, ContextStrategy::SharedTab);
        assert_eq!(config.scroll.max_no_growth, 2);
        assert_eq!(config.scroll.step_distance, 1000);
        assert_eq!(config.feed_selector, r#"div[role="feed"]"#);
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("TARGET_URL", "https://maps.example/search/cafe"),
            ("CONTEXT_STRATEGY", "isolated-tab"),
            ("NAVIGATION_TIMEOUT_SECS", "15"),
            ("BROWSER_DEBUG_PORT", "not-a-port"),
        ]
        .into_iter()
        .collect();

        let config = Config::default().apply_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(
            config.target_url.as_deref(),
            Some("https://maps.example/search/cafe")
        );
        assert_eq!(config.context_strategy, ContextStrategy::IsolatedTab);
        assert_eq!(config.navigation_timeout_secs, 15);
        assert_eq!(config.browser.debug_port, None);
    }

    #[test]
    fn test_request_timeout_outlasts_navigation_timeout() {
        let mut config = Config::default();
        config.navigation_timeout_secs = 90;

        let options = config.browser_options();
        assert_eq!(options.request_timeout(), Some(Duration::from_secs(95)));
        assert!(options.request_timeout().unwrap() > config.navigation_timeout());

        config.browser.request_timeout_secs = Some(120);
        assert_eq!(
            config.browser_options().request_timeout(),
            Some(Duration::from_secs(120))
        );
    }

    #[test]
    fn test_strategy_parse_rejects_unknown() {
        assert!("fresh".parse::<ContextStrategy>().is_err());
        assert_eq!(
            " Shared-Tab ".parse::<ContextStrategy>().unwrap(),
            ContextStrategy::SharedTab
        );
    }
}
