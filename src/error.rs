use thiserror::Error;

/// 抓取程序错误类型
#[derive(Debug, Error)]
pub enum ScraperError {
    /// 未提供列表页 URL
    #[error("未提供搜索结果页 URL")]
    MissingUrl,

    /// 商家链接文件不存在（单独运行详情阶段时）
    #[error("链接文件不存在: {path}，终止商家详情抓取")]
    LinksFileNotFound { path: String },

    /// 结果列表容器不存在
    #[error("未找到结果列表容器: {selector}")]
    FeedNotFound { selector: String },

    /// 结果列表容器在滚动过程中消失
    #[error("结果列表容器在第 {step} 步滚动后消失: {selector}")]
    FeedVanished { selector: String, step: usize },

    /// 导航超时
    #[error("导航超时 ({timeout_secs} 秒): {url}")]
    NavigationTimeout { url: String, timeout_secs: u64 },

    /// 浏览器配置失败
    #[error("浏览器配置失败: {0}")]
    BrowserConfig(String),

    /// 启动或连接浏览器失败
    #[error("启动浏览器失败: {source}")]
    BrowserLaunch {
        #[source]
        source: chromiumoxide::error::CdpError,
    },

    /// CDP 协议错误
    #[error("浏览器协议错误: {0}")]
    Cdp(#[from] chromiumoxide::error::CdpError),

    /// 页面脚本返回了无法解析的结果
    #[error("执行脚本失败: {0}")]
    Script(String),

    /// 文件读写失败
    #[error("文件操作失败 ({path}): {source}")]
    File {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// JSON 序列化/反序列化失败
    #[error("JSON解析失败: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV 导出失败
    #[error("CSV导出失败: {0}")]
    Csv(#[from] csv::Error),

    /// 配置文件解析失败
    #[error("配置文件解析失败 ({path}): {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl ScraperError {
    /// 创建文件操作错误
    pub fn file(path: impl Into<String>, source: std::io::Error) -> Self {
        ScraperError::File {
            path: path.into(),
            source,
        }
    }

    /// 是否属于前置条件错误（直接终止整个运行）
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            ScraperError::MissingUrl
                | ScraperError::LinksFileNotFound { .. }
                | ScraperError::FeedNotFound { .. }
        )
    }
}

/// 抓取程序结果类型
pub type ScraperResult<T> = Result<T, ScraperError>;
