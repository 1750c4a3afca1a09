//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **前置检查**：启动任何浏览器之前校验 URL / 链接文件
//! 2. **阶段调度**：按 [`Phase`] 依次执行链接收集和详情抓取
//! 3. **资源管理**：唯一持有浏览器的模块，每条路径上都会关闭浏览器
//! 4. **全局统计**：输出最终统计信息

use std::path::Path;
use std::time::Instant;

use anyhow::Result;
use tracing::{info, warn};

use crate::browser::BrowserSession;
use crate::config::Config;
use crate::error::ScraperError;
use crate::infrastructure::{ChromeContextProvider, JsExecutor};
use crate::models::{load_links, Link};
use crate::orchestrator::detail_scraper::DetailStats;
use crate::orchestrator::pipeline::Pipeline;
use crate::utils::logging::{log_phase_start, log_startup, print_final_stats};

/// 运行阶段
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Phase {
    /// 收集链接后抓取详情
    #[default]
    All,
    /// 只收集链接
    Collect,
    /// 只根据链接文件抓取详情
    Details,
}

impl Phase {
    fn collects(self) -> bool {
        matches!(self, Phase::All | Phase::Collect)
    }

    fn scrapes(self) -> bool {
        matches!(self, Phase::All | Phase::Details)
    }
}

/// 一次运行的汇总
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// 本次处理的链接数
    pub links: usize,
    /// 详情阶段统计（只收集链接时为 `None`）
    pub details: Option<DetailStats>,
}

/// 应用主结构
pub struct App {
    pipeline: Pipeline,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self {
            pipeline: Pipeline::new(config),
        }
    }

    /// 运行应用主逻辑
    pub async fn run(&self, phase: Phase) -> Result<RunSummary> {
        let config = self.pipeline.config();
        let started = Instant::now();
        log_startup(config, &format!("{:?}", phase));

        let links = if phase.collects() {
            let url = config
                .target_url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or(ScraperError::MissingUrl)?;
            self.collect_phase(url).await?
        } else {
            load_links(Path::new(&config.links_file)).await?
        };

        let details = if phase.scrapes() {
            Some(self.details_phase(&links).await?)
        } else {
            None
        };

        let (success, failed, total) = details
            .as_ref()
            .map(|s| (s.success, s.failed, s.total))
            .unwrap_or((0, 0, 0));
        let outputs: Vec<&str> = if details.is_some() {
            vec![config.details_file.as_str(), config.details_csv.as_str()]
        } else {
            vec![config.links_file.as_str()]
        };
        print_final_stats(links.len(), success, failed, total, started.elapsed(), &outputs);

        Ok(RunSummary {
            links: links.len(),
            details,
        })
    }

    /// 阶段一：启动浏览器收集链接，结束后关闭浏览器
    async fn collect_phase(&self, url: &str) -> Result<Vec<Link>> {
        log_phase_start("阶段一：收集商家链接");

        let config = self.pipeline.config();
        let session = BrowserSession::open(&config.browser_options()).await?;

        let result = match session.new_page().await {
            Ok(page) => {
                let executor = JsExecutor::new(page);
                let links = self.pipeline.collect_links(&executor, url).await;
                if let Err(e) = executor.page().clone().close().await {
                    warn!("关闭列表页失败: {}", e);
                }
                links
            }
            Err(e) => Err(e),
        };

        if let Err(e) = session.close().await {
            warn!("⚠️ 关闭浏览器失败: {:#}", e);
        }
        result
    }

    /// 阶段二：按策略抓取商家详情
    async fn details_phase(&self, links: &[Link]) -> Result<DetailStats> {
        log_phase_start("阶段二：抓取商家详情");

        if links.is_empty() {
            info!("链接集合为空，跳过浏览器启动");
            return self.pipeline.write_outcomes(&[]);
        }

        let config = self.pipeline.config();
        let provider =
            ChromeContextProvider::open(config.context_strategy, config.browser_options()).await?;

        let result = self.pipeline.scrape_details(&provider, links).await;

        if let Err(e) = provider.shutdown().await {
            warn!("⚠️ 关闭共享浏览器失败: {:#}", e);
        }
        result
    }
}
