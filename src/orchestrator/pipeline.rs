//! 两阶段抓取管线 - 编排层
//!
//! 阶段一：结果列表 → 链接集合 → 中间链接文件
//! 阶段二：链接集合 → 商家详情 → JSON + CSV
//!
//! 管线本身不持有浏览器，渲染面和上下文提供者都由调用方传入。

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::infrastructure::{ContextProvider, NavigationOptions, RenderSurface};
use crate::models::{save_links, Link, ScrapeOutcome};
use crate::orchestrator::detail_scraper::{DetailScraper, DetailStats};
use crate::services::{dismiss_cookie_consent, FeedCollector, ResultWriter};
use crate::utils::logging::log_links_collected;

pub struct Pipeline {
    config: Config,
    collector: FeedCollector,
    scraper: DetailScraper,
    writer: ResultWriter,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        let collector = FeedCollector::new(
            config.feed_selector.as_str(),
            config.business_link_selector.as_str(),
            config.scroll.clone(),
        );
        let scraper = DetailScraper::new(&config);
        let writer = ResultWriter::new(&config.details_file, &config.details_csv);

        Self {
            config,
            collector,
            scraper,
            writer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 阶段一：打开结果页，滚动到收敛，保存链接
    pub async fn collect_links(&self, surface: &dyn RenderSurface, url: &str) -> Result<Vec<Link>> {
        info!("正在打开搜索结果页: {}", url);
        surface
            .navigate(url, self.navigation())
            .await
            .with_context(|| format!("打开搜索结果页失败: {}", url))?;

        dismiss_cookie_consent(
            surface,
            &self.config.cookie_selector,
            self.config.cookie_timeout(),
        )
        .await;

        let report = self.collector.collect(surface).await?;
        log_links_collected(report.links.len(), report.steps, &self.config.links_file);

        save_links(Path::new(&self.config.links_file), &report.links).await?;
        Ok(report.links)
    }

    /// 阶段二：逐个抓取商家详情并写出结果
    pub async fn scrape_details(
        &self,
        provider: &dyn ContextProvider,
        links: &[Link],
    ) -> Result<DetailStats> {
        if links.is_empty() {
            warn!("⚠️ 没有需要抓取的商家链接");
            return self.write_outcomes(&[]);
        }

        let outcomes = self.scraper.scrape_all(provider, links).await;
        self.write_outcomes(&outcomes)
    }

    /// 写出结果文件，返回统计
    pub fn write_outcomes(&self, outcomes: &[ScrapeOutcome]) -> Result<DetailStats> {
        self.writer.write_all(outcomes)?;
        Ok(DetailStats::summarize(outcomes))
    }

    fn navigation(&self) -> NavigationOptions {
        NavigationOptions {
            timeout: self.config.navigation_timeout(),
            quiescence: self.config.network_idle(),
        }
    }
}
