//! 商家详情批量抓取 - 编排层
//!
//! 严格顺序地遍历所有链接，每个链接交给 [`DetailFlow`] 处理。
//! 结果列表与输入链接一一对应，顺序不变。

use std::time::{Duration, Instant};

use tracing::info;

use crate::config::Config;
use crate::infrastructure::ContextProvider;
use crate::models::{Link, ScrapeOutcome};
use crate::workflow::{DetailFlow, LinkCtx};

/// 详情抓取统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetailStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl DetailStats {
    pub fn summarize(outcomes: &[ScrapeOutcome]) -> Self {
        let success = outcomes.iter().filter(|o| o.is_success()).count();
        Self {
            success,
            failed: outcomes.len() - success,
            total: outcomes.len(),
        }
    }
}

/// 商家详情批量抓取器
pub struct DetailScraper {
    flow: DetailFlow,
}

impl DetailScraper {
    pub fn new(config: &Config) -> Self {
        Self {
            flow: DetailFlow::new(config),
        }
    }

    pub fn with_flow(flow: DetailFlow) -> Self {
        Self { flow }
    }

    /// 抓取全部链接，每个链接恰好产生一条结果
    pub async fn scrape_all(
        &self,
        provider: &dyn ContextProvider,
        links: &[Link],
    ) -> Vec<ScrapeOutcome> {
        let total = links.len();
        let started = Instant::now();
        let mut outcomes = Vec::with_capacity(total);

        for (idx, link) in links.iter().enumerate() {
            let ctx = LinkCtx::new(link.as_str(), idx + 1, total);
            outcomes.push(self.flow.run(provider, &ctx).await);
        }

        let stats = DetailStats::summarize(&outcomes);
        info!(
            "📊 商家详情抓取结束: 成功 {}/{}, 失败 {}, 耗时 {}",
            stats.success,
            stats.total,
            stats.failed,
            format_elapsed(started.elapsed())
        );

        outcomes
    }
}

fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    if secs >= 60 {
        format!("{}分{}秒", secs / 60, secs % 60)
    } else {
        format!("{:.1}秒", elapsed.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::NavigationOptions;
    use crate::test_support::{FakeContextProvider, FakeSurface};

    fn scraper() -> DetailScraper {
        DetailScraper::with_flow(DetailFlow::with_navigation(NavigationOptions {
            timeout: Duration::from_secs(30),
            quiescence: Duration::ZERO,
        }))
    }

    fn links(n: usize) -> Vec<Link> {
        (0..n)
            .map(|i| format!("https://maps.example/place/{}", i))
            .collect()
    }

    #[tokio::test]
    async fn test_second_navigation_timeout_is_isolated() {
        let links = links(3);
        let provider = FakeContextProvider::new(
            FakeSurface::new()
                .with_text("h1.DUwDvf.lfPIob", "Corner Bakery")
                .fail_navigation(&links[1]),
        );

        let outcomes = scraper().scrape_all(&provider, &links).await;

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes[0].is_success());
        assert!(!outcomes[1].is_success());
        assert!(outcomes[2].is_success());
        let error = outcomes[1].error().unwrap();
        assert!(error.contains("导航超时"));
        assert!(error.contains(&links[1]));

        // 成功和失败路径都释放了上下文
        assert_eq!(provider.acquired(), 3);
        assert_eq!(provider.released(), 3);
    }

    #[tokio::test]
    async fn test_output_order_matches_input() {
        let links = links(5);
        let provider = FakeContextProvider::new(FakeSurface::new());

        let outcomes = scraper().scrape_all(&provider, &links).await;

        let seen: Vec<&str> = outcomes.iter().map(|o| o.link()).collect();
        assert_eq!(seen, links.iter().map(String::as_str).collect::<Vec<_>>());
        assert_eq!(provider.surface().navigations(), links);
    }

    #[tokio::test]
    async fn test_acquire_failure_does_not_stop_the_run() {
        let links = links(3);
        let provider = FakeContextProvider::new(FakeSurface::new()).fail_acquire_at(2);

        let outcomes = scraper().scrape_all(&provider, &links).await;

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[1].link(), links[1]);
        assert!(outcomes[1].error().is_some());
        assert!(outcomes[2].is_success());
        assert_eq!(provider.released(), 2);
        assert_eq!(
            DetailStats::summarize(&outcomes),
            DetailStats {
                success: 2,
                failed: 1,
                total: 3
            }
        );
    }

    #[tokio::test]
    async fn test_no_links_never_acquires() {
        let provider = FakeContextProvider::new(FakeSurface::new());

        let outcomes = scraper().scrape_all(&provider, &[]).await;

        assert!(outcomes.is_empty());
        assert_eq!(provider.acquired(), 0);
    }

    #[test]
    fn test_format_elapsed() {
        assert_eq!(format_elapsed(Duration::from_secs(125)), "2分5秒");
        assert_eq!(format_elapsed(Duration::from_millis(1500)), "1.5秒");
    }
}
