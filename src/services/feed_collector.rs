//! 结果列表链接收集 - 业务能力层
//!
//! 结果列表是无限滚动的虚拟列表，没有"总数"可查，
//! 只能不断滚动，直到连续多次滚动后内容高度都不再增长（收敛）。
//! 收敛判断是启发式的：等待时间太短或次数上限太低都会悄悄截断结果。

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::ScrollPolicy;
use crate::error::ScraperError;
use crate::infrastructure::RenderSurface;
use crate::models::{Link, LinkSet};

/// 收集结果
#[derive(Debug, Clone)]
pub struct CollectReport {
    /// 去重后的链接（按发现顺序）
    pub links: Vec<Link>,
    /// 实际滚动步数
    pub steps: usize,
    /// 是否因收敛而结束（否则是达到步数上限）
    pub converged: bool,
}

/// 滚动状态，每步更新一次，收集结束即丢弃
#[derive(Debug)]
struct ScrollState {
    previous_height: f64,
    no_growth_attempts: u32,
}

impl ScrollState {
    fn new(initial_height: f64) -> Self {
        Self {
            previous_height: initial_height,
            no_growth_attempts: 0,
        }
    }

    /// 记录一步滚动后的高度，返回是否增长
    fn observe(&mut self, height: f64) -> bool {
        let grew = height > self.previous_height;
        if grew {
            self.no_growth_attempts = 0;
        } else {
            self.no_growth_attempts += 1;
        }
        self.previous_height = height;
        grew
    }

    fn converged(&self, bound: u32) -> bool {
        self.no_growth_attempts > bound
    }
}

/// 链接收集服务
///
/// 职责：
/// - 驱动单个滚动容器直到收敛或步数耗尽
/// - 每步扫描链接并按完整字符串去重
/// - 容器不存在时直接失败，不做重试
pub struct FeedCollector {
    container_selector: String,
    link_selector: String,
    policy: ScrollPolicy,
}

impl FeedCollector {
    pub fn new(
        container_selector: impl Into<String>,
        link_selector: impl Into<String>,
        policy: ScrollPolicy,
    ) -> Self {
        Self {
            container_selector: container_selector.into(),
            link_selector: link_selector.into(),
            policy,
        }
    }

    /// 收集所有商家链接
    pub async fn collect(&self, surface: &dyn RenderSurface) -> Result<CollectReport> {
        if !surface.exists(&self.container_selector).await? {
            return Err(ScraperError::FeedNotFound {
                selector: self.container_selector.clone(),
            }
            .into());
        }

        let mut links = LinkSet::new();
        self.scan(surface, &mut links).await?;

        let mut state = ScrollState::new(self.extent(surface, 0).await?);
        let mut steps = 0;
        let mut converged = false;

        info!(
            "📜 开始滚动结果列表 (步长 {}px, 等待 {}ms, 连续无增长上限 {})",
            self.policy.step_distance, self.policy.settle_delay_ms, self.policy.max_no_growth
        );

        while steps < self.policy.max_steps {
            steps += 1;

            if !surface
                .scroll_by(&self.container_selector, self.policy.step_distance)
                .await?
            {
                return Err(self.vanished(steps));
            }
            sleep(self.policy.settle_delay()).await;

            let height = self.extent(surface, steps).await?;
            let grew = state.observe(height);
            let added = self.scan(surface, &mut links).await?;

            debug!(
                "第 {} 步: 高度 {} ({}), 新增链接 {}, 累计 {}, 连续无增长 {}",
                steps,
                height,
                if grew { "增长" } else { "未增长" },
                added,
                links.len(),
                state.no_growth_attempts
            );

            if state.converged(self.policy.max_no_growth) {
                converged = true;
                break;
            }
        }

        if converged {
            info!("✓ 结果列表已收敛 (共滚动 {} 步)", steps);
        } else {
            warn!(
                "⚠️ 达到滚动步数上限 {}，结果列表可能仍有未加载的内容",
                self.policy.max_steps
            );
        }

        // 收敛后再扫一遍，虚拟列表可能在最后一次等待后才渲染出元素
        self.scan(surface, &mut links).await?;

        Ok(CollectReport {
            links: links.into_vec(),
            steps,
            converged,
        })
    }

    async fn scan(&self, surface: &dyn RenderSurface, links: &mut LinkSet) -> Result<usize> {
        let found = surface.read_links(&self.link_selector).await?;
        Ok(links.extend(found))
    }

    async fn extent(&self, surface: &dyn RenderSurface, step: usize) -> Result<f64> {
        surface
            .content_extent(&self.container_selector)
            .await?
            .ok_or_else(|| self.vanished(step))
    }

    fn vanished(&self, step: usize) -> anyhow::Error {
        ScraperError::FeedVanished {
            selector: self.container_selector.clone(),
            step,
        }
        .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSurface;

    const FEED: &str = r#"div[role="feed"]"#;
    const LINK: &str = ".hfpxzc";

    fn policy(max_no_growth: u32, max_steps: usize) -> ScrollPolicy {
        ScrollPolicy {
            step_distance: 1000,
            settle_delay_ms: 0,
            max_no_growth,
            max_steps,
        }
    }

    #[test]
    fn test_scroll_state_resets_on_growth() {
        let mut state = ScrollState::new(100.0);
        assert!(!state.observe(100.0));
        assert!(!state.observe(90.0));
        assert_eq!(state.no_growth_attempts, 2);
        assert!(state.observe(200.0));
        assert_eq!(state.no_growth_attempts, 0);
        assert!(!state.converged(0));
    }

    #[tokio::test]
    async fn test_terminates_after_bound_exceeded() {
        for (growth_steps, bound) in [(0, 5), (3, 5), (7, 2), (1, 0)] {
            let surface = FakeSurface::new().with_feed(FEED, LINK, growth_steps, 2);
            let collector = FeedCollector::new(FEED, LINK, policy(bound, 1000));

            let report = collector.collect(&surface).await.unwrap();

            // converged 要求 no_growth_attempts 严格大于 bound，所以是 k + bound + 1
            assert!(report.converged);
            assert_eq!(report.steps, growth_steps + bound as usize + 1);
            assert_eq!(surface.scroll_count(), report.steps);
        }
    }

    #[tokio::test]
    async fn test_repeated_scans_do_not_duplicate_links() {
        let surface = FakeSurface::new().with_feed(FEED, LINK, 4, 3);
        let collector = FeedCollector::new(FEED, LINK, policy(5, 1000));

        let report = collector.collect(&surface).await.unwrap();

        // 初始 3 个 + 每次增长 3 个
        assert_eq!(report.links.len(), 15);
        let distinct: std::collections::HashSet<_> = report.links.iter().collect();
        assert_eq!(distinct.len(), report.links.len());
        assert_eq!(report.links[0], "https://maps.example/place/0");
    }

    #[tokio::test]
    async fn test_step_budget_caps_endless_feed() {
        let surface = FakeSurface::new().with_feed(FEED, LINK, usize::MAX, 1);
        let collector = FeedCollector::new(FEED, LINK, policy(5, 12));

        let report = collector.collect(&surface).await.unwrap();

        assert!(!report.converged);
        assert_eq!(report.steps, 12);
    }

    #[tokio::test]
    async fn test_empty_feed_yields_no_links() {
        let surface = FakeSurface::new().with_feed(FEED, LINK, 0, 0);
        let collector = FeedCollector::new(FEED, LINK, policy(1, 100));

        let report = collector.collect(&surface).await.unwrap();

        assert!(report.converged);
        assert!(report.links.is_empty());
    }

    #[tokio::test]
    async fn test_missing_container_is_fatal() {
        let surface = FakeSurface::new();
        let collector = FeedCollector::new(FEED, LINK, policy(5, 100));

        let err = collector.collect(&surface).await.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScraperError>(),
            Some(ScraperError::FeedNotFound { .. })
        ));
        assert_eq!(surface.scroll_count(), 0);
    }
}
