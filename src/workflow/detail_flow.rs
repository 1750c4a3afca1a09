//! 商家详情处理流程 - 流程层
//!
//! 核心职责：定义"一个链接"的完整处理流程
//!
//! 流程顺序：
//! 1. 获取独立的渲染上下文
//! 2. 导航到详情页（等待网络空闲，有超时）
//! 3. 提取字段
//! 4. 释放上下文（成功、失败都要释放）
//!
//! 任何一步失败都只折叠成该链接的失败记录，不会中断其他链接。

use anyhow::Result;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{ContextProvider, NavigationOptions, RenderSurface};
use crate::models::{BusinessFields, ScrapeOutcome};
use crate::services::FieldExtractor;
use crate::utils::logging::truncate_text;
use crate::workflow::link_ctx::LinkCtx;

/// 商家详情处理流程
///
/// - 不持有任何浏览器资源，上下文由 provider 按需提供
/// - 每个链接只尝试一次，不重试
pub struct DetailFlow {
    extractor: FieldExtractor,
    navigation: NavigationOptions,
}

impl DetailFlow {
    pub fn new(config: &Config) -> Self {
        Self::with_navigation(NavigationOptions {
            timeout: config.navigation_timeout(),
            quiescence: config.network_idle(),
        })
    }

    pub fn with_navigation(navigation: NavigationOptions) -> Self {
        Self {
            extractor: FieldExtractor::new(),
            navigation,
        }
    }

    /// 处理单个链接，总是返回一条结果
    pub async fn run(&self, provider: &dyn ContextProvider, ctx: &LinkCtx) -> ScrapeOutcome {
        info!("{} 正在抓取: {}", ctx, ctx.link);

        let mut context = match provider.acquire().await {
            Ok(context) => context,
            Err(e) => {
                error!("{} ❌ 获取渲染上下文失败 {}: {:#}", ctx, ctx.link, e);
                return ScrapeOutcome::failure(&ctx.link, format!("{:#}", e));
            }
        };

        let result = self.visit(context.surface(), &ctx.link).await;

        if let Err(e) = context.release().await {
            warn!("{} ⚠️ 释放渲染上下文失败: {:#}", ctx, e);
        }

        match result {
            Ok(fields) => {
                info!(
                    "{} ✓ {} (提取到 {}/8 个字段)",
                    ctx,
                    truncate_text(&fields.name, 40),
                    fields.available_count()
                );
                ScrapeOutcome::success(&ctx.link, fields)
            }
            Err(e) => {
                error!("{} ❌ 抓取失败 {}: {:#}", ctx, ctx.link, e);
                ScrapeOutcome::failure(&ctx.link, format!("{:#}", e))
            }
        }
    }

    async fn visit(&self, surface: &dyn RenderSurface, link: &str) -> Result<BusinessFields> {
        surface.navigate(link, self.navigation).await?;
        self.extractor.extract(surface).await
    }
}
