//! # Maps Business Scraper
//!
//! 从地图类本地商家目录的搜索结果页抓取结构化商家信息
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，实现 `RenderSurface`
//! - `ChromeContextProvider` - 按策略提供每个商家独立的渲染上下文
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `FeedCollector` - 滚动结果列表直到收敛，收集去重链接
//! - `FieldExtractor` - 按选择器规则提取八个字段
//! - `text_normalizer` - 营业时间文本清洗
//! - `ResultWriter` - 写 JSON / CSV
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个链接"的完整处理流程
//! - `LinkCtx` - 上下文封装（link + 序号）
//! - `DetailFlow` - 流程编排（acquire → navigate → extract → release）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/app` - 阶段调度和浏览器生命周期
//! - `orchestrator/pipeline` - 两阶段管线
//! - `orchestrator/detail_scraper` - 顺序批量抓取
//!
//! ## 模块结构

pub mod browser;
pub mod cli;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod services;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use browser::BrowserSession;
pub use config::{Config, ContextStrategy, ScrollPolicy};
pub use error::{ScraperError, ScraperResult};
pub use infrastructure::{ContextProvider, JsExecutor, RenderSurface};
pub use models::{BusinessFields, Link, ScrapeOutcome};
pub use orchestrator::{App, DetailScraper, Phase, Pipeline, RunSummary};
pub use services::{FeedCollector, FieldExtractor};
pub use workflow::{DetailFlow, LinkCtx};
