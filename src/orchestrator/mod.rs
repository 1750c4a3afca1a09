//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 前置检查（URL、链接文件）
//! - 管理浏览器生命周期（BrowserSession、ChromeContextProvider）
//! - 按阶段调度，输出全局统计
//!
//! ### `pipeline` - 两阶段管线
//! - 阶段一：导航、关闭 cookie 弹窗、滚动收集、保存链接
//! - 阶段二：批量抓取详情、写出 JSON / CSV
//!
//! ### `detail_scraper` - 详情批量抓取
//! - 顺序遍历链接，结果与输入一一对应
//!
//! ## 层次关系
//!
//! ```text
//! app (处理整个运行)
//!     ↓
//! pipeline (处理 Vec<Link>)
//!     ↓
//! detail_scraper → workflow::DetailFlow (处理单个 Link)
//!     ↓
//! services (能力层：feed_collector / field_extractor / result_writer)
//!     ↓
//! infrastructure (基础设施：RenderSurface / ContextProvider)
//! ```

pub mod app;
pub mod detail_scraper;
pub mod pipeline;

pub use app::{App, Phase, RunSummary};
pub use detail_scraper::{DetailScraper, DetailStats};
pub use pipeline::Pipeline;
