//! 命令行参数
//!
//! 命令行参数优先级最高，覆盖配置文件和环境变量。

use std::path::PathBuf;

use clap::Parser;

use crate::config::{Config, ContextStrategy};
use crate::orchestrator::Phase;

#[derive(Parser, Debug)]
#[command(
    name = "maps-business-scraper",
    author,
    version,
    about = "从地图搜索结果页收集商家链接并抓取商家详情",
    long_about = None
)]
pub struct Cli {
    /// 搜索结果页 URL
    pub url: Option<String>,

    /// 运行阶段
    #[arg(long, value_enum, default_value_t = Phase::All)]
    pub phase: Phase,

    /// TOML 配置文件
    #[arg(short, long, env = "SCRAPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// 中间链接文件
    #[arg(long)]
    pub links_file: Option<String>,

    /// 商家详情 JSON 输出
    #[arg(long)]
    pub output_json: Option<String>,

    /// 商家详情 CSV 输出
    #[arg(long)]
    pub output_csv: Option<String>,

    /// 详情页上下文策略
    #[arg(long, value_enum)]
    pub strategy: Option<ContextStrategy>,

    /// 显示浏览器窗口
    #[arg(long)]
    pub headful: bool,

    /// 连接已运行浏览器的调试端口
    #[arg(long)]
    pub debug_port: Option<u16>,

    /// 显示详细日志
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// 把命令行参数覆盖到配置上
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.url {
            config.target_url = Some(url.clone());
        }
        if let Some(path) = &self.links_file {
            config.links_file = path.clone();
        }
        if let Some(path) = &self.output_json {
            config.details_file = path.clone();
        }
        if let Some(path) = &self.output_csv {
            config.details_csv = path.clone();
        }
        if let Some(strategy) = self.strategy {
            config.context_strategy = strategy;
        }
        if self.headful {
            config.browser.headless = false;
        }
        if let Some(port) = self.debug_port {
            config.browser.debug_port = Some(port);
        }
        if self.verbose {
            config.verbose_logging = true;
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["maps-business-scraper"]).unwrap();
        assert_eq!(cli.phase, Phase::All);
        assert!(cli.url.is_none());

        let config = cli.apply(Config::default());
        assert!(config.target_url.is_none());
        assert!(config.browser.headless);
    }

    #[test]
    fn test_flags_override_config() {
        let cli = Cli::try_parse_from([
            "maps-business-scraper",
            "https://maps.example/search/bakery",
            "--phase",
            "details",
            "--links-file",
            "links.json",
            "--output-json",
            "out/details.json",
            "--strategy",
            "isolated-tab",
            "--headful",
            "--debug-port",
            "9222",
        ])
        .unwrap();
        assert_eq!(cli.phase, Phase::Details);

        let config = cli.apply(Config::default());
        assert_eq!(
            config.target_url.as_deref(),
            Some("https://maps.example/search/bakery")
        );
        assert_eq!(config.links_file, "links.json");
        assert_eq!(config.details_file, "out/details.json");
        assert_eq!(config.details_csv, "public/updated_business_details.csv");
        assert_eq!(config.context_strategy, ContextStrategy::IsolatedTab);
        assert!(!config.browser.headless);
        assert_eq!(config.browser.debug_port, Some(9222));
    }

    #[test]
    fn test_unknown_phase_is_rejected() {
        assert!(Cli::try_parse_from(["maps-business-scraper", "--phase", "everything"]).is_err());
    }
}
