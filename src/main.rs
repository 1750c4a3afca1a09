use anyhow::Result;
use clap::Parser;

use maps_business_scraper::cli::Cli;
use maps_business_scraper::config::Config;
use maps_business_scraper::{logger, App};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置：默认值 → 配置文件 → 环境变量 → 命令行
    let config = cli.apply(Config::load(cli.config.as_deref())?);

    // 初始化日志
    logger::init(config.verbose_logging);

    // 运行应用
    App::new(config).run(cli.phase).await?;

    Ok(())
}
