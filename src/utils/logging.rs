/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use std::time::Duration;

use tracing::info;

use crate::config::Config;

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 程序配置
/// - `phase`: 运行阶段
pub fn log_startup(config: &Config, phase: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 地图商家抓取 (阶段: {})", phase);
    if let Some(url) = &config.target_url {
        info!("🔗 搜索结果页: {}", url);
    }
    info!("🧭 详情页上下文策略: {:?}", config.context_strategy);
    info!(
        "📜 滚动策略: 步长 {}px, 等待 {}ms, 连续无增长上限 {}, 最多 {} 步",
        config.scroll.step_distance,
        config.scroll.settle_delay_ms,
        config.scroll.max_no_growth,
        config.scroll.max_steps
    );
    info!("{}", "=".repeat(60));
}

/// 记录阶段开始信息
pub fn log_phase_start(title: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📦 {}", title);
    info!("{}", "=".repeat(60));
}

/// 记录链接收集结果
///
/// # 参数
/// - `count`: 去重后的链接数
/// - `steps`: 滚动步数
/// - `links_file`: 链接文件路径
pub fn log_links_collected(count: usize, steps: usize, links_file: &str) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 共收集到 {} 个商家链接 (滚动 {} 步)", count, steps);
    info!("💾 链接将保存到: {}", links_file);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
///
/// # 参数
/// - `links`: 链接数
/// - `success`: 成功数量
/// - `failed`: 失败数量
/// - `total`: 详情总数
/// - `elapsed`: 总耗时
/// - `outputs`: 输出文件
pub fn print_final_stats(
    links: usize,
    success: usize,
    failed: usize,
    total: usize,
    elapsed: Duration,
    outputs: &[&str],
) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("🔗 商家链接: {}", links);
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("⏱️ 耗时: {:.1} 秒", elapsed.as_secs_f64());
    info!("{}", "=".repeat(60));
    for output in outputs {
        info!("结果已保存至: {}", output);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
