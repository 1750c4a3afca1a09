use crate::error::ScraperError;
use crate::models::link::{Link, LinkSet};
use anyhow::{Context, Result};
use std::path::Path;
use tokio::fs;

/// 从 JSON 文件读取链接列表（两阶段之间的中间状态）
///
/// 文件中的重复链接会被去掉，保留首次出现的顺序。
pub async fn load_links(path: &Path) -> Result<Vec<Link>> {
    if !fs::try_exists(path).await.unwrap_or(false) {
        return Err(ScraperError::LinksFileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取链接文件: {}", path.display()))?;

    let links: Vec<Link> = serde_json::from_str(&content)
        .with_context(|| format!("无法解析链接文件: {}", path.display()))?;

    let total = links.len();
    let set: LinkSet = links.into_iter().collect();
    if set.len() < total {
        tracing::warn!(
            "链接文件中有 {} 个重复链接，已去重",
            total - set.len()
        );
    }
    tracing::info!("成功加载 {} 个商家链接", set.len());

    Ok(set.into_vec())
}

/// 将链接列表写入 JSON 文件
pub async fn save_links(path: &Path, links: &[Link]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("无法创建目录: {}", parent.display()))?;
    }

    let content = serde_json::to_string_pretty(links)?;
    fs::write(path, content)
        .await
        .with_context(|| format!("无法写入链接文件: {}", path.display()))?;

    tracing::info!("已保存 {} 个商家链接到 {}", links.len(), path.display());
    Ok(())
}
