//! cookie 弹窗处理 - 业务能力层

use std::time::Duration;

use tracing::{info, warn};

use crate::infrastructure::RenderSurface;

/// 尝试关闭 cookie 同意弹窗
///
/// 弹窗不存在是正常情况，任何失败都只记录日志，返回是否点击成功。
pub async fn dismiss_cookie_consent(
    surface: &dyn RenderSurface,
    selector: &str,
    timeout: Duration,
) -> bool {
    match surface.wait_for(selector, timeout).await {
        Ok(true) => match surface.click(selector).await {
            Ok(true) => {
                info!("✓ 已关闭 cookie 弹窗");
                true
            }
            Ok(false) => {
                info!("cookie 弹窗已消失，继续...");
                false
            }
            Err(e) => {
                warn!("⚠️ 点击 cookie 弹窗失败: {}", e);
                false
            }
        },
        Ok(false) => {
            info!("未发现 cookie 弹窗，继续...");
            false
        }
        Err(e) => {
            warn!("⚠️ 检测 cookie 弹窗失败: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeSurface;

    const CONSENT: &str = "form:nth-child(2)";

    #[tokio::test]
    async fn test_clicks_consent_when_present() {
        let surface = FakeSurface::new().with_element(CONSENT);
        assert!(dismiss_cookie_consent(&surface, CONSENT, Duration::from_millis(50)).await);
        assert_eq!(surface.clicks(), vec![CONSENT.to_string()]);
    }

    #[tokio::test]
    async fn test_absent_consent_is_not_an_error() {
        let surface = FakeSurface::new();
        assert!(!dismiss_cookie_consent(&surface, CONSENT, Duration::from_millis(50)).await);
        assert!(surface.clicks().is_empty());
    }
}
