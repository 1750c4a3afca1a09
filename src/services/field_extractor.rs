//! 商家字段提取 - 业务能力层
//!
//! 只负责"从已渲染的详情页读取八个字段"，不关心导航和上下文。

use anyhow::Result;
use tracing::debug;

use crate::infrastructure::RenderSurface;
use crate::models::{BusinessFields, UNAVAILABLE};
use crate::services::text_normalizer;

/// 商家字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Rating,
    ReviewCount,
    BusinessType,
    Address,
    Phone,
    Hours,
    Website,
}

/// 字段值的读取方式
#[derive(Debug, Clone, Copy)]
pub enum FieldSource {
    /// 元素文本
    Text,
    /// 元素属性
    Attribute(&'static str),
}

/// 读取后的处理
#[derive(Debug, Clone, Copy)]
pub enum PostProcess {
    None,
    /// 去掉括号，如 `(1,204)` → `1,204`
    StripParens,
    /// 营业时间清洗
    NormalizeHours,
}

/// 单个字段的提取规则：按优先级尝试选择器，第一个命中的生效
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: Field,
    pub selectors: &'static [&'static str],
    pub source: FieldSource,
    pub post: PostProcess,
}

/// 详情页字段规则
pub static BUSINESS_RULES: [FieldRule; 8] = [
    FieldRule {
        field: Field::Name,
        selectors: &["h1.DUwDvf.lfPIob", "h1.DUwDvf"],
        source: FieldSource::Text,
        post: PostProcess::None,
    },
    FieldRule {
        field: Field::Rating,
        selectors: &[".F7nice span[aria-hidden='true']"],
        source: FieldSource::Text,
        post: PostProcess::None,
    },
    FieldRule {
        field: Field::ReviewCount,
        selectors: &[".F7nice span[aria-label*='reviews']"],
        source: FieldSource::Text,
        post: PostProcess::StripParens,
    },
    FieldRule {
        field: Field::BusinessType,
        selectors: &["button.DkEaL"],
        source: FieldSource::Text,
        post: PostProcess::None,
    },
    FieldRule {
        field: Field::Address,
        selectors: &["button.CsEnBe[data-item-id='address'] .Io6YTe.fontBodyMedium"],
        source: FieldSource::Text,
        post: PostProcess::None,
    },
    FieldRule {
        field: Field::Phone,
        selectors: &["button.CsEnBe[data-item-id^='phone:'] .Io6YTe.fontBodyMedium"],
        source: FieldSource::Text,
        post: PostProcess::None,
    },
    FieldRule {
        field: Field::Hours,
        selectors: &["div.t39EBf.GUrTXd[aria-label]", "div.t39EBf[aria-label]"],
        source: FieldSource::Text,
        post: PostProcess::NormalizeHours,
    },
    FieldRule {
        field: Field::Website,
        selectors: &["a.CsEnBe[data-item-id='authority']"],
        source: FieldSource::Attribute("href"),
        post: PostProcess::None,
    },
];

impl BusinessFields {
    fn set(&mut self, field: Field, value: String) {
        let slot = match field {
            Field::Name => &mut self.name,
            Field::Rating => &mut self.rating,
            Field::ReviewCount => &mut self.review_count,
            Field::BusinessType => &mut self.business_type,
            Field::Address => &mut self.address,
            Field::Phone => &mut self.phone,
            Field::Hours => &mut self.hours,
            Field::Website => &mut self.website,
        };
        *slot = value;
    }
}

/// 字段提取服务
///
/// 职责：
/// - 各字段独立提取，一个字段缺失不影响其他字段
/// - 元素缺失时填入占位值 `N/A`
/// - 只有页面本身出错（脚本失败、连接断开）才返回错误
pub struct FieldExtractor {
    rules: &'static [FieldRule],
}

impl FieldExtractor {
    pub fn new() -> Self {
        Self {
            rules: &BUSINESS_RULES,
        }
    }

    /// 提取全部字段
    pub async fn extract(&self, surface: &dyn RenderSurface) -> Result<BusinessFields> {
        let mut fields = BusinessFields::unavailable();

        for rule in self.rules {
            let value = match self.read_field(surface, rule).await? {
                Some(raw) => apply_post(rule.post, &raw),
                None => {
                    debug!("字段 {:?} 未找到，使用占位值", rule.field);
                    UNAVAILABLE.to_string()
                }
            };
            fields.set(rule.field, value);
        }

        Ok(fields)
    }

    /// 按优先级尝试选择器
    async fn read_field(&self, surface: &dyn RenderSurface, rule: &FieldRule) -> Result<Option<String>> {
        for selector in rule.selectors {
            let value = match rule.source {
                FieldSource::Text => surface.read_text(selector).await?,
                FieldSource::Attribute(name) => surface.read_attribute(selector, name).await?,
            };
            if value.is_some() {
                return Ok(value);
            }
        }
        Ok(None)
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_post(post: PostProcess, raw: &str) -> String {
    match post {
        PostProcess::None => raw.trim().to_string(),
        PostProcess::StripParens => raw.replace(['(', ')'], "").trim().to_string(),
        PostProcess::NormalizeHours => text_normalizer::normalize(raw),
    }
}
