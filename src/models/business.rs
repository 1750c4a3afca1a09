use serde::{Deserialize, Serialize};

use super::link::Link;

/// 字段缺失时的占位值
pub const UNAVAILABLE: &str = "N/A";

/// 从详情页提取出的八个字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessFields {
    pub name: String,
    pub rating: String,
    pub review_count: String,
    pub business_type: String,
    pub address: String,
    pub phone: String,
    pub hours: String,
    pub website: String,
}

impl BusinessFields {
    /// 全部为占位值的字段集
    pub fn unavailable() -> Self {
        Self {
            name: UNAVAILABLE.to_string(),
            rating: UNAVAILABLE.to_string(),
            review_count: UNAVAILABLE.to_string(),
            business_type: UNAVAILABLE.to_string(),
            address: UNAVAILABLE.to_string(),
            phone: UNAVAILABLE.to_string(),
            hours: UNAVAILABLE.to_string(),
            website: UNAVAILABLE.to_string(),
        }
    }

    /// 成功提取（非占位值）的字段数
    pub fn available_count(&self) -> usize {
        [
            &self.name,
            &self.rating,
            &self.review_count,
            &self.business_type,
            &self.address,
            &self.phone,
            &self.hours,
            &self.website,
        ]
        .iter()
        .filter(|v| v.as_str() != UNAVAILABLE)
        .count()
    }
}

/// 商家记录：一次详情页访问的成功结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub link: Link,
    #[serde(flatten)]
    pub fields: BusinessFields,
}

/// 失败记录：该链接的详情抓取彻底失败
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub link: Link,
    pub error: String,
}

/// 单个链接的抓取结果（成功或失败），共享 `link` 字段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScrapeOutcome {
    Business(BusinessRecord),
    Failure(FailureRecord),
}

impl ScrapeOutcome {
    pub fn success(link: impl Into<Link>, fields: BusinessFields) -> Self {
        ScrapeOutcome::Business(BusinessRecord {
            link: link.into(),
            fields,
        })
    }

    pub fn failure(link: impl Into<Link>, error: impl Into<String>) -> Self {
        ScrapeOutcome::Failure(FailureRecord {
            link: link.into(),
            error: error.into(),
        })
    }

    pub fn link(&self) -> &str {
        match self {
            ScrapeOutcome::Business(record) => &record.link,
            ScrapeOutcome::Failure(record) => &record.link,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ScrapeOutcome::Business(_))
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            ScrapeOutcome::Business(_) => None,
            ScrapeOutcome::Failure(record) => Some(&record.error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_fields() -> BusinessFields {
        BusinessFields {
            name: "Blue Door Cafe".to_string(),
            rating: "4.6".to_string(),
            review_count: "1,204".to_string(),
            business_type: "Cafe".to_string(),
            address: "12 Harbour St".to_string(),
            phone: "+61 2 5550 1234".to_string(),
            hours: "Monday: 9 am–5 pm".to_string(),
            website: UNAVAILABLE.to_string(),
        }
    }

    #[test]
    fn test_business_record_serializes_flat() {
        let outcome = ScrapeOutcome::success("https://maps.example/place/a", sample_fields());
        let value = serde_json::to_value(&outcome).unwrap();

        assert_eq!(value["link"], json!("https://maps.example/place/a"));
        assert_eq!(value["name"], json!("Blue Door Cafe"));
        assert_eq!(value["reviewCount"], json!("1,204"));
        assert_eq!(value["businessType"], json!("Cafe"));
        assert!(value.get("error").is_none());
    }

    #[test]
    fn test_failure_record_shape() {
        let outcome = ScrapeOutcome::failure("https://maps.example/place/b", "导航超时");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(
            value,
            json!({ "link": "https://maps.example/place/b", "error": "导航超时" })
        );
    }

    #[test]
    fn test_mixed_list_reads_back_in_order() {
        let raw = json!([
            { "link": "a", "name": "A", "rating": "4", "reviewCount": "3", "businessType": "Bar",
              "address": "N/A", "phone": "N/A", "hours": "N/A", "website": "N/A" },
            { "link": "b", "error": "boom" }
        ]);
        let outcomes: Vec<ScrapeOutcome> = serde_json::from_value(raw).unwrap();

        assert!(outcomes[0].is_success());
        assert_eq!(outcomes[1].error(), Some("boom"));
        assert_eq!(outcomes[1].link(), "b");
    }

    #[test]
    fn test_available_count_ignores_sentinel() {
        assert_eq!(sample_fields().available_count(), 7);
        assert_eq!(BusinessFields::unavailable().available_count(), 0);
    }
}
