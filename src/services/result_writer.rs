//! 结果写入服务 - 业务能力层
//!
//! 只负责把结果列表写成 JSON 和 CSV，不关心抓取流程

use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{error, info};

use crate::error::{ScraperError, ScraperResult};
use crate::models::ScrapeOutcome;

/// CSV 列：商家字段 + link + error
pub const CSV_COLUMNS: [&str; 10] = [
    "link",
    "name",
    "rating",
    "reviewCount",
    "businessType",
    "address",
    "phone",
    "hours",
    "website",
    "error",
];

/// 结果写入服务
pub struct ResultWriter {
    json_path: PathBuf,
    csv_path: PathBuf,
}

impl ResultWriter {
    pub fn new(json_path: impl Into<PathBuf>, csv_path: impl Into<PathBuf>) -> Self {
        Self {
            json_path: json_path.into(),
            csv_path: csv_path.into(),
        }
    }

    pub fn json_path(&self) -> &Path {
        &self.json_path
    }

    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// 写出 JSON（失败即返回错误），再导出 CSV（失败只记录日志）
    ///
    /// 返回 CSV 是否导出成功
    pub fn write_all(&self, outcomes: &[ScrapeOutcome]) -> Result<bool> {
        self.write_json(outcomes)?;
        info!(
            "✓ 抓取完成，结果已保存到 '{}'",
            self.json_path.display()
        );

        match self.write_csv(outcomes) {
            Ok(()) => {
                info!("✓ CSV 文件已生成: {}", self.csv_path.display());
                Ok(true)
            }
            Err(e) => {
                error!("❌ 转换 CSV 失败: {:#}", e);
                Ok(false)
            }
        }
    }

    pub fn write_json(&self, outcomes: &[ScrapeOutcome]) -> ScraperResult<()> {
        ensure_parent(&self.json_path)?;
        let content = serde_json::to_string_pretty(outcomes)?;
        std::fs::write(&self.json_path, content)
            .map_err(|e| ScraperError::file(self.json_path.display().to_string(), e))
    }

    pub fn write_csv(&self, outcomes: &[ScrapeOutcome]) -> ScraperResult<()> {
        ensure_parent(&self.csv_path)?;
        let mut writer = csv::Writer::from_path(&self.csv_path)?;

        writer.write_record(CSV_COLUMNS)?;
        for outcome in outcomes {
            writer.write_record(csv_row(outcome))?;
        }
        writer
            .flush()
            .map_err(|e| ScraperError::file(self.csv_path.display().to_string(), e))
    }
}

/// 一条结果对应的一行，缺失的列留空
fn csv_row(outcome: &ScrapeOutcome) -> [&str; 10] {
    match outcome {
        ScrapeOutcome::Business(record) => {
            let f = &record.fields;
            [
                &record.link,
                &f.name,
                &f.rating,
                &f.review_count,
                &f.business_type,
                &f.address,
                &f.phone,
                &f.hours,
                &f.website,
                "",
            ]
        }
        ScrapeOutcome::Failure(record) => {
            [&record.link, "", "", "", "", "", "", "", "", &record.error]
        }
    }
}

fn ensure_parent(path: &Path) -> ScraperResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .map_err(|e| ScraperError::file(parent.display().to_string(), e))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BusinessFields, ScrapeOutcome};

    fn outcomes() -> Vec<ScrapeOutcome> {
        let mut fields = BusinessFields::unavailable();
        fields.name = "Harbour, Bar & Grill".to_string();
        vec![
            ScrapeOutcome::success("https://maps.example/place/0", fields),
            ScrapeOutcome::failure("https://maps.example/place/1", "导航超时"),
        ]
    }

    #[test]
    fn test_write_all_produces_json_and_csv() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::new(
            dir.path().join("public/details.json"),
            dir.path().join("public/details.csv"),
        );

        assert!(writer.write_all(&outcomes()).unwrap());

        let json = std::fs::read_to_string(writer.json_path()).unwrap();
        let back: Vec<ScrapeOutcome> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcomes());

        let mut reader = csv::Reader::from_path(writer.csv_path()).unwrap();
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, CSV_COLUMNS);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][1], "Harbour, Bar & Grill");
        assert_eq!(&rows[0][9], "");
        assert_eq!(&rows[1][0], "https://maps.example/place/1");
        assert_eq!(&rows[1][9], "导航超时");
    }

    #[test]
    fn test_empty_results_write_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::new(dir.path().join("d.json"), dir.path().join("d.csv"));

        writer.write_all(&[]).unwrap();

        let json = std::fs::read_to_string(writer.json_path()).unwrap();
        assert_eq!(json.trim(), "[]");
        let csv_text = std::fs::read_to_string(writer.csv_path()).unwrap();
        assert_eq!(csv_text.lines().count(), 1);
    }

    #[test]
    fn test_csv_failure_keeps_json() {
        let dir = tempfile::tempdir().unwrap();
        // CSV 路径是一个已存在的目录，无法创建文件
        let writer = ResultWriter::new(dir.path().join("d.json"), dir.path());

        assert!(!writer.write_all(&outcomes()).unwrap());
        assert!(writer.json_path().exists());
        assert!(matches!(
            writer.write_csv(&outcomes()),
            Err(ScraperError::Csv(_))
        ));
    }

    #[test]
    fn test_json_failure_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ResultWriter::new(dir.path(), dir.path().join("d.csv"));

        match writer.write_json(&outcomes()) {
            Err(ScraperError::File { path, .. }) => {
                assert_eq!(path, dir.path().display().to_string())
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(writer.write_all(&outcomes()).is_err());
    }
}
