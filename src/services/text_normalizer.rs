//! 营业时间文本清洗 - 业务能力层
//!
//! 详情页的营业时间是一整段没有分隔的文本（如
//! `Monday9 am–5 pmTuesdayClosedSuggest new hours`），
//! 这里按固定顺序做启发式切分，输出 `|` 分隔、`:` 连接的字符串。
//!
//! 只针对观察到的渲染格式，其他格式可能切分不准，属于已知限制。

use std::sync::LazyLock;

use regex::Regex;

/// 规范分隔符
pub const SEPARATOR: &str = " | ";

/// 文本末尾的"建议修改营业时间"提示
static SUGGESTION_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Suggest new hours\s*$").expect("valid suffix regex"));

/// 编码错误引入的乱码/私有区图标字符
const ENCODING_ARTIFACTS: &[&str] = &["ÓÖç", "\u{e14d}", "\u{200e}", "\u{200f}"];

static LETTER_DIGIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-zA-Z])([0-9])").expect("valid letter-digit regex"));
static LOWER_UPPER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z])([A-Z])").expect("valid case-boundary regex"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));
static CLOSED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*Closed\s*").expect("valid closed regex"));
static SEPARATOR_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\|(?:\s*\|)*\s*").expect("valid separator regex"));
static COLON_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*\|\s*").expect("valid colon regex"));
static EDGE_SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:\s*\|)+\s*|\s*(?:\|\s*)+$").expect("valid edge regex"));

/// 清洗营业时间文本
///
/// 纯函数，不会失败；无法识别的输入只做尽力清理后原样返回。
pub fn normalize(raw: &str) -> String {
    let text = strip_suggestion_suffix(raw);
    let text = strip_encoding_artifacts(&text);
    let text = split_letter_digit(&text);
    let text = split_case_boundary(&text);
    let text = collapse_whitespace(&text);
    let text = isolate_closed(&text);
    collapse_separators(&text)
}

fn strip_suggestion_suffix(text: &str) -> String {
    SUGGESTION_SUFFIX_RE.replace(text, "").into_owned()
}

fn strip_encoding_artifacts(text: &str) -> String {
    ENCODING_ARTIFACTS
        .iter()
        .fold(text.to_string(), |acc, artifact| acc.replace(artifact, ""))
}

/// `Monday9` → `Monday: 9`
fn split_letter_digit(text: &str) -> String {
    LETTER_DIGIT_RE.replace_all(text, "$1: $2").into_owned()
}

/// `pmTuesday` → `pm | Tuesday`
fn split_case_boundary(text: &str) -> String {
    LOWER_UPPER_RE.replace_all(text, "$1 | $2").into_owned()
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RE.replace_all(text, " ").into_owned()
}

/// `Closed` 前后都补分隔符，避免和相邻的日期粘连
fn isolate_closed(text: &str) -> String {
    CLOSED_RE.replace_all(text, " | Closed | ").into_owned()
}

/// 合并重复分隔符、去掉冒号后紧跟的分隔符以及首尾分隔符
fn collapse_separators(text: &str) -> String {
    let text = SEPARATOR_RUN_RE.replace_all(text, SEPARATOR);
    let text = COLON_SEPARATOR_RE.replace_all(&text, ": ");
    let text = EDGE_SEPARATOR_RE.replace_all(&text, "");
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_schedule_isolates_closed() {
        let out = normalize("Mon9AMClosedTue9AM5PM");
        assert_eq!(out, "Mon: 9AM | Closed | Tue: 9AM: 5PM");

        let segments: Vec<&str> = out.split(SEPARATOR).collect();
        assert_eq!(segments, vec!["Mon: 9AM", "Closed", "Tue: 9AM: 5PM"]);
    }

    #[test]
    fn test_rendered_week_with_suggestion_suffix() {
        let raw = "Monday9 am–5 pmTuesdayClosedSuggest new hours";
        assert_eq!(normalize(raw), "Monday: 9 am–5 pm | Tuesday | Closed");
    }

    #[test]
    fn test_strips_encoding_artifacts() {
        let raw = "ÓÖçSaturday10 am–2 pm";
        assert_eq!(normalize(raw), "Saturday: 10 am–2 pm");
    }

    #[test]
    fn test_suffix_only_stripped_at_end() {
        let out = normalize("Suggest new hours first");
        assert!(out.starts_with("Suggest new hours"));
    }

    #[test]
    fn test_colon_separator_artifact_is_collapsed() {
        assert_eq!(normalize("Hours: | Open"), "Hours: Open");
    }

    #[test]
    fn test_sentinel_passes_through() {
        assert_eq!(normalize("N/A"), "N/A");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
    }

    #[test]
    fn test_deterministic_and_idempotent() {
        let samples = [
            "Mon9AMClosedTue9AM5PM",
            "Monday9 am–5 pmTuesdayClosedSuggest new hours",
            "SundayClosedMondayClosed",
            "Friday(Good Friday)9 am–1 pmHours might differ",
            "Open 24 hours",
            "ÓÖç  Wed 8:30 AM–6 PM ||  Thu Closed",
        ];

        for sample in samples {
            let once = normalize(sample);
            assert_eq!(once, normalize(sample), "不确定: {sample}");
            assert_eq!(normalize(&once), once, "不幂等: {sample}");
        }
    }

    #[test]
    fn test_consecutive_closed_days() {
        assert_eq!(
            normalize("SundayClosedMondayClosed"),
            "Sunday | Closed | Monday | Closed"
        );
    }
}
