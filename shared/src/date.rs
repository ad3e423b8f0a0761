//! 日期辅助模块
//!
//! 负责 HTML 日期输入框的值（YYYY-MM-DD）与后端 RFC 3339
//! 时间戳之间的双向转换，以及界面展示用的格式化。

use chrono::{DateTime, Datelike, NaiveDate, Utc};

/// 解析 `<input type="date">` 的值
///
/// 按 UTC 当天零点处理。解析失败返回 None。
pub fn parse_date_input(s: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()?;
    let naive = date.and_hms_opt(0, 0, 0)?;
    Some(DateTime::from_naive_utc_and_offset(naive, Utc))
}

/// 格式化为日期输入框可回填的值（YYYY-MM-DD）
pub fn to_date_input(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d").to_string()
}

/// 界面展示用的短日期，如 "Jan 2, 2025"
pub fn format_short_date(dt: &DateTime<Utc>) -> String {
    dt.format("%b %-d, %Y").to_string()
}

/// 从 Unix 毫秒构造 UTC 时间（越界时回退到纪元起点）
pub fn from_millis(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).unwrap_or_default()
}

/// 两个时间点之间相差的整天数（按日历日计算，可为负）
pub fn days_between(from: &DateTime<Utc>, to: &DateTime<Utc>) -> i64 {
    let from_days = from.date_naive().num_days_from_ce() as i64;
    let to_days = to.date_naive().num_days_from_ce() as i64;
    to_days - from_days
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_input_round_trip() {
        let dt = parse_date_input("2025-03-09").unwrap();
        assert_eq!(to_date_input(&dt), "2025-03-09");
    }

    #[test]
    fn date_input_tolerates_whitespace_and_rejects_garbage() {
        assert!(parse_date_input(" 2025-01-31 ").is_some());
        assert!(parse_date_input("").is_none());
        assert!(parse_date_input("31/01/2025").is_none());
        assert!(parse_date_input("2025-13-01").is_none());
    }

    #[test]
    fn short_date_has_no_zero_padding() {
        let dt = parse_date_input("2025-01-02").unwrap();
        assert_eq!(format_short_date(&dt), "Jan 2, 2025");
    }

    #[test]
    fn from_millis_matches_parsed_dates() {
        let dt = parse_date_input("2025-01-02").unwrap();
        assert_eq!(from_millis(dt.timestamp_millis()), dt);
    }

    #[test]
    fn days_between_crosses_calendar_days() {
        let a = parse_date_input("2025-01-01").unwrap();
        let b = parse_date_input("2025-01-31").unwrap();
        assert_eq!(days_between(&a, &b), 30);
        assert_eq!(days_between(&b, &a), -30);
        assert_eq!(days_between(&a, &a), 0);
    }
}
