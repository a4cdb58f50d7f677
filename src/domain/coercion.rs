// ==========================================
// 纸品库存系统 - 类型转换工具
// ==========================================
// 职责: 文本 → 日期 / 非负整数 / 非负小数 / 布尔 的统一解析
// 使用方: 导入校验 (importer) + 列筛选 (table)
// ==========================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 仅含日期的格式（按优先级尝试）
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2024-01-15
    "%Y/%m/%d", // 2024/01/15
    "%Y.%m.%d", // 2024.01.15
    "%Y%m%d",   // 20240115
    "%m/%d/%Y", // 01/15/2024（美式）
    "%d %b %Y", // 15 Jan 2024
    "%b %d, %Y", // Jan 15, 2024
];

/// 带时间部分的格式，取日期部分
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// 解析日历日期
///
/// # 返回
/// - Some(NaiveDate): 可识别的日期（含 RFC 3339 时间戳，取其本地日期部分）
/// - None: 空白或无法识别
pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

/// ISO 8601 日期字符串 (YYYY-MM-DD)
pub fn to_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// 解析非负整数
///
/// 接受 "12" / "+12"，以及电子表格常见的整值小数 "12.0"；负数、小数、非数字返回 None
pub fn parse_non_negative_integer(value: &str) -> Option<i64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(v) = value.parse::<i64>() {
        return (v >= 0).then_some(v);
    }

    let v = value.parse::<f64>().ok()?;
    if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// 解析非负小数
pub fn parse_non_negative_decimal(value: &str) -> Option<f64> {
    let v = value.trim().parse::<f64>().ok()?;
    (v.is_finite() && v >= 0.0).then_some(v)
}

/// 解析布尔标记（1/Y/是/TRUE/YES → true）
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_uppercase().as_str() {
        "1" | "Y" | "YES" | "TRUE" | "是" => Some(true),
        "0" | "N" | "NO" | "FALSE" | "否" => Some(false),
        _ => None,
    }
}
