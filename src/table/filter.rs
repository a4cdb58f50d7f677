// ==========================================
// 纸品库存系统 - 表格筛选
// ==========================================
// 职责: 全局文本筛选 + 列级高级筛选
// 规则: 全局筛选对行内任意字段做大小写无关子串匹配（含隐藏列）
//       列级筛选按 AND 叠加在全局筛选之后
// ==========================================

use crate::domain::coercion::{parse_calendar_date, parse_flag};
use crate::domain::{CellValue, Row};
use crate::table::column::{ColumnId, ColumnSpec};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ==========================================
// ColumnFilter - 列级筛选条件
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ColumnFilter {
    /// 文本包含（大小写无关）
    Contains { text: String },
    /// 下拉选择，文本相等（大小写无关）
    Equals { value: String },
    /// 是 / 否
    Boolean { value: bool },
    /// 数值区间，闭区间
    NumberRange { min: Option<f64>, max: Option<f64> },
    /// 日期区间，闭区间
    DateRange {
        after: Option<NaiveDate>,
        before: Option<NaiveDate>,
    },
}

impl ColumnFilter {
    /// 条件是否生效（空文本 / 无边界视为未设置）
    pub fn is_active(&self) -> bool {
        match self {
            ColumnFilter::Contains { text } => !text.is_empty(),
            ColumnFilter::Equals { value } => !value.is_empty(),
            ColumnFilter::Boolean { .. } => true,
            ColumnFilter::NumberRange { min, max } => min.is_some() || max.is_some(),
            ColumnFilter::DateRange { after, before } => after.is_some() || before.is_some(),
        }
    }

    pub fn matches(&self, value: &CellValue) -> bool {
        if !self.is_active() {
            return true;
        }

        match self {
            ColumnFilter::Contains { text } => value
                .to_text()
                .to_lowercase()
                .contains(&text.to_lowercase()),
            ColumnFilter::Equals { value: expected } => {
                value.to_text().trim().to_lowercase() == expected.trim().to_lowercase()
            }
            ColumnFilter::Boolean { value: expected } => {
                let actual = match value {
                    CellValue::Bool(b) => Some(*b),
                    CellValue::Integer(i) => Some(*i != 0),
                    CellValue::Text(s) => parse_flag(s),
                    _ => None,
                };
                actual == Some(*expected)
            }
            ColumnFilter::NumberRange { min, max } => match value.as_f64() {
                Some(v) => min.map_or(true, |m| v >= m) && max.map_or(true, |m| v <= m),
                None => false,
            },
            ColumnFilter::DateRange { after, before } => {
                match parse_calendar_date(&value.to_text()) {
                    Some(d) => after.map_or(true, |a| d >= a) && before.map_or(true, |b| d <= b),
                    None => false,
                }
            }
        }
    }
}

/// 全局筛选: 行内任意字段（含未建列 / 隐藏列）或任意计算列命中即保留
///
/// `needle_lower` 需已转小写；空串视为无筛选
pub fn row_matches_global(row: &Row, columns: &[ColumnSpec], needle_lower: &str) -> bool {
    if needle_lower.is_empty() {
        return true;
    }

    let hit = |v: &CellValue| v.to_text().to_lowercase().contains(needle_lower);

    row.values().any(|v| hit(v))
        || columns
            .iter()
            .filter(|c| c.is_computed())
            .any(|c| hit(&c.value_of(row)))
}

/// 列级筛选全部命中（未知列 ID 的条件忽略）
pub fn row_matches_columns(
    row: &Row,
    columns: &[ColumnSpec],
    filters: &BTreeMap<ColumnId, ColumnFilter>,
) -> bool {
    filters.iter().all(|(id, filter)| {
        match columns.iter().find(|c| &c.id == id) {
            Some(column) => filter.matches(&column.value_of(row)),
            None => true,
        }
    })
}

/// 筛选阶段: 返回命中行的下标（保持输入顺序）
pub fn filter_indices(
    rows: &[Row],
    columns: &[ColumnSpec],
    global_filter_text: &str,
    column_filters: &BTreeMap<ColumnId, ColumnFilter>,
) -> Vec<usize> {
    let needle = global_filter_text.to_lowercase();

    rows.iter()
        .enumerate()
        .filter(|(_, row)| {
            row_matches_global(row, columns, &needle)
                && row_matches_columns(row, columns, column_filters)
        })
        .map(|(idx, _)| idx)
        .collect()
}
