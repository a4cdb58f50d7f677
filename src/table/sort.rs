// ==========================================
// 纸品库存系统 - 表格排序
// ==========================================
// 规则:
// - 稳定排序: 比较相等的行保持原相对顺序
// - Text 列: 小写文本字典序；Numeric 列: 数值比较，非数值 / 空值排在数值之前
// - desc 反转比较器，不反转结果数组（保证相等键的稳定性）
// ==========================================

use crate::domain::{CellValue, Row, SortDirection, SortType};
use crate::table::column::ColumnSpec;
use std::cmp::Ordering;

/// 预计算的排序键（每行只调用一次取值器）
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Text(String),
    Number(Option<f64>),
}

impl SortKey {
    fn of(value: &CellValue, sort_type: SortType) -> Self {
        match sort_type {
            SortType::Text => SortKey::Text(value.to_text().to_lowercase()),
            SortType::Numeric => SortKey::Number(value.as_f64()),
        }
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::Number(a), SortKey::Number(b)) => match (a, b) {
                (Some(x), Some(y)) => x.total_cmp(y),
                (None, Some(_)) => Ordering::Less,
                (Some(_), None) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            // 同一列的键类型一致，不会出现
            _ => Ordering::Equal,
        }
    }
}

/// 排序阶段: 对筛选后的行下标做稳定排序
pub fn sort_indices(
    indices: Vec<usize>,
    rows: &[Row],
    column: &ColumnSpec,
    direction: SortDirection,
) -> Vec<usize> {
    let mut keyed: Vec<(SortKey, usize)> = indices
        .into_iter()
        .map(|idx| (SortKey::of(&column.value_of(&rows[idx]), column.sort_type), idx))
        .collect();

    // Vec::sort_by 为稳定排序
    keyed.sort_by(|(a, _), (b, _)| {
        let ord = a.compare(b);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });

    keyed.into_iter().map(|(_, idx)| idx).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Row> {
        vec![
            Row::new().with("name", "banana").with("qty", 10i64).with("seq", 0i64),
            Row::new().with("name", "Apple").with("qty", 9i64).with("seq", 1i64),
            Row::new().with("name", "cherry").with("qty", 100i64).with("seq", 2i64),
            Row::new().with("name", "apple").with("qty", 9i64).with("seq", 3i64),
        ]
    }

    #[test]
    fn test_text_sort_is_case_insensitive_and_stable() {
        let col = ColumnSpec::field("name", "Name");
        let sorted = sort_indices(vec![0, 1, 2, 3], &rows(), &col, SortDirection::Asc);
        // "Apple" 与 "apple" 相等，保持原顺序 1 → 3
        assert_eq!(sorted, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_desc_keeps_ties_in_input_order() {
        let col = ColumnSpec::field("name", "Name");
        let sorted = sort_indices(vec![0, 1, 2, 3], &rows(), &col, SortDirection::Desc);
        assert_eq!(sorted, vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_numeric_vs_text_comparison() {
        let text_col = ColumnSpec::field("qty", "Qty");
        let num_col = ColumnSpec::field("qty", "Qty").numeric();

        // 文本口径: "10" < "100" < "9"
        let by_text = sort_indices(vec![0, 1, 2, 3], &rows(), &text_col, SortDirection::Asc);
        assert_eq!(by_text, vec![0, 2, 1, 3]);

        // 数值口径: 9, 9, 10, 100
        let by_num = sort_indices(vec![0, 1, 2, 3], &rows(), &num_col, SortDirection::Asc);
        assert_eq!(by_num, vec![1, 3, 0, 2]);
    }

    #[test]
    fn test_numeric_nulls_sort_first() {
        let rows = vec![
            Row::new().with("qty", 5i64),
            Row::new().with("qty", CellValue::Null),
            Row::new().with("qty", "n/a"),
        ];
        let col = ColumnSpec::field("qty", "Qty").numeric();
        assert_eq!(
            sort_indices(vec![0, 1, 2], &rows, &col, SortDirection::Asc),
            vec![1, 2, 0]
        );
    }
}
