// ==========================================
// 纸品库存系统 - 列定义
// ==========================================
// 职责: ColumnSpec（可投影 / 可排序 / 可筛选的字段描述）
// 红线: 取值器必须是行的纯函数
// ==========================================

use crate::domain::{CellValue, Row, SortType};
use crate::table::error::AccessorError;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

pub type ColumnId = String;

pub type AccessorFn = Arc<dyn Fn(&Row) -> Result<CellValue, AccessorError> + Send + Sync>;

// ==========================================
// Accessor - 列取值器
// ==========================================
#[derive(Clone)]
pub enum Accessor {
    /// 按字段名直接取值
    Field(String),
    /// 计算列
    Computed(AccessorFn),
}

impl Accessor {
    pub fn resolve(&self, row: &Row) -> Result<CellValue, AccessorError> {
        match self {
            Accessor::Field(name) => Ok(row.value(name)),
            Accessor::Computed(f) => f(row),
        }
    }
}

impl fmt::Debug for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Accessor::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Accessor::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

// ==========================================
// ColumnSpec - 列定义
// ==========================================
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub id: ColumnId,
    pub label: String,
    pub accessor: Accessor,
    pub sortable: bool,
    pub visible: bool, // 初始可见性，运行时以 ViewState 为准
    pub width_hint: Option<u16>,
    pub sort_type: SortType,
}

impl ColumnSpec {
    /// 字段列（id 即字段名），默认可排序、可见、文本比较
    pub fn field(id: impl Into<String>, label: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            accessor: Accessor::Field(id.clone()),
            id,
            label: label.into(),
            sortable: true,
            visible: true,
            width_hint: None,
            sort_type: SortType::Text,
        }
    }

    /// 计算列
    pub fn computed<F>(id: impl Into<String>, label: impl Into<String>, f: F) -> Self
    where
        F: Fn(&Row) -> Result<CellValue, AccessorError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            label: label.into(),
            accessor: Accessor::Computed(Arc::new(f)),
            sortable: true,
            visible: true,
            width_hint: None,
            sort_type: SortType::Text,
        }
    }

    pub fn sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn width_hint(mut self, width: u16) -> Self {
        self.width_hint = Some(width);
        self
    }

    pub fn numeric(mut self) -> Self {
        self.sort_type = SortType::Numeric;
        self
    }

    pub fn is_computed(&self) -> bool {
        matches!(self.accessor, Accessor::Computed(_))
    }

    /// 取单元格值；取值器失败按 Null 处理，不中断整表计算
    pub fn value_of(&self, row: &Row) -> CellValue {
        match self.accessor.resolve(row) {
            Ok(value) => value,
            Err(e) => {
                debug!(column = %self.id, error = %e, "列取值失败，按 Null 处理");
                CellValue::Null
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_accessor_reads_named_field() {
        let col = ColumnSpec::field("ItemName", "Item Name");
        let row = Row::new().with("ItemName", "A4 Copy Paper");
        assert_eq!(col.value_of(&row), CellValue::text("A4 Copy Paper"));
        assert!(!col.is_computed());
    }

    #[test]
    fn test_failing_accessor_yields_null() {
        let col = ColumnSpec::computed("ratio", "Ratio", |row| {
            let out = row.value("StockOut").as_f64().unwrap_or(0.0);
            if out == 0.0 {
                return Err(AccessorError::new("除数为 0"));
            }
            Ok(CellValue::Decimal(row.value("StockIn").as_f64().unwrap_or(0.0) / out))
        });

        let bad = Row::new().with("StockIn", 10i64).with("StockOut", 0i64);
        let good = Row::new().with("StockIn", 10i64).with("StockOut", 4i64);

        assert_eq!(col.value_of(&bad), CellValue::Null);
        assert_eq!(col.value_of(&good), CellValue::Decimal(2.5));
    }

    #[test]
    fn test_builder_flags() {
        let col = ColumnSpec::field("GSM", "GSM")
            .numeric()
            .sortable(false)
            .visible(false)
            .width_hint(80);
        assert_eq!(col.sort_type, SortType::Numeric);
        assert!(!col.sortable);
        assert!(!col.visible);
        assert_eq!(col.width_hint, Some(80));
    }
}
