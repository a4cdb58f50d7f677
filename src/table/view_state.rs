// ==========================================
// 纸品库存系统 - 视图状态
// ==========================================
// 职责: 可序列化的排序 / 筛选 / 分页 / 列可见性配置
// 红线: 纯数据；非法值（page_size = 0、页码越界）由计算方钳制，不报错
// ==========================================

use crate::domain::SortDirection;
use crate::table::column::{ColumnId, ColumnSpec};
use crate::table::filter::ColumnFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewState {
    pub sort_key: Option<ColumnId>,
    pub sort_direction: SortDirection,
    pub global_filter_text: String,
    pub page_index: usize,
    pub page_size: usize,
    pub column_visibility: BTreeMap<ColumnId, bool>,
    pub column_filters: BTreeMap<ColumnId, ColumnFilter>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            sort_key: None,
            sort_direction: SortDirection::Asc,
            global_filter_text: String::new(),
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
            column_visibility: BTreeMap::new(),
            column_filters: BTreeMap::new(),
        }
    }
}

impl ViewState {
    /// 首次绑定数据集时的初始状态（列可见性取自列定义）
    pub fn for_columns(columns: &[ColumnSpec], page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            column_visibility: columns
                .iter()
                .map(|c| (c.id.clone(), c.visible))
                .collect(),
            ..Self::default()
        }
    }

    /// 列是否可见（未登记的列视为可见）
    pub fn is_visible(&self, column_id: &str) -> bool {
        self.column_visibility
            .get(column_id)
            .copied()
            .unwrap_or(true)
    }

    /// 生效中的列筛选数量
    pub fn active_filter_count(&self) -> usize {
        self.column_filters
            .values()
            .filter(|f| f.is_active())
            .count()
    }

    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
