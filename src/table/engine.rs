// ==========================================
// 纸品库存系统 - 表格引擎
// ==========================================
// 职责: 数据集 + 视图状态 → 当前可见页（确定性计算）
// 流程: 筛选 → 排序 → 分页
// 红线: 所有操作不报错、不 panic；越界一律钳制
// ==========================================

use crate::config::TableSettings;
use crate::domain::{CellValue, Row};
use crate::table::column::{ColumnId, ColumnSpec};
use crate::table::error::TableError;
use crate::table::filter::{filter_indices, ColumnFilter};
use crate::table::paginate::{clamp_page_index, page_count, page_range};
use crate::table::sort::sort_indices;
use crate::table::view_state::ViewState;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

// ==========================================
// PageView - 当前页结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageView {
    pub rows: Vec<Row>,
    pub page_index: usize,
    pub page_count: usize,
    pub total_filtered_count: usize,
    pub total_count: usize,
    pub visible_columns: Vec<ColumnId>,
}

impl PageView {
    pub fn can_previous_page(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.page_index + 1 < self.page_count
    }
}

/// 筛选 + 排序后的行下标序列
///
/// sort_key 指向未知列或不可排序列时保持输入顺序
pub fn ordered_indices(rows: &[Row], columns: &[ColumnSpec], state: &ViewState) -> Vec<usize> {
    let filtered = filter_indices(
        rows,
        columns,
        &state.global_filter_text,
        &state.column_filters,
    );

    let sort_column = state
        .sort_key
        .as_deref()
        .and_then(|key| columns.iter().find(|c| c.id == key))
        .filter(|c| c.sortable);

    match sort_column {
        Some(column) => sort_indices(filtered, rows, column, state.sort_direction),
        None => filtered,
    }
}

/// 纯函数: 由数据集与视图状态计算当前页
pub fn compute_view(rows: &[Row], columns: &[ColumnSpec], state: &ViewState) -> PageView {
    let ordered = ordered_indices(rows, columns, state);
    let total_filtered_count = ordered.len();
    let page_size = state.effective_page_size();
    let page_index = clamp_page_index(state.page_index, total_filtered_count, page_size);

    let page_rows = ordered[page_range(total_filtered_count, page_index, page_size)]
        .iter()
        .map(|&idx| rows[idx].clone())
        .collect();

    PageView {
        rows: page_rows,
        page_index,
        page_count: page_count(total_filtered_count, page_size),
        total_filtered_count,
        total_count: rows.len(),
        visible_columns: columns
            .iter()
            .filter(|c| state.is_visible(&c.id))
            .map(|c| c.id.clone())
            .collect(),
    }
}

// ==========================================
// TableEngine - 有状态的表格引擎
// ==========================================
#[derive(Debug, Clone)]
pub struct TableEngine {
    rows: Vec<Row>,
    columns: Vec<ColumnSpec>,
    state: ViewState,
    page_size_options: Vec<usize>,
}

impl TableEngine {
    /// 绑定数据集与列定义
    ///
    /// # 错误
    /// - TableError::DuplicateColumn: 列 ID 不唯一
    pub fn new(
        rows: Vec<Row>,
        columns: Vec<ColumnSpec>,
        page_size: usize,
    ) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                return Err(TableError::DuplicateColumn(column.id.clone()));
            }
        }

        let state = ViewState::for_columns(&columns, page_size);
        debug!(
            rows = rows.len(),
            columns = columns.len(),
            page_size = state.page_size,
            "表格数据集绑定"
        );

        Ok(Self {
            rows,
            columns,
            state,
            page_size_options: TableSettings::default().page_size_options,
        })
    }

    /// 按配置创建（默认页大小 + 可选页大小列表）
    pub fn from_settings(
        rows: Vec<Row>,
        columns: Vec<ColumnSpec>,
        settings: &TableSettings,
    ) -> Result<Self, TableError> {
        Ok(Self::new(rows, columns, settings.default_page_size)?
            .with_page_size_options(settings.page_size_options.clone()))
    }

    pub fn with_page_size_options(mut self, mut options: Vec<usize>) -> Self {
        options.retain(|&n| n > 0);
        options.sort_unstable();
        options.dedup();
        self.page_size_options = options;
        self
    }

    /// 恢复外部保存的视图状态（非法值钳制）
    pub fn with_state(mut self, state: ViewState) -> Self {
        self.state = state;
        self.state.page_size = self.state.effective_page_size();
        for column in &self.columns {
            self.state
                .column_visibility
                .entry(column.id.clone())
                .or_insert(column.visible);
        }
        self.clamp_page_index();
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn columns(&self) -> &[ColumnSpec] {
        &self.columns
    }

    pub fn page_size_options(&self) -> &[usize] {
        &self.page_size_options
    }

    /// 重新绑定数据（如重新拉取后），保留视图状态
    pub fn set_rows(&mut self, rows: Vec<Row>) {
        self.rows = rows;
        self.clamp_page_index();
    }

    // ==========================================
    // 筛选
    // ==========================================

    pub fn set_global_filter(&mut self, text: impl Into<String>) {
        self.state.global_filter_text = text.into();
        self.state.page_index = 0;
    }

    /// 设置列级筛选；未知列返回 false，不生效的条件视为清除
    pub fn set_column_filter(&mut self, column_id: &str, filter: ColumnFilter) -> bool {
        if self.column(column_id).is_none() {
            warn!(column = %column_id, "筛选列不存在，忽略");
            return false;
        }

        if filter.is_active() {
            self.state
                .column_filters
                .insert(column_id.to_string(), filter);
        } else {
            self.state.column_filters.remove(column_id);
        }
        self.state.page_index = 0;
        true
    }

    pub fn clear_column_filter(&mut self, column_id: &str) {
        if self.state.column_filters.remove(column_id).is_some() {
            self.state.page_index = 0;
        }
    }

    /// 清除全局筛选与全部列筛选
    pub fn clear_all_filters(&mut self) {
        self.state.global_filter_text.clear();
        self.state.column_filters.clear();
        self.state.page_index = 0;
    }

    pub fn active_filter_count(&self) -> usize {
        self.state.active_filter_count()
    }

    // ==========================================
    // 排序
    // ==========================================

    /// 切换排序: 新列 → asc；同列 → asc ↔ desc
    ///
    /// 不可排序或不存在的列不改变状态，返回 false
    pub fn toggle_sort(&mut self, column_id: &str) -> bool {
        match self.column(column_id) {
            Some(column) if column.sortable => {}
            _ => return false,
        }

        if self.state.sort_key.as_deref() == Some(column_id) {
            self.state.sort_direction = self.state.sort_direction.flip();
        } else {
            self.state.sort_key = Some(column_id.to_string());
            self.state.sort_direction = Default::default();
        }
        self.state.page_index = 0;

        debug!(
            column = %column_id,
            direction = %self.state.sort_direction,
            "排序切换"
        );
        true
    }

    // ==========================================
    // 分页
    // ==========================================

    pub fn set_page_index(&mut self, page_index: usize) {
        self.state.page_index =
            clamp_page_index(page_index, self.total_filtered_count(), self.state.page_size);
    }

    /// 设置页大小；0 忽略并返回 false
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if page_size == 0 {
            warn!("页大小必须大于 0，忽略");
            return false;
        }
        self.state.page_size = page_size;
        self.clamp_page_index();
        true
    }

    pub fn next_page(&mut self) {
        self.set_page_index(self.state.page_index.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page_index(self.state.page_index.saturating_sub(1));
    }

    pub fn can_previous_page(&self) -> bool {
        self.state.page_index > 0
    }

    pub fn can_next_page(&self) -> bool {
        self.state.page_index + 1 < self.page_count()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.total_filtered_count(), self.state.page_size)
    }

    pub fn total_filtered_count(&self) -> usize {
        filter_indices(
            &self.rows,
            &self.columns,
            &self.state.global_filter_text,
            &self.state.column_filters,
        )
        .len()
    }

    // ==========================================
    // 列可见性
    // ==========================================

    /// 切换列可见性；不影响筛选与排序。未知列返回 false
    pub fn toggle_column_visibility(&mut self, column_id: &str) -> bool {
        if self.column(column_id).is_none() {
            return false;
        }
        let visible = self.state.is_visible(column_id);
        self.state
            .column_visibility
            .insert(column_id.to_string(), !visible);
        true
    }

    pub fn is_column_visible(&self, column_id: &str) -> bool {
        self.state.is_visible(column_id)
    }

    pub fn visible_columns(&self) -> Vec<&ColumnSpec> {
        self.columns
            .iter()
            .filter(|c| self.state.is_visible(&c.id))
            .collect()
    }

    /// 按可见列顺序投影一行
    pub fn project(&self, row: &Row) -> Vec<CellValue> {
        self.visible_columns()
            .into_iter()
            .map(|c| c.value_of(row))
            .collect()
    }

    // ==========================================
    // 结果
    // ==========================================

    pub fn get_visible_rows(&self) -> PageView {
        compute_view(&self.rows, &self.columns, &self.state)
    }

    fn column(&self, column_id: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.id == column_id)
    }

    fn clamp_page_index(&mut self) {
        self.state.page_index = clamp_page_index(
            self.state.page_index,
            self.total_filtered_count(),
            self.state.page_size,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SortDirection;

    fn numbered_rows(n: i64) -> Vec<Row> {
        (1..=n)
            .map(|i| Row::new().with("n", i).with("name", format!("item-{:02}", i)))
            .collect()
    }

    fn columns() -> Vec<ColumnSpec> {
        vec![
            ColumnSpec::field("n", "No.").numeric(),
            ColumnSpec::field("name", "Name"),
            ColumnSpec::field("note", "Note").sortable(false),
        ]
    }

    #[test]
    fn test_duplicate_column_rejected() {
        let cols = vec![ColumnSpec::field("a", "A"), ColumnSpec::field("a", "A2")];
        let err = TableEngine::new(vec![], cols, 5).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".to_string()));
    }

    #[test]
    fn test_toggle_sort_two_state_cycle() {
        let mut engine = TableEngine::new(numbered_rows(3), columns(), 5).unwrap();

        assert!(engine.toggle_sort("n"));
        assert_eq!(engine.state().sort_direction, SortDirection::Asc);
        engine.toggle_sort("n");
        assert_eq!(engine.state().sort_direction, SortDirection::Desc);
        engine.toggle_sort("n");
        assert_eq!(engine.state().sort_direction, SortDirection::Asc);
        assert_eq!(engine.state().sort_key.as_deref(), Some("n"));

        // 换列从 asc 开始
        engine.toggle_sort("n");
        engine.toggle_sort("name");
        assert_eq!(engine.state().sort_key.as_deref(), Some("name"));
        assert_eq!(engine.state().sort_direction, SortDirection::Asc);
    }

    #[test]
    fn test_toggle_sort_resets_page() {
        let mut engine = TableEngine::new(numbered_rows(12), columns(), 5).unwrap();
        engine.set_page_index(2);
        engine.toggle_sort("n");
        assert_eq!(engine.state().page_index, 0);
    }

    #[test]
    fn test_page_size_zero_ignored() {
        let mut engine = TableEngine::new(numbered_rows(12), columns(), 5).unwrap();
        assert!(!engine.set_page_size(0));
        assert_eq!(engine.state().page_size, 5);
    }

    #[test]
    fn test_set_page_size_clamps_index() {
        let mut engine = TableEngine::new(numbered_rows(12), columns(), 5).unwrap();
        engine.set_page_index(2);
        assert!(engine.set_page_size(10));
        assert_eq!(engine.state().page_index, 1);
        assert_eq!(engine.page_count(), 2);
    }

    #[test]
    fn test_next_previous_page() {
        let mut engine = TableEngine::new(numbered_rows(12), columns(), 5).unwrap();
        assert!(!engine.can_previous_page());
        engine.next_page();
        engine.next_page();
        engine.next_page();
        assert_eq!(engine.state().page_index, 2);
        assert!(!engine.can_next_page());
        engine.previous_page();
        assert_eq!(engine.state().page_index, 1);
    }

    #[test]
    fn test_set_rows_clamps_stale_page() {
        let mut engine = TableEngine::new(numbered_rows(12), columns(), 5).unwrap();
        engine.set_page_index(2);
        engine.set_rows(numbered_rows(3));
        assert_eq!(engine.state().page_index, 0);
        assert_eq!(engine.get_visible_rows().rows.len(), 3);
    }

    #[test]
    fn test_with_state_clamps_malformed_values() {
        let state = ViewState {
            page_size: 0,
            page_index: 40,
            ..ViewState::default()
        };
        let engine = TableEngine::new(numbered_rows(12), columns(), 5)
            .unwrap()
            .with_state(state);
        assert_eq!(engine.state().page_size, 1);
        assert_eq!(engine.state().page_index, 11);
        assert!(engine.is_column_visible("note"));
    }

    #[test]
    fn test_project_uses_visible_columns_in_order() {
        let mut engine = TableEngine::new(numbered_rows(1), columns(), 5).unwrap();
        engine.toggle_column_visibility("note");
        let row = &engine.rows()[0];
        assert_eq!(
            engine.project(row),
            vec![CellValue::Integer(1), CellValue::text("item-01")]
        );
    }

    #[test]
    fn test_page_size_options_normalized() {
        let engine = TableEngine::new(vec![], columns(), 5)
            .unwrap()
            .with_page_size_options(vec![25, 0, 5, 10, 5]);
        assert_eq!(engine.page_size_options(), &[5, 10, 25]);
    }
}
