// ==========================================
// 纸品库存系统 - TableEngine 集成测试
// ==========================================
// 覆盖: 分页、排序稳定性、筛选幂等、列可见性、配置驱动的页大小
// ==========================================


use paper_inventory_core::config::{ConfigManager, TableSettings};
use paper_inventory_core::table::{compute_view, ordered_indices, ColumnFilter, TableEngine, ViewState};
use paper_inventory_core::{CellValue, Row, SortDirection};
use test_helpers::{paper_columns, paper_rows};

fn ids(rows: &[Row]) -> Vec<i64> {
    rows.iter().filter_map(|r| r.value("id").as_i64()).collect()
}

fn engine(n: i64, page_size: usize) -> TableEngine {
    TableEngine::new(paper_rows(n), paper_columns(), page_size).expect("创建表格引擎失败")
}

// ==========================================
// 分页
// ==========================================

#[test]
fn test_unsorted_pages_keep_input_order() {
    let mut table = engine(12, 5);

    let first = table.get_visible_rows();
    assert_eq!(ids(&first.rows), vec![1, 2, 3, 4, 5]);
    assert_eq!(first.page_count, 3);
    assert_eq!(first.total_filtered_count, 12);

    table.set_page_index(2);
    let last = table.get_visible_rows();
    assert_eq!(ids(&last.rows), vec![11, 12]);
    assert!(!last.can_next_page());
    assert!(last.can_previous_page());
}

#[test]
fn test_pages_cover_sorted_sequence_exactly() {
    let rows = paper_rows(13);
    let columns = paper_columns();

    for page_size in 1..=14 {
        let mut state = ViewState::for_columns(&columns, page_size);
        state.sort_key = Some("gsm".to_string());
        state.sort_direction = SortDirection::Desc;

        let expected: Vec<i64> = ordered_indices(&rows, &columns, &state)
            .into_iter()
            .filter_map(|i| rows[i].value("id").as_i64())
            .collect();

        let page_count = compute_view(&rows, &columns, &state).page_count;
        let mut concatenated = Vec::new();
        for page in 0..page_count {
            state.page_index = page;
            concatenated.extend(ids(&compute_view(&rows, &columns, &state).rows));
        }

        assert_eq!(concatenated, expected, "page_size = {}", page_size);
    }
}

#[test]
fn test_empty_dataset_reports_single_empty_page() {
    let table = engine(0, 5);
    let view = table.get_visible_rows();
    assert!(view.rows.is_empty());
    assert_eq!(view.page_count, 1);
    assert_eq!(view.page_index, 0);
}

#[test]
fn test_page_size_change_clamps_page_index() {
    let mut table = engine(12, 5);
    table.set_page_index(2);
    assert!(table.set_page_size(10));
    assert_eq!(table.state().page_index, 1);

    assert!(!table.set_page_size(0));
    assert_eq!(table.state().page_size, 10);
}

#[test]
fn test_next_and_previous_page_stay_in_range() {
    let mut table = engine(7, 5);
    table.next_page();
    table.next_page();
    assert_eq!(table.state().page_index, 1);
    table.previous_page();
    table.previous_page();
    assert_eq!(table.state().page_index, 0);
}

// ==========================================
// 排序
// ==========================================

#[test]
fn test_toggle_sort_on_non_sortable_column_is_noop() {
    let mut table = engine(12, 5);
    table.set_page_index(1);
    let before = table.state().clone();

    assert!(!table.toggle_sort("unit"));
    assert_eq!(table.state(), &before);

    assert!(!table.toggle_sort("missing"));
    assert_eq!(table.state(), &before);
}

#[test]
fn test_sort_is_stable_in_both_directions() {
    let mut table = engine(12, 12);

    assert!(table.toggle_sort("gsm"));
    assert_eq!(
        ids(&table.get_visible_rows().rows),
        vec![2, 4, 6, 8, 10, 12, 3, 7, 11, 1, 5, 9]
    );

    assert!(table.toggle_sort("gsm"));
    assert_eq!(table.state().sort_direction, SortDirection::Desc);
    assert_eq!(
        ids(&table.get_visible_rows().rows),
        vec![1, 5, 9, 3, 7, 11, 2, 4, 6, 8, 10, 12]
    );

    // 两态循环: 第三次点击回到升序
    assert!(table.toggle_sort("gsm"));
    assert_eq!(table.state().sort_direction, SortDirection::Asc);
}

#[test]
fn test_text_sort_is_lexicographic_and_numeric_sort_is_not() {
    let mut table = engine(12, 12);

    table.toggle_sort("name");
    let by_name = ids(&table.get_visible_rows().rows);
    assert_eq!(&by_name[..4], &[1, 10, 11, 12]);

    table.toggle_sort("id");
    let by_id = ids(&table.get_visible_rows().rows);
    assert_eq!(by_id, (1..=12).collect::<Vec<_>>());
}

#[test]
fn test_sort_change_resets_page() {
    let mut table = engine(12, 5);
    table.set_page_index(2);
    table.toggle_sort("name");
    assert_eq!(table.state().page_index, 0);
}

// ==========================================
// 筛选
// ==========================================

#[test]
fn test_global_filter_is_idempotent() {
    let rows = paper_rows(30);
    let columns = paper_columns();
    let mut state = ViewState::for_columns(&columns, 50);
    state.global_filter_text = "ITEM 1".to_string();

    let once: Vec<Row> = ordered_indices(&rows, &columns, &state)
        .into_iter()
        .map(|i| rows[i].clone())
        .collect();
    let twice: Vec<Row> = ordered_indices(&once, &columns, &state)
        .into_iter()
        .map(|i| once[i].clone())
        .collect();

    assert_eq!(ids(&once), vec![1, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19]);
    assert_eq!(once, twice);
}

#[test]
fn test_global_filter_matches_hidden_columns() {
    let mut table = engine(12, 12);
    assert!(table.toggle_column_visibility("unit"));
    assert!(!table.is_column_visible("unit"));

    table.set_global_filter("ream");
    let view = table.get_visible_rows();
    assert_eq!(ids(&view.rows), vec![2, 4, 6, 8, 10, 12]);
    assert!(!view.visible_columns.contains(&"unit".to_string()));
}

#[test]
fn test_empty_filter_returns_full_dataset() {
    let mut table = engine(12, 50);
    table.set_global_filter("");
    assert_eq!(table.total_filtered_count(), 12);
}

#[test]
fn test_column_filters_combine_with_global_filter() {
    let mut table = engine(12, 50);
    table.set_page_index(0);

    assert!(table.set_column_filter(
        "gsm",
        ColumnFilter::NumberRange {
            min: Some(100.0),
            max: None,
        },
    ));
    assert_eq!(ids(&table.get_visible_rows().rows), vec![1, 3, 5, 7, 9, 11]);
    assert_eq!(table.active_filter_count(), 1);

    table.set_global_filter("item 1");
    assert_eq!(ids(&table.get_visible_rows().rows), vec![1, 11]);

    assert!(!table.set_column_filter(
        "missing",
        ColumnFilter::Contains {
            text: "x".to_string()
        },
    ));

    table.clear_all_filters();
    assert_eq!(table.active_filter_count(), 0);
    assert_eq!(table.total_filtered_count(), 12);
}

// ==========================================
// 列可见性
// ==========================================

#[test]
fn test_visibility_only_affects_projection() {
    let mut table = engine(3, 10);
    table.toggle_column_visibility("name");
    table.toggle_column_visibility("unit");

    let first = table.get_visible_rows().rows[0].clone();
    assert_eq!(
        table.project(&first),
        vec![CellValue::Integer(1), CellValue::Integer(120)]
    );
    assert_eq!(table.total_filtered_count(), 3);
}

// ==========================================
// 配置与状态
// ==========================================

#[test]
fn test_engine_from_config_settings() {
    let mut config = ConfigManager::new();
    config.set_config_value("default_page_size", "25");
    config.set_config_value("page_size_options", "[50, 25, 25]");

    let table =
        TableEngine::from_settings(paper_rows(3), paper_columns(), &config.table_settings())
            .unwrap();
    assert_eq!(table.state().page_size, 25);
    assert_eq!(table.page_size_options(), &[25, 50]);

    let defaults =
        TableEngine::from_settings(vec![], paper_columns(), &TableSettings::default()).unwrap();
    assert_eq!(defaults.page_size_options(), &[5, 10, 25, 50]);
}

#[test]
fn test_saved_view_state_is_restored_and_clamped() {
    let json = r#"{"sort_key":"gsm","sort_direction":"desc","page_index":99,"page_size":5}"#;
    let state: ViewState = serde_json::from_str(json).unwrap();

    let table = engine(12, 10).with_state(state);
    assert_eq!(table.state().page_index, 2);
    assert_eq!(table.state().sort_direction, SortDirection::Desc);
    assert!(table.is_column_visible("unit"));
}
