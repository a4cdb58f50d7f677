// ==========================================
// 纸品库存系统 - 分页计算
// ==========================================
// 规则: page_count = ceil(total / size)，0 页按 1 页（空页）处理
// ==========================================

use std::ops::Range;

/// 总页数（至少 1 页；page_size 为 0 时按 1 处理）
pub fn page_count(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// 将页码钳制到 [0, page_count - 1]
pub fn clamp_page_index(page_index: usize, total: usize, page_size: usize) -> usize {
    page_index.min(page_count(total, page_size) - 1)
}

/// 当前页在筛选排序结果中的切片区间
pub fn page_range(total: usize, page_index: usize, page_size: usize) -> Range<usize> {
    let size = page_size.max(1);
    let index = clamp_page_index(page_index, total, size);
    let start = (index * size).min(total);
    let end = (start + size).min(total);
    start..end
}
