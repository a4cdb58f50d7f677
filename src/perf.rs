// ==========================================
// 纸品库存系统 - 性能统计
// ==========================================
// 职责: 按操作记录耗时与处理行数，超过阈值输出慢操作告警
// 开关: PAPER_INVENTORY_SLOW_OP_MS=200 配置慢操作阈值（毫秒，0 关闭）
// ==========================================

use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = Cell::new(0);
    static ROW_COUNT: Cell<u64> = Cell::new(0);
}

fn slow_op_threshold_ms() -> u64 {
    std::env::var("PAPER_INVENTORY_SLOW_OP_MS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(if cfg!(debug_assertions) { 200 } else { 1000 })
}

/// 累加当前线程上活动 PerfGuard 的处理行数
pub fn record_rows(n: usize) {
    let active = PERF_DEPTH.with(|d| d.get() > 0);
    if active {
        ROW_COUNT.with(|c| c.set(c.get().saturating_add(n as u64)));
    }
}

/// 性能统计 Guard：记录 elapsed_ms + 处理行数
///
/// 使用方式：
/// ```ignore
/// let _perf = paper_inventory_core::perf::PerfGuard::new("import_file");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    rows_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let rows_start = ROW_COUNT.with(|c| c.get());
        Self {
            op,
            start: Instant::now(),
            rows_start,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let rows = ROW_COUNT
            .with(|c| c.get())
            .saturating_sub(self.rows_start);

        tracing::info!(target: "perf", op = self.op, elapsed_ms, rows, "done");

        let threshold = slow_op_threshold_ms();
        if threshold > 0 && elapsed_ms >= threshold {
            tracing::warn!(target: "slow_op", op = self.op, elapsed_ms, rows, "slow operation");
        }

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}
