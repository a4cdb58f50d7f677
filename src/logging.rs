// ==========================================
// 日志系统初始化
// ==========================================
// 输出约定: 日志一律写 stderr，stdout 只输出导入报告 JSON，
//           命令行结果可直接重定向或交给 jq 处理
// 级别: RUST_LOG 过滤，默认 info
// ==========================================

use tracing_subscriber::{fmt, EnvFilter};

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// 初始化人类可读的日志（写 stderr）
///
/// 导入命令的 JSON 报告走 stdout，两路互不混杂:
/// `paper-inventory-import stock.csv > report.json` 时终端仍能看到日志。
///
/// # 环境变量
/// - RUST_LOG: 过滤器，例如 `RUST_LOG=paper_inventory_core::importer=debug`
///   查看逐行校验细节，`RUST_LOG=perf=info` 只看耗时
///
/// # 示例
/// ```no_run
/// use paper_inventory_core::logging;
/// logging::init();
/// ```
pub fn init() {
    fmt()
        .with_env_filter(env_filter())
        .with_target(true)
        .with_thread_ids(false)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}

/// 初始化 JSON 行日志（`--log-json`），同样写 stderr
///
/// 每条事件一行 JSON，带当前 span（如 import_file 的 schema 字段），
/// 便于与 stdout 上的报告分开采集。
pub fn init_json() {
    fmt()
        .json()
        .with_env_filter(env_filter())
        .with_current_span(true)
        .with_writer(std::io::stderr)
        .init();
}

/// 测试用: debug 级别，经 test writer 输出，仅在失败用例中显示；可重复调用
pub fn init_test() {
    let _ = fmt()
        .with_env_filter(EnvFilter::new("debug"))
        .with_test_writer()
        .try_init();
}
