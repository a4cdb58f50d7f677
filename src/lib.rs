// ==========================================
// 纸品库存系统 - 核心库
// ==========================================
// 职责: 列表页表格引擎 + 批量导入校验管道
// 系统定位: 纯数据变换，不含持久化与界面
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 行数据与导入结果
pub mod domain;

// 表格引擎层 - 排序 / 筛选 / 分页 / 列可见性
pub mod table;

// 导入层 - 外部数据
pub mod importer;

// 配置层 - 系统配置
pub mod config;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, HeaderMatching, ImportBatch, ImportIssue, ImportSummary, IssueKind, JobState, Row,
    SortDirection, SortType,
};

// 表格引擎
pub use table::{compute_view, ColumnFilter, ColumnSpec, PageView, TableEngine, ViewState};

// 导入
pub use importer::{
    template_csv, ImportError, ImportJob, ImportSchema, StockImporter, StockImporterImpl,
};

// 配置
pub use config::{ConfigManager, ImportSettings, TableSettings};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "纸品库存系统";
