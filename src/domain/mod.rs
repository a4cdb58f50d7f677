// ==========================================
// 纸品库存系统 - 领域模型层
// ==========================================
// 职责: 行数据模型、类型转换工具、导入结果对象
// 红线: 不含解析逻辑，不含表格引擎逻辑
// ==========================================

pub mod coercion;
pub mod import;
pub mod row;
pub mod types;

// 重导出核心类型
pub use import::{render_issue_messages, ImportBatch, ImportIssue, ImportSummary, IssueKind, JobState};
pub use row::{CellValue, Row};
pub use types::{HeaderMatching, SortDirection, SortType};
