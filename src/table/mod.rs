// ==========================================
// 纸品库存系统 - 表格引擎层
// ==========================================
// 职责: 列表页通用的客户端排序 / 筛选 / 分页 / 列可见性
// 输入: 行数组 + 调用方提供的列定义
// 输出: 当前页行 + 分页元数据
// ==========================================

pub mod column;
pub mod engine;
pub mod error;
pub mod filter;
pub mod paginate;
pub mod sort;
pub mod view_state;

// 重导出核心类型
pub use column::{Accessor, AccessorFn, ColumnId, ColumnSpec};
pub use engine::{compute_view, ordered_indices, PageView, TableEngine};
pub use error::{AccessorError, TableError};
pub use filter::ColumnFilter;
pub use view_state::{ViewState, DEFAULT_PAGE_SIZE};
