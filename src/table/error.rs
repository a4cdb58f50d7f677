// ==========================================
// 纸品库存系统 - 表格引擎错误类型
// ==========================================

use thiserror::Error;

/// 表格引擎构造错误
///
/// 视图操作本身不返回错误（越界一律钳制），仅列定义非法时拒绝构造
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("列 ID 重复: {0}")]
    DuplicateColumn(String),
}

/// 列取值器失败
///
/// 引擎内部吞掉，对应单元格按 Null 处理
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("取值失败: {0}")]
pub struct AccessorError(pub String);

impl AccessorError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}
