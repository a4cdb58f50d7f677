// ==========================================
// 纸品库存系统 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 仅作业级（致命）错误走 Err；行级问题记录为 ImportIssue
// ==========================================

use thiserror::Error;

/// 导入模块错误类型（作业级，整批放弃）
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("文件过大: {size} 字节，上限 {max} 字节")]
    FileTooLarge { size: u64, max: u64 },

    #[error("文件中没有数据")]
    EmptyFile,

    // ===== 结构校验错误 =====
    #[error("缺少必需列: {}", columns.join(", "))]
    MissingColumns { columns: Vec<String> },

    // ===== 作业状态错误 =====
    #[error("导入作业状态错误: 期望 {expected}，实际 {actual}")]
    InvalidState { expected: String, actual: String },

    // ===== 通用错误 =====
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 导入模板定义错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("字段重复定义: {0}")]
    DuplicateField(String),

    #[error("规则引用了未定义的字段: {0}")]
    UnknownField(String),

    #[error("字段 {field} 类型不适用于该规则（期望 {expected}）")]
    InvalidRuleField { field: String, expected: String },

    #[error("枚举字段 {0} 未定义可选值")]
    EmptyEnum(String),
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
