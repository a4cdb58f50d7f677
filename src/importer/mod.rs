// ==========================================
// 纸品库存系统 - 导入层
// ==========================================
// 职责: 上传文件 → 校验、去重后的待提交批次 + 错误列表
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod conflict_handler;
pub mod data_cleaner;
pub mod derivation;
pub mod dq_validator;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod import_job;
pub mod schema;
pub mod stock_importer_impl;
pub mod stock_importer_trait;
pub mod template;

// 重导出核心类型
pub use conflict_handler::{composite_key, DuplicateTracker};
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use derivation::DerivationService as DerivationServiceImpl;
pub use dq_validator::{DqValidator as DqValidatorImpl, HeaderMap};
pub use error::{ImportError, ImportResult, SchemaError};
pub use field_mapper::FieldMapper as FieldMapperImpl;
pub use file_parser::{CsvParser, ExcelParser, RawRecord, RawTable, UniversalFileParser};
pub use import_job::ImportJob;
pub use schema::{ClosingBalanceRule, DuplicateKeyRule, FieldSpec, FieldType, ImportSchema};
pub use stock_importer_impl::StockImporterImpl;
pub use template::{template_csv, write_template};

// 重导出 Trait 接口
pub use stock_importer_trait::{
    DataCleaner, DerivationService, DqValidator, FieldMapper, FileParser, StockImporter,
};
