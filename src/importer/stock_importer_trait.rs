// ==========================================
// 纸品库存系统 - 库存导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 解析 → 表头校验 → 逐行映射 → 派生 → 去重
// ==========================================

use crate::domain::{ImportBatch, ImportIssue, Row};
use crate::importer::dq_validator::HeaderMap;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{RawRecord, RawTable};
use crate::importer::schema::ImportSchema;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

// ==========================================
// StockImporter Trait
// ==========================================
// 用途: 导入主接口（异步，解析与校验在阻塞线程池执行）
// 实现者: StockImporterImpl
#[async_trait]
pub trait StockImporter: Send + Sync {
    /// 导入单个文件
    ///
    /// # 参数
    /// - file_path: .csv / .xlsx / .xls 文件路径
    ///
    /// # 返回
    /// - Ok(ImportBatch): 有效记录 + 行级问题（允许部分成功）
    /// - Err: 作业级错误（文件不可读、格式不支持、缺少必需列等）
    async fn import_file(&self, file_path: PathBuf) -> ImportResult<ImportBatch>;

    /// 批量导入多个文件（并发执行）
    ///
    /// # 说明
    /// - 每个文件的导入是独立的，互不影响
    /// - 返回顺序与输入顺序一致
    async fn batch_import(&self, file_paths: Vec<PathBuf>) -> Vec<ImportResult<ImportBatch>>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 1）
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser: Send + Sync {
    /// 解析文件为表头 + 原始行记录
    fn parse_to_raw_table(&self, file_path: &Path) -> ImportResult<RawTable>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 文本清洗接口（解析与映射阶段共用）
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 去除首尾空白（含不间断空格）
    fn clean_text(&self, value: &str) -> String;

    /// 表头清洗（额外去除 UTF-8 BOM）
    fn clean_header(&self, value: &str) -> String;

    /// 空白值标准化为 None
    fn normalize_null(&self, value: Option<&str>) -> Option<String>;

    /// 整行是否全部为空
    fn is_blank_record(&self, values: &[String]) -> bool;
}

// ==========================================
// DqValidator Trait
// ==========================================
// 用途: 表头结构校验接口（阶段 2）
// 实现者: DqValidator
pub trait DqValidator: Send + Sync {
    /// 将文件表头与模板字段对齐
    ///
    /// # 返回
    /// - Ok(HeaderMap): 字段名 → 实际表头
    /// - Err(ImportError::MissingColumns): 一次性列出全部缺失的必需列
    fn check_headers(&self, schema: &ImportSchema, headers: &[String]) -> ImportResult<HeaderMap>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 逐行校验与类型转换接口（阶段 3）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行记录转换为 Row
    ///
    /// # 返回
    /// - Ok(Row): 全部字段通过
    /// - Err(Vec<ImportIssue>): 该行的全部问题（非空）
    fn map_record(
        &self,
        schema: &ImportSchema,
        headers: &HeaderMap,
        record: &RawRecord,
    ) -> Result<Row, Vec<ImportIssue>>;
}

// ==========================================
// DerivationService Trait
// ==========================================
// 用途: 派生字段计算接口（阶段 4）
// 实现者: DerivationService
pub trait DerivationService: Send + Sync {
    /// 按模板的派生规则写入派生字段
    fn derive_fields(
        &self,
        schema: &ImportSchema,
        row: &mut Row,
        row_number: usize,
    ) -> Result<(), ImportIssue>;
}
