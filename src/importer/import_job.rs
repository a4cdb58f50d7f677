// ==========================================
// 纸品库存系统 - 导入作业
// ==========================================
// 状态机: Created → Decoded → Validated；任一作业级错误 → Failed
// 职责: 持有单个文件一次导入的全部中间状态
// 红线: 校验只执行一次；作业放弃即丢弃，不做回滚
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::{
    render_issue_messages, ImportBatch, ImportIssue, ImportSummary, JobState, Row,
};
use crate::importer::conflict_handler::DuplicateTracker;
use crate::importer::dq_validator::HeaderMap;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::file_parser::{RawTable, UniversalFileParser};
use crate::importer::schema::ImportSchema;
use crate::importer::stock_importer_trait::{
    DerivationService, DqValidator, FieldMapper, FileParser,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct ImportJob {
    job_id: String,
    source_file: PathBuf,
    schema: Arc<ImportSchema>,
    raw: Option<(RawTable, HeaderMap)>,
    valid_records: Vec<Row>,
    issues: Vec<ImportIssue>,
    seen_keys: DuplicateTracker,
    failed_rows: usize,
    state: JobState,
}

impl ImportJob {
    /// 选择文件后创建作业
    pub fn new(source_file: impl Into<PathBuf>, schema: Arc<ImportSchema>) -> Self {
        Self {
            job_id: Uuid::new_v4().to_string(),
            source_file: source_file.into(),
            schema,
            raw: None,
            valid_records: Vec::new(),
            issues: Vec::new(),
            seen_keys: DuplicateTracker::new(),
            failed_rows: 0,
            state: JobState::Created,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn source_file(&self) -> &Path {
        &self.source_file
    }

    pub fn schema(&self) -> &ImportSchema {
        &self.schema
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn valid_records(&self) -> &[Row] {
        &self.valid_records
    }

    pub fn issues(&self) -> &[ImportIssue] {
        &self.issues
    }

    pub fn error_messages(&self) -> Vec<String> {
        render_issue_messages(&self.issues)
    }

    fn ensure_state(&self, expected: JobState) -> ImportResult<()> {
        if self.state == expected {
            Ok(())
        } else {
            Err(ImportError::InvalidState {
                expected: format!("{:?}", expected),
                actual: format!("{:?}", self.state),
            })
        }
    }

    fn fail(&mut self, err: ImportError) -> ImportError {
        warn!(job_id = %self.job_id, error = %err, "导入作业失败");
        self.state = JobState::Failed;
        err
    }

    // ==========================================
    // 阶段 1-2: 解析 + 表头校验
    // ==========================================

    /// 读取并解析文件
    ///
    /// # 检查顺序
    /// 文件存在 → 扩展名 → 大小上限 → 解析 → 非空 → 必需列
    pub fn decode(
        &mut self,
        parser: &dyn FileParser,
        validator: &dyn DqValidator,
        config: &dyn ImportConfigReader,
    ) -> ImportResult<()> {
        self.ensure_state(JobState::Created)?;

        match self.read_file(parser, config) {
            Ok(table) => self.load_raw(table, validator),
            Err(e) => Err(self.fail(e)),
        }
    }

    fn read_file(
        &self,
        parser: &dyn FileParser,
        config: &dyn ImportConfigReader,
    ) -> ImportResult<RawTable> {
        let path = self.source_file.as_path();

        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ImportError::FileNotFound(path.display().to_string()),
            _ => ImportError::from(e),
        })?;

        if !UniversalFileParser::is_supported(path) {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let max = config.get_max_file_size_bytes();
        if metadata.len() > max {
            return Err(ImportError::FileTooLarge {
                size: metadata.len(),
                max,
            });
        }

        parser.parse_to_raw_table(path)
    }

    /// 载入已解析的表（表头校验通过后进入 Decoded）
    pub fn load_raw(&mut self, table: RawTable, validator: &dyn DqValidator) -> ImportResult<()> {
        self.ensure_state(JobState::Created)?;

        if table.headers.is_empty() || table.is_empty() {
            return Err(self.fail(ImportError::EmptyFile));
        }

        match validator.check_headers(&self.schema, &table.headers) {
            Ok(header_map) => {
                info!(
                    job_id = %self.job_id,
                    total_rows = table.records.len(),
                    "文件解析完成"
                );
                self.raw = Some((table, header_map));
                self.state = JobState::Decoded;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    // ==========================================
    // 阶段 3-5: 逐行校验 + 派生 + 去重
    // ==========================================
    pub fn validate(
        &mut self,
        mapper: &dyn FieldMapper,
        derivation: &dyn DerivationService,
    ) -> ImportResult<()> {
        self.ensure_state(JobState::Decoded)?;

        let Some((table, header_map)) = self.raw.take() else {
            let err = ImportError::InternalError("作业缺少解析结果".to_string());
            return Err(self.fail(err));
        };

        let schema = Arc::clone(&self.schema);
        let mut valid_records = Vec::with_capacity(table.records.len());
        let mut issues = Vec::new();
        let mut failed_rows = 0;

        for record in &table.records {
            let row_number = record.row_number;

            let mut row = match mapper.map_record(&schema, &header_map, record) {
                Ok(row) => row,
                Err(row_issues) => {
                    debug!(row_number, count = row_issues.len(), "行校验未通过");
                    failed_rows += 1;
                    issues.extend(row_issues);
                    continue;
                }
            };

            if let Err(issue) = derivation.derive_fields(&schema, &mut row, row_number) {
                failed_rows += 1;
                issues.push(issue);
                continue;
            }

            if let Some(rule) = &schema.duplicate_key {
                if let Err(issue) = self.seen_keys.register(rule, &row, row_number) {
                    issues.push(issue);
                    continue;
                }
            }

            valid_records.push(row);
        }

        self.raw = Some((table, header_map));
        self.valid_records = valid_records;
        self.issues = issues;
        self.failed_rows = failed_rows;
        self.state = JobState::Validated;

        let summary = self.summary();
        info!(
            job_id = %self.job_id,
            total_rows = summary.total_rows,
            valid_rows = summary.valid_rows,
            failed_rows = summary.failed_rows,
            duplicate_rows = summary.duplicate_rows,
            "逐行校验完成"
        );
        Ok(())
    }

    pub fn summary(&self) -> ImportSummary {
        let total_rows = self
            .raw
            .as_ref()
            .map(|(table, _)| table.records.len())
            .unwrap_or(0);
        let duplicate_rows = self.issues.iter().filter(|i| i.is_duplicate()).count();

        ImportSummary {
            total_rows,
            valid_rows: self.valid_records.len(),
            failed_rows: self.failed_rows,
            duplicate_rows,
        }
    }

    /// 生成待提交批次（仅 Validated 状态）
    pub fn into_batch(self) -> ImportResult<ImportBatch> {
        self.ensure_state(JobState::Validated)?;
        let summary = self.summary();

        Ok(ImportBatch {
            job_id: self.job_id,
            source_file: self.source_file.display().to_string(),
            schema_name: self.schema.name.clone(),
            valid_records: self.valid_records,
            issues: self.issues,
            summary,
        })
    }
}
