// ==========================================
// 纸品库存系统 - 库存导入器实现
// ==========================================
// 职责: 组装导入管道，从文件到待提交批次
// 流程: 解析 → 表头校验 → 逐行映射 → 派生 → 去重 → 批次
// 并发: 解析与校验在 spawn_blocking 中执行；批量导入逐文件并发
// ==========================================

use crate::config::ImportConfigReader;
use crate::domain::ImportBatch;
use crate::importer::derivation::DerivationService as DerivationServiceImpl;
use crate::importer::dq_validator::DqValidator as DqValidatorImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::import_job::ImportJob;
use crate::importer::schema::ImportSchema;
use crate::importer::stock_importer_trait::{
    DerivationService, DqValidator, FieldMapper, FileParser, StockImporter,
};
use crate::perf::{record_rows, PerfGuard};
use futures::future::join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, instrument};

// ==========================================
// StockImporterImpl - 库存导入器实现
// ==========================================
pub struct StockImporterImpl<C>
where
    C: ImportConfigReader,
{
    // 配置读取器
    config: Arc<C>,

    // 导入模板
    schema: Arc<ImportSchema>,

    // 导入组件
    file_parser: Arc<dyn FileParser>,
    dq_validator: Arc<dyn DqValidator>,
    field_mapper: Arc<dyn FieldMapper>,
    derivation_service: Arc<dyn DerivationService>,
}

impl<C> Clone for StockImporterImpl<C>
where
    C: ImportConfigReader,
{
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            schema: Arc::clone(&self.schema),
            file_parser: Arc::clone(&self.file_parser),
            dq_validator: Arc::clone(&self.dq_validator),
            field_mapper: Arc::clone(&self.field_mapper),
            derivation_service: Arc::clone(&self.derivation_service),
        }
    }
}

impl<C> StockImporterImpl<C>
where
    C: ImportConfigReader + 'static,
{
    /// 创建新的 StockImporter 实例
    ///
    /// # 参数
    /// - config: 配置读取器
    /// - schema: 导入模板
    /// - file_parser: 文件解析器
    /// - dq_validator: 表头校验器
    /// - field_mapper: 字段映射器
    /// - derivation_service: 字段派生服务
    pub fn new(
        config: C,
        schema: ImportSchema,
        file_parser: Arc<dyn FileParser>,
        dq_validator: Arc<dyn DqValidator>,
        field_mapper: Arc<dyn FieldMapper>,
        derivation_service: Arc<dyn DerivationService>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            schema: Arc::new(schema),
            file_parser,
            dq_validator,
            field_mapper,
            derivation_service,
        }
    }

    /// 使用默认组件创建（解析器的空行策略取自配置）
    pub fn with_defaults(config: C, schema: ImportSchema) -> Self {
        let skip_blank_rows = config.get_skip_blank_rows();
        Self::new(
            config,
            schema,
            Arc::new(UniversalFileParser::new(skip_blank_rows)),
            Arc::new(DqValidatorImpl),
            Arc::new(FieldMapperImpl::new()),
            Arc::new(DerivationServiceImpl),
        )
    }

    pub fn schema(&self) -> &ImportSchema {
        &self.schema
    }

    /// 同步执行完整导入（调用方负责线程调度）
    #[instrument(skip(self, file_path), fields(schema = %self.schema.name))]
    pub fn import_file_blocking(&self, file_path: &Path) -> ImportResult<ImportBatch> {
        let _perf = PerfGuard::new("import_file");
        let mut job = ImportJob::new(file_path, Arc::clone(&self.schema));

        info!(
            job_id = %job.job_id(),
            file_path = %file_path.display(),
            "开始导入"
        );

        // === 步骤 1-2: 解析 + 表头校验 ===
        job.decode(
            self.file_parser.as_ref(),
            self.dq_validator.as_ref(),
            self.config.as_ref(),
        )?;

        // === 步骤 3-5: 逐行校验 + 派生 + 去重 ===
        job.validate(self.field_mapper.as_ref(), self.derivation_service.as_ref())?;

        let batch = job.into_batch()?;
        record_rows(batch.summary.total_rows);

        info!(
            job_id = %batch.job_id,
            valid = batch.summary.valid_rows,
            issues = batch.issues.len(),
            "导入完成"
        );
        Ok(batch)
    }
}

#[async_trait::async_trait]
impl<C> StockImporter for StockImporterImpl<C>
where
    C: ImportConfigReader + 'static,
{
    async fn import_file(&self, file_path: PathBuf) -> ImportResult<ImportBatch> {
        let importer = self.clone();
        tokio::task::spawn_blocking(move || importer.import_file_blocking(&file_path))
            .await
            .map_err(|e| {
                error!(error = %e, "导入任务异常终止");
                ImportError::InternalError(format!("导入任务异常终止: {}", e))
            })?
    }

    async fn batch_import(&self, file_paths: Vec<PathBuf>) -> Vec<ImportResult<ImportBatch>> {
        info!(file_count = file_paths.len(), "开始批量导入");

        let tasks = file_paths
            .into_iter()
            .map(|path| self.import_file(path));
        let results = join_all(tasks).await;

        let succeeded = results.iter().filter(|r| r.is_ok()).count();
        info!(
            succeeded,
            failed = results.len() - succeeded,
            "批量导入完成"
        );
        results
    }
}
