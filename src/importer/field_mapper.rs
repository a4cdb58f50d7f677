// ==========================================
// 纸品库存系统 - 字段映射器实现
// ==========================================
// 阶段 3: 逐行校验 + 类型转换（原始文本 → Row）
// 红线: 一行中任何字段出错，整行不进入有效记录，并记录该行全部问题
// ==========================================

use crate::domain::coercion::{
    parse_calendar_date, parse_non_negative_decimal, parse_non_negative_integer, to_iso_date,
};
use crate::domain::{CellValue, ImportIssue, IssueKind, Row};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::dq_validator::HeaderMap;
use crate::importer::file_parser::RawRecord;
use crate::importer::schema::{FieldSpec, FieldType, ImportSchema};
use crate::importer::stock_importer_trait::{DataCleaner as _, FieldMapper as FieldMapperTrait};

#[derive(Debug, Clone, Default)]
pub struct FieldMapper {
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new() -> Self {
        Self::default()
    }

    /// 单字段类型转换
    fn coerce(&self, field: &FieldSpec, value: &str) -> Result<CellValue, IssueKind> {
        match &field.field_type {
            FieldType::Text => Ok(CellValue::text(value)),
            FieldType::Integer => parse_non_negative_integer(value)
                .map(CellValue::Integer)
                .ok_or_else(|| IssueKind::InvalidInteger {
                    value: value.to_string(),
                }),
            FieldType::Decimal => parse_non_negative_decimal(value)
                .map(CellValue::Decimal)
                .ok_or_else(|| IssueKind::InvalidDecimal {
                    value: value.to_string(),
                }),
            FieldType::Enum { values } => values
                .iter()
                .find(|allowed| allowed.eq_ignore_ascii_case(value))
                .map(|canonical| CellValue::text(canonical.as_str()))
                .ok_or_else(|| IssueKind::InvalidEnum {
                    value: value.to_string(),
                    allowed: values.clone(),
                }),
            FieldType::Date => parse_calendar_date(value)
                .map(|d| CellValue::text(to_iso_date(d)))
                .ok_or_else(|| IssueKind::InvalidDate {
                    value: value.to_string(),
                }),
        }
    }

    /// 可选字段缺失时的取值: 默认值 > 文本空串 > Null
    fn absent_value(&self, field: &FieldSpec) -> Result<CellValue, IssueKind> {
        match (&field.default_value, &field.field_type) {
            (Some(default), _) => self.coerce(field, default),
            (None, FieldType::Text) => Ok(CellValue::text("")),
            (None, _) => Ok(CellValue::Null),
        }
    }
}

impl FieldMapperTrait for FieldMapper {
    fn map_record(
        &self,
        schema: &ImportSchema,
        headers: &HeaderMap,
        record: &RawRecord,
    ) -> Result<Row, Vec<ImportIssue>> {
        let row_number = record.row_number;
        let mut row = Row::new();
        let mut issues = Vec::new();

        for field in &schema.fields {
            let raw = headers
                .header_for(&field.name)
                .and_then(|header| record.get(header));

            let result = match self.cleaner.normalize_null(raw) {
                Some(value) => self.coerce(field, &value),
                None if field.required => Err(IssueKind::Required),
                None => self.absent_value(field),
            };

            match result {
                Ok(value) => row.insert(field.name.clone(), value),
                Err(kind) => issues.push(ImportIssue::new(row_number, field.name.as_str(), kind)),
            }
        }

        if !issues.is_empty() {
            return Err(issues);
        }

        // 模板外的列原样透传（已去首尾空白）
        for header in headers.extra_headers() {
            let value = record.get(header).unwrap_or("");
            row.insert(header.clone(), CellValue::text(self.cleaner.clean_text(value)));
        }

        Ok(row)
    }
}
