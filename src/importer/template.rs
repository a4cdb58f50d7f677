// ==========================================
// 纸品库存系统 - 导入模板文件生成
// ==========================================
// 职责: 按导入模板生成 CSV 样例（表头 + 一行示例）
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::{FieldSpec, FieldType, ImportSchema};
use csv::Writer;
use std::path::Path;

/// 字段示例值: 显式示例 > 按类型兜底
fn sample_value(field: &FieldSpec) -> String {
    if let Some(example) = &field.example {
        return example.clone();
    }
    match &field.field_type {
        FieldType::Text => String::new(),
        FieldType::Integer | FieldType::Decimal => "0".to_string(),
        FieldType::Enum { values } => values.first().cloned().unwrap_or_default(),
        FieldType::Date => "2024-01-15".to_string(),
    }
}

/// 生成 CSV 模板文本
pub fn template_csv(schema: &ImportSchema) -> ImportResult<String> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record(schema.fields.iter().map(|f| f.name.as_str()))?;
    writer.write_record(schema.fields.iter().map(sample_value))?;

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::InternalError(format!("模板写入失败: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ImportError::InternalError(format!("模板编码错误: {}", e)))
}

/// 将 CSV 模板写入文件
pub fn write_template(schema: &ImportSchema, path: &Path) -> ImportResult<()> {
    std::fs::write(path, template_csv(schema)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_template_header_and_sample() {
        let csv = template_csv(&ImportSchema::stock()).unwrap();
        let mut lines = csv.lines();

        assert_eq!(
            lines.next(),
            Some("Date,ItemCode,ItemName,Description,GSM,Size,Brand,Color,Unit,OpeningStock,StockIn,StockOut,Remark")
        );
        let sample = lines.next().unwrap();
        assert!(sample.starts_with("2024-01-15,PAPER001,A4 Copy Paper"));
        assert_eq!(lines.next(), None);
    }

    #[test]
    fn test_fallback_sample_values() {
        let field = FieldSpec::enumeration("Unit", &["kg", "ream"]);
        assert_eq!(sample_value(&field), "kg");
        assert_eq!(sample_value(&FieldSpec::integer("Qty")), "0");
    }
}
