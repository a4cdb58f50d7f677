// ==========================================
// 纸品库存系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / BOM 去除 / NULL 标准化 / 空行判定
// 红线: 只做文本层面的规范化，不做类型转换
// ==========================================

use crate::importer::stock_importer_trait::DataCleaner as DataCleanerTrait;

const BOM: char = '\u{feff}';
const NBSP: char = '\u{a0}';

#[derive(Debug, Clone, Copy, Default)]
pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        value
            .trim_matches(|c: char| c.is_whitespace() || c == NBSP)
            .to_string()
    }

    fn clean_header(&self, value: &str) -> String {
        self.clean_text(value.trim_start_matches(BOM))
    }

    fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.map(|v| self.clean_text(v)).filter(|v| !v.is_empty())
    }

    fn is_blank_record(&self, values: &[String]) -> bool {
        values.iter().all(|v| self.clean_text(v).is_empty())
    }
}
