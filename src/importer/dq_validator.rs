// ==========================================
// 纸品库存系统 - 表头结构校验器
// ==========================================
// 阶段 2: 表头与模板字段对齐
// 红线: 缺少必需列时整批失败，且一次性列出全部缺失列
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::schema::ImportSchema;
use crate::importer::stock_importer_trait::DqValidator as DqValidatorTrait;
use std::collections::HashMap;
use tracing::{debug, warn};

// ==========================================
// HeaderMap - 字段名 → 文件实际表头
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMap {
    fields: HashMap<String, String>,
    extras: Vec<String>, // 模板未定义的列，原样透传
}

impl HeaderMap {
    pub fn header_for(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn extra_headers(&self) -> &[String] {
        &self.extras
    }

    pub fn matched_count(&self) -> usize {
        self.fields.len()
    }
}

pub struct DqValidator;

impl DqValidatorTrait for DqValidator {
    fn check_headers(&self, schema: &ImportSchema, headers: &[String]) -> ImportResult<HeaderMap> {
        let matching = schema.header_matching;
        let mut map = HeaderMap::default();

        for field in &schema.fields {
            if let Some(header) = headers.iter().find(|h| matching.matches(h, &field.name)) {
                map.fields.insert(field.name.clone(), header.clone());
            }
        }

        let missing: Vec<String> = schema
            .required_fields()
            .filter(|f| map.header_for(&f.name).is_none())
            .map(|f| f.name.clone())
            .collect();

        if !missing.is_empty() {
            warn!(schema = %schema.name, missing = ?missing, "缺少必需列");
            return Err(ImportError::MissingColumns { columns: missing });
        }

        map.extras = headers
            .iter()
            .filter(|h| !h.is_empty())
            .filter(|h| !schema.fields.iter().any(|f| matching.matches(h, &f.name)))
            .cloned()
            .collect();

        debug!(
            matched = map.matched_count(),
            extras = map.extras.len(),
            "表头校验通过"
        );
        Ok(map)
    }
}
