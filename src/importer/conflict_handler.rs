// ==========================================
// 纸品库存系统 - 重复记录处理器
// ==========================================
// 阶段 5: 文件内去重
// 规则: 复合键 = 主字段 + "_" + 规范化日期；按文件顺序首次出现者保留
// 红线: 重复行直接丢弃（不合并、不覆盖），并记录两个行号
// ==========================================

use crate::domain::{ImportIssue, Row};
use crate::importer::schema::DuplicateKeyRule;
use std::collections::HashMap;
use tracing::debug;

/// 计算复合去重键（日期字段已在映射阶段规范化为 YYYY-MM-DD）
pub fn composite_key(rule: &DuplicateKeyRule, row: &Row) -> String {
    format!(
        "{}_{}",
        row.value(&rule.primary_field).to_text(),
        row.value(&rule.date_field).to_text()
    )
}

// ==========================================
// DuplicateTracker - 已见键登记
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct DuplicateTracker {
    seen_keys: HashMap<String, usize>, // 键 → 首次出现行号
}

impl DuplicateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一行
    ///
    /// # 返回
    /// - Ok(()): 首次出现，已登记
    /// - Err(ImportIssue): 重复，问题中携带首次出现的行号
    pub fn register(
        &mut self,
        rule: &DuplicateKeyRule,
        row: &Row,
        row_number: usize,
    ) -> Result<(), ImportIssue> {
        let key = composite_key(rule, row);
        match self.seen_keys.get(&key) {
            Some(&first_row) => {
                debug!(row_number, first_row, key = %key, "检测到重复记录");
                Err(ImportIssue::duplicate(row_number, key, first_row))
            }
            None => {
                self.seen_keys.insert(key, row_number);
                Ok(())
            }
        }
    }

    pub fn len(&self) -> usize {
        self.seen_keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen_keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IssueKind;

    fn rule() -> DuplicateKeyRule {
        DuplicateKeyRule {
            primary_field: "ItemCode".to_string(),
            date_field: "Date".to_string(),
        }
    }

    fn row(code: &str, date: &str) -> Row {
        Row::new().with("ItemCode", code).with("Date", date)
    }

    #[test]
    fn test_composite_key() {
        assert_eq!(
            composite_key(&rule(), &row("PAPER001", "2024-01-15")),
            "PAPER001_2024-01-15"
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut tracker = DuplicateTracker::new();
        assert!(tracker.register(&rule(), &row("P1", "2024-01-15"), 3).is_ok());
        assert!(tracker.register(&rule(), &row("P1", "2024-01-16"), 5).is_ok());

        let issue = tracker
            .register(&rule(), &row("P1", "2024-01-15"), 7)
            .unwrap_err();
        assert_eq!(issue.row_number, 7);
        assert_eq!(
            issue.kind,
            IssueKind::Duplicate {
                key: "P1_2024-01-15".to_string(),
                first_row: 3
            }
        );
        assert_eq!(tracker.len(), 2);
    }
}
