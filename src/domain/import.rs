// ==========================================
// 纸品库存系统 - 导入领域对象
// ==========================================
// 职责: 行级问题 (ImportIssue) / 导入批次 (ImportBatch) / 汇总统计
// 红线: 行级问题是数据，不是 Err；只有作业级错误走 ImportError
// ==========================================

use crate::domain::row::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 导入作业状态
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobState {
    Created,   // 已选择文件
    Decoded,   // 已解析 + 表头校验通过
    Validated, // 逐行校验完成
    Failed,    // 作业级错误，整批放弃
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Created => write!(f, "CREATED"),
            JobState::Decoded => write!(f, "DECODED"),
            JobState::Validated => write!(f, "VALIDATED"),
            JobState::Failed => write!(f, "FAILED"),
        }
    }
}

// ==========================================
// 行级问题类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IssueKind {
    Required,
    InvalidInteger { value: String },
    InvalidDecimal { value: String },
    InvalidEnum { value: String, allowed: Vec<String> },
    InvalidDate { value: String },
    /// 派生字段计算溢出
    DerivationOverflow,
    /// 复合键重复，保留首次出现的行
    Duplicate { key: String, first_row: usize },
}

// ==========================================
// ImportIssue - 行级问题
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportIssue {
    pub row_number: usize, // 1 起始，不含表头
    pub field: Option<String>,
    pub kind: IssueKind,
}

impl ImportIssue {
    pub fn new(row_number: usize, field: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            row_number,
            field: Some(field.into()),
            kind,
        }
    }

    pub fn duplicate(row_number: usize, key: String, first_row: usize) -> Self {
        Self {
            row_number,
            field: None,
            kind: IssueKind::Duplicate { key, first_row },
        }
    }

    pub fn is_duplicate(&self) -> bool {
        matches!(self.kind, IssueKind::Duplicate { .. })
    }
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row = self.row_number;
        let field = self.field.as_deref().unwrap_or("-");
        match &self.kind {
            IssueKind::Required => write!(f, "第 {} 行: {} 为必填字段", row, field),
            IssueKind::InvalidInteger { value } => write!(
                f,
                "第 {} 行: {} 必须为非负整数，实际为 \"{}\"",
                row, field, value
            ),
            IssueKind::InvalidDecimal { value } => write!(
                f,
                "第 {} 行: {} 必须为非负数值，实际为 \"{}\"",
                row, field, value
            ),
            IssueKind::InvalidEnum { value, allowed } => write!(
                f,
                "第 {} 行: {} 取值必须为 {} 之一，实际为 \"{}\"",
                row,
                field,
                allowed.join(", "),
                value
            ),
            IssueKind::InvalidDate { value } => {
                write!(f, "第 {} 行: {} 日期格式无法识别: \"{}\"", row, field, value)
            }
            IssueKind::DerivationOverflow => {
                write!(f, "第 {} 行: {} 计算结果溢出", row, field)
            }
            IssueKind::Duplicate { key, first_row } => write!(
                f,
                "第 {} 行: 重复记录 (键 {}，首次出现于第 {} 行)，已跳过",
                row, key, first_row
            ),
        }
    }
}

// ==========================================
// ImportSummary - 导入汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ImportSummary {
    pub total_rows: usize,
    pub valid_rows: usize,
    pub failed_rows: usize,    // 校验未通过
    pub duplicate_rows: usize, // 重复被跳过
}

impl fmt::Display for ImportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "导入完成")?;
        writeln!(f, "处理记录总数: {}", self.total_rows)?;
        writeln!(f, "成功: {}", self.valid_rows)?;
        write!(f, "失败: {}", self.failed_rows + self.duplicate_rows)?;
        if self.failed_rows + self.duplicate_rows > 0 {
            write!(f, "\n\n请查看错误列表了解详情")?;
        }
        Ok(())
    }
}

// ==========================================
// ImportBatch - 待提交批次
// ==========================================
// 允许部分成功: valid_records 与 issues 可同时非空
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportBatch {
    pub job_id: String,
    pub source_file: String,
    pub schema_name: String,
    pub valid_records: Vec<Row>,
    pub issues: Vec<ImportIssue>,
    pub summary: ImportSummary,
}

impl ImportBatch {
    pub fn has_errors(&self) -> bool {
        !self.issues.is_empty()
    }

    pub fn duplicate_count(&self) -> usize {
        self.issues.iter().filter(|i| i.is_duplicate()).count()
    }

    /// 面向用户的错误列表
    ///
    /// 存在重复记录时，首条为重复汇总说明
    pub fn error_messages(&self) -> Vec<String> {
        render_issue_messages(&self.issues)
    }
}

/// 行级问题 → 用户可读消息（重复汇总在最前）
pub fn render_issue_messages(issues: &[ImportIssue]) -> Vec<String> {
    let mut messages = Vec::with_capacity(issues.len() + 1);
    let duplicates = issues.iter().filter(|i| i.is_duplicate()).count();
    if duplicates > 0 {
        messages.push(format!(
            "发现 {} 条重复记录已跳过，重复按复合键判定，保留首次出现的行",
            duplicates
        ));
    }
    messages.extend(issues.iter().map(|i| i.to_string()));
    messages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_messages_name_row_and_field() {
        let issue = ImportIssue::new(3, "Unit", IssueKind::Required);
        assert_eq!(issue.to_string(), "第 3 行: Unit 为必填字段");

        let dup = ImportIssue::duplicate(7, "PAPER001_2024-01-15".to_string(), 3);
        let msg = dup.to_string();
        assert!(msg.contains("第 7 行"));
        assert!(msg.contains("第 3 行"));
        assert!(msg.contains("PAPER001_2024-01-15"));
    }

    #[test]
    fn test_error_messages_lead_with_duplicate_summary() {
        let batch = ImportBatch {
            job_id: "job".to_string(),
            source_file: "stock.csv".to_string(),
            schema_name: "stock".to_string(),
            valid_records: vec![],
            issues: vec![
                ImportIssue::new(2, "GSM", IssueKind::InvalidInteger { value: "x".into() }),
                ImportIssue::duplicate(4, "K_2024-01-01".to_string(), 1),
            ],
            summary: ImportSummary::default(),
        };

        let messages = batch.error_messages();
        assert_eq!(messages.len(), 3);
        assert!(messages[0].contains("1 条重复记录"));
        assert!(messages[1].contains("GSM"));
    }

    #[test]
    fn test_summary_display() {
        let summary = ImportSummary {
            total_rows: 5,
            valid_rows: 3,
            failed_rows: 1,
            duplicate_rows: 1,
        };
        let text = summary.to_string();
        assert!(text.contains("处理记录总数: 5"));
        assert!(text.contains("成功: 3"));
        assert!(text.contains("失败: 2"));
    }
}
