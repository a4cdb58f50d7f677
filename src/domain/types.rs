// ==========================================
// 纸品库存系统 - 领域类型定义
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 排序方向
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// 两态切换: asc ↔ desc
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

// ==========================================
// 列比较口径
// ==========================================
// Text: 小写文本字典序；Numeric: 数值比较（列声明保证数值类型）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    #[default]
    Text,
    Numeric,
}

// ==========================================
// 表头匹配方式
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeaderMatching {
    #[default]
    Exact,
    CaseInsensitive,
}

impl HeaderMatching {
    pub fn matches(self, header: &str, field_name: &str) -> bool {
        match self {
            HeaderMatching::Exact => header == field_name,
            HeaderMatching::CaseInsensitive => header.eq_ignore_ascii_case(field_name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_direction_two_state_cycle() {
        assert_eq!(SortDirection::Asc.flip(), SortDirection::Desc);
        assert_eq!(SortDirection::Asc.flip().flip(), SortDirection::Asc);
    }

    #[test]
    fn test_header_matching() {
        assert!(HeaderMatching::Exact.matches("Unit", "Unit"));
        assert!(!HeaderMatching::Exact.matches("unit", "Unit"));
        assert!(HeaderMatching::CaseInsensitive.matches("unit", "Unit"));
    }
}
