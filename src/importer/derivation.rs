// ==========================================
// 纸品库存系统 - 字段派生服务实现
// ==========================================
// 阶段 4: 派生字段计算
// 规则: 期末结存 = 期初 + 入库 - 出库（缺失按 0）
// 红线: 只使用已校验的整数值；文件自带的期末列一律覆盖
// ==========================================

use crate::domain::{CellValue, ImportIssue, IssueKind, Row};
use crate::importer::schema::{ClosingBalanceRule, ImportSchema};
use crate::importer::stock_importer_trait::DerivationService as DerivationServiceTrait;

pub struct DerivationService;

/// 计算期末结存，溢出返回 None
pub fn closing_balance(rule: &ClosingBalanceRule, row: &Row) -> Option<i64> {
    let int_of = |field: &str| row.get(field).and_then(CellValue::as_i64).unwrap_or(0);

    int_of(&rule.opening_field)
        .checked_add(int_of(&rule.inbound_field))?
        .checked_sub(int_of(&rule.outbound_field))
}

impl DerivationServiceTrait for DerivationService {
    fn derive_fields(
        &self,
        schema: &ImportSchema,
        row: &mut Row,
        row_number: usize,
    ) -> Result<(), ImportIssue> {
        let Some(rule) = &schema.closing_rule else {
            return Ok(());
        };

        match closing_balance(rule, row) {
            Some(closing) => {
                row.insert(rule.closing_field.clone(), CellValue::Integer(closing));
                Ok(())
            }
            None => Err(ImportIssue::new(
                row_number,
                rule.closing_field.as_str(),
                IssueKind::DerivationOverflow,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closing_stock_identity() {
        let schema = ImportSchema::stock();
        let mut row = Row::new()
            .with("OpeningStock", 100i64)
            .with("StockIn", 50i64)
            .with("StockOut", 20i64)
            .with("ClosingStock", "999");

        DerivationService.derive_fields(&schema, &mut row, 1).unwrap();
        assert_eq!(row.value("ClosingStock"), CellValue::Integer(130));
    }

    #[test]
    fn test_absent_movements_count_as_zero() {
        let schema = ImportSchema::stock();
        let mut row = Row::new().with("OpeningStock", 40i64);

        DerivationService.derive_fields(&schema, &mut row, 1).unwrap();
        assert_eq!(row.value("ClosingStock"), CellValue::Integer(40));
    }

    #[test]
    fn test_outbound_may_exceed_stock() {
        let schema = ImportSchema::stock();
        let mut row = Row::new().with("OpeningStock", 5i64).with("StockOut", 8i64);

        DerivationService.derive_fields(&schema, &mut row, 1).unwrap();
        assert_eq!(row.value("ClosingStock"), CellValue::Integer(-3));
    }

    #[test]
    fn test_overflow_reported_as_issue() {
        let schema = ImportSchema::stock();
        let mut row = Row::new()
            .with("OpeningStock", i64::MAX)
            .with("StockIn", 1i64);

        let issue = DerivationService
            .derive_fields(&schema, &mut row, 6)
            .unwrap_err();
        assert_eq!(issue.row_number, 6);
        assert_eq!(issue.kind, IssueKind::DerivationOverflow);
    }

    #[test]
    fn test_schema_without_rule_untouched() {
        let schema = ImportSchema::consumables();
        let mut row = Row::new().with("Qty", 2.5);
        DerivationService.derive_fields(&schema, &mut row, 1).unwrap();
        assert!(!row.contains_field("ClosingStock"));
    }
}
