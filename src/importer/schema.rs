// ==========================================
// 纸品库存系统 - 导入模板定义
// ==========================================
// 职责: 描述一种上传文件的列、类型、派生与去重规则
// 预置: 库存导入 (stock)、耗材导入 (consumables)
// ==========================================

use crate::domain::types::HeaderMatching;
use crate::importer::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ==========================================
// FieldType - 字段类型
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldType {
    Text,
    Integer, // 非负整数
    Decimal, // 非负数值
    Enum { values: Vec<String> }, // 大小写不敏感，输出规范写法
    Date,    // 输出 YYYY-MM-DD
}

// ==========================================
// FieldSpec - 字段定义
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    pub required: bool,
    pub field_type: FieldType,
    pub default_value: Option<String>,
    pub example: Option<String>, // 模板示例值
}

impl FieldSpec {
    fn of(name: &str, field_type: FieldType) -> Self {
        Self {
            name: name.to_string(),
            required: false,
            field_type,
            default_value: None,
            example: None,
        }
    }

    pub fn text(name: &str) -> Self {
        Self::of(name, FieldType::Text)
    }

    pub fn integer(name: &str) -> Self {
        Self::of(name, FieldType::Integer)
    }

    pub fn decimal(name: &str) -> Self {
        Self::of(name, FieldType::Decimal)
    }

    pub fn enumeration(name: &str, values: &[&str]) -> Self {
        Self::of(
            name,
            FieldType::Enum {
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        )
    }

    pub fn date(name: &str) -> Self {
        Self::of(name, FieldType::Date)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: &str) -> Self {
        self.default_value = Some(value.to_string());
        self
    }

    pub fn example(mut self, value: &str) -> Self {
        self.example = Some(value.to_string());
        self
    }

    /// 枚举可选值（非枚举字段为空）
    pub fn enum_values(&self) -> &[String] {
        match &self.field_type {
            FieldType::Enum { values } => values,
            _ => &[],
        }
    }
}

// ==========================================
// 派生 / 去重规则
// ==========================================

/// 期末结存 = 期初 + 入库 - 出库（文件中的期末列一律重算）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClosingBalanceRule {
    pub closing_field: String,
    pub opening_field: String,
    pub inbound_field: String,
    pub outbound_field: String,
}

/// 复合去重键: primary + "_" + 规范化日期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateKeyRule {
    pub primary_field: String,
    pub date_field: String,
}

// ==========================================
// ImportSchema - 导入模板
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub header_matching: HeaderMatching,
    pub closing_rule: Option<ClosingBalanceRule>,
    pub duplicate_key: Option<DuplicateKeyRule>,
}

impl ImportSchema {
    /// 创建模板（字段名必须唯一）
    pub fn new(name: &str, fields: Vec<FieldSpec>) -> Result<Self, SchemaError> {
        let schema = Self {
            name: name.to_string(),
            fields,
            header_matching: HeaderMatching::Exact,
            closing_rule: None,
            duplicate_key: None,
        };
        schema.validate()?;
        Ok(schema)
    }

    pub fn with_header_matching(mut self, matching: HeaderMatching) -> Self {
        self.header_matching = matching;
        self
    }

    pub fn with_closing_rule(mut self, rule: ClosingBalanceRule) -> Result<Self, SchemaError> {
        self.closing_rule = Some(rule);
        self.validate()?;
        Ok(self)
    }

    pub fn with_duplicate_key(mut self, rule: DuplicateKeyRule) -> Result<Self, SchemaError> {
        self.duplicate_key = Some(rule);
        self.validate()?;
        Ok(self)
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }

    /// 模板自检
    ///
    /// # 规则
    /// - 字段名唯一
    /// - 枚举字段至少一个可选值
    /// - 期末规则的期初 / 入库 / 出库必须为整数字段；期末字段不得是模板字段
    /// - 去重规则的日期字段必须为日期字段
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField(field.name.clone()));
            }
            if matches!(&field.field_type, FieldType::Enum { values } if values.is_empty()) {
                return Err(SchemaError::EmptyEnum(field.name.clone()));
            }
        }

        if let Some(rule) = &self.closing_rule {
            for name in [&rule.opening_field, &rule.inbound_field, &rule.outbound_field] {
                self.expect_type(name, "integer", |t| matches!(t, FieldType::Integer))?;
            }
            if self.field(&rule.closing_field).is_some() {
                return Err(SchemaError::InvalidRuleField {
                    field: rule.closing_field.clone(),
                    expected: "derived".to_string(),
                });
            }
        }

        if let Some(rule) = &self.duplicate_key {
            if self.field(&rule.primary_field).is_none() {
                return Err(SchemaError::UnknownField(rule.primary_field.clone()));
            }
            self.expect_type(&rule.date_field, "date", |t| matches!(t, FieldType::Date))?;
        }

        Ok(())
    }

    fn expect_type(
        &self,
        name: &str,
        expected: &str,
        accepts: impl Fn(&FieldType) -> bool,
    ) -> Result<(), SchemaError> {
        let field = self
            .field(name)
            .ok_or_else(|| SchemaError::UnknownField(name.to_string()))?;
        if accepts(&field.field_type) {
            Ok(())
        } else {
            Err(SchemaError::InvalidRuleField {
                field: name.to_string(),
                expected: expected.to_string(),
            })
        }
    }

    // ==========================================
    // 预置模板
    // ==========================================

    /// 库存导入模板
    ///
    /// 必填: Date, ItemCode, ItemName, Unit；Unit ∈ {ream, sheet, kg}
    /// 去重: ItemCode + Date；ClosingStock 由期初 / 入库 / 出库重算
    pub fn stock() -> Self {
        Self {
            name: "stock".to_string(),
            fields: vec![
                FieldSpec::date("Date").required().example("2024-01-15"),
                FieldSpec::text("ItemCode").required().example("PAPER001"),
                FieldSpec::text("ItemName").required().example("A4 Copy Paper"),
                FieldSpec::text("Description").example("High quality copy paper"),
                FieldSpec::integer("GSM").default_value("0").example("80"),
                FieldSpec::text("Size").example("A4"),
                FieldSpec::text("Brand").example("JK Paper"),
                FieldSpec::text("Color").example("White"),
                FieldSpec::enumeration("Unit", &["ream", "sheet", "kg"])
                    .required()
                    .example("ream"),
                FieldSpec::integer("OpeningStock").default_value("0").example("100"),
                FieldSpec::integer("StockIn").default_value("0").example("50"),
                FieldSpec::integer("StockOut").default_value("0").example("20"),
                FieldSpec::text("Remark").example("Initial stock"),
            ],
            header_matching: HeaderMatching::Exact,
            closing_rule: Some(ClosingBalanceRule {
                closing_field: "ClosingStock".to_string(),
                opening_field: "OpeningStock".to_string(),
                inbound_field: "StockIn".to_string(),
                outbound_field: "StockOut".to_string(),
            }),
            duplicate_key: Some(DuplicateKeyRule {
                primary_field: "ItemCode".to_string(),
                date_field: "Date".to_string(),
            }),
        }
    }

    /// 耗材导入模板（表头大小写不敏感）
    pub fn consumables() -> Self {
        Self {
            name: "consumables".to_string(),
            fields: vec![
                FieldSpec::date("Date").required().example("2024-01-15"),
                FieldSpec::text("Sheet").example("Sheet001"),
                FieldSpec::text("Item").required().example("Sample Item"),
                FieldSpec::decimal("Qty").default_value("0").example("10"),
                FieldSpec::text("Unit").example("pcs"),
                FieldSpec::text("Remark").example("Sample remark"),
            ],
            header_matching: HeaderMatching::CaseInsensitive,
            closing_rule: None,
            duplicate_key: None,
        }
    }

    /// 按名称查找预置模板
    pub fn by_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "stock" => Some(Self::stock()),
            "consumables" => Some(Self::consumables()),
            _ => None,
        }
    }
}
