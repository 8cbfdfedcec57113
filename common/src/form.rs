//! フォーム定義
//!
//! リソースごとの入力フィールド・必須項目と、
//! 入力値（文字列）からJSONペイロードを組み立てる処理。

use crate::resource::ResourceKind;
use serde_json::{Map, Number, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// 送信ペイロード（JSON化されてマルチパートの1フィールドになる）
pub type Payload = Map<String, Value>;

/// 入力値の型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Decimal,
    Integer,
}

/// 入力フィールド定義
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    /// JSON上の名前
    pub name: &'static str,
    /// メッセージ用の表示名
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    const fn text(name: &'static str, label: &'static str, required: bool) -> Self {
        Self { name, label, kind: FieldKind::Text, required }
    }
}

/// 作成か更新か
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// フォーム検証エラー（送信前に確定し、サーバーには到達しない）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0}")]
    MissingRequired(String),

    #[error("{label} must be {expected}")]
    NotNumeric { label: &'static str, expected: &'static str },

    #[error("Unknown field: {0}")]
    UnknownField(String),
}

/// リソース×モードごとのフォーム
#[derive(Debug)]
pub struct FormSchema {
    pub kind: ResourceKind,
    pub mode: FormMode,
    pub fields: &'static [FieldSpec],
    /// サーバーがメッセージなしで拒否した場合の表示
    pub rejection_fallback: &'static str,
}

static ITEM_CREATE: FormSchema = FormSchema {
    kind: ResourceKind::Item,
    mode: FormMode::Create,
    fields: &[
        FieldSpec::text("name", "Name", true),
        FieldSpec::text("description", "Description", false),
        FieldSpec { name: "price", label: "Price", kind: FieldKind::Decimal, required: true },
        FieldSpec { name: "quantity", label: "Quantity", kind: FieldKind::Integer, required: true },
        FieldSpec::text("category", "Category", false),
    ],
    rejection_fallback: "Error in Product Adding",
};

static CATEGORY_CREATE: FormSchema = FormSchema {
    kind: ResourceKind::Category,
    mode: FormMode::Create,
    fields: &[
        FieldSpec::text("name", "Category name", true),
        FieldSpec::text("description", "Category description", false),
    ],
    rejection_fallback: "Error in Category Adding",
};

static CATEGORY_UPDATE: FormSchema = FormSchema {
    kind: ResourceKind::Category,
    mode: FormMode::Update,
    fields: &[
        FieldSpec::text("name", "Category name", true),
        FieldSpec::text("description", "description", true),
    ],
    rejection_fallback: "Update failed",
};

impl FormSchema {
    /// フォームを持たない組み合わせはNone
    pub fn lookup(kind: ResourceKind, mode: FormMode) -> Option<&'static FormSchema> {
        match (kind, mode) {
            (ResourceKind::Item, FormMode::Create) => Some(&ITEM_CREATE),
            (ResourceKind::Category, FormMode::Create) => Some(&CATEGORY_CREATE),
            (ResourceKind::Category, FormMode::Update) => Some(&CATEGORY_UPDATE),
            _ => None,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// 必須項目の不足をまとめたメッセージ
    ///
    /// 例: "Name, price and quantity are required" / "Category name is required"
    pub fn required_message(&self) -> String {
        let labels: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.required)
            .enumerate()
            .map(|(i, f)| if i == 0 { f.label.to_string() } else { f.label.to_lowercase() })
            .collect();

        match labels.as_slice() {
            [] => String::new(),
            [only] => format!("{} is required", only),
            [init @ .., last] => format!("{} and {} are required", init.join(", "), last),
        }
    }

    /// 入力値を検証してペイロードを組み立てる
    ///
    /// 必須項目が1つでも空（空白のみを含む）なら [`ValidationError::MissingRequired`]。
    /// テキストは入力のまま送り、前後の空白を落とすのは数値の解釈だけ。
    pub fn build_payload(&self, values: &BTreeMap<String, String>) -> Result<Payload, ValidationError> {
        if let Some(unknown) = values.keys().find(|k| self.field(k).is_none()) {
            return Err(ValidationError::UnknownField(unknown.clone()));
        }

        let value_of = |spec: &FieldSpec| values.get(spec.name).map(String::as_str).unwrap_or("");

        if self.fields.iter().any(|f| f.required && value_of(f).trim().is_empty()) {
            return Err(ValidationError::MissingRequired(self.required_message()));
        }

        let mut payload = Payload::new();
        for spec in self.fields {
            let text = value_of(spec);
            let raw = text.trim();
            let value = match spec.kind {
                FieldKind::Text => Value::String(text.to_string()),
                FieldKind::Decimal if raw.is_empty() => Value::Null,
                FieldKind::Integer if raw.is_empty() => Value::Null,
                FieldKind::Decimal => raw
                    .parse::<f64>()
                    .ok()
                    .and_then(Number::from_f64)
                    .map(Value::Number)
                    .ok_or(ValidationError::NotNumeric { label: spec.label, expected: "a number" })?,
                FieldKind::Integer => raw
                    .parse::<i64>()
                    .map(|n| Value::Number(n.into()))
                    .map_err(|_| ValidationError::NotNumeric { label: spec.label, expected: "a whole number" })?,
            };
            payload.insert(spec.name.to_string(), value);
        }
        Ok(payload)
    }
}

/// 添付画像（生バイト列のまま送る）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_required_messages() {
        let item = FormSchema::lookup(ResourceKind::Item, FormMode::Create).unwrap();
        assert_eq!(item.required_message(), "Name, price and quantity are required");

        let category = FormSchema::lookup(ResourceKind::Category, FormMode::Create).unwrap();
        assert_eq!(category.required_message(), "Category name is required");

        let update = FormSchema::lookup(ResourceKind::Category, FormMode::Update).unwrap();
        assert_eq!(update.required_message(), "Category name and description are required");
    }

    #[test]
    fn test_no_schema_for_orders_and_workers() {
        assert!(FormSchema::lookup(ResourceKind::Order, FormMode::Create).is_none());
        assert!(FormSchema::lookup(ResourceKind::Worker, FormMode::Update).is_none());
        assert!(FormSchema::lookup(ResourceKind::Item, FormMode::Update).is_none());
    }

    #[test]
    fn test_item_payload_types() {
        let schema = FormSchema::lookup(ResourceKind::Item, FormMode::Create).unwrap();
        let payload = schema
            .build_payload(&values(&[("name", "Fern"), ("price", "12.50"), ("quantity", "4")]))
            .expect("ペイロード生成失敗");

        assert_eq!(payload["name"], Value::from("Fern"));
        assert_eq!(payload["description"], Value::from(""));
        assert_eq!(payload["price"], Value::from(12.5));
        assert_eq!(payload["quantity"], Value::from(4));
        assert_eq!(payload["category"], Value::from(""));
    }

    #[test]
    fn test_text_sent_as_typed() {
        let category = FormSchema::lookup(ResourceKind::Category, FormMode::Create).unwrap();
        let payload = category
            .build_payload(&values(&[("name", "  Fern "), ("description", " shade\n")]))
            .unwrap();
        assert_eq!(payload["name"], Value::String("  Fern ".into()));
        assert_eq!(payload["description"], Value::String(" shade\n".into()));

        let err = category.build_payload(&values(&[("name", "   ")])).unwrap_err();
        assert_eq!(err, ValidationError::MissingRequired("Category name is required".into()));

        let item = FormSchema::lookup(ResourceKind::Item, FormMode::Create).unwrap();
        let payload = item
            .build_payload(&values(&[("name", "Fern"), ("price", " 4.5 "), ("quantity", " 2")]))
            .unwrap();
        assert_eq!(payload["price"], serde_json::json!(4.5));
        assert_eq!(payload["quantity"], serde_json::json!(2));
    }

    #[test]
    fn test_missing_required() {
        let schema = FormSchema::lookup(ResourceKind::Item, FormMode::Create).unwrap();
        let err = schema.build_payload(&values(&[("name", "Fern"), ("price", "  ")])).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequired("Name, price and quantity are required".to_string())
        );
    }

    #[test]
    fn test_not_numeric() {
        let schema = FormSchema::lookup(ResourceKind::Item, FormMode::Create).unwrap();
        let err = schema
            .build_payload(&values(&[("name", "Fern"), ("price", "cheap"), ("quantity", "1")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Price must be a number");

        let err = schema
            .build_payload(&values(&[("name", "Fern"), ("price", "1"), ("quantity", "1.5")]))
            .unwrap_err();
        assert_eq!(err.to_string(), "Quantity must be a whole number");
    }

    #[test]
    fn test_unknown_field() {
        let schema = FormSchema::lookup(ResourceKind::Category, FormMode::Create).unwrap();
        let err = schema.build_payload(&values(&[("name", "Herbs"), ("colour", "green")])).unwrap_err();
        assert_eq!(err, ValidationError::UnknownField("colour".to_string()));
    }
}
