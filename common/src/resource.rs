//! リソース抽象
//!
//! 商品・カテゴリ・注文・スタッフを同じ一覧/フォーム処理で扱うためのトレイトと、
//! 検索述語・単一フィールド更新などの共通処理。

use crate::error::{Error, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// リソース種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Item,
    Category,
    Order,
    Worker,
}

impl ResourceKind {
    pub fn singular(&self) -> &'static str {
        match self {
            ResourceKind::Item => "item",
            ResourceKind::Category => "category",
            ResourceKind::Order => "order",
            ResourceKind::Worker => "worker",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Item => "items",
            ResourceKind::Category => "categories",
            ResourceKind::Order => "orders",
            ResourceKind::Worker => "workers",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.plural())
    }
}

/// サーバーが割り当てる不透明なID（数値/文字列どちらも来る）
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// コマンドライン引数などから生成（数字のみなら数値ID）
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        s.parse::<i64>()
            .map(RecordId::Int)
            .unwrap_or_else(|_| RecordId::Text(s.to_string()))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(n) => write!(f, "{}", n),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(n: i64) -> Self {
        RecordId::Int(n)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId::Text(s.to_string())
    }
}

/// CRUDエンドポイントで公開されるドメインレコード
pub trait Resource: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: ResourceKind;

    fn id(&self) -> &RecordId;

    /// 検索対象フィールド（値が無いものはNone）
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// 大文字小文字を区別しない部分一致
///
/// 空の検索語はすべてのレコードに一致する。
pub fn matches_search<R: Resource>(record: &R, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let needle = term.to_lowercase();
    record
        .search_fields()
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// レコードの1フィールドだけを差し替えたコピーを返す
///
/// `field` はJSON上の名前（camelCase）。存在しないフィールドはエラー。
pub fn patch_field<R: Resource>(record: &R, field: &str, value: serde_json::Value) -> Result<R> {
    let mut json = serde_json::to_value(record)?;
    let object = json
        .as_object_mut()
        .ok_or_else(|| Error::NotAnObject(R::KIND.singular().to_string()))?;

    match object.get_mut(field) {
        Some(slot) => *slot = value,
        None => {
            return Err(Error::UnknownField {
                kind: R::KIND.singular().to_string(),
                field: field.to_string(),
            })
        }
    }

    Ok(serde_json::from_value(json)?)
}
