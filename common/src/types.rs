//! リソースレコードの型定義
//!
//! バックエンドのJSON（camelCase）に合わせた型:
//! - Item: 商品
//! - Category: カテゴリ
//! - Order / OrderLine: 注文と明細
//! - Worker: スタッフ

use crate::error::Error;
use crate::resource::{RecordId, Resource, ResourceKind};
use crate::timestamp::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 商品
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: RecordId,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub quantity: i64,

    #[serde(default)]
    pub category: Option<String>,

    /// Base64画像（data URIの場合もある）
    #[serde(default)]
    pub image: Option<String>,
}

impl Resource for Item {
    const KIND: ResourceKind = ResourceKind::Item;

    fn id(&self) -> &RecordId {
        &self.item_id
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), self.description.as_deref()]
    }
}

/// カテゴリ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: RecordId,

    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub image_base64: Option<String>,
}

impl Resource for Category {
    const KIND: ResourceKind = ResourceKind::Category;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.name.as_str()), self.description.as_deref()]
    }
}

/// 注文ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    /// 知らない値（表示のみ。送信先には指定できない）
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                Error::InvalidValue(format!(
                    "unknown order status: {}. Use PENDING, PROCESSING, SHIPPED, DELIVERED or CANCELLED",
                    s
                ))
            })
    }
}

/// 注文明細
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: RecordId,

    #[serde(default)]
    pub item_name: String,

    #[serde(default)]
    pub price: f64,

    #[serde(default)]
    pub quantity: i64,

    #[serde(default)]
    pub total_price: f64,
}

/// 注文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: RecordId,

    #[serde(default)]
    pub first_name: String,

    #[serde(default)]
    pub last_name: String,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub user_id: Option<RecordId>,

    #[serde(default)]
    pub user_email: Option<String>,

    #[serde(default)]
    pub contact_no: Option<String>,

    // 配送先
    #[serde(default)]
    pub street: Option<String>,

    #[serde(default)]
    pub city: Option<String>,

    #[serde(default)]
    pub state: Option<String>,

    #[serde(default)]
    pub zip_code: Option<String>,

    #[serde(default)]
    pub order_date: Option<Timestamp>,

    pub status: OrderStatus,

    #[serde(default)]
    pub items_total: f64,

    #[serde(default)]
    pub shipping_charges: f64,

    #[serde(default)]
    pub order_total: f64,

    #[serde(default)]
    pub items: Vec<OrderLine>,
}

impl Order {
    pub fn customer_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

impl Resource for Order {
    const KIND: ResourceKind = ResourceKind::Order;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![
            Some(self.first_name.as_str()),
            Some(self.last_name.as_str()),
            Some(self.email.as_str()),
            Some(self.status.as_str()),
        ]
    }
}

/// スタッフ
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Worker {
    pub id: RecordId,

    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub contact_no: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    /// 入社日
    #[serde(default)]
    pub djoined: Option<Timestamp>,
}

impl Resource for Worker {
    const KIND: ResourceKind = ResourceKind::Worker;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn search_fields(&self) -> Vec<Option<&str>> {
        vec![Some(self.email.as_str()), self.contact_no.as_deref(), self.address.as_deref()]
    }
}
