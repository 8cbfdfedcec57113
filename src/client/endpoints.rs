//! リソースごとのエンドポイント定義
//!
//! パスはすべて `<backend>/api/` からの相対。`{id}` はレコードIDに置換される。

use super::outcome::AckStyle;
use plant_admin_common::{RecordId, ResourceKind};

/// HTTPメソッド（使うものだけ）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// 1操作分のルート
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub method: Method,
    pub template: &'static str,
    pub ack: AckStyle,
}

impl Route {
    const fn get(template: &'static str) -> Self {
        Self { method: Method::Get, template, ack: AckStyle::HttpStatus }
    }

    const fn with(method: Method, template: &'static str, ack: AckStyle) -> Self {
        Self { method, template, ack }
    }

    /// `{id}` を埋めた相対パス
    pub fn path(&self, id: Option<&RecordId>) -> String {
        match id {
            Some(id) => self.template.replace("{id}", &id.to_string()),
            None => self.template.to_string(),
        }
    }
}

/// リソース1種類分のエンドポイント表
#[derive(Debug, Clone, Copy)]
pub struct Endpoints {
    pub kind: ResourceKind,
    pub list: Option<Route>,
    pub get: Option<Route>,
    pub create: Option<Route>,
    pub update: Option<Route>,
    pub remove: Option<Route>,
    /// マルチパートでJSONを載せるフィールド名
    pub payload_field: &'static str,
}

/// 画像を載せるマルチパートのフィールド名
pub const IMAGE_FIELD: &str = "image";

/// 注文ステータス更新（`?status=` を付けて呼ぶ）
pub const ORDER_STATUS_ROUTE: Route = Route::with(Method::Put, "orders/admin/{id}/status", AckStyle::HttpStatus);

/// カテゴリ名一覧（商品フォームの選択肢）
pub const CATEGORY_NAMES_ROUTE: Route = Route::get("categories/categories");

impl Endpoints {
    pub fn for_kind(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Item => Self {
                kind,
                list: Some(Route::get("items/get-items")),
                get: Some(Route::get("items/get/{id}")),
                create: Some(Route::with(Method::Post, "items/add-item", AckStyle::SuccessFlag)),
                update: None,
                remove: Some(Route::with(Method::Delete, "items/delete/{id}", AckStyle::StatusField)),
                payload_field: "item",
            },
            ResourceKind::Category => Self {
                kind,
                list: Some(Route::get("categories/all")),
                get: Some(Route::get("categories/{id}")),
                create: Some(Route::with(Method::Post, "categories/add-category", AckStyle::SuccessFlag)),
                update: Some(Route::with(Method::Put, "categories/update/{id}", AckStyle::SuccessFlag)),
                remove: Some(Route::with(Method::Delete, "categories/delete/{id}", AckStyle::SuccessFlag)),
                payload_field: "category",
            },
            ResourceKind::Order => Self {
                kind,
                list: Some(Route::get("orders/admin/all")),
                get: Some(Route::get("orders/admin/{id}")),
                create: None,
                update: None,
                remove: None,
                payload_field: "order",
            },
            ResourceKind::Worker => Self {
                kind,
                list: Some(Route::get("worker/get-workers")),
                get: None,
                create: None,
                update: None,
                remove: Some(Route::with(Method::Delete, "worker/delete/{id}", AckStyle::HttpStatus)),
                payload_field: "worker",
            },
        }
    }
}

/// ベースURLと相対パスを結合（末尾スラッシュの有無はどちらも可）
pub fn api_url(base_url: &str, path: &str) -> String {
    format!("{}/api/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_path_fills_id() {
        let endpoints = Endpoints::for_kind(ResourceKind::Category);
        let update = endpoints.update.unwrap();
        assert_eq!(update.path(Some(&RecordId::Int(9))), "categories/update/9");
        assert_eq!(update.method, Method::Put);
        assert_eq!(ORDER_STATUS_ROUTE.path(Some(&RecordId::Int(3))), "orders/admin/3/status");
    }

    #[test]
    fn test_supported_operations() {
        let workers = Endpoints::for_kind(ResourceKind::Worker);
        assert!(workers.list.is_some());
        assert!(workers.create.is_none());
        assert!(workers.get.is_none());

        let items = Endpoints::for_kind(ResourceKind::Item);
        assert!(items.update.is_none());
        assert_eq!(items.remove.unwrap().ack, AckStyle::StatusField);
        assert_eq!(items.payload_field, "item");
    }

    #[test]
    fn test_api_url_join() {
        assert_eq!(api_url("http://localhost:8080/", "items/get-items"), "http://localhost:8080/api/items/get-items");
        assert_eq!(api_url("http://localhost:8080", "/worker/get-workers"), "http://localhost:8080/api/worker/get-workers");
    }
}
