//! リソースクライアント
//!
//! 1種類のリソースに対する list / get / create / update / remove を
//! 型付きで提供する。UIやコントローラはエンドポイントの形を知らない。

pub mod endpoints;
mod http;
pub mod outcome;

pub use http::{ApiContext, HttpResourceClient};
pub use outcome::{ApiFailure, SubmissionResult, INVALID_FORMAT_MESSAGE, NO_RESPONSE_MESSAGE};

use async_trait::async_trait;
use plant_admin_common::{ImageUpload, Order, OrderStatus, Payload, RecordId, Resource};

/// リソース1種類分のCRUD呼び出し
///
/// どの操作も失敗を値で返し、パニックしない。
#[async_trait]
pub trait ResourceClient<R: Resource>: Send + Sync {
    async fn list(&self) -> Result<Vec<R>, ApiFailure>;

    async fn get_by_id(&self, id: &RecordId) -> Result<R, ApiFailure>;

    /// `image` がNoneのときは画像フィールド自体を送らない
    async fn create(&self, payload: &Payload, image: Option<&ImageUpload>) -> SubmissionResult;

    /// `image` がNoneなら既存画像はサーバー側で保持される
    async fn update(&self, id: &RecordId, payload: &Payload, image: Option<&ImageUpload>) -> SubmissionResult;

    async fn remove(&self, id: &RecordId) -> SubmissionResult;
}

/// 注文ステータス更新
#[async_trait]
pub trait StatusClient: ResourceClient<Order> {
    async fn update_status(&self, id: &RecordId, status: OrderStatus) -> SubmissionResult;
}
