//! reqwestによるリソースクライアント実装

use super::endpoints::{api_url, Endpoints, Method, Route, CATEGORY_NAMES_ROUTE, IMAGE_FIELD, ORDER_STATUS_ROUTE};
use super::outcome::{
    error_body_message, interpret_ack, ApiFailure, SubmissionResult, INVALID_FORMAT_MESSAGE, NO_RESPONSE_MESSAGE,
};
use super::{ResourceClient, StatusClient};
use crate::error::Result;
use async_trait::async_trait;
use plant_admin_common::{Category, ImageUpload, Order, OrderStatus, Payload, RecordId, Resource};
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::time::Duration;

/// 全リソースクライアントで共有する接続情報
#[derive(Debug, Clone)]
pub struct ApiContext {
    http: reqwest::Client,
    base_url: String,
}

impl ApiContext {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http, base_url))
    }

    /// 既存の [`reqwest::Client`] を使い回す
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// HTTP経由のリソースクライアント
pub struct HttpResourceClient<R> {
    ctx: ApiContext,
    endpoints: Endpoints,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> HttpResourceClient<R> {
    pub fn new(ctx: ApiContext) -> Self {
        Self {
            ctx,
            endpoints: Endpoints::for_kind(R::KIND),
            _marker: PhantomData,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    fn route(&self, route: Option<Route>, operation: &'static str) -> std::result::Result<Route, ApiFailure> {
        route.ok_or(ApiFailure::Unsupported {
            kind: R::KIND,
            operation,
        })
    }

    fn request(&self, route: &Route, id: Option<&RecordId>) -> reqwest::RequestBuilder {
        let url = api_url(&self.ctx.base_url, &route.path(id));
        tracing::debug!(kind = %R::KIND, method = ?route.method, %url, "API request");
        match route.method {
            Method::Get => self.ctx.http.get(url),
            Method::Post => self.ctx.http.post(url),
            Method::Put => self.ctx.http.put(url),
            Method::Delete => self.ctx.http.delete(url),
        }
    }

    async fn fetch_json<T: DeserializeOwned>(
        &self,
        route: &Route,
        id: Option<&RecordId>,
    ) -> std::result::Result<T, ApiFailure> {
        let response = ensure_success(send(self.request(route, id)).await?).await?;
        let body = response.text().await.map_err(transport_failure)?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(kind = %R::KIND, error = %e, "Undecodable response body");
            ApiFailure::Decoding(format!("{} ({})", INVALID_FORMAT_MESSAGE, e))
        })
    }

    /// 2xxなら本文を確認方式に従って解釈する
    async fn acknowledge(&self, route: &Route, builder: reqwest::RequestBuilder) -> SubmissionResult {
        let response = match send(builder).await {
            Ok(r) => r,
            Err(e) => return e.into(),
        };
        let response = match ensure_success(response).await {
            Ok(r) => r,
            Err(e) => return e.into(),
        };
        match response.text().await {
            Ok(body) => interpret_ack(route.ack, &body),
            Err(e) => transport_failure(e).into(),
        }
    }

    /// ペイロードをJSON文字列として1フィールドに載せ、画像があれば添付する
    fn multipart(&self, payload: &Payload, image: Option<&ImageUpload>) -> std::result::Result<Form, ApiFailure> {
        let json = serde_json::Value::Object(payload.clone()).to_string();
        let mut form = Form::new().text(self.endpoints.payload_field, json);

        if let Some(image) = image {
            let part = Part::bytes(image.bytes.clone())
                .file_name(image.file_name.clone())
                .mime_str(&image.mime)
                .map_err(|e| ApiFailure::Transport(format!("Invalid image type {}: {}", image.mime, e)))?;
            form = form.part(IMAGE_FIELD, part);
        }
        Ok(form)
    }

    async fn submit_multipart(
        &self,
        route: Route,
        id: Option<&RecordId>,
        payload: &Payload,
        image: Option<&ImageUpload>,
    ) -> SubmissionResult {
        let form = match self.multipart(payload, image) {
            Ok(f) => f,
            Err(e) => return e.into(),
        };
        tracing::debug!(kind = %R::KIND, has_image = image.is_some(), "Submitting multipart form");
        self.acknowledge(&route, self.request(&route, id).multipart(form)).await
    }
}

impl HttpResourceClient<Category> {
    /// 商品フォームのカテゴリ選択肢
    pub async fn names(&self) -> std::result::Result<Vec<String>, ApiFailure> {
        self.fetch_json(&CATEGORY_NAMES_ROUTE, None).await
    }
}

#[async_trait]
impl<R: Resource> ResourceClient<R> for HttpResourceClient<R> {
    async fn list(&self) -> std::result::Result<Vec<R>, ApiFailure> {
        let route = self.route(self.endpoints.list, "list")?;
        let value: serde_json::Value = self.fetch_json(&route, None).await?;

        if !value.is_array() {
            tracing::warn!(kind = %R::KIND, "Expected an array from the list endpoint");
            return Err(ApiFailure::Decoding(INVALID_FORMAT_MESSAGE.to_string()));
        }
        serde_json::from_value(value).map_err(|e| {
            tracing::warn!(kind = %R::KIND, error = %e, "Undecodable record in list");
            ApiFailure::Decoding(format!("{} ({})", INVALID_FORMAT_MESSAGE, e))
        })
    }

    async fn get_by_id(&self, id: &RecordId) -> std::result::Result<R, ApiFailure> {
        let route = self.route(self.endpoints.get, "get")?;
        self.fetch_json(&route, Some(id)).await
    }

    async fn create(&self, payload: &Payload, image: Option<&ImageUpload>) -> SubmissionResult {
        match self.route(self.endpoints.create, "create") {
            Ok(route) => self.submit_multipart(route, None, payload, image).await,
            Err(e) => e.into(),
        }
    }

    async fn update(&self, id: &RecordId, payload: &Payload, image: Option<&ImageUpload>) -> SubmissionResult {
        match self.route(self.endpoints.update, "update") {
            Ok(route) => self.submit_multipart(route, Some(id), payload, image).await,
            Err(e) => e.into(),
        }
    }

    async fn remove(&self, id: &RecordId) -> SubmissionResult {
        match self.route(self.endpoints.remove, "delete") {
            Ok(route) => self.acknowledge(&route, self.request(&route, Some(id))).await,
            Err(e) => e.into(),
        }
    }
}

#[async_trait]
impl StatusClient for HttpResourceClient<Order> {
    async fn update_status(&self, id: &RecordId, status: OrderStatus) -> SubmissionResult {
        let builder = self
            .request(&ORDER_STATUS_ROUTE, Some(id))
            .query(&[("status", status.as_str())]);
        self.acknowledge(&ORDER_STATUS_ROUTE, builder).await
    }
}

async fn send(builder: reqwest::RequestBuilder) -> std::result::Result<reqwest::Response, ApiFailure> {
    builder.send().await.map_err(transport_failure)
}

/// 非2xxを拒否として扱う（本文の `message` があれば優先）
async fn ensure_success(response: reqwest::Response) -> std::result::Result<reqwest::Response, ApiFailure> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::warn!(status = status.as_u16(), "API returned an error status");
    Err(ApiFailure::Rejected {
        status: Some(status.as_u16()),
        message: error_body_message(&body),
    })
}

fn transport_failure(e: reqwest::Error) -> ApiFailure {
    tracing::warn!(error = %e, "API request failed without a response");
    if e.is_connect() || e.is_timeout() || e.is_request() {
        ApiFailure::Transport(NO_RESPONSE_MESSAGE.to_string())
    } else {
        ApiFailure::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plant_admin_common::{Item, Worker};

    fn context() -> ApiContext {
        ApiContext::with_client(reqwest::Client::new(), "http://127.0.0.1:9/")
    }

    #[test]
    fn test_multipart_payload_field() {
        let client = HttpResourceClient::<Category>::new(context());
        assert_eq!(client.endpoints().payload_field, "category");

        let mut payload = Payload::new();
        payload.insert("name".into(), "Herbs".into());
        assert!(client.multipart(&payload, None).is_ok());
    }

    #[test]
    fn test_multipart_rejects_bad_mime() {
        let client = HttpResourceClient::<Item>::new(context());
        let image = ImageUpload {
            file_name: "fern.png".into(),
            mime: "not a mime".into(),
            bytes: vec![1, 2, 3],
        };
        assert!(matches!(client.multipart(&Payload::new(), Some(&image)), Err(ApiFailure::Transport(_))));
    }

    #[tokio::test]
    async fn test_unsupported_operation_is_local() {
        let client = HttpResourceClient::<Worker>::new(context());
        let result = client.create(&Payload::new(), None).await;
        assert_eq!(result.failure_message(), Some("workers do not support create"));

        let err = client.get_by_id(&RecordId::Int(1)).await.unwrap_err();
        assert!(matches!(err, ApiFailure::Unsupported { operation: "get", .. }));
    }
}
