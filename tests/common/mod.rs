//! テスト用のメモリ上バックエンド
//!
//! レコードを保持し、呼び出し回数を数え、失敗を差し込める。

#![allow(dead_code)]

use async_trait::async_trait;
use plant_admin::client::{ApiFailure, ResourceClient, StatusClient, SubmissionResult};
use plant_admin_common::{
    Category, ImageUpload, Item, Order, OrderStatus, Payload, RecordId, Resource,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct Calls {
    pub list: AtomicUsize,
    pub get: AtomicUsize,
    pub create: AtomicUsize,
    pub update: AtomicUsize,
    pub remove: AtomicUsize,
    pub status: AtomicUsize,
}

impl Calls {
    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub struct FakeBackend<R> {
    pub records: Mutex<Vec<R>>,
    pub calls: Calls,
    /// 次の一覧取得を失敗させる
    pub fail_list: Mutex<Option<ApiFailure>>,
    /// 変更系をこの結果で失敗させる
    pub fail_mutation: Mutex<Option<SubmissionResult>>,
    pub last_payload: Mutex<Option<(Payload, Option<ImageUpload>)>>,
    /// ステータス変更の応答を返さない
    pub stall_status: AtomicBool,
    next_id: AtomicUsize,
}

impl<R: Resource> FakeBackend<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            next_id: AtomicUsize::new(records.len() + 100),
            records: Mutex::new(records),
            calls: Calls::default(),
            fail_list: Mutex::new(None),
            fail_mutation: Mutex::new(None),
            last_payload: Mutex::new(None),
            stall_status: AtomicBool::new(false),
        }
    }

    pub fn fail_next_list(&self, failure: ApiFailure) {
        *self.fail_list.lock().unwrap() = Some(failure);
    }

    pub fn fail_mutations(&self, result: SubmissionResult) {
        *self.fail_mutation.lock().unwrap() = Some(result);
    }

    fn mutation_failure(&self) -> Option<SubmissionResult> {
        self.fail_mutation.lock().unwrap().clone()
    }

    /// ペイロードからレコードを作る（IDは採番）
    fn record_from(&self, payload: &Payload, id_field: &str) -> Option<R> {
        let mut json = payload.clone();
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as i64;
        json.insert(id_field.to_string(), id.into());
        serde_json::from_value(serde_json::Value::Object(json)).ok()
    }
}

fn id_field(kind: plant_admin_common::ResourceKind) -> &'static str {
    match kind {
        plant_admin_common::ResourceKind::Item => "itemId",
        _ => "id",
    }
}

#[async_trait]
impl<R: Resource> ResourceClient<R> for FakeBackend<R> {
    async fn list(&self) -> Result<Vec<R>, ApiFailure> {
        self.calls.list.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.fail_list.lock().unwrap().take() {
            return Err(failure);
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn get_by_id(&self, id: &RecordId) -> Result<R, ApiFailure> {
        self.calls.get.fetch_add(1, Ordering::SeqCst);
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or(ApiFailure::Rejected { status: Some(404), message: None })
    }

    async fn create(&self, payload: &Payload, image: Option<&ImageUpload>) -> SubmissionResult {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some((payload.clone(), image.cloned()));
        if let Some(failure) = self.mutation_failure() {
            return failure;
        }
        match self.record_from(payload, id_field(R::KIND)) {
            Some(record) => {
                self.records.lock().unwrap().push(record);
                SubmissionResult::Success { message: Some("Added".into()) }
            }
            None => SubmissionResult::ServerRejected(String::new()),
        }
    }

    async fn update(&self, id: &RecordId, payload: &Payload, image: Option<&ImageUpload>) -> SubmissionResult {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some((payload.clone(), image.cloned()));
        if let Some(failure) = self.mutation_failure() {
            return failure;
        }
        let mut records = self.records.lock().unwrap();
        let Some(slot) = records.iter_mut().find(|r| r.id() == id) else {
            return SubmissionResult::ServerRejected("Not found".into());
        };
        let mut json = serde_json::to_value(&*slot).unwrap();
        for (key, value) in payload {
            json[key] = value.clone();
        }
        *slot = serde_json::from_value(json).unwrap();
        SubmissionResult::Success { message: None }
    }

    async fn remove(&self, id: &RecordId) -> SubmissionResult {
        self.calls.remove.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.mutation_failure() {
            return failure;
        }
        self.records.lock().unwrap().retain(|r| r.id() != id);
        SubmissionResult::Success { message: Some("Deleted".into()) }
    }
}

#[async_trait]
impl StatusClient for FakeBackend<Order> {
    async fn update_status(&self, id: &RecordId, status: OrderStatus) -> SubmissionResult {
        self.calls.status.fetch_add(1, Ordering::SeqCst);
        if self.stall_status.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
        if let Some(failure) = self.mutation_failure() {
            return failure;
        }
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|r| &r.id == id) {
            Some(order) => {
                order.status = status;
                SubmissionResult::Success { message: None }
            }
            None => SubmissionResult::ServerRejected("Order not found".into()),
        }
    }
}

// ---- レコード生成 ----

pub fn item(id: i64, name: &str, description: Option<&str>) -> Item {
    Item {
        item_id: RecordId::Int(id),
        name: name.into(),
        description: description.map(Into::into),
        price: 10.0,
        quantity: 1,
        category: None,
        image: None,
    }
}

pub fn category(id: i64, name: &str) -> Category {
    Category {
        id: RecordId::Int(id),
        name: name.into(),
        description: None,
        image_base64: None,
    }
}

pub fn order(id: i64, first_name: &str, status: OrderStatus) -> Order {
    serde_json::from_value(serde_json::json!({
        "id": id,
        "firstName": first_name,
        "lastName": "Tanaka",
        "email": format!("{}@example.com", first_name.to_lowercase()),
        "orderDate": [2024, 3, 5, 14, 7, 0],
        "status": status,
        "itemsTotal": 20.0,
        "shippingCharges": 5.0,
        "orderTotal": 25.0,
        "items": [
            { "id": 1, "itemName": "Fern", "price": 10.0, "quantity": 2, "totalPrice": 20.0 }
        ]
    }))
    .unwrap()
}
