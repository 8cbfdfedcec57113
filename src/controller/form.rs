//! フォーム送信ワークフロー
//!
//! 下書き（フィールド値＋任意の画像とプレビュー）を所有し、
//! 必須項目の検証 → マルチパート送信 → 成功時リセット＆一覧再取得 を行う。
//!
//! 状態遷移: Editing → Submitting → Succeeded / Failed

use super::list::ListController;
use crate::client::{ResourceClient, SubmissionResult};
use crate::display;
use plant_admin_common::{FormMode, FormSchema, ImageUpload, Payload, RecordId, Resource};
use std::collections::BTreeMap;
use std::marker::PhantomData;

/// 選択画像のローカルプレビュー（data URI）
///
/// 下書きが所有し、外からは借用としてだけ参照できる。
/// 破棄・差し替え時に無効化される。
#[derive(Debug, PartialEq, Eq)]
pub struct ImagePreview {
    src: Option<String>,
}

impl ImagePreview {
    fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            src: Some(display::data_uri(bytes)),
        }
    }

    fn from_stored(raw: &str) -> Self {
        Self {
            src: Some(display::image_src(Some(raw))),
        }
    }

    pub fn src(&self) -> Option<&str> {
        self.src.as_deref()
    }

    fn revoke(&mut self) {
        self.src = None;
    }
}

/// 編集中の下書き
#[derive(Debug, Default)]
pub struct Draft {
    fields: BTreeMap<String, String>,
    image: Option<ImageUpload>,
    preview: Option<ImagePreview>,
}

impl Draft {
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }

    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn preview(&self) -> Option<&ImagePreview> {
        self.preview.as_ref()
    }

    fn discard_preview(&mut self) {
        if let Some(preview) = self.preview.as_mut() {
            preview.revoke();
        }
        self.preview = None;
    }

    fn clear(&mut self) {
        for value in self.fields.values_mut() {
            value.clear();
        }
        self.image = None;
        self.discard_preview();
    }
}

impl Drop for Draft {
    fn drop(&mut self) {
        self.discard_preview();
    }
}

/// フォームの状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormState {
    Editing,
    Submitting,
    Succeeded,
    Failed(String),
}

/// 送信の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormOutcome {
    Succeeded { message: Option<String> },
    /// 送信前の検証で失敗（クライアントは呼ばれない）
    Invalid(String),
    Rejected(String),
    TransportFailed(String),
    /// 送信中の再送信
    Busy,
}

/// 送信対象
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormTarget {
    Create,
    Update(RecordId),
}

/// 検証済みで送信待ちの内容
#[derive(Debug, Clone)]
pub struct Submission {
    pub target: FormTarget,
    pub payload: Payload,
    pub image: Option<ImageUpload>,
}

impl Submission {
    pub async fn send<R: Resource, C: ResourceClient<R> + ?Sized>(&self, client: &C) -> SubmissionResult {
        match &self.target {
            FormTarget::Create => client.create(&self.payload, self.image.as_ref()).await,
            FormTarget::Update(id) => client.update(id, &self.payload, self.image.as_ref()).await,
        }
    }
}

pub struct FormWorkflow<R: Resource> {
    schema: &'static FormSchema,
    target: FormTarget,
    draft: Draft,
    state: FormState,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource> FormWorkflow<R> {
    /// 作成フォームを開く（フォームの無いリソースはNone）
    pub fn open_create() -> Option<Self> {
        let schema = FormSchema::lookup(R::KIND, FormMode::Create)?;
        Some(Self::open(schema, FormTarget::Create, Draft::default()))
    }

    /// 既存レコードの値を下書きに入れて更新フォームを開く
    pub fn open_update(record: &R) -> Option<Self> {
        let schema = FormSchema::lookup(R::KIND, FormMode::Update)?;
        let json = serde_json::to_value(record).ok()?;

        let mut draft = Draft::default();
        for spec in schema.fields {
            let value = match json.get(spec.name) {
                Some(serde_json::Value::String(s)) => s.clone(),
                Some(serde_json::Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            draft.fields.insert(spec.name.to_string(), value);
        }
        // 保存済み画像を初期プレビューにする
        draft.preview = stored_image(&json).map(ImagePreview::from_stored);

        Some(Self::open(schema, FormTarget::Update(record.id().clone()), draft))
    }

    fn open(schema: &'static FormSchema, target: FormTarget, mut draft: Draft) -> Self {
        for spec in schema.fields {
            draft.fields.entry(spec.name.to_string()).or_default();
        }
        Self {
            schema,
            target,
            draft,
            state: FormState::Editing,
            _marker: PhantomData,
        }
    }

    /// 閉じる（下書きは保存されずに破棄される）
    pub fn cancel(self) {}

    pub fn schema(&self) -> &'static FormSchema {
        self.schema
    }

    pub fn target(&self) -> &FormTarget {
        &self.target
    }

    pub fn state(&self) -> &FormState {
        &self.state
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn is_submitting(&self) -> bool {
        self.state == FormState::Submitting
    }

    /// フィールド値を設定する（送信中は無視）
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) -> bool {
        if self.is_submitting() || self.schema.field(name).is_none() {
            return false;
        }
        self.draft.fields.insert(name.to_string(), value.into());
        self.state = FormState::Editing;
        true
    }

    /// 画像を選択する。プレビューは即座に作られ、以前のものは無効化される
    pub fn select_image(&mut self, image: ImageUpload) -> Option<&ImagePreview> {
        if self.is_submitting() {
            return None;
        }
        self.draft.discard_preview();
        self.draft.preview = Some(ImagePreview::from_bytes(&image.bytes));
        self.draft.image = Some(image);
        self.draft.preview.as_ref()
    }

    pub fn clear_image(&mut self) {
        if !self.is_submitting() {
            self.draft.image = None;
            self.draft.discard_preview();
        }
    }

    // ---- 送信 ----

    /// 検証してSubmittingへ遷移する
    ///
    /// 検証エラーはFailedへ遷移して [`FormOutcome::Invalid`] を返す。
    pub fn begin_submit(&mut self) -> Result<Submission, FormOutcome> {
        if self.is_submitting() {
            return Err(FormOutcome::Busy);
        }

        let payload = match self.schema.build_payload(&self.draft.fields) {
            Ok(p) => p,
            Err(e) => {
                let message = e.to_string();
                tracing::debug!(kind = %R::KIND, error = %message, "Form validation failed");
                self.state = FormState::Failed(message.clone());
                return Err(FormOutcome::Invalid(message));
            }
        };

        self.state = FormState::Submitting;
        Ok(Submission {
            target: self.target.clone(),
            payload,
            image: self.draft.image.clone(),
        })
    }

    /// 送信結果を反映する
    ///
    /// 成功なら下書きを空に戻してプレビューを破棄。失敗なら下書きはそのまま。
    pub fn finish_submit(&mut self, result: SubmissionResult) -> FormOutcome {
        let result = result.with_fallback(self.schema.rejection_fallback);
        match result {
            SubmissionResult::Success { message } => {
                tracing::info!(kind = %R::KIND, target = ?self.target, "Form submitted");
                self.draft.clear();
                self.state = FormState::Succeeded;
                FormOutcome::Succeeded { message }
            }
            SubmissionResult::ServerRejected(message) => {
                tracing::warn!(kind = %R::KIND, error = %message, "Server rejected form");
                self.state = FormState::Failed(message.clone());
                FormOutcome::Rejected(message)
            }
            SubmissionResult::TransportFailure(message) => {
                tracing::error!(kind = %R::KIND, error = %message, "Form submission failed");
                self.state = FormState::Failed(message.clone());
                FormOutcome::TransportFailed(message)
            }
        }
    }

    /// 送信し、成功したら一覧を再取得する
    pub async fn submit<C: ResourceClient<R>>(
        &mut self,
        client: &C,
        list: Option<&mut ListController<R, C>>,
    ) -> FormOutcome {
        let submission = match self.begin_submit() {
            Ok(s) => s,
            Err(outcome) => return outcome,
        };
        let result = submission.send::<R, C>(client).await;
        let outcome = self.finish_submit(result);

        if let (FormOutcome::Succeeded { .. }, Some(list)) = (&outcome, list) {
            list.refresh().await;
        }
        outcome
    }
}

fn stored_image(json: &serde_json::Value) -> Option<&str> {
    ["imageBase64", "image"]
        .iter()
        .filter_map(|key| json.get(*key).and_then(|v| v.as_str()))
        .find(|s| !s.trim().is_empty())
}
