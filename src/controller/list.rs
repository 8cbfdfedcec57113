//! 一覧コントローラ
//!
//! 取得済みコレクションの唯一の所有者。検索語による絞り込みビューを常に
//! コレクションから導出し、取得・削除・単一フィールド更新のライフサイクルを持つ。
//!
//! 状態遷移: Idle → Loading → Ready / Error

use crate::client::{ApiFailure, ResourceClient, SubmissionResult};
use crate::error::{AdminError, Result};
use plant_admin_common::{matches_search, patch_field, RecordId, Resource};
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::Arc;

/// 削除をサーバーがメッセージなしで拒否したときの表示
pub const DELETE_FALLBACK: &str = "Deletion failed";

/// 一覧の状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListState {
    Idle,
    Loading,
    Ready,
    Error(String),
}

/// 表示用のビュー
#[derive(Debug)]
pub enum ListView<'a, R> {
    Idle,
    Loading,
    Ready(Vec<&'a R>),
    /// 再試行の導線を出す
    Error(&'a str),
}

/// 発行済みの再取得（発行順で最新のものだけが反映される）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct RefreshTicket {
    generation: u64,
}

pub struct ListController<R: Resource, C: ResourceClient<R>> {
    client: Arc<C>,
    state: ListState,
    records: Vec<R>,
    search_term: String,
    /// `records` 内の表示対象インデックス（昇順）
    visible: Vec<usize>,
    generation: u64,
    removing: HashSet<RecordId>,
    mounted: bool,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Resource, C: ResourceClient<R>> ListController<R, C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            state: ListState::Idle,
            records: Vec::new(),
            search_term: String::new(),
            visible: Vec::new(),
            generation: 0,
            removing: HashSet::new(),
            mounted: true,
            _marker: PhantomData,
        }
    }

    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    /// 取得済みコレクション（サーバー応答順）
    pub fn collection(&self) -> &[R] {
        &self.records
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// 絞り込みビュー（コレクションの部分列）
    pub fn filtered(&self) -> Vec<&R> {
        self.visible.iter().map(|&i| &self.records[i]).collect()
    }

    pub fn find(&self, id: &RecordId) -> Option<&R> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn view(&self) -> ListView<'_, R> {
        match &self.state {
            ListState::Idle => ListView::Idle,
            ListState::Loading => ListView::Loading,
            ListState::Ready => ListView::Ready(self.filtered()),
            ListState::Error(message) => ListView::Error(message),
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// 所有者がいなくなった。以降に届く結果はすべて捨てる
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.removing.clear();
    }

    pub fn is_removing(&self, id: &RecordId) -> bool {
        self.removing.contains(id)
    }

    // ---- 取得 ----

    /// 再取得を開始する（Loadingへ遷移）
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        self.generation += 1;
        self.state = ListState::Loading;
        RefreshTicket {
            generation: self.generation,
        }
    }

    /// 取得結果を反映する
    ///
    /// 後から発行された再取得がある場合やアンマウント後は何もしない（falseを返す）。
    /// 失敗時はコレクションを空にしてErrorへ遷移する。
    pub fn finish_refresh(&mut self, ticket: RefreshTicket, result: std::result::Result<Vec<R>, ApiFailure>) -> bool {
        if !self.mounted || ticket.generation != self.generation {
            tracing::debug!(kind = %R::KIND, ticket = ticket.generation, current = self.generation, "Discarding stale list response");
            return false;
        }

        match result {
            Ok(records) => {
                tracing::debug!(kind = %R::KIND, count = records.len(), "List loaded");
                self.records = records;
                self.state = ListState::Ready;
            }
            Err(failure) => {
                tracing::error!(kind = %R::KIND, error = %failure, "Failed to fetch list");
                self.records.clear();
                self.state = ListState::Error(failure.to_string());
            }
        }
        self.recompute();
        true
    }

    pub async fn refresh(&mut self) -> &ListState {
        let ticket = self.begin_refresh();
        let result = self.client.list().await;
        self.finish_refresh(ticket, result);
        &self.state
    }

    // ---- 検索 ----

    /// 検索語を設定してビューを再計算する（通信しない）
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.recompute();
    }

    fn recompute(&mut self) {
        let term = &self.search_term;
        self.visible = self
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| matches_search(*r, term))
            .map(|(i, _)| i)
            .collect();
    }

    // ---- 削除 ----

    pub fn begin_remove(&mut self, id: &RecordId) {
        self.removing.insert(id.clone());
    }

    /// 削除結果を反映する
    ///
    /// 成功ならそのレコードだけをコレクションから取り除く（再取得しない）。
    /// 失敗ならコレクションも状態も変えずにメッセージを返す。
    pub fn finish_remove(&mut self, id: &RecordId, result: SubmissionResult) -> std::result::Result<Option<String>, String> {
        if !self.mounted {
            return Err(format!("{} view is no longer open", R::KIND.singular()));
        }
        self.removing.remove(id);

        match result.with_fallback(DELETE_FALLBACK) {
            SubmissionResult::Success { message } => {
                self.records.retain(|r| r.id() != id);
                self.recompute();
                tracing::info!(kind = %R::KIND, %id, "Record deleted");
                Ok(message)
            }
            SubmissionResult::ServerRejected(message) | SubmissionResult::TransportFailure(message) => {
                tracing::warn!(kind = %R::KIND, %id, error = %message, "Delete failed");
                Err(message)
            }
        }
    }

    /// 1件削除（成功時はサーバーのメッセージ、失敗時はエラーメッセージ）
    pub async fn remove(&mut self, id: &RecordId) -> std::result::Result<Option<String>, String> {
        self.begin_remove(id);
        let result = self.client.remove(id).await;
        self.finish_remove(id, result)
    }

    // ---- 単一フィールド更新 ----

    /// サーバー確定後のローカル反映（再取得しない）
    pub fn apply_field_update(&mut self, id: &RecordId, field: &str, value: serde_json::Value) -> Result<()> {
        if !self.mounted {
            return Ok(());
        }
        let index = self
            .records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| AdminError::RecordNotFound {
                kind: R::KIND.plural().to_string(),
                id: id.to_string(),
            })?;

        let patched = patch_field(&self.records[index], field, value)?;
        self.records[index] = patched;
        self.recompute();
        Ok(())
    }
}
