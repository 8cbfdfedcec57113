//! 注文ステータスのワークフロー
//!
//! サーバーで確定した変更だけを一覧（と詳細表示中の注文）へ反映する。
//! 遷移の制限はしない（どのステータスからどのステータスへも変更可）。

use super::list::ListController;
use crate::client::{ApiFailure, StatusClient, SubmissionResult};
use plant_admin_common::{Order, OrderStatus, RecordId};

/// ステータス変更を拒否したとき、サーバーが理由を返さなかった場合の表示
const STATUS_FALLBACK: &str = "Failed to update status";

#[derive(Debug, Default)]
pub struct StatusWorkflow {
    selected: Option<Order>,
    updating: bool,
}

impl StatusWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// 詳細表示中の注文
    pub fn selected(&self) -> Option<&Order> {
        self.selected.as_ref()
    }

    pub fn is_updating(&self) -> bool {
        self.updating
    }

    /// 注文を1件取得して詳細表示に入れる
    pub async fn view_order<C: StatusClient>(&mut self, client: &C, id: &RecordId) -> Result<&Order, ApiFailure> {
        let order = client.get_by_id(id).await.map_err(|e| {
            tracing::error!(%id, error = %e, "Failed to load order details");
            e
        })?;
        Ok(self.selected.insert(order))
    }

    /// 一覧の行をそのまま詳細表示に入れる（通信しない）
    pub fn select<C: StatusClient>(&mut self, list: &ListController<Order, C>, id: &RecordId) -> Option<&Order> {
        let order = list.find(id)?.clone();
        Some(self.selected.insert(order))
    }

    pub fn close_details(&mut self) {
        self.selected = None;
    }

    /// ステータス変更を開始する（変更中なら拒否）
    pub fn begin_update(&mut self) -> Result<(), String> {
        if self.updating {
            return Err("A status update is already in progress".to_string());
        }
        self.updating = true;
        Ok(())
    }

    /// サーバーの結果を反映する
    ///
    /// 受け付けられた場合は詳細表示中の注文と一覧の行の `status` を書き換える。
    /// 一覧に行が無くても書き込み自体は成功として扱う。
    /// 失敗時は何も変えずにメッセージを返す。
    pub fn finish_update<C: StatusClient>(
        &mut self,
        list: &mut ListController<Order, C>,
        id: &RecordId,
        status: OrderStatus,
        result: SubmissionResult,
    ) -> Result<(), String> {
        self.updating = false;

        match result.with_fallback(STATUS_FALLBACK) {
            SubmissionResult::Success { .. } => {
                tracing::info!(%id, %status, "Order status updated");
                if let Some(order) = self.selected.as_mut().filter(|o| &o.id == id) {
                    order.status = status;
                }
                if let Err(e) = list.apply_field_update(id, "status", serde_json::json!(status)) {
                    tracing::warn!(%id, error = %e, "Updated order is not in the loaded list");
                }
                Ok(())
            }
            SubmissionResult::ServerRejected(message) | SubmissionResult::TransportFailure(message) => {
                tracing::warn!(%id, %status, error = %message, "Order status update failed");
                Err(message)
            }
        }
    }

    /// ステータスを変更する
    ///
    /// 途中で破棄されても変更中フラグは戻る。
    pub async fn update_status<C: StatusClient>(
        &mut self,
        list: &mut ListController<Order, C>,
        id: &RecordId,
        status: OrderStatus,
    ) -> Result<(), String> {
        if status == OrderStatus::Unknown {
            return Err(format!("Cannot set order status to {}", status));
        }
        self.begin_update()?;

        let client = list.client().clone();
        let result = {
            let _reset = ClearOnDrop(&mut self.updating);
            client.update_status(id, status).await
        };

        self.finish_update(list, id, status, result)
    }
}

/// スコープを抜けたら（キャンセル時も）フラグを下ろす
struct ClearOnDrop<'a>(&'a mut bool);

impl Drop for ClearOnDrop<'_> {
    fn drop(&mut self) {
        *self.0 = false;
    }
}
