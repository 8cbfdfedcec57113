//! 画面ロジック（UIに依存しない）
//!
//! - 一覧: 取得・検索・削除・単一フィールド更新
//! - フォーム: 検証・マルチパート送信・成功時の一覧再取得
//! - 注文ステータス: サーバー確定後の反映

pub mod form;
pub mod list;
pub mod status;

pub use form::{Draft, FormOutcome, FormState, FormTarget, FormWorkflow, ImagePreview, Submission};
pub use list::{ListController, ListState, ListView, RefreshTicket, DELETE_FALLBACK};
pub use status::StatusWorkflow;
