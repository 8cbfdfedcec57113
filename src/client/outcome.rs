//! 呼び出し結果の正規化
//!
//! クライアント境界を越えるのは値だけ:
//! - 取得系は `Result<T, ApiFailure>`
//! - 変更系は [`SubmissionResult`]

use plant_admin_common::ResourceKind;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// 応答なし（接続不可・タイムアウト）の表示
pub const NO_RESPONSE_MESSAGE: &str = "No response from server. Please check if the server is running.";

/// 一覧が配列でなかった場合の表示
pub const INVALID_FORMAT_MESSAGE: &str = "Received invalid data format from server.";

/// 取得系の失敗
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiFailure {
    /// サーバーが拒否した（HTTPエラー、または成功フラグなし）
    #[error("{}", rejection_message(*status, message.as_deref()))]
    Rejected { status: Option<u16>, message: Option<String> },

    /// 応答が得られなかった
    #[error("{0}")]
    Transport(String),

    /// 応答を解釈できなかった
    #[error("{0}")]
    Decoding(String),

    #[error("{kind} do not support {operation}")]
    Unsupported { kind: ResourceKind, operation: &'static str },
}

/// メッセージの優先順位: サーバーのmessage → HTTPステータス → 汎用
fn rejection_message(status: Option<u16>, message: Option<&str>) -> String {
    match (message, status) {
        (Some(m), _) if !m.trim().is_empty() => m.to_string(),
        (_, Some(code)) => status_message(code),
        _ => "Request was rejected by the server".to_string(),
    }
}

/// HTTPステータスから作るメッセージ
pub fn status_message(status: u16) -> String {
    format!("Error ({status}): Request failed with status code {status}")
}

/// 変更系（作成・更新・削除・ステータス変更）の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionResult {
    Success { message: Option<String> },
    ServerRejected(String),
    TransportFailure(String),
}

impl SubmissionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success { .. })
    }

    /// 失敗時のメッセージ（成功ならNone）
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            SubmissionResult::Success { .. } => None,
            SubmissionResult::ServerRejected(m) | SubmissionResult::TransportFailure(m) => Some(m),
        }
    }

    /// サーバーが拒否理由を返さなかった場合の表示を差し替える
    pub fn with_fallback(self, fallback: &str) -> Self {
        match self {
            SubmissionResult::ServerRejected(m) if m.trim().is_empty() => {
                SubmissionResult::ServerRejected(fallback.to_string())
            }
            other => other,
        }
    }
}

impl From<ApiFailure> for SubmissionResult {
    fn from(failure: ApiFailure) -> Self {
        match failure {
            ApiFailure::Transport(m) => SubmissionResult::TransportFailure(m),
            ApiFailure::Rejected { status: None, message: None } => SubmissionResult::ServerRejected(String::new()),
            other => SubmissionResult::ServerRejected(other.to_string()),
        }
    }
}

/// 2xx応答の本文から成否を判定する方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AckStyle {
    /// `{"success": true, "message": ...}`
    SuccessFlag,
    /// `{"status": "success", "message": ...}`
    StatusField,
    /// 2xxなら成功（本文は任意）
    HttpStatus,
}

/// 応答本文のうち判定に使う部分
///
/// 型はサーバーによって揺れる（`status` が `"success"` の場合も `400` の場合もある）ので
/// JSON値のまま受け取り、使うときに型を確かめる。
#[derive(Debug, Default, Deserialize)]
struct AckBody {
    #[serde(default)]
    success: Option<Value>,
    #[serde(default)]
    status: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

impl AckBody {
    /// オブジェクトでない本文は空として扱う
    fn parse(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_default()
    }

    fn success_flag(&self) -> bool {
        matches!(self.success, Some(Value::Bool(true)))
    }

    fn status_is_success(&self) -> bool {
        self.status
            .as_ref()
            .and_then(Value::as_str)
            .is_some_and(|s| s.eq_ignore_ascii_case("success"))
    }

    fn message(&self) -> Option<String> {
        self.message
            .as_ref()
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// 2xx応答本文を解釈する
///
/// 本文がJSONでない場合は成功フラグなしとして扱う。
/// 拒否理由が無い場合は空文字列（呼び出し側で [`SubmissionResult::with_fallback`]）。
pub fn interpret_ack(style: AckStyle, body: &str) -> SubmissionResult {
    let ack = AckBody::parse(body);

    let accepted = match style {
        AckStyle::SuccessFlag => ack.success_flag(),
        AckStyle::StatusField => ack.status_is_success(),
        AckStyle::HttpStatus => true,
    };

    if accepted {
        SubmissionResult::Success { message: ack.message() }
    } else {
        SubmissionResult::ServerRejected(ack.message().unwrap_or_default())
    }
}

/// エラー応答本文から `message` を取り出す
pub fn error_body_message(body: &str) -> Option<String> {
    AckBody::parse(body).message().filter(|m| !m.trim().is_empty())
}
