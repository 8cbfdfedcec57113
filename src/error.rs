use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("バックエンドURLが設定されていません。`plant-admin config --set-backend-url URL` または環境変数 PLANT_ADMIN_BACKEND_URL で設定してください")]
    MissingBackendUrl,

    #[error("ログインしていません。`plant-admin session login --admin NAME` を実行してください")]
    NotAuthenticated,

    #[error("{kind}にID {id} のレコードがありません")]
    RecordNotFound { kind: String, id: String },

    #[error("HTTPクライアント初期化エラー: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] plant_admin_common::Error),
}

pub type Result<T> = std::result::Result<T, AdminError>;
