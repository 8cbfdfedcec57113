//! ログイン状態
//!
//! 画面はグローバルなフラグを読まず、注入された [`SessionContext`] に問い合わせる。
//! 認証の検証はしない（ただの表示制御用フラグ）。

use crate::error::{AdminError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

pub trait SessionContext: Send + Sync {
    fn is_authenticated(&self) -> bool;
    fn logout(&self);
}

/// メモリ上のセッション（テストや埋め込み用）
#[derive(Debug, Default)]
pub struct InMemorySession {
    authenticated: AtomicBool,
}

impl InMemorySession {
    pub fn new(authenticated: bool) -> Self {
        Self {
            authenticated: AtomicBool::new(authenticated),
        }
    }

    pub fn login(&self) {
        self.authenticated.store(true, Ordering::SeqCst);
    }
}

impl SessionContext for InMemorySession {
    fn is_authenticated(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    fn logout(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
    }
}

/// 保存形式（キー名は管理画面のセッションストレージと同じ）
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub is_authenticated: bool,
    #[serde(default)]
    pub admin: Option<String>,
}

/// ファイルに保存するセッション（CLI用）
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    /// `~/.config/plant-admin/session.json`
    pub fn open() -> Result<Self> {
        let home = dirs::home_dir()
            .ok_or_else(|| AdminError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(Self::at(home.join(".config").join("plant-admin").join("session.json")))
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 読めない・壊れたファイルは未ログイン扱い
    pub fn state(&self) -> SessionState {
        std::fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn login(&self, admin: &str) -> Result<()> {
        self.write(&SessionState {
            is_authenticated: true,
            admin: Some(admin.to_string()),
        })
    }

    fn write(&self, state: &SessionState) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, serde_json::to_string_pretty(state)?)?;
        Ok(())
    }
}

impl SessionContext for FileSession {
    fn is_authenticated(&self) -> bool {
        self.state().is_authenticated
    }

    fn logout(&self) {
        if self.path.exists() {
            if let Err(e) = std::fs::remove_file(&self.path) {
                tracing::warn!(path = %self.path.display(), error = %e, "Failed to clear session file");
            }
        }
    }
}
