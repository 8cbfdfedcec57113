//! ログイン必須画面のテスト

mod common;

use common::{item, Calls, FakeBackend};
use plant_admin::controller::ListState;
use plant_admin::session::{FileSession, InMemorySession, SessionContext};
use plant_admin::{AdminError, ResourcePage};
use plant_admin_common::Item;
use std::sync::Arc;
use tempfile::tempdir;

/// 未ログインではマウントできず、通信もしない
#[tokio::test]
async fn test_mount_requires_login() {
    let backend = Arc::new(FakeBackend::new(vec![item(1, "Rose", None)]));
    let session = InMemorySession::new(false);

    let result = ResourcePage::<Item, _>::open(&session, backend.clone()).await;
    assert!(matches!(result, Err(AdminError::NotAuthenticated)));
    assert_eq!(Calls::count(&backend.calls.list), 0);
}

/// ログイン済みなら一覧を取得して開く
#[tokio::test]
async fn test_open_loads_list() {
    let backend = Arc::new(FakeBackend::new(vec![item(1, "Rose", None)]));
    let session = InMemorySession::new(true);

    let page = ResourcePage::<Item, _>::open(&session, backend.clone()).await.unwrap();
    assert_eq!(page.state(), &ListState::Ready);
    assert_eq!(page.collection().len(), 1);
    assert!(page.is_mounted());
}

/// ログアウト後は再マウントできない
#[tokio::test]
async fn test_logout_blocks_next_mount() {
    let backend = Arc::new(FakeBackend::<Item>::new(Vec::new()));
    let session = InMemorySession::new(true);
    assert!(ResourcePage::<Item, _>::mount(&session, backend.clone()).is_ok());

    session.logout();
    assert!(ResourcePage::<Item, _>::mount(&session, backend).is_err());
}

/// ファイルに保存したセッションでも同じように判定される
#[tokio::test]
async fn test_file_session_guard() {
    let dir = tempdir().expect("Failed to create temp dir");
    let session = FileSession::at(dir.path().join("session.json"));
    let backend = Arc::new(FakeBackend::<Item>::new(Vec::new()));

    assert!(ResourcePage::<Item, _>::mount(&session, backend.clone()).is_err());

    session.login("admin").unwrap();
    assert!(ResourcePage::<Item, _>::mount(&session, backend).is_ok());
}
