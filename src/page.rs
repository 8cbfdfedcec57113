//! ログイン必須のリソース画面
//!
//! マウント時にセッションを確認し、画面が閉じられたら一覧コントローラを
//! アンマウントして遅れて届く結果を捨てさせる。

use crate::client::ResourceClient;
use crate::controller::ListController;
use crate::error::{AdminError, Result};
use plant_admin_common::Resource;
use std::ops::{Deref, DerefMut};
use std::sync::Arc;

pub struct ResourcePage<R: Resource, C: ResourceClient<R>> {
    list: ListController<R, C>,
}

impl<R: Resource, C: ResourceClient<R>> ResourcePage<R, C> {
    /// 未ログインなら [`AdminError::NotAuthenticated`]（ログイン画面へ戻す）
    pub fn mount(session: &dyn crate::session::SessionContext, client: Arc<C>) -> Result<Self> {
        if !session.is_authenticated() {
            tracing::info!(kind = %R::KIND, "Not logged in, refusing to open page");
            return Err(AdminError::NotAuthenticated);
        }
        Ok(Self {
            list: ListController::new(client),
        })
    }

    /// マウントして最初の一覧を取得する
    pub async fn open(session: &dyn crate::session::SessionContext, client: Arc<C>) -> Result<Self> {
        let mut page = Self::mount(session, client)?;
        page.list.refresh().await;
        Ok(page)
    }

    pub fn list(&self) -> &ListController<R, C> {
        &self.list
    }

    pub fn list_mut(&mut self) -> &mut ListController<R, C> {
        &mut self.list
    }
}

impl<R: Resource, C: ResourceClient<R>> Deref for ResourcePage<R, C> {
    type Target = ListController<R, C>;

    fn deref(&self) -> &Self::Target {
        &self.list
    }
}

impl<R: Resource, C: ResourceClient<R>> DerefMut for ResourcePage<R, C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.list
    }
}

impl<R: Resource, C: ResourceClient<R>> Drop for ResourcePage<R, C> {
    fn drop(&mut self) {
        self.list.unmount();
    }
}
