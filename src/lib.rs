//! Plant Admin
//!
//! 植物ストア管理コンソールの中核。リソースごとのRESTクライアントと、
//! 一覧・フォーム・注文ステータスの画面ロジックを提供する。

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod controller;
pub mod display;
pub mod error;
pub mod logging;
pub mod page;
pub mod session;

pub use client::{ApiFailure, ResourceClient, StatusClient, SubmissionResult};
pub use controller::{FormWorkflow, ListController, StatusWorkflow};
pub use error::{AdminError, Result};
pub use page::ResourcePage;
pub use session::SessionContext;
