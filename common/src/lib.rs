//! Plant Admin Common Library
//!
//! 管理コンソール（CLI・組み込みホスト）で共有される型とユーティリティ

pub mod error;
pub mod form;
pub mod resource;
pub mod timestamp;
pub mod types;

pub use error::{Error, Result};
pub use form::{FieldKind, FieldSpec, FormMode, FormSchema, ImageUpload, Payload, ValidationError};
pub use resource::{matches_search, patch_field, RecordId, Resource, ResourceKind};
pub use timestamp::{DateParts, Timestamp, DATE_UNAVAILABLE};
pub use types::{Category, Item, Order, OrderLine, OrderStatus, Worker};
