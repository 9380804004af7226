// cartflow/src/store/mod.rs

//! The remote cart store the session mirrors.
//!
//! The session only ever uses the four operations of [`CartStore`] and treats
//! each of them as independently fallible; nothing is assumed to be atomic
//! across calls.

use crate::models::CartItem;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;

pub use memory::InMemoryCartStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
  FetchAll,
  Insert,
  Delete,
  UpdateQuantity,
}

impl StoreOp {
  pub fn as_str(self) -> &'static str {
    match self {
      StoreOp::FetchAll => "fetch_all",
      StoreOp::Insert => "insert",
      StoreOp::Delete => "delete",
      StoreOp::UpdateQuantity => "update_quantity",
    }
  }
}

impl fmt::Display for StoreOp {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Error)]
pub enum StoreError {
  #[error("unknown product: {0}")]
  UnknownProduct(String),
  #[error("invalid quantity: {0}")]
  InvalidQuantity(i32),
  #[error("store rejected request: {0}")]
  Rejected(String),
  #[error(transparent)]
  Unexpected(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait CartStore: Send + Sync {
  /// All cart rows of `user_id`, joined with their products.
  async fn fetch_all(&self, user_id: Uuid) -> StoreResult<Vec<CartItem>>;

  /// Adds `quantity` of `product_id` to the user's cart. Whether a repeated
  /// insert grows the existing row or creates a second one is the store's
  /// own policy.
  async fn insert(&self, user_id: Uuid, product_id: &str, quantity: i32) -> StoreResult<()>;

  /// Deletes a cart row by its own id. Deleting a missing row is not an error.
  async fn delete(&self, item_id: Uuid) -> StoreResult<()>;

  async fn update_quantity(&self, item_id: Uuid, quantity: i32) -> StoreResult<()>;
}
