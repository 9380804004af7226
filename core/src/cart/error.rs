// cartflow/src/cart/error.rs

use crate::error::FlowError;
use crate::store::{StoreError, StoreOp};
use thiserror::Error;

/// Why a cart operation reported failure.
///
/// None of these leave the session in a broken state: `items` is only ever
/// replaced by a successful refresh, so after any failure the session still
/// shows the last good snapshot.
#[derive(Debug, Error)]
pub enum CartError {
  /// Attempted with nobody signed in. The store was not contacted.
  #[error("Authentication required")]
  AuthenticationRequired,

  #[error("Cart store '{op}' failed: {source}")]
  Store {
    op: StoreOp,
    #[source]
    source: StoreError,
  },

  /// Some deletes of a bulk clear failed. The ones that succeeded are not rolled back.
  #[error("Clearing the cart failed for {failed} of {attempted} items")]
  PartialClear { failed: usize, attempted: usize },

  #[error("Cart workflow error: {0}")]
  Workflow(#[from] FlowError),
}

impl CartError {
  pub(crate) fn store(op: StoreOp, source: StoreError) -> Self {
    CartError::Store { op, source }
  }

  pub fn is_authentication_required(&self) -> bool {
    matches!(self, CartError::AuthenticationRequired)
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;
