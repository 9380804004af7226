// cartflow/src/cart/contexts.rs

//! Per-operation data the cart pipelines run on.
//! Each type keys its own pipeline in the session's registry.

use crate::cart::error::CartError;
use crate::cart::state::CartSessionState;
use crate::config::CartConfig;
use crate::core::ContextData;
use crate::identity::IdentityProvider;
use crate::models::CartItem;
use crate::notify::Notifier;
use crate::registry::PipelineRegistry;
use crate::store::CartStore;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use uuid::Uuid;

/// Everything a step needs to reach outside its own operation data.
#[derive(Clone)]
pub(crate) struct SessionHandle {
  pub store: Arc<dyn CartStore>,
  pub identity: Arc<dyn IdentityProvider>,
  pub notifier: Arc<dyn Notifier>,
  pub state: ContextData<CartSessionState>,
  pub pipelines: Arc<PipelineRegistry<CartError>>,
  /// Last refresh ticket handed out.
  pub refresh_seq: Arc<AtomicU64>,
  pub config: CartConfig,
}

pub(crate) struct RefreshCtxData {
  pub handle: SessionHandle,
  pub user_id: Option<Uuid>,
  pub ticket: u64,
  pub fetched: Option<Vec<CartItem>>,
}

pub(crate) struct AddToCartCtxData {
  pub handle: SessionHandle,
  pub user_id: Option<Uuid>,
  pub product_id: String,
  pub quantity: i32,
}

pub(crate) struct RemoveFromCartCtxData {
  pub handle: SessionHandle,
  pub user_id: Option<Uuid>,
  pub item_id: Uuid,
}

pub(crate) struct UpdateQuantityCtxData {
  pub handle: SessionHandle,
  pub user_id: Option<Uuid>,
  pub item_id: Uuid,
  pub quantity: i32,
}

pub(crate) struct ClearCartCtxData {
  pub handle: SessionHandle,
  pub user_id: Option<Uuid>,
  /// Captured from local `items` when the clear starts.
  pub item_ids: Vec<Uuid>,
}

/// Shared shape of the mutating operations, used by the common steps.
pub(crate) trait MutationCtx: Send + Sync + 'static {
  const AUTH_NOTICE: &'static str;
  const FAILURE_NOTICE: &'static str;
  const SUCCESS_NOTICE: Option<&'static str>;

  fn handle(&self) -> &SessionHandle;
  fn user_id(&self) -> Option<Uuid>;
}

macro_rules! impl_mutation_ctx {
  ($ty:ty, auth: $auth:expr, failure: $failure:expr, success: $success:expr) => {
    impl MutationCtx for $ty {
      const AUTH_NOTICE: &'static str = $auth;
      const FAILURE_NOTICE: &'static str = $failure;
      const SUCCESS_NOTICE: Option<&'static str> = $success;

      fn handle(&self) -> &SessionHandle {
        &self.handle
      }

      fn user_id(&self) -> Option<Uuid> {
        self.user_id
      }
    }
  };
}

impl_mutation_ctx!(
  AddToCartCtxData,
  auth: "Please sign in to add items to your cart",
  failure: "Failed to add item to cart",
  success: Some("Item added to cart")
);
impl_mutation_ctx!(
  RemoveFromCartCtxData,
  auth: "Please sign in to manage your cart",
  failure: "Failed to remove item from cart",
  success: Some("Item removed from cart")
);
impl_mutation_ctx!(
  UpdateQuantityCtxData,
  auth: "Please sign in to manage your cart",
  failure: "Failed to update quantity",
  success: None
);
impl_mutation_ctx!(
  ClearCartCtxData,
  auth: "Please sign in to manage your cart",
  failure: "Failed to clear cart",
  success: Some("Cart cleared")
);

pub(crate) const FETCH_FAILURE_MESSAGE: &str = "Failed to fetch cart items";
