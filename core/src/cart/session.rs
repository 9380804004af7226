// cartflow/src/cart/session.rs

use crate::cart::contexts::{
  AddToCartCtxData, ClearCartCtxData, RemoveFromCartCtxData, SessionHandle, UpdateQuantityCtxData,
};
use crate::cart::error::{CartError, CartResult};
use crate::cart::pipelines::register_cart_pipelines;
use crate::cart::state::{CartSessionState, SyncStatus};
use crate::cart::steps::run_refresh;
use crate::config::CartConfig;
use crate::core::ContextData;
use crate::identity::IdentityProvider;
use crate::models::CartItem;
use crate::notify::{Notifier, TracingNotifier};
use crate::registry::PipelineRegistry;
use crate::store::CartStore;
use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

/// Client-side controller for one user's cart.
///
/// The session is a projection of the remote store: every successful
/// mutation is followed by a full re-fetch, and `items` is only ever replaced
/// by a successful fetch. Operations return `Ok(())` on success and a
/// [`CartError`] otherwise; user-facing notices go to the [`Notifier`].
///
/// The identity provider must be ready before the session is built. Call
/// [`refresh`](Self::refresh) (or [`watch_identity`](Self::watch_identity))
/// to populate the cart.
pub struct CartSession {
  handle: SessionHandle,
}

impl CartSession {
  pub fn new(
    store: Arc<dyn CartStore>,
    identity: Arc<dyn IdentityProvider>,
    notifier: Arc<dyn Notifier>,
    config: CartConfig,
  ) -> CartResult<Self> {
    let pipelines = PipelineRegistry::<CartError>::new();
    register_cart_pipelines(&pipelines)?;

    Ok(Self {
      handle: SessionHandle {
        store,
        identity,
        notifier,
        state: ContextData::new(CartSessionState::default()),
        pipelines: Arc::new(pipelines),
        refresh_seq: Arc::new(AtomicU64::new(0)),
        config,
      },
    })
  }

  /// A session that logs its notices and uses the default configuration.
  pub fn with_defaults(store: Arc<dyn CartStore>, identity: Arc<dyn IdentityProvider>) -> CartResult<Self> {
    Self::new(store, identity, Arc::new(TracingNotifier), CartConfig::default())
  }

  pub fn current_user(&self) -> Option<Uuid> {
    self.handle.identity.current_user()
  }

  pub fn config(&self) -> &CartConfig {
    &self.handle.config
  }

  // --- Operations ---

  /// Re-fetches the cart for the current user, or empties it when nobody is
  /// signed in. On failure `items` is left as it was and `error` is set.
  #[instrument(name = "CartSession::refresh", skip(self), fields(user_id = ?self.current_user()))]
  pub async fn refresh(&self) -> CartResult<()> {
    run_refresh(&self.handle).await.map(|_| ())
  }

  /// Adds one unit of `product_id`.
  pub async fn add_one(&self, product_id: &str) -> CartResult<()> {
    self.add_to_cart(product_id, 1).await
  }

  /// Not idempotent: whether a repeat grows the existing line or adds a new
  /// one is up to the store.
  #[instrument(name = "CartSession::add_to_cart", skip(self), fields(user_id = ?self.current_user()))]
  pub async fn add_to_cart(&self, product_id: &str, quantity: i32) -> CartResult<()> {
    let ctx = ContextData::new(AddToCartCtxData {
      handle: self.handle.clone(),
      user_id: self.current_user(),
      product_id: product_id.to_string(),
      quantity,
    });
    self.run_operation(ctx).await
  }

  /// Removes a cart line by its row id (not the product id).
  #[instrument(name = "CartSession::remove_from_cart", skip(self), fields(user_id = ?self.current_user()))]
  pub async fn remove_from_cart(&self, item_id: Uuid) -> CartResult<()> {
    let ctx = ContextData::new(RemoveFromCartCtxData {
      handle: self.handle.clone(),
      user_id: self.current_user(),
      item_id,
    });
    self.run_operation(ctx).await
  }

  /// Sets a line's quantity. Zero or negative removes the line instead.
  #[instrument(name = "CartSession::update_quantity", skip(self), fields(user_id = ?self.current_user()))]
  pub async fn update_quantity(&self, item_id: Uuid, quantity: i32) -> CartResult<()> {
    if quantity <= 0 {
      debug!(%item_id, quantity, "Non-positive quantity, removing the line instead.");
      return self.remove_from_cart(item_id).await;
    }
    let ctx = ContextData::new(UpdateQuantityCtxData {
      handle: self.handle.clone(),
      user_id: self.current_user(),
      item_id,
      quantity,
    });
    self.run_operation(ctx).await
  }

  /// Deletes every line currently shown, concurrently. Fails as a whole if
  /// any delete fails, even though the others stay deleted.
  #[instrument(name = "CartSession::clear_cart", skip(self), fields(user_id = ?self.current_user()))]
  pub async fn clear_cart(&self) -> CartResult<()> {
    let ctx = ContextData::new(ClearCartCtxData {
      handle: self.handle.clone(),
      user_id: self.current_user(),
      item_ids: Vec::new(),
    });
    self.run_operation(ctx).await
  }

  async fn run_operation<TData>(&self, ctx: ContextData<TData>) -> CartResult<()>
  where
    TData: 'static + Send + Sync,
  {
    // A stopped run (empty clear) is a success.
    self.handle.pipelines.run(ctx).await.map(|_| ())
  }

  // --- Visibility ---

  pub fn set_open(&self, open: bool) {
    self.handle.state.write().is_open = open;
  }

  /// Flips visibility and returns the new value.
  pub fn toggle_open(&self) -> bool {
    self.handle.state.update(|state| {
      state.is_open = !state.is_open;
      state.is_open
    })
  }

  // --- Reads ---

  pub fn snapshot(&self) -> CartSessionState {
    self.handle.state.snapshot()
  }

  pub fn items(&self) -> Vec<CartItem> {
    self.handle.state.read().items.clone()
  }

  pub fn total_items(&self) -> i64 {
    self.handle.state.read().total_items
  }

  pub fn total_price_cents(&self) -> i64 {
    self.handle.state.read().total_price_cents
  }

  pub fn is_loading(&self) -> bool {
    self.handle.state.read().is_loading
  }

  pub fn error(&self) -> Option<String> {
    self.handle.state.read().error.clone()
  }

  pub fn is_open(&self) -> bool {
    self.handle.state.read().is_open
  }

  pub fn status(&self) -> SyncStatus {
    self.handle.state.read().status()
  }

  // --- Identity ---

  /// Spawns a task that refreshes the cart after every identity change:
  /// sign-in populates it, sign-out resets it. The task ends when the
  /// sending side of `rx` is dropped.
  pub fn watch_identity(self: &Arc<Self>, mut rx: watch::Receiver<Option<Uuid>>) -> JoinHandle<()> {
    let session = Arc::clone(self);
    tokio::spawn(async move {
      while rx.changed().await.is_ok() {
        let user_id = *rx.borrow_and_update();
        debug!(?user_id, "Identity changed, re-syncing cart.");
        if let Err(e) = session.refresh().await {
          warn!(error = %e, "Cart refresh after identity change failed.");
        }
      }
      debug!("Identity channel closed, stopping cart identity watch.");
    })
  }
}

impl std::fmt::Debug for CartSession {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CartSession")
      .field("user_id", &self.current_user())
      .field("state", &*self.handle.state.read())
      .field("config", &self.handle.config)
      .finish()
  }
}
