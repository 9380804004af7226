// cartflow/examples/cart_walkthrough.rs

use cartflow::{
  CartConfig, CartError, CartSession, InMemoryCartStore, NoticeBuffer, Product, ProductCategory, SessionIdentity,
  StoreOp,
};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

fn print_cart(session: &CartSession) {
  let state = session.snapshot();
  info!(
    lines = state.items.len(),
    total_items = state.total_items,
    total_price_cents = state.total_price_cents,
    status = ?state.status(),
    "Cart"
  );
  for item in &state.items {
    info!("  {} x{} @ {} cents", item.product.name, item.quantity, item.product.price_cents);
  }
}

#[tokio::main]
async fn main() -> Result<(), CartError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();
  info!("--- Cart Walkthrough ---");

  let store = Arc::new(InMemoryCartStore::with_catalog([
    Product::new("beat-42", "Midnight Drive (Beat)", 2_999, ProductCategory::Beat),
    Product::new("merch-tee", "Logo Tee", 3_500, ProductCategory::Merch),
  ]));
  let identity = Arc::new(SessionIdentity::anonymous());
  let notices = Arc::new(NoticeBuffer::new());
  let session = Arc::new(CartSession::new(
    store.clone(),
    identity.clone(),
    notices.clone(),
    CartConfig::default(),
  )?);
  let watcher = session.watch_identity(identity.subscribe());

  // Nobody signed in yet.
  if let Err(e) = session.add_one("beat-42").await {
    warn!(error = %e, "Add rejected");
  }

  identity.sign_in(Uuid::new_v4());
  session.refresh().await?;
  session.add_to_cart("beat-42", 2).await?;
  session.add_one("merch-tee").await?;
  print_cart(&session);

  let tee = session
    .items()
    .into_iter()
    .find(|item| item.product_id == "merch-tee")
    .map(|item| item.id);
  if let Some(tee) = tee {
    session.update_quantity(tee, 3).await?;
  }
  print_cart(&session);

  store.fail_next(StoreOp::Insert, 1);
  if let Err(e) = session.add_one("beat-42").await {
    warn!(error = %e, "Add failed, cart unchanged");
  }
  print_cart(&session);

  session.clear_cart().await?;
  print_cart(&session);

  for notice in notices.drain() {
    info!(level = ?notice.level, "notice: {}", notice.message);
  }

  identity.sign_out();
  watcher.abort();
  Ok(())
}
