// tests/cart_session_tests.rs
mod common;

use cartflow::{
  CartError, CartSession, CartTotals, FixedIdentity, InMemoryCartStore, NoticeLevel, StoreOp, SyncStatus,
};
use common::*;
use serial_test::serial;
use std::sync::Arc;
use uuid::Uuid;

fn assert_totals_consistent(session: &CartSession) {
  let state = session.snapshot();
  assert_eq!(state.totals(), CartTotals::compute(&state.items));
}

// --- Refresh ---

#[tokio::test]
#[serial]
async fn refresh_with_empty_remote_cart_yields_zero_totals() {
  let h = Harness::signed_in();

  h.session.refresh().await.unwrap();

  let state = h.session.snapshot();
  assert!(state.items.is_empty());
  assert_eq!(state.total_items, 0);
  assert_eq!(state.total_price_cents, 0);
  assert!(!state.is_loading);
  assert_eq!(state.error, None);
  assert_eq!(h.store.calls(StoreOp::FetchAll), 1);
}

#[tokio::test]
#[serial]
async fn totals_match_items_after_every_refresh() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 2).await.unwrap();
  assert_totals_consistent(&h.session);

  h.session.add_to_cart(TEE, 3).await.unwrap();
  assert_totals_consistent(&h.session);

  h.session.add_one(GENESIS_NFT).await.unwrap();
  assert_totals_consistent(&h.session);
  assert_eq!(h.session.total_items(), 6);
  assert_eq!(
    h.session.total_price_cents(),
    2 * BEAT_42_PRICE + 3 * TEE_PRICE + GENESIS_NFT_PRICE
  );

  let tee = h.item_id_for(TEE);
  h.session.update_quantity(tee, 1).await.unwrap();
  assert_totals_consistent(&h.session);
  assert_eq!(h.session.total_items(), 4);
}

#[tokio::test]
#[serial]
async fn failed_refresh_keeps_previous_items_and_sets_error() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 1).await.unwrap();
  let before = h.session.items();
  h.notices.drain();

  h.store.fail_next(StoreOp::FetchAll, 1);
  let err = h.session.refresh().await.unwrap_err();

  assert!(matches!(err, CartError::Store { op: StoreOp::FetchAll, .. }));
  assert_eq!(h.session.items(), before);
  assert_eq!(h.session.error().as_deref(), Some("Failed to fetch cart items"));
  assert!(!h.session.is_loading());
  assert_eq!(h.session.status(), SyncStatus::Error);
  // A failed background fetch is not announced.
  assert!(h.notices.is_empty());

  h.session.refresh().await.unwrap();
  assert_eq!(h.session.error(), None);
  assert_eq!(h.session.status(), SyncStatus::Idle);
}

#[tokio::test]
#[serial]
async fn refresh_while_signed_out_empties_without_calling_the_store() {
  let h = Harness::signed_out();

  h.session.refresh().await.unwrap();

  assert!(h.session.items().is_empty());
  assert_eq!(h.store.total_calls(), 0);
}

// --- Add ---

#[tokio::test]
#[serial]
async fn add_to_cart_shows_the_line_after_refresh() {
  let h = Harness::signed_in();

  h.session.add_to_cart(BEAT_42, 2).await.unwrap();

  let items = h.session.items();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].product_id, BEAT_42);
  assert_eq!(items[0].quantity, 2);
  assert_eq!(items[0].product.price_cents, BEAT_42_PRICE);
  assert_eq!(h.session.total_price_cents(), 2 * BEAT_42_PRICE);
  assert_eq!(h.store.calls(StoreOp::Insert), 1);
  assert_eq!(h.store.calls(StoreOp::FetchAll), 1);

  let notices = h.notices.drain();
  assert_eq!(notices.len(), 1);
  assert_eq!(notices[0].level, NoticeLevel::Success);
  assert_eq!(notices[0].message, "Item added to cart");
}

#[tokio::test]
#[serial]
async fn adding_the_same_product_twice_grows_one_line() {
  let h = Harness::signed_in();

  h.session.add_one(BEAT_42).await.unwrap();
  h.session.add_one(BEAT_42).await.unwrap();

  let items = h.session.items();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].quantity, 2);
}

#[tokio::test]
#[serial]
async fn add_without_identity_notifies_and_never_calls_the_store() {
  let h = Harness::signed_out();
  let before = h.session.snapshot();

  let err = h.session.add_to_cart(BEAT_42, 1).await.unwrap_err();

  assert!(err.is_authentication_required());
  assert_eq!(h.store.total_calls(), 0);
  assert_eq!(h.session.snapshot(), before);

  let notices = h.notices.drain();
  assert_eq!(notices.len(), 1);
  assert_eq!(notices[0].level, NoticeLevel::Error);
  assert_eq!(notices[0].message, "Please sign in to add items to your cart");
}

#[tokio::test]
#[serial]
async fn failed_insert_reports_failure_and_keeps_items() {
  let h = Harness::signed_in();
  h.session.add_to_cart(TEE, 1).await.unwrap();
  let before = h.session.items();
  h.notices.drain();

  h.store.fail_next(StoreOp::Insert, 1);
  let err = h.session.add_to_cart(BEAT_42, 2).await.unwrap_err();

  assert!(matches!(err, CartError::Store { op: StoreOp::Insert, .. }));
  assert!(!h.session.is_loading());
  assert_eq!(h.session.error().as_deref(), Some("Failed to add item to cart"));
  assert_eq!(h.session.items(), before);

  let notices = h.notices.drain();
  assert_eq!(notices.len(), 1);
  assert_eq!(notices[0].level, NoticeLevel::Error);
  assert_eq!(notices[0].message, "Failed to add item to cart");
}

#[tokio::test]
#[serial]
async fn unknown_product_is_a_store_failure() {
  let h = Harness::signed_in();

  let err = h.session.add_to_cart("beat-9000", 1).await.unwrap_err();

  assert!(matches!(err, CartError::Store { op: StoreOp::Insert, .. }));
  assert!(h.session.items().is_empty());
}

#[tokio::test]
#[serial]
async fn mutation_succeeds_even_if_the_follow_up_refresh_fails() {
  let h = Harness::signed_in();
  h.store.fail_next(StoreOp::FetchAll, 1);

  h.session.add_to_cart(BEAT_42, 1).await.unwrap();

  // The row exists remotely, but the session still shows the last good snapshot.
  assert_eq!(h.store.row_count(h.user_id), 1);
  assert!(h.session.items().is_empty());
  assert_eq!(h.session.error().as_deref(), Some("Failed to fetch cart items"));
  assert!(!h.session.is_loading());

  h.session.refresh().await.unwrap();
  assert_eq!(h.session.items().len(), 1);
}

// --- Remove ---

#[tokio::test]
#[serial]
async fn removed_item_is_absent_after_refresh() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 1).await.unwrap();
  h.session.add_to_cart(TEE, 1).await.unwrap();
  let beat = h.item_id_for(BEAT_42);
  h.notices.drain();

  h.session.remove_from_cart(beat).await.unwrap();

  assert!(!h.session.snapshot().contains_item(beat));
  assert_eq!(h.session.items().len(), 1);
  assert_eq!(h.session.total_price_cents(), TEE_PRICE);
  assert_eq!(h.notices.drain()[0].message, "Item removed from cart");
}

#[tokio::test]
#[serial]
async fn removing_an_unknown_row_still_succeeds() {
  let h = Harness::signed_in();

  h.session.remove_from_cart(Uuid::new_v4()).await.unwrap();

  assert_eq!(h.store.calls(StoreOp::Delete), 1);
  assert!(h.session.items().is_empty());
}

#[tokio::test]
#[serial]
async fn remove_without_identity_uses_the_manage_notice() {
  let h = Harness::signed_out();

  let err = h.session.remove_from_cart(Uuid::new_v4()).await.unwrap_err();

  assert!(err.is_authentication_required());
  assert_eq!(h.notices.drain()[0].message, "Please sign in to manage your cart");
  assert_eq!(h.store.total_calls(), 0);
}

// --- Update ---

#[tokio::test]
#[serial]
async fn non_positive_quantity_behaves_like_remove() {
  for quantity in [0, -5] {
    let h = Harness::signed_in();
    h.session.add_to_cart(BEAT_42, 2).await.unwrap();
    let beat = h.item_id_for(BEAT_42);
    h.notices.drain();

    h.session.update_quantity(beat, quantity).await.unwrap();

    assert_eq!(h.store.calls(StoreOp::UpdateQuantity), 0, "quantity {}", quantity);
    assert_eq!(h.store.calls(StoreOp::Delete), 1, "quantity {}", quantity);
    assert!(h.session.items().is_empty());
    assert_eq!(h.notices.drain()[0].message, "Item removed from cart");
  }
}

#[tokio::test]
#[serial]
async fn sequential_updates_leave_the_last_quantity() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 1).await.unwrap();
  let beat = h.item_id_for(BEAT_42);
  h.notices.drain();

  h.session.update_quantity(beat, 3).await.unwrap();
  h.session.update_quantity(beat, 5).await.unwrap();

  let items = h.session.items();
  assert_eq!(items.len(), 1);
  assert_eq!(items[0].quantity, 5);
  assert_eq!(h.session.total_price_cents(), 5 * BEAT_42_PRICE);
  // Plain quantity changes are silent.
  assert!(h.notices.is_empty());
}

#[tokio::test]
#[serial]
async fn failed_update_notifies_and_keeps_the_old_quantity() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 2).await.unwrap();
  let beat = h.item_id_for(BEAT_42);
  h.notices.drain();

  h.store.fail_next(StoreOp::UpdateQuantity, 1);
  let err = h.session.update_quantity(beat, 4).await.unwrap_err();

  assert!(matches!(err, CartError::Store { op: StoreOp::UpdateQuantity, .. }));
  assert_eq!(h.session.items()[0].quantity, 2);
  assert_eq!(h.session.error().as_deref(), Some("Failed to update quantity"));
  assert_eq!(h.notices.drain()[0].message, "Failed to update quantity");
}

// --- Clear ---

#[tokio::test]
#[serial]
async fn clearing_an_empty_cart_is_a_no_op() {
  let h = Harness::signed_in();
  h.session.refresh().await.unwrap();
  let before = h.session.snapshot();
  let calls_before = h.store.total_calls();

  h.session.clear_cart().await.unwrap();

  assert_eq!(h.store.total_calls(), calls_before);
  assert_eq!(h.session.snapshot(), before);
  assert!(h.notices.is_empty());
}

#[tokio::test]
#[serial]
async fn clear_deletes_every_line() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 1).await.unwrap();
  h.session.add_to_cart(TEE, 2).await.unwrap();
  h.session.add_to_cart(GENESIS_NFT, 1).await.unwrap();
  h.notices.drain();

  h.session.clear_cart().await.unwrap();

  assert_eq!(h.store.calls(StoreOp::Delete), 3);
  assert_eq!(h.store.row_count(h.user_id), 0);
  assert!(h.session.items().is_empty());
  assert_eq!(h.session.total_items(), 0);
  assert_eq!(h.notices.drain()[0].message, "Cart cleared");
}

#[tokio::test]
#[serial]
async fn partial_clear_failure_is_reported_without_rollback() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 1).await.unwrap();
  h.session.add_to_cart(TEE, 1).await.unwrap();
  let stuck = h.item_id_for(TEE);
  h.store.fail_deletes_of(stuck);
  h.notices.drain();

  let err = h.session.clear_cart().await.unwrap_err();

  assert!(matches!(err, CartError::PartialClear { failed: 1, attempted: 2 }));
  assert_eq!(h.store.row_count(h.user_id), 1);
  assert_eq!(h.session.error().as_deref(), Some("Failed to clear cart"));
  assert!(!h.session.is_loading());
  // No refresh after a failed clear, so the session still shows both lines.
  assert_eq!(h.session.items().len(), 2);
  assert_eq!(h.notices.drain()[0].message, "Failed to clear cart");

  h.session.refresh().await.unwrap();
  let remaining = h.session.items();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].id, stuck);
}

// --- Visibility ---

#[tokio::test]
#[serial]
async fn visibility_is_independent_of_data_operations() {
  let h = Harness::signed_in();
  assert!(!h.session.is_open());

  h.session.set_open(true);
  h.session.add_to_cart(BEAT_42, 1).await.unwrap();
  assert!(h.session.is_open());

  h.store.fail_next(StoreOp::FetchAll, 1);
  let _ = h.session.refresh().await;
  assert!(h.session.is_open());

  assert!(!h.session.toggle_open());
  assert!(h.session.toggle_open());
  h.session.set_open(true);
  assert!(h.session.is_open());
  assert_eq!(h.store.total_calls(), 3);
}

// --- Identity ---

#[tokio::test]
#[serial]
async fn sign_out_resets_cart_state() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 2).await.unwrap();
  h.session.set_open(true);
  assert!(!h.session.items().is_empty());

  h.identity.sign_out();
  h.session.refresh().await.unwrap();

  let state = h.session.snapshot();
  assert!(state.items.is_empty());
  assert_eq!(state.total_items, 0);
  assert_eq!(state.total_price_cents, 0);
  assert_eq!(state.error, None);
  assert!(!state.is_loading);
  assert!(state.is_open);
  // Remote rows are untouched; only the local projection is reset.
  assert_eq!(h.store.row_count(h.user_id), 1);
}

#[tokio::test]
#[serial]
async fn sign_out_also_clears_a_stale_error() {
  let h = Harness::signed_in();
  h.store.fail_next(StoreOp::FetchAll, 1);
  let _ = h.session.refresh().await;
  assert!(h.session.error().is_some());

  h.identity.sign_out();
  h.session.refresh().await.unwrap();

  assert_eq!(h.session.error(), None);
}

#[tokio::test]
#[serial]
async fn sessions_for_different_users_see_only_their_own_rows() {
  setup_tracing();
  let store = Arc::new(InMemoryCartStore::with_catalog(catalog()));
  let alice = CartSession::with_defaults(store.clone(), Arc::new(FixedIdentity(Some(Uuid::new_v4())))).unwrap();
  let bob = CartSession::with_defaults(store.clone(), Arc::new(FixedIdentity(Some(Uuid::new_v4())))).unwrap();

  alice.add_to_cart(BEAT_42, 1).await.unwrap();
  bob.add_to_cart(TEE, 4).await.unwrap();
  alice.refresh().await.unwrap();

  assert_eq!(alice.items().len(), 1);
  assert_eq!(alice.items()[0].product_id, BEAT_42);
  assert_eq!(bob.items().len(), 1);
  assert_eq!(bob.total_items(), 4);
}

#[tokio::test]
#[serial]
async fn removed_catalog_products_drop_out_of_the_cart() {
  let h = Harness::signed_in();
  h.session.add_to_cart(BEAT_42, 1).await.unwrap();
  h.session.add_to_cart(TEE, 1).await.unwrap();

  assert!(h.store.remove_product(TEE).is_some());
  h.session.refresh().await.unwrap();

  // The orphaned row stays in the store but no longer joins to a product.
  assert_eq!(h.store.row_count(h.user_id), 2);
  assert_eq!(h.session.items().len(), 1);
  assert_eq!(h.session.total_price_cents(), BEAT_42_PRICE);
}
