// cartflow/src/cart/steps.rs

//! Step handlers for the cart pipelines.
//!
//! Every handler copies what it needs out of the context under a short
//! lock, drops the guard, and only then awaits the store.

use crate::cart::contexts::{
  AddToCartCtxData, ClearCartCtxData, MutationCtx, RefreshCtxData, RemoveFromCartCtxData, SessionHandle,
  UpdateQuantityCtxData, FETCH_FAILURE_MESSAGE,
};
use crate::cart::error::{CartError, CartResult};
use crate::config::RefreshOrdering;
use crate::core::{ContextData, PipelineControl, PipelineResult};
use crate::notify::Notice;
use crate::store::{StoreError, StoreOp};
use futures_util::future::join_all;
use std::sync::atomic::Ordering;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// Runs the refresh pipeline for whoever is signed in right now.
pub(crate) async fn run_refresh(handle: &SessionHandle) -> CartResult<PipelineResult> {
  let ctx = ContextData::new(RefreshCtxData {
    handle: handle.clone(),
    user_id: handle.identity.current_user(),
    ticket: 0,
    fetched: None,
  });
  handle.pipelines.run(ctx).await
}

fn remote_failure<T: MutationCtx>(handle: &SessionHandle, op: StoreOp, source: StoreError) -> CartError {
  warn!(%op, error = %source, "Cart store call failed.");
  handle.state.write().fail_sync(T::FAILURE_NOTICE);
  handle.notifier.notify(Notice::error(T::FAILURE_NOTICE));
  CartError::store(op, source)
}

fn signed_in_user<T: MutationCtx>(ctx: &ContextData<T>) -> CartResult<(SessionHandle, Uuid)> {
  let guard = ctx.read();
  let user_id = guard.user_id().ok_or(CartError::AuthenticationRequired)?;
  Ok((guard.handle().clone(), user_id))
}

// --- Refresh ---

pub(crate) async fn resolve_identity(ctx: ContextData<RefreshCtxData>) -> CartResult<PipelineControl> {
  let (handle, user_id) = {
    let guard = ctx.read();
    (guard.handle.clone(), guard.user_id)
  };
  if user_id.is_none() {
    debug!("No signed-in user; resetting cart to empty.");
    handle.state.write().reset_signed_out();
    return Ok(PipelineControl::Stop);
  }
  Ok(PipelineControl::Continue)
}

pub(crate) async fn begin_refresh(ctx: ContextData<RefreshCtxData>) -> CartResult<PipelineControl> {
  let handle = ctx.read().handle.clone();
  handle.state.write().begin_sync();
  let ticket = handle.refresh_seq.fetch_add(1, Ordering::SeqCst) + 1;
  ctx.write().ticket = ticket;
  Ok(PipelineControl::Continue)
}

#[instrument(name = "cart::fetch_remote", skip_all)]
pub(crate) async fn fetch_remote(ctx: ContextData<RefreshCtxData>) -> CartResult<PipelineControl> {
  let (handle, user_id) = {
    let guard = ctx.read();
    (guard.handle.clone(), guard.user_id)
  };
  let user_id = user_id.ok_or(CartError::AuthenticationRequired)?;

  match handle.store.fetch_all(user_id).await {
    Ok(items) => {
      debug!(count = items.len(), "Fetched cart.");
      ctx.write().fetched = Some(items);
      Ok(PipelineControl::Continue)
    }
    Err(source) => {
      warn!(error = %source, "Cart fetch failed; keeping previous items.");
      handle.state.write().fail_sync(FETCH_FAILURE_MESSAGE);
      Err(CartError::store(StoreOp::FetchAll, source))
    }
  }
}

pub(crate) async fn apply_snapshot(ctx: ContextData<RefreshCtxData>) -> CartResult<PipelineControl> {
  let (handle, user_id, ticket, fetched) = {
    let mut guard = ctx.write();
    let fetched = guard.fetched.take().unwrap_or_default();
    (guard.handle.clone(), guard.user_id, guard.ticket, fetched)
  };

  let latest = handle.refresh_seq.load(Ordering::SeqCst);
  let superseded = handle.config.refresh_ordering == RefreshOrdering::Sequenced && ticket < latest;
  // A snapshot fetched for a user who has since signed out must not repopulate the cart.
  let identity_changed = handle.identity.current_user() != user_id;

  let mut state = handle.state.write();
  if superseded || identity_changed {
    debug!(ticket, latest, identity_changed, "Discarding cart snapshot.");
  } else {
    state.apply_items(fetched);
  }
  state.end_sync();
  Ok(PipelineControl::Continue)
}

// --- Common mutation steps ---

pub(crate) async fn require_identity<T: MutationCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let (user_id, notifier) = {
    let guard = ctx.read();
    (guard.user_id(), guard.handle().notifier.clone())
  };
  if user_id.is_none() {
    warn!(operation = %std::any::type_name::<T>(), "Cart operation attempted without a signed-in user.");
    notifier.notify(Notice::error(T::AUTH_NOTICE));
    return Err(CartError::AuthenticationRequired);
  }
  Ok(PipelineControl::Continue)
}

pub(crate) async fn begin_sync<T: MutationCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let state = ctx.read().handle().state.clone();
  state.write().begin_sync();
  Ok(PipelineControl::Continue)
}

/// Re-fetches the whole cart after a successful mutation, then settles the
/// mutation's own loading slot. A failed re-fetch is already recorded in
/// `error` by the refresh pipeline and does not fail the mutation.
pub(crate) async fn refresh_cart<T: MutationCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  let handle = ctx.read().handle().clone();
  if let Err(e) = run_refresh(&handle).await {
    debug!(error = %e, "Refresh after mutation failed.");
  }
  handle.state.write().end_sync();
  Ok(PipelineControl::Continue)
}

pub(crate) async fn announce<T: MutationCtx>(ctx: ContextData<T>) -> CartResult<PipelineControl> {
  if let Some(message) = T::SUCCESS_NOTICE {
    let notifier = ctx.read().handle().notifier.clone();
    notifier.notify(Notice::success(message));
  }
  Ok(PipelineControl::Continue)
}

// --- Remote calls ---

#[instrument(name = "cart::insert_remote", skip_all)]
pub(crate) async fn insert_remote(ctx: ContextData<AddToCartCtxData>) -> CartResult<PipelineControl> {
  let (handle, user_id) = signed_in_user(&ctx)?;
  let (product_id, quantity) = {
    let guard = ctx.read();
    (guard.product_id.clone(), guard.quantity)
  };

  match handle.store.insert(user_id, &product_id, quantity).await {
    Ok(()) => {
      info!(%user_id, %product_id, quantity, "Cart item inserted.");
      Ok(PipelineControl::Continue)
    }
    Err(source) => Err(remote_failure::<AddToCartCtxData>(&handle, StoreOp::Insert, source)),
  }
}

#[instrument(name = "cart::delete_remote", skip_all)]
pub(crate) async fn delete_remote(ctx: ContextData<RemoveFromCartCtxData>) -> CartResult<PipelineControl> {
  let (handle, _user_id) = signed_in_user(&ctx)?;
  let item_id = ctx.read().item_id;

  match handle.store.delete(item_id).await {
    Ok(()) => {
      info!(%item_id, "Cart item deleted.");
      Ok(PipelineControl::Continue)
    }
    Err(source) => Err(remote_failure::<RemoveFromCartCtxData>(&handle, StoreOp::Delete, source)),
  }
}

#[instrument(name = "cart::update_remote", skip_all)]
pub(crate) async fn update_remote(ctx: ContextData<UpdateQuantityCtxData>) -> CartResult<PipelineControl> {
  let (handle, _user_id) = signed_in_user(&ctx)?;
  let (item_id, quantity) = {
    let guard = ctx.read();
    (guard.item_id, guard.quantity)
  };

  match handle.store.update_quantity(item_id, quantity).await {
    Ok(()) => {
      info!(%item_id, quantity, "Cart item quantity updated.");
      Ok(PipelineControl::Continue)
    }
    Err(source) => Err(remote_failure::<UpdateQuantityCtxData>(
      &handle,
      StoreOp::UpdateQuantity,
      source,
    )),
  }
}

// --- Clear ---

pub(crate) async fn collect_items(ctx: ContextData<ClearCartCtxData>) -> CartResult<PipelineControl> {
  let handle = ctx.read().handle.clone();
  let item_ids: Vec<Uuid> = handle.state.read().items.iter().map(|item| item.id).collect();
  if item_ids.is_empty() {
    debug!("Cart already empty; nothing to clear.");
    return Ok(PipelineControl::Stop);
  }
  ctx.write().item_ids = item_ids;
  Ok(PipelineControl::Continue)
}

/// Deletes every captured row concurrently and waits for all of them.
/// Any failure fails the whole clear; rows already deleted stay deleted.
#[instrument(name = "cart::delete_all_remote", skip_all)]
pub(crate) async fn delete_all_remote(ctx: ContextData<ClearCartCtxData>) -> CartResult<PipelineControl> {
  let (handle, _user_id) = signed_in_user(&ctx)?;
  let item_ids = ctx.read().item_ids.clone();

  let results = join_all(item_ids.iter().map(|item_id| handle.store.delete(*item_id))).await;

  let mut failed = 0;
  for (item_id, result) in item_ids.iter().zip(results) {
    if let Err(e) = result {
      warn!(%item_id, error = %e, "Delete during cart clear failed.");
      failed += 1;
    }
  }

  if failed == 0 {
    info!(count = item_ids.len(), "Cart cleared remotely.");
    return Ok(PipelineControl::Continue);
  }

  handle.state.write().fail_sync(ClearCartCtxData::FAILURE_NOTICE);
  handle.notifier.notify(Notice::error(ClearCartCtxData::FAILURE_NOTICE));
  Err(CartError::PartialClear {
    failed,
    attempted: item_ids.len(),
  })
}
