// cartflow/src/cart/pipelines.rs

//! Defines and registers the cart operation pipelines.
//!
//! Mutations share one shape:
//! `require_identity -> begin_sync -> <remote call> -> refresh_cart -> announce`.
//! Refresh is its own pipeline so the mutations and the public `refresh()`
//! go through exactly the same code.

use crate::cart::contexts::{
  AddToCartCtxData, ClearCartCtxData, RefreshCtxData, RemoveFromCartCtxData, UpdateQuantityCtxData,
};
use crate::cart::error::CartError;
use crate::cart::steps;
use crate::error::FlowResult;
use crate::pipeline::Pipeline;
use crate::registry::PipelineRegistry;
use tracing::debug;

pub(crate) fn register_cart_pipelines(registry: &PipelineRegistry<CartError>) -> FlowResult<()> {
  registry.register_pipeline(refresh_pipeline()?);
  registry.register_pipeline(add_to_cart_pipeline()?);
  registry.register_pipeline(remove_from_cart_pipeline()?);
  registry.register_pipeline(update_quantity_pipeline()?);
  registry.register_pipeline(clear_cart_pipeline()?);
  debug!("Cart pipelines registered.");
  Ok(())
}

fn refresh_pipeline() -> FlowResult<Pipeline<RefreshCtxData, CartError>> {
  let mut p = Pipeline::<RefreshCtxData, CartError>::new(&[
    ("resolve_identity", false, None),
    ("begin_sync", false, None),
    ("fetch_remote", false, None),
    ("apply_snapshot", false, None),
  ]);
  p.on_root("resolve_identity", steps::resolve_identity)?;
  p.on_root("begin_sync", steps::begin_refresh)?;
  p.on_root("fetch_remote", steps::fetch_remote)?;
  p.on_root("apply_snapshot", steps::apply_snapshot)?;
  Ok(p)
}

fn add_to_cart_pipeline() -> FlowResult<Pipeline<AddToCartCtxData, CartError>> {
  let mut p = Pipeline::<AddToCartCtxData, CartError>::new(&[
    ("require_identity", false, None),
    ("begin_sync", false, None),
    ("insert_remote", false, None),
    ("refresh_cart", false, None),
    ("announce", true, None),
  ]);
  p.on_root("require_identity", steps::require_identity::<AddToCartCtxData>)?;
  p.on_root("begin_sync", steps::begin_sync::<AddToCartCtxData>)?;
  p.on_root("insert_remote", steps::insert_remote)?;
  p.on_root("refresh_cart", steps::refresh_cart::<AddToCartCtxData>)?;
  p.on_root("announce", steps::announce::<AddToCartCtxData>)?;
  Ok(p)
}

fn remove_from_cart_pipeline() -> FlowResult<Pipeline<RemoveFromCartCtxData, CartError>> {
  let mut p = Pipeline::<RemoveFromCartCtxData, CartError>::new(&[
    ("require_identity", false, None),
    ("begin_sync", false, None),
    ("delete_remote", false, None),
    ("refresh_cart", false, None),
    ("announce", true, None),
  ]);
  p.on_root("require_identity", steps::require_identity::<RemoveFromCartCtxData>)?;
  p.on_root("begin_sync", steps::begin_sync::<RemoveFromCartCtxData>)?;
  p.on_root("delete_remote", steps::delete_remote)?;
  p.on_root("refresh_cart", steps::refresh_cart::<RemoveFromCartCtxData>)?;
  p.on_root("announce", steps::announce::<RemoveFromCartCtxData>)?;
  Ok(p)
}

// Bare quantity changes are silent on success, so there is no announce step.
fn update_quantity_pipeline() -> FlowResult<Pipeline<UpdateQuantityCtxData, CartError>> {
  let mut p = Pipeline::<UpdateQuantityCtxData, CartError>::new(&[
    ("require_identity", false, None),
    ("begin_sync", false, None),
    ("update_remote", false, None),
    ("refresh_cart", false, None),
  ]);
  p.on_root("require_identity", steps::require_identity::<UpdateQuantityCtxData>)?;
  p.on_root("begin_sync", steps::begin_sync::<UpdateQuantityCtxData>)?;
  p.on_root("update_remote", steps::update_remote)?;
  p.on_root("refresh_cart", steps::refresh_cart::<UpdateQuantityCtxData>)?;
  Ok(p)
}

fn clear_cart_pipeline() -> FlowResult<Pipeline<ClearCartCtxData, CartError>> {
  let mut p = Pipeline::<ClearCartCtxData, CartError>::new(&[
    ("require_identity", false, None),
    ("collect_items", false, None),
    ("begin_sync", false, None),
    ("delete_all_remote", false, None),
    ("refresh_cart", false, None),
    ("announce", true, None),
  ]);
  p.on_root("require_identity", steps::require_identity::<ClearCartCtxData>)?;
  p.on_root("collect_items", steps::collect_items)?;
  p.on_root("begin_sync", steps::begin_sync::<ClearCartCtxData>)?;
  p.on_root("delete_all_remote", steps::delete_all_remote)?;
  p.on_root("refresh_cart", steps::refresh_cart::<ClearCartCtxData>)?;
  p.on_root("announce", steps::announce::<ClearCartCtxData>)?;
  Ok(p)
}
