// demos/storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;

use super::{respond, CallerIdentity};
use crate::errors::AppError;
use crate::state::AppState;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AddItemPayload {
  pub product_id: String,
  #[serde(default = "default_quantity")]
  pub quantity: i32,
}

fn default_quantity() -> i32 {
  1
}

#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct VisibilityPayload {
  pub open: bool,
}

// --- Handlers ---

/// Re-fetches the cart and returns it.
#[instrument(name = "handler::get_cart", skip(app_state), fields(user_id = ?caller.user_id))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.session_for(caller.user_id)?;
  let outcome = session.cart.refresh().await;
  respond(&session, outcome)
}

#[instrument(
  name = "handler::add_item",
  skip(app_state, payload),
  fields(user_id = ?caller.user_id, product_id = %payload.product_id, quantity = payload.quantity)
)]
pub async fn add_item_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddItemPayload>,
  caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.session_for(caller.user_id)?;
  let outcome = session.cart.add_to_cart(&payload.product_id, payload.quantity).await;
  if outcome.is_ok() {
    info!("Item added to cart.");
  }
  respond(&session, outcome)
}

#[instrument(name = "handler::update_item", skip(app_state, payload), fields(user_id = ?caller.user_id))]
pub async fn update_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateQuantityPayload>,
  caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.session_for(caller.user_id)?;
  let outcome = session.cart.update_quantity(path.into_inner(), payload.quantity).await;
  respond(&session, outcome)
}

#[instrument(name = "handler::remove_item", skip(app_state), fields(user_id = ?caller.user_id))]
pub async fn remove_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.session_for(caller.user_id)?;
  let outcome = session.cart.remove_from_cart(path.into_inner()).await;
  respond(&session, outcome)
}

#[instrument(name = "handler::clear_cart", skip(app_state), fields(user_id = ?caller.user_id))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.session_for(caller.user_id)?;
  let outcome = session.cart.clear_cart().await;
  respond(&session, outcome)
}

/// Opens or closes the cart drawer. Never touches the store.
pub async fn set_visibility_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<VisibilityPayload>,
  caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
  let session = app_state.sessions.session_for(caller.user_id)?;
  session.cart.set_open(payload.open);
  Ok(HttpResponse::Ok().json(session.view()))
}

/// Payment and fulfillment live outside this service.
pub async fn checkout_handler() -> Result<HttpResponse, AppError> {
  Err(AppError::NotImplemented("Checkout is not available yet."))
}
