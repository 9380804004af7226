// demos/storefront/src/web/handlers/session_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::instrument;

use super::CallerIdentity;
use crate::errors::AppError;
use crate::state::AppState;

/// Resets the caller's cart session and forgets it. The remote cart is kept,
/// so signing back in restores it.
#[instrument(name = "handler::sign_out", skip(app_state), fields(user_id = ?caller.user_id))]
pub async fn sign_out_handler(
  app_state: web::Data<AppState>,
  caller: CallerIdentity,
) -> Result<HttpResponse, AppError> {
  let Some(user_id) = caller.user_id else {
    return Ok(HttpResponse::NoContent().finish());
  };
  match app_state.sessions.remove(user_id) {
    Some(session) => {
      session.sign_out().await?;
      Ok(HttpResponse::Ok().json(session.view()))
    }
    None => Ok(HttpResponse::NoContent().finish()),
  }
}

pub async fn health_check_handler(app_state: web::Data<AppState>) -> HttpResponse {
  HttpResponse::Ok().json(json!({
    "status": "ok",
    "persistent_store": app_state.config.database_url.is_some(),
    "refresh_ordering": app_state.config.cart.refresh_ordering,
    "active_sessions": app_state.sessions.len(),
  }))
}
