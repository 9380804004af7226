// demos/storefront/src/web/handlers/mod.rs

pub mod cart_handlers;
pub mod session_handlers;

use crate::errors::AppError;
use crate::sessions::UserSession;
use actix_web::{FromRequest, HttpRequest, HttpResponse};
use cartflow::CartResult;
use tracing::warn;
use uuid::Uuid;

/// Identity taken from the `X-User-ID` header. A missing or malformed
/// header yields an anonymous caller rather than a rejection, so the cart
/// session itself decides what anonymous callers may do.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity {
  pub user_id: Option<Uuid>,
}

impl FromRequest for CallerIdentity {
  type Error = AppError;
  type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
    let user_id = req.headers().get("X-User-ID").and_then(|value| {
      let parsed = value.to_str().ok().and_then(|raw| Uuid::parse_str(raw.trim()).ok());
      if parsed.is_none() {
        warn!("Ignoring malformed X-User-ID header.");
      }
      parsed
    });
    futures_util::future::ready(Ok(CallerIdentity { user_id }))
  }
}

/// Turns an operation outcome into the cart view, or an error that still
/// carries the session's notices.
pub(crate) fn respond(session: &UserSession, outcome: CartResult<()>) -> Result<HttpResponse, AppError> {
  match outcome {
    Ok(()) => Ok(HttpResponse::Ok().json(session.view())),
    Err(source) => Err(AppError::cart(source, session.drain_notices())),
  }
}
