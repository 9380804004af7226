// demos/storefront/src/errors.rs

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use cartflow::{CartError, Notice, StoreError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  /// A cart operation failed. Carries the notices the session emitted so the
  /// client can still show them.
  #[error("Cart operation failed: {source}")]
  Cart {
    #[source]
    source: CartError,
    notices: Vec<Notice>,
  },

  #[error("Not implemented: {0}")]
  NotImplemented(&'static str),
}

impl AppError {
  pub fn cart(source: CartError, notices: Vec<Notice>) -> Self {
    AppError::Cart { source, notices }
  }
}

impl From<CartError> for AppError {
  fn from(source: CartError) -> Self {
    AppError::cart(source, Vec::new())
  }
}

fn cart_status(err: &CartError) -> StatusCode {
  match err {
    CartError::AuthenticationRequired => StatusCode::UNAUTHORIZED,
    CartError::Store { source, .. } => match source {
      StoreError::UnknownProduct(_) => StatusCode::NOT_FOUND,
      StoreError::InvalidQuantity(_) => StatusCode::BAD_REQUEST,
      StoreError::Rejected(_) => StatusCode::CONFLICT,
      StoreError::Unexpected(_) => StatusCode::BAD_GATEWAY,
    },
    CartError::PartialClear { .. } => StatusCode::BAD_GATEWAY,
    CartError::Workflow(_) => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Config(_) | AppError::Sqlx(_) => StatusCode::INTERNAL_SERVER_ERROR,
      AppError::Cart { source, .. } => cart_status(source),
      AppError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, "Responding with error");
    }
    match self {
      AppError::Config(m) => {
        HttpResponse::build(status).json(json!({"error": "Configuration issue", "detail": m}))
      }
      AppError::Sqlx(_) => HttpResponse::build(status).json(json!({"error": "Database operation failed"})),
      AppError::Cart { source, notices } => {
        HttpResponse::build(status).json(json!({"error": source.to_string(), "notices": notices}))
      }
      AppError::NotImplemented(what) => HttpResponse::build(status).json(json!({"error": what})),
    }
  }
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
