// demos/storefront/src/web/routes.rs

use crate::web::handlers::{cart_handlers, session_handlers};
use actix_web::web;

pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/v1")
      .route("/health", web::get().to(session_handlers::health_check_handler))
      .service(
        web::scope("/cart")
          .route("", web::get().to(cart_handlers::get_cart_handler))
          .route("", web::delete().to(cart_handlers::clear_cart_handler))
          .route("/items", web::post().to(cart_handlers::add_item_handler))
          .route("/items/{item_id}", web::patch().to(cart_handlers::update_item_handler))
          .route("/items/{item_id}", web::delete().to(cart_handlers::remove_item_handler))
          .route("/visibility", web::put().to(cart_handlers::set_visibility_handler))
          .route("/checkout", web::post().to(cart_handlers::checkout_handler)),
      )
      .service(web::scope("/session").route("/sign-out", web::post().to(session_handlers::sign_out_handler))),
  );
}
