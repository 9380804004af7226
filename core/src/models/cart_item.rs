// cartflow/src/models/cart_item.rs

use super::product::Product;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One line of a user's cart, with the product joined in.
///
/// `id` is the cart row's own key and is what remove/update operate on;
/// `product_id` only references the catalog. `quantity` is always at least 1:
/// a line that would drop to zero is deleted instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: Uuid,
  pub product_id: String,
  pub quantity: i32,
  pub added_at: DateTime<Utc>,
  pub product: Product,
}

impl CartItem {
  pub fn line_total_cents(&self) -> i64 {
    self.product.price_cents * i64::from(self.quantity)
  }
}
