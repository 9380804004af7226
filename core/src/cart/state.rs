// cartflow/src/cart/state.rs

use crate::models::CartItem;
use serde::Serialize;

/// Data-sync axis of the session. Visibility is tracked separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncStatus {
  Idle,
  Loading,
  Error,
}

/// Totals derived from a list of cart items.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CartTotals {
  pub total_items: i64,
  pub total_price_cents: i64,
}

impl CartTotals {
  pub fn compute(items: &[CartItem]) -> Self {
    items.iter().fold(CartTotals::default(), |acc, item| CartTotals {
      total_items: acc.total_items + i64::from(item.quantity),
      total_price_cents: acc.total_price_cents + item.line_total_cents(),
    })
  }
}

/// The session's projection of the remote cart.
///
/// `total_items` and `total_price_cents` are recomputed whenever `items` is
/// replaced and never set on their own. `is_loading` stays true while any
/// operation is in flight.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CartSessionState {
  pub items: Vec<CartItem>,
  pub total_items: i64,
  pub total_price_cents: i64,
  pub is_loading: bool,
  pub error: Option<String>,
  pub is_open: bool,
  #[serde(skip)]
  in_flight: u32,
}

impl CartSessionState {
  pub fn status(&self) -> SyncStatus {
    if self.is_loading {
      SyncStatus::Loading
    } else if self.error.is_some() {
      SyncStatus::Error
    } else {
      SyncStatus::Idle
    }
  }

  pub fn totals(&self) -> CartTotals {
    CartTotals {
      total_items: self.total_items,
      total_price_cents: self.total_price_cents,
    }
  }

  pub fn contains_item(&self, item_id: uuid::Uuid) -> bool {
    self.items.iter().any(|item| item.id == item_id)
  }

  pub(crate) fn begin_sync(&mut self) {
    self.in_flight += 1;
    self.is_loading = true;
    self.error = None;
  }

  pub(crate) fn end_sync(&mut self) {
    self.in_flight = self.in_flight.saturating_sub(1);
    self.is_loading = self.in_flight > 0;
  }

  pub(crate) fn fail_sync(&mut self, message: &str) {
    self.end_sync();
    self.error = Some(message.to_string());
  }

  pub(crate) fn apply_items(&mut self, items: Vec<CartItem>) {
    let totals = CartTotals::compute(&items);
    self.items = items;
    self.total_items = totals.total_items;
    self.total_price_cents = totals.total_price_cents;
  }

  /// Sign-out reset. Visibility is left alone, and so are operations still
  /// in flight: each settles its own slot when it finishes.
  pub(crate) fn reset_signed_out(&mut self) {
    self.apply_items(Vec::new());
    self.error = None;
    self.is_loading = self.in_flight > 0;
  }
}
