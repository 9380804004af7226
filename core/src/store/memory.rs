// cartflow/src/store/memory.rs

use super::{CartStore, StoreError, StoreOp, StoreResult};
use crate::models::{CartItem, Product};
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, instrument, warn};
use uuid::Uuid;

#[derive(Debug, Clone)]
struct CartRow {
  id: Uuid,
  user_id: Uuid,
  product_id: String,
  quantity: i32,
  added_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct Faults {
  fail_next: HashMap<StoreOp, usize>,
  failing_deletes: HashSet<Uuid>,
}

#[derive(Debug, Default)]
struct CallCounters {
  fetch_all: AtomicUsize,
  insert: AtomicUsize,
  delete: AtomicUsize,
  update_quantity: AtomicUsize,
}

impl CallCounters {
  fn counter(&self, op: StoreOp) -> &AtomicUsize {
    match op {
      StoreOp::FetchAll => &self.fetch_all,
      StoreOp::Insert => &self.insert,
      StoreOp::Delete => &self.delete,
      StoreOp::UpdateQuantity => &self.update_quantity,
    }
  }
}

/// Process-local cart store.
///
/// Upsert policy: `(user, product)` is unique, so inserting a product already
/// in the user's cart adds to that row's quantity. Rows come back in
/// insertion order. Faults can be injected per operation to simulate an
/// unreachable backend.
#[derive(Debug, Default)]
pub struct InMemoryCartStore {
  catalog: Mutex<HashMap<String, Product>>,
  rows: Mutex<Vec<CartRow>>,
  faults: Mutex<Faults>,
  calls: CallCounters,
}

impl InMemoryCartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_catalog(products: impl IntoIterator<Item = Product>) -> Self {
    let store = Self::new();
    for product in products {
      store.upsert_product(product);
    }
    store
  }

  pub fn upsert_product(&self, product: Product) {
    self.catalog.lock().insert(product.id.clone(), product);
  }

  /// Takes a product off the catalog. Cart rows pointing at it stay but
  /// are no longer returned by `fetch_all`.
  pub fn remove_product(&self, product_id: &str) -> Option<Product> {
    self.catalog.lock().remove(product_id)
  }

  pub fn products(&self) -> Vec<Product> {
    let mut products: Vec<Product> = self.catalog.lock().values().cloned().collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    products
  }

  /// Makes the next `times` calls of `op` fail with a simulated network error.
  pub fn fail_next(&self, op: StoreOp, times: usize) {
    self.faults.lock().fail_next.insert(op, times);
  }

  /// Makes every delete of `item_id` fail until cleared.
  pub fn fail_deletes_of(&self, item_id: Uuid) {
    self.faults.lock().failing_deletes.insert(item_id);
  }

  pub fn clear_faults(&self) {
    *self.faults.lock() = Faults::default();
  }

  /// Number of calls made to `op`, including failed ones.
  pub fn calls(&self, op: StoreOp) -> usize {
    self.calls.counter(op).load(Ordering::SeqCst)
  }

  pub fn total_calls(&self) -> usize {
    [StoreOp::FetchAll, StoreOp::Insert, StoreOp::Delete, StoreOp::UpdateQuantity]
      .into_iter()
      .map(|op| self.calls(op))
      .sum()
  }

  /// Raw row count for a user, bypassing the catalog join.
  pub fn row_count(&self, user_id: Uuid) -> usize {
    self.rows.lock().iter().filter(|r| r.user_id == user_id).count()
  }

  fn enter(&self, op: StoreOp) -> StoreResult<()> {
    self.calls.counter(op).fetch_add(1, Ordering::SeqCst);
    let mut faults = self.faults.lock();
    if let Some(remaining) = faults.fail_next.get_mut(&op) {
      if *remaining > 0 {
        *remaining -= 1;
        warn!(%op, "Injected store failure.");
        return Err(StoreError::Unexpected(anyhow!("simulated network error during {}", op)));
      }
    }
    Ok(())
  }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
  #[instrument(skip(self))]
  async fn fetch_all(&self, user_id: Uuid) -> StoreResult<Vec<CartItem>> {
    self.enter(StoreOp::FetchAll)?;
    let catalog = self.catalog.lock();
    let items = self
      .rows
      .lock()
      .iter()
      .filter(|row| row.user_id == user_id)
      .filter_map(|row| {
        // Inner join: rows whose product left the catalog are not returned.
        catalog.get(&row.product_id).map(|product| CartItem {
          id: row.id,
          product_id: row.product_id.clone(),
          quantity: row.quantity,
          added_at: row.added_at,
          product: product.clone(),
        })
      })
      .collect::<Vec<_>>();
    debug!(count = items.len(), "Fetched cart rows.");
    Ok(items)
  }

  #[instrument(skip(self))]
  async fn insert(&self, user_id: Uuid, product_id: &str, quantity: i32) -> StoreResult<()> {
    self.enter(StoreOp::Insert)?;
    if quantity < 1 {
      return Err(StoreError::InvalidQuantity(quantity));
    }
    if !self.catalog.lock().contains_key(product_id) {
      return Err(StoreError::UnknownProduct(product_id.to_string()));
    }

    let mut rows = self.rows.lock();
    match rows
      .iter_mut()
      .find(|row| row.user_id == user_id && row.product_id == product_id)
    {
      Some(existing) => {
        existing.quantity = existing
          .quantity
          .checked_add(quantity)
          .ok_or_else(|| StoreError::Rejected(format!("quantity overflow for product {}", product_id)))?;
        debug!(item_id = %existing.id, quantity = existing.quantity, "Incremented existing cart row.");
      }
      None => {
        let row = CartRow {
          id: Uuid::new_v4(),
          user_id,
          product_id: product_id.to_string(),
          quantity,
          added_at: Utc::now(),
        };
        debug!(item_id = %row.id, "Inserted cart row.");
        rows.push(row);
      }
    }
    Ok(())
  }

  #[instrument(skip(self))]
  async fn delete(&self, item_id: Uuid) -> StoreResult<()> {
    self.enter(StoreOp::Delete)?;
    if self.faults.lock().failing_deletes.contains(&item_id) {
      return Err(StoreError::Unexpected(anyhow!("simulated failure deleting {}", item_id)));
    }
    self.rows.lock().retain(|row| row.id != item_id);
    Ok(())
  }

  #[instrument(skip(self))]
  async fn update_quantity(&self, item_id: Uuid, quantity: i32) -> StoreResult<()> {
    self.enter(StoreOp::UpdateQuantity)?;
    if quantity < 1 {
      return Err(StoreError::InvalidQuantity(quantity));
    }
    if let Some(row) = self.rows.lock().iter_mut().find(|row| row.id == item_id) {
      row.quantity = quantity;
    }
    Ok(())
  }
}
