// cartflow/src/cart/mod.rs

//! The cart session controller.

mod contexts;
pub mod error;
mod pipelines;
pub mod session;
pub mod state;
mod steps;

pub use error::{CartError, CartResult};
pub use session::CartSession;
pub use state::{CartSessionState, CartTotals, SyncStatus};
