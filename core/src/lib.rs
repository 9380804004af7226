// cartflow/src/lib.rs

//! cartflow: a client-side cart session controller for a storefront.
//!
//! A [`CartSession`] mirrors one user's cart held in a remote store
//! ([`CartStore`]). It exposes add/remove/update/clear operations with
//! refresh-after-mutation semantics, derived totals, a loading/error status,
//! and a visibility flag for the cart drawer.
//!
//! Each operation runs as a small pipeline of named async steps:
//!  - `require_identity`: fail fast (and notify) when nobody is signed in.
//!  - `begin_sync`: mark the session loading and clear the last error.
//!  - the remote call: one of the four store operations.
//!  - `refresh_cart`: re-fetch the whole cart and recompute totals.
//!  - `announce`: emit the success notice.
//!
//! The pipeline engine ([`Pipeline`], [`PipelineRegistry`]) is generic and is
//! exported for callers that want to compose their own flows.

pub mod cart;
pub mod config;
pub mod core;
pub mod error;
pub mod identity;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod registry;
pub mod store;

// --- Re-exports for the Public API ---

pub use crate::cart::{CartError, CartResult, CartSession, CartSessionState, CartTotals, SyncStatus};
pub use crate::config::{CartConfig, RefreshOrdering};
pub use crate::identity::{FixedIdentity, IdentityProvider, SessionIdentity};
pub use crate::models::{CartItem, Product, ProductCategory, ProductStatus};
pub use crate::notify::{Notice, NoticeBuffer, NoticeLevel, Notifier, TracingNotifier};
pub use crate::store::{CartStore, InMemoryCartStore, StoreError, StoreOp, StoreResult};

pub use crate::core::context_data::ContextData;
pub use crate::core::control::{PipelineControl, PipelineResult};
pub use crate::core::step::{SkipCondition, StepDef};
pub use crate::core::Handler;
pub use crate::error::{FlowError, FlowResult};
pub use crate::pipeline::definition::Phase;
pub use crate::pipeline::Pipeline;
pub use crate::registry::PipelineRegistry;
