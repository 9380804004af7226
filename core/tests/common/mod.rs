// tests/common/mod.rs
#![allow(dead_code)] // Each test binary uses a different subset.

use cartflow::{
  CartConfig, CartSession, ContextData, FlowError, InMemoryCartStore, NoticeBuffer, PipelineControl, Product,
  ProductCategory, SessionIdentity,
};
use std::sync::Arc;
use tracing::Level;
use uuid::Uuid;

// --- Engine test context ---

#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub steps_executed: Vec<String>,
  pub should_stop_at: Option<String>,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum TestError {
  #[error("flow error: {0}")]
  Flow(String),

  #[error("test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

pub fn create_simple_handler(
  step_name: &'static str,
  message_to_append: &'static str,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<PipelineControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      let mut guard = ctx.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.steps_executed.push(step_name.to_string());
      if guard.should_stop_at.as_deref() == Some(step_name) {
        return Ok(PipelineControl::Stop);
      }
      Ok(PipelineControl::Continue)
    })
  }
}

pub fn create_failing_handler(
  step_name: &'static str,
  error_message: &'static str,
) -> impl Fn(ContextData<TestContext>) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<PipelineControl, TestError>> + Send>>
     + Send
     + Sync
     + 'static {
  move |ctx: ContextData<TestContext>| {
    Box::pin(async move {
      ctx.write().steps_executed.push(step_name.to_string());
      Err(TestError::Handler(error_message.to_string()))
    })
  }
}

// --- Tracing ---

use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

// --- Cart fixtures ---

pub const BEAT_42: &str = "beat-42";
pub const BEAT_42_PRICE: i64 = 2_999;
pub const TEE: &str = "merch-tee";
pub const TEE_PRICE: i64 = 3_500;
pub const GENESIS_NFT: &str = "nft-genesis";
pub const GENESIS_NFT_PRICE: i64 = 120_000;

pub fn catalog() -> Vec<Product> {
  vec![
    Product::new(BEAT_42, "Midnight Drive (Beat)", BEAT_42_PRICE, ProductCategory::Beat)
      .with_metadata(serde_json::json!({ "bpm": 92, "image_url": "https://cdn.example/beats/42.png" })),
    Product::new(TEE, "Logo Tee", TEE_PRICE, ProductCategory::Merch),
    Product::new(GENESIS_NFT, "Genesis Pass", GENESIS_NFT_PRICE, ProductCategory::Nft),
  ]
}

pub struct Harness {
  pub store: Arc<InMemoryCartStore>,
  pub identity: Arc<SessionIdentity>,
  pub notices: Arc<NoticeBuffer>,
  pub session: Arc<CartSession>,
  pub user_id: Uuid,
}

impl Harness {
  /// A session whose user is signed in but not yet refreshed.
  pub fn signed_in() -> Self {
    Self::build(true, CartConfig::default())
  }

  pub fn signed_out() -> Self {
    Self::build(false, CartConfig::default())
  }

  pub fn with_config(config: CartConfig) -> Self {
    Self::build(true, config)
  }

  fn build(signed_in: bool, config: CartConfig) -> Self {
    setup_tracing();
    let user_id = Uuid::new_v4();
    let store = Arc::new(InMemoryCartStore::with_catalog(catalog()));
    let identity = Arc::new(if signed_in {
      SessionIdentity::signed_in(user_id)
    } else {
      SessionIdentity::anonymous()
    });
    let notices = Arc::new(NoticeBuffer::new());
    let session = Arc::new(
      CartSession::new(store.clone(), identity.clone(), notices.clone(), config).expect("session builds"),
    );
    Self {
      store,
      identity,
      notices,
      session,
      user_id,
    }
  }

  pub fn item_id_for(&self, product_id: &str) -> Uuid {
    self
      .session
      .items()
      .iter()
      .find(|item| item.product_id == product_id)
      .map(|item| item.id)
      .unwrap_or_else(|| panic!("no cart line for {}", product_id))
  }
}
