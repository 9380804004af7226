// cartflow/src/identity.rs

//! Who the cart belongs to.
//!
//! The session asks the provider for the current user at the start of every
//! operation. [`SessionIdentity`] additionally broadcasts changes so a session
//! can re-sync on sign-in and reset on sign-out (see
//! [`CartSession::watch_identity`](crate::cart::CartSession::watch_identity)).

use tokio::sync::watch;
use tracing::info;
use uuid::Uuid;

pub trait IdentityProvider: Send + Sync {
  fn current_user(&self) -> Option<Uuid>;
}

/// Identity holder backed by a `watch` channel.
#[derive(Debug)]
pub struct SessionIdentity {
  tx: watch::Sender<Option<Uuid>>,
}

impl SessionIdentity {
  pub fn new(initial: Option<Uuid>) -> Self {
    let (tx, _rx) = watch::channel(initial);
    Self { tx }
  }

  pub fn anonymous() -> Self {
    Self::new(None)
  }

  pub fn signed_in(user_id: Uuid) -> Self {
    Self::new(Some(user_id))
  }

  pub fn sign_in(&self, user_id: Uuid) {
    info!(%user_id, "Identity signed in.");
    self.tx.send_replace(Some(user_id));
  }

  pub fn sign_out(&self) {
    if let Some(user_id) = self.tx.send_replace(None) {
      info!(%user_id, "Identity signed out.");
    }
  }

  /// A receiver that observes every subsequent identity change.
  pub fn subscribe(&self) -> watch::Receiver<Option<Uuid>> {
    self.tx.subscribe()
  }
}

impl Default for SessionIdentity {
  fn default() -> Self {
    Self::anonymous()
  }
}

impl IdentityProvider for SessionIdentity {
  fn current_user(&self) -> Option<Uuid> {
    *self.tx.borrow()
  }
}

/// An identity that never changes. Handy for request-scoped sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedIdentity(pub Option<Uuid>);

impl IdentityProvider for FixedIdentity {
  fn current_user(&self) -> Option<Uuid> {
    self.0
  }
}
