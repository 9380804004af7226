// demos/storefront/src/sessions.rs

//! One cart session per signed-in user, created on first use.

use cartflow::{
  CartConfig, CartResult, CartSession, CartSessionState, CartStore, FixedIdentity, Notice, NoticeBuffer,
  SessionIdentity,
};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

/// A user's cart session plus the notices it has emitted since the last
/// response.
pub struct UserSession {
  pub user_id: Option<Uuid>,
  pub cart: Arc<CartSession>,
  identity: Option<Arc<SessionIdentity>>,
  notices: Arc<NoticeBuffer>,
}

/// Body returned by every cart endpoint.
#[derive(Debug, Serialize)]
pub struct CartView {
  pub cart: CartSessionState,
  pub notices: Vec<Notice>,
}

impl UserSession {
  pub fn drain_notices(&self) -> Vec<Notice> {
    self.notices.drain()
  }

  pub fn view(&self) -> CartView {
    CartView {
      cart: self.cart.snapshot(),
      notices: self.drain_notices(),
    }
  }

  /// Signs the user out and lets the session reset itself.
  pub async fn sign_out(&self) -> CartResult<()> {
    if let Some(identity) = &self.identity {
      identity.sign_out();
    }
    self.cart.refresh().await
  }
}

/// When idle sessions are dropped from the registry.
#[derive(Debug, Clone, Copy)]
pub struct SessionLimits {
  /// A session unused for this long is evicted on the next sweep.
  pub idle_ttl: Duration,
  /// Upper bound on live sessions; the least recently used one goes first.
  pub max_sessions: usize,
}

impl Default for SessionLimits {
  fn default() -> Self {
    Self {
      idle_ttl: Duration::from_secs(30 * 60),
      max_sessions: 10_000,
    }
  }
}

struct Entry {
  session: Arc<UserSession>,
  last_used: Instant,
}

pub struct SessionRegistry {
  store: Arc<dyn CartStore>,
  config: CartConfig,
  limits: SessionLimits,
  sessions: Mutex<HashMap<Uuid, Entry>>,
  /// Shared by every caller without a user id. It only ever rejects.
  anonymous: Arc<UserSession>,
}

impl SessionRegistry {
  pub fn new(store: Arc<dyn CartStore>, config: CartConfig, limits: SessionLimits) -> CartResult<Self> {
    let notices = Arc::new(NoticeBuffer::new());
    let cart = Arc::new(CartSession::new(
      store.clone(),
      Arc::new(FixedIdentity(None)),
      notices.clone(),
      config.clone(),
    )?);
    let anonymous = Arc::new(UserSession {
      user_id: None,
      cart,
      identity: None,
      notices,
    });

    Ok(Self {
      store,
      config,
      limits,
      sessions: Mutex::new(HashMap::new()),
      anonymous,
    })
  }

  /// The session for `user_id`, or the shared anonymous one when there is
  /// no user. Anonymous sessions reject every cart mutation.
  pub fn session_for(&self, user_id: Option<Uuid>) -> CartResult<Arc<UserSession>> {
    let Some(user_id) = user_id else {
      return Ok(self.anonymous.clone());
    };

    let now = Instant::now();
    let mut sessions = self.sessions.lock();
    if let Some(entry) = sessions.get_mut(&user_id) {
      entry.last_used = now;
      return Ok(entry.session.clone());
    }

    self.evict(&mut sessions, now);

    let identity = Arc::new(SessionIdentity::signed_in(user_id));
    let notices = Arc::new(NoticeBuffer::new());
    let cart = Arc::new(CartSession::new(
      self.store.clone(),
      identity.clone(),
      notices.clone(),
      self.config.clone(),
    )?);
    let session = Arc::new(UserSession {
      user_id: Some(user_id),
      cart,
      identity: Some(identity),
      notices,
    });
    sessions.insert(
      user_id,
      Entry {
        session: session.clone(),
        last_used: now,
      },
    );
    info!(%user_id, active_sessions = sessions.len(), "Cart session created.");
    Ok(session)
  }

  /// Drops idle sessions, then the least recently used ones until there is
  /// room for one more.
  fn evict(&self, sessions: &mut HashMap<Uuid, Entry>, now: Instant) {
    let before = sessions.len();
    sessions.retain(|_, entry| now.duration_since(entry.last_used) < self.limits.idle_ttl);

    while !sessions.is_empty() && sessions.len() >= self.limits.max_sessions {
      let oldest = sessions
        .iter()
        .min_by_key(|(_, entry)| entry.last_used)
        .map(|(user_id, _)| *user_id);
      match oldest {
        Some(user_id) => {
          sessions.remove(&user_id);
        }
        None => break,
      }
    }

    let evicted = before - sessions.len();
    if evicted > 0 {
      debug!(evicted, remaining = sessions.len(), "Evicted cart sessions.");
    }
  }

  /// Drops the user's session from the registry and returns it.
  pub fn remove(&self, user_id: Uuid) -> Option<Arc<UserSession>> {
    let removed = self.sessions.lock().remove(&user_id).map(|entry| entry.session);
    if removed.is_some() {
      info!(%user_id, "Cart session dropped.");
    }
    removed
  }

  pub fn len(&self) -> usize {
    self.sessions.lock().len()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use cartflow::InMemoryCartStore;

  fn registry_with(limits: SessionLimits) -> SessionRegistry {
    let store = Arc::new(InMemoryCartStore::with_catalog(crate::catalog::demo_products()));
    SessionRegistry::new(store, CartConfig::default(), limits).unwrap()
  }

  fn registry() -> SessionRegistry {
    registry_with(SessionLimits::default())
  }

  #[test]
  fn reuses_the_session_of_a_known_user() {
    let registry = registry();
    let user = Uuid::new_v4();

    let first = registry.session_for(Some(user)).unwrap();
    let second = registry.session_for(Some(user)).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.len(), 1);
  }

  #[test]
  fn anonymous_callers_share_one_unregistered_session() {
    let registry = registry();

    let anon = registry.session_for(None).unwrap();
    let again = registry.session_for(None).unwrap();

    assert!(Arc::ptr_eq(&anon, &again));
    assert_eq!(anon.user_id, None);
    assert_eq!(anon.cart.current_user(), None);
    assert_eq!(registry.len(), 0);
  }

  #[test]
  fn idle_sessions_are_evicted_when_a_new_one_is_created() {
    let registry = registry_with(SessionLimits {
      idle_ttl: Duration::from_millis(20),
      max_sessions: 100,
    });
    let stale = Uuid::new_v4();
    let first = registry.session_for(Some(stale)).unwrap();
    std::thread::sleep(Duration::from_millis(40));

    registry.session_for(Some(Uuid::new_v4())).unwrap();

    assert_eq!(registry.len(), 1);
    let fresh = registry.session_for(Some(stale)).unwrap();
    assert!(!Arc::ptr_eq(&first, &fresh));
  }

  #[test]
  fn session_cap_drops_the_least_recently_used() {
    let registry = registry_with(SessionLimits {
      idle_ttl: Duration::from_secs(3600),
      max_sessions: 2,
    });
    let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
    let session_a = registry.session_for(Some(a)).unwrap();
    std::thread::sleep(Duration::from_millis(5));
    registry.session_for(Some(b)).unwrap();
    std::thread::sleep(Duration::from_millis(5));
    registry.session_for(Some(a)).unwrap();
    std::thread::sleep(Duration::from_millis(5));

    registry.session_for(Some(c)).unwrap();

    assert_eq!(registry.len(), 2);
    assert!(registry.remove(b).is_none());
    assert!(Arc::ptr_eq(&session_a, &registry.session_for(Some(a)).unwrap()));
  }

  #[actix_web::test]
  async fn sign_out_resets_and_remove_forgets() {
    let registry = registry();
    let user = Uuid::new_v4();
    let session = registry.session_for(Some(user)).unwrap();
    session.cart.add_one("beat-42").await.unwrap();
    assert_eq!(session.cart.total_items(), 1);

    session.sign_out().await.unwrap();
    assert!(session.cart.items().is_empty());
    assert!(registry.remove(user).is_some());
    assert!(registry.remove(user).is_none());
  }
}
