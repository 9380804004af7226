// cartflow/src/notify.rs

//! The transient, user-facing notification sink (toasts).

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
  Success,
  Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
  pub level: NoticeLevel,
  pub message: String,
}

impl Notice {
  pub fn success(message: impl Into<String>) -> Self {
    Self {
      level: NoticeLevel::Success,
      message: message.into(),
    }
  }

  pub fn error(message: impl Into<String>) -> Self {
    Self {
      level: NoticeLevel::Error,
      message: message.into(),
    }
  }
}

pub trait Notifier: Send + Sync {
  fn notify(&self, notice: Notice);
}

/// Writes notices to the log and nowhere else.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
  fn notify(&self, notice: Notice) {
    match notice.level {
      NoticeLevel::Success => info!(text = %notice.message, "notice"),
      NoticeLevel::Error => warn!(text = %notice.message, "notice"),
    }
  }
}

/// Collects notices until the presentation layer drains them.
#[derive(Debug, Default)]
pub struct NoticeBuffer {
  notices: Mutex<Vec<Notice>>,
}

impl NoticeBuffer {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn drain(&self) -> Vec<Notice> {
    std::mem::take(&mut *self.notices.lock())
  }

  pub fn snapshot(&self) -> Vec<Notice> {
    self.notices.lock().clone()
  }

  pub fn len(&self) -> usize {
    self.notices.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.notices.lock().is_empty()
  }
}

impl Notifier for NoticeBuffer {
  fn notify(&self, notice: Notice) {
    TracingNotifier.notify(notice.clone());
    self.notices.lock().push(notice);
  }
}
