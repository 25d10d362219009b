//! Non-blocking user notifications (toasts).

use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const TOAST_TTL: Duration = Duration::from_secs(4);
pub const TOAST_LIMIT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    expires_at: Instant,
}

/// Bounded toast queue. Repeating the newest message refreshes its expiry
/// instead of stacking a duplicate.
#[derive(Debug)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
    ttl: Duration,
    limit: usize,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(TOAST_TTL, TOAST_LIMIT)
    }
}

impl Notifications {
    pub fn new(ttl: Duration, limit: usize) -> Self {
        Self {
            toasts: VecDeque::with_capacity(limit),
            ttl,
            limit: limit.max(1),
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push_at(ToastKind::Info, text.into(), Instant::now());
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push_at(ToastKind::Error, text.into(), Instant::now());
    }

    fn push_at(&mut self, kind: ToastKind, text: String, now: Instant) {
        if let Some(last) = self.toasts.back_mut() {
            if last.text == text && last.kind == kind {
                last.expires_at = now + self.ttl;
                return;
            }
        }
        self.toasts.push_back(Toast {
            kind,
            text,
            expires_at: now + self.ttl,
        });
        while self.toasts.len() > self.limit {
            self.toasts.pop_front();
        }
    }

    /// Drop expired toasts.
    pub fn prune(&mut self) {
        self.prune_at(Instant::now());
    }

    fn prune_at(&mut self, now: Instant) {
        self.toasts.retain(|toast| toast.expires_at > now);
    }

    /// Remove and return every queued toast, oldest first.
    pub fn drain(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Toast> {
        self.toasts.iter()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}
