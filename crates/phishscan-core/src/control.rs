//! In-flight tracking for submissions: one request per scan kind, each with an abort token.
//!
//! The dispatcher registers a submission before sending it. A second
//! submission of the same kind is refused while the first is registered.
//! `cancel` sets the token; the transport checks it and stops the transfer.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::request::ScanKind;

#[derive(Debug, Default)]
pub struct InFlight {
    slots: Mutex<HashMap<ScanKind, Arc<AtomicBool>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    fn slots(&self) -> MutexGuard<'_, HashMap<ScanKind, Arc<AtomicBool>>> {
        self.slots.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Register a submission of `kind`. Returns None if one is already in flight.
    pub fn try_begin(&self, kind: ScanKind) -> Option<InFlightGuard<'_>> {
        let mut slots = self.slots();
        if slots.contains_key(&kind) {
            return None;
        }
        let token = Arc::new(AtomicBool::new(false));
        slots.insert(kind, Arc::clone(&token));
        Some(InFlightGuard {
            registry: self,
            kind,
            token,
        })
    }

    pub fn is_busy(&self, kind: ScanKind) -> bool {
        self.slots().contains_key(&kind)
    }

    /// Request abort of the in-flight submission of `kind`. Returns false if none is running.
    pub fn cancel(&self, kind: ScanKind) -> bool {
        match self.slots().get(&kind) {
            Some(token) => {
                token.store(true, Ordering::Relaxed);
                true
            }
            None => false,
        }
    }
}

/// Unregisters the submission when dropped. Dropping also sets the abort
/// token, so a transfer whose caller went away stops at its next progress poll.
pub struct InFlightGuard<'a> {
    registry: &'a InFlight,
    kind: ScanKind,
    token: Arc<AtomicBool>,
}

impl InFlightGuard<'_> {
    pub fn token(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.token)
    }

    pub fn abort(&self) {
        self.token.store(true, Ordering::Relaxed);
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.token.store(true, Ordering::Relaxed);
        self.registry.slots().remove(&self.kind);
    }
}
