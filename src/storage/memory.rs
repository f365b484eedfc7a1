use std::sync::{Mutex, MutexGuard};

use super::{DocumentStore, Result};

/// In-process slot, the equivalent of a browser key/value store. Handy for
/// embedding hosts that persist elsewhere and for tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
    quarantined: Mutex<Vec<(String, String)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(payload.into())),
            ..Self::default()
        }
    }

    /// Current raw payload, if any.
    pub fn payload(&self) -> Option<String> {
        self.guard().clone()
    }

    /// Payloads moved aside by [`DocumentStore::quarantine_slot`], as
    /// `(label, payload)` pairs in the order they were set aside.
    pub fn quarantined(&self) -> Vec<(String, String)> {
        lock(&self.quarantined).clone()
    }

    fn guard(&self) -> MutexGuard<'_, Option<String>> {
        lock(&self.slot)
    }
}

// A poisoned lock still guards complete values: every write is a single
// assignment or push.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl DocumentStore for MemoryStore {
    fn read_slot(&self) -> Result<Option<String>> {
        Ok(self.guard().clone())
    }

    fn write_slot(&self, payload: &str) -> Result<()> {
        *self.guard() = Some(payload.to_string());
        Ok(())
    }

    fn remove_slot(&self) -> Result<()> {
        *self.guard() = None;
        Ok(())
    }

    fn quarantine_slot(&self, label: &str) -> Result<Option<String>> {
        let Some(payload) = self.guard().take() else {
            return Ok(None);
        };
        lock(&self.quarantined).push((label.to_string(), payload));
        Ok(Some(format!("memory:{label}")))
    }
}
