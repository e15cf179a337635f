//! Provider registry with priority ordering and lazy cooldowns
//!
//! Availability is never restored by a timer. Each entry remembers when its
//! cooldown ends and selection compares that against the current instant, so
//! there is nothing to cancel or clean up on shutdown.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use super::Provider;
use crate::classification::DEFAULT_COOLDOWN;
use crate::error::ProviderError;

/// A registered provider and its selection state
#[derive(Clone)]
pub struct ProviderEntry {
    key: String,
    display_name: String,
    client: Option<Arc<dyn Provider>>,
    enabled: bool,
    priority: u32,
    cooldown_until: Option<Instant>,
}

impl ProviderEntry {
    /// Create an entry without a client; it stays disabled until one is attached
    pub fn new(key: impl Into<String>, display_name: impl Into<String>, priority: u32) -> Self {
        Self {
            key: key.into(),
            display_name: display_name.into(),
            client: None,
            enabled: false,
            priority,
            cooldown_until: None,
        }
    }

    /// Attach a client, which enables the entry
    pub fn with_client(mut self, client: Arc<dyn Provider>) -> Self {
        self.client = Some(client);
        self.enabled = true;
        self
    }

    /// Force the entry off. An entry without a client can never be enabled.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled && self.client.is_some();
        self
    }

    /// Provider key
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable name
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Client handle, present only when credentials were configured
    pub fn client(&self) -> Option<&Arc<dyn Provider>> {
        self.client.as_ref()
    }

    /// Static capability flag
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Selection priority, lower is tried first
    pub fn priority(&self) -> u32 {
        self.priority
    }

    /// When the current cooldown ends, if one is active or recently expired
    pub fn cooldown_until(&self) -> Option<Instant> {
        self.cooldown_until
    }

    /// Whether the entry is out of cooldown at `now`
    pub fn is_available(&self, now: Instant) -> bool {
        self.cooldown_until.map_or(true, |until| now >= until)
    }

    /// Remaining cooldown at `now`
    pub fn cooldown_remaining(&self, now: Instant) -> Option<Duration> {
        self.cooldown_until
            .filter(|until| *until > now)
            .map(|until| until - now)
    }
}

impl std::fmt::Debug for ProviderEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderEntry")
            .field("key", &self.key)
            .field("display_name", &self.display_name)
            .field("has_client", &self.client.is_some())
            .field("enabled", &self.enabled)
            .field("priority", &self.priority)
            .field("cooldown_until", &self.cooldown_until)
            .finish()
    }
}

/// Diagnostic snapshot of one provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderStatus {
    pub key: String,
    pub display_name: String,
    pub enabled: bool,
    pub available: bool,
    pub priority: u32,
    pub last_error: Option<String>,
    pub cooldown_remaining_ms: Option<u64>,
}

/// Registry for managing configured providers
///
/// Shared behind an `Arc` by every component that issues requests. Entries
/// keep their registration order, which breaks priority ties.
#[derive(Default)]
pub struct ProviderRegistry {
    entries: RwLock<Vec<ProviderEntry>>,
    last_errors: RwLock<HashMap<String, String>>,
}

impl ProviderRegistry {
    /// Create a new empty provider registry
    pub fn new() -> Self {
        Self::default()
    }

    fn read_entries(&self) -> RwLockReadGuard<'_, Vec<ProviderEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_entries(&self) -> RwLockWriteGuard<'_, Vec<ProviderEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a provider; re-registering a key replaces it in place
    pub fn register(&self, entry: ProviderEntry) -> Result<(), ProviderError> {
        if entry.key.trim().is_empty() {
            return Err(ProviderError::ConfigError(
                "provider key cannot be empty".to_string(),
            ));
        }

        let mut entries = self.write_entries();
        match entries.iter_mut().find(|e| e.key == entry.key) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
        Ok(())
    }

    /// Unregister a provider by key
    pub fn unregister(&self, key: &str) -> Result<ProviderEntry, ProviderError> {
        let mut entries = self.write_entries();
        let index = entries
            .iter()
            .position(|e| e.key == key)
            .ok_or_else(|| ProviderError::NotFound(key.to_string()))?;
        Ok(entries.remove(index))
    }

    /// Get a snapshot of an entry by key
    pub fn get(&self, key: &str) -> Result<ProviderEntry, ProviderError> {
        self.read_entries()
            .iter()
            .find(|e| e.key == key)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(key.to_string()))
    }

    /// Client for `key`, if registered with credentials
    pub fn client(&self, key: &str) -> Option<Arc<dyn Provider>> {
        self.read_entries()
            .iter()
            .find(|e| e.key == key)
            .and_then(|e| e.client.clone())
    }

    /// Check if a provider is registered
    pub fn has_provider(&self, key: &str) -> bool {
        self.read_entries().iter().any(|e| e.key == key)
    }

    /// Get the number of registered providers
    pub fn provider_count(&self) -> usize {
        self.read_entries().len()
    }

    /// Keys of enabled and available providers, in selection order
    pub fn list_available(&self) -> Vec<String> {
        self.list_available_at(Instant::now())
    }

    /// Keys of enabled and available providers at `now`, in selection order
    pub fn list_available_at(&self, now: Instant) -> Vec<String> {
        let entries = self.read_entries();
        let mut available: Vec<&ProviderEntry> = entries
            .iter()
            .filter(|e| e.enabled && e.is_available(now))
            .collect();
        // Stable sort keeps registration order within a priority.
        available.sort_by_key(|e| e.priority);
        available.into_iter().map(|e| e.key.clone()).collect()
    }

    /// Keys of every enabled provider regardless of cooldown
    pub fn enabled_keys(&self) -> Vec<String> {
        self.read_entries()
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.key.clone())
            .collect()
    }

    /// Put a provider in cooldown for `duration`, replacing any active cooldown
    pub fn mark_unavailable(&self, key: &str, duration: Duration) -> Result<(), ProviderError> {
        self.mark_unavailable_at(key, duration, Instant::now())
    }

    /// Put a provider in cooldown for the default duration
    pub fn mark_unavailable_default(&self, key: &str) -> Result<(), ProviderError> {
        self.mark_unavailable(key, DEFAULT_COOLDOWN)
    }

    /// Put a provider in cooldown for `duration` starting at `now`
    pub fn mark_unavailable_at(
        &self,
        key: &str,
        duration: Duration,
        now: Instant,
    ) -> Result<(), ProviderError> {
        let mut entries = self.write_entries();
        let entry = entries
            .iter_mut()
            .find(|e| e.key == key)
            .ok_or_else(|| ProviderError::NotFound(key.to_string()))?;
        entry.cooldown_until = Some(now + duration);
        debug!(
            "Provider {} unavailable for {} ms",
            key,
            duration.as_millis()
        );
        Ok(())
    }

    /// Remember the most recent failure for a provider
    pub fn record_error(&self, key: &str, message: impl Into<String>) {
        self.last_errors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), message.into());
    }

    /// Most recent failure for a provider
    pub fn last_error(&self, key: &str) -> Option<String> {
        self.last_errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Every recorded failure, keyed by provider
    pub fn last_errors(&self) -> BTreeMap<String, String> {
        self.last_errors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Diagnostic snapshot of every provider, in priority order
    pub fn status(&self) -> Vec<ProviderStatus> {
        self.status_at(Instant::now())
    }

    /// Diagnostic snapshot of every provider at `now`
    pub fn status_at(&self, now: Instant) -> Vec<ProviderStatus> {
        let errors = self.last_errors();
        let entries = self.read_entries();
        let mut rows: Vec<ProviderStatus> = entries
            .iter()
            .map(|e| ProviderStatus {
                key: e.key.clone(),
                display_name: e.display_name.clone(),
                enabled: e.enabled,
                available: e.is_available(now),
                priority: e.priority,
                last_error: errors.get(&e.key).cloned(),
                cooldown_remaining_ms: e
                    .cooldown_remaining(now)
                    .map(|d| d.as_millis() as u64),
            })
            .collect();
        rows.sort_by_key(|row| row.priority);
        rows
    }
}
