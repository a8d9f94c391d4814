//! Fingerprint-keyed result cache with freshness expiry.
//!
//! Entries are keyed by an MD5 digest of the canonical JSON encoding of the
//! parameters, so `{"a":1,"b":2}` and `{"b":2,"a":1}` share one entry.
//! Freshness is judged against an injected [`Clock`]; the backing moka cache
//! additionally bounds capacity and sweeps entries on its own wall clock.

use std::{
    fmt,
    sync::{Arc, Mutex},
    time::Duration,
};

use jiff::{SignedDuration, Timestamp};
use log::debug;
use moka::{ops::compute::Op, sync::Cache};
use serde_json::Value;

use crate::models::{Parameters, ToolOutcome};

/// Upper bound handed to moka, which rejects very long lifetimes.
const MAX_SWEEP_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Source of the current time for freshness checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<Timestamp>,
}

impl ManualClock {
    pub fn new(start: Timestamp) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let by = SignedDuration::try_from(by).unwrap_or(SignedDuration::MAX);
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now = now.checked_add(by).unwrap_or(Timestamp::MAX);
    }

    pub fn set(&self, to: Timestamp) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = to;
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new(Timestamp::now())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Timestamp {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Deterministic hash of a parameter mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Signature of a fingerprint function.
pub type FingerprintFn = fn(&Parameters) -> Fingerprint;

/// MD5 hex digest of the canonical JSON encoding of `params`.
pub fn md5_fingerprint(params: &Parameters) -> Fingerprint {
    let mut canonical = String::new();
    write_canonical(&Value::Object(params.clone()), &mut canonical);
    Fingerprint(format!("{:x}", md5::compute(canonical.as_bytes())))
}

/// Writes compact JSON with object keys sorted at every depth.
fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(inner) = map.get(key) {
                    write_canonical(inner, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        scalar => out.push_str(&scalar.to_string()),
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    outcome: ToolOutcome,
    stored_at: Timestamp,
}

/// Per-tool cache of live outcomes.
#[derive(Clone)]
pub struct ResultCache {
    entries: Cache<Fingerprint, CacheEntry>,
    ttl: SignedDuration,
    clock: Arc<dyn Clock>,
    fingerprint: FingerprintFn,
}

impl ResultCache {
    /// Creates a cache whose entries stay fresh for `ttl`.
    pub fn new(ttl: Duration, capacity: u64, clock: Arc<dyn Clock>) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl.min(MAX_SWEEP_TTL))
            .build();
        Self {
            entries,
            ttl: SignedDuration::try_from(ttl).unwrap_or(SignedDuration::MAX),
            clock,
            fingerprint: md5_fingerprint,
        }
    }

    /// Replaces the fingerprint function.
    pub fn with_fingerprint(mut self, fingerprint: FingerprintFn) -> Self {
        self.fingerprint = fingerprint;
        self
    }

    pub fn fingerprint(&self, params: &Parameters) -> Fingerprint {
        (self.fingerprint)(params)
    }

    /// Returns the stored outcome while it is fresh. An expired entry is
    /// removed on the way out unless it was replaced in the meantime.
    pub fn get(&self, params: &Parameters) -> Option<ToolOutcome> {
        let key = self.fingerprint(params);
        let entry = self.entries.get(&key)?;
        let age = self.clock.now().duration_since(entry.stored_at);
        if age < self.ttl {
            debug!("Cache hit for {key} (age {age:#})");
            Some(entry.outcome)
        } else {
            debug!("Cache entry {key} expired (age {age:#})");
            self.evict_if_unchanged(key, entry.stored_at);
            None
        }
    }

    /// Removes the entry only if it is still the one that was found stale,
    /// so a concurrent write for the same fingerprint survives.
    fn evict_if_unchanged(&self, key: Fingerprint, stale_at: Timestamp) {
        self.entries.entry(key).and_compute_with(|current| match current {
            Some(current) if current.value().stored_at == stale_at => Op::Remove,
            _ => Op::Nop,
        });
    }

    /// Stores an outcome stamped with the current time.
    pub fn insert(&self, params: &Parameters, outcome: ToolOutcome) {
        let key = self.fingerprint(params);
        let entry = CacheEntry {
            outcome,
            stored_at: self.clock.now(),
        };
        self.entries.insert(key, entry);
    }

    pub fn invalidate_all(&self) {
        self.entries.invalidate_all();
    }

    pub fn ttl(&self) -> SignedDuration {
        self.ttl
    }
}

impl fmt::Debug for ResultCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.entry_count())
            .finish_non_exhaustive()
    }
}
