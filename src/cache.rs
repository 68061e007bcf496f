use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use tracing::warn;

use crate::types::{AuditRecord, CacheTier};

pub const CACHE_TTL: Duration = Duration::from_secs(3600);

/// Content-addressed cache key: identical trimmed article text always maps
/// to the same key. Trim only; no case folding or internal whitespace
/// collapsing.
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.trim().as_bytes());
    let mut key = String::with_capacity(6 + digest.len() * 2);
    key.push_str("audit:");
    for byte in digest {
        key.push_str(&format!("{byte:02x}"));
    }
    key
}

/// Durable primary tier, typically backed by an external service. Values are
/// serialized records; the TTL is a hint the store is expected to honor.
#[async_trait::async_trait]
pub trait CacheStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: String, ttl: Duration) -> Result<()>;
}

struct FallbackEntry {
    record: AuditRecord,
    inserted_at: Instant,
}

/// Two-tier result cache. Reads try the primary store first and fall through
/// to an in-process map when the primary errors (an outage, not a miss).
/// Writes go to exactly one tier: the primary when it is healthy, the
/// fallback otherwise. Fallback entries expire a fixed interval after
/// insertion, checked at read time.
///
/// Concurrent misses for one fingerprint are not deduplicated; both callers
/// recompute and the last write wins. Entries for a given key are immutable
/// in content, so the race costs a redundant provider call, never corruption.
pub struct AuditCache {
    primary: Option<Arc<dyn CacheStore>>,
    fallback: Mutex<HashMap<String, FallbackEntry>>,
    ttl: Duration,
}

impl AuditCache {
    pub fn new(primary: Option<Arc<dyn CacheStore>>) -> Self {
        Self::with_ttl(primary, CACHE_TTL)
    }

    pub fn with_ttl(primary: Option<Arc<dyn CacheStore>>, ttl: Duration) -> Self {
        AuditCache {
            primary,
            fallback: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Look up a record, reporting which tier served it. A primary error is
    /// logged and treated as a miss on that tier; callers cannot distinguish
    /// an outage from a miss except through the returned tier.
    pub async fn get(&self, key: &str) -> (Option<AuditRecord>, CacheTier) {
        if let Some(primary) = &self.primary {
            match primary.get(key).await {
                Ok(Some(json)) => match serde_json::from_str::<AuditRecord>(&json) {
                    Ok(record) => return (Some(record), CacheTier::Primary),
                    Err(err) => {
                        warn!(key, error = %err, "discarding undecodable primary cache entry");
                    }
                },
                Ok(None) => {}
                Err(err) => {
                    warn!(key, error = %err, "primary cache read failed, trying fallback");
                }
            }
        }

        let mut fallback = self.fallback.lock();
        let expired = match fallback.get(key) {
            Some(entry) if entry.inserted_at.elapsed() <= self.ttl => {
                return (Some(entry.record.clone()), CacheTier::Fallback);
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            fallback.remove(key);
        }
        (None, CacheTier::None)
    }

    /// Store a record in exactly one tier. The fallback is a failover path,
    /// not a write-through replica.
    pub async fn set(&self, key: &str, record: &AuditRecord) -> Result<()> {
        if let Some(primary) = &self.primary {
            let json = serde_json::to_string(record)?;
            match primary.set(key, json, self.ttl).await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(key, error = %err, "primary cache write failed, using fallback");
                }
            }
        }
        self.fallback.lock().insert(
            key.to_string(),
            FallbackEntry {
                record: record.clone(),
                inserted_at: Instant::now(),
            },
        );
        Ok(())
    }
}
