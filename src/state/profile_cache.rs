use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::dao::models::UserProfile;

/// How long a resolved profile is served without asking the auth service again.
pub const PROFILE_TTL: Duration = Duration::from_secs(30);

struct CachedProfile {
    profile: UserProfile,
    stored_at: Instant,
}

impl CachedProfile {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Profiles keyed by access token.
pub struct ProfileCache {
    entries: DashMap<String, CachedProfile>,
    ttl: Duration,
}

impl ProfileCache {
    /// Empty cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
        }
    }

    /// Fresh profile for the token; stale entries are dropped.
    pub fn get(&self, token: &str) -> Option<UserProfile> {
        let fresh = {
            let entry = self.entries.get(token)?;
            entry.is_fresh(self.ttl).then(|| entry.profile.clone())
        };
        if fresh.is_none() {
            self.entries.remove(token);
        }
        fresh
    }

    /// Cache `profile` under `token`, dropping every expired entry first so
    /// tokens that are never presented again do not accumulate.
    pub fn insert(&self, token: &str, profile: UserProfile) {
        let ttl = self.ttl;
        self.entries.retain(|_, entry| entry.is_fresh(ttl));
        self.entries.insert(
            token.to_string(),
            CachedProfile {
                profile,
                stored_at: Instant::now(),
            },
        );
    }

    /// Forget the profile cached for `token`.
    pub fn evict(&self, token: &str) {
        self.entries.remove(token);
    }

    /// Number of cached tokens, expired ones included until the next purge.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no token is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new(PROFILE_TTL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "u1".into(),
            email: "admin@casino.test".into(),
            full_name: None,
            role: "casino_admin".into(),
            user_role: None,
            casino_id: Some("c1".into()),
            is_active: Some(true),
            last_login: None,
            created_at: None,
            source: Some("users".into()),
        }
    }

    #[test]
    fn serves_fresh_entries_until_evicted() {
        let cache = ProfileCache::default();
        cache.insert("tok", profile());
        assert_eq!(cache.get("tok").map(|p| p.id), Some("u1".to_string()));

        cache.evict("tok");
        assert!(cache.get("tok").is_none());
    }

    #[test]
    fn expired_entries_are_dropped() {
        let cache = ProfileCache::new(Duration::ZERO);
        cache.insert("tok", profile());
        assert!(cache.get("tok").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn insert_purges_abandoned_tokens() {
        let cache = ProfileCache::new(Duration::from_millis(20));
        cache.insert("abandoned", profile());
        std::thread::sleep(Duration::from_millis(40));

        cache.insert("fresh", profile());
        assert_eq!(cache.len(), 1);
        assert!(cache.get("fresh").is_some());
    }
}
