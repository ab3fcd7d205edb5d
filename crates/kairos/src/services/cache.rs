use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

/// String cache with per-entry TTL. A miss is never an error.
#[async_trait]
pub trait ResponseCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<String>;
    async fn set(&self, key: &str, value: String, ttl: Duration);
}

/// `timing:{category}:{activity}:{date}:{personal|general}`
pub fn cache_key(category: &str, activity: &str, local_date: NaiveDate, personalized: bool) -> String {
    format!(
        "timing:{}:{}:{}:{}",
        category.trim().to_lowercase(),
        activity.trim().to_lowercase(),
        local_date.format("%Y-%m-%d"),
        if personalized { "personal" } else { "general" }
    )
}

#[derive(Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, (Instant, String)>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ResponseCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((expires, value)) if Instant::now() < *expires => return Some(value.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        // Expired, unless another task refreshed it since the read
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some((expires, value)) if Instant::now() < *expires => Some(value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    async fn set(&self, key: &str, value: String, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, (expires, _)| now < *expires);
        entries.insert(key.to_string(), (now + ttl, value));
    }
}
