use crate::ephemeris::NatalChart;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Birth charts by user id. Absence just turns personalization off.
#[async_trait]
pub trait BirthProfileStore: Send + Sync {
    async fn profile(&self, user_id: &str) -> Option<NatalChart>;
}

#[derive(Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, NatalChart>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user_id: impl Into<String>, chart: NatalChart) {
        self.profiles.write().await.insert(user_id.into(), chart);
    }
}

#[async_trait]
impl BirthProfileStore for MemoryProfileStore {
    async fn profile(&self, user_id: &str) -> Option<NatalChart> {
        self.profiles.read().await.get(user_id).cloned()
    }
}
