use std::collections::HashMap;

use async_trait::async_trait;
use factacl_application::FactLookup;
use factacl_core::{AppError, AppResult};
use factacl_domain::{Fact, FactId};
use tokio::sync::RwLock;

/// In-memory Fact lookup, seeded through [`InMemoryFactRepository::save_fact`].
#[derive(Debug, Default)]
pub struct InMemoryFactRepository {
    facts: RwLock<HashMap<FactId, Fact>>,
}

impl InMemoryFactRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores or replaces a Fact projection.
    pub async fn save_fact(&self, fact: Fact) {
        self.facts.write().await.insert(fact.id(), fact);
    }
}

#[async_trait]
impl FactLookup for InMemoryFactRepository {
    async fn fetch_fact(&self, fact_id: FactId) -> AppResult<Fact> {
        self.facts
            .read()
            .await
            .get(&fact_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("fact '{fact_id}' does not exist")))
    }
}
