// libs/availability-cell/src/store.rs
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{AvailabilityError, AvailabilityProfile};

/// Persistence seam for availability profiles. A durable backend binds this
/// to its own tables; tests and the default deployment use the in-memory
/// store below.
#[async_trait]
pub trait AvailabilityRepository: Send + Sync {
    async fn get(&self, doctor_id: Uuid) -> Result<AvailabilityProfile, AvailabilityError>;

    async fn find(&self, doctor_id: Uuid) -> Option<AvailabilityProfile>;

    async fn upsert(&self, profile: AvailabilityProfile) -> AvailabilityProfile;
}

#[derive(Default)]
pub struct InMemoryAvailabilityStore {
    profiles: RwLock<HashMap<Uuid, AvailabilityProfile>>,
}

impl InMemoryAvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AvailabilityRepository for InMemoryAvailabilityStore {
    async fn get(&self, doctor_id: Uuid) -> Result<AvailabilityProfile, AvailabilityError> {
        self.profiles
            .read()
            .await
            .get(&doctor_id)
            .cloned()
            .ok_or(AvailabilityError::NotFound)
    }

    async fn find(&self, doctor_id: Uuid) -> Option<AvailabilityProfile> {
        self.profiles.read().await.get(&doctor_id).cloned()
    }

    async fn upsert(&self, profile: AvailabilityProfile) -> AvailabilityProfile {
        self.profiles
            .write()
            .await
            .insert(profile.doctor_id, profile.clone());
        profile
    }
}
