use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::outfits::domain::{Category, Garment};
use crate::workflows::outfits::judge::{
    CompletionClient, CompletionRequest, JudgeError, JudgeSettings, OutfitJudge,
};
use crate::workflows::outfits::pipeline::OutfitPipeline;
use crate::workflows::wardrobe::repository::{RepositoryError, UserId, WardrobeRepository};
use crate::workflows::wardrobe::service::WardrobeService;

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn user() -> UserId {
    UserId::new("ada")
}

pub(super) fn starter_wardrobe() -> Vec<Garment> {
    vec![
        Garment::new("tee-white", "white tee", Category::Top, "white"),
        Garment::new("tee-black", "black tee", Category::Top, "black"),
        Garment::new("jeans", "straight jeans", Category::Bottom, "blue"),
        Garment::new("chinos", "chinos", Category::Bottom, "khaki"),
        Garment::new("sneakers", "canvas sneakers", Category::Shoes, "white"),
        Garment::new("loafers", "loafers", Category::Shoes, "brown"),
    ]
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    wardrobes: Mutex<HashMap<UserId, Vec<Garment>>>,
}

impl MemoryRepository {
    pub(super) fn with_wardrobe(user: &UserId, garments: Vec<Garment>) -> Self {
        let repository = Self::default();
        repository
            .wardrobes
            .lock()
            .expect("repository mutex poisoned")
            .insert(user.clone(), garments);
        repository
    }
}

impl WardrobeRepository for MemoryRepository {
    fn garments(&self, user: &UserId) -> Result<Vec<Garment>, RepositoryError> {
        let guard = self.wardrobes.lock().expect("repository mutex poisoned");
        Ok(guard.get(user).cloned().unwrap_or_default())
    }

    fn replace(&self, user: &UserId, garments: Vec<Garment>) -> Result<(), RepositoryError> {
        let mut guard = self.wardrobes.lock().expect("repository mutex poisoned");
        guard.insert(user.clone(), garments);
        Ok(())
    }

    fn update(&self, user: &UserId, garments: Vec<Garment>) -> Result<(), RepositoryError> {
        let mut guard = self.wardrobes.lock().expect("repository mutex poisoned");
        let wardrobe = guard.get_mut(user).ok_or(RepositoryError::NotFound)?;
        for updated in garments {
            if let Some(slot) = wardrobe.iter_mut().find(|garment| garment.id == updated.id) {
                *slot = updated;
            }
        }
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl WardrobeRepository for UnavailableRepository {
    fn garments(&self, _user: &UserId) -> Result<Vec<Garment>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn replace(&self, _user: &UserId, _garments: Vec<Garment>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _user: &UserId, _garments: Vec<Garment>) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

/// Judge stand-in that always returns the same reply.
pub(super) struct StaticClient(pub(super) &'static str);

#[async_trait]
impl CompletionClient for StaticClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, JudgeError> {
        Ok(self.0.to_string())
    }
}

pub(super) fn build_service<R: WardrobeRepository + 'static>(
    repository: Arc<R>,
    reply: &'static str,
) -> WardrobeService<R, StaticClient> {
    let judge = OutfitJudge::new(StaticClient(reply), JudgeSettings::default());
    WardrobeService::new(repository, Arc::new(OutfitPipeline::new(judge)))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
