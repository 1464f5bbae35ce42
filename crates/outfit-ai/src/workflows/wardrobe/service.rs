use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::repository::{RepositoryError, UserId, WardrobeRepository};
use crate::workflows::outfits::domain::{
    Garment, GarmentId, GenerationConfig, ScoredOutfit, StylePreferences, WeatherContext,
};
use crate::workflows::outfits::judge::CompletionClient;
use crate::workflows::outfits::pipeline::{
    GenerationError, GenerationRequest, OutfitPipeline, DEFAULT_TARGET_COUNT,
};
use crate::workflows::outfits::rules::{RuleMode, DEFAULT_RECENT_WINDOW_DAYS};

/// Per-call inputs a caller sends alongside a stored wardrobe.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    pub weather: Option<WeatherContext>,
    pub preferences: StylePreferences,
    pub config: GenerationConfig,
    pub target_count: Option<usize>,
    pub recent_window_days: Option<u32>,
    pub mode_override: Option<RuleMode>,
}

impl GenerateOptions {
    pub fn into_request(self, wardrobe: Vec<Garment>) -> GenerationRequest {
        let mut request = GenerationRequest::new(wardrobe);
        request.weather = self.weather;
        request.preferences = self.preferences;
        request.config = self.config;
        request.target_count = self.target_count.unwrap_or(DEFAULT_TARGET_COUNT);
        request.recent_window_days = self
            .recent_window_days
            .unwrap_or(DEFAULT_RECENT_WINDOW_DAYS);
        request.mode_override = self.mode_override;
        request
    }
}

/// Feeds stored wardrobes into the pipeline and records confirmed wears.
pub struct WardrobeService<R, C> {
    repository: Arc<R>,
    pipeline: Arc<OutfitPipeline<C>>,
}

impl<R, C> WardrobeService<R, C>
where
    R: WardrobeRepository + 'static,
    C: CompletionClient + 'static,
{
    pub fn new(repository: Arc<R>, pipeline: Arc<OutfitPipeline<C>>) -> Self {
        Self {
            repository,
            pipeline,
        }
    }

    pub fn garments(&self, user: &UserId) -> Result<Vec<Garment>, WardrobeServiceError> {
        Ok(self.repository.garments(user)?)
    }

    /// Replaces the user's wardrobe, returning how many garments were stored.
    pub fn import(
        &self,
        user: &UserId,
        garments: Vec<Garment>,
    ) -> Result<usize, WardrobeServiceError> {
        let count = garments.len();
        self.repository.replace(user, garments)?;
        info!(user = %user, garments = count, "wardrobe imported");
        Ok(count)
    }

    pub async fn generate(
        &self,
        user: &UserId,
        options: GenerateOptions,
    ) -> Result<Vec<ScoredOutfit>, WardrobeServiceError> {
        self.generate_at(user, options, Utc::now()).await
    }

    pub async fn generate_at(
        &self,
        user: &UserId,
        options: GenerateOptions,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredOutfit>, WardrobeServiceError> {
        let wardrobe = self.repository.garments(user)?;
        let request = options.into_request(wardrobe);
        let outfits = self.pipeline.generate_at(request, now).await?;
        Ok(outfits)
    }

    /// Records that the user wore the given garments together at `at`.
    ///
    /// Every id must belong to the user; nothing is written otherwise.
    pub fn mark_outfit_worn(
        &self,
        user: &UserId,
        garment_ids: &[GarmentId],
        at: DateTime<Utc>,
    ) -> Result<Vec<Garment>, WardrobeServiceError> {
        if garment_ids.is_empty() {
            return Err(WardrobeServiceError::EmptyOutfit);
        }

        let wardrobe = self.repository.garments(user)?;
        let mut worn = Vec::with_capacity(garment_ids.len());
        for id in garment_ids {
            if worn.iter().any(|garment: &Garment| &garment.id == id) {
                continue;
            }
            let mut garment = wardrobe
                .iter()
                .find(|garment| &garment.id == id)
                .cloned()
                .ok_or_else(|| WardrobeServiceError::UnknownGarment(id.clone()))?;
            garment.mark_worn(at);
            worn.push(garment);
        }

        self.repository.update(user, worn.clone())?;
        info!(user = %user, garments = worn.len(), "outfit marked as worn");
        Ok(worn)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WardrobeServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("garment '{0}' is not in this wardrobe")]
    UnknownGarment(GarmentId),
    #[error("an outfit needs at least one garment")]
    EmptyOutfit,
}
