use metrics_exporter_prometheus::PrometheusHandle;
use outfit_ai::config::JudgeConfig;
use outfit_ai::error::AppError;
use outfit_ai::workflows::outfits::{
    Garment, HttpCompletionClient, JudgeSettings, OutfitJudge, OutfitPipeline, WeatherCondition,
};
use outfit_ai::workflows::wardrobe::{
    RepositoryError, UserId, WardrobeRepository, WardrobeService,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

pub(crate) type ApiWardrobeService =
    WardrobeService<InMemoryWardrobeRepository, HttpCompletionClient>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryWardrobeRepository {
    wardrobes: Arc<Mutex<HashMap<UserId, Vec<Garment>>>>,
}

impl InMemoryWardrobeRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<UserId, Vec<Garment>>>, RepositoryError> {
        self.wardrobes
            .lock()
            .map_err(|_| RepositoryError::Unavailable("wardrobe store lock poisoned".to_string()))
    }
}

impl WardrobeRepository for InMemoryWardrobeRepository {
    fn garments(&self, user: &UserId) -> Result<Vec<Garment>, RepositoryError> {
        let guard = self.lock()?;
        Ok(guard.get(user).cloned().unwrap_or_default())
    }

    fn replace(&self, user: &UserId, garments: Vec<Garment>) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        guard.insert(user.clone(), garments);
        Ok(())
    }

    fn update(&self, user: &UserId, garments: Vec<Garment>) -> Result<(), RepositoryError> {
        let mut guard = self.lock()?;
        let wardrobe = guard.get_mut(user).ok_or(RepositoryError::NotFound)?;
        let owned = garments
            .iter()
            .all(|updated| wardrobe.iter().any(|garment| garment.id == updated.id));
        if !owned {
            return Err(RepositoryError::NotFound);
        }
        for updated in garments {
            if let Some(slot) = wardrobe.iter_mut().find(|garment| garment.id == updated.id) {
                *slot = updated;
            }
        }
        Ok(())
    }
}

/// Pipeline backed by the configured chat-completions endpoint.
pub(crate) fn build_pipeline(
    config: &JudgeConfig,
) -> Result<OutfitPipeline<HttpCompletionClient>, AppError> {
    let client = HttpCompletionClient::from_config(config)?;
    let judge = OutfitJudge::new(client, JudgeSettings::from_config(config));
    Ok(OutfitPipeline::new(judge))
}

pub(crate) fn build_wardrobe_service(
    repository: Arc<InMemoryWardrobeRepository>,
    config: &JudgeConfig,
) -> Result<Arc<ApiWardrobeService>, AppError> {
    let pipeline = Arc::new(build_pipeline(config)?);
    Ok(Arc::new(WardrobeService::new(repository, pipeline)))
}

pub(crate) fn parse_condition(raw: &str) -> Result<WeatherCondition, String> {
    let condition = WeatherCondition::parse(raw);
    if condition == WeatherCondition::Unknown && !raw.trim().eq_ignore_ascii_case("unknown") {
        return Err(format!(
            "unrecognised weather condition '{raw}' (try sunny, cloudy, windy, rainy, stormy, snowy)"
        ));
    }
    Ok(condition)
}
