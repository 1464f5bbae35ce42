use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use super::assembler::assemble;
use super::domain::{
    Category, Garment, GarmentId, GenerationConfig, ScoredOutfit, StylePreferences,
    WeatherContext,
};
use super::generator::CandidateGenerator;
use super::judge::{CompletionClient, OutfitJudge};
use super::rules::{RuleMode, RulesEngine, DEFAULT_RECENT_WINDOW_DAYS};

pub const DEFAULT_TARGET_COUNT: usize = 3;
pub const MIN_WARDROBE_ITEMS: usize = 5;

/// Caller-visible generation failures. Judge problems never surface here.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("cannot generate outfits: {reason}")]
    InsufficientInput { reason: String },
    #[error("no viable outfit combinations: {reason}")]
    NoViableCombinations { reason: String },
}

/// Everything one generation call needs; the wardrobe is an immutable snapshot.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationRequest {
    pub wardrobe: Vec<Garment>,
    #[serde(default)]
    pub weather: Option<WeatherContext>,
    #[serde(default)]
    pub preferences: StylePreferences,
    #[serde(default)]
    pub config: GenerationConfig,
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    /// Ids worn inside the recent window. Computed from `last_worn` when absent.
    #[serde(default)]
    pub recently_worn: Option<HashSet<GarmentId>>,
    #[serde(default = "default_recent_window")]
    pub recent_window_days: u32,
    /// Pins the rule mode instead of deriving it from wardrobe size.
    ///
    /// Any mode other than `Disabled` bypasses the five-item wardrobe floor,
    /// so even a three-piece wardrobe is ranked. The wardrobe must still hold
    /// at least one top, one bottom and one pair of shoes.
    #[serde(default)]
    pub mode_override: Option<RuleMode>,
}

fn default_target_count() -> usize {
    DEFAULT_TARGET_COUNT
}

fn default_recent_window() -> u32 {
    DEFAULT_RECENT_WINDOW_DAYS
}

impl GenerationRequest {
    pub fn new(wardrobe: Vec<Garment>) -> Self {
        Self {
            wardrobe,
            weather: None,
            preferences: StylePreferences::default(),
            config: GenerationConfig::default(),
            target_count: DEFAULT_TARGET_COUNT,
            recently_worn: None,
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
            mode_override: None,
        }
    }

    pub fn rule_mode(&self) -> RuleMode {
        self.mode_override
            .unwrap_or_else(|| RuleMode::for_wardrobe_size(self.wardrobe.len()))
    }
}

/// Generator → rules → judge → assembler, for a single request.
///
/// Holds no per-request state, so one pipeline can serve concurrent callers.
/// Dropping the returned future cancels an in-flight judge call.
pub struct OutfitPipeline<C> {
    judge: OutfitJudge<C>,
}

impl<C> OutfitPipeline<C>
where
    C: CompletionClient,
{
    pub fn new(judge: OutfitJudge<C>) -> Self {
        Self { judge }
    }

    pub async fn generate(
        &self,
        request: GenerationRequest,
    ) -> Result<Vec<ScoredOutfit>, GenerationError> {
        self.generate_at(request, Utc::now()).await
    }

    pub async fn generate_at(
        &self,
        request: GenerationRequest,
        now: DateTime<Utc>,
    ) -> Result<Vec<ScoredOutfit>, GenerationError> {
        let mode = request.rule_mode();
        check_wardrobe(&request.wardrobe, mode)?;

        let recently_worn = request.recently_worn.clone().unwrap_or_else(|| {
            super::rules::recently_worn_ids(&request.wardrobe, now, request.recent_window_days)
        });
        let rules = RulesEngine::new(mode)
            .with_weather(request.weather)
            .with_recently_worn(recently_worn)
            .with_recent_window_days(request.recent_window_days);

        let mut generator = CandidateGenerator::new(request.config.clone());
        let candidates = generator.generate(
            &request.wardrobe,
            request.weather.as_ref(),
            &request.preferences,
            &rules,
        );

        if candidates.is_empty() {
            return Err(GenerationError::NoViableCombinations {
                reason: "every combination was ruled out by weather or compatibility rules"
                    .to_string(),
            });
        }

        let judgments = self
            .judge
            .score_outfits(
                &candidates,
                request.weather.as_ref(),
                &request.preferences,
                request.target_count,
            )
            .await;

        let outfits = assemble(&candidates, &judgments, request.target_count, now);
        info!(
            mode = mode.label(),
            wardrobe = request.wardrobe.len(),
            candidates = candidates.len(),
            judged = judgments.len(),
            returned = outfits.len(),
            "outfit generation complete"
        );
        Ok(outfits)
    }
}

fn check_wardrobe(wardrobe: &[Garment], mode: RuleMode) -> Result<(), GenerationError> {
    if mode == RuleMode::Disabled {
        return Err(GenerationError::InsufficientInput {
            reason: format!(
                "add at least {MIN_WARDROBE_ITEMS} items to your wardrobe (currently {})",
                wardrobe.len()
            ),
        });
    }

    let missing: Vec<&str> = [Category::Top, Category::Bottom, Category::Shoes]
        .into_iter()
        .filter(|category| !wardrobe.iter().any(|garment| garment.category == *category))
        .map(Category::label)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(GenerationError::InsufficientInput {
            reason: format!("wardrobe has no {}", missing.join(", no ")),
        })
    }
}
