mod mode;

pub use mode::RuleMode;

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, info};

use super::compatibility::{
    colors_clash, colors_harmonize, formality_compatible, patterns_compatible, weather_conflict,
    WeatherConflict,
};
use super::domain::{Category, Garment, GarmentId, OutfitCandidate, WeatherContext};

pub const DEFAULT_RECENT_WINDOW_DAYS: u32 = 3;

const BASE_SCORE: i32 = 100;
const CLASH_PENALTY: i32 = 20;
const HARMONY_BONUS: i32 = 5;
const FORMALITY_PENALTY: i32 = 15;
const PATTERN_PENALTY: i32 = 10;
const SHOE_FORMALITY_PENALTY: i32 = 10;
const RECENT_WEAR_PENALTY: i32 = 15;
const OUTERWEAR_BONUS: i32 = 10;

/// Why a candidate was dropped outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "reason")]
pub enum RejectReason {
    RulesDisabled,
    WeatherInappropriate {
        slot: Category,
        conflict: WeatherConflict,
    },
    RecentlyWorn {
        slot: Category,
    },
    ColorClash,
    FormalityMismatch,
    PatternMismatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleVerdict {
    Rejected(RejectReason),
    Scored(u8),
}

/// Stateless scorer applying the mode-dependent rubric to candidates.
#[derive(Debug, Clone)]
pub struct RulesEngine {
    mode: RuleMode,
    weather: Option<WeatherContext>,
    recently_worn: HashSet<GarmentId>,
    recent_window_days: u32,
}

impl RulesEngine {
    pub fn new(mode: RuleMode) -> Self {
        Self {
            mode,
            weather: None,
            recently_worn: HashSet::new(),
            recent_window_days: DEFAULT_RECENT_WINDOW_DAYS,
        }
    }

    pub fn with_weather(mut self, weather: Option<WeatherContext>) -> Self {
        self.weather = weather;
        self
    }

    /// The caller computes this set; see [`recently_worn_ids`].
    pub fn with_recently_worn(mut self, recently_worn: HashSet<GarmentId>) -> Self {
        self.recently_worn = recently_worn;
        self
    }

    pub fn with_recent_window_days(mut self, days: u32) -> Self {
        self.recent_window_days = days;
        self
    }

    pub fn mode(&self) -> RuleMode {
        self.mode
    }

    pub fn weather(&self) -> Option<&WeatherContext> {
        self.weather.as_ref()
    }

    pub fn recent_window_days(&self) -> u32 {
        self.recent_window_days
    }

    pub fn evaluate(&self, candidate: &OutfitCandidate) -> RuleVerdict {
        if self.mode == RuleMode::Disabled {
            return RuleVerdict::Rejected(RejectReason::RulesDisabled);
        }

        if let Some(weather) = &self.weather {
            let slots = [
                (Category::Top, &candidate.top),
                (Category::Bottom, &candidate.bottom),
                (Category::Shoes, &candidate.shoes),
            ];
            for (slot, garment) in slots {
                if let Some(conflict) = weather_conflict(garment, weather) {
                    return RuleVerdict::Rejected(RejectReason::WeatherInappropriate {
                        slot,
                        conflict,
                    });
                }
            }
        }

        let strict = self.mode.is_strict();
        let top_recent = self.recently_worn.contains(&candidate.top.id);
        let bottom_recent = self.recently_worn.contains(&candidate.bottom.id);

        if strict && top_recent {
            return RuleVerdict::Rejected(RejectReason::RecentlyWorn { slot: Category::Top });
        }
        if strict && bottom_recent {
            return RuleVerdict::Rejected(RejectReason::RecentlyWorn {
                slot: Category::Bottom,
            });
        }

        let (top, bottom, shoes) = (&candidate.top, &candidate.bottom, &candidate.shoes);
        let mut score = BASE_SCORE;

        if colors_clash(&top.primary_color, &bottom.primary_color) {
            if strict {
                return RuleVerdict::Rejected(RejectReason::ColorClash);
            }
            score -= CLASH_PENALTY;
        } else if colors_harmonize(&top.primary_color, &bottom.primary_color) {
            score += HARMONY_BONUS;
        }

        if !formality_compatible(top, bottom, self.mode) {
            if strict {
                return RuleVerdict::Rejected(RejectReason::FormalityMismatch);
            }
            score -= FORMALITY_PENALTY;
        }

        if !patterns_compatible(top.pattern, bottom.pattern, self.mode) {
            if strict {
                return RuleVerdict::Rejected(RejectReason::PatternMismatch);
            }
            score -= PATTERN_PENALTY;
        }

        if shoes.formality.distance(top.formality) > 2 {
            score -= SHOE_FORMALITY_PENALTY;
        }

        if !strict {
            if top_recent {
                score -= RECENT_WEAR_PENALTY;
            }
            if bottom_recent {
                score -= RECENT_WEAR_PENALTY;
            }
        }

        let jacket_weather = self.weather.map_or(false, |weather| weather.needs_jacket());
        if jacket_weather && candidate.outerwear.is_some() {
            score += OUTERWEAR_BONUS;
        }

        RuleVerdict::Scored(score.clamp(0, 100) as u8)
    }

    /// Scores a single candidate, overwriting its rule score, or drops it.
    pub fn filter_candidate(&self, mut candidate: OutfitCandidate) -> Option<OutfitCandidate> {
        match self.evaluate(&candidate) {
            RuleVerdict::Scored(score) => {
                candidate.set_rule_score(score);
                Some(candidate)
            }
            RuleVerdict::Rejected(reason) => {
                debug!(candidate = %candidate.id, ?reason, "candidate rejected by rules");
                None
            }
        }
    }

    /// Drops rejected candidates and orders survivors by rule score.
    pub fn filter_candidates(&self, candidates: Vec<OutfitCandidate>) -> Vec<OutfitCandidate> {
        let evaluated = candidates.len();
        let mut survivors: Vec<OutfitCandidate> = candidates
            .into_iter()
            .filter_map(|candidate| self.filter_candidate(candidate))
            .collect();
        survivors.sort_by(|a, b| b.rule_score().cmp(&a.rule_score()));

        info!(
            mode = self.mode.label(),
            evaluated,
            kept = survivors.len(),
            "rules pass complete"
        );
        survivors
    }
}

/// Garments whose last wear falls inside the trailing window ending at `now`.
pub fn recently_worn_ids(
    wardrobe: &[Garment],
    now: DateTime<Utc>,
    window_days: u32,
) -> HashSet<GarmentId> {
    let cutoff = now - Duration::days(i64::from(window_days));
    wardrobe
        .iter()
        .filter(|garment| garment.last_worn.map_or(false, |worn| worn >= cutoff))
        .map(|garment| garment.id.clone())
        .collect()
}
