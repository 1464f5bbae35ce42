//! Anchor-based candidate search.
//!
//! Instead of walking the full tops × bottoms × shoes product, a handful of
//! anchor tops are chosen and only the best-matching bottoms and shoes are
//! expanded for each. The search is a lazy iterator cut off at the configured
//! candidate bound.

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::compatibility::{colors_clash, colors_harmonize, suits_weather};
use super::domain::{
    Category, Formality, Garment, GenerationConfig, OutfitCandidate, StylePreferences,
    WeatherContext,
};
use super::rules::RulesEngine;

pub const MAX_BOTTOMS_PER_ANCHOR: usize = 10;
pub const MAX_SHOES_PER_PAIR: usize = 5;
const MAX_PAIRING_FORMALITY_GAP: u8 = 2;
const MAX_OCCASION_FORMALITY_GAP: u8 = 1;
const ACCESSORY_PROBABILITY: f64 = 0.5;

#[derive(Debug, Default)]
struct WardrobePools<'a> {
    tops: Vec<&'a Garment>,
    bottoms: Vec<&'a Garment>,
    shoes: Vec<&'a Garment>,
    outerwear: Vec<&'a Garment>,
    accessories: Vec<&'a Garment>,
}

impl<'a> WardrobePools<'a> {
    fn partition(wardrobe: &'a [Garment]) -> Self {
        let mut pools = Self::default();
        for garment in wardrobe {
            match garment.category {
                Category::Top => pools.tops.push(garment),
                Category::Bottom => pools.bottoms.push(garment),
                Category::Shoes => pools.shoes.push(garment),
                Category::Outerwear => pools.outerwear.push(garment),
                Category::Accessory => pools.accessories.push(garment),
            }
        }
        pools
    }

    fn can_form_outfit(&self) -> bool {
        !self.tops.is_empty() && !self.bottoms.is_empty() && !self.shoes.is_empty()
    }
}

/// Produces bounded, de-duplicated outfit candidates from a wardrobe snapshot.
#[derive(Debug)]
pub struct CandidateGenerator {
    config: GenerationConfig,
    rng: StdRng,
}

impl CandidateGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Runs the search and hands the result through the rules engine, so
    /// callers only ever see filtered candidates sorted by rule score.
    pub fn generate(
        &mut self,
        wardrobe: &[Garment],
        weather: Option<&WeatherContext>,
        preferences: &StylePreferences,
        rules: &RulesEngine,
    ) -> Vec<OutfitCandidate> {
        let candidates = self.search(wardrobe, weather, preferences);
        debug!(generated = candidates.len(), "candidate search complete");
        rules.filter_candidates(candidates)
    }

    pub(crate) fn search(
        &mut self,
        wardrobe: &[Garment],
        weather: Option<&WeatherContext>,
        preferences: &StylePreferences,
    ) -> Vec<OutfitCandidate> {
        let pools = WardrobePools::partition(wardrobe);
        if !pools.can_form_outfit() {
            debug!(
                tops = pools.tops.len(),
                bottoms = pools.bottoms.len(),
                shoes = pools.shoes.len(),
                "wardrobe is missing a required category"
            );
            return Vec::new();
        }

        let anchors = self.select_anchors(&pools.tops, weather, preferences);
        debug!(anchors = anchors.len(), "anchor tops selected");

        let max_candidates = self.config.max_candidates;
        let include_outerwear = self.config.include_outerwear;
        let include_accessories = self.config.include_accessories;
        let rng = &mut self.rng;
        let pools = &pools;
        let mut seen = HashSet::new();

        anchors
            .into_iter()
            .flat_map(|top| {
                compatible_bottoms(top, &pools.bottoms, weather, preferences)
                    .into_iter()
                    .map(move |bottom| (top, bottom))
            })
            .flat_map(|(top, bottom)| {
                compatible_shoes(top, bottom, &pools.shoes, weather)
                    .into_iter()
                    .map(move |shoes| (top, bottom, shoes))
            })
            .filter(|&(top, bottom, shoes)| seen.insert((&top.id, &bottom.id, &shoes.id)))
            .map(|(top, bottom, shoes)| {
                let outerwear = if include_outerwear {
                    pick_outerwear(top, &pools.outerwear, weather)
                } else {
                    None
                };
                let accessory = if include_accessories {
                    pick_accessory(&mut *rng, top, &pools.accessories)
                } else {
                    None
                };
                OutfitCandidate::new(
                    top.clone(),
                    bottom.clone(),
                    shoes.clone(),
                    outerwear.cloned(),
                    accessory.cloned(),
                )
            })
            .take(max_candidates)
            .collect()
    }

    fn select_anchors<'a>(
        &mut self,
        tops: &[&'a Garment],
        weather: Option<&WeatherContext>,
        preferences: &StylePreferences,
    ) -> Vec<&'a Garment> {
        let quota = self.config.max_anchors;

        let suitable: Vec<&'a Garment> = tops
            .iter()
            .copied()
            .filter(|top| suits_weather(top, weather))
            .collect();
        let mut pool = if suitable.is_empty() {
            tops.to_vec()
        } else {
            suitable
        };

        if let Some(target) = preferences.target_formality() {
            pool.retain(|top| top.formality.distance(target) <= MAX_OCCASION_FORMALITY_GAP);
        }

        if pool.is_empty() {
            return tops.iter().copied().take(quota).collect();
        }

        if self.config.prioritize_unworn {
            pool.sort_by(|a, b| {
                a.wear_count
                    .cmp(&b.wear_count)
                    .then_with(|| a.last_worn.cmp(&b.last_worn))
            });
        } else {
            pool.shuffle(&mut self.rng);
        }

        diverse_selection(pool, quota)
    }
}

/// Greedily favours anchors that add a new style or colour, then tops up the quota.
fn diverse_selection<'a>(ordered: Vec<&'a Garment>, quota: usize) -> Vec<&'a Garment> {
    let mut selected = Vec::with_capacity(quota.min(ordered.len()));
    let mut taken = vec![false; ordered.len()];
    let mut styles = HashSet::new();
    let mut colors = HashSet::new();

    for (index, &garment) in ordered.iter().enumerate() {
        if selected.len() >= quota {
            break;
        }
        let new_style = !styles.contains(&garment.style);
        let new_color = !colors.contains(garment.primary_color.as_str());
        if new_style || new_color {
            styles.insert(garment.style);
            colors.insert(garment.primary_color.as_str());
            taken[index] = true;
            selected.push(garment);
        }
    }

    for (index, &garment) in ordered.iter().enumerate() {
        if selected.len() >= quota {
            break;
        }
        if !taken[index] {
            selected.push(garment);
        }
    }

    selected
}

fn bottom_affinity(top: &Garment, bottom: &Garment) -> i64 {
    let mut score = 0;
    if colors_harmonize(&top.primary_color, &bottom.primary_color) {
        score += 10;
    }
    if top.style == bottom.style {
        score += 5;
    }
    score - i64::from(bottom.wear_count)
}

fn compatible_bottoms<'a>(
    top: &Garment,
    bottoms: &[&'a Garment],
    weather: Option<&WeatherContext>,
    preferences: &StylePreferences,
) -> Vec<&'a Garment> {
    let mut ranked: Vec<(i64, &'a Garment)> = bottoms
        .iter()
        .copied()
        .filter(|bottom| suits_weather(bottom, weather))
        .filter(|bottom| bottom.formality.distance(top.formality) <= MAX_PAIRING_FORMALITY_GAP)
        .filter(|bottom| !colors_clash(&top.primary_color, &bottom.primary_color))
        .filter(|bottom| !preferences.avoids_color(&bottom.primary_color))
        .map(|bottom| (bottom_affinity(top, bottom), bottom))
        .collect();

    ranked.sort_by(|a, b| b.0.cmp(&a.0));
    ranked
        .into_iter()
        .take(MAX_BOTTOMS_PER_ANCHOR)
        .map(|(_, bottom)| bottom)
        .collect()
}

fn compatible_shoes<'a>(
    top: &Garment,
    bottom: &Garment,
    shoes: &[&'a Garment],
    weather: Option<&WeatherContext>,
) -> Vec<&'a Garment> {
    let combined = f32::from(top.formality.level() + bottom.formality.level());
    let average = Formality::from_level((combined / 2.0).round() as u8);

    let mut ranked: Vec<&'a Garment> = shoes
        .iter()
        .copied()
        .filter(|pair| suits_weather(pair, weather))
        .filter(|pair| pair.formality.distance(average) <= MAX_PAIRING_FORMALITY_GAP)
        .collect();

    ranked.sort_by_key(|pair| (pair.formality.distance(average), pair.wear_count));
    ranked.truncate(MAX_SHOES_PER_PAIR);
    ranked
}

fn pick_outerwear<'a>(
    top: &Garment,
    outerwear: &[&'a Garment],
    weather: Option<&WeatherContext>,
) -> Option<&'a Garment> {
    let weather = weather?;
    if !weather.needs_jacket() {
        return None;
    }

    let mut options: Vec<&'a Garment> = outerwear
        .iter()
        .copied()
        .filter(|layer| suits_weather(layer, Some(weather)))
        .filter(|layer| layer.formality.distance(top.formality) <= MAX_PAIRING_FORMALITY_GAP)
        .collect();

    options.sort_by_key(|layer| {
        (
            !colors_harmonize(&top.primary_color, &layer.primary_color),
            layer.wear_count,
        )
    });
    options.into_iter().next()
}

fn pick_accessory<'a, R: Rng>(
    rng: &mut R,
    top: &Garment,
    accessories: &[&'a Garment],
) -> Option<&'a Garment> {
    if accessories.is_empty() || !rng.gen_bool(ACCESSORY_PROBABILITY) {
        return None;
    }

    let harmonious: Vec<&'a Garment> = accessories
        .iter()
        .copied()
        .filter(|item| colors_harmonize(&top.primary_color, &item.primary_color))
        .collect();

    if harmonious.is_empty() {
        accessories.choose(rng).copied()
    } else {
        harmonious.choose(rng).copied()
    }
}

#[cfg(test)]
pub(crate) fn diverse_selection_for_tests<'a>(
    ordered: Vec<&'a Garment>,
    quota: usize,
) -> Vec<&'a Garment> {
    diverse_selection(ordered, quota)
}
