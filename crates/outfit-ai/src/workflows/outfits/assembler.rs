//! Merges rule scores with judge verdicts and enforces variety in the final set.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use tracing::debug;

use super::domain::{GarmentId, OutfitCandidate, ScoredOutfit, StyleBucket};
use super::judge::{Judgment, FALLBACK_JUSTIFICATION};

/// Outfits always kept ahead of the variety check.
pub const DIVERSITY_HEAD: usize = 3;
const JUDGE_WEIGHT: i32 = 2;

/// Builds the final ranked list of at most `target` outfits.
///
/// Every judged candidate is scored, and the remaining rule-filtered
/// candidates follow as spares in rule order, so the variety pass has
/// alternatives to choose from before the list is cut to `target`.
pub fn assemble(
    candidates: &[OutfitCandidate],
    judgments: &[Judgment],
    target: usize,
    generated_at: DateTime<Utc>,
) -> Vec<ScoredOutfit> {
    let mut used = vec![false; candidates.len()];
    let mut ranked = Vec::with_capacity(candidates.len());

    for judgment in judgments {
        let Some(candidate) = candidates.get(judgment.index) else {
            continue;
        };
        if used[judgment.index] {
            continue;
        }
        used[judgment.index] = true;

        let score = i32::from(candidate.rule_score()) + JUDGE_WEIGHT * judgment.delta;
        ranked.push(ScoredOutfit::new(
            candidate.clone(),
            score,
            judgment.justification.clone(),
            judgment.styling_tip.clone(),
            judgment.vibe_tags.clone(),
            generated_at,
        ));
    }
    sort_by_score(&mut ranked);

    let mut spares: Vec<usize> = (0..candidates.len()).filter(|&i| !used[i]).collect();
    spares.sort_by(|&a, &b| candidates[b].rule_score().cmp(&candidates[a].rule_score()));
    debug!(
        judged = ranked.len(),
        spares = spares.len(),
        "ranking rule-scored spares behind judged outfits"
    );

    ranked.extend(spares.into_iter().map(|index| {
        let candidate = &candidates[index];
        ScoredOutfit::new(
            candidate.clone(),
            i32::from(candidate.rule_score()),
            FALLBACK_JUSTIFICATION.to_string(),
            None,
            Vec::new(),
            generated_at,
        )
    }));

    enforce_diversity(ranked, target)
}

/// Walks `outfits` in preference order, keeps the first three, then prefers
/// outfits that add something new. The result is sorted by final score.
pub fn enforce_diversity(outfits: Vec<ScoredOutfit>, target: usize) -> Vec<ScoredOutfit> {
    if outfits.len() <= DIVERSITY_HEAD {
        let mut outfits = outfits;
        outfits.truncate(target);
        sort_by_score(&mut outfits);
        return outfits;
    }

    let mut seen = VarietyLedger::default();
    let mut kept = Vec::with_capacity(target);
    let mut skipped = Vec::new();

    for (position, outfit) in outfits.into_iter().enumerate() {
        if kept.len() >= target {
            break;
        }
        if position < DIVERSITY_HEAD || seen.is_novel(&outfit.candidate) {
            seen.record(&outfit.candidate);
            kept.push(outfit);
        } else {
            skipped.push(outfit);
        }
    }

    if kept.len() < target {
        let missing = target - kept.len();
        debug!(missing, "variety pass short, backfilling in preference order");
        kept.extend(skipped.into_iter().take(missing));
    }

    sort_by_score(&mut kept);
    kept
}

fn sort_by_score(outfits: &mut [ScoredOutfit]) {
    outfits.sort_by(|a, b| b.final_score.cmp(&a.final_score));
}

#[derive(Default)]
struct VarietyLedger {
    tops: HashSet<GarmentId>,
    bottoms: HashSet<GarmentId>,
    color_pairs: HashSet<(String, String)>,
    top_styles: HashSet<StyleBucket>,
}

impl VarietyLedger {
    fn is_novel(&self, candidate: &OutfitCandidate) -> bool {
        !self.tops.contains(&candidate.top.id)
            || !self.bottoms.contains(&candidate.bottom.id)
            || !self.color_pairs.contains(&candidate.color_pair())
            || !self.top_styles.contains(&candidate.top.style)
    }

    fn record(&mut self, candidate: &OutfitCandidate) {
        self.tops.insert(candidate.top.id.clone());
        self.bottoms.insert(candidate.bottom.id.clone());
        self.color_pairs.insert(candidate.color_pair());
        self.top_styles.insert(candidate.top.style);
    }
}
