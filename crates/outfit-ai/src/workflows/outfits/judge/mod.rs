//! Adapter around the external fashion judge.
//!
//! The judge re-ranks a bounded list of rule-approved candidates and writes
//! the human-facing copy. It never fails the generation: transport errors,
//! timeouts and unreadable replies all degrade to a rule-order fallback.

mod client;
pub mod lenient;
mod prompt;

pub use client::{CompletionClient, CompletionRequest, HttpCompletionClient};

use std::collections::BTreeSet;
use std::time::Duration;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::domain::{OutfitCandidate, StylePreferences, WeatherContext};
use crate::config::JudgeConfig;

/// Hard ceiling on candidates sent to the judge, independent of upstream bounds.
pub const MAX_JUDGED_CANDIDATES: usize = 20;
pub const MAX_DELTA: i32 = 10;
pub const FALLBACK_JUSTIFICATION: &str = "A balanced pairing picked by your wardrobe rules.";

const MAX_JUSTIFICATION_WORDS: usize = 25;
const MAX_TIP_WORDS: usize = 10;
const MAX_VIBE_TAGS: usize = 3;
const FALLBACK_VIBE: &str = "versatile";

#[derive(Debug, thiserror::Error)]
pub enum JudgeError {
    #[error("judge credential is not configured")]
    MissingCredential,
    #[error("judge request failed: {0}")]
    Transport(String),
    #[error("judge returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("judge timed out after {0:?}")]
    Timeout(Duration),
    #[error("judge returned an empty response")]
    EmptyResponse,
}

/// The judge's verdict on one input candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Judgment {
    /// Position in the candidate list that was sent.
    pub index: usize,
    pub delta: i32,
    pub justification: String,
    pub styling_tip: Option<String>,
    pub vibe_tags: Vec<String>,
}

impl Judgment {
    pub fn fallback(index: usize) -> Self {
        Self {
            index,
            delta: 0,
            justification: FALLBACK_JUSTIFICATION.to_string(),
            styling_tip: None,
            vibe_tags: vec![FALLBACK_VIBE.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JudgeSettings {
    pub max_candidates: usize,
    pub timeout: Duration,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for JudgeSettings {
    fn default() -> Self {
        Self {
            max_candidates: MAX_JUDGED_CANDIDATES,
            timeout: Duration::from_secs(crate::config::DEFAULT_JUDGE_TIMEOUT_SECS),
            max_tokens: crate::config::DEFAULT_JUDGE_MAX_TOKENS,
            temperature: 0.7,
        }
    }
}

impl JudgeSettings {
    pub fn from_config(config: &JudgeConfig) -> Self {
        Self {
            timeout: config.timeout,
            max_tokens: config.max_tokens,
            ..Self::default()
        }
    }
}

pub struct OutfitJudge<C> {
    client: C,
    settings: JudgeSettings,
}

impl<C> OutfitJudge<C>
where
    C: CompletionClient,
{
    pub fn new(client: C, settings: JudgeSettings) -> Self {
        Self { client, settings }
    }

    pub fn settings(&self) -> &JudgeSettings {
        &self.settings
    }

    /// Asks the judge for up to `target` verdicts. Never fails; see module docs.
    pub async fn score_outfits(
        &self,
        candidates: &[OutfitCandidate],
        weather: Option<&WeatherContext>,
        preferences: &StylePreferences,
        target: usize,
    ) -> Vec<Judgment> {
        let ceiling = self.settings.max_candidates.min(MAX_JUDGED_CANDIDATES);
        let judged = &candidates[..candidates.len().min(ceiling)];
        let target = target.min(judged.len());
        if target == 0 {
            return Vec::new();
        }

        let request = CompletionRequest {
            system: prompt::system_instruction(),
            user: prompt::user_payload(judged, weather, preferences, target),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        let reply =
            match tokio::time::timeout(self.settings.timeout, self.client.complete(request)).await
            {
                Ok(Ok(reply)) => reply,
                Ok(Err(err)) => {
                    warn!(error = %err, "judge unavailable, using rule order");
                    return fallback_judgments(target);
                }
                Err(_) => {
                    warn!(timeout = ?self.settings.timeout, "judge timed out, using rule order");
                    return fallback_judgments(target);
                }
            };

        let mut judgments = parse_judgments(&reply, judged.len());
        if judgments.is_empty() {
            warn!(reply_len = reply.len(), "judge reply unreadable, using rule order");
            return fallback_judgments(target);
        }

        judgments.truncate(target);
        debug!(judged = judged.len(), returned = judgments.len(), "judge verdicts parsed");
        judgments
    }
}

/// Verdicts in input order with no adjustment.
pub fn fallback_judgments(count: usize) -> Vec<Judgment> {
    (0..count).map(Judgment::fallback).collect()
}

/// Decodes a reply into verdicts, discarding any index outside `0..candidate_count`.
pub fn parse_judgments(reply: &str, candidate_count: usize) -> Vec<Judgment> {
    if let Some(values) = lenient::decode_array(reply) {
        let judgments: Vec<Judgment> = values
            .iter()
            .filter_map(Value::as_object)
            .filter_map(judgment_from_object)
            .filter(|judgment| judgment.index < candidate_count)
            .collect();
        if !judgments.is_empty() {
            return judgments;
        }
    }

    lenient::extract_pairs(reply)
        .into_iter()
        .filter(|(index, _)| *index < candidate_count)
        .map(|(index, justification)| Judgment {
            index,
            delta: 0,
            justification: clip_words(&justification, MAX_JUSTIFICATION_WORDS),
            styling_tip: None,
            vibe_tags: Vec::new(),
        })
        .collect()
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|name| object.get(*name))
}

fn as_index(value: &Value) -> Option<usize> {
    match value {
        Value::Number(number) => number.as_u64().and_then(|n| usize::try_from(n).ok()),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    }
}

fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().trim_start_matches('+').parse().ok(),
        _ => None,
    }
}

fn non_empty_text(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|text| !text.is_empty())
}

fn judgment_from_object(object: &Map<String, Value>) -> Option<Judgment> {
    let index = field(object, &["index", "outfit_index", "outfitIndex", "id"]).and_then(as_index)?;

    let delta = field(object, &["delta", "score_delta", "scoreDelta", "adjustment", "vibe_delta"])
        .and_then(as_number)
        .map(|delta| (delta.round() as i32).clamp(-MAX_DELTA, MAX_DELTA))
        .unwrap_or(0);

    let justification = field(object, &["justification", "reason", "rationale"])
        .and_then(non_empty_text)
        .map(|text| clip_words(text, MAX_JUSTIFICATION_WORDS))
        .unwrap_or_else(|| FALLBACK_JUSTIFICATION.to_string());

    let styling_tip = field(object, &["styling_tip", "stylingTip", "tip"])
        .and_then(non_empty_text)
        .map(|text| clip_words(text, MAX_TIP_WORDS));

    let vibe_tags = field(object, &["vibe_tags", "vibeTags", "vibes", "tags"])
        .map(clean_vibe_tags)
        .unwrap_or_default();

    Some(Judgment {
        index,
        delta,
        justification,
        styling_tip,
        vibe_tags,
    })
}

fn clean_vibe_tags(value: &Value) -> Vec<String> {
    let raw: Vec<&str> = match value {
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        Value::String(text) => text.split(',').collect(),
        _ => Vec::new(),
    };

    let mut seen = BTreeSet::new();
    raw.into_iter()
        .filter_map(|tag| tag.split_whitespace().next())
        .map(|word| {
            word.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|word| !word.is_empty())
        .filter(|word| seen.insert(word.clone()))
        .take(MAX_VIBE_TAGS)
        .collect()
}

fn clip_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return words.join(" ");
    }
    let mut clipped = words[..limit].join(" ");
    clipped.push('…');
    clipped
}

#[cfg(test)]
pub(crate) fn clip_words_for_tests(text: &str, limit: usize) -> String {
    clip_words(text, limit)
}
