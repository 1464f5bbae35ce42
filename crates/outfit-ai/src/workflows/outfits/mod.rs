//! Daily outfit generation: anchor search, rule scoring, external judgment, and
//! diversity-aware assembly.

pub mod assembler;
pub mod compatibility;
pub mod domain;
pub mod generator;
pub mod judge;
pub mod pipeline;
pub mod rules;

#[cfg(test)]
mod tests;

pub use assembler::{assemble, enforce_diversity};
pub use domain::{
    Category, CandidateId, Formality, Garment, GarmentId, GenerationConfig, Material,
    OutfitCandidate, OutfitId, Pattern, ScoredOutfit, Seasonality, StyleBucket,
    StylePreferences, TimeOfDay, WeatherCondition, WeatherContext,
};
pub use generator::CandidateGenerator;
pub use judge::{
    CompletionClient, CompletionRequest, HttpCompletionClient, JudgeError, JudgeSettings,
    Judgment, OutfitJudge,
};
pub use pipeline::{GenerationError, GenerationRequest, OutfitPipeline};
pub use rules::{RejectReason, RuleMode, RuleVerdict, RulesEngine};
