use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::Duration as ChronoDuration;

use super::common::*;
use crate::workflows::outfits::domain::{
    Garment, GarmentId, GenerationConfig, Material, Seasonality, WeatherCondition, WeatherContext,
};
use crate::workflows::outfits::judge::{CompletionClient, FALLBACK_JUSTIFICATION};
use crate::workflows::outfits::pipeline::{GenerationError, GenerationRequest, OutfitPipeline};
use crate::workflows::outfits::rules::RuleMode;

fn pipeline_with<C: CompletionClient>(client: C) -> OutfitPipeline<C> {
    OutfitPipeline::new(judge_with(client))
}

fn seeded_request(wardrobe: Vec<Garment>) -> GenerationRequest {
    let mut request = GenerationRequest::new(wardrobe);
    request.config.seed = Some(17);
    request
}

#[tokio::test]
async fn tiny_wardrobe_is_insufficient_input() {
    let pipeline = pipeline_with(CannedClient::new("[]"));
    let request = seeded_request(vec![
        top("t", "white"),
        bottom("b", "blue"),
        shoes("s", "white"),
        top("t2", "black"),
    ]);

    let err = pipeline
        .generate_at(request, now())
        .await
        .expect_err("four items are not enough");

    assert!(matches!(err, GenerationError::InsufficientInput { .. }));
}

#[tokio::test]
async fn missing_category_is_insufficient_input() {
    let pipeline = pipeline_with(CannedClient::new("[]"));
    let request = seeded_request(vec![
        top("t1", "white"),
        top("t2", "black"),
        bottom("b1", "blue"),
        bottom("b2", "khaki"),
        top("t3", "gray"),
    ]);

    let err = pipeline
        .generate_at(request, now())
        .await
        .expect_err("no shoes");

    assert_eq!(
        err,
        GenerationError::InsufficientInput {
            reason: "wardrobe has no shoes".to_string()
        }
    );
}

#[tokio::test]
async fn pinned_mode_skips_the_size_floor_but_not_the_categories() {
    let pipeline = pipeline_with(CannedClient::new("[]"));
    let mut request = seeded_request(vec![top("tee", "white"), bottom("jeans", "blue")]);
    request.mode_override = Some(RuleMode::Loose);

    let err = pipeline
        .generate_at(request, now())
        .await
        .expect_err("no shoes even with a pinned mode");

    assert_eq!(
        err,
        GenerationError::InsufficientInput {
            reason: "wardrobe has no shoes".to_string()
        }
    );
}

#[tokio::test]
async fn pinned_disabled_mode_is_insufficient_input() {
    let pipeline = pipeline_with(CannedClient::new("[]"));
    let mut request = seeded_request(capsule_wardrobe());
    request.mode_override = Some(RuleMode::Disabled);

    let err = pipeline
        .generate_at(request, now())
        .await
        .expect_err("disabled mode never ranks");

    assert!(matches!(err, GenerationError::InsufficientInput { .. }));
}

#[tokio::test]
async fn weather_ruling_out_every_top_is_no_viable_combinations() {
    let pipeline = pipeline_with(CannedClient::new("[]"));
    let mut wardrobe = vec![
        top("sweater-1", "gray"),
        top("sweater-2", "cream"),
        bottom("b1", "blue"),
        bottom("b2", "khaki"),
        shoes("s", "white"),
    ];
    for sweater in wardrobe.iter_mut().take(2) {
        sweater.material = Material::Wool;
        sweater.seasonality = Seasonality::Winter;
    }
    let mut request = seeded_request(wardrobe);
    request.weather = Some(WeatherContext::from_temperature(90.0));

    let err = pipeline
        .generate_at(request, now())
        .await
        .expect_err("every candidate is too warm");

    assert!(matches!(err, GenerationError::NoViableCombinations { .. }));
}

#[tokio::test]
async fn three_piece_wardrobe_with_pinned_mode_yields_one_outfit() {
    let client = shared(CannedClient::new(
        r#"[{"index": 0, "delta": 2, "justification": "Clean and bright.", "vibe_tags": ["fresh"]}]"#,
    ));
    let pipeline = pipeline_with(Arc::clone(&client));
    let mut request = seeded_request(vec![
        top("tee", "white"),
        bottom("jeans", "blue"),
        shoes("sneakers", "white"),
    ]);
    request.weather = Some(WeatherContext::new(70.0, WeatherCondition::Sunny));
    request.mode_override = Some(RuleMode::Loose);
    request.config = GenerationConfig {
        max_candidates: 10,
        seed: Some(17),
        ..GenerationConfig::default()
    };

    let outfits = pipeline
        .generate_at(request, now())
        .await
        .expect("one outfit");

    assert_eq!(outfits.len(), 1);
    let outfit = &outfits[0];
    assert_eq!(outfit.candidate.id.0, "tee-jeans-sneakers");
    assert_eq!(outfit.final_score, 100);
    assert_eq!(outfit.justification, "Clean and bright.");
    assert_eq!(outfit.vibe_tags, vec!["fresh"]);
    assert_eq!(outfit.generated_at, now());
    assert_eq!(client.requests().len(), 1);
}

#[tokio::test]
async fn judge_failure_still_returns_rule_ranked_outfits() {
    let pipeline = pipeline_with(FailingClient);
    let request = seeded_request(capsule_wardrobe());

    let outfits = pipeline
        .generate_at(request, now())
        .await
        .expect("judge failures never fail generation");

    assert_eq!(outfits.len(), 3);
    assert!(outfits
        .iter()
        .all(|outfit| outfit.justification == FALLBACK_JUSTIFICATION));
    assert!(outfits
        .windows(2)
        .all(|pair| pair[0].final_score >= pair[1].final_score));
}

#[tokio::test]
async fn recent_wear_lowers_scores_in_normal_mode() {
    let mut wardrobe = capsule_wardrobe();
    for garment in wardrobe.iter_mut() {
        garment.last_worn = Some(now() - ChronoDuration::days(1));
    }
    let pipeline = pipeline_with(FailingClient);

    let outfits = pipeline
        .generate_at(seeded_request(wardrobe), now())
        .await
        .expect("recent wear is a soft penalty below strict mode");

    assert!(outfits.iter().all(|outfit| outfit.final_score <= 75));
}

#[tokio::test]
async fn explicit_recent_set_overrides_last_worn() {
    let mut request = seeded_request(capsule_wardrobe());
    request.recently_worn = Some(HashSet::from([GarmentId::new("tee-white")]));
    let pipeline = pipeline_with(FailingClient);

    let outfits = pipeline
        .generate_at(request, now())
        .await
        .expect("outfits");

    for outfit in &outfits {
        if outfit.candidate.top.id.as_str() == "tee-white" {
            assert!(outfit.final_score <= 90);
        }
    }
}

#[tokio::test]
async fn dropping_the_future_cancels_a_slow_judge() {
    let pipeline = pipeline_with(SlowClient(Duration::from_secs(5)));
    let request = seeded_request(capsule_wardrobe());

    let outcome =
        tokio::time::timeout(Duration::from_millis(50), pipeline.generate_at(request, now())).await;

    assert!(outcome.is_err(), "the caller's deadline wins over the judge");
}

#[test]
fn request_deserializes_with_defaults() {
    let request: GenerationRequest = serde_json::from_value(serde_json::json!({
        "wardrobe": [],
        "weather": {"temperature_f": 64.0, "condition": "cloudy"},
        "mode_override": "loose"
    }))
    .expect("valid request");

    assert_eq!(request.target_count, 3);
    assert_eq!(request.recent_window_days, 3);
    assert_eq!(request.rule_mode(), RuleMode::Loose);
    assert_eq!(
        request.weather,
        Some(WeatherContext::new(64.0, WeatherCondition::Cloudy))
    );
}
