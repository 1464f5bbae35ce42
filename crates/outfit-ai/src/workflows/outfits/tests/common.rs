use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};

use crate::workflows::outfits::domain::{
    Category, Formality, Garment, OutfitCandidate, StyleBucket,
};
use crate::workflows::outfits::judge::{
    CompletionClient, CompletionRequest, JudgeError, JudgeSettings, OutfitJudge,
};

pub(super) fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 6, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn garment(id: &str, category: Category, color: &str) -> Garment {
    Garment::new(id, format!("{id} piece"), category, color)
}

pub(super) fn top(id: &str, color: &str) -> Garment {
    garment(id, Category::Top, color)
}

pub(super) fn bottom(id: &str, color: &str) -> Garment {
    garment(id, Category::Bottom, color)
}

pub(super) fn shoes(id: &str, color: &str) -> Garment {
    garment(id, Category::Shoes, color)
}

pub(super) fn styled(mut garment: Garment, style: StyleBucket) -> Garment {
    garment.style = style;
    garment
}

pub(super) fn formal(mut garment: Garment, formality: Formality) -> Garment {
    garment.formality = formality;
    garment
}

pub(super) fn candidate(top: Garment, bottom: Garment, shoes: Garment) -> OutfitCandidate {
    OutfitCandidate::new(top, bottom, shoes, None, None)
}

pub(super) fn scored_candidate(
    top: Garment,
    bottom: Garment,
    shoes: Garment,
    score: u8,
) -> OutfitCandidate {
    let mut candidate = candidate(top, bottom, shoes);
    candidate.set_rule_score(score);
    candidate
}

/// Twelve pieces: a normal-mode wardrobe with room for variety.
pub(super) fn capsule_wardrobe() -> Vec<Garment> {
    vec![
        styled(top("tee-white", "white"), StyleBucket::Minimalist),
        styled(top("tee-black", "black"), StyleBucket::Minimalist),
        styled(top("shirt-blue", "blue"), StyleBucket::Classic),
        styled(top("hoodie-green", "green"), StyleBucket::Streetwear),
        bottom("jeans-blue", "blue"),
        bottom("chinos-khaki", "khaki"),
        styled(bottom("trousers-gray", "gray"), StyleBucket::Classic),
        bottom("skirt-red", "red"),
        shoes("sneakers-white", "white"),
        shoes("boots-brown", "brown"),
        garment("jacket-navy", Category::Outerwear, "navy"),
        garment("scarf-orange", Category::Accessory, "orange"),
    ]
}

pub(super) fn judge_with<C: CompletionClient>(client: C) -> OutfitJudge<C> {
    OutfitJudge::new(client, JudgeSettings::default())
}

/// Returns the same reply to every request and records what was asked.
#[derive(Default)]
pub(super) struct CannedClient {
    reply: String,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl CannedClient {
    pub(super) fn new(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().expect("requests mutex poisoned").clone()
    }
}

#[async_trait]
impl CompletionClient for CannedClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String, JudgeError> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request);
        Ok(self.reply.clone())
    }
}

pub(super) struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, JudgeError> {
        Err(JudgeError::Transport("connection refused".to_string()))
    }
}

/// Sleeps past any reasonable judge timeout before answering.
pub(super) struct SlowClient(pub(super) Duration);

#[async_trait]
impl CompletionClient for SlowClient {
    async fn complete(&self, _request: CompletionRequest) -> Result<String, JudgeError> {
        tokio::time::sleep(self.0).await;
        Ok("[]".to_string())
    }
}

pub(super) fn shared<C: CompletionClient + 'static>(client: C) -> Arc<C> {
    Arc::new(client)
}
