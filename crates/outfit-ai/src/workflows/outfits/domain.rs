use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Fahrenheit at or above which the day counts as hot.
pub const HOT_THRESHOLD_F: f32 = 80.0;
/// Fahrenheit at or below which the day counts as cold.
pub const COLD_THRESHOLD_F: f32 = 50.0;
/// Below this temperature a jacket is recommended regardless of conditions.
pub const JACKET_THRESHOLD_F: f32 = 60.0;

/// Identifier wrapper for wardrobe garments.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GarmentId(pub String);

impl GarmentId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GarmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Top,
    Bottom,
    Shoes,
    Outerwear,
    Accessory,
}

impl Category {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Shoes => "shoes",
            Self::Outerwear => "outerwear",
            Self::Accessory => "accessory",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "top" | "tops" => Some(Self::Top),
            "bottom" | "bottoms" => Some(Self::Bottom),
            "shoes" | "shoe" | "footwear" => Some(Self::Shoes),
            "outerwear" | "jacket" | "coat" => Some(Self::Outerwear),
            "accessory" | "accessories" => Some(Self::Accessory),
            _ => None,
        }
    }
}

/// Five-step formality ladder; the discriminant is the ordinal level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formality {
    Casual = 1,
    SmartCasual = 2,
    BusinessCasual = 3,
    Business = 4,
    Formal = 5,
}

impl Formality {
    pub const fn level(self) -> u8 {
        self as u8
    }

    pub const fn from_level(level: u8) -> Self {
        match level {
            0 | 1 => Self::Casual,
            2 => Self::SmartCasual,
            3 => Self::BusinessCasual,
            4 => Self::Business,
            _ => Self::Formal,
        }
    }

    pub const fn distance(self, other: Self) -> u8 {
        self.level().abs_diff(other.level())
    }

    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "casual" | "1" => Some(Self::Casual),
            "smart_casual" | "2" => Some(Self::SmartCasual),
            "business_casual" | "3" => Some(Self::BusinessCasual),
            "business" | "4" => Some(Self::Business),
            "formal" | "5" => Some(Self::Formal),
            _ => None,
        }
    }

    /// Maps a free-text occasion onto the formality it calls for.
    pub fn for_occasion(occasion: &str) -> Option<Self> {
        let occasion = occasion.to_ascii_lowercase();
        let words: Vec<&str> = occasion
            .split(|c: char| !c.is_ascii_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        let mentions =
            |phrases: &[&str]| phrases.iter().any(|phrase| mentions_phrase(&words, phrase));

        if mentions(&["wedding", "gala", "black tie", "formal", "funeral", "opera"]) {
            Some(Self::Formal)
        } else if mentions(&["interview", "business", "meeting", "presentation", "conference"]) {
            Some(Self::Business)
        } else if mentions(&["office", "work", "client"]) {
            Some(Self::BusinessCasual)
        } else if mentions(&["date", "dinner", "brunch", "party", "drinks", "theater"]) {
            Some(Self::SmartCasual)
        } else if mentions(&[
            "casual", "weekend", "errand", "gym", "workout", "hike", "beach", "home",
        ]) {
            Some(Self::Casual)
        } else {
            None
        }
    }
}

/// Whole-word phrase match; a trailing plural "s" on the last word still counts.
fn mentions_phrase(words: &[&str], phrase: &str) -> bool {
    let wanted: Vec<&str> = phrase.split_whitespace().collect();
    if wanted.is_empty() || wanted.len() > words.len() {
        return false;
    }
    let last = wanted.len() - 1;
    words.windows(wanted.len()).any(|window| {
        window.iter().zip(&wanted).enumerate().all(|(position, (word, want))| {
            *word == *want
                || (position == last && word.strip_suffix('s') == Some(*want))
        })
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Seasonality {
    Spring,
    Summer,
    Fall,
    Winter,
    AllSeason,
}

impl Seasonality {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "fall" | "autumn" => Some(Self::Fall),
            "winter" => Some(Self::Winter),
            "all_season" | "all" | "any" => Some(Self::AllSeason),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    Cotton,
    Linen,
    Silk,
    Denim,
    Polyester,
    Wool,
    Cashmere,
    Fleece,
    Leather,
    Down,
    Corduroy,
    Tweed,
    Flannel,
    Suede,
    Canvas,
    Knit,
    #[serde(other)]
    Other,
}

impl Material {
    /// Insulating fabrics that are uncomfortable on hot days.
    pub const fn is_heavy(self) -> bool {
        matches!(
            self,
            Self::Wool
                | Self::Cashmere
                | Self::Fleece
                | Self::Down
                | Self::Corduroy
                | Self::Tweed
                | Self::Flannel
        )
    }

    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "cotton" => Self::Cotton,
            "linen" => Self::Linen,
            "silk" => Self::Silk,
            "denim" => Self::Denim,
            "polyester" | "synthetic" => Self::Polyester,
            "wool" | "merino" => Self::Wool,
            "cashmere" => Self::Cashmere,
            "fleece" => Self::Fleece,
            "leather" => Self::Leather,
            "down" => Self::Down,
            "corduroy" => Self::Corduroy,
            "tweed" => Self::Tweed,
            "flannel" => Self::Flannel,
            "suede" => Self::Suede,
            "canvas" => Self::Canvas,
            "knit" => Self::Knit,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pattern {
    Solid,
    Striped,
    Plaid,
    Checked,
    Floral,
    PolkaDot,
    Graphic,
    Animal,
    Geometric,
    Camo,
    #[serde(other)]
    Other,
}

impl Pattern {
    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "" | "solid" | "plain" => Self::Solid,
            "striped" | "stripes" | "stripe" => Self::Striped,
            "plaid" | "tartan" => Self::Plaid,
            "checked" | "check" | "gingham" => Self::Checked,
            "floral" => Self::Floral,
            "polka_dot" | "dots" | "dotted" => Self::PolkaDot,
            "graphic" | "print" => Self::Graphic,
            "animal" | "leopard" | "zebra" => Self::Animal,
            "geometric" => Self::Geometric,
            "camo" | "camouflage" => Self::Camo,
            _ => Self::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleBucket {
    Minimalist,
    Classic,
    Casual,
    Streetwear,
    Athleisure,
    Bohemian,
    Preppy,
    Edgy,
    Romantic,
}

impl StyleBucket {
    pub fn parse(value: &str) -> Option<Self> {
        match normalize_token(value).as_str() {
            "minimalist" | "minimal" => Some(Self::Minimalist),
            "classic" => Some(Self::Classic),
            "casual" => Some(Self::Casual),
            "streetwear" | "street" => Some(Self::Streetwear),
            "athleisure" | "sporty" => Some(Self::Athleisure),
            "bohemian" | "boho" => Some(Self::Bohemian),
            "preppy" => Some(Self::Preppy),
            "edgy" => Some(Self::Edgy),
            "romantic" => Some(Self::Romantic),
            _ => None,
        }
    }
}

/// Digitized wardrobe item. Generation treats it as an immutable snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Garment {
    pub id: GarmentId,
    pub name: String,
    pub category: Category,
    pub primary_color: String,
    #[serde(default)]
    pub secondary_color: Option<String>,
    pub material: Material,
    #[serde(default)]
    pub fit: Option<String>,
    pub pattern: Pattern,
    pub seasonality: Seasonality,
    pub formality: Formality,
    pub style: StyleBucket,
    #[serde(default)]
    pub wear_count: u32,
    #[serde(default)]
    pub last_worn: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    /// Caption produced by the vision service ahead of generation.
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub embedding: Option<Vec<f32>>,
    #[serde(default)]
    pub vibe_scores: BTreeMap<String, f32>,
}

impl Garment {
    /// Creates a casual, solid, all-season cotton garment; adjust fields as needed.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        primary_color: impl Into<String>,
    ) -> Self {
        Self {
            id: GarmentId::new(id),
            name: name.into(),
            category,
            primary_color: primary_color.into().trim().to_ascii_lowercase(),
            secondary_color: None,
            material: Material::Cotton,
            fit: None,
            pattern: Pattern::Solid,
            seasonality: Seasonality::AllSeason,
            formality: Formality::Casual,
            style: StyleBucket::Casual,
            wear_count: 0,
            last_worn: None,
            tags: BTreeSet::new(),
            description: None,
            embedding: None,
            vibe_scores: BTreeMap::new(),
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|value| value.eq_ignore_ascii_case(tag))
    }

    /// Wear-tracking sink: record that the garment was worn at `at`.
    pub fn mark_worn(&mut self, at: DateTime<Utc>) {
        self.wear_count = self.wear_count.saturating_add(1);
        self.last_worn = Some(at);
    }

    /// Short phrase used when describing the garment to the judge.
    pub fn describe(&self) -> String {
        let mut text = format!(
            "{} {} ({:?}, {:?}, {:?} style",
            self.primary_color, self.name, self.material, self.pattern, self.style
        );
        if let Some(secondary) = &self.secondary_color {
            text.push_str(&format!(", accents of {secondary}"));
        }
        if let Some(fit) = &self.fit {
            text.push_str(&format!(", {fit} fit"));
        }
        text.push_str(&format!(", formality {}/5)", self.formality.level()));
        if let Some(caption) = &self.description {
            text.push_str(&format!(": {caption}"));
        }
        text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Windy,
    Rainy,
    Stormy,
    Snowy,
    #[default]
    #[serde(other)]
    Unknown,
}

impl WeatherCondition {
    pub fn parse(value: &str) -> Self {
        match normalize_token(value).as_str() {
            "sunny" | "clear" => Self::Sunny,
            "cloudy" | "overcast" | "fog" | "foggy" => Self::Cloudy,
            "windy" => Self::Windy,
            "rainy" | "rain" | "drizzle" | "showers" => Self::Rainy,
            "stormy" | "storm" | "thunderstorm" => Self::Stormy,
            "snowy" | "snow" | "sleet" => Self::Snowy,
            _ => Self::Unknown,
        }
    }
}

/// Raw weather reading; every flag is derived from these two fields.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherContext {
    pub temperature_f: f32,
    #[serde(default)]
    pub condition: WeatherCondition,
}

impl WeatherContext {
    pub fn new(temperature_f: f32, condition: WeatherCondition) -> Self {
        Self {
            temperature_f,
            condition,
        }
    }

    pub fn from_temperature(temperature_f: f32) -> Self {
        Self::new(temperature_f, WeatherCondition::Unknown)
    }

    pub fn is_hot(&self) -> bool {
        self.temperature_f >= HOT_THRESHOLD_F
    }

    pub fn is_cold(&self) -> bool {
        self.temperature_f <= COLD_THRESHOLD_F
    }

    pub fn is_rainy(&self) -> bool {
        matches!(
            self.condition,
            WeatherCondition::Rainy | WeatherCondition::Stormy
        )
    }

    pub fn is_snowy(&self) -> bool {
        self.condition == WeatherCondition::Snowy || (self.is_rainy() && self.temperature_f <= 32.0)
    }

    pub fn needs_jacket(&self) -> bool {
        self.temperature_f < JACKET_THRESHOLD_F || self.is_rainy() || self.is_snowy()
    }

    pub fn summary(&self) -> String {
        let condition = format!("{:?}", self.condition).to_ascii_lowercase();
        format!("{:.0}°F, {condition}", self.temperature_f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

/// Caller-supplied styling preferences; every field is optional in practice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePreferences {
    pub style_goal: Option<String>,
    pub avoided_colors: BTreeSet<String>,
    pub preferred_styles: Vec<StyleBucket>,
    /// 1 (understated) through 5 (statement).
    pub boldness: u8,
    pub occasion: Option<String>,
    pub time_of_day: Option<TimeOfDay>,
}

impl Default for StylePreferences {
    fn default() -> Self {
        Self {
            style_goal: None,
            avoided_colors: BTreeSet::new(),
            preferred_styles: Vec::new(),
            boldness: 3,
            occasion: None,
            time_of_day: None,
        }
    }
}

impl StylePreferences {
    pub fn target_formality(&self) -> Option<Formality> {
        self.occasion.as_deref().and_then(Formality::for_occasion)
    }

    pub fn boldness_level(&self) -> u8 {
        self.boldness.clamp(1, 5)
    }

    /// Case-insensitive substring match against the avoided colors.
    pub fn avoids_color(&self, color: &str) -> bool {
        let color = color.to_ascii_lowercase();
        self.avoided_colors
            .iter()
            .map(|avoided| avoided.trim().to_ascii_lowercase())
            .any(|avoided| !avoided.is_empty() && color.contains(&avoided))
    }
}

/// Tunables for the candidate generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub max_candidates: usize,
    pub max_anchors: usize,
    pub prioritize_unworn: bool,
    pub include_outerwear: bool,
    pub include_accessories: bool,
    /// Fixes shuffles and coin flips so runs are reproducible.
    pub seed: Option<u64>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            max_candidates: 50,
            max_anchors: 8,
            prioritize_unworn: true,
            include_outerwear: true,
            include_accessories: true,
            seed: None,
        }
    }
}

/// Stable identity of a garment combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Prospective outfit. The rule score is only written by the rules engine.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutfitCandidate {
    pub id: CandidateId,
    pub top: Garment,
    pub bottom: Garment,
    pub shoes: Garment,
    pub outerwear: Option<Garment>,
    pub accessory: Option<Garment>,
    rule_score: u8,
}

impl OutfitCandidate {
    pub fn new(
        top: Garment,
        bottom: Garment,
        shoes: Garment,
        outerwear: Option<Garment>,
        accessory: Option<Garment>,
    ) -> Self {
        let mut parts = vec![top.id.as_str(), bottom.id.as_str(), shoes.id.as_str()];
        if let Some(outer) = &outerwear {
            parts.push(outer.id.as_str());
        }
        if let Some(extra) = &accessory {
            parts.push(extra.id.as_str());
        }
        let id = CandidateId(parts.join("-"));

        Self {
            id,
            top,
            bottom,
            shoes,
            outerwear,
            accessory,
            rule_score: 0,
        }
    }

    pub fn rule_score(&self) -> u8 {
        self.rule_score
    }

    pub(crate) fn set_rule_score(&mut self, score: u8) {
        self.rule_score = score.min(100);
    }

    /// Full (top, bottom, shoes, outerwear, accessory) identity tuple.
    pub fn id_tuple(
        &self,
    ) -> (
        &GarmentId,
        &GarmentId,
        &GarmentId,
        Option<&GarmentId>,
        Option<&GarmentId>,
    ) {
        (
            &self.top.id,
            &self.bottom.id,
            &self.shoes.id,
            self.outerwear.as_ref().map(|garment| &garment.id),
            self.accessory.as_ref().map(|garment| &garment.id),
        )
    }

    pub fn garments(&self) -> impl Iterator<Item = &Garment> {
        [&self.top, &self.bottom, &self.shoes]
            .into_iter()
            .chain(self.outerwear.as_ref())
            .chain(self.accessory.as_ref())
    }

    pub fn color_pair(&self) -> (String, String) {
        (
            self.top.primary_color.clone(),
            self.bottom.primary_color.clone(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OutfitId(pub String);

/// Final recommendation handed back to the caller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredOutfit {
    pub id: OutfitId,
    pub candidate: OutfitCandidate,
    pub final_score: u8,
    pub justification: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styling_tip: Option<String>,
    pub vibe_tags: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl ScoredOutfit {
    pub fn new(
        candidate: OutfitCandidate,
        final_score: i32,
        justification: String,
        styling_tip: Option<String>,
        vibe_tags: Vec<String>,
        generated_at: DateTime<Utc>,
    ) -> Self {
        let id = OutfitId(format!(
            "{}-{}",
            candidate.id,
            generated_at.timestamp_millis()
        ));
        Self {
            id,
            candidate,
            final_score: final_score.clamp(0, 100) as u8,
            justification,
            styling_tip,
            vibe_tags,
            generated_at,
        }
    }
}

fn normalize_token(value: &str) -> String {
    value
        .trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}
