//! Pure pairwise predicates over garment attributes.

use serde::Serialize;

use super::domain::{Category, Garment, Material, Pattern, Seasonality, WeatherContext};
use super::rules::RuleMode;

/// Summer pieces are out of place at or below this temperature.
pub const SUMMER_FLOOR_F: f32 = 50.0;
/// Winter pieces are out of place at or above this temperature.
pub const WINTER_CEILING_F: f32 = 75.0;
/// Heavy fabrics are barred at or above this temperature.
pub const HEAVY_MATERIAL_CEILING_F: f32 = 80.0;
/// Linen is barred at or below this temperature.
pub const LINEN_FLOOR_F: f32 = 50.0;

const NEUTRAL_COLORS: &[&str] = &[
    "black", "white", "gray", "grey", "navy", "beige", "cream", "tan", "brown", "charcoal",
    "ivory", "khaki",
];

// Only loud pairings belong here; everything else is left to the judge.
const CLASHING_PAIRS: &[(&str, &str)] = &[
    ("neon green", "neon pink"),
    ("neon green", "neon orange"),
    ("neon pink", "neon orange"),
    ("neon yellow", "neon pink"),
    ("neon yellow", "neon purple"),
    ("lime", "magenta"),
];

const COMPLEMENTARY_PAIRS: &[(&str, &str)] = &[
    ("blue", "orange"),
    ("red", "green"),
    ("purple", "yellow"),
    ("pink", "green"),
    ("teal", "coral"),
    ("olive", "burgundy"),
    ("blue", "yellow"),
    ("mustard", "purple"),
    ("denim", "red"),
    ("emerald", "blush"),
];

const SAFE_PATTERN_PAIRS: &[(Pattern, Pattern)] = &[
    (Pattern::Striped, Pattern::Floral),
    (Pattern::Striped, Pattern::PolkaDot),
    (Pattern::Plaid, Pattern::Striped),
    (Pattern::Checked, Pattern::Floral),
    (Pattern::Graphic, Pattern::Camo),
];

const OPEN_TOE_TAGS: &[&str] = &[
    "open-toe",
    "open_toe",
    "open toe",
    "sandal",
    "sandals",
    "flip-flops",
];

fn normalize(color: &str) -> String {
    color.trim().to_ascii_lowercase()
}

fn pair_listed(table: &[(&str, &str)], a: &str, b: &str) -> bool {
    table
        .iter()
        .any(|(left, right)| (*left == a && *right == b) || (*left == b && *right == a))
}

pub fn is_neutral(color: &str) -> bool {
    NEUTRAL_COLORS.contains(&normalize(color).as_str())
}

/// Hard signal: only the listed neon pairings clash, and neutrals never do.
pub fn colors_clash(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    if is_neutral(&a) || is_neutral(&b) {
        return false;
    }
    pair_listed(CLASHING_PAIRS, &a, &b)
}

/// Soft signal used for scoring bonuses.
pub fn colors_harmonize(a: &str, b: &str) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    a == b || is_neutral(&a) || is_neutral(&b) || pair_listed(COMPLEMENTARY_PAIRS, &a, &b)
}

pub fn formality_compatible(a: &Garment, b: &Garment, mode: RuleMode) -> bool {
    match mode.formality_threshold() {
        Some(threshold) => a.formality.distance(b.formality) <= threshold,
        None => true,
    }
}

pub fn patterns_compatible(a: Pattern, b: Pattern, mode: RuleMode) -> bool {
    if a == Pattern::Solid || b == Pattern::Solid {
        return true;
    }
    if mode != RuleMode::Strict {
        return true;
    }
    if a == b {
        return false;
    }
    SAFE_PATTERN_PAIRS
        .iter()
        .any(|(left, right)| (*left == a && *right == b) || (*left == b && *right == a))
}

/// Why a garment is unsuitable for the current weather.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherConflict {
    SeasonTooCold,
    SeasonTooWarm,
    MaterialTooHeavy,
    MaterialTooLight,
    OpenToeInPrecipitation,
}

pub fn weather_conflict(garment: &Garment, weather: &WeatherContext) -> Option<WeatherConflict> {
    let temperature = weather.temperature_f;

    match garment.seasonality {
        Seasonality::Summer if temperature <= SUMMER_FLOOR_F => {
            return Some(WeatherConflict::SeasonTooCold)
        }
        Seasonality::Winter if temperature >= WINTER_CEILING_F => {
            return Some(WeatherConflict::SeasonTooWarm)
        }
        _ => {}
    }

    if garment.material.is_heavy() && temperature >= HEAVY_MATERIAL_CEILING_F {
        return Some(WeatherConflict::MaterialTooHeavy);
    }
    if garment.material == Material::Linen && temperature <= LINEN_FLOOR_F {
        return Some(WeatherConflict::MaterialTooLight);
    }

    match garment.category {
        Category::Shoes => {
            let open_toe = OPEN_TOE_TAGS.iter().any(|tag| garment.has_tag(tag));
            if open_toe && (weather.is_rainy() || weather.is_snowy()) {
                Some(WeatherConflict::OpenToeInPrecipitation)
            } else {
                None
            }
        }
        Category::Top | Category::Bottom | Category::Outerwear | Category::Accessory => None,
    }
}

pub fn weather_appropriate(garment: &Garment, weather: &WeatherContext) -> bool {
    weather_conflict(garment, weather).is_none()
}

/// Unknown weather never disqualifies a garment.
pub fn suits_weather(garment: &Garment, weather: Option<&WeatherContext>) -> bool {
    weather.map_or(true, |weather| weather_appropriate(garment, weather))
}
