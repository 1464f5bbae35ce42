use crate::workflows::outfits::domain::{OutfitCandidate, StylePreferences, WeatherContext};

pub(crate) fn system_instruction() -> String {
    [
        "You are a warm, decisive personal stylist reviewing outfits built from the user's own closet.",
        "Judge each outfit on cohesion, colour, proportion, and fit for the day.",
        "Reply with a JSON array only. No prose, no markdown.",
    ]
    .join(" ")
}

pub(crate) fn describe_candidate(index: usize, candidate: &OutfitCandidate) -> String {
    let mut line = format!(
        "Outfit {index}: top: {}; bottom: {}; shoes: {}",
        candidate.top.describe(),
        candidate.bottom.describe(),
        candidate.shoes.describe()
    );
    if let Some(outerwear) = &candidate.outerwear {
        line.push_str(&format!("; outerwear: {}", outerwear.describe()));
    }
    if let Some(accessory) = &candidate.accessory {
        line.push_str(&format!("; accessory: {}", accessory.describe()));
    }
    line.push_str(&format!(" [rule score {}]", candidate.rule_score()));
    line
}

pub(crate) fn user_payload(
    candidates: &[OutfitCandidate],
    weather: Option<&WeatherContext>,
    preferences: &StylePreferences,
    target: usize,
) -> String {
    let mut payload = String::new();

    match weather {
        Some(weather) => payload.push_str(&format!("Weather: {}.\n", weather.summary())),
        None => payload.push_str("Weather: unknown.\n"),
    }
    if let Some(occasion) = &preferences.occasion {
        payload.push_str(&format!("Occasion: {occasion}.\n"));
    }
    if let Some(goal) = &preferences.style_goal {
        payload.push_str(&format!("Style goal: {goal}.\n"));
    }
    if !preferences.preferred_styles.is_empty() {
        let styles: Vec<String> = preferences
            .preferred_styles
            .iter()
            .map(|style| format!("{style:?}").to_ascii_lowercase())
            .collect();
        payload.push_str(&format!("Preferred styles: {}.\n", styles.join(", ")));
    }
    if !preferences.avoided_colors.is_empty() {
        let avoided: Vec<&str> = preferences.avoided_colors.iter().map(String::as_str).collect();
        payload.push_str(&format!("Avoid: {}.\n", avoided.join(", ")));
    }
    if let Some(time_of_day) = preferences.time_of_day {
        let label = format!("{time_of_day:?}").to_ascii_lowercase();
        payload.push_str(&format!("Time of day: {label}.\n"));
    }
    payload.push_str(&format!(
        "Boldness: {}/5.\n\n",
        preferences.boldness_level()
    ));

    for (index, candidate) in candidates.iter().enumerate() {
        payload.push_str(&describe_candidate(index, candidate));
        payload.push('\n');
    }

    payload.push_str(&format!(
        "\nPick the best {target} outfits, best first. For each return an object with: \
         \"index\" (the outfit number), \"delta\" (integer from -10 to 10 adjusting its score), \
         \"justification\" (at most 25 words), \"styling_tip\" (at most 10 words), \
         \"vibe_tags\" (1 to 3 single words)."
    ));
    payload
}
