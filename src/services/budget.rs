use crate::models::{PreferenceRecord, PrescriptiveSuggestion, Suggestion};

pub const MISSING_PACKING_TIPS: &str = "No packing tips available for this destination";

/// Rounds half away from zero to `places` decimals, on the value as written in decimal
///
/// `10.01 / 2` is stored as `5.00499..`; rounding its shortest decimal form `5.005`
/// gives `5.01`, where scaling the binary value would give `5.00`.
pub fn round_to(value: f64, places: usize) -> f64 {
    if !value.is_finite() {
        return value;
    }

    // f64 Display is the shortest round-trip form and never uses an exponent
    let repr = value.abs().to_string();
    let (whole, fraction) = repr.split_once('.').unwrap_or((repr.as_str(), ""));
    if fraction.len() <= places {
        return value;
    }

    let round_up = fraction.as_bytes()[places] >= b'5';
    let units = match format!("{}{}", whole, &fraction[..places]).parse::<u128>() {
        Ok(units) => units + u128::from(round_up),
        Err(_) => return value,
    };

    let rounded = units as f64 / 10f64.powi(places as i32);
    if value.is_sign_negative() {
        -rounded
    } else {
        rounded
    }
}

/// Traveler's budget spread evenly over the trip, to the cent
pub fn daily_budget(preference: &PreferenceRecord) -> f64 {
    round_to(preference.budget / f64::from(preference.trip_duration.get()), 2)
}

/// Builds the prescriptive view: same order and length as `suggestions`, each annotated
/// with the traveler's daily and total budget
pub fn annotate(
    suggestions: &[Suggestion],
    preference: &PreferenceRecord,
) -> Vec<PrescriptiveSuggestion> {
    let daily = daily_budget(preference);
    let total = round_to(preference.budget, 2);
    let trip_duration = preference.trip_duration.get();

    suggestions
        .iter()
        .map(|suggestion| {
            let mut suggestion = suggestion.clone();
            if suggestion.packing_tips.trim().is_empty() {
                suggestion.packing_tips = MISSING_PACKING_TIPS.to_string();
            }

            PrescriptiveSuggestion {
                suggestion,
                daily_budget: daily,
                total_budget: total,
                trip_duration,
            }
        })
        .collect()
}
