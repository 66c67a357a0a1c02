//! Beaufort wind scale
//!
//! Maps wind speeds to the 0-12 Beaufort categories and categories to
//! localized descriptions. Invalid inputs are logged and surfaced as `None`
//! rather than raised; this mirrors the admin UI contract where a missing
//! value renders as an empty field.

use std::str::FromStr;

use super::kmh_to_ms;

/// Upper speed bound (m/s) for each Beaufort category, ascending.
/// The final sentinel bound makes the lookup total for any finite speed.
const BEAUFORT_TABLE: [(f64, u8); 13] = [
    (0.3, 0),
    (1.6, 1),
    (3.4, 2),
    (5.5, 3),
    (8.0, 4),
    (10.8, 5),
    (13.9, 6),
    (17.2, 7),
    (20.8, 8),
    (24.5, 9),
    (28.5, 10),
    (32.7, 11),
    (999.0, 12),
];

// Source for the German descriptions: https://www.smarthomeng.de/vom-winde-verweht
const DESCRIPTIONS_DE: [&str; 13] = [
    "Windstille",
    "leiser Zug",
    "leichte Brise",
    "schwacher Wind",
    "mäßiger Wind",
    "frischer Wind",
    "starker Wind",
    "steifer Wind",
    "stürmischer Wind",
    "Sturm",
    "schwerer Sturm",
    "orkanartiger Sturm",
    "Orkan",
];

// Source for the English descriptions: https://simple.wikipedia.org/wiki/Beaufort_scale
const DESCRIPTIONS_EN: [&str; 13] = [
    "Calm",
    "Light air",
    "Light breeze",
    "Gentle breeze",
    "Moderate breeze",
    "Fresh breeze",
    "Strong breeze",
    "High wind",
    "Fresh Gale",
    "Strong Gale",
    "Storm",
    "Violent storm",
    "Hurricane-force",
];

/// Description language for Beaufort categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    /// German (default UI language)
    #[default]
    De,
    /// English
    En,
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "de" => Ok(Self::De),
            "en" => Ok(Self::En),
            _ => Err(()),
        }
    }
}

/// Convert wind speed in m/s to a Beaufort category (0-12)
///
/// Returns `None` and logs an error when the speed cannot be bucketed
/// (NaN, or beyond the sentinel bound).
pub fn speed_to_beaufort(speed_in_ms: f64) -> Option<u8> {
    match BEAUFORT_TABLE.iter().find(|(bound, _)| *bound >= speed_in_ms) {
        Some((_, bft)) => Some(*bft),
        None => {
            tracing::error!(speed = speed_in_ms, "cannot translate wind-speed to beaufort-number");
            None
        }
    }
}

/// Convert wind speed in km/h to a Beaufort category (0-12)
pub fn kmh_to_beaufort(speed_in_kmh: f64) -> Option<u8> {
    speed_to_beaufort(kmh_to_ms(speed_in_kmh))
}

/// Get the localized description for a Beaufort category
///
/// The category comes from UI-facing JSON and may be absent or fractional:
/// `None` is logged as a warning, a non-integer or out-of-range category as
/// an error; both yield `None`.
pub fn beaufort_description(speed_in_bft: Option<f64>, language: Language) -> Option<&'static str> {
    let bft = match speed_in_bft {
        Some(b) => b,
        None => {
            tracing::warn!("beaufort category is given as None");
            return None;
        }
    };

    // NaN falls through here as well, since NaN.fract() != 0.0
    if bft.fract() != 0.0 {
        tracing::error!(category = bft, "beaufort category is not an integer");
        return None;
    }
    if !(0.0..=12.0).contains(&bft) {
        tracing::error!(category = bft, "beaufort category is out of scale");
        return None;
    }

    let index = bft as usize;
    match language {
        Language::De => Some(DESCRIPTIONS_DE[index]),
        Language::En => Some(DESCRIPTIONS_EN[index]),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_speed_to_beaufort_values() {
        assert_eq!(speed_to_beaufort(0.2), Some(0));
        assert_eq!(speed_to_beaufort(0.3), Some(0));
        assert_eq!(speed_to_beaufort(0.4), Some(1));
        assert_eq!(speed_to_beaufort(40.0), Some(12));
    }

    #[test]
    fn test_speed_to_beaufort_monotone() {
        let mut last = 0;
        let mut speed = 0.0;
        while speed < 50.0 {
            let bft = speed_to_beaufort(speed).unwrap();
            assert!(bft >= last, "not monotone at {speed}");
            last = bft;
            speed += 0.1;
        }
    }

    #[test]
    fn test_speed_to_beaufort_nan() {
        assert_eq!(speed_to_beaufort(f64::NAN), None);
    }

    #[test]
    fn test_speed_to_beaufort_beyond_sentinel() {
        assert_eq!(speed_to_beaufort(1000.0), None);
    }

    #[test]
    fn test_kmh_to_beaufort() {
        assert_eq!(kmh_to_beaufort(0.0), Some(0));
        assert_eq!(kmh_to_beaufort(36.0), Some(5)); // 10 m/s
    }

    #[test]
    fn test_description_valid_categories() {
        assert_eq!(beaufort_description(Some(0.0), Language::De), Some("Windstille"));
        assert_eq!(beaufort_description(Some(12.0), Language::De), Some("Orkan"));
        assert_eq!(beaufort_description(Some(0.0), Language::En), Some("Calm"));
        assert_eq!(
            beaufort_description(Some(12.0), Language::En),
            Some("Hurricane-force")
        );
    }

    #[test]
    fn test_description_out_of_scale() {
        assert_eq!(beaufort_description(Some(13.0), Language::De), None);
        assert_eq!(beaufort_description(Some(-1.0), Language::De), None);
    }

    #[test]
    fn test_description_non_integer() {
        assert_eq!(beaufort_description(Some(6.5), Language::En), None);
        assert_eq!(beaufort_description(Some(f64::NAN), Language::En), None);
    }

    #[test]
    fn test_description_none_category() {
        assert_eq!(beaufort_description(None, Language::De), None);
    }

    #[test]
    fn test_language_parsing() {
        assert_eq!("de".parse(), Ok(Language::De));
        assert_eq!("EN".parse(), Ok(Language::En));
        assert!("fr".parse::<Language>().is_err());
    }
}
