//! Environment unit conversions
//!
//! Pure conversion helpers for wind speed, distance and compass directions.
//! Every conversion is the algebraic inverse of its counterpart up to
//! floating-point rounding; non-finite inputs propagate unchanged.
//!
//! The compass labels follow the German convention (`O` for east), matching
//! the admin UI these values are rendered in.

pub mod beaufort;
pub mod location;

/// Meters per statute mile
pub const METERS_PER_MILE: f64 = 1609.344;

/// Meters per nautical mile
pub const METERS_PER_NAUTICAL_MILE: f64 = 1852.0;

// ============================================================================
// Speed Conversions
// ============================================================================

/// Convert knots (nautical miles per hour) to km/h
pub fn kn_to_kmh(speed_in_kn: f64) -> f64 {
    speed_in_kn * METERS_PER_NAUTICAL_MILE / 1000.0
}

/// Convert km/h to knots (nautical miles per hour)
pub fn kmh_to_kn(speed_in_kmh: f64) -> f64 {
    speed_in_kmh / METERS_PER_NAUTICAL_MILE * 1000.0
}

/// Convert meters per second to km/h
pub fn ms_to_kmh(speed_in_ms: f64) -> f64 {
    speed_in_ms * 3.6
}

/// Convert km/h to meters per second
pub fn kmh_to_ms(speed_in_kmh: f64) -> f64 {
    speed_in_kmh / 3.6
}

/// Convert miles per second to km/h
pub fn mps_to_kmh(speed_in_mps: f64) -> f64 {
    speed_in_mps * 3.6 * METERS_PER_MILE
}

/// Convert km/h to miles per second
pub fn kmh_to_mps(speed_in_kmh: f64) -> f64 {
    speed_in_kmh / 3.6 / METERS_PER_MILE
}

// ============================================================================
// Distance Conversions
// ============================================================================

/// Convert statute miles to meters
pub fn miles_to_meter(miles: f64) -> f64 {
    miles * METERS_PER_MILE
}

/// Convert meters to statute miles
pub fn meter_to_miles(meter: f64) -> f64 {
    meter / METERS_PER_MILE
}

/// Convert nautical miles to meters
pub fn nauticalmiles_to_meter(miles: f64) -> f64 {
    miles * METERS_PER_NAUTICAL_MILE
}

/// Convert meters to nautical miles
pub fn meter_to_nauticalmiles(meter: f64) -> f64 {
    meter / METERS_PER_NAUTICAL_MILE
}

// ============================================================================
// Compass Directions
// ============================================================================

const DIRECTIONS_8: [&str; 9] = ["N", "NO", "O", "SO", "S", "SW", "W", "NW", "N"];

const DIRECTIONS_16: [&str; 17] = [
    "N", "NNO", "NO", "ONO", "O", "OSO", "SO", "SSO", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW", "N",
];

/// Map a bearing in degrees to one of 8 compass directions
///
/// Degrees are taken modulo 360; the half-sector offset puts sector
/// boundaries between labels, so e.g. 22.4° is still `N` and 22.6° is `NO`.
pub fn wind_direction8(deg: f64) -> &'static str {
    let index = ((deg.rem_euclid(360.0) + 22.5) / 45.0) as usize;
    DIRECTIONS_8[index.min(8)]
}

/// Map a bearing in degrees to one of 16 compass directions
pub fn wind_direction16(deg: f64) -> &'static str {
    let index = ((deg.rem_euclid(360.0) + 11.25) / 22.5) as usize;
    DIRECTIONS_16[index.min(16)]
}

// ============================================================================
// Tests
// ============================================================================
