//! The advisory engine: maps one [`WeatherReading`] to one [`Advisory`].
//!
//! This is a pure function over its argument. It never fails, touches no
//! shared state and is safe to call from any number of tasks at once.

use crate::model::{Advisory, WeatherReading};

/// Humidity at or above this counts as too wet regardless of sky text.
const WET_HUMIDITY_PCT: f64 = 85.0;
/// Wind above this is a hazard.
const STORM_WIND_KMH: f64 = 30.0;

const IDEAL_TEMP_C: (f64, f64) = (15.0, 26.0);
const IDEAL_HUMIDITY_PCT: (f64, f64) = (45.0, 75.0);
const IDEAL_WIND_KMH: f64 = 15.0;

const COLD_TEMP_C: f64 = 10.0;
const HOT_TEMP_C: f64 = 30.0;

/// Pick the gardening recommendation for a reading.
///
/// Rules are evaluated in a fixed order and the first match wins. Hazards
/// (rain, high humidity, storm) come before the comfort-range check, so a
/// stormy but otherwise mild day is still flagged rather than called ideal.
/// Out-of-range or nonsensical values fall through to [`Advisory::Neutral`].
pub fn suggest_action(reading: &WeatherReading) -> Advisory {
    let desc = reading.sky_description.to_lowercase();
    let has_rain = desc.contains("rain") || desc.contains("regen");

    if has_rain || reading.humidity_pct >= WET_HUMIDITY_PCT {
        return Advisory::TooWet;
    }
    if reading.wind_speed_kmh > STORM_WIND_KMH {
        return Advisory::StrongWind;
    }
    if (IDEAL_TEMP_C.0..=IDEAL_TEMP_C.1).contains(&reading.temperature_c)
        && (IDEAL_HUMIDITY_PCT.0..=IDEAL_HUMIDITY_PCT.1).contains(&reading.humidity_pct)
        && reading.wind_speed_kmh <= IDEAL_WIND_KMH
    {
        return Advisory::IdealWindow;
    }
    if reading.temperature_c < COLD_TEMP_C {
        return Advisory::TooCold;
    }
    if reading.temperature_c > HOT_TEMP_C {
        return Advisory::TooHot;
    }

    Advisory::Neutral
}
