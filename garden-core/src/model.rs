use serde::{Deserialize, Serialize};
use serde::ser::SerializeStruct;

/// One normalized weather observation, as produced by a [`crate::gateway::WeatherGateway`].
///
/// Values are taken as-is from the provider: temperature may be negative,
/// humidity is not clamped to 0..=100 and the description is free text in
/// whatever locale the provider was asked for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub wind_speed_kmh: f64,
    pub sky_description: String,
}

/// Display tone of an advisory. Purely presentational; the front end uses it
/// to pick a color, nothing branches on it server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tone {
    Ok,
    Warn,
    Info,
}

/// The closed set of gardening recommendations.
///
/// Each variant carries a fixed message and a fixed tone; the pairing is not
/// configurable, so a caller can never emit a novel text or mismatched tone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advisory {
    /// Rain in the description or humidity at 85% and above.
    TooWet,
    /// Wind above 30 km/h.
    StrongWind,
    /// Mild temperature, moderate humidity, light wind.
    IdealWindow,
    /// Below 10 °C.
    TooCold,
    /// Above 30 °C.
    TooHot,
    /// Nothing stood out either way.
    Neutral,
}

impl Advisory {
    pub const fn text(self) -> &'static str {
        match self {
            Advisory::TooWet => "Heute kein Umtopfen – zu nass/regenreich.",
            Advisory::StrongWind => "Starker Wind – lieber drinnen bleiben.",
            Advisory::IdealWindow => "Gutes Wetter zum Umtopfen oder Einsetzen.",
            Advisory::TooCold => "Kühl – besser warten oder indoor arbeiten.",
            Advisory::TooHot => "Sehr warm – nur morgens/abends gießen/arbeiten.",
            Advisory::Neutral => "Neutral – nach Gefühl entscheiden.",
        }
    }

    pub const fn tone(self) -> Tone {
        match self {
            Advisory::TooWet | Advisory::StrongWind => Tone::Warn,
            Advisory::IdealWindow => Tone::Ok,
            Advisory::TooCold | Advisory::TooHot | Advisory::Neutral => Tone::Info,
        }
    }

    pub const fn all() -> &'static [Advisory] {
        &[
            Advisory::TooWet,
            Advisory::StrongWind,
            Advisory::IdealWindow,
            Advisory::TooCold,
            Advisory::TooHot,
            Advisory::Neutral,
        ]
    }
}

impl serde::Serialize for Advisory {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut s = serializer.serialize_struct("Advisory", 2)?;
        s.serialize_field("text", self.text())?;
        s.serialize_field("tone", &self.tone())?;
        s.end()
    }
}

/// Combined payload for one weather lookup: the readings the recommendation
/// was computed from, plus the recommendation itself.
#[derive(Debug, Clone, Serialize)]
pub struct WeatherReport {
    pub city: String,
    pub temp: f64,
    pub humidity: f64,
    pub wind_kmh: f64,
    pub description: String,
    pub suggestion: Advisory,
}

impl WeatherReport {
    pub fn new(city: impl Into<String>, reading: WeatherReading, suggestion: Advisory) -> Self {
        Self {
            city: city.into(),
            temp: reading.temperature_c,
            humidity: reading.humidity_pct,
            wind_kmh: reading.wind_speed_kmh,
            description: reading.sky_description,
            suggestion,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advisory_serializes_as_text_and_tone() {
        let json = serde_json::to_value(Advisory::IdealWindow).expect("serialize advisory");
        assert_eq!(
            json,
            serde_json::json!({
                "text": "Gutes Wetter zum Umtopfen oder Einsetzen.",
                "tone": "ok",
            })
        );
    }

    #[test]
    fn tones_are_fixed_per_variant() {
        assert_eq!(Advisory::TooWet.tone(), Tone::Warn);
        assert_eq!(Advisory::StrongWind.tone(), Tone::Warn);
        assert_eq!(Advisory::IdealWindow.tone(), Tone::Ok);
        assert_eq!(Advisory::TooCold.tone(), Tone::Info);
        assert_eq!(Advisory::TooHot.tone(), Tone::Info);
        assert_eq!(Advisory::Neutral.tone(), Tone::Info);
    }

    #[test]
    fn all_texts_are_distinct() {
        let texts: std::collections::HashSet<_> =
            Advisory::all().iter().map(|a| a.text()).collect();
        assert_eq!(texts.len(), Advisory::all().len());
    }

    #[test]
    fn report_flattens_the_reading() {
        let reading = WeatherReading {
            temperature_c: 22.0,
            humidity_pct: 50.0,
            wind_speed_kmh: 5.0,
            sky_description: "klarer Himmel".to_string(),
        };
        let report = WeatherReport::new("Berlin", reading, Advisory::IdealWindow);
        let json = serde_json::to_value(&report).expect("serialize report");

        assert_eq!(json["city"], "Berlin");
        assert_eq!(json["temp"], 22.0);
        assert_eq!(json["humidity"], 50.0);
        assert_eq!(json["wind_kmh"], 5.0);
        assert_eq!(json["description"], "klarer Himmel");
        assert_eq!(json["suggestion"]["tone"], "ok");
    }
}
