//! Condition text classification and background selection.

use serde::Serialize;
use std::fmt;

/// Closed set of condition categories driving presentational choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionCategory {
    Clear,
    Cloudy,
    Rainy,
    Snowy,
    Default,
}

impl ConditionCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConditionCategory::Clear => "clear",
            ConditionCategory::Cloudy => "cloudy",
            ConditionCategory::Rainy => "rainy",
            ConditionCategory::Snowy => "snowy",
            ConditionCategory::Default => "default",
        }
    }
}

impl fmt::Display for ConditionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered keyword rules; first match wins.
const RULES: &[(&[&str], ConditionCategory)] = &[
    (&["rain", "drizzle"], ConditionCategory::Rainy),
    (&["snow"], ConditionCategory::Snowy),
    (&["cloud"], ConditionCategory::Cloudy),
    (&["clear", "sunny"], ConditionCategory::Clear),
];

/// Classify free-text condition such as "Patchy light drizzle".
pub fn classify(condition_text: &str) -> ConditionCategory {
    let text = condition_text.to_lowercase();

    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| text.contains(k)))
        .map(|(_, category)| *category)
        .unwrap_or(ConditionCategory::Default)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Dawn,
    Day,
    Dusk,
    Night,
}

impl TimeOfDay {
    /// Dawn 5-10, day 10-17, dusk 17-21, night otherwise.
    pub fn from_hour(hour: u32) -> Self {
        match hour {
            5..=9 => TimeOfDay::Dawn,
            10..=16 => TimeOfDay::Day,
            17..=20 => TimeOfDay::Dusk,
            _ => TimeOfDay::Night,
        }
    }
}

/// Two-stop vertical gradient.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Gradient {
    pub name: &'static str,
    pub top: &'static str,
    pub bottom: &'static str,
}

impl Gradient {
    const fn new(name: &'static str, top: &'static str, bottom: &'static str) -> Self {
        Self { name, top, bottom }
    }

    pub fn css(&self) -> String {
        format!("linear-gradient(to bottom, {}, {})", self.top, self.bottom)
    }
}

pub const IDLE: Gradient = Gradient::new("idle", "#4b6cb7", "#182848");
pub const RAIN: Gradient = Gradient::new("rain", "#616161", "#212121");
pub const SNOW: Gradient = Gradient::new("snow", "#E3F2FD", "#90CAF9");
pub const OVERCAST_DAY: Gradient = Gradient::new("overcast-day", "#5C6BC0", "#9FA8DA");
pub const OVERCAST_NIGHT: Gradient = Gradient::new("overcast-night", "#303F9F", "#1A237E");
pub const SUNRISE: Gradient = Gradient::new("sunrise", "#ff9966", "#ff5e62");
pub const DAYLIGHT: Gradient = Gradient::new("daylight", "#1e90ff", "#4fc3f7");
pub const SUNSET: Gradient = Gradient::new("sunset", "#ff9966", "#ff5e62");
pub const NIGHT: Gradient = Gradient::new("night", "#141e30", "#243b55");

/// Background for a category at a local hour of day.
///
/// Rain and snow ignore the hour. Cloudy splits daylight (6-20) from night.
/// Clear and default follow the dawn/day/dusk/night buckets.
pub fn background_for(category: ConditionCategory, hour: u32) -> Gradient {
    match category {
        ConditionCategory::Rainy => RAIN,
        ConditionCategory::Snowy => SNOW,
        ConditionCategory::Cloudy => {
            if (6..20).contains(&hour) {
                OVERCAST_DAY
            } else {
                OVERCAST_NIGHT
            }
        }
        ConditionCategory::Clear | ConditionCategory::Default => match TimeOfDay::from_hour(hour) {
            TimeOfDay::Dawn => SUNRISE,
            TimeOfDay::Day => DAYLIGHT,
            TimeOfDay::Dusk => SUNSET,
            TimeOfDay::Night => NIGHT,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_and_drizzle_win_over_everything() {
        for text in [
            "Light rain",
            "Patchy light DRIZZLE",
            "Light sleet showers, rain and snow",
            "Cloudy with rain",
            "Sunny spells, Drizzle later",
            "Moderate or heavy freezing rain",
        ] {
            assert_eq!(classify(text), ConditionCategory::Rainy, "{text}");
        }
    }

    #[test]
    fn precedence_after_rain() {
        assert_eq!(classify("Blowing snow"), ConditionCategory::Snowy);
        assert_eq!(classify("Snow and cloudy"), ConditionCategory::Snowy);
        assert_eq!(classify("Partly cloudy"), ConditionCategory::Cloudy);
        assert_eq!(classify("Cloudy, clearing later"), ConditionCategory::Cloudy);
        assert_eq!(classify("Clear"), ConditionCategory::Clear);
        assert_eq!(classify("SUNNY"), ConditionCategory::Clear);
    }

    #[test]
    fn unmatched_text_is_default() {
        for text in ["Mist", "Fog", "Overcast", "Thundery outbreaks possible", "Blizzard", ""] {
            assert_eq!(classify(text), ConditionCategory::Default, "{text}");
        }
    }

    #[test]
    fn time_of_day_buckets() {
        assert_eq!(TimeOfDay::from_hour(4), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(5), TimeOfDay::Dawn);
        assert_eq!(TimeOfDay::from_hour(9), TimeOfDay::Dawn);
        assert_eq!(TimeOfDay::from_hour(10), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(16), TimeOfDay::Day);
        assert_eq!(TimeOfDay::from_hour(17), TimeOfDay::Dusk);
        assert_eq!(TimeOfDay::from_hour(20), TimeOfDay::Dusk);
        assert_eq!(TimeOfDay::from_hour(21), TimeOfDay::Night);
        assert_eq!(TimeOfDay::from_hour(0), TimeOfDay::Night);
    }

    #[test]
    fn weather_backgrounds_ignore_hour() {
        for hour in 0..24 {
            assert_eq!(background_for(ConditionCategory::Rainy, hour), RAIN);
            assert_eq!(background_for(ConditionCategory::Snowy, hour), SNOW);
        }
    }

    #[test]
    fn cloudy_splits_day_and_night() {
        assert_eq!(background_for(ConditionCategory::Cloudy, 5), OVERCAST_NIGHT);
        assert_eq!(background_for(ConditionCategory::Cloudy, 6), OVERCAST_DAY);
        assert_eq!(background_for(ConditionCategory::Cloudy, 19), OVERCAST_DAY);
        assert_eq!(background_for(ConditionCategory::Cloudy, 20), OVERCAST_NIGHT);
    }

    #[test]
    fn clear_follows_time_of_day() {
        assert_eq!(background_for(ConditionCategory::Clear, 7), SUNRISE);
        assert_eq!(background_for(ConditionCategory::Clear, 12), DAYLIGHT);
        assert_eq!(background_for(ConditionCategory::Default, 18), SUNSET);
        assert_eq!(background_for(ConditionCategory::Default, 23), NIGHT);
    }

    #[test]
    fn background_is_pure() {
        let categories = [
            ConditionCategory::Clear,
            ConditionCategory::Cloudy,
            ConditionCategory::Rainy,
            ConditionCategory::Snowy,
            ConditionCategory::Default,
        ];
        for category in categories {
            for hour in 0..24 {
                assert_eq!(background_for(category, hour), background_for(category, hour));
            }
        }
    }

    #[test]
    fn gradient_css() {
        assert_eq!(RAIN.css(), "linear-gradient(to bottom, #616161, #212121)");
    }
}
