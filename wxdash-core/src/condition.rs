//! Sky condition: cloud coverage, condition icon, visibility and the
//! one-line condition summary.

use std::fmt;

use crate::{
    derive::{self, miles_to_kilometers},
    error::DeriveError,
    model::{CloudCover, MetarSnapshot, Observation},
};

/// Visibility reported for CAVOK, which implies at least 10 km.
pub const CAVOK_VISIBILITY_KM: i64 = 10;

const COVERAGE_TABLE: [(CloudCover, u8); 5] = [
    (CloudCover::Cavok, 0),
    (CloudCover::Few, 20),
    (CloudCover::Scattered, 40),
    (CloudCover::Broken, 75),
    (CloudCover::Overcast, 100),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconPair {
    pub day: &'static str,
    pub night: &'static str,
}

const ICON_TABLE: [(u8, IconPair); 5] = [
    (
        0,
        IconPair {
            day: "clear-day",
            night: "clear-night",
        },
    ),
    (
        20,
        IconPair {
            day: "mostly-clear-day",
            night: "mostly-clear-night",
        },
    ),
    (
        40,
        IconPair {
            day: "partly-cloudy-day",
            night: "partly-cloudy-night",
        },
    ),
    (
        75,
        IconPair {
            day: "overcast-day",
            night: "overcast-night",
        },
    ),
    (
        100,
        IconPair {
            day: "overcast",
            night: "overcast",
        },
    ),
];

pub fn coverage_percent(cover: CloudCover) -> u8 {
    COVERAGE_TABLE
        .iter()
        .find(|(c, _)| *c == cover)
        .map(|(_, pct)| *pct)
        .unwrap_or(100)
}

/// Coverage for a raw METAR cover code; `None` for codes we don't know.
pub fn coverage_for_code(code: &str) -> Option<u8> {
    CloudCover::from_code(code).map(coverage_percent)
}

pub fn icon_for_coverage(percent: u8) -> Option<IconPair> {
    ICON_TABLE
        .iter()
        .find(|(p, _)| *p == percent)
        .map(|(_, icons)| *icons)
}

/// Icon id for a cover code. Unknown codes resolve to `None`, and the
/// caller leaves whatever icon is already shown in place.
pub fn resolve_icon(code: &str, is_night: bool) -> Option<&'static str> {
    let icons = icon_for_coverage(coverage_for_code(code)?)?;
    Some(if is_night { icons.night } else { icons.day })
}

/// Visibility in whole kilometres.
///
/// CAVOK wins over any `visib` value; otherwise `visib` (statute miles) is
/// converted. `Ok(None)` when there is nothing to show.
pub fn visibility_km(metar: &MetarSnapshot) -> Result<Option<i64>, DeriveError> {
    if metar.cloud_cover() == Some(CloudCover::Cavok) {
        return Ok(Some(CAVOK_VISIBILITY_KM));
    }

    Ok(visibility_miles(metar)?.map(miles_to_kilometers))
}

/// Unrounded visibility in statute miles, with CAVOK counted as 10 km.
pub fn visibility_miles(metar: &MetarSnapshot) -> Result<Option<f64>, DeriveError> {
    if metar.cloud_cover() == Some(CloudCover::Cavok) {
        return Ok(Some(CAVOK_VISIBILITY_KM as f64 / derive::KILOMETERS_PER_MILE));
    }

    metar.visib.as_deref().map(derive::parse_miles).transpose()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightCategory {
    Vfr,
    Mvfr,
    Ifr,
    Lifr,
}

impl FlightCategory {
    /// Category from visibility alone; ceiling is not part of the snapshot.
    pub fn from_visibility_miles(miles: f64) -> Self {
        if miles > 5.0 {
            FlightCategory::Vfr
        } else if miles >= 3.0 {
            FlightCategory::Mvfr
        } else if miles >= 1.0 {
            FlightCategory::Ifr
        } else {
            FlightCategory::Lifr
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
        }
    }
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One-line summary of current conditions, from whatever data arrived.
pub fn condition_summary(latest: Option<&Observation>, sky: Option<&MetarSnapshot>) -> String {
    let mut parts = Vec::new();

    if let Some(cover) = sky.and_then(MetarSnapshot::cloud_cover) {
        parts.push(cover.description().to_string());
    }

    if let Some(obs) = latest {
        if let (Ok(temp), Ok(feels)) = (
            derive::temperature_text("temperature", obs.temperature),
            derive::feels_like_text(obs.temperature, obs.humidity, obs.wind_speed),
        ) {
            parts.push(format!("{temp} °C, feels like {feels} °C"));
        }
    }

    let visibility = sky.map(|metar| (visibility_km(metar), visibility_miles(metar)));
    if let Some((Ok(Some(km)), Ok(Some(miles)))) = visibility {
        let category = FlightCategory::from_visibility_miles(miles);
        parts.push(format!("visibility {km} km ({category})"));
    }

    if parts.is_empty() {
        "Current conditions unavailable".to_string()
    } else {
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WindDirection;
    use chrono::{TimeZone, Utc};

    fn metar(cover: Option<&str>, visib: Option<&str>) -> MetarSnapshot {
        MetarSnapshot {
            cover: cover.map(Into::into),
            visib: visib.map(Into::into),
        }
    }

    #[test]
    fn coverage_table() {
        assert_eq!(coverage_for_code("CAVOK"), Some(0));
        assert_eq!(coverage_for_code("FEW"), Some(20));
        assert_eq!(coverage_for_code("SCT"), Some(40));
        assert_eq!(coverage_for_code("BKN"), Some(75));
        assert_eq!(coverage_for_code("OVC"), Some(100));
        assert_eq!(coverage_for_code("VV"), None);
    }

    #[test]
    fn icon_depends_on_day_and_night() {
        assert_eq!(resolve_icon("CAVOK", false), Some("clear-day"));
        assert_eq!(resolve_icon("CAVOK", true), Some("clear-night"));
        assert_eq!(resolve_icon("SCT", true), Some("partly-cloudy-night"));
        assert_eq!(resolve_icon("OVC", false), Some("overcast"));
    }

    #[test]
    fn unknown_code_resolves_to_no_icon() {
        assert_eq!(resolve_icon("XYZ", false), None);
        assert_eq!(resolve_icon("", true), None);
    }

    #[test]
    fn cavok_visibility_overrides_visib() {
        for visib in [Some("2"), None, Some("nonsense")] {
            let sky = metar(Some("CAVOK"), visib);
            assert_eq!(visibility_km(&sky).unwrap(), Some(10), "{visib:?}");
        }
    }

    #[test]
    fn visibility_converts_miles() {
        let km = |cover, visib| visibility_km(&metar(cover, visib)).unwrap();
        assert_eq!(km(Some("BKN"), Some("10")), Some(16));
        assert_eq!(km(None, Some("6")), Some(10));
        assert_eq!(km(Some("FEW"), None), None);
        assert!(visibility_km(&metar(Some("FEW"), Some("n/a"))).is_err());
    }

    #[test]
    fn flight_category_thresholds_in_miles() {
        use FlightCategory::*;

        let cases = [
            (10.0, Vfr),
            (5.1, Vfr),
            (5.0, Mvfr),
            (3.0, Mvfr),
            (2.8, Ifr),
            (1.0, Ifr),
            (0.5, Lifr),
        ];
        for (miles, expected) in cases {
            let category = FlightCategory::from_visibility_miles(miles);
            assert_eq!(category, expected, "{miles} mi");
        }
    }

    #[test]
    fn flight_category_uses_unrounded_visibility() {
        // 2.8 mi rounds to 5 km, which is back above 3 mi.
        let sky = metar(Some("BKN"), Some("2.8"));
        assert_eq!(visibility_km(&sky).unwrap(), Some(5));
        assert_eq!(visibility_miles(&sky).unwrap(), Some(2.8));
        assert_eq!(
            condition_summary(None, Some(&sky)),
            "Broken clouds, visibility 5 km (IFR)"
        );

        // 5.1 mi rounds to 8 km, which is back below 5 mi.
        let sky = metar(Some("FEW"), Some("5.1"));
        assert_eq!(
            condition_summary(None, Some(&sky)),
            "Few clouds, visibility 8 km (VFR)"
        );
    }

    #[test]
    fn cavok_counts_as_visual_flight() {
        let sky = metar(Some("CAVOK"), Some("1"));
        let miles = visibility_miles(&sky).unwrap().unwrap();
        assert!((miles - 6.2137).abs() < 1e-3, "got {miles}");
        let category = FlightCategory::from_visibility_miles(miles);
        assert_eq!(category, FlightCategory::Vfr);
    }

    #[test]
    fn summary_combines_both_sources() {
        let obs = Observation {
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
            temperature: 18.0,
            humidity: 60.0,
            dew_point: 10.0,
            pressure: 1015.0,
            wind_speed: 2.0,
            wind_direction: WindDirection::Degrees(180.0),
        };
        let sky = metar(Some("SCT"), Some("10"));

        assert_eq!(
            condition_summary(Some(&obs), Some(&sky)),
            "Scattered clouds, 18.0 °C, feels like 18.0 °C, visibility 16 km (VFR)"
        );
        assert_eq!(
            condition_summary(Some(&obs), None),
            "18.0 °C, feels like 18.0 °C"
        );
        assert_eq!(
            condition_summary(None, None),
            "Current conditions unavailable"
        );
    }
}
