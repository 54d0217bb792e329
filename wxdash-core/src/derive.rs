//! Display values derived from a raw observation.

use crate::{apparent, error::DeriveError, model::WindDirection};

pub const KILOMETERS_PER_MILE: f64 = 1.609344;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Round to `decimals` places, half away from zero. Never yields `-0`.
pub fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let multiplier = 10_f64.powi(decimals as i32);
    (value * multiplier).round() / multiplier + 0.0
}

pub fn round_temperature(celsius: f64) -> f64 {
    round_to_decimals(celsius, 1)
}

pub fn round_humidity(percent: f64) -> f64 {
    round_to_decimals(percent, 0)
}

pub fn round_pressure(hpa: f64) -> f64 {
    round_to_decimals(hpa, 0)
}

/// Perceived temperature (°C) from temperature (°C), relative humidity (%)
/// and wind speed (m/s), rounded for display.
pub fn feels_like(temperature: f64, humidity: f64, wind_speed: f64) -> f64 {
    round_temperature(apparent::apparent_temperature(temperature, humidity, wind_speed))
}

pub fn miles_to_kilometers(miles: f64) -> i64 {
    (miles * KILOMETERS_PER_MILE).round() as i64
}

/// 16-point compass label for a bearing in degrees.
pub fn compass_point(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let index = (normalized / 22.5).round() as usize % COMPASS_POINTS.len();
    COMPASS_POINTS[index]
}

pub fn ensure_finite(field: &'static str, value: f64) -> Result<f64, DeriveError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(DeriveError::NotFinite { field, value })
    }
}

pub fn temperature_text(field: &'static str, celsius: f64) -> Result<String, DeriveError> {
    let celsius = ensure_finite(field, celsius)?;
    Ok(format!("{:.1}", round_temperature(celsius)))
}

pub fn humidity_text(percent: f64) -> Result<String, DeriveError> {
    let percent = ensure_finite("humidity", percent)?;
    Ok(format!("{:.0}", round_humidity(percent)))
}

pub fn pressure_text(hpa: f64) -> Result<String, DeriveError> {
    let hpa = ensure_finite("pressure", hpa)?;
    Ok(format!("{:.0}", round_pressure(hpa)))
}

pub fn wind_speed_text(mps: f64) -> Result<String, DeriveError> {
    let mps = ensure_finite("wind_speed", mps)?;
    Ok(format!("{:.1}", round_to_decimals(mps, 1)))
}

pub fn feels_like_text(
    temperature: f64,
    humidity: f64,
    wind_speed: f64,
) -> Result<String, DeriveError> {
    let temperature = ensure_finite("temperature", temperature)?;
    let humidity = ensure_finite("humidity", humidity)?;
    let wind_speed = ensure_finite("wind_speed", wind_speed)?;
    Ok(format!("{:.1}", feels_like(temperature, humidity, wind_speed)))
}

pub fn wind_direction_text(direction: &WindDirection) -> String {
    match direction.degrees() {
        Some(deg) => format!("{:.0}° {}", round_to_decimals(deg, 0), compass_point(deg)),
        None => direction.to_string(),
    }
}

/// Parse a METAR visibility field ("6", "2.5", "10+") into miles.
pub fn parse_miles(raw: &str) -> Result<f64, DeriveError> {
    let trimmed = raw
        .trim()
        .trim_end_matches('+')
        .trim_start_matches(['P', 'M']);
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|m| m.is_finite())
        .ok_or_else(|| DeriveError::NotNumeric {
            field: "visib",
            raw: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_idempotent() {
        for t in [-40.05, -12.345, -0.04, 0.0, 0.05, 4.26, 21.449_999, 37.75, 1013.5] {
            let once = round_temperature(t);
            assert_eq!(round_temperature(once), once, "temperature {t}");

            let once = round_pressure(t);
            assert_eq!(round_pressure(once), once, "pressure {t}");
        }
    }

    #[test]
    fn rounding_precision() {
        assert_eq!(round_temperature(4.26), 4.3);
        assert_eq!(round_humidity(81.5), 82.0);
        assert_eq!(round_pressure(1013.4), 1013.0);
        assert_eq!(format!("{:.1}", round_temperature(-0.04)), "0.0");
    }

    #[test]
    fn miles_to_kilometers_known_values() {
        assert_eq!(miles_to_kilometers(0.0), 0);
        assert_eq!(miles_to_kilometers(10.0), 16);
        assert_eq!(miles_to_kilometers(1.0), 2);
        assert_eq!(miles_to_kilometers(0.25), 0);
    }

    #[test]
    fn compass_points() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(359.0), "N");
        assert_eq!(compass_point(225.0), "SW");
        assert_eq!(compass_point(-90.0), "W");
        assert_eq!(compass_point(100.0), "E");
    }

    #[test]
    fn wind_direction_labels() {
        let text = |raw: &str| wind_direction_text(&WindDirection::Text(raw.into()));

        let degrees = wind_direction_text(&WindDirection::Degrees(225.0));
        assert_eq!(degrees, "225° SW");
        assert_eq!(text("90"), "90° E");
        assert_eq!(text("variable"), "variable");
    }

    #[test]
    fn non_finite_values_are_errors() {
        let err = temperature_text("temperature", f64::NAN).unwrap_err();
        assert!(matches!(
            err,
            DeriveError::NotFinite {
                field: "temperature",
                ..
            }
        ));
        assert!(humidity_text(f64::INFINITY).is_err());
        assert!(feels_like_text(10.0, f64::NAN, 2.0).is_err());
    }

    #[test]
    fn display_texts() {
        assert_eq!(temperature_text("temperature", 4.26).unwrap(), "4.3");
        assert_eq!(humidity_text(81.4).unwrap(), "81");
        assert_eq!(pressure_text(1013.6).unwrap(), "1014");
        assert_eq!(wind_speed_text(3.44).unwrap(), "3.4");
        assert_eq!(feels_like_text(18.0, 60.0, 5.0).unwrap(), "18.0");
    }

    #[test]
    fn parses_visibility_miles() {
        assert_eq!(parse_miles("6").unwrap(), 6.0);
        assert_eq!(parse_miles("10+").unwrap(), 10.0);
        assert_eq!(parse_miles(" 2.5 ").unwrap(), 2.5);
        let err = parse_miles("far").unwrap_err();
        assert!(matches!(err, DeriveError::NotNumeric { .. }));
    }
}
