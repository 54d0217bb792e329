use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::error::DeriveError;

/// One reading from the station, as served by `GET /latest`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    #[serde(with = "timestamp")]
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub dew_point: f64,
    pub pressure: f64,
    pub wind_speed: f64,
    pub wind_direction: WindDirection,
}

/// The station reports wind direction either as degrees or as free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WindDirection {
    Degrees(f64),
    Text(String),
}

impl WindDirection {
    /// Degrees, if the value is numeric (including numeric text such as `"225"`).
    pub fn degrees(&self) -> Option<f64> {
        let degrees = match self {
            WindDirection::Degrees(d) => Some(*d),
            WindDirection::Text(s) => s.trim().parse::<f64>().ok(),
        };
        degrees.filter(|d| d.is_finite())
    }
}

impl fmt::Display for WindDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindDirection::Degrees(d) => write!(f, "{d}"),
            WindDirection::Text(s) => f.write_str(s),
        }
    }
}

/// Cloud and visibility snapshot served by `GET /metar`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetarSnapshot {
    /// Raw cover code, e.g. `"BKN"`. Unknown codes are kept as-is.
    #[serde(default)]
    pub cover: Option<String>,

    /// Visibility in statute miles, e.g. `"10+"` or `"2.5"`.
    #[serde(default, deserialize_with = "number_or_text")]
    pub visib: Option<String>,
}

impl MetarSnapshot {
    pub fn cloud_cover(&self) -> Option<CloudCover> {
        self.cover.as_deref().and_then(CloudCover::from_code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CloudCover {
    Cavok,
    Few,
    Scattered,
    Broken,
    Overcast,
}

impl CloudCover {
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "CAVOK" => Some(CloudCover::Cavok),
            "FEW" => Some(CloudCover::Few),
            "SCT" => Some(CloudCover::Scattered),
            "BKN" => Some(CloudCover::Broken),
            "OVC" => Some(CloudCover::Overcast),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CloudCover::Cavok => "CAVOK",
            CloudCover::Few => "FEW",
            CloudCover::Scattered => "SCT",
            CloudCover::Broken => "BKN",
            CloudCover::Overcast => "OVC",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            CloudCover::Cavok => "Ceiling and visibility OK",
            CloudCover::Few => "Few clouds",
            CloudCover::Scattered => "Scattered clouds",
            CloudCover::Broken => "Broken clouds",
            CloudCover::Overcast => "Overcast",
        }
    }
}

impl fmt::Display for CloudCover {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn number_or_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Number(n) => n.to_string(),
        Raw::Text(s) => s,
    }))
}

/// Parse the timestamp formats the station service emits.
///
/// RFC 3339 is tried first; shorter ISO forms without seconds or without
/// an offset are accepted too, and a missing offset means UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, DeriveError> {
    const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];
    const NAIVE_FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
    ];

    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = raw.strip_suffix(['Z', 'z']).unwrap_or(raw);
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(naive, fmt).ok())
        .map(|ndt| ndt.and_utc())
        .ok_or_else(|| DeriveError::Timestamp(raw.to_string()))
}

mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(D::Error::custom)
    }
}
