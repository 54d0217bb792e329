//! Sunrise / sunset calculations.
//!
//! Equations follow the NOAA solar calculation spreadsheets
//! (<https://gml.noaa.gov/grad/solcalc/calcdetails.html>): rise and set are
//! computed as offsets from solar noon, in minutes past UTC midnight.

use std::f64::consts::PI;

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike};

/// Apparent zenith of the sun's upper limb at sunrise/sunset, with refraction.
const SUNRISE_ZENITH_DEG: f64 = 90.833;

/// Where the dashboard's station stands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Site {
    pub latitude: f64,
    pub longitude: f64,
    /// Metres above sea level.
    pub elevation: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenery {
    Day,
    Night,
}

impl Scenery {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scenery::Day => "day-landscape",
            Scenery::Night => "night-landscape",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SunWindow<Tz: TimeZone> {
    pub sunrise: DateTime<Tz>,
    pub sunset: DateTime<Tz>,
}

impl<Tz: TimeZone> SunWindow<Tz> {
    /// Sunrise and sunset on the local date of `reference` at `site`.
    ///
    /// During polar night both collapse to solar noon; during midnight sun
    /// the window spans the whole local day.
    pub fn compute(reference: &DateTime<Tz>, site: &Site) -> Self {
        let tz = reference.timezone();
        let date = reference.date_naive();
        let utc_midnight = date.and_time(NaiveTime::MIN);

        let at_minutes = |minutes: f64| {
            let offset = Duration::seconds((minutes * 60.0).round() as i64);
            tz.from_utc_datetime(&(utc_midnight + offset))
        };

        match solar_events(date, site) {
            SolarEvents::Normal { rise, set } => Self {
                sunrise: at_minutes(rise),
                sunset: at_minutes(set),
            },
            SolarEvents::PolarNight { noon } => {
                let noon = at_minutes(noon);
                Self {
                    sunrise: noon.clone(),
                    sunset: noon,
                }
            }
            SolarEvents::MidnightSun { noon } => {
                let start = local_time(&tz, date, NaiveTime::MIN)
                    .unwrap_or_else(|| at_minutes(noon - 720.0));
                let end = NaiveTime::from_hms_opt(23, 59, 59)
                    .and_then(|t| local_time(&tz, date, t))
                    .unwrap_or_else(|| at_minutes(noon + 719.0));
                Self {
                    sunrise: start,
                    sunset: end,
                }
            }
        }
    }

    pub fn is_night(&self, current: &DateTime<Tz>) -> bool {
        is_night(current, self)
    }

    pub fn scenery(&self, current: &DateTime<Tz>) -> Scenery {
        if self.is_night(current) {
            Scenery::Night
        } else {
            Scenery::Day
        }
    }

    /// True when the sunrise hour comes after the sunset hour, which
    /// happens when the window is shown in a timezone far from the site's
    /// own. The hour-only night check is meaningless in that case.
    pub fn wraps_midnight(&self) -> bool {
        self.sunrise.hour() > self.sunset.hour()
    }
}

/// Night is any local hour before the sunrise hour or from the sunset
/// hour on. Only wall-clock hours are compared, not full instants.
pub fn is_night<Tz: TimeZone>(current: &DateTime<Tz>, window: &SunWindow<Tz>) -> bool {
    let hour = current.hour();
    hour < window.sunrise.hour() || hour >= window.sunset.hour()
}

fn local_time<Tz: TimeZone>(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(dt) => Some(dt),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SolarEvents {
    Normal { rise: f64, set: f64 },
    PolarNight { noon: f64 },
    MidnightSun { noon: f64 },
}

/// Horizon dip for an observer above sea level, in degrees.
fn horizon_dip_deg(elevation: f64) -> f64 {
    2.076 * elevation.max(0.0).sqrt() / 60.0
}

fn solar_events(date: NaiveDate, site: &Site) -> SolarEvents {
    let leap_year = NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some();
    let days = if leap_year { 366.0 } else { 365.0 };

    // Fractional year in radians, evaluated at noon.
    let gamma = (2.0 * PI) * (date.ordinal0() as f64) / days;

    // Equation of time (minutes), relating mean and true solar time.
    let eqtime = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());

    // Solar declination (radians).
    let decl = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    let zenith = (SUNRISE_ZENITH_DEG + horizon_dip_deg(site.elevation)).to_radians();
    let lat = site.latitude.to_radians();

    let noon = 720.0 - 4.0 * site.longitude - eqtime;

    let cos_ha = zenith.cos() / (lat.cos() * decl.cos()) - lat.tan() * decl.tan();
    if cos_ha > 1.0 {
        return SolarEvents::PolarNight { noon };
    }
    if cos_ha < -1.0 {
        return SolarEvents::MidnightSun { noon };
    }

    let ha = cos_ha.acos().to_degrees();
    SolarEvents::Normal {
        rise: noon - 4.0 * ha,
        set: noon + 4.0 * ha,
    }
}
