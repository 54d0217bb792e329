//! Orchestration: fetch both data sources concurrently, derive display
//! values, and push them through a [`Renderer`].

use std::{future::Future, time::Duration};

use anyhow::Result;
use chrono::{DateTime, Offset, Utc};
use chrono_tz::Tz;
use tracing::{debug, warn};

use crate::{
    Config,
    condition::{condition_summary, coverage_for_code, resolve_icon, visibility_km},
    derive,
    error::DeriveError,
    model::{MetarSnapshot, Observation},
    provider::ObservationProvider,
    render::{Chart, Renderer, Slot},
    series::build_series,
    suntime::{Site, SunWindow},
};

const TODAY_FORMAT: &str = "%A, %B %-d, %H:%M:%S";
const SUN_TIME_FORMAT: &str = "%H:%M";

/// Everything a dashboard load needs besides the data itself.
#[derive(Debug, Clone)]
pub struct DashboardContext {
    pub site: Site,
    pub timezone: Tz,
    pub history_limit: u32,
    pub fetch_timeout: Duration,
}

impl DashboardContext {
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            site: config.site(),
            timezone: config.tz()?,
            history_limit: config.history_limit,
            fetch_timeout: config.fetch_timeout(),
        })
    }
}

/// How a fetch ended: with data, or unavailable (error or timeout).
#[derive(Debug, Clone, PartialEq)]
pub enum Settled<T> {
    Ready(T),
    Unavailable(String),
}

impl<T> Settled<T> {
    pub fn ready(&self) -> Option<&T> {
        match self {
            Settled::Ready(v) => Some(v),
            Settled::Unavailable(_) => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Settled::Ready(_))
    }
}

/// Result of one dashboard load.
#[derive(Debug, Clone)]
pub struct DashboardOutcome {
    pub weather: Settled<Vec<Observation>>,
    pub metar: Settled<Option<MetarSnapshot>>,
    pub summary: String,
}

/// Load and render the dashboard once.
///
/// Sun times render immediately. Weather slots and charts render as soon
/// as the observation fetch settles, sky slots as soon as the METAR fetch
/// settles, and the condition summary renders exactly once, after both.
pub async fn run_dashboard<P, R>(
    provider: &P,
    renderer: &mut R,
    ctx: &DashboardContext,
    now: DateTime<Utc>,
) -> DashboardOutcome
where
    P: ObservationProvider + ?Sized,
    R: Renderer + ?Sized,
{
    let local_now = now.with_timezone(&ctx.timezone);
    let sun = SunWindow::compute(&local_now, &ctx.site);
    let night = sun.is_night(&local_now);
    if sun.wraps_midnight() {
        warn!(
            timezone = %ctx.timezone,
            sunrise = %sun.sunrise,
            sunset = %sun.sunset,
            "sunrise hour falls after sunset hour, set the timezone to the site's local zone"
        );
    }

    let sunrise = sun.sunrise.format(SUN_TIME_FORMAT).to_string();
    let sunset = sun.sunset.format(SUN_TIME_FORMAT).to_string();
    renderer.text(Slot::SunriseTime, &sunrise);
    renderer.text(Slot::SunsetTime, &sunset);
    renderer.text(Slot::Scenery, sun.scenery(&local_now).as_str());

    let latest = settle(
        "latest observations",
        ctx.fetch_timeout,
        provider.fetch_latest(ctx.history_limit),
    );
    let metar = settle("METAR snapshot", ctx.fetch_timeout, provider.fetch_metar());
    tokio::pin!(latest, metar);

    let mut weather = None;
    let mut sky = None;

    let (weather, sky) = loop {
        tokio::select! {
            settled = &mut latest, if weather.is_none() => {
                render_weather(renderer, &settled, &ctx.timezone);
                weather = Some(settled);
            }
            settled = &mut metar, if sky.is_none() => {
                render_sky(renderer, &settled, night);
                sky = Some(settled);
            }
        }

        match (weather.take(), sky.take()) {
            (Some(w), Some(s)) => break (w, s),
            (w, s) => {
                weather = w;
                sky = s;
            }
        }
    };

    let summary = condition_summary(
        weather.ready().and_then(|obs| obs.first()),
        sky.ready().and_then(Option::as_ref),
    );
    renderer.text(Slot::ConditionSummary, &summary);

    DashboardOutcome {
        weather,
        metar: sky,
        summary,
    }
}

async fn settle<T, F>(what: &str, limit: Duration, fetch: F) -> Settled<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(limit, fetch).await {
        Ok(Ok(value)) => {
            debug!("{what} fetched");
            Settled::Ready(value)
        }
        Ok(Err(err)) => {
            warn!(error = %format!("{err:#}"), "{what} unavailable");
            Settled::Unavailable(format!("{err:#}"))
        }
        Err(_) => {
            warn!(timeout = ?limit, "{what} timed out");
            Settled::Unavailable(format!("{what} timed out after {}s", limit.as_secs_f64()))
        }
    }
}

/// Weekday, date and time followed by a short offset label such as `GMT+1`.
fn today_label(observed_at: &DateTime<Tz>) -> String {
    let offset = observed_at.offset().fix().local_minus_utc();
    let time = observed_at.format(TODAY_FORMAT);
    format!("{time} {}", short_offset(offset))
}

fn short_offset(seconds: i32) -> String {
    if seconds == 0 {
        return "GMT".to_string();
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.unsigned_abs() / 60;
    match (minutes / 60, minutes % 60) {
        (hours, 0) => format!("GMT{sign}{hours}"),
        (hours, mins) => format!("GMT{sign}{hours}:{mins:02}"),
    }
}

fn put<R: Renderer + ?Sized>(renderer: &mut R, slot: Slot, value: Result<String, DeriveError>) {
    match value {
        Ok(text) => renderer.text(slot, &text),
        Err(err) => {
            warn!(slot = slot.id(), error = %err, "cannot render slot");
            renderer.unavailable(slot);
        }
    }
}

fn render_weather<R: Renderer + ?Sized>(
    renderer: &mut R,
    settled: &Settled<Vec<Observation>>,
    tz: &Tz,
) {
    let observations = match settled {
        Settled::Ready(observations) => observations,
        Settled::Unavailable(_) => {
            for slot in Slot::weather() {
                renderer.unavailable(*slot);
            }
            return;
        }
    };

    match observations.first() {
        Some(latest) => render_current(renderer, latest, tz),
        None => {
            debug!("service returned no observations");
            for slot in Slot::weather() {
                renderer.unavailable(*slot);
            }
        }
    }

    let series = build_series(observations);
    let temperature = [&series.temperature, &series.dew_point];
    renderer.chart(Chart::Temperature, &temperature);
    renderer.chart(Chart::Humidity, &[&series.humidity]);
    renderer.chart(Chart::Pressure, &[&series.pressure]);
}

fn render_current<R: Renderer + ?Sized>(renderer: &mut R, latest: &Observation, tz: &Tz) {
    let observed_at = latest.timestamp.with_timezone(tz);

    renderer.text(Slot::Today, &today_label(&observed_at));
    put(
        renderer,
        Slot::Temperature,
        derive::temperature_text("temperature", latest.temperature),
    );
    put(
        renderer,
        Slot::Humidity,
        derive::humidity_text(latest.humidity),
    );
    put(
        renderer,
        Slot::DewPoint,
        derive::temperature_text("dew_point", latest.dew_point),
    );
    put(
        renderer,
        Slot::Pressure,
        derive::pressure_text(latest.pressure),
    );
    put(
        renderer,
        Slot::WindSpeed,
        derive::wind_speed_text(latest.wind_speed),
    );
    let direction = derive::wind_direction_text(&latest.wind_direction);
    renderer.text(Slot::WindDirection, &direction);
    put(
        renderer,
        Slot::FeelsLike,
        derive::feels_like_text(latest.temperature, latest.humidity, latest.wind_speed),
    );
}

fn render_sky<R: Renderer + ?Sized>(
    renderer: &mut R,
    settled: &Settled<Option<MetarSnapshot>>,
    night: bool,
) {
    let metar = match settled {
        Settled::Ready(Some(metar)) => metar,
        Settled::Ready(None) => {
            debug!("no METAR snapshot, hiding condition icon");
            renderer.hide(Slot::ConditionIcon);
            return;
        }
        Settled::Unavailable(_) => {
            renderer.unavailable(Slot::Visibility);
            renderer.unavailable(Slot::CloudCoverage);
            renderer.hide(Slot::ConditionIcon);
            return;
        }
    };

    match visibility_km(metar) {
        Ok(Some(km)) => renderer.text(Slot::Visibility, &km.to_string()),
        Ok(None) => {}
        Err(err) => put(renderer, Slot::Visibility, Err(err)),
    }

    // Unknown cover codes leave coverage and icon exactly as they were.
    if let Some(code) = metar.cover.as_deref() {
        if let Some(percent) = coverage_for_code(code) {
            renderer.text(Slot::CloudCoverage, &percent.to_string());
        }
        if let Some(icon) = resolve_icon(code, night) {
            renderer.text(Slot::ConditionIcon, icon);
        }
    }
}
