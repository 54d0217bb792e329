//! Presentation boundary.
//!
//! The dashboard only ever hands plain strings and [`ChartSeries`] to a
//! [`Renderer`]; how they end up on screen is the renderer's business.

use std::{collections::BTreeMap, fmt};

use crate::series::ChartSeries;

/// Named presentation slots. The identifiers are stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Slot {
    Today,
    Temperature,
    Humidity,
    DewPoint,
    Pressure,
    WindSpeed,
    WindDirection,
    FeelsLike,
    Visibility,
    CloudCoverage,
    ConditionIcon,
    ConditionSummary,
    SunriseTime,
    SunsetTime,
    Scenery,
}

impl Slot {
    pub fn id(&self) -> &'static str {
        match self {
            Slot::Today => "today",
            Slot::Temperature => "temp-now",
            Slot::Humidity => "humidity",
            Slot::DewPoint => "dew-point",
            Slot::Pressure => "pressure",
            Slot::WindSpeed => "wind-speed",
            Slot::WindDirection => "wind-direction",
            Slot::FeelsLike => "feels-like",
            Slot::Visibility => "visibility",
            Slot::CloudCoverage => "cloud-coverage",
            Slot::ConditionIcon => "condition-icon",
            Slot::ConditionSummary => "condition-summary",
            Slot::SunriseTime => "sunrise-time",
            Slot::SunsetTime => "sunset-time",
            Slot::Scenery => "scenery",
        }
    }

    /// Slots filled from the latest observation.
    pub const fn weather() -> &'static [Slot] {
        &[
            Slot::Today,
            Slot::Temperature,
            Slot::Humidity,
            Slot::DewPoint,
            Slot::Pressure,
            Slot::WindSpeed,
            Slot::WindDirection,
            Slot::FeelsLike,
        ]
    }

    /// Slots filled from the METAR snapshot.
    pub const fn sky() -> &'static [Slot] {
        &[Slot::Visibility, Slot::CloudCoverage, Slot::ConditionIcon]
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chart {
    /// Temperature and dew point share one chart.
    Temperature,
    Humidity,
    Pressure,
}

impl Chart {
    pub fn id(&self) -> &'static str {
        match self {
            Chart::Temperature => "temperature-chart",
            Chart::Humidity => "humidity-chart",
            Chart::Pressure => "pressure-chart",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Chart::Temperature => "°C",
            Chart::Humidity => "%",
            Chart::Pressure => "hPa",
        }
    }
}

pub trait Renderer {
    /// Write `value` into `slot`, replacing what was there.
    fn text(&mut self, slot: Slot, value: &str);

    /// Hide `slot` entirely.
    fn hide(&mut self, slot: Slot);

    /// Show the "data unavailable" placeholder in `slot`.
    fn unavailable(&mut self, slot: Slot);

    fn chart(&mut self, chart: Chart, series: &[&ChartSeries]);
}

/// What a slot currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Text(String),
    Hidden,
    Unavailable,
}

/// A renderer that just remembers the latest state of every slot and chart.
///
/// Front ends that draw once, after everything settled, render from this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    slots: BTreeMap<Slot, SlotState>,
    charts: BTreeMap<Chart, Vec<ChartSeries>>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: Slot) -> Option<&SlotState> {
        self.slots.get(&slot)
    }

    /// Text of `slot`, if it shows any.
    pub fn text_of(&self, slot: Slot) -> Option<&str> {
        match self.slots.get(&slot) {
            Some(SlotState::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn chart_series(&self, chart: Chart) -> Option<&[ChartSeries]> {
        self.charts.get(&chart).map(Vec::as_slice)
    }

    pub fn slots(&self) -> impl Iterator<Item = (Slot, &SlotState)> {
        self.slots.iter().map(|(slot, state)| (*slot, state))
    }

    /// Slot ids mapped to their text (`null` when hidden or unavailable),
    /// plus the chart series.
    pub fn to_json(&self) -> anyhow::Result<String> {
        let slots: serde_json::Map<String, serde_json::Value> = self
            .slots
            .iter()
            .map(|(slot, state)| {
                let value = match state {
                    SlotState::Text(s) => serde_json::Value::String(s.clone()),
                    SlotState::Hidden | SlotState::Unavailable => serde_json::Value::Null,
                };
                (slot.id().to_string(), value)
            })
            .collect();

        let charts: serde_json::Map<String, serde_json::Value> = self
            .charts
            .iter()
            .map(|(chart, series)| {
                let value = serde_json::to_value(series)?;
                Ok((chart.id().to_string(), value))
            })
            .collect::<Result<_, serde_json::Error>>()?;

        let doc = serde_json::json!({ "slots": slots, "charts": charts });
        Ok(serde_json::to_string_pretty(&doc)?)
    }
}

impl Renderer for Snapshot {
    fn text(&mut self, slot: Slot, value: &str) {
        self.slots.insert(slot, SlotState::Text(value.to_string()));
    }

    fn hide(&mut self, slot: Slot) {
        self.slots.insert(slot, SlotState::Hidden);
    }

    fn unavailable(&mut self, slot: Slot) {
        self.slots.insert(slot, SlotState::Unavailable);
    }

    fn chart(&mut self, chart: Chart, series: &[&ChartSeries]) {
        let owned = series.iter().map(|s| (*s).clone()).collect();
        self.charts.insert(chart, owned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_ids_are_unique() {
        let all = [Slot::weather(), Slot::sky()].concat();
        let mut ids: Vec<_> = all.iter().map(Slot::id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), all.len());
    }

    #[test]
    fn snapshot_keeps_latest_state_per_slot() {
        let mut snap = Snapshot::new();
        snap.text(Slot::ConditionIcon, "clear-day");
        snap.hide(Slot::ConditionIcon);
        snap.unavailable(Slot::Visibility);

        assert_eq!(snap.get(Slot::ConditionIcon), Some(&SlotState::Hidden));
        assert_eq!(snap.get(Slot::Visibility), Some(&SlotState::Unavailable));
        assert_eq!(snap.text_of(Slot::Visibility), None);
        assert_eq!(snap.get(Slot::Today), None);
    }

    #[test]
    fn snapshot_json_uses_slot_ids() {
        let mut snap = Snapshot::new();
        snap.text(Slot::Temperature, "4.3");
        snap.unavailable(Slot::Pressure);
        let empty = ChartSeries {
            name: "humidity",
            points: vec![],
        };
        snap.chart(Chart::Humidity, &[&empty]);

        let json: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();

        assert_eq!(json["slots"]["temp-now"], "4.3");
        assert!(json["slots"]["pressure"].is_null());
        assert_eq!(json["charts"]["humidity-chart"][0]["name"], "humidity");
    }
}
