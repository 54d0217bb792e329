use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    derive::{round_humidity, round_pressure, round_temperature},
    model::Observation,
};

/// One chart line: `(instant, value)` pairs in ascending time order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub name: &'static str,
    pub points: Vec<(DateTime<Utc>, f64)>,
}

impl ChartSeries {
    fn from_observations(
        name: &'static str,
        observations: &[Observation],
        value: impl Fn(&Observation) -> f64,
    ) -> Self {
        let mut points: Vec<_> = observations
            .iter()
            .map(|o| (o.timestamp, value(o)))
            .collect();
        // Stable: equal instants keep their fetch order.
        points.sort_by_key(|(ts, _)| *ts);
        Self { name, points }
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|(_, v)| *v)
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSeries {
    pub temperature: ChartSeries,
    pub dew_point: ChartSeries,
    pub humidity: ChartSeries,
    pub pressure: ChartSeries,
}

/// One point per observation and metric, rounded like the current-value
/// slots, sorted chronologically whatever order the service returned.
pub fn build_series(observations: &[Observation]) -> DashboardSeries {
    DashboardSeries {
        temperature: ChartSeries::from_observations("temperature", observations, |o| {
            round_temperature(o.temperature)
        }),
        dew_point: ChartSeries::from_observations("dew point", observations, |o| {
            round_temperature(o.dew_point)
        }),
        humidity: ChartSeries::from_observations("humidity", observations, |o| {
            round_humidity(o.humidity)
        }),
        pressure: ChartSeries::from_observations("pressure", observations, |o| {
            round_pressure(o.pressure)
        }),
    }
}
