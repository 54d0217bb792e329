//! Terminal drawing of a settled dashboard [`Snapshot`].

use std::fmt::Write as _;

use crossterm::style::{Color, Stylize};
use wxdash_core::{Chart, ChartSeries, Slot, SlotState, Snapshot, Theme};

const SPARK_WIDTH: usize = 48;
const BARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

const ROWS: &[(&str, Slot, &str)] = &[
    ("Temperature", Slot::Temperature, "°C"),
    ("Feels like", Slot::FeelsLike, "°C"),
    ("Dew point", Slot::DewPoint, "°C"),
    ("Humidity", Slot::Humidity, "%"),
    ("Pressure", Slot::Pressure, "hPa"),
    ("Wind", Slot::WindSpeed, "m/s"),
    ("Direction", Slot::WindDirection, ""),
    ("Visibility", Slot::Visibility, "km"),
    ("Cloud cover", Slot::CloudCoverage, "%"),
    ("Condition", Slot::ConditionIcon, ""),
    ("Sunrise", Slot::SunriseTime, ""),
    ("Sunset", Slot::SunsetTime, ""),
];

#[derive(Debug, Clone, Copy)]
struct Palette {
    title: Color,
    label: Color,
    value: Color,
    muted: Color,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Palette {
                title: Color::Cyan,
                label: Color::Grey,
                value: Color::White,
                muted: Color::DarkGrey,
            },
            Theme::Light => Palette {
                title: Color::DarkBlue,
                label: Color::DarkGrey,
                value: Color::Black,
                muted: Color::Grey,
            },
        }
    }
}

struct Painter {
    palette: Palette,
    color: bool,
}

impl Painter {
    fn paint(&self, text: &str, color: Color) -> String {
        if self.color {
            text.with(color).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn draw(snapshot: &Snapshot, theme: Theme, color: bool) -> String {
    let painter = Painter {
        palette: Palette::for_theme(theme),
        color,
    };
    let p = painter.palette;
    let mut out = String::new();

    let today = snapshot.text_of(Slot::Today).unwrap_or("(no recent observation)");
    let title = painter.paint(&format!("wxdash · {today}"), p.title);
    let _ = writeln!(out, "{title}");

    if let Some(scenery) = snapshot.text_of(Slot::Scenery) {
        let _ = writeln!(out, "{}", painter.paint(&format!("[{scenery}]"), p.muted));
    }
    out.push('\n');

    for (label, slot, unit) in ROWS {
        let value = match snapshot.get(*slot) {
            Some(SlotState::Hidden) => continue,
            Some(SlotState::Text(text)) if unit.is_empty() => painter.paint(text, p.value),
            Some(SlotState::Text(text)) => painter.paint(&format!("{text} {unit}"), p.value),
            Some(SlotState::Unavailable) => painter.paint("unavailable", p.muted),
            None => painter.paint("-", p.muted),
        };
        let label = painter.paint(&format!("{label:<12}"), p.label);
        let _ = writeln!(out, "  {label} {value}");
    }

    if let Some(summary) = snapshot.text_of(Slot::ConditionSummary) {
        let _ = writeln!(out, "\n  {}", painter.paint(summary, p.value));
    }

    for chart in [Chart::Temperature, Chart::Humidity, Chart::Pressure] {
        let Some(series) = snapshot.chart_series(chart) else {
            continue;
        };
        out.push('\n');
        for s in series {
            let _ = writeln!(out, "  {}", chart_line(&painter, s, chart.unit()));
        }
    }

    out
}

fn chart_line(painter: &Painter, series: &ChartSeries, unit: &str) -> String {
    let p = painter.palette;
    let label = painter.paint(&format!("{:<12}", series.name), p.label);

    let values: Vec<f64> = series.values().filter(|v| v.is_finite()).collect();
    let (Some(min), Some(max)) = (
        values.iter().copied().reduce(f64::min),
        values.iter().copied().reduce(f64::max),
    ) else {
        return format!("{label} {}", painter.paint("no data", p.muted));
    };

    let width = values.len().min(SPARK_WIDTH);
    let spark = painter.paint(&sparkline(&values, width), p.title);
    let range = format!("{min}..{max} {unit} ({} pts)", series.points.len());
    format!("{label} {spark} {}", painter.paint(&range, p.muted))
}

fn sparkline(values: &[f64], width: usize) -> String {
    if values.is_empty() || width == 0 {
        return String::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = (max - min).max(0.001);
    (0..width)
        .map(|idx| {
            let src = (idx * values.len() / width).min(values.len() - 1);
            let norm = ((values[src] - min) / span).clamp(0.0, 1.0);
            BARS[(norm * (BARS.len() - 1) as f64).round() as usize]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use wxdash_core::Renderer;

    fn at_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, hour, 0, 0).unwrap()
    }

    fn series(name: &'static str, values: &[f64]) -> ChartSeries {
        ChartSeries {
            name,
            points: values
                .iter()
                .enumerate()
                .map(|(i, v)| (at_hour(i as u32), *v))
                .collect(),
        }
    }

    #[test]
    fn sparkline_spans_min_to_max() {
        assert_eq!(sparkline(&[1.0, 2.0, 3.0], 3), "▁▅█");
        assert_eq!(sparkline(&[5.0, 5.0], 2), "▁▁");
        assert_eq!(sparkline(&[], 4), "");
    }

    #[test]
    fn draws_values_units_and_placeholders() {
        let mut snap = Snapshot::new();
        snap.text(Slot::Today, "Monday, January 15, 11:00:00 GMT");
        snap.text(Slot::Temperature, "4.3");
        snap.unavailable(Slot::Pressure);
        snap.hide(Slot::ConditionIcon);
        snap.text(Slot::ConditionSummary, "Overcast");

        let out = draw(&snap, Theme::Dark, false);

        assert!(out.starts_with("wxdash · Monday, January 15, 11:00:00 GMT\n"));
        assert!(out.contains("Temperature  4.3 °C"));
        assert!(out.contains("Pressure     unavailable"));
        assert!(out.contains("Visibility   -"));
        assert!(!out.contains("Condition    "));
        assert!(out.contains("  Overcast"));
    }

    #[test]
    fn draws_chart_lines() {
        let mut snap = Snapshot::new();
        let temperature = series("temperature", &[3.1, 3.9, 4.3]);
        let dew = series("dew point", &[]);
        snap.chart(Chart::Temperature, &[&temperature, &dew]);

        let out = draw(&snap, Theme::Light, false);

        assert!(out.contains("temperature  ▁▆█ 3.1..4.3 °C (3 pts)"));
        assert!(out.contains("dew point    no data"));
    }

    #[test]
    fn plain_output_has_no_escape_codes() {
        let mut snap = Snapshot::new();
        snap.text(Slot::Temperature, "4.3");

        assert!(!draw(&snap, Theme::Dark, false).contains('\u{1b}'));
    }
}
