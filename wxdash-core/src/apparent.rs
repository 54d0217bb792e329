//! Apparent ("feels like") temperature.
//!
//! NWS wind chill below 50 °F with wind above 3 mph, NWS heat index
//! (Rothfusz regression with the low/high humidity adjustments) from
//! 80 °F up, and the plain air temperature in between. The formulas are
//! defined in imperial units; callers work in °C and m/s.

const MPS_TO_MPH: f64 = 2.236_936;

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

pub fn heat_index_f(temp_f: f64, rh_percent: f64) -> f64 {
    let simple = 0.5 * (temp_f + 61.0 + ((temp_f - 68.0) * 1.2) + (rh_percent * 0.094));
    if (simple + temp_f) / 2.0 < 80.0 {
        return simple;
    }

    let t = temp_f;
    let rh = rh_percent;
    let mut hi = -42.379 + 2.04901523 * t + 10.14333127 * rh
        - 0.22475541 * t * rh
        - 0.00683783 * t * t
        - 0.05481717 * rh * rh
        + 0.00122874 * t * t * rh
        + 0.00085282 * t * rh * rh
        - 0.00000199 * t * t * rh * rh;

    if rh < 13.0 && (80.0..=112.0).contains(&t) {
        hi -= ((13.0 - rh) / 4.0) * ((17.0 - (t - 95.0).abs()) / 17.0).sqrt();
    } else if rh > 85.0 && (80.0..=87.0).contains(&t) {
        hi += ((rh - 85.0) / 10.0) * ((87.0 - t) / 5.0);
    }
    hi
}

pub fn wind_chill_f(temp_f: f64, wind_mph: f64) -> f64 {
    if temp_f > 50.0 || wind_mph <= 3.0 {
        return temp_f;
    }
    let v = wind_mph.powf(0.16);
    35.74 + 0.6215 * temp_f - 35.75 * v + 0.4275 * temp_f * v
}

/// Apparent temperature in °C from air temperature (°C), relative
/// humidity (%) and wind speed (m/s).
pub fn apparent_temperature(temp_c: f64, rh_percent: f64, wind_mps: f64) -> f64 {
    let temp_f = celsius_to_fahrenheit(temp_c);
    let wind_mph = wind_mps * MPS_TO_MPH;

    let feels_f = if temp_f <= 50.0 && wind_mph > 3.0 {
        wind_chill_f(temp_f, wind_mph)
    } else if temp_f >= 80.0 {
        heat_index_f(temp_f, rh_percent)
    } else {
        temp_f
    };

    fahrenheit_to_celsius(feels_f)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mild_conditions_feel_like_air_temperature() {
        let feels = apparent_temperature(18.0, 60.0, 5.0);
        assert!((feels - 18.0).abs() < 1e-9);
    }

    #[test]
    fn cold_wind_feels_colder() {
        // 0 °C with 10 m/s wind: NWS wind chill is about -7 °C.
        let feels = apparent_temperature(0.0, 80.0, 10.0);
        assert!(feels < -5.5 && feels > -7.5, "got {feels}");
    }

    #[test]
    fn calm_cold_air_has_no_wind_chill() {
        let feels = apparent_temperature(0.0, 80.0, 1.0);
        assert!(feels.abs() < 1e-9);
    }

    #[test]
    fn hot_humid_air_feels_hotter() {
        // 32 °C at 70 % RH: heat index is roughly 40-41 °C.
        let feels = apparent_temperature(32.0, 70.0, 2.0);
        assert!(feels > 39.0 && feels < 42.5, "got {feels}");
    }
}
