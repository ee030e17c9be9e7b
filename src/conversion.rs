//! Raw register value to physical unit conversion.
//!
//! Every function here is pure: the same raw value always yields the same
//! rounded result. Rounding is half-away-from-zero (`f64::round`).

use {
    crate::constants::{OVERSAMPLE, RAW_SCALE, TEMP_OFFSET_C, TEMP_RANGE},
    std::{fmt, str::FromStr},
};

/// UV sensor fitted to the board. Older revisions carry an LTR390-UV, newer
/// ones an S12DS photodiode; their outputs need different calibration curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UvSensor {
    Ltr390Uv,
    S12ds,
}

impl Default for UvSensor {
    fn default() -> Self {
        UvSensor::Ltr390Uv
    }
}

impl fmt::Display for UvSensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UvSensor::Ltr390Uv => write!(f, "LTR390UV"),
            UvSensor::S12ds => write!(f, "S12DS"),
        }
    }
}

impl FromStr for UvSensor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ltr390uv" | "ltr390" => Ok(UvSensor::Ltr390Uv),
            "s12ds" => Ok(UvSensor::S12ds),
            other => Err(format!("unknown UV sensor {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemperatureUnit {
    Celsius,
    Fahrenheit,
}

impl Default for TemperatureUnit {
    fn default() -> Self {
        TemperatureUnit::Celsius
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PressureUnit {
    Hpa,
    Kpa,
}

impl Default for PressureUnit {
    fn default() -> Self {
        PressureUnit::Hpa
    }
}

/// Round `value` to `decimals` places, halves away from zero.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Clamp `x` to the inclusive range `[lower, upper]`.
pub fn clamp(x: f64, lower: f64, upper: f64) -> f64 {
    lower.max(upper.min(x))
}

/// Linearly map `x` from `[in_min, in_max]` onto `[out_min, out_max]`.
pub fn map_range(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

pub fn temperature(raw: u16, unit: TemperatureUnit) -> f64 {
    let celsius = TEMP_OFFSET_C + (f64::from(raw) * TEMP_RANGE) / (RAW_SCALE * OVERSAMPLE);

    match unit {
        TemperatureUnit::Celsius => round_to(celsius, 2),
        TemperatureUnit::Fahrenheit => round_to(celsius * 1.8 + 32.0, 2),
    }
}

/// Relative humidity in percent.
pub fn humidity(raw: u16) -> f64 {
    round_to((f64::from(raw) / RAW_SCALE) * 100.0 / OVERSAMPLE, 2)
}

/// Illuminance in lux, from the vendor's quartic fit.
pub fn illuminance(raw: u16) -> f64 {
    let r = f64::from(raw);
    let lux = r * (1.0023 + r * (8.1488e-5 + r * (-9.3924e-9 + r * 6.0135e-13)));

    round_to(lux, 2)
}

/// The pressure register already holds whole hPa.
pub fn pressure(raw: u16, unit: PressureUnit) -> f64 {
    let hpa = f64::from(raw);

    match unit {
        PressureUnit::Hpa => round_to(hpa, 2),
        PressureUnit::Kpa => round_to(hpa / 10.0, 2),
    }
}

/// Barometric altitude in metres relative to `sea_level_hpa`.
pub fn altitude(pressure_hpa: f64, sea_level_hpa: f64) -> f64 {
    round_to(44330.0 * (1.0 - (pressure_hpa / sea_level_hpa).powf(0.1903)), 2)
}

pub fn uv_index(raw: u16, sensor: UvSensor) -> f64 {
    match sensor {
        UvSensor::Ltr390Uv => uv_ltr390(raw),
        UvSensor::S12ds => uv_s12ds(raw),
    }
}

fn uv_ltr390(raw: u16) -> f64 {
    let output_v = 3.0 * f64::from(raw) / RAW_SCALE;
    // Output saturates below 0.99 V and above 2.99 V; the linear fit spans 0.99-2.9 V.
    let output_v = clamp(output_v, 0.99, 2.99);

    round_to(map_range(output_v, 0.99, 2.9, 0.0, 15.0), 3)
}

fn uv_s12ds(raw: u16) -> f64 {
    let output_mv = 3000.0 * f64::from(raw) / RAW_SCALE;
    let photocurrent_na = output_mv * 1e9 / 4_303_300.0;

    round_to(photocurrent_na / 113.0, 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(1.234_567, 3), 1.235);
    }

    #[test]
    fn temperature_matches_formula_across_range() {
        for raw in (0..=u16::MAX).step_by(97) {
            let celsius = -45.0 + f64::from(raw) * 175.0 / 65536.0;
            assert_eq!(temperature(raw, TemperatureUnit::Celsius), round_to(celsius, 2));
            assert_eq!(
                temperature(raw, TemperatureUnit::Fahrenheit),
                round_to(celsius * 1.8 + 32.0, 2)
            );
        }
    }

    #[test]
    fn temperature_known_values() {
        assert_eq!(temperature(0, TemperatureUnit::Celsius), -45.0);
        assert_eq!(temperature(26000, TemperatureUnit::Celsius), 24.43);
        assert_eq!(temperature(26000, TemperatureUnit::Fahrenheit), 75.97);
    }

    #[test]
    fn humidity_is_monotonic() {
        let mut previous = humidity(0);
        for raw in 1..=u16::MAX {
            let current = humidity(raw);
            assert!(current >= previous, "humidity dropped at raw {}", raw);
            previous = current;
        }
        assert_eq!(humidity(26000), 39.67);
    }

    #[test]
    fn illuminance_polynomial() {
        assert_eq!(illuminance(0), 0.0);
        assert_eq!(illuminance(100), 101.04);
        assert_eq!(illuminance(1000), 1075.0);
    }

    #[test]
    fn pressure_units() {
        assert_eq!(pressure(1013, PressureUnit::Hpa), 1013.0);
        assert_eq!(pressure(1013, PressureUnit::Kpa), 101.3);
    }

    #[test]
    fn altitude_reference_points() {
        assert_eq!(altitude(1013.0, 1013.25), 2.08);
        assert_eq!(altitude(1013.25, 1013.25), 0.0);
        assert_eq!(altitude(900.0, 1013.25), 988.67);
    }

    #[test]
    fn ltr390_clamps_then_maps() {
        // Below the clamp floor reads as zero.
        assert_eq!(uv_index(0, UvSensor::Ltr390Uv), 0.0);
        assert_eq!(uv_index(512, UvSensor::Ltr390Uv), 4.005);
        assert_eq!(uv_index(700, UvSensor::Ltr390Uv), 8.331);
        // 3.0 V saturates at 2.99 V, which lies past the 2.9 V end of the fit.
        assert_eq!(uv_index(1024, UvSensor::Ltr390Uv), 15.707);
        assert_eq!(uv_index(u16::MAX, UvSensor::Ltr390Uv), 15.707);
    }

    #[test]
    fn s12ds_photocurrent() {
        assert_eq!(uv_index(0, UvSensor::S12ds), 0.0);
        assert_eq!(uv_index(700, UvSensor::S12ds), 4217.346);
    }

    #[test]
    fn uv_sensor_from_str() {
        assert_eq!("LTR390UV".parse(), Ok(UvSensor::Ltr390Uv));
        assert_eq!("ltr390".parse(), Ok(UvSensor::Ltr390Uv));
        assert_eq!("s12ds".parse(), Ok(UvSensor::S12ds));
        assert!("veml6075".parse::<UvSensor>().is_err());
    }
}
