//! Runtime configuration, read from `SENSOR_*` environment variables.

use {
    crate::{
        constants::{DEFAULT_BAUD_RATE, DEFAULT_I2C_BUS, DEFAULT_UART_PORT, I2C_ADDRESS, SEA_LEVEL_HPA},
        conversion::UvSensor,
        error::ConfigurationError,
    },
    std::{env, fmt, str::FromStr, time::Duration},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    I2c,
    Uart,
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportKind::I2c => write!(f, "I2C"),
            TransportKind::Uart => write!(f, "UART"),
        }
    }
}

impl FromStr for TransportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "i2c" => Ok(TransportKind::I2c),
            "uart" | "modbus" => Ok(TransportKind::Uart),
            other => Err(format!("unknown transport {:?}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub transport: TransportKind,
    pub i2c_bus: u8,
    pub uart_port: String,
    pub baud_rate: u32,
    /// I²C address or Modbus slave address.
    pub address: u8,
    pub uv_sensor: UvSensor,
    pub interval: Duration,
    pub sea_level_hpa: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            transport: TransportKind::I2c,
            i2c_bus: DEFAULT_I2C_BUS,
            uart_port: DEFAULT_UART_PORT.to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            address: I2C_ADDRESS,
            uv_sensor: UvSensor::default(),
            interval: Duration::from_secs(1),
            sea_level_hpa: SEA_LEVEL_HPA,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigurationError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigurationError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(v) = lookup("SENSOR_TRANSPORT") {
            config.transport = parse("SENSOR_TRANSPORT", &v)?;
        }
        if let Some(v) = lookup("SENSOR_I2C_BUS") {
            config.i2c_bus = parse("SENSOR_I2C_BUS", &v)?;
        }
        if let Some(v) = lookup("SENSOR_UART_PORT") {
            config.uart_port = v;
        }
        if let Some(v) = lookup("SENSOR_BAUD_RATE") {
            config.baud_rate = parse("SENSOR_BAUD_RATE", &v)?;
        }
        if let Some(v) = lookup("SENSOR_ADDRESS") {
            config.address = parse_address(&v)?;
        }
        if let Some(v) = lookup("SENSOR_UV") {
            config.uv_sensor = parse("SENSOR_UV", &v)?;
        }
        if let Some(v) = lookup("SENSOR_INTERVAL_SECS") {
            let secs: u64 = parse("SENSOR_INTERVAL_SECS", &v)?;
            if secs == 0 {
                return Err(invalid("SENSOR_INTERVAL_SECS", &v));
            }
            config.interval = Duration::from_secs(secs);
        }
        if let Some(v) = lookup("SENSOR_SEA_LEVEL_HPA") {
            let hpa: f64 = parse("SENSOR_SEA_LEVEL_HPA", &v)?;
            if !(hpa.is_finite() && hpa > 0.0) {
                return Err(invalid("SENSOR_SEA_LEVEL_HPA", &v));
            }
            config.sea_level_hpa = hpa;
        }

        Ok(config)
    }
}

fn parse<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigurationError> {
    value.trim().parse().map_err(|_| invalid(key, value))
}

/// Decimal or `0x`-prefixed hex.
fn parse_address(value: &str) -> Result<u8, ConfigurationError> {
    let trimmed = value.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };

    parsed.map_err(|_| invalid("SENSOR_ADDRESS", value))
}

fn invalid(key: &'static str, value: &str) -> ConfigurationError {
    ConfigurationError::InvalidSetting {
        key,
        value: value.to_string(),
    }
}
