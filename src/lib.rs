//! Driver for the DFRobot SEN0500/SEN0501 environmental sensor boards
//! (temperature, humidity, UV, illuminance, pressure and altitude), over I²C
//! or UART/Modbus RTU.

use {
    anyhow::Result,
    chrono::{DateTime, Utc},
    log::{info, warn},
    std::{fmt, time::Duration},
    tokio::time,
};

pub mod config;
pub mod constants;
pub mod conversion;
pub mod driver;
pub mod error;
pub mod sensors;
pub mod transport;

pub use {
    config::{Config, TransportKind},
    conversion::{PressureUnit, TemperatureUnit, UvSensor},
    driver::EnvironmentalSensor,
    error::{ConfigurationError, TransportError},
    sensors::{Measurement, Sensor},
    transport::{I2cTransport, Transport, UartTransport},
};

const PROBE_RETRY: Duration = Duration::from_secs(1);

/// One read-out of every channel.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub time: DateTime<Utc>,
    pub measurements: Vec<Measurement>,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.time.to_rfc3339())?;
        for (i, measurement) in self.measurements.iter().enumerate() {
            let sep = if i == 0 { " " } else { ", " };
            write!(f, "{}{}", sep, measurement)?;
        }
        Ok(())
    }
}

/// Open the configured sensor, wait for it to answer, then poll forever.
pub async fn run(config: Config) -> Result<()> {
    info!(
        "Opening {} sensor at {:#04x} ({} UV sensor)",
        config.transport, config.address, config.uv_sensor
    );
    let mut sensor = open_sensor(&config)?;

    while !sensor.detect() {
        warn!("Sensor initialization failed, retrying");
        time::sleep(PROBE_RETRY).await;
    }
    info!("Sensor initialization succeeded");

    poll(&mut sensor, config.interval).await
}

pub fn open_sensor(
    config: &Config,
) -> Result<EnvironmentalSensor<Box<dyn Transport>>, ConfigurationError> {
    let transport: Box<dyn Transport> = match config.transport {
        TransportKind::I2c => open_i2c(config)?,
        TransportKind::Uart => Box::new(UartTransport::open(
            &config.uart_port,
            config.baud_rate,
            config.address,
        )?),
    };

    Ok(EnvironmentalSensor::new(transport, config.uv_sensor).with_sea_level(config.sea_level_hpa))
}

#[cfg(feature = "linux-hal")]
fn open_i2c(config: &Config) -> Result<Box<dyn Transport>, ConfigurationError> {
    Ok(Box::new(I2cTransport::open(config.i2c_bus, config.address)?))
}

#[cfg(not(feature = "linux-hal"))]
fn open_i2c(_config: &Config) -> Result<Box<dyn Transport>, ConfigurationError> {
    Err(ConfigurationError::I2cSupportDisabled)
}

/// Read `sensor` every `period`. A failed read skips that cycle.
pub async fn poll<S: Sensor>(sensor: &mut S, period: Duration) -> Result<()> {
    let mut interval = time::interval(period);
    loop {
        interval.tick().await;

        if let Some(snapshot) = read_snapshot(sensor) {
            info!("{}", snapshot);
        }
    }
}

/// Take one snapshot, logging and swallowing a read failure.
pub fn read_snapshot<S: Sensor>(sensor: &mut S) -> Option<Snapshot> {
    match sensor.measure() {
        Ok(measurements) => Some(Snapshot {
            time: Utc::now(),
            measurements,
        }),
        Err(e) => {
            warn!("Failed to read sensor, skipping cycle: {}", e);
            None
        }
    }
}
