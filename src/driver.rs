//! High-level driver for the DFRobot SEN0500/SEN0501 environmental sensor.

use {
    crate::{
        constants::{
            DEVICE_ID, REGISTER_DEVICE_ID, REGISTER_LUX, REGISTER_PRESS, REGISTER_RH,
            REGISTER_TEMP, REGISTER_UV, REGISTER_WIDTH, SEA_LEVEL_HPA,
        },
        conversion::{self, PressureUnit, TemperatureUnit, UvSensor},
        error::{ConfigurationError, TransportError},
        transport::{SerialChannel, Transport, UartTransport},
    },
    log::debug,
};

#[cfg(feature = "linux-hal")]
use {crate::transport::I2cTransport, linux_embedded_hal::I2cdev};

/// Reads the sensor's registers through a [`Transport`] and converts them to
/// physical units.
///
/// Every measurement issues its own register read; nothing is cached between
/// calls.
pub struct EnvironmentalSensor<T> {
    transport: T,
    uv_sensor: UvSensor,
    sea_level_hpa: f64,
}

impl<T: Transport> EnvironmentalSensor<T> {
    pub fn new(transport: T, uv_sensor: UvSensor) -> Self {
        Self {
            transport,
            uv_sensor,
            sea_level_hpa: SEA_LEVEL_HPA,
        }
    }

    /// Reference pressure used by [`altitude_default`](Self::altitude_default)
    /// and by the measurement snapshot.
    pub fn with_sea_level(mut self, sea_level_hpa: f64) -> Self {
        self.sea_level_hpa = sea_level_hpa;
        self
    }

    pub fn uv_sensor(&self) -> UvSensor {
        self.uv_sensor
    }

    pub fn sea_level_hpa(&self) -> f64 {
        self.sea_level_hpa
    }

    /// Give the transport back.
    pub fn release(self) -> T {
        self.transport
    }

    fn read_u16(&mut self, register: u8) -> Result<u16, TransportError> {
        let bytes = self.transport.read_block(register, REGISTER_WIDTH)?;

        match bytes[..] {
            [hi, lo, ..] => Ok(u16::from_be_bytes([hi, lo])),
            _ => Err(TransportError::ShortRead {
                register,
                requested: REGISTER_WIDTH,
                received: bytes.len(),
            }),
        }
    }

    /// Check that the device answers with the expected ID.
    ///
    /// Transport failures read as "not present".
    pub fn probe(&mut self) -> bool {
        match self.read_u16(REGISTER_DEVICE_ID) {
            Ok(id) if id == DEVICE_ID => true,
            Ok(id) => {
                debug!("Unexpected device ID {:#06x}", id);
                false
            }
            Err(e) => {
                debug!("Probe failed: {}", e);
                false
            }
        }
    }

    pub fn temperature(&mut self, unit: TemperatureUnit) -> Result<f64, TransportError> {
        let raw = self.read_u16(REGISTER_TEMP)?;
        Ok(conversion::temperature(raw, unit))
    }

    /// Relative humidity in percent.
    pub fn humidity(&mut self) -> Result<f64, TransportError> {
        let raw = self.read_u16(REGISTER_RH)?;
        Ok(conversion::humidity(raw))
    }

    pub fn uv_index(&mut self) -> Result<f64, TransportError> {
        let raw = self.read_u16(REGISTER_UV)?;
        Ok(conversion::uv_index(raw, self.uv_sensor))
    }

    /// Illuminance in lux.
    pub fn illuminance(&mut self) -> Result<f64, TransportError> {
        let raw = self.read_u16(REGISTER_LUX)?;
        Ok(conversion::illuminance(raw))
    }

    pub fn pressure(&mut self, unit: PressureUnit) -> Result<f64, TransportError> {
        let raw = self.read_u16(REGISTER_PRESS)?;
        Ok(conversion::pressure(raw, unit))
    }

    /// Altitude in metres, from a fresh pressure reading.
    pub fn altitude(&mut self, sea_level_hpa: f64) -> Result<f64, TransportError> {
        let pressure = self.pressure(PressureUnit::Hpa)?;
        Ok(conversion::altitude(pressure, sea_level_hpa))
    }

    pub fn altitude_default(&mut self) -> Result<f64, TransportError> {
        self.altitude(self.sea_level_hpa)
    }
}

#[cfg(feature = "linux-hal")]
impl EnvironmentalSensor<I2cTransport<I2cdev>> {
    /// Sensor on `/dev/i2c-{bus}` at `address`.
    pub fn i2c(bus: u8, address: u8, uv_sensor: UvSensor) -> Result<Self, ConfigurationError> {
        Ok(Self::new(I2cTransport::open(bus, address)?, uv_sensor))
    }
}

impl EnvironmentalSensor<UartTransport<SerialChannel>> {
    /// Sensor behind a Modbus RTU serial link.
    ///
    /// Fails with [`ConfigurationError::UartSupportDisabled`] when the crate
    /// is built without the `uart` feature.
    pub fn uart(
        port: &str,
        baud_rate: u32,
        address: u8,
        uv_sensor: UvSensor,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self::new(UartTransport::open(port, baud_rate, address)?, uv_sensor))
    }
}
