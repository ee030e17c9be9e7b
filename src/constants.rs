//! Register map and device defaults for the SEN0500/SEN0501 boards.

/// Default I²C address, also used as the Modbus slave address.
pub const I2C_ADDRESS: u8 = 0x22;
/// Value the device-ID register is expected to hold.
pub const DEVICE_ID: u16 = I2C_ADDRESS as u16;

pub const REGISTER_DEVICE_ID: u8 = 0x04;
pub const REGISTER_UV: u8 = 0x10;
pub const REGISTER_LUX: u8 = 0x12;
pub const REGISTER_TEMP: u8 = 0x14;
pub const REGISTER_RH: u8 = 0x16;
pub const REGISTER_PRESS: u8 = 0x18;

/// Every register is one big-endian 16-bit word.
pub const REGISTER_WIDTH: usize = 2;

pub const DEFAULT_I2C_BUS: u8 = 1;
pub const DEFAULT_UART_PORT: &str = "/dev/ttyAMA0";
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Standard sea-level pressure in hPa.
pub const SEA_LEVEL_HPA: f64 = 1013.25;

pub(crate) const TEMP_OFFSET_C: f64 = -45.0;
pub(crate) const TEMP_RANGE: f64 = 175.0;
pub(crate) const RAW_SCALE: f64 = 1024.0;
pub(crate) const OVERSAMPLE: f64 = 64.0;
