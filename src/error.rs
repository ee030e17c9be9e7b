use std::error::Error as StdError;

/// A register read that could not deliver the requested bytes.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("short read at register {register:#04x}: requested {requested} bytes, received {received}")]
    ShortRead {
        register: u8,
        requested: usize,
        received: usize,
    },

    #[error("I2C read failed (register {register:#04x}, {requested} bytes): {message}")]
    Bus {
        register: u8,
        requested: usize,
        message: String,
    },

    #[error("UART read failed (register {register:#04x}, {requested} bytes): {source}")]
    Io {
        register: u8,
        requested: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Modbus CRC mismatch at register {register:#04x} ({requested} bytes): expected {expected:#06x}, received {received:#06x}")]
    Crc {
        register: u8,
        requested: usize,
        expected: u16,
        received: u16,
    },

    #[error("Modbus exception {code:#04x} at register {register:#04x} ({requested} bytes)")]
    ModbusException {
        register: u8,
        requested: usize,
        code: u8,
    },

    #[error("unexpected Modbus response at register {register:#04x} ({requested} bytes): {reason}")]
    UnexpectedResponse {
        register: u8,
        requested: usize,
        reason: String,
    },

    #[error("request for {requested} bytes at register {register:#04x} exceeds one Modbus read")]
    RequestTooLarge { register: u8, requested: usize },
}

impl TransportError {
    /// Register address the failed read targeted.
    pub fn register(&self) -> u8 {
        match *self {
            TransportError::ShortRead { register, .. }
            | TransportError::Bus { register, .. }
            | TransportError::Io { register, .. }
            | TransportError::Crc { register, .. }
            | TransportError::ModbusException { register, .. }
            | TransportError::UnexpectedResponse { register, .. }
            | TransportError::RequestTooLarge { register, .. } => register,
        }
    }
}

/// Failure to build a transport or to read the configuration for one.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("UART transport requires the `uart` feature")]
    UartSupportDisabled,

    #[error("I2C transport requires the `linux-hal` feature")]
    I2cSupportDisabled,

    #[error("failed to open serial port {port}: {source}")]
    SerialUnavailable {
        port: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("failed to open I2C bus {path}: {source}")]
    I2cUnavailable {
        path: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("invalid value {value:?} for {key}")]
    InvalidSetting { key: &'static str, value: String },
}
