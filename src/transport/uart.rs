//! Modbus RTU master for the board's UART interface.
//!
//! Registers are exposed as 16-bit input registers at half the I²C register
//! address. Only function 0x04 (read input registers) is implemented.

use {
    crate::{
        error::{ConfigurationError, TransportError},
        transport::Transport,
    },
    std::{
        convert::TryFrom,
        io::{Read, Write},
    },
};

#[cfg(feature = "uart")]
use std::time::Duration;

const READ_INPUT_REGISTERS: u8 = 0x04;
const EXCEPTION_FLAG: u8 = 0x80;

#[cfg(feature = "uart")]
const RESPONSE_TIMEOUT: Duration = Duration::from_secs(1);

/// Any blocking byte stream a Modbus master can run over.
pub trait ByteChannel: Read + Write + Send {}

impl<T: Read + Write + Send + ?Sized> ByteChannel for T {}

/// Type-erased channel returned by [`UartTransport::open`].
pub type SerialChannel = Box<dyn ByteChannel>;

pub struct UartTransport<S> {
    channel: S,
    slave: u8,
}

impl<S> UartTransport<S> {
    pub fn new(channel: S, slave: u8) -> Self {
        Self { channel, slave }
    }

    pub fn slave(&self) -> u8 {
        self.slave
    }

    pub fn release(self) -> S {
        self.channel
    }
}

impl UartTransport<SerialChannel> {
    /// Open `port` at `baud_rate`, 8N1, with a one second response timeout.
    #[cfg(feature = "uart")]
    pub fn open(port: &str, baud_rate: u32, slave: u8) -> Result<Self, ConfigurationError> {
        use serialport::{DataBits, Parity, StopBits};

        let serial = serialport::new(port, baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .timeout(RESPONSE_TIMEOUT)
            .open()
            .map_err(|e| ConfigurationError::SerialUnavailable {
                port: port.to_string(),
                source: Box::new(e),
            })?;

        log::debug!("Opened {} at {} baud for slave {:#04x}", port, baud_rate, slave);

        Ok(Self::new(Box::new(serial), slave))
    }

    #[cfg(not(feature = "uart"))]
    pub fn open(_port: &str, _baud_rate: u32, _slave: u8) -> Result<Self, ConfigurationError> {
        Err(ConfigurationError::UartSupportDisabled)
    }
}

impl<S: Read + Write> Transport for UartTransport<S> {
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, TransportError> {
        let (start, count) = register_window(register, length)?;
        let request = read_request(self.slave, start, count);

        let io_error = |source: std::io::Error| TransportError::Io {
            register,
            requested: length,
            source,
        };
        let unexpected = |reason: String| TransportError::UnexpectedResponse {
            register,
            requested: length,
            reason,
        };

        self.channel.write_all(&request).map_err(io_error)?;
        self.channel.flush().map_err(io_error)?;

        let mut header = [0u8; 3];
        self.channel.read_exact(&mut header).map_err(io_error)?;
        let [slave, function, byte_count] = header;

        if slave != self.slave {
            return Err(unexpected(format!("reply from slave {:#04x}", slave)));
        }

        if function == READ_INPUT_REGISTERS | EXCEPTION_FLAG {
            let mut crc = [0u8; 2];
            self.channel.read_exact(&mut crc).map_err(io_error)?;
            check_crc(register, length, &header, crc)?;
            return Err(TransportError::ModbusException {
                register,
                requested: length,
                code: byte_count,
            });
        }

        if function != READ_INPUT_REGISTERS {
            return Err(unexpected(format!("function {:#04x}", function)));
        }

        let mut rest = vec![0u8; usize::from(byte_count) + 2];
        self.channel.read_exact(&mut rest).map_err(io_error)?;
        let (data, crc) = rest.split_at(usize::from(byte_count));

        let mut frame = header.to_vec();
        frame.extend_from_slice(data);
        check_crc(register, length, &frame, [crc[0], crc[1]])?;

        if data.len() % 2 != 0 {
            return Err(unexpected(format!("odd byte count {}", byte_count)));
        }

        if data.len() < length {
            return Err(TransportError::ShortRead {
                register,
                requested: length,
                received: data.len(),
            });
        }

        // The payload is already big-endian words; trimming drops the padding
        // byte of an odd-length request.
        let mut bytes = data.to_vec();
        bytes.truncate(length);

        Ok(bytes)
    }
}

/// First input register and register count covering `length` bytes at `register`.
fn register_window(register: u8, length: usize) -> Result<(u16, u16), TransportError> {
    let start = u16::from(register) / 2;
    let count = u16::try_from((length + 1) / 2).map_err(|_| TransportError::RequestTooLarge {
        register,
        requested: length,
    })?;

    Ok((start, count))
}

fn read_request(slave: u8, start: u16, count: u16) -> [u8; 8] {
    let [start_hi, start_lo] = start.to_be_bytes();
    let [count_hi, count_lo] = count.to_be_bytes();
    let mut frame = [
        slave,
        READ_INPUT_REGISTERS,
        start_hi,
        start_lo,
        count_hi,
        count_lo,
        0,
        0,
    ];

    let [crc_lo, crc_hi] = crc16(&frame[..6]).to_le_bytes();
    frame[6] = crc_lo;
    frame[7] = crc_hi;

    frame
}

fn check_crc(
    register: u8,
    requested: usize,
    frame: &[u8],
    received: [u8; 2],
) -> Result<(), TransportError> {
    let expected = crc16(frame);
    let received = u16::from_le_bytes(received);

    if expected != received {
        return Err(TransportError::Crc {
            register,
            requested,
            expected,
            received,
        });
    }

    Ok(())
}

/// Modbus CRC-16: init 0xFFFF, reflected polynomial 0xA001.
fn crc16(bytes: &[u8]) -> u16 {
    let mut crc = 0xFFFFu16;

    for &byte in bytes {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ 0xA001;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}
