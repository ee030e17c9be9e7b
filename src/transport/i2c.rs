use {
    crate::{error::TransportError, transport::Transport},
    embedded_hal::blocking::i2c::WriteRead,
    std::fmt::Debug,
};

#[cfg(feature = "linux-hal")]
use {crate::error::ConfigurationError, linux_embedded_hal::I2cdev};

/// Register reads over any embedded-hal I²C bus: write the register address,
/// then read the block back in one transaction.
pub struct I2cTransport<I2C> {
    bus: I2C,
    address: u8,
}

impl<I2C> I2cTransport<I2C> {
    pub fn new(bus: I2C, address: u8) -> Self {
        Self { bus, address }
    }

    pub fn address(&self) -> u8 {
        self.address
    }

    pub fn release(self) -> I2C {
        self.bus
    }
}

#[cfg(feature = "linux-hal")]
impl I2cTransport<I2cdev> {
    /// Open `/dev/i2c-{bus}` and talk to the device at `address`.
    pub fn open(bus: u8, address: u8) -> Result<Self, ConfigurationError> {
        let path = format!("/dev/i2c-{}", bus);
        let dev = I2cdev::new(&path).map_err(|e| ConfigurationError::I2cUnavailable {
            path: path.clone(),
            source: Box::new(e),
        })?;

        log::debug!("Opened {} for device {:#04x}", path, address);

        Ok(Self::new(dev, address))
    }
}

impl<I2C> Transport for I2cTransport<I2C>
where
    I2C: WriteRead,
    I2C::Error: Debug,
{
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, TransportError> {
        let mut buffer = vec![0u8; length];

        self.bus
            .write_read(self.address, &[register], &mut buffer)
            .map_err(|e| TransportError::Bus {
                register,
                requested: length,
                message: format!("{:?}", e),
            })?;

        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Nack;

    /// Records the last transaction and answers with a fixed payload.
    struct FakeBus {
        payload: Vec<u8>,
        fail: bool,
        last: Option<(u8, Vec<u8>)>,
    }

    impl WriteRead for FakeBus {
        type Error = Nack;

        fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<(), Nack> {
            self.last = Some((address, bytes.to_vec()));
            if self.fail {
                return Err(Nack);
            }
            buffer.copy_from_slice(&self.payload[..buffer.len()]);
            Ok(())
        }
    }

    #[test]
    fn writes_register_then_reads_block() {
        let bus = FakeBus {
            payload: vec![0x00, 0x22],
            fail: false,
            last: None,
        };
        let mut transport = I2cTransport::new(bus, 0x22);

        assert_eq!(transport.read_block(0x04, 2).unwrap(), vec![0x00, 0x22]);

        let bus = transport.release();
        assert_eq!(bus.last, Some((0x22, vec![0x04])));
    }

    #[test]
    fn bus_error_carries_register() {
        let bus = FakeBus {
            payload: vec![],
            fail: true,
            last: None,
        };
        let mut transport = I2cTransport::new(bus, 0x22);

        match transport.read_block(0x14, 2) {
            Err(TransportError::Bus {
                register,
                requested,
                message,
            }) => {
                assert_eq!(register, 0x14);
                assert_eq!(requested, 2);
                assert_eq!(message, "Nack");
            }
            other => panic!("expected bus error, got {:?}", other),
        }
    }

    #[cfg(feature = "linux-hal")]
    #[test]
    fn missing_bus_is_a_configuration_error() {
        match I2cTransport::open(250, 0x22) {
            Err(ConfigurationError::I2cUnavailable { path, .. }) => {
                assert_eq!(path, "/dev/i2c-250");
            }
            Err(other) => panic!("expected I2C bus error, got {:?}", other),
            Ok(_) => panic!("opened a nonexistent I2C bus"),
        }
    }
}
