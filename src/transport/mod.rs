//! The register-block channel the driver reads through.

use crate::error::TransportError;

mod i2c;
mod uart;

pub use self::{
    i2c::I2cTransport,
    uart::{ByteChannel, SerialChannel, UartTransport},
};

pub trait Transport {
    /// Read `length` bytes starting at `register`.
    ///
    /// Implementations return exactly `length` bytes or an error; callers still
    /// check the length before decoding.
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, TransportError>;
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, TransportError> {
        (**self).read_block(register, length)
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn read_block(&mut self, register: u8, length: usize) -> Result<Vec<u8>, TransportError> {
        (**self).read_block(register, length)
    }
}
