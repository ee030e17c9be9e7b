use std::fmt;

mod environmental;

/// A device that can be checked for presence and read out in one go.
pub trait Sensor {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Whether the device is answering as expected.
    fn detect(&mut self) -> bool;

    fn measure(&mut self) -> Result<Vec<Measurement>, Self::Error>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Measurement {
    pub name: &'static str,
    pub value: f64,
    pub unit: &'static str,
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {}", self.name, self.value, self.unit)
    }
}
