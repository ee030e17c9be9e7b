use crate::{
    conversion::{PressureUnit, TemperatureUnit},
    driver::EnvironmentalSensor,
    error::TransportError,
    sensors::{Measurement, Sensor},
    transport::Transport,
};

impl<T: Transport> Sensor for EnvironmentalSensor<T> {
    type Error = TransportError;

    fn detect(&mut self) -> bool {
        self.probe()
    }

    fn measure(&mut self) -> Result<Vec<Measurement>, TransportError> {
        let temperature = self.temperature(TemperatureUnit::Celsius)?;
        let humidity = self.humidity()?;
        let uv_index = self.uv_index()?;
        let illuminance = self.illuminance()?;
        let pressure = self.pressure(PressureUnit::Hpa)?;
        let altitude = self.altitude_default()?;

        Ok(vec![
            Measurement {
                name: "temperature",
                value: temperature,
                unit: "°C",
            },
            Measurement {
                name: "humidity",
                value: humidity,
                unit: "%",
            },
            Measurement {
                name: "uv_index",
                value: uv_index,
                unit: "",
            },
            Measurement {
                name: "illuminance",
                value: illuminance,
                unit: "lx",
            },
            Measurement {
                name: "pressure",
                value: pressure,
                unit: "hPa",
            },
            Measurement {
                name: "altitude",
                value: altitude,
                unit: "m",
            },
        ])
    }
}
