use std::time::{Duration, Instant};

use rppal::gpio::{Gpio, InputPin, OutputPin, Trigger};
use tracing::{debug, trace};
use wheel_traits::{Feeder, Level, PulseSource};

use crate::error::{HwError, Result};
use crate::util::EdgeDebouncer;

fn gpio_err(e: impl std::fmt::Display) -> HwError {
    HwError::Gpio(e.to_string())
}

/// IR break-beam sensor on a pulled-up input pin, interrupt on both edges.
pub struct GpioSensor {
    pin: InputPin,
    debouncer: EdgeDebouncer,
}

impl GpioSensor {
    pub fn new(pin: u8, debounce: Duration) -> Result<Self> {
        let gpio = Gpio::new().map_err(gpio_err)?;
        let mut input = gpio.get(pin).map_err(gpio_err)?.into_input_pullup();
        input.set_interrupt(Trigger::Both).map_err(gpio_err)?;
        debug!(pin, debounce_ms = debounce.as_millis() as u64, "sensor pin ready");
        Ok(Self {
            pin: input,
            debouncer: EdgeDebouncer::new(debounce),
        })
    }
}

impl PulseSource for GpioSensor {
    fn next_edge(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<Option<Level>, Box<dyn std::error::Error + Send + Sync>> {
        let level = match self.pin.poll_interrupt(true, Some(timeout)) {
            Ok(Some(level)) => level,
            Ok(None) => return Ok(None),
            Err(e) => return Err(Box::new(gpio_err(e))),
        };
        if !self.debouncer.accept(Instant::now()) {
            trace!("edge dropped by debounce");
            return Ok(None);
        }
        Ok(Some(match level {
            rppal::gpio::Level::Low => Level::Low,
            rppal::gpio::Level::High => Level::High,
        }))
    }
}

/// Dispenser motor relay. Rests high; pulling the line low starts the motor.
pub struct GpioFeeder {
    pin: OutputPin,
}

impl GpioFeeder {
    pub fn new(pin: u8) -> Result<Self> {
        let gpio = Gpio::new().map_err(gpio_err)?;
        let output = gpio.get(pin).map_err(gpio_err)?.into_output_high();
        debug!(pin, "feeder pin ready (high)");
        Ok(Self { pin: output })
    }
}

impl Feeder for GpioFeeder {
    fn activate(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.pin.set_low();
        Ok(())
    }

    fn deactivate(&mut self) -> std::result::Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.pin.set_high();
        Ok(())
    }
}

impl Drop for GpioFeeder {
    fn drop(&mut self) {
        self.pin.set_high();
    }
}
