//! E-paper panel controllers

pub mod il0373;

pub use il0373::{Il0373, Il0373Config};

use core::convert::Infallible;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

/// Controller driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EpdError<S, P> {
    /// SPI transfer failed
    Spi(S),
    /// D/C, reset or BUSY pin failed
    Pin(P),
    /// BUSY stayed asserted past the timeout
    BusyTimeout,
    /// A plane does not match the panel size
    BufferSize,
}

/// Placeholder for an optional pin that is not wired
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPin;

impl ErrorType for NoPin {
    type Error = Infallible;
}

impl OutputPin for NoPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl InputPin for NoPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(true)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(false)
    }
}
