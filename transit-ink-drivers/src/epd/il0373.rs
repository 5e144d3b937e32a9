//! IL0373 tri-color e-paper controller (SPI)
//!
//! Drives 128x296 black/white/red panels such as the 2.9" FeatherWing.
//!
//! # Bus protocol
//!
//! Write-only 4-wire SPI: the D/C pin is low while a command byte is
//! clocked out and high for its parameter bytes. The controller's BUSY line
//! is low while it is working; boards that do not wire it get fixed waits
//! instead.
//!
//! # Update cycle
//!
//! Every [`update`](EpdDriver::update) is a complete power cycle:
//!
//! 1. Optional hardware reset, wait idle
//! 2. Power setting, booster soft start, power on, wait idle
//! 3. Panel setting, CDI, PLL, resolution, VCM
//! 4. DTM1 (black plane), DTM2 (red plane)
//! 5. Refresh, wait idle (or a fixed 15 s)
//! 6. CDI, VCM off, power off

use embedded_hal::digital::{InputPin, OutputPin};
use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::spi::SpiDevice;
use transit_ink_core::traits::EpdDriver;

use super::{EpdError, NoPin};

/// IL0373 command codes
pub mod cmd {
    /// Panel setting
    pub const PANEL_SETTING: u8 = 0x00;
    /// Power setting
    pub const POWER_SETTING: u8 = 0x01;
    /// Power off
    pub const POWER_OFF: u8 = 0x02;
    /// Power on
    pub const POWER_ON: u8 = 0x04;
    /// Booster soft start
    pub const BOOSTER_SOFT_START: u8 = 0x06;
    /// Data start transmission 1 (black plane)
    pub const DTM1: u8 = 0x10;
    /// Display refresh
    pub const DISPLAY_REFRESH: u8 = 0x12;
    /// Data start transmission 2 (red plane)
    pub const DTM2: u8 = 0x13;
    /// PLL control
    pub const PLL: u8 = 0x30;
    /// VCOM and data interval setting
    pub const CDI: u8 = 0x50;
    /// Resolution setting
    pub const RESOLUTION: u8 = 0x61;
    /// VCM DC setting
    pub const VCM_DC_SETTING: u8 = 0x82;
}

/// One step of a controller sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Command byte followed by parameter bytes
    Cmd(u8, &'static [u8]),
    /// Resolution command built from the configured panel size
    Resolution,
    /// Wait for BUSY to release
    WaitIdle,
    /// Fixed delay
    DelayMs(u32),
}

/// Power-up and configuration sequence
pub const POWER_UP_SEQUENCE: &[Step] = &[
    Step::Cmd(cmd::POWER_SETTING, &[0x03, 0x00, 0x2B, 0x2B, 0x09]),
    Step::Cmd(cmd::BOOSTER_SOFT_START, &[0x17, 0x17, 0x17]),
    Step::Cmd(cmd::POWER_ON, &[]),
    Step::WaitIdle,
    Step::DelayMs(200),
    Step::Cmd(cmd::PANEL_SETTING, &[0xCF]),
    Step::Cmd(cmd::CDI, &[0x37]),
    Step::Cmd(cmd::PLL, &[0x29]),
    Step::Resolution,
    Step::Cmd(cmd::VCM_DC_SETTING, &[0x0A]),
    Step::DelayMs(50),
];

/// Power-down sequence
pub const POWER_DOWN_SEQUENCE: &[Step] = &[
    Step::Cmd(cmd::CDI, &[0x17]),
    Step::Cmd(cmd::VCM_DC_SETTING, &[0x00]),
    Step::Cmd(cmd::POWER_OFF, &[]),
];

/// Timing and geometry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Il0373Config {
    /// Native width in pixels (multiple of 8)
    pub width: u16,
    /// Native height in pixels
    pub height: u16,
    /// BUSY poll period
    pub busy_poll_ms: u32,
    /// Give up waiting for BUSY after this long
    pub busy_timeout_ms: u32,
    /// Fixed wait replacing each BUSY wait when no pin is wired
    pub unwired_busy_ms: u32,
    /// Extra wait after a refresh when no pin is wired
    pub unwired_refresh_ms: u32,
    /// Reset pulse width and settle time
    pub reset_ms: u32,
}

impl Default for Il0373Config {
    fn default() -> Self {
        Self {
            width: 128,
            height: 296,
            busy_poll_ms: 10,
            busy_timeout_ms: 30_000,
            unwired_busy_ms: 500,
            unwired_refresh_ms: 15_000,
            reset_ms: 100,
        }
    }
}

impl Il0373Config {
    /// Bytes per bit plane
    pub const fn plane_len(&self) -> usize {
        (self.width as usize).div_ceil(8) * self.height as usize
    }
}

/// IL0373 driver
pub struct Il0373<SPI, DC, RST, BUSY, DELAY> {
    spi: SPI,
    dc: DC,
    reset: Option<RST>,
    busy: Option<BUSY>,
    delay: DELAY,
    config: Il0373Config,
}

impl<SPI, DC, DELAY> Il0373<SPI, DC, NoPin, NoPin, DELAY> {
    /// Driver with only SPI and D/C wired
    pub fn new(spi: SPI, dc: DC, delay: DELAY) -> Self {
        Self {
            spi,
            dc,
            reset: None,
            busy: None,
            delay,
            config: Il0373Config::default(),
        }
    }
}

impl<SPI, DC, RST, BUSY, DELAY> Il0373<SPI, DC, RST, BUSY, DELAY> {
    /// Use a reset pin
    pub fn with_reset<R>(self, reset: R) -> Il0373<SPI, DC, R, BUSY, DELAY> {
        Il0373 {
            spi: self.spi,
            dc: self.dc,
            reset: Some(reset),
            busy: self.busy,
            delay: self.delay,
            config: self.config,
        }
    }

    /// Use a BUSY input pin
    pub fn with_busy<B>(self, busy: B) -> Il0373<SPI, DC, RST, B, DELAY> {
        Il0373 {
            spi: self.spi,
            dc: self.dc,
            reset: self.reset,
            busy: Some(busy),
            delay: self.delay,
            config: self.config,
        }
    }

    /// Replace the timing and geometry
    pub fn with_config(mut self, config: Il0373Config) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &Il0373Config {
        &self.config
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, Option<RST>, Option<BUSY>, DELAY) {
        (self.spi, self.dc, self.reset, self.busy, self.delay)
    }
}

impl<SPI, DC, RST, BUSY, DELAY> Il0373<SPI, DC, RST, BUSY, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    BUSY: InputPin<Error = DC::Error>,
    DELAY: DelayNs,
{
    /// Send a command byte and its parameters
    pub async fn command(&mut self, command: u8, data: &[u8]) -> Result<(), EpdError<SPI::Error, DC::Error>> {
        self.dc.set_low().map_err(EpdError::Pin)?;
        self.spi.write(&[command]).await.map_err(EpdError::Spi)?;

        if !data.is_empty() {
            self.dc.set_high().map_err(EpdError::Pin)?;
            self.spi.write(data).await.map_err(EpdError::Spi)?;
        }
        Ok(())
    }

    /// Pulse the reset line, if wired
    pub async fn hardware_reset(&mut self) -> Result<(), EpdError<SPI::Error, DC::Error>> {
        let Some(reset) = self.reset.as_mut() else {
            return Ok(());
        };
        reset.set_low().map_err(EpdError::Pin)?;
        self.delay.delay_ms(self.config.reset_ms).await;
        reset.set_high().map_err(EpdError::Pin)?;
        self.delay.delay_ms(self.config.reset_ms).await;
        Ok(())
    }

    /// Wait until the controller is idle
    ///
    /// Without a BUSY pin this is a fixed delay.
    pub async fn wait_idle(&mut self) -> Result<(), EpdError<SPI::Error, DC::Error>> {
        let Some(busy) = self.busy.as_mut() else {
            self.delay.delay_ms(self.config.unwired_busy_ms).await;
            return Ok(());
        };

        let mut waited = 0;
        while busy.is_low().map_err(EpdError::Pin)? {
            if waited >= self.config.busy_timeout_ms {
                return Err(EpdError::BusyTimeout);
            }
            self.delay.delay_ms(self.config.busy_poll_ms).await;
            waited += self.config.busy_poll_ms;
        }
        Ok(())
    }

    async fn run(&mut self, steps: &[Step]) -> Result<(), EpdError<SPI::Error, DC::Error>> {
        for step in steps {
            match *step {
                Step::Cmd(command, data) => self.command(command, data).await?,
                Step::Resolution => {
                    let width = self.config.width;
                    let height = self.config.height;
                    let data = [(width & 0xFF) as u8, (height >> 8) as u8, (height & 0xFF) as u8];
                    self.command(cmd::RESOLUTION, &data).await?;
                }
                Step::WaitIdle => self.wait_idle().await?,
                Step::DelayMs(ms) => self.delay.delay_ms(ms).await,
            }
        }
        Ok(())
    }

    /// Reset, power up and configure the controller
    pub async fn power_up(&mut self) -> Result<(), EpdError<SPI::Error, DC::Error>> {
        debug!("IL0373 power up");
        self.hardware_reset().await?;
        self.wait_idle().await?;
        self.run(POWER_UP_SEQUENCE).await
    }

    /// Switch the panel supply off
    pub async fn power_down(&mut self) -> Result<(), EpdError<SPI::Error, DC::Error>> {
        debug!("IL0373 power down");
        self.run(POWER_DOWN_SEQUENCE).await
    }

    /// Trigger a refresh and wait for it to finish
    pub async fn refresh(&mut self) -> Result<(), EpdError<SPI::Error, DC::Error>> {
        self.command(cmd::DISPLAY_REFRESH, &[]).await?;
        self.delay.delay_ms(100).await;
        self.wait_idle().await?;
        if self.busy.is_none() {
            self.delay.delay_ms(self.config.unwired_refresh_ms).await;
        }
        Ok(())
    }
}

impl<SPI, DC, RST, BUSY, DELAY> EpdDriver for Il0373<SPI, DC, RST, BUSY, DELAY>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
    BUSY: InputPin<Error = DC::Error>,
    DELAY: DelayNs,
{
    type Error = EpdError<SPI::Error, DC::Error>;

    async fn update(&mut self, black: &[u8], red: &[u8]) -> Result<(), Self::Error> {
        let expected = self.config.plane_len();
        if black.len() != expected || red.len() != expected {
            return Err(EpdError::BufferSize);
        }

        self.power_up().await?;
        self.command(cmd::DTM1, black).await?;
        self.command(cmd::DTM2, red).await?;
        debug!("IL0373 refreshing");
        self.refresh().await?;
        self.power_down().await
    }
}
