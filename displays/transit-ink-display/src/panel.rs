//! Framebuffered panel
//!
//! Implements [`Panel`] on top of a [`FrameBuffer`]: `fill` and `text` only
//! draw in memory, `display` hands both planes to the controller driver.

use embedded_graphics::prelude::*;
use transit_ink_core::traits::{Color, EpdDriver, Panel, Rotation};

use crate::buffer::FrameBuffer;
use crate::color::TriColor;
use crate::text::draw_text;

/// Tri-color panel with its framebuffer
pub struct EpdPanel<D> {
    driver: D,
    frame: FrameBuffer,
}

impl<D: EpdDriver> EpdPanel<D> {
    /// Wrap a controller driver; rotation is fixed from here on
    pub fn new(driver: D, rotation: Rotation) -> Self {
        Self {
            driver,
            frame: FrameBuffer::new(rotation),
        }
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Logical width and height
    pub fn size(&self) -> Size {
        self.frame.size()
    }
}

impl<D: EpdDriver> Panel for EpdPanel<D> {
    type Error = D::Error;

    fn fill(&mut self, color: Color) -> Result<(), Self::Error> {
        self.frame
            .clear(TriColor::from(color))
            .map_err(|never| match never {})
    }

    fn text(&mut self, text: &str, x: i32, y: i32, color: Color, size: u8) -> Result<(), Self::Error> {
        draw_text(&mut self.frame, text, Point::new(x, y), TriColor::from(color), size)
            .map_err(|never| match never {})
    }

    async fn display(&mut self) -> Result<(), Self::Error> {
        self.driver.update(self.frame.black(), self.frame.red()).await
    }
}
