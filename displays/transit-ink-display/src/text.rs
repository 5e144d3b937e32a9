//! Scaled bitmap text
//!
//! Text uses the 5x8 font with one column of spacing, so each character
//! advances 6 px at scale 1. A scale of `n` draws every font pixel as an
//! `n x n` block. `\n` starts a new row `8 * n` px lower at the same x. The
//! background is left untouched.

use embedded_graphics::mono_font::{ascii::FONT_5X8, MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use embedded_graphics::text::{Baseline, Text};
use embedded_graphics::Pixel;

/// 5x8 font with a 1 px gap between characters
pub const FONT: MonoFont<'static> = MonoFont {
    character_spacing: 1,
    ..FONT_5X8
};

/// Draw target adapter that magnifies every pixel
struct Scaled<'a, T> {
    target: &'a mut T,
    origin: Point,
    scale: u32,
}

impl<T: DrawTarget> Dimensions for Scaled<'_, T> {
    fn bounding_box(&self) -> Rectangle {
        let outer = self.target.bounding_box();
        Rectangle::new(Point::zero(), outer.size / self.scale)
    }
}

impl<T: DrawTarget> DrawTarget for Scaled<'_, T> {
    type Color = T::Color;
    type Error = T::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let block = Size::new(self.scale, self.scale);
        for Pixel(point, color) in pixels {
            let top_left = self.origin + point * self.scale as i32;
            self.target.fill_solid(&Rectangle::new(top_left, block), color)?;
        }
        Ok(())
    }
}

/// Draw `text` with its top-left corner at `position`
///
/// A scale of 0 is treated as 1.
pub fn draw_text<T, C>(
    target: &mut T,
    text: &str,
    position: Point,
    color: C,
    scale: u8,
) -> Result<(), T::Error>
where
    T: DrawTarget<Color = C>,
    C: PixelColor,
{
    let mut scaled = Scaled {
        target,
        origin: position,
        scale: u32::from(scale.max(1)),
    };
    let style = MonoTextStyle::new(&FONT, color);
    Text::with_baseline(text, Point::zero(), style, Baseline::Top).draw(&mut scaled)?;
    Ok(())
}
