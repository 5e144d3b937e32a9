//! Tri-color framebuffer
//!
//! Two packed bit planes (black and red) in the controller's native layout:
//! row-major, 16 bytes per row, most significant bit first, 0 = ink.
//!
//! ```text
//!            native x ->
//!   byte:  [ 0 ][ 1 ] ... [15 ]     row 0
//!          [16 ][17 ] ... [31 ]     row 1
//!            ...
//!          [4720] ...     [4735]    row 295
//! ```
//!
//! Callers draw in logical coordinates; the rotation maps them onto the
//! native grid and anything off the panel is dropped.

use core::convert::Infallible;

use embedded_graphics::prelude::*;
use embedded_graphics::Pixel;
use transit_ink_core::traits::Rotation;

use crate::color::TriColor;

/// Native panel width in pixels
pub const NATIVE_WIDTH: u32 = 128;

/// Native panel height in pixels
pub const NATIVE_HEIGHT: u32 = 296;

const BYTES_PER_ROW: usize = NATIVE_WIDTH as usize / 8;

/// Bytes per bit plane
pub const PLANE_LEN: usize = BYTES_PER_ROW * NATIVE_HEIGHT as usize;

/// In-memory image of the panel
#[derive(Clone)]
pub struct FrameBuffer {
    black: [u8; PLANE_LEN],
    red: [u8; PLANE_LEN],
    rotation: Rotation,
}

impl FrameBuffer {
    /// Blank (white) framebuffer
    pub const fn new(rotation: Rotation) -> Self {
        Self {
            black: [0xFF; PLANE_LEN],
            red: [0xFF; PLANE_LEN],
            rotation,
        }
    }

    pub const fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Black plane, ready to send
    pub fn black(&self) -> &[u8] {
        &self.black
    }

    /// Red plane, ready to send
    pub fn red(&self) -> &[u8] {
        &self.red
    }

    /// Logical width and height under the current rotation
    pub const fn logical_size(&self) -> (u32, u32) {
        if self.rotation.swaps_axes() {
            (NATIVE_HEIGHT, NATIVE_WIDTH)
        } else {
            (NATIVE_WIDTH, NATIVE_HEIGHT)
        }
    }

    /// Color at a logical point, `None` if off the panel
    pub fn pixel(&self, point: Point) -> Option<TriColor> {
        let (index, mask) = self.position(point)?;
        let color = if self.black[index] & mask == 0 {
            TriColor::Black
        } else if self.red[index] & mask == 0 {
            TriColor::Red
        } else {
            TriColor::White
        };
        Some(color)
    }

    /// Set a logical pixel; off-panel points are ignored
    pub fn set_pixel(&mut self, point: Point, color: TriColor) {
        let Some((index, mask)) = self.position(point) else {
            return;
        };
        let (black, red) = color.plane_bits();
        write_bit(&mut self.black[index], mask, black);
        write_bit(&mut self.red[index], mask, red);
    }

    /// Byte index and bit mask of a logical point
    fn position(&self, point: Point) -> Option<(usize, u8)> {
        let (nx, ny) = to_native(point, self.rotation)?;
        Some((ny * BYTES_PER_ROW + nx / 8, 0x80 >> (nx % 8)))
    }
}

/// Map a logical point to native coordinates
fn to_native(point: Point, rotation: Rotation) -> Option<(usize, usize)> {
    let w = i64::from(NATIVE_WIDTH);
    let h = i64::from(NATIVE_HEIGHT);
    let (x, y) = (i64::from(point.x), i64::from(point.y));

    let (nx, ny) = match rotation {
        Rotation::Rotate0 => (x, y),
        Rotation::Rotate90 => (w - 1 - y, x),
        Rotation::Rotate180 => (w - 1 - x, h - 1 - y),
        Rotation::Rotate270 => (y, h - 1 - x),
    };

    if (0..w).contains(&nx) && (0..h).contains(&ny) {
        Some((nx as usize, ny as usize))
    } else {
        None
    }
}

fn write_bit(byte: &mut u8, mask: u8, set: bool) {
    if set {
        *byte |= mask;
    } else {
        *byte &= !mask;
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        let (width, height) = self.logical_size();
        Size::new(width, height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = TriColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            self.set_pixel(point, color);
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        let (black, red) = color.plane_bits();
        self.black.fill(if black { 0xFF } else { 0x00 });
        self.red.fill(if red { 0xFF } else { 0x00 });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_white() {
        let fb = FrameBuffer::new(Rotation::Rotate0);
        assert_eq!(fb.black().len(), 4736);
        assert_eq!(fb.red().len(), 4736);
        assert!(fb.black().iter().all(|&b| b == 0xFF));
        assert!(fb.red().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_black_pixel_clears_black_bit() {
        let mut fb = FrameBuffer::new(Rotation::Rotate0);
        fb.set_pixel(Point::new(0, 0), TriColor::Black);
        assert_eq!(fb.black()[0], 0x7F);
        assert_eq!(fb.red()[0], 0xFF);

        fb.set_pixel(Point::new(9, 1), TriColor::Black);
        assert_eq!(fb.black()[16 + 1], 0xBF);
    }

    #[test]
    fn test_red_pixel_replaces_black() {
        let mut fb = FrameBuffer::new(Rotation::Rotate0);
        fb.set_pixel(Point::new(3, 0), TriColor::Black);
        fb.set_pixel(Point::new(3, 0), TriColor::Red);
        assert_eq!(fb.black()[0], 0xFF);
        assert_eq!(fb.red()[0], 0xEF);
        assert_eq!(fb.pixel(Point::new(3, 0)), Some(TriColor::Red));
    }

    #[test]
    fn test_rotation_mapping() {
        // Rotate90: (x, y) -> (W-1-y, x)
        let mut fb = FrameBuffer::new(Rotation::Rotate90);
        fb.set_pixel(Point::new(0, 0), TriColor::Black);
        assert_eq!(fb.black()[15], 0xFE);

        // Rotate180: (x, y) -> (W-1-x, H-1-y)
        let mut fb = FrameBuffer::new(Rotation::Rotate180);
        fb.set_pixel(Point::new(0, 0), TriColor::Black);
        assert_eq!(fb.black()[PLANE_LEN - 1], 0xFE);

        // Rotate270: (x, y) -> (y, H-1-x)
        let mut fb = FrameBuffer::new(Rotation::Rotate270);
        fb.set_pixel(Point::new(0, 0), TriColor::Black);
        assert_eq!(fb.black()[295 * 16], 0x7F);
        fb.set_pixel(Point::new(295, 127), TriColor::Black);
        assert_eq!(fb.black()[15], 0xFE);
    }

    #[test]
    fn test_logical_size() {
        assert_eq!(FrameBuffer::new(Rotation::Rotate0).size(), Size::new(128, 296));
        assert_eq!(FrameBuffer::new(Rotation::Rotate180).size(), Size::new(128, 296));
        assert_eq!(FrameBuffer::new(Rotation::Rotate270).size(), Size::new(296, 128));
    }

    #[test]
    fn test_off_panel_pixels_are_clipped() {
        let mut fb = FrameBuffer::new(Rotation::Rotate270);
        for point in [
            Point::new(-1, 0),
            Point::new(0, -1),
            Point::new(296, 0),
            Point::new(0, 128),
            Point::new(i32::MIN, i32::MAX),
        ] {
            fb.set_pixel(point, TriColor::Black);
            assert_eq!(fb.pixel(point), None);
        }
        assert!(fb.black().iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn test_clear() {
        let mut fb = FrameBuffer::new(Rotation::Rotate0);
        fb.clear(TriColor::Red).unwrap();
        assert!(fb.black().iter().all(|&b| b == 0xFF));
        assert!(fb.red().iter().all(|&b| b == 0x00));

        fb.clear(TriColor::White).unwrap();
        assert!(fb.red().iter().all(|&b| b == 0xFF));
    }
}
