//! Pixel color

use embedded_graphics::pixelcolor::PixelColor;
use transit_ink_core::traits::Color;

/// Black/white/red pixel
///
/// Has no raw representation; the framebuffer maps it onto its two bit
/// planes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TriColor {
    #[default]
    White,
    Black,
    Red,
}

impl PixelColor for TriColor {
    type Raw = ();
}

impl From<Color> for TriColor {
    fn from(color: Color) -> Self {
        match color {
            Color::White => TriColor::White,
            Color::Black => TriColor::Black,
            Color::Red => TriColor::Red,
        }
    }
}

impl TriColor {
    /// Bit values written to the (black, red) planes; 0 is ink
    pub const fn plane_bits(self) -> (bool, bool) {
        match self {
            TriColor::White => (true, true),
            TriColor::Black => (false, true),
            TriColor::Red => (true, false),
        }
    }
}
