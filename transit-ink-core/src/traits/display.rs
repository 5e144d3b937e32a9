//! Display traits for the e-paper panel
//!
//! Two layers: [`Panel`] is what the refresh loop draws on (flat fill, text,
//! push), [`EpdDriver`] is what a framebuffer implementation pushes its bit
//! planes into.

/// Drawable colors on a black/white/red panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Color {
    /// Paper background
    #[default]
    White,
    /// Black ink
    Black,
    /// Highlight plane (red ink)
    Red,
}

/// Panel rotation in quarter turns
///
/// Fixed when the panel is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    /// Native orientation
    #[default]
    Rotate0,
    /// One quarter turn
    Rotate90,
    /// Upside down
    Rotate180,
    /// Three quarter turns
    Rotate270,
}

impl Rotation {
    /// Build from a quarter-turn count (0-3)
    pub const fn from_quarter_turns(turns: u8) -> Option<Self> {
        match turns {
            0 => Some(Rotation::Rotate0),
            1 => Some(Rotation::Rotate90),
            2 => Some(Rotation::Rotate180),
            3 => Some(Rotation::Rotate270),
            _ => None,
        }
    }

    /// Quarter-turn count (0-3)
    pub const fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::Rotate0 => 0,
            Rotation::Rotate90 => 1,
            Rotation::Rotate180 => 2,
            Rotation::Rotate270 => 3,
        }
    }

    /// True if logical width and height are swapped relative to the panel
    pub const fn swaps_axes(&self) -> bool {
        matches!(self, Rotation::Rotate90 | Rotation::Rotate270)
    }
}

/// Drawing surface used by the refresh loop
///
/// `fill` and `text` only touch the in-memory framebuffer; `display` is the
/// slow call that moves the framebuffer to the glass. It is not retried
/// internally.
#[allow(async_fn_in_trait)]
pub trait Panel {
    /// Error type of the underlying driver
    type Error;

    /// Clear the whole framebuffer to `color`
    fn fill(&mut self, color: Color) -> Result<(), Self::Error>;

    /// Draw `text` with its top-left corner at logical pixel (`x`, `y`)
    ///
    /// `size` is an integer scale factor for the bitmap font (1 = native).
    fn text(&mut self, text: &str, x: i32, y: i32, color: Color, size: u8)
        -> Result<(), Self::Error>;

    /// Push the framebuffer to the panel and refresh it
    async fn display(&mut self) -> Result<(), Self::Error>;
}

/// Tri-color e-paper controller
///
/// Receives the two packed bit planes of a full frame and performs a
/// complete refresh cycle (power up, write, refresh, power down).
#[allow(async_fn_in_trait)]
pub trait EpdDriver {
    /// Bus or pin error
    type Error;

    /// Write both planes and refresh the panel
    async fn update(&mut self, black: &[u8], red: &[u8]) -> Result<(), Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_roundtrip() {
        for turns in 0..4 {
            let rotation = Rotation::from_quarter_turns(turns).unwrap();
            assert_eq!(rotation.quarter_turns(), turns);
        }
        assert_eq!(Rotation::from_quarter_turns(4), None);
    }

    #[test]
    fn test_rotation_axes() {
        assert!(!Rotation::Rotate0.swaps_axes());
        assert!(Rotation::Rotate90.swaps_axes());
        assert!(!Rotation::Rotate180.swaps_axes());
        assert!(Rotation::Rotate270.swaps_axes());
    }
}
