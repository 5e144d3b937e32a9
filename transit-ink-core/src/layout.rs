//! Line layout
//!
//! Turns the fetched list of strings into positioned [`DisplayLine`]s.
//! Lines come in pairs (a heading and its detail): the cursor moves 20 px
//! after an even line and 40 px after an odd one, which leaves a gap between
//! pairs. With the default scale of 2 the 5x8 font is 16 px tall.
//!
//! ```text
//! y=10   Richmond             <- line 0
//! y=30   5, 20, 35 min        <- line 1
//! y=70   Millbrae             <- line 2
//! y=90   12 min               <- line 3
//! ```

use crate::traits::Color;

/// Left margin of every line
pub const LINE_X: i32 = 10;

/// Vertical position of the first line
pub const FIRST_LINE_Y: i32 = 10;

/// Cursor advance after an even-indexed line
pub const EVEN_LINE_STEP: i32 = 20;

/// Cursor advance after an odd-indexed line
pub const ODD_LINE_STEP: i32 = 40;

/// Font scale factor used for every line
pub const LINE_FONT_SCALE: u8 = 2;

/// Color policy for drawn lines
///
/// The deployed board draws every line in the highlight color. A black/red
/// alternation by line parity was computed but never applied, so it is only
/// available as an explicit opt-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineColors {
    /// Every line red
    #[default]
    Highlight,
    /// Even lines black, odd lines red
    Alternating,
}

impl LineColors {
    /// Color for the line at `index`
    pub const fn color_for(&self, index: usize) -> Color {
        match self {
            LineColors::Highlight => Color::Red,
            LineColors::Alternating => {
                if index % 2 == 0 {
                    Color::Black
                } else {
                    Color::Red
                }
            }
        }
    }
}

/// A positioned line, ready to hand to [`Panel::text`](crate::traits::Panel::text)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayLine<'a> {
    pub text: &'a str,
    pub x: i32,
    pub y: i32,
    pub color: Color,
    pub size: u8,
}

/// Vertical cursor for one render pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderState {
    padding: i32,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderState {
    /// Start at the top of the panel
    pub const fn new() -> Self {
        Self {
            padding: FIRST_LINE_Y,
        }
    }

    /// Current vertical position
    pub const fn padding(&self) -> i32 {
        self.padding
    }

    /// Advance past the line at `index`
    pub fn advance(&mut self, index: usize) {
        self.padding += if index % 2 == 0 {
            EVEN_LINE_STEP
        } else {
            ODD_LINE_STEP
        };
    }
}

/// Iterator adapter producing [`DisplayLine`]s
pub struct Layout<I> {
    lines: I,
    index: usize,
    state: RenderState,
    colors: LineColors,
}

impl<'a, I> Iterator for Layout<I>
where
    I: Iterator<Item = &'a str>,
{
    type Item = DisplayLine<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.lines.next()?;
        let line = DisplayLine {
            text,
            x: LINE_X,
            y: self.state.padding(),
            color: self.colors.color_for(self.index),
            size: LINE_FONT_SCALE,
        };
        self.state.advance(self.index);
        self.index += 1;
        Some(line)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.lines.size_hint()
    }
}

/// Lay out `lines` top to bottom
pub fn layout<'a, I>(lines: I, colors: LineColors) -> Layout<I::IntoIter>
where
    I: IntoIterator<Item = &'a str>,
{
    Layout {
        lines: lines.into_iter(),
        index: 0,
        state: RenderState::new(),
        colors,
    }
}

/// Vertical position of the line at `index`, without iterating
pub const fn line_y(index: usize) -> i32 {
    let pairs = (index / 2) as i32;
    let odd = (index % 2) as i32;
    FIRST_LINE_Y + pairs * (EVEN_LINE_STEP + ODD_LINE_STEP) + odd * EVEN_LINE_STEP
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_offsets_sequence() {
        let lines = ["a", "b", "c", "d", "e", "f"];
        let ys: Vec<i32> = layout(lines, LineColors::Highlight).map(|l| l.y).collect();
        assert_eq!(ys, vec![10, 30, 70, 90, 130, 150]);
    }

    #[test]
    fn test_fixed_x_and_scale() {
        for line in layout(["x", "y", "z"], LineColors::Highlight) {
            assert_eq!(line.x, LINE_X);
            assert_eq!(line.size, LINE_FONT_SCALE);
        }
    }

    #[test]
    fn test_highlight_draws_everything_red() {
        let colors: Vec<Color> = layout(["a", "b", "c", "d"], LineColors::Highlight)
            .map(|l| l.color)
            .collect();
        assert_eq!(colors, vec![Color::Red; 4]);
    }

    #[test]
    fn test_alternating_colors() {
        let colors: Vec<Color> = layout(["a", "b", "c"], LineColors::Alternating)
            .map(|l| l.color)
            .collect();
        assert_eq!(colors, vec![Color::Black, Color::Red, Color::Black]);
    }

    #[test]
    fn test_empty_layout() {
        let lines: [&str; 0] = [];
        assert_eq!(layout(lines, LineColors::Highlight).count(), 0);
    }

    #[test]
    fn test_render_state_steps() {
        let mut state = RenderState::new();
        assert_eq!(state.padding(), 10);
        state.advance(0);
        assert_eq!(state.padding(), 30);
        state.advance(1);
        assert_eq!(state.padding(), 70);
    }

    proptest! {
        #[test]
        fn prop_layout_matches_closed_form(count in 0usize..64) {
            let texts: Vec<String> = (0..count).map(|i| format!("line {}", i)).collect();
            let laid_out: Vec<DisplayLine> =
                layout(texts.iter().map(String::as_str), LineColors::Highlight).collect();

            prop_assert_eq!(laid_out.len(), count);
            for (i, line) in laid_out.iter().enumerate() {
                prop_assert_eq!(line.y, line_y(i));
                prop_assert_eq!(line.text, texts[i].as_str());
            }
        }
    }
}
