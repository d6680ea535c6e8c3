// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Canopy Text: label measurement and box sizing.
//!
//! Node boxes have a fixed width but a content-dependent height: a label is
//! greedily packed onto lines against a maximum line width, and the box grows
//! with the line count. Measurement is behind the [`TextMeasure`] trait so a
//! host with real font metrics can plug them in; [`CellMeasure`] is the
//! built-in approximation based on Unicode cell widths.
//!
//! The wrap rule, precisely: words are appended to the current line; when the
//! measured line exceeds the maximum width *and the line holds more than one
//! word*, the last word is moved to a fresh line. A single word wider than
//! the maximum is therefore never split.
//!
//! ```
//! use canopy_text::{CellMeasure, FontSpec, wrap_label};
//!
//! let measure = CellMeasure::default();
//! let font = FontSpec::for_depth(1);
//! let lines = wrap_label("acute respiratory distress", 60.0, font, &measure);
//! assert!(lines.len() > 1);
//! ```

use smallvec::SmallVec;
use unicode_width::UnicodeWidthStr;

/// Wrapped lines for one label. Labels rarely exceed a handful of lines.
pub type Lines = SmallVec<[String; 4]>;

/// Measures rendered text width in layout units.
pub trait TextMeasure {
    /// Width of `text` when rendered at `font_px` pixels.
    fn text_width(&self, text: &str, font_px: f64) -> f64;
}

/// Cell-width approximation of rendered text width.
///
/// Counts Unicode cells (CJK counts double) and multiplies by a per-pixel
/// advance factor. Close enough to proportional-font reality for layout
/// purposes; hosts with a canvas or font stack should supply their own
/// [`TextMeasure`].
#[derive(Clone, Copy, Debug)]
pub struct CellMeasure {
    /// Horizontal advance per cell, as a fraction of the font size.
    pub advance: f64,
}

impl Default for CellMeasure {
    fn default() -> Self {
        Self { advance: 0.6 }
    }
}

impl TextMeasure for CellMeasure {
    fn text_width(&self, text: &str, font_px: f64) -> f64 {
        text.width() as f64 * font_px * self.advance
    }
}

/// Font weight. Presentation-only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FontWeight {
    /// Regular weight.
    Normal,
    /// Bold, used for the root label.
    Bold,
}

/// Font size and weight for a node label.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontSpec {
    /// Font size in pixels.
    pub px: f64,
    /// Weight.
    pub weight: FontWeight,
}

impl FontSpec {
    /// The per-depth presentation rule: the root is heaviest and largest,
    /// first-level branches medium, everything deeper smallest.
    pub fn for_depth(depth: usize) -> Self {
        match depth {
            0 => Self {
                px: 12.0,
                weight: FontWeight::Bold,
            },
            1 => Self {
                px: 11.0,
                weight: FontWeight::Normal,
            },
            _ => Self {
                px: 10.0,
                weight: FontWeight::Normal,
            },
        }
    }

    /// Line height for this font.
    pub fn line_height(&self) -> f64 {
        self.px * LINE_HEIGHT_FACTOR
    }
}

/// Line height as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.1;

/// Greedily pack the label's words onto lines no wider than `max_width`.
///
/// An empty label yields a single empty line so the box still has content
/// height.
pub fn wrap_label(
    label: &str,
    max_width: f64,
    font: FontSpec,
    measure: &dyn TextMeasure,
) -> Lines {
    let mut lines = Lines::new();
    let mut line: Vec<&str> = Vec::new();

    for word in label.split_whitespace() {
        line.push(word);
        let joined = line.join(" ");
        if measure.text_width(&joined, font.px) > max_width && line.len() > 1 {
            line.pop();
            lines.push(line.join(" "));
            line = vec![word];
        }
    }
    lines.push(line.join(" "));
    lines
}

/// A label after wrapping, with the resulting box height.
#[derive(Clone, Debug)]
pub struct SizedLabel {
    /// The wrapped lines, in order.
    pub lines: Lines,
    /// Height of one line.
    pub line_height: f64,
    /// Total box height: content plus fixed padding.
    pub box_height: f64,
}

impl SizedLabel {
    /// Wrap and size a label for a box of the given text width.
    ///
    /// `padding` enters three times, matching the rendered box: once above,
    /// once below, and once between the text block and the box edge.
    pub fn new(
        label: &str,
        max_width: f64,
        padding: f64,
        font: FontSpec,
        measure: &dyn TextMeasure,
    ) -> Self {
        let lines = wrap_label(label, max_width, font, measure);
        let line_height = font.line_height();
        let content_height = lines.len() as f64 * line_height;
        Self {
            lines,
            line_height,
            box_height: content_height + padding * 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FONT: FontSpec = FontSpec {
        px: 10.0,
        weight: FontWeight::Normal,
    };

    // With CellMeasure { advance: 0.6 } at 10px, one cell is 6.0 wide.
    fn measure() -> CellMeasure {
        CellMeasure::default()
    }

    #[test]
    fn short_label_stays_on_one_line() {
        let lines = wrap_label("Flu", 90.0, FONT, &measure());
        assert_eq!(lines.as_slice(), ["Flu"]);
    }

    #[test]
    fn exact_fit_does_not_wrap_but_one_more_word_does() {
        // "aa bb" is 5 cells = 30.0 wide: exactly the max.
        let lines = wrap_label("aa bb", 30.0, FONT, &measure());
        assert_eq!(lines.as_slice(), ["aa bb"]);

        // One more word exceeds the max and forces a second line.
        let lines = wrap_label("aa bb cc", 30.0, FONT, &measure());
        assert_eq!(lines.as_slice(), ["aa bb", "cc"]);
    }

    #[test]
    fn overlong_single_word_is_never_split() {
        let lines = wrap_label("pneumonoultramicroscopic", 30.0, FONT, &measure());
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], "pneumonoultramicroscopic");

        // Even mid-label: the long word gets its own line, unsplit.
        let lines = wrap_label("x pneumonoultramicroscopic y", 30.0, FONT, &measure());
        assert!(lines.iter().any(|l| l == "pneumonoultramicroscopic"));
    }

    #[test]
    fn empty_label_yields_one_empty_line() {
        let lines = wrap_label("", 30.0, FONT, &measure());
        assert_eq!(lines.as_slice(), [""]);
    }

    #[test]
    fn whitespace_runs_collapse() {
        let lines = wrap_label("  a   b  ", 90.0, FONT, &measure());
        assert_eq!(lines.as_slice(), ["a b"]);
    }

    #[test]
    fn sized_label_height_tracks_line_count() {
        let one = SizedLabel::new("aa", 30.0, 5.0, FONT, &measure());
        let two = SizedLabel::new("aa bb cc", 30.0, 5.0, FONT, &measure());
        assert_eq!(one.lines.len(), 1);
        assert_eq!(two.lines.len(), 2);
        assert!((one.box_height - (11.0 + 15.0)).abs() < 1e-9);
        assert!((two.box_height - (22.0 + 15.0)).abs() < 1e-9);
    }

    #[test]
    fn depth_fonts_match_the_presentation_rule() {
        assert_eq!(FontSpec::for_depth(0).px, 12.0);
        assert_eq!(FontSpec::for_depth(0).weight, FontWeight::Bold);
        assert_eq!(FontSpec::for_depth(1).px, 11.0);
        assert_eq!(FontSpec::for_depth(2).px, 10.0);
        assert_eq!(FontSpec::for_depth(7).px, 10.0);
    }

    #[test]
    fn cjk_counts_double_width() {
        let m = measure();
        assert!(m.text_width("漢漢", 10.0) > m.text_width("aa", 10.0));
    }
}
