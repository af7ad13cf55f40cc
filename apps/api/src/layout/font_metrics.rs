//! Static font-metric tables for the PDF base-14 text families.
//!
//! Character widths are in em units (relative to font size), taken from the
//! Adobe AFM advance widths (1/1000 em) of the standard fonts. Because the
//! letter is rendered with the built-in fonts, these are exact for ASCII rather
//! than an approximation.
//!
//! All tables cover ASCII 0x20..=0x7E (95 printable characters).
//! Index = (char as usize) - 32.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Points per millimetre (72pt per inch, 25.4mm per inch).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// Text families available without embedding a font file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Times-Roman, the letter body face.
    Times,
    Helvetica,
    /// Courier: every glyph is 0.6em.
    Courier,
}

impl fmt::Display for FontFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontFamily::Times => f.write_str("times"),
            FontFamily::Helvetica => f.write_str("helvetica"),
            FontFamily::Courier => f.write_str("courier"),
        }
    }
}

impl FromStr for FontFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "times" | "times-roman" => Ok(FontFamily::Times),
            "helvetica" => Ok(FontFamily::Helvetica),
            "courier" => Ok(FontFamily::Courier),
            other => Err(format!(
                "unknown font family '{other}' (expected 'times', 'helvetica' or 'courier')"
            )),
        }
    }
}

/// Whether the built-in fonts can draw `c`.
///
/// The base-14 fonts are written with WinAnsiEncoding. Printable ASCII and the
/// Latin-1 block U+00A0..=U+00FF map one-to-one onto it; anything else has no
/// byte and would be dropped from the content stream.
pub fn is_winansi(c: char) -> bool {
    matches!(c, ' '..='~' | '\u{00A0}'..='\u{00FF}')
}

// ────────────────────────────────────────────────────────────────────────────
// Page configuration
// ────────────────────────────────────────────────────────────────────────────

/// Geometry of one letter page.
///
/// Dimensions are in millimetres, the font size in points. The printable width
/// is the paper width minus both side margins; text never runs into the bottom
/// break margin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    pub font: FontFamily,
    pub font_size_pt: f32,
    pub paper_width_mm: f32,
    pub paper_height_mm: f32,
    /// Left and right margin.
    pub margin_side_mm: f32,
    pub margin_top_mm: f32,
    /// Distance from the bottom edge at which a new page is started.
    pub margin_bottom_mm: f32,
    /// Vertical advance of one line (and of one blank paragraph).
    pub line_height_mm: f32,
}

/// Returns the default page config for the given font family.
///
/// A4 portrait, 10mm side and top margins, 20mm bottom break, 11pt type on a 5mm line.
pub fn default_page_config(font: FontFamily) -> PageConfig {
    PageConfig {
        font,
        font_size_pt: 11.0,
        paper_width_mm: 210.0,
        paper_height_mm: 297.0,
        margin_side_mm: 10.0,
        margin_top_mm: 10.0,
        margin_bottom_mm: 20.0,
        line_height_mm: 5.0,
    }
}

impl PageConfig {
    pub fn printable_width_mm(&self) -> f32 {
        self.paper_width_mm - 2.0 * self.margin_side_mm
    }

    pub fn text_width_pt(&self) -> f32 {
        self.printable_width_mm() * PT_PER_MM
    }

    /// Usable text width in em units at the configured font size.
    /// A4 with 10mm margins at 11pt: 190mm ≈ 538.6pt ≈ 48.96em.
    pub fn text_width_em(&self) -> f32 {
        self.text_width_pt() / self.font_size_pt
    }

    /// Number of line slots between the top margin and the bottom break margin.
    pub fn lines_per_page(&self) -> usize {
        let usable = self.paper_height_mm - self.margin_top_mm - self.margin_bottom_mm;
        ((usable / self.line_height_mm).floor() as usize).max(1)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// `widths[i]` = width of ASCII character `(i + 32)` in em.
pub struct FontMetricTable {
    widths: [f32; 95],
    /// Fallback width for characters outside printable ASCII.
    pub average_char_width: f32,
}

impl FontMetricTable {
    /// Measures the rendered width of a string in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    /// Measures the rendered width of a string in points at `font_size_pt`.
    pub fn measure_pt(&self, s: &str, font_size_pt: f32) -> f32 {
        self.measure_str(s) * font_size_pt
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Static width tables  (95 ASCII printable characters each)
// ────────────────────────────────────────────────────────────────────────────

static TIMES_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.46,
};

static HELVETICA_TABLE: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.52,
};

static COURIER_TABLE: FontMetricTable = FontMetricTable {
    widths: [0.600; 95],
    average_char_width: 0.600,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Times => &TIMES_TABLE,
        FontFamily::Helvetica => &HELVETICA_TABLE,
        FontFamily::Courier => &COURIER_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
