//! Per-cell numeral renderers.
//!
//! A [`Digit`] owns one fixed run of [`LEDS_PER_DIGIT`] pixels and knows how
//! to light a numeral on it in its current color and brightness. Color and
//! brightness are independent of the numeral; brightness scales each pixel
//! as it is written and never touches pixels already in the strip buffer.

use crate::colors::{OFF, Rgb8, scale_brightness};
use crate::config::LEDS_PER_DIGIT;
use crate::strip::LedStrip;
use crate::types::{DigitStyle, numeral};

/// Renders numerals into one character cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Digit {
    style: DigitStyle,
    first: usize,
    color: Rgb8,
    brightness: f32,
}

impl Digit {
    /// Creates a renderer for the cell starting at pixel `first`.
    pub fn new(style: DigitStyle, first: usize, color: Rgb8) -> Self {
        Self {
            style,
            first,
            color,
            brightness: 1.0,
        }
    }

    pub fn style(&self) -> DigitStyle {
        self.style
    }

    /// First pixel of the cell.
    pub fn first_led(&self) -> usize {
        self.first
    }

    pub fn set_color(&mut self, color: Rgb8) {
        self.color = color;
    }

    pub fn color(&self) -> Rgb8 {
        self.color
    }

    /// Sets the brightness used for subsequent pixel writes.
    ///
    /// Values above 1.0 (and NaN) are ignored and the previous brightness is
    /// kept; negative values clamp to 0. Returns whether the value was taken.
    pub fn set_brightness(&mut self, brightness: f32) -> bool {
        if brightness.is_nan() || brightness > 1.0 {
            return false;
        }
        self.brightness = brightness.max(0.0);
        true
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Clears the whole cell.
    pub fn all_off<S: LedStrip>(&self, strip: &mut S) {
        for i in 0..LEDS_PER_DIGIT {
            strip.set_pixel_color(self.first + i, OFF);
        }
    }

    /// Draws `value` after clearing the cell. Blank or malformed values leave
    /// the cell dark.
    pub fn display<S: LedStrip>(&self, strip: &mut S, value: u8) {
        match self.style {
            DigitStyle::EdgeLit => {
                self.all_off(strip);
                self.light(strip, value);
            }
            DigitStyle::Pixels => match numeral(value) {
                Some(n) => {
                    let on = self.lit_color();
                    for (i, bit) in PIXEL_NUMERALS[n as usize].iter().enumerate() {
                        let color = if *bit == 0 { OFF } else { on };
                        strip.set_pixel_color(self.first + i, color);
                    }
                }
                None => self.all_off(strip),
            },
        }
    }

    /// Draws only the lit pixels of `value`, leaving every other pixel in the
    /// cell as it is. Used to layer two numerals during a cross-fade.
    pub fn display_over<S: LedStrip>(&self, strip: &mut S, value: u8) {
        self.light(strip, value);
    }

    fn light<S: LedStrip>(&self, strip: &mut S, value: u8) {
        let Some(n) = numeral(value) else {
            return;
        };
        let color = self.lit_color();
        match self.style {
            DigitStyle::EdgeLit => {
                let [a, b] = edge_lit_leds(n);
                strip.set_pixel_color(self.first + a, color);
                strip.set_pixel_color(self.first + b, color);
            }
            DigitStyle::Pixels => {
                for (i, bit) in PIXEL_NUMERALS[n as usize].iter().enumerate() {
                    if *bit != 0 {
                        strip.set_pixel_color(self.first + i, color);
                    }
                }
            }
        }
    }

    fn lit_color(&self) -> Rgb8 {
        scale_brightness(self.color, self.brightness)
    }
}

/// Cell-relative LED pair that illuminates numeral `n` on an edge-lit cell.
///
/// Row 1 at the top of the cell holds the 9, row 10 at the bottom the 0.
pub fn edge_lit_leds(n: u8) -> [usize; 2] {
    let row = 10 - n as usize;
    [row * 2 - 2, row * 2 - 1]
}

/// Returns whether pixel `index` of the bitmap for `n` is lit.
pub fn pixel_is_lit(n: u8, index: usize) -> bool {
    numeral(n)
        .and_then(|n| PIXEL_NUMERALS[n as usize].get(index))
        .is_some_and(|bit| *bit != 0)
}

/// Bitmaps for the pixel cells. Each cell is a 10-row zig-zag of two LEDs;
/// the indentation mirrors the physical offset between alternate rows.
#[rustfmt::skip]
const PIXEL_NUMERALS: [[u8; LEDS_PER_DIGIT]; 10] = [
    // 0
    [
            1,      0,
        1,      1,
            0,      0,
        1,      1,
            0,      0,
        1,      1,
            0,      0,
        1,      1,
            1,      0,
        0,      0,
    ],
    // 1
    [
            1,      0,
        1,      0,
            1,      0,
        0,      0,
            1,      0,
        0,      0,
            1,      0,
        0,      0,
            1,      0,
        0,      0,
    ],
    // 2
    [
            1,      0,
        1,      1,
            0,      0,
        0,      1,
            1,      0,
        1,      0,
            0,      0,
        1,      1,
            0,      0,
        0,      0,
    ],
    // 3
    [
            1,      0,
        1,      1,
            0,      0,
        0,      1,
            1,      0,
        0,      1,
            0,      0,
        1,      1,
            1,      0,
        0,      0,
    ],
    // 4
    [
            0,      0,
        1,      1,
            0,      0,
        1,      1,
            1,      0,
        0,      1,
            0,      0,
        0,      1,
            0,      0,
        0,      1,
    ],
    // 5
    [
            0,      0,
        1,      1,
            0,      0,
        1,      0,
            1,      0,
        0,      1,
            0,      0,
        1,      1,
            1,      0,
        0,      0,
    ],
    // 6
    [
            1,      0,
        1,      0,
            0,      0,
        1,      0,
            1,      0,
        1,      1,
            0,      0,
        1,      1,
            1,      0,
        0,      0,
    ],
    // 7
    [
            1,      0,
        1,      1,
            0,      0,
        0,      1,
            0,      0,
        0,      1,
            0,      0,
        0,      1,
            0,      0,
        0,      1,
    ],
    // 8
    [
            1,      0,
        1,      1,
            0,      0,
        1,      1,
            1,      0,
        1,      1,
            0,      0,
        1,      1,
            1,      0,
        0,      0,
    ],
    // 9
    [
            1,      0,
        1,      1,
            0,      0,
        1,      1,
            1,      0,
        0,      1,
            0,      0,
        0,      1,
            1,      0,
        0,      0,
    ],
];
