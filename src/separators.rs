//! Blinking separators between the hour, minute and second fields.

use crate::colors::{OFF, Rgb8};
use crate::config::{EDGE_LIT_SEPARATOR_LEDS, PIXEL_SEPARATOR_LEDS};
use crate::strip::LedStrip;
use crate::types::DigitStyle;

/// LEDs used as separators for `style`.
pub fn separator_leds(style: DigitStyle) -> &'static [usize] {
    match style {
        DigitStyle::EdgeLit => &EDGE_LIT_SEPARATOR_LEDS,
        DigitStyle::Pixels => &PIXEL_SEPARATOR_LEDS,
    }
}

/// Paints the separators for this second.
///
/// They are lit in `color` on odd seconds while `enabled`, dark otherwise.
/// Must run after the digits so a cell redraw cannot clear them.
pub fn update<S: LedStrip>(
    strip: &mut S,
    style: DigitStyle,
    enabled: bool,
    second: u8,
    color: Rgb8,
) {
    let lit = enabled && second % 2 != 0;
    let color = if lit { color } else { OFF };
    for led in separator_leds(style) {
        strip.set_pixel_color(*led, color);
    }
}

/// Turns off the separator LEDs of every style.
pub fn clear_all<S: LedStrip>(strip: &mut S) {
    for led in EDGE_LIT_SEPARATOR_LEDS.iter().chain(PIXEL_SEPARATOR_LEDS.iter()) {
        strip.set_pixel_color(*led, OFF);
    }
}
