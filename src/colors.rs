//! Hue wheel and brightness helpers.
//!
//! Both functions are pure integer/float arithmetic on `Srgb<u8>` so their
//! output is bit-reproducible across targets.

use palette::Srgb;

/// 8-bit RGB color as written to the strip.
pub type Rgb8 = Srgb<u8>;

/// Color of an unlit pixel.
pub const OFF: Rgb8 = Srgb::new(0, 0, 0);

/// Maps a hue byte onto a full-saturation color wheel.
///
/// The wheel runs red → blue → green → red with a period of 256; neighbouring
/// positions never differ by more than 3 in any channel.
pub fn color_wheel(hue: u8) -> Rgb8 {
    let mut pos = 255 - hue;
    if pos < 85 {
        return Srgb::new(255 - pos * 3, 0, pos * 3);
    }

    if pos < 170 {
        pos -= 85;
        return Srgb::new(0, pos * 3, 255 - pos * 3);
    }

    pos -= 170;
    Srgb::new(pos * 3, 255 - pos * 3, 0)
}

/// Scales each channel by `factor`, truncating toward zero.
///
/// Factors outside `0.0..=1.0` are clamped so the result always fits a byte.
pub fn scale_brightness(color: Rgb8, factor: f32) -> Rgb8 {
    let factor = if factor.is_nan() { 0.0 } else { factor.clamp(0.0, 1.0) };
    Srgb::new(
        scale_channel(color.red, factor),
        scale_channel(color.green, factor),
        scale_channel(color.blue, factor),
    )
}

#[inline]
fn scale_channel(channel: u8, factor: f32) -> u8 {
    (channel as f32 * factor) as u8
}
