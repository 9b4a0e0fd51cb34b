//! LED strip abstraction and the flip-display adapter.

use crate::colors::Rgb8;
use crate::config::{FADE_OUT_STEP, NUM_TRAILING_SEPARATOR_LEDS};

/// Trait for abstracting the addressable LED strip.
///
/// Implement this for your strip driver (NeoPixel bit-banging, PIO, SPI,
/// etc.). Pixel writes only touch the driver's buffer; nothing reaches the
/// LEDs until [`show`](Self::show) is called, and the clock calls it exactly
/// once per frame.
pub trait LedStrip {
    /// Writes one pixel into the frame buffer.
    fn set_pixel_color(&mut self, index: usize, color: Rgb8);

    /// Sets the global brightness applied by the driver on flush.
    fn set_brightness(&mut self, brightness: u8);

    /// Flushes the frame buffer to the physical LEDs.
    fn show(&mut self);

    /// Number of pixels on the strip.
    fn num_pixels(&self) -> usize;
}

/// Wraps a strip and mirrors the digit area when the display is mounted
/// upside down.
///
/// The trailing separator LEDs sit outside the mirrored range and always
/// keep their physical index.
pub struct FlippableStrip<S: LedStrip> {
    inner: S,
    flipped: bool,
}

impl<S: LedStrip> FlippableStrip<S> {
    pub fn new(inner: S, flipped: bool) -> Self {
        Self { inner, flipped }
    }

    pub fn set_flipped(&mut self, flipped: bool) {
        self.flipped = flipped;
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Ramps global brightness from `current` down to zero, one flush per step.
    pub fn fade_to_off(&mut self, current: u8) {
        let mut brightness = current;
        while brightness > 0 {
            self.inner.set_brightness(brightness);
            self.inner.show();
            brightness = brightness.saturating_sub(FADE_OUT_STEP);
        }
        self.inner.set_brightness(0);
        self.inner.show();
    }

    /// Restores global brightness and flushes.
    pub fn set_to_brightness(&mut self, brightness: u8) {
        self.inner.set_brightness(brightness);
        self.inner.show();
    }

    /// Index of the last pixel inside the mirrored range.
    fn last_mirrored(&self) -> Option<usize> {
        self.inner
            .num_pixels()
            .checked_sub(1 + NUM_TRAILING_SEPARATOR_LEDS)
    }

    fn map_index(&self, index: usize) -> usize {
        match self.last_mirrored() {
            Some(last) if self.flipped && index <= last => last - index,
            _ => index,
        }
    }
}

impl<S: LedStrip> LedStrip for FlippableStrip<S> {
    fn set_pixel_color(&mut self, index: usize, color: Rgb8) {
        if index >= self.inner.num_pixels() {
            return;
        }
        let mapped = self.map_index(index);
        self.inner.set_pixel_color(mapped, color);
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.inner.set_brightness(brightness);
    }

    fn show(&mut self) {
        self.inner.show();
    }

    fn num_pixels(&self) -> usize {
        self.inner.num_pixels()
    }
}
