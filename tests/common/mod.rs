//! Shared test infrastructure for foxie-clock integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use foxie_clock::config::NUM_PIXELS;
use foxie_clock::{
    LedStrip, OFF, PinReader, Rgb8, Rtc, SettingsError, SettingsStore, TimeSource,
};
use foxie_clock::settings::SettingsBlock;

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock millisecond counter with controllable advancement
pub struct MockTimeSource {
    now: Cell<u32>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self { now: Cell::new(0) }
    }

    pub fn starting_at(ms: u32) -> Self {
        Self { now: Cell::new(ms) }
    }

    /// Advance time by `ms`, wrapping like the hardware counter
    pub fn advance(&self, ms: u32) {
        self.now.set(self.now.get().wrapping_add(ms));
    }

    pub fn set_time(&self, ms: u32) {
        self.now.set(ms);
    }
}

impl TimeSource for MockTimeSource {
    fn millis(&self) -> u32 {
        self.now.get()
    }
}

// ============================================================================
// Mock LED Strip
// ============================================================================

/// Mock strip that keeps a frame buffer and counts flushes
pub struct MockStrip {
    pub pixels: [Rgb8; NUM_PIXELS],
    pub brightness: u8,
    pub show_count: usize,
    pub brightness_history: heapless::Vec<u8, 128>,
}

impl MockStrip {
    pub fn new() -> Self {
        Self {
            pixels: [OFF; NUM_PIXELS],
            brightness: 0,
            show_count: 0,
            brightness_history: heapless::Vec::new(),
        }
    }

    pub fn pixel(&self, index: usize) -> Rgb8 {
        self.pixels[index]
    }

    /// Indices of every pixel that is not off within `range`
    pub fn lit(&self, range: core::ops::Range<usize>) -> heapless::Vec<usize, NUM_PIXELS> {
        range.filter(|&i| self.pixels[i] != OFF).collect()
    }
}

impl LedStrip for MockStrip {
    fn set_pixel_color(&mut self, index: usize, color: Rgb8) {
        if let Some(pixel) = self.pixels.get_mut(index) {
            *pixel = color;
        }
    }

    fn set_brightness(&mut self, brightness: u8) {
        self.brightness = brightness;
        let _ = self.brightness_history.push(brightness);
    }

    fn show(&mut self) {
        self.show_count += 1;
    }

    fn num_pixels(&self) -> usize {
        NUM_PIXELS
    }
}

// ============================================================================
// Mock Pins
// ============================================================================

/// Mock GPIO bank backed by a bitmask of asserted pins
pub struct MockPins {
    asserted: Cell<u32>,
}

impl MockPins {
    pub fn new() -> Self {
        Self {
            asserted: Cell::new(0),
        }
    }

    pub fn press(&self, pin: u8) {
        self.asserted.set(self.asserted.get() | (1 << pin));
    }

    pub fn release(&self, pin: u8) {
        self.asserted.set(self.asserted.get() & !(1 << pin));
    }

    pub fn release_all(&self) {
        self.asserted.set(0);
    }
}

impl PinReader for MockPins {
    fn is_asserted(&self, pin: u8) -> bool {
        self.asserted.get() & (1 << pin) != 0
    }
}

// ============================================================================
// Mock RTC
// ============================================================================

/// Mock RTC whose "chip" time is set directly by the test
pub struct MockRtc {
    pub chip: (u8, u8, u8),
    latched: (u8, u8, u8),
    pub date: Option<(u8, u8, u16)>,
    pub set_count: usize,
}

impl MockRtc {
    pub fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            chip: (hour, minute, second),
            latched: (hour, minute, second),
            date: None,
            set_count: 0,
        }
    }

    pub fn set_chip(&mut self, hour: u8, minute: u8, second: u8) {
        self.chip = (hour, minute, second);
    }
}

impl Rtc for MockRtc {
    fn update(&mut self) {
        self.latched = self.chip;
    }

    fn hour(&self) -> u8 {
        self.latched.0
    }

    fn minute(&self) -> u8 {
        self.latched.1
    }

    fn second(&self) -> u8 {
        self.latched.2
    }

    fn set_time(&mut self, hour: u8, minute: u8, second: u8) {
        self.chip = (hour, minute, second);
        self.latched = self.chip;
        self.set_count += 1;
    }

    fn set_date(&mut self, day: u8, month: u8, year: u16) {
        self.date = Some((day, month, year));
    }
}

// ============================================================================
// Mock Settings Store
// ============================================================================

/// Mock persistent store with injectable failures
pub struct MockStore {
    pub block: Option<SettingsBlock>,
    pub fail_load: bool,
    pub fail_save: bool,
    pub save_count: usize,
}

impl MockStore {
    /// A store that has never been written (erased flash)
    pub fn blank() -> Self {
        Self {
            block: Some([u32::MAX; 10]),
            fail_load: false,
            fail_save: false,
            save_count: 0,
        }
    }

    pub fn with_block(block: SettingsBlock) -> Self {
        Self {
            block: Some(block),
            ..Self::blank()
        }
    }
}

impl SettingsStore for MockStore {
    fn load(&mut self) -> Result<SettingsBlock, SettingsError> {
        if self.fail_load {
            return Err(SettingsError::ReadFailed);
        }
        self.block.ok_or(SettingsError::ReadFailed)
    }

    fn save(&mut self, block: &SettingsBlock) -> Result<(), SettingsError> {
        if self.fail_save {
            return Err(SettingsError::WriteFailed);
        }
        self.block = Some(*block);
        self.save_count += 1;
        Ok(())
    }
}

// ============================================================================
// Test Helper Functions
// ============================================================================

/// Compare two colors allowing for integer truncation
pub fn colors_close(a: Rgb8, b: Rgb8, tolerance: u8) -> bool {
    a.red.abs_diff(b.red) <= tolerance
        && a.green.abs_diff(b.green) <= tolerance
        && a.blue.abs_diff(b.blue) <= tolerance
}

/// Compare two brightness factors with floating-point tolerance
pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.001
}
