//! Compile-time configuration: pixel layout, timing and button policy.
//!
//! Everything tunable about the board lives here so the rest of the crate
//! can stay free of magic numbers.

// Pixel layout

/// Number of character cells on the display.
pub const NUM_DIGITS: usize = 6;

/// LEDs owned by one character cell.
pub const LEDS_PER_DIGIT: usize = 20;

/// First LED of each cell, left to right.
///
/// These are one less than the `D###` markings on the PCB silkscreen,
/// i.e. "D1" on the board is LED 0.
pub const DIGIT_ORIGINS: [usize; NUM_DIGITS] = [0, 20, 40, 60, 80, 100];

/// Separator LEDs chained after the last cell.
pub const NUM_TRAILING_SEPARATOR_LEDS: usize = 2;

/// Total pixels on the strip.
pub const NUM_PIXELS: usize = NUM_DIGITS * LEDS_PER_DIGIT + NUM_TRAILING_SEPARATOR_LEDS;

/// Separator LEDs for edge-lit digits, between rows 2/3 and 4/5.
pub const EDGE_LIT_SEPARATOR_LEDS: [usize; 2] = [120, 121];

/// Separator LEDs for pixel digits, taken from unused spots in rows 2 and 4.
pub const PIXEL_SEPARATOR_LEDS: [usize; 4] = [25, 33, 65, 73];

// Timing (milliseconds)

/// Stable-reading interval before a pin change is accepted.
pub const DEBOUNCE_MS: u32 = 10;

/// Cross-fade window after a second rolls over.
pub const TRANSITION_WINDOW_MS: u32 = 400;

/// A second that lasts longer than this is treated as a stalled RTC.
pub const MALFUNCTION_GUARD_MS: u32 = 1057;

/// How long a transient value stays on screen.
pub const TRANSIENT_DISPLAY_MS: u32 = 1000;

/// Period between brightness steps of the breathing effects.
pub const BREATHE_STEP_MS: u32 = 25;

/// Nominal length of a wall-clock second.
pub const SECOND_MS: u32 = 1000;

// Effect tuning

/// Hue advance per second for the cycle-all effect.
pub const CYCLE_HUE_STEP: u8 = 16;

/// Hue advance per rotation for the flow-left effect.
pub const FLOW_HUE_STEP: u8 = 6;

/// Per-frame hue advance for the rainbow effect.
pub const RAINBOW_HUE_STEP: u8 = 1;

/// Initial hue spacing between neighbouring cells in the rainbow effect.
pub const RAINBOW_HUE_SPREAD: u8 = 42;

/// Brightness change per breathing step.
pub const BREATHE_BRIGHTNESS_STEP: f32 = 0.02;

/// Lowest brightness of the gentle glow effect.
pub const GLOW_FLOOR: f32 = 0.4;

/// Lowest brightness of the deep breathe effect.
pub const BREATHE_FLOOR: f32 = 0.2;

/// Hue offset applied while a transient value is shown.
pub const TRANSIENT_HUE_SHIFT: u8 = 128;

/// Hue of the hour and minute fields in set-time mode.
pub const SET_TIME_FIELD_HUE: u8 = 0;

/// Hue of the seconds field in set-time mode.
pub const SET_TIME_SECONDS_HUE: u8 = 170;

// Button policy

/// Pin of the color button.
pub const PIN_COLOR: u8 = 0;

/// Pin of the brightness button.
pub const PIN_BRIGHTNESS: u8 = 1;

/// Pin of the mode button.
pub const PIN_MODE: u8 = 2;

/// Grace period for single-pin buttons.
pub const SINGLE_PRESS_DELAY_MS: u32 = 120;

/// Grace period for two-pin combinations.
pub const PAIR_PRESS_DELAY_MS: u32 = 60;

/// Interval between repeats while a button is held.
pub const REPEAT_RATE_MS: u32 = 200;

/// Hold time before the first repeat.
pub const DELAY_BEFORE_REPEAT_MS: u32 = 500;

/// Hue advance per color button event.
pub const HUE_BUTTON_STEP: u8 = 8;

/// Global brightness change per brightness button event.
pub const BRIGHTNESS_BUTTON_STEP: u32 = 16;

/// Global brightness decrement per flush while fading to off.
pub const FADE_OUT_STEP: u8 = 3;

// Settings defaults

pub const DEFAULT_CUR_BRIGHTNESS: u32 = 64;
pub const DEFAULT_MIN_BRIGHTNESS: u32 = 4;
pub const DEFAULT_MAX_BRIGHTNESS: u32 = 192;
pub const DEFAULT_HUE: u32 = 192;
