#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`Clock`**: Frame loop tying buttons, settings, the RTC and the display together
//! - **`DigitManager`**: Owns the six cell renderers and the active `Animator`
//! - **`Animator`**: Decides each cell's color, brightness and numeral per frame, including the cross-fade when a digit changes
//! - **`Effect`**: The selectable color animations (static, cycle-all, glow, breathe, flow, rainbow, zippy)
//! - **`Digit`**: Paints one numeral into a 20-LED cell, edge-lit or as a pixel bitmap
//! - **`ButtonBank`**: Debounced buttons and multi-pin combinations with press delay and repeat
//! - **`Settings`**: The persisted settings block
//! - **`LedStrip`**, **`Rtc`**, **`SettingsStore`**, **`PinReader`**, **`TimeSource`**: Traits to implement for your hardware
//!
//! Colors are `Srgb<u8>` (re-exported as [`Rgb8`]). Brightness scaling is
//! done per cell before writing to the strip; the strip's own global
//! brightness is set separately.

// Re-export Srgb from palette for user convenience
pub use palette::Srgb;

pub mod animator;
pub mod button;
pub mod clock;
pub mod colors;
pub mod command;
pub mod config;
pub mod digit;
pub mod digit_manager;
pub mod effect;
pub mod rtc;
pub mod separators;
pub mod settings;
pub mod strip;
pub mod time;
pub mod types;

pub use animator::{Animator, AnimatorConfig, CellFrame, CellPlan};
pub use button::{
    Button, ButtonBank, ButtonConfig, ButtonError, ButtonEvent, ButtonEventKind, PinReader,
};
pub use clock::{ButtonId, Clock, ClockMode};
pub use colors::{OFF, Rgb8, color_wheel, scale_brightness};
pub use command::{Command, CommandDecoder, CommandError};
pub use digit::Digit;
pub use digit_manager::DigitManager;
pub use effect::Effect;
pub use rtc::{Rtc, TimeOfDay};
pub use settings::{SettingId, Settings, SettingsError, SettingsStore};
pub use strip::{FlippableStrip, LedStrip};
pub use time::{ElapsedTime, TimeSource};
pub use types::{Animation, Cadence, DigitStyle, FrameTiming, INVALID, Numbers, TransitionStyle};
