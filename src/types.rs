//! Core value types shared by the renderer, animator and clock.

use crate::config::NUM_DIGITS;

/// Numeral value meaning "blank this cell".
pub const INVALID: u8 = 0xFF;

/// One numeral per character cell, left to right.
///
/// Each entry is `0..=9` or [`INVALID`]. Anything else is rendered blank.
pub type Numbers = [u8; NUM_DIGITS];

/// Six blank cells.
pub const BLANK_NUMBERS: Numbers = [INVALID; NUM_DIGITS];

/// Returns `Some(n)` for a drawable numeral, `None` for blank or garbage.
#[inline]
pub fn numeral(value: u8) -> Option<u8> {
    (value <= 9).then_some(value)
}

/// Physical construction of the character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DigitStyle {
    /// Stacked acrylic numerals, two LEDs per row.
    EdgeLit,

    /// A 20-LED bitmap per cell.
    Pixels,
}

impl DigitStyle {
    /// Setting value for this style.
    pub const fn id(self) -> u32 {
        match self {
            DigitStyle::EdgeLit => 1,
            DigitStyle::Pixels => 2,
        }
    }

    /// Parses a stored setting value.
    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            1 => Some(DigitStyle::EdgeLit),
            2 => Some(DigitStyle::Pixels),
            _ => None,
        }
    }

    /// Whether a newly appearing numeral should ramp up during a cross-fade.
    ///
    /// Pixel numerals look muddy while half lit, so they appear at full
    /// brightness immediately and only the old numeral fades.
    pub const fn fades_in(self) -> bool {
        matches!(self, DigitStyle::EdgeLit)
    }
}

/// Visual effect driving the digit colors.
///
/// The first seven variants are user selectable and persisted by id;
/// `Transient` and `SetTime` are only ever installed by the clock itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Animation {
    /// Every digit shows the configured hue.
    Static,

    /// All digits step through the wheel once per second.
    CycleAll,

    /// Gentle brightness oscillation.
    Glow,

    /// Deep brightness oscillation.
    Breathe,

    /// Colors flow from right to left every ten seconds.
    FlowLeft,

    /// Each digit cycles its own hue continuously.
    Rainbow,

    /// Changed digits count rapidly up to their new value.
    Zippy,

    /// Short-lived informational value.
    Transient,

    /// Time adjustment display.
    SetTime,
}

impl Animation {
    /// Effects reachable through settings and the mode button, in order.
    pub const SELECTABLE: [Animation; 7] = [
        Animation::Static,
        Animation::CycleAll,
        Animation::Glow,
        Animation::Breathe,
        Animation::FlowLeft,
        Animation::Rainbow,
        Animation::Zippy,
    ];

    /// Setting value for a selectable effect.
    pub fn id(self) -> Option<u32> {
        Self::SELECTABLE
            .iter()
            .position(|a| *a == self)
            .map(|i| i as u32)
    }

    /// Parses a stored setting value; internal effects are never returned.
    pub fn from_id(id: u32) -> Option<Self> {
        Self::SELECTABLE.get(id as usize).copied()
    }

    /// Next selectable effect, wrapping around.
    pub fn next(self) -> Self {
        let id = self.id().map_or(0, |i| i as usize + 1);
        Self::SELECTABLE[id % Self::SELECTABLE.len()]
    }

    pub fn is_selectable(self) -> bool {
        self.id().is_some()
    }
}

/// How a changed digit replaces the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransitionStyle {
    /// Old numeral fades out while the new one fades in.
    CrossFade,

    /// New numeral appears immediately.
    Cut,
}

impl TransitionStyle {
    pub const fn id(self) -> u32 {
        match self {
            TransitionStyle::CrossFade => 0,
            TransitionStyle::Cut => 1,
        }
    }

    pub const fn from_id(id: u32) -> Option<Self> {
        match id {
            0 => Some(TransitionStyle::CrossFade),
            1 => Some(TransitionStyle::Cut),
            _ => None,
        }
    }
}

/// Redraw cadence an effect needs from the frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cadence {
    /// Output changes between seconds; render every frame.
    PerFrame,

    /// Output only changes on second rollover (plus any cross-fade).
    PerSecond,
}

/// When the frame loop should run next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameTiming {
    /// Animation in progress. Run again at the desired frame rate.
    Continuous,

    /// Display is settled. Nothing changes for this many milliseconds
    /// unless a button or command arrives.
    Delay(u32),
}
