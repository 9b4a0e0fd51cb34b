//! Debounced, polled buttons with repeat and combination support.
//!
//! Each [`Button`] watches one or more input pins and is considered pressed
//! only while *all* of them are asserted. Buttons are polled once per frame
//! and emit at most one [`ButtonEventKind`] per poll.
//!
//! Several logical buttons may share physical pins: a two-pin combination
//! and the two single-pin buttons underneath it. The combination is told
//! apart by giving the single-pin buttons a longer `delay_before_press`
//! grace period. A press that ends before its grace period is over is
//! dropped entirely, and the combination's handler disables the member
//! buttons once it fires (see [`ButtonBank::set_subsets_enabled`]).

use crate::config::{DEBOUNCE_MS, DELAY_BEFORE_REPEAT_MS, REPEAT_RATE_MS};
use crate::time::{ElapsedTime, TimeSource};
use heapless::{Deque, Vec};

/// Maximum number of pins in one combination.
pub const MAX_BUTTON_PINS: usize = 4;

/// Trait for abstracting GPIO input reads.
pub trait PinReader {
    /// Returns true when `pin` is in its active (pressed) level.
    ///
    /// Implementations handle pull-ups and active-low wiring.
    fn is_asserted(&self, pin: u8) -> bool;
}

/// Event emitted by a button poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonEventKind {
    /// The button has been held past debounce and its grace period.
    Press,

    /// The button is still held and the repeat interval passed.
    Repeat,

    /// A button that reported `Press` was let go.
    Release,
}

/// Event record tagged with the logical button it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonEvent<Id> {
    pub button: Id,
    pub kind: ButtonEventKind,
}

/// Timing policy for a button.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ButtonConfig {
    /// Emit `Repeat` while held.
    pub can_repeat: bool,

    /// Interval between repeats after the first.
    pub repeat_rate_ms: u32,

    /// Hold time between `Press` and the first `Repeat`.
    pub delay_before_repeat_ms: u32,

    /// Hold time after the debounced press before `Press` is emitted.
    pub delay_before_press_ms: u32,

    /// Stable-reading interval required to accept a pin change.
    pub debounce_ms: u32,
}

impl Default for ButtonConfig {
    fn default() -> Self {
        Self {
            can_repeat: false,
            repeat_rate_ms: REPEAT_RATE_MS,
            delay_before_repeat_ms: DELAY_BEFORE_REPEAT_MS,
            delay_before_press_ms: 0,
            debounce_ms: DEBOUNCE_MS,
        }
    }
}

impl ButtonConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repeat(mut self, can_repeat: bool) -> Self {
        self.can_repeat = can_repeat;
        self
    }

    pub fn repeat_rate_ms(mut self, ms: u32) -> Self {
        self.repeat_rate_ms = ms;
        self
    }

    pub fn delay_before_repeat_ms(mut self, ms: u32) -> Self {
        self.delay_before_repeat_ms = ms;
        self
    }

    pub fn delay_before_press_ms(mut self, ms: u32) -> Self {
        self.delay_before_press_ms = ms;
        self
    }

    pub fn debounce_ms(mut self, ms: u32) -> Self {
        self.debounce_ms = ms;
        self
    }
}

/// Button construction and bank errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonError {
    /// A button needs at least one pin.
    NoPins,

    /// More pins than [`MAX_BUTTON_PINS`].
    TooManyPins,

    /// A button with this id is already in the bank.
    DuplicateId,

    /// The bank cannot hold more buttons.
    BankFull,
}

impl core::fmt::Display for ButtonError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ButtonError::NoPins => write!(f, "button must have at least one pin"),
            ButtonError::TooManyPins => {
                write!(f, "button has more than {} pins", MAX_BUTTON_PINS)
            }
            ButtonError::DuplicateId => write!(f, "button id already in bank"),
            ButtonError::BankFull => write!(f, "button bank is full"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ButtonError {}

/// A debounced logical button over one or more pins.
#[derive(Debug, Clone)]
pub struct Button {
    pins: Vec<u8, MAX_BUTTON_PINS>,
    config: ButtonConfig,
    enabled: bool,
    /// Committed, debounced state.
    pressed: bool,
    /// Running debounce window, if a change is being confirmed.
    debounce: Option<ElapsedTime>,
    /// Time since the committed state last changed.
    state_timer: ElapsedTime,
    repeat_timer: ElapsedTime,
    press_reported: bool,
    repeats: u32,
    /// Set on re-enable; the pins must read released before anything fires.
    needs_release: bool,
}

impl Button {
    /// Creates a button that is pressed while every pin in `pins` is asserted.
    pub fn new(pins: &[u8], config: ButtonConfig) -> Result<Self, ButtonError> {
        if pins.is_empty() {
            return Err(ButtonError::NoPins);
        }
        let pins = Vec::from_slice(pins).map_err(|_| ButtonError::TooManyPins)?;
        Ok(Self::with_pins(pins, config))
    }

    /// Creates a single-pin button.
    pub fn single(pin: u8, config: ButtonConfig) -> Self {
        let mut pins = Vec::new();
        // Capacity is at least one.
        let _ = pins.push(pin);
        Self::with_pins(pins, config)
    }

    fn with_pins(pins: Vec<u8, MAX_BUTTON_PINS>, config: ButtonConfig) -> Self {
        Self {
            pins,
            config,
            enabled: true,
            pressed: false,
            debounce: None,
            state_timer: ElapsedTime::starting_at(0),
            repeat_timer: ElapsedTime::starting_at(0),
            press_reported: false,
            repeats: 0,
            needs_release: false,
        }
    }

    pub fn pins(&self) -> &[u8] {
        &self.pins
    }

    pub fn config(&self) -> &ButtonConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut ButtonConfig {
        &mut self.config
    }

    /// Committed state; always false while disabled.
    pub fn is_pressed(&self) -> bool {
        self.enabled && self.pressed
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True while held or while a change is being debounced.
    pub fn is_busy(&self) -> bool {
        self.enabled && (self.pressed || self.debounce.is_some())
    }

    /// Enables or disables the button.
    ///
    /// Disabling drops any in-progress debounce and the pressed state without
    /// emitting `Release`. A re-enabled button ignores pins that are still
    /// held until they have been let go.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.enabled {
            return;
        }
        self.enabled = enabled;
        self.pressed = false;
        self.debounce = None;
        self.press_reported = false;
        self.repeats = 0;
        self.needs_release = enabled;
    }

    /// Returns true if every pin of this button is also a pin of `other`
    /// and `other` has more pins.
    pub fn is_strict_subset_of(&self, other: &Button) -> bool {
        self.pins.len() < other.pins.len() && self.pins.iter().all(|p| other.pins.contains(p))
    }

    /// Advances the state machine by one frame.
    pub fn update<P: PinReader, T: TimeSource>(
        &mut self,
        pins: &P,
        time: &T,
    ) -> Option<ButtonEventKind> {
        if !self.enabled {
            return None;
        }

        let raw = self.read(pins);

        if self.needs_release {
            if raw {
                return None;
            }
            self.needs_release = false;
        }

        match self.debounce {
            Some(window) => {
                if !window.has_elapsed(time, self.config.debounce_ms) {
                    return None;
                }
                self.debounce = None;
                if raw != self.pressed {
                    return self.commit(raw, time);
                }
                // Bounced back to the committed state; nothing happened.
                return None;
            }
            None if raw != self.pressed => {
                self.debounce = Some(ElapsedTime::new(time));
                return None;
            }
            None => {}
        }

        if self.pressed { self.held(time) } else { None }
    }

    fn read<P: PinReader>(&self, pins: &P) -> bool {
        self.pins.iter().all(|pin| pins.is_asserted(*pin))
    }

    fn commit<T: TimeSource>(&mut self, pressed: bool, time: &T) -> Option<ButtonEventKind> {
        self.pressed = pressed;
        self.state_timer.reset(time);

        if pressed {
            self.press_reported = false;
            if self.config.delay_before_press_ms == 0 {
                return Some(self.report_press(time));
            }
            None
        } else {
            let reported = self.press_reported;
            self.press_reported = false;
            reported.then_some(ButtonEventKind::Release)
        }
    }

    fn held<T: TimeSource>(&mut self, time: &T) -> Option<ButtonEventKind> {
        if !self.press_reported {
            if self
                .state_timer
                .has_elapsed(time, self.config.delay_before_press_ms)
            {
                return Some(self.report_press(time));
            }
            return None;
        }

        if !self.config.can_repeat {
            return None;
        }

        let wait = if self.repeats == 0 {
            self.config.delay_before_repeat_ms
        } else {
            self.config.repeat_rate_ms
        };
        if self.repeat_timer.has_elapsed(time, wait) {
            self.repeat_timer.reset(time);
            self.repeats = self.repeats.saturating_add(1);
            return Some(ButtonEventKind::Repeat);
        }
        None
    }

    fn report_press<T: TimeSource>(&mut self, time: &T) -> ButtonEventKind {
        self.press_reported = true;
        self.repeats = 0;
        self.repeat_timer.reset(time);
        ButtonEventKind::Press
    }
}

/// A fixed set of logical buttons addressed by id.
///
/// Polling walks the buttons in insertion order and pushes their events
/// into a caller-owned queue, which the caller drains with a single
/// dispatcher.
pub struct ButtonBank<Id, const N: usize> {
    buttons: Vec<(Id, Button), N>,
}

impl<Id: Copy + PartialEq, const N: usize> ButtonBank<Id, N> {
    pub fn new() -> Self {
        Self {
            buttons: Vec::new(),
        }
    }

    /// Adds a button under `id`.
    pub fn add(&mut self, id: Id, button: Button) -> Result<(), ButtonError> {
        if self.get(id).is_some() {
            return Err(ButtonError::DuplicateId);
        }
        self.buttons
            .push((id, button))
            .map_err(|_| ButtonError::BankFull)
    }

    pub fn get(&self, id: Id) -> Option<&Button> {
        self.buttons.iter().find(|(i, _)| *i == id).map(|(_, b)| b)
    }

    pub fn get_mut(&mut self, id: Id) -> Option<&mut Button> {
        self.buttons
            .iter_mut()
            .find(|(i, _)| *i == id)
            .map(|(_, b)| b)
    }

    pub fn len(&self) -> usize {
        self.buttons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buttons.is_empty()
    }

    /// True if any button is held or debouncing.
    pub fn any_busy(&self) -> bool {
        self.buttons.iter().any(|(_, b)| b.is_busy())
    }

    /// Polls every button once and queues the resulting events.
    ///
    /// Returns the number of events that did not fit in the queue.
    pub fn poll<P: PinReader, T: TimeSource, const Q: usize>(
        &mut self,
        pins: &P,
        time: &T,
        events: &mut Deque<ButtonEvent<Id>, Q>,
    ) -> usize {
        let mut dropped = 0;
        for (id, button) in self.buttons.iter_mut() {
            if let Some(kind) = button.update(pins, time) {
                if events.push_back(ButtonEvent { button: *id, kind }).is_err() {
                    dropped += 1;
                }
            }
        }
        dropped
    }

    pub fn set_enabled(&mut self, id: Id, enabled: bool) {
        if let Some(button) = self.get_mut(id) {
            button.set_enabled(enabled);
        }
    }

    /// Enables or disables every button whose pins are a strict subset of
    /// the pins of `id`.
    pub fn set_subsets_enabled(&mut self, id: Id, enabled: bool) {
        let Some(combo) = self.get(id).cloned() else {
            return;
        };
        for (other, button) in self.buttons.iter_mut() {
            if *other != id && button.is_strict_subset_of(&combo) {
                button.set_enabled(enabled);
            }
        }
    }

    /// Iterates ids whose pins are a strict subset of the pins of `id`.
    pub fn subsets_of(&self, id: Id) -> impl Iterator<Item = Id> + '_ {
        let combo = self.get(id);
        self.buttons.iter().filter_map(move |(other, button)| {
            combo
                .filter(|c| *other != id && button.is_strict_subset_of(c))
                .map(|_| *other)
        })
    }
}

impl<Id: Copy + PartialEq, const N: usize> Default for ButtonBank<Id, N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subset_requires_fewer_pins() {
        let a = Button::single(0, ButtonConfig::new());
        let ab = Button::new(&[0, 1], ButtonConfig::new()).unwrap();
        let ba = Button::new(&[1, 0], ButtonConfig::new()).unwrap();
        assert!(a.is_strict_subset_of(&ab));
        assert!(!ab.is_strict_subset_of(&ba));
        assert!(!ab.is_strict_subset_of(&a));
    }

    #[test]
    fn rejects_bad_pin_lists() {
        assert_eq!(
            Button::new(&[], ButtonConfig::new()).unwrap_err(),
            ButtonError::NoPins
        );
        assert_eq!(
            Button::new(&[0, 1, 2, 3, 4], ButtonConfig::new()).unwrap_err(),
            ButtonError::TooManyPins
        );
    }
}
