//! The per-frame effect engine.
//!
//! Provides [`Animator`], which turns the six numerals of the current frame
//! into a [`CellFrame`] per character cell: the color to use and how the
//! numeral(s) should be drawn. It owns the bookkeeping shared by every
//! effect (second rollover detection, the stalled-RTC guard, the transition
//! reference numerals) and delegates the visual decisions to an [`Effect`].
//!
//! # Frame contract
//!
//! [`Animator::go`] is called once per frame. It
//! 1. detects a wall-clock second rollover (the RTC second changed, or more
//!    than [`MALFUNCTION_GUARD_MS`] passed without one) and runs the
//!    effect's once-per-second hook,
//! 2. runs the effect's per-frame color hook, at most once per distinct
//!    frame timestamp,
//! 3. builds the default plan (cross-fade for changed cells during the
//!    first [`TRANSITION_WINDOW_MS`] of the second) and lets the effect
//!    adjust it.

use crate::colors::{Rgb8, color_wheel};
use crate::config::{MALFUNCTION_GUARD_MS, NUM_DIGITS, SECOND_MS, TRANSITION_WINDOW_MS};
use crate::effect::{Effect, EffectContext};
use crate::time::{ElapsedTime, TimeSource};
use crate::types::{
    Animation, BLANK_NUMBERS, Cadence, DigitStyle, INVALID, Numbers, TransitionStyle, numeral,
};

/// How one cell should be drawn this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellPlan {
    /// A single numeral at one brightness.
    Steady { numeral: u8, brightness: f32 },

    /// The outgoing numeral dimming while the incoming one appears.
    CrossFade {
        old: u8,
        new: u8,
        old_brightness: f32,
        new_brightness: f32,
    },
}

impl CellPlan {
    /// Multiplies every brightness in the plan by `factor`.
    pub fn scaled(self, factor: f32) -> Self {
        match self {
            CellPlan::Steady { numeral, brightness } => CellPlan::Steady {
                numeral,
                brightness: brightness * factor,
            },
            CellPlan::CrossFade {
                old,
                new,
                old_brightness,
                new_brightness,
            } => CellPlan::CrossFade {
                old,
                new,
                old_brightness: old_brightness * factor,
                new_brightness: new_brightness * factor,
            },
        }
    }

    /// The numeral the cell settles on.
    pub fn numeral(&self) -> u8 {
        match *self {
            CellPlan::Steady { numeral, .. } => numeral,
            CellPlan::CrossFade { new, .. } => new,
        }
    }
}

/// Color and drawing plan for one cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellFrame {
    pub color: Rgb8,
    pub plan: CellPlan,
}

/// Options the animator is built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimatorConfig {
    pub hue: u8,
    pub style: DigitStyle,
    pub transition: TransitionStyle,
}

/// Stateful effect engine. Exactly one is active at a time.
#[derive(Debug, Clone)]
pub struct Animator {
    effect: Effect,
    config: AnimatorConfig,
    colors: [Rgb8; NUM_DIGITS],
    last_second: Option<u8>,
    second_timer: ElapsedTime,
    /// Transition reference: what the cells showed before the change.
    last_numbers: Numbers,
    current_numbers: Numbers,
    /// Numbers from the previous `go` call.
    previous_numbers: Numbers,
    last_frame_ms: Option<u32>,
}

impl Animator {
    /// Creates an animator running `animation` with fresh effect state.
    ///
    /// The display is assumed blank, so the first numerals fade in.
    pub fn new<T: TimeSource>(animation: Animation, config: AnimatorConfig, time: &T) -> Self {
        Self::with_reference(animation, config, &BLANK_NUMBERS, time)
    }

    /// Creates an animator that takes over a display already showing
    /// `shown`. Cells whose numeral stays the same do not fade.
    pub fn with_reference<T: TimeSource>(
        animation: Animation,
        config: AnimatorConfig,
        shown: &Numbers,
        time: &T,
    ) -> Self {
        #[cfg(feature = "defmt")]
        defmt::debug!("animator: {}", animation);

        let shown = shown.map(normalize);
        Self {
            effect: Effect::new(animation, config.hue, time),
            config,
            colors: [color_wheel(config.hue); NUM_DIGITS],
            last_second: None,
            second_timer: ElapsedTime::new(time),
            last_numbers: shown,
            current_numbers: shown,
            previous_numbers: shown,
            last_frame_ms: None,
        }
    }

    pub fn animation(&self) -> Animation {
        self.effect.animation()
    }

    pub fn effect(&self) -> &Effect {
        &self.effect
    }

    pub fn config(&self) -> &AnimatorConfig {
        &self.config
    }

    /// Redraw cadence of the active effect.
    pub fn cadence(&self) -> Cadence {
        self.effect.cadence()
    }

    /// True when the active effect changes output between seconds.
    pub fn is_fast(&self) -> bool {
        self.cadence() == Cadence::PerFrame
    }

    /// Sets the global hue without any effect-specific reaction.
    pub fn set_wheel_color(&mut self, hue: u8) {
        self.config.hue = hue;
    }

    /// Sets the global hue and lets the effect react to a manual press.
    pub fn color_button_pressed(&mut self, hue: u8) {
        self.config.hue = hue;
        self.effect.color_button_pressed(hue);
    }

    /// Updates the digit style used for fade-in decisions.
    pub fn set_digit_style(&mut self, style: DigitStyle) {
        self.config.style = style;
    }

    pub fn set_transition(&mut self, transition: TransitionStyle) {
        self.config.transition = transition;
    }

    /// Committed transition reference numerals.
    pub fn last_numbers(&self) -> &Numbers {
        &self.last_numbers
    }

    /// Milliseconds since the current second began.
    pub fn elapsed_in_second<T: TimeSource>(&self, time: &T) -> u32 {
        self.second_timer.elapsed_ms(time)
    }

    /// True while any cell is still moving from its old to its new numeral.
    pub fn in_transition<T: TimeSource>(&self, time: &T) -> bool {
        self.effect.follows_seconds()
            && self.last_numbers != self.current_numbers
            && self.elapsed_in_second(time) < TRANSITION_WINDOW_MS
    }

    /// Milliseconds until the next expected second rollover.
    pub fn ms_until_next_second<T: TimeSource>(&self, time: &T) -> u32 {
        SECOND_MS.saturating_sub(self.elapsed_in_second(time)).max(1)
    }

    /// Runs one frame for `numbers`, where `second` is the RTC's current
    /// second-of-minute.
    pub fn go<T: TimeSource>(
        &mut self,
        numbers: &Numbers,
        second: u8,
        time: &T,
    ) -> [CellFrame; NUM_DIGITS] {
        let now = time.millis();
        let new_frame = self.last_frame_ms != Some(now);
        self.last_frame_ms = Some(now);
        self.current_numbers = numbers.map(normalize);

        if self.effect.follows_seconds() {
            self.check_rollover(second, time);
        }

        let elapsed_ms = self.second_timer.elapsed_ms(time);
        let ctx = EffectContext {
            hue: self.config.hue,
            current: &self.current_numbers,
            last: &self.last_numbers,
            elapsed_ms,
        };

        if new_frame {
            self.effect.update_colors(&ctx, &mut self.colors, time);
        }

        let mut frame = self.default_plan(elapsed_ms);
        self.effect.paint(&ctx, &mut frame);

        if elapsed_ms >= TRANSITION_WINDOW_MS || !self.effect.follows_seconds() {
            self.last_numbers = self.current_numbers;
        }
        self.previous_numbers = self.current_numbers;

        frame
    }

    fn check_rollover<T: TimeSource>(&mut self, second: u8, time: &T) {
        let elapsed_ms = self.second_timer.elapsed_ms(time);
        let stalled = elapsed_ms > MALFUNCTION_GUARD_MS;
        if self.last_second == Some(second) && !stalled {
            return;
        }

        if stalled && self.last_second == Some(second) {
            #[cfg(feature = "defmt")]
            defmt::warn!("no second rollover for {} ms, forcing one", elapsed_ms);
            self.last_numbers = self.current_numbers;
        } else {
            // What the last frame was showing, or settling on if a rollover
            // cut its transition short, is the reference for this second.
            self.last_numbers = self.previous_numbers;
        }

        self.last_second = Some(second);
        self.second_timer.reset(time);

        let ctx = EffectContext {
            hue: self.config.hue,
            current: &self.current_numbers,
            last: &self.last_numbers,
            elapsed_ms: 0,
        };
        self.effect.on_second(&ctx);
    }

    fn default_plan(&self, elapsed_ms: u32) -> [CellFrame; NUM_DIGITS] {
        let fading = self.config.transition == TransitionStyle::CrossFade
            && elapsed_ms < TRANSITION_WINDOW_MS;
        let progress = elapsed_ms as f32 / TRANSITION_WINDOW_MS as f32;

        core::array::from_fn(|i| {
            let old = self.last_numbers[i];
            let new = self.current_numbers[i];
            let plan = if fading && old != new {
                CellPlan::CrossFade {
                    old,
                    new,
                    old_brightness: 1.0 - progress,
                    new_brightness: if self.config.style.fades_in() {
                        progress
                    } else {
                        1.0
                    },
                }
            } else {
                CellPlan::Steady {
                    numeral: new,
                    brightness: 1.0,
                }
            };
            CellFrame {
                color: self.colors[i],
                plan,
            }
        })
    }
}

/// Maps anything that is not a numeral to the blank sentinel.
fn normalize(value: u8) -> u8 {
    numeral(value).unwrap_or(INVALID)
}
