//! Owner of the six cell renderers and the active animator.

use crate::animator::{Animator, AnimatorConfig, CellFrame, CellPlan};
use crate::colors::color_wheel;
use crate::config::{DIGIT_ORIGINS, NUM_DIGITS};
use crate::digit::Digit;
use crate::strip::LedStrip;
use crate::time::TimeSource;
use crate::types::{Animation, BLANK_NUMBERS, DigitStyle, Numbers, TransitionStyle};

/// Holds the renderer for every cell plus the single active [`Animator`].
///
/// Renderers are replaced in place when the digit style changes; the
/// animator is replaced in place when the effect changes. Nothing outside
/// the manager holds on to either.
pub struct DigitManager {
    digits: [Digit; NUM_DIGITS],
    animator: Animator,
    numbers: Numbers,
    style: DigitStyle,
}

impl DigitManager {
    pub fn new<T: TimeSource>(animation: Animation, config: AnimatorConfig, time: &T) -> Self {
        Self {
            digits: build_digits(config.style, config.hue),
            animator: Animator::new(animation, config, time),
            numbers: BLANK_NUMBERS,
            style: config.style,
        }
    }

    /// Numerals shown by the last [`display`](Self::display) call.
    pub fn numbers(&self) -> &Numbers {
        &self.numbers
    }

    pub fn digit(&self, index: usize) -> Option<&Digit> {
        self.digits.get(index)
    }

    pub fn animator(&self) -> &Animator {
        &self.animator
    }

    pub fn animation(&self) -> Animation {
        self.animator.animation()
    }

    pub fn digit_style(&self) -> DigitStyle {
        self.style
    }

    /// Stores `numbers`, runs one animator frame and paints every cell.
    ///
    /// Only writes into the strip buffer; flushing is the caller's job.
    pub fn display<S: LedStrip, T: TimeSource>(
        &mut self,
        numbers: &Numbers,
        second: u8,
        strip: &mut S,
        time: &T,
    ) -> [CellFrame; NUM_DIGITS] {
        self.numbers = *numbers;
        let frame = self.animator.go(numbers, second, time);

        for (digit, cell) in self.digits.iter_mut().zip(frame.iter()) {
            digit.set_color(cell.color);
            match cell.plan {
                CellPlan::Steady { numeral, brightness } => {
                    digit.set_brightness(brightness);
                    digit.display(strip, numeral);
                }
                CellPlan::CrossFade {
                    old,
                    new,
                    old_brightness,
                    new_brightness,
                } => {
                    digit.all_off(strip);
                    digit.set_brightness(old_brightness);
                    digit.display_over(strip, old);
                    digit.set_brightness(new_brightness);
                    digit.display_over(strip, new);
                }
            }
        }

        frame
    }

    /// Forwards a color button press to the animator.
    pub fn color_button_pressed(&mut self, hue: u8) {
        self.animator.color_button_pressed(hue);
    }

    /// Sets the hue without effect-specific behavior.
    pub fn set_wheel_color(&mut self, hue: u8) {
        self.animator.set_wheel_color(hue);
    }

    /// Replaces the active effect. All previous effect state is dropped;
    /// the new animator picks up from the numerals currently shown.
    pub fn use_animation<T: TimeSource>(&mut self, animation: Animation, time: &T) {
        let config = *self.animator.config();
        self.animator = Animator::with_reference(animation, config, &self.numbers, time);
    }

    /// Rebuilds every renderer for `style` and clears the old cells.
    pub fn set_digit_style<S: LedStrip>(&mut self, style: DigitStyle, strip: &mut S) {
        #[cfg(feature = "defmt")]
        defmt::debug!("digit style: {}", style);

        for digit in self.digits.iter() {
            digit.all_off(strip);
        }
        self.style = style;
        self.digits = build_digits(style, self.animator.config().hue);
        self.animator.set_digit_style(style);
    }

    /// Rebuilds renderers after the display orientation changed.
    pub fn reset_digits<S: LedStrip>(&mut self, strip: &mut S) {
        self.set_digit_style(self.style, strip);
    }

    pub fn set_transition(&mut self, transition: TransitionStyle) {
        self.animator.set_transition(transition);
    }
}

fn build_digits(style: DigitStyle, hue: u8) -> [Digit; NUM_DIGITS] {
    DIGIT_ORIGINS.map(|first| Digit::new(style, first, color_wheel(hue)))
}
