//! The top-level frame loop.
//!
//! [`Clock`] owns every collaborator and runs one frame per
//! [`tick`](Clock::tick): poll buttons, dispatch their events, work out the
//! six numerals for the current mode, let the [`DigitManager`] paint them,
//! paint the separators, and flush the strip exactly once.

use crate::animator::AnimatorConfig;
use crate::button::{Button, ButtonBank, ButtonConfig, ButtonEvent, ButtonEventKind, PinReader};
use crate::colors::{OFF, color_wheel};
use crate::command::{Command, CommandDecoder, CommandError};
use crate::config::{
    BRIGHTNESS_BUTTON_STEP, HUE_BUTTON_STEP, PAIR_PRESS_DELAY_MS, PIN_BRIGHTNESS, PIN_COLOR,
    PIN_MODE, SINGLE_PRESS_DELAY_MS, TRANSIENT_DISPLAY_MS,
};
use crate::digit_manager::DigitManager;
use crate::rtc::{Rtc, TimeOfDay};
use crate::separators;
use crate::settings::{SettingId, Settings, SettingsStore};
use crate::strip::{FlippableStrip, LedStrip};
use crate::time::{ElapsedTime, TimeSource};
use crate::types::{Animation, BLANK_NUMBERS, FrameTiming, INVALID, Numbers};
use heapless::Deque;

/// Logical buttons: three physical buttons and their combinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    Color,
    Brightness,
    Mode,
    /// Color + Brightness: toggle 12/24-hour display.
    ColorBrightness,
    /// Brightness + Mode: toggle the flipped display.
    BrightnessMode,
    /// Color + Mode: enter or leave set-time mode.
    ColorMode,
    /// All three: toggle blinking separators.
    All,
}

impl ButtonId {
    pub fn is_combination(self) -> bool {
        !matches!(self, ButtonId::Color | ButtonId::Brightness | ButtonId::Mode)
    }
}

/// Number of logical buttons.
pub const NUM_BUTTONS: usize = 7;

/// Capacity of the per-frame event queue.
pub const EVENT_QUEUE_LEN: usize = 8;

/// What the display is doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ClockMode {
    /// Showing the RTC time with the selected effect.
    Normal,

    /// Editing the time; buttons adjust fields.
    SetTime,

    /// Briefly showing a fixed value, then returning to the previous mode.
    TransientDisplay,
}

/// Builds the default button layout.
///
/// Single buttons wait longer than pairs, and pairs longer than the triple,
/// so the widest combination actually held always fires first.
pub fn default_buttons() -> ButtonBank<ButtonId, NUM_BUTTONS> {
    let single = ButtonConfig::new().delay_before_press_ms(SINGLE_PRESS_DELAY_MS);
    let pair = ButtonConfig::new().delay_before_press_ms(PAIR_PRESS_DELAY_MS);
    let triple = ButtonConfig::new();

    let mut bank = ButtonBank::new();
    let layout = [
        (ButtonId::Color, Button::single(PIN_COLOR, single.repeat(true))),
        (ButtonId::Brightness, Button::single(PIN_BRIGHTNESS, single.repeat(true))),
        (ButtonId::Mode, Button::single(PIN_MODE, single)),
        (ButtonId::ColorBrightness, combination(&[PIN_COLOR, PIN_BRIGHTNESS], pair)),
        (ButtonId::BrightnessMode, combination(&[PIN_BRIGHTNESS, PIN_MODE], pair)),
        (ButtonId::ColorMode, combination(&[PIN_COLOR, PIN_MODE], pair)),
        (ButtonId::All, combination(&[PIN_COLOR, PIN_BRIGHTNESS, PIN_MODE], triple)),
    ];
    for (id, button) in layout {
        // Ids are distinct and the bank is sized for exactly this layout.
        let _ = bank.add(id, button);
    }
    bank
}

fn combination(pins: &[u8], config: ButtonConfig) -> Button {
    Button::new(pins, config).unwrap_or_else(|_| Button::single(pins[0], config))
}

/// Converts a time of day into the six displayed numerals.
///
/// In 12-hour mode a leading zero on the hour is blanked.
pub fn time_to_numbers(time: TimeOfDay, twenty_four_hour: bool) -> Numbers {
    let hour = if twenty_four_hour {
        time.hour
    } else {
        time.hour_12()
    };
    let mut numbers = [
        hour / 10,
        hour % 10,
        time.minute / 10,
        time.minute % 10,
        time.second / 10,
        time.second % 10,
    ];
    if !twenty_four_hour && numbers[0] == 0 {
        numbers[0] = INVALID;
    }
    numbers
}

/// The clock: settings, strip, RTC, digits and buttons.
pub struct Clock<'t, S: LedStrip, R: Rtc, E: SettingsStore, T: TimeSource> {
    strip: FlippableStrip<S>,
    rtc: R,
    store: E,
    time: &'t T,
    settings: Settings,
    settings_dirty: bool,
    digits: DigitManager,
    buttons: ButtonBank<ButtonId, NUM_BUTTONS>,
    events: Deque<ButtonEvent<ButtonId>, EVENT_QUEUE_LEN>,
    decoder: CommandDecoder,
    mode: ClockMode,
    /// Mode to return to when a transient display times out.
    return_mode: ClockMode,
    transient: Numbers,
    transient_timer: ElapsedTime,
    edit_time: TimeOfDay,
}

impl<'t, S: LedStrip, R: Rtc, E: SettingsStore, T: TimeSource> Clock<'t, S, R, E, T> {
    /// Loads settings, configures the strip and draws the first frame.
    pub fn new(strip: S, mut rtc: R, mut store: E, time: &'t T) -> Self {
        let settings = Settings::load(&mut store);
        rtc.init();
        rtc.update();

        let mut strip = FlippableStrip::new(strip, settings.is_flipped());
        strip.set_brightness(settings.brightness());

        let digits = DigitManager::new(
            settings.animation(),
            AnimatorConfig {
                hue: settings.hue(),
                style: settings.digit_style(),
                transition: settings.transition(),
            },
            time,
        );

        let mut clock = Self {
            strip,
            rtc,
            store,
            time,
            settings,
            settings_dirty: false,
            digits,
            buttons: default_buttons(),
            events: Deque::new(),
            decoder: CommandDecoder::new(),
            mode: ClockMode::Normal,
            return_mode: ClockMode::Normal,
            transient: BLANK_NUMBERS,
            transient_timer: ElapsedTime::new(time),
            edit_time: TimeOfDay::new(0, 0, 0),
        };
        clock.render();
        clock
    }

    pub fn mode(&self) -> ClockMode {
        self.mode
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn digits(&self) -> &DigitManager {
        &self.digits
    }

    pub fn strip(&self) -> &FlippableStrip<S> {
        &self.strip
    }

    pub fn rtc(&self) -> &R {
        &self.rtc
    }

    pub fn rtc_mut(&mut self) -> &mut R {
        &mut self.rtc
    }

    pub fn store(&self) -> &E {
        &self.store
    }

    pub fn buttons(&self) -> &ButtonBank<ButtonId, NUM_BUTTONS> {
        &self.buttons
    }

    /// Time being edited in set-time mode.
    pub fn edit_time(&self) -> TimeOfDay {
        self.edit_time
    }

    /// Runs one frame and reports when the next one is needed.
    pub fn tick<P: PinReader>(&mut self, pins: &P) -> FrameTiming {
        let _dropped = self.buttons.poll(pins, self.time, &mut self.events);
        #[cfg(feature = "defmt")]
        if _dropped > 0 {
            defmt::warn!("dropped {} button events", _dropped);
        }

        while let Some(event) = self.events.pop_front() {
            self.dispatch(event);
        }

        if self.mode == ClockMode::TransientDisplay
            && self.transient_timer.has_elapsed(self.time, TRANSIENT_DISPLAY_MS)
        {
            self.end_transient();
        }

        self.render();
        self.frame_timing()
    }

    /// Paints and flushes one frame for the current mode.
    pub fn render(&mut self) {
        let (numbers, second) = match self.mode {
            ClockMode::Normal => {
                self.rtc.update();
                let now = TimeOfDay::from_rtc(&self.rtc);
                (time_to_numbers(now, self.settings.is_24_hour()), now.second)
            }
            ClockMode::SetTime => {
                // The edited second stands still; the chip's keeps the
                // animator's rollover going.
                self.rtc.update();
                (
                    time_to_numbers(self.edit_time, self.settings.is_24_hour()),
                    self.rtc.second(),
                )
            }
            ClockMode::TransientDisplay => {
                self.rtc.update();
                (self.transient, self.rtc.second())
            }
        };

        self.digits.display(&numbers, second, &mut self.strip, self.time);
        separators::update(
            &mut self.strip,
            self.digits.digit_style(),
            self.settings.blinking_separators(),
            second,
            color_wheel(self.settings.hue()),
        );
        self.strip.show();
    }

    fn frame_timing(&self) -> FrameTiming {
        let animator = self.digits.animator();
        if self.mode != ClockMode::Normal
            || animator.is_fast()
            || animator.in_transition(self.time)
            || self.buttons.any_busy()
            || !self.decoder.is_idle()
        {
            return FrameTiming::Continuous;
        }
        FrameTiming::Delay(animator.ms_until_next_second(self.time))
    }

    /// Handles one queued button event.
    pub fn dispatch(&mut self, event: ButtonEvent<ButtonId>) {
        use ButtonEventKind::{Press, Release, Repeat};

        #[cfg(feature = "defmt")]
        defmt::trace!("button {}: {}", event.button, event.kind);

        if event.button.is_combination() {
            match event.kind {
                Press => self.buttons.set_subsets_enabled(event.button, false),
                Release => self.buttons.set_subsets_enabled(event.button, true),
                Repeat => {}
            }
        }

        match (self.mode, event.button, event.kind) {
            (_, _, Release) => self.save_if_dirty(),

            (_, ButtonId::ColorMode, Press) => {
                if self.mode == ClockMode::SetTime
                    || self.return_mode == ClockMode::SetTime
                {
                    self.leave_set_time();
                } else {
                    self.enter_set_time();
                }
            }

            (ClockMode::SetTime, ButtonId::Color, Press | Repeat) => {
                self.edit_time = self.edit_time.next_hour();
            }
            (ClockMode::SetTime, ButtonId::Brightness, Press | Repeat) => {
                self.edit_time = self.edit_time.next_minute();
            }
            (ClockMode::SetTime, ButtonId::Mode, Press) => {
                self.edit_time.second = 0;
            }

            (_, ButtonId::Color, Press | Repeat) => {
                let hue = self.settings.hue().wrapping_add(HUE_BUTTON_STEP);
                self.settings.set(SettingId::Color, hue as u32);
                self.settings_dirty = true;
                self.digits.color_button_pressed(hue);
            }
            (_, ButtonId::Brightness, Press | Repeat) => self.step_brightness(),
            (_, ButtonId::Mode, Press) => self.next_animation(),

            (_, ButtonId::ColorBrightness, Press) => {
                let on = self.settings.toggle(SettingId::TwentyFourHour);
                self.settings_dirty = true;
                let mut shown = BLANK_NUMBERS;
                (shown[0], shown[1]) = if on { (2, 4) } else { (1, 2) };
                self.show_transient(shown);
            }
            (_, ButtonId::BrightnessMode, Press) => {
                let flipped = self.settings.toggle(SettingId::FlipDisplay);
                self.settings_dirty = true;
                self.apply_flip(flipped);
            }
            (_, ButtonId::All, Press) => {
                self.settings.toggle(SettingId::BlinkingSeparators);
                self.settings_dirty = true;
            }

            _ => {}
        }
    }

    fn step_brightness(&mut self) {
        let min = self.settings.min_brightness();
        let max = self.settings.max_brightness();
        let mut next = self.settings.get(SettingId::CurBrightness) + BRIGHTNESS_BUTTON_STEP;
        if next > max {
            next = min;
        }
        self.settings.set(SettingId::CurBrightness, next);
        self.settings_dirty = true;
        self.strip.set_brightness(self.settings.brightness());
    }

    fn next_animation(&mut self) {
        let next = self.settings.animation().next();
        let id = next.id().unwrap_or(0);
        self.settings.set(SettingId::AnimationType, id);
        self.settings_dirty = true;

        let mut shown = BLANK_NUMBERS;
        shown[4] = (id / 10) as u8;
        shown[5] = (id % 10) as u8;
        if shown[4] == 0 {
            shown[4] = INVALID;
        }
        self.show_transient(shown);
    }

    /// Shows `numbers` for about a second, then returns to the current mode.
    pub fn show_transient(&mut self, numbers: Numbers) {
        if self.mode != ClockMode::TransientDisplay {
            self.return_mode = self.mode;
            self.set_mode(ClockMode::TransientDisplay);
            self.digits.use_animation(Animation::Transient, self.time);
        }
        self.transient = numbers;
        self.transient_timer.reset(self.time);
    }

    fn end_transient(&mut self) {
        let mode = self.return_mode;
        self.return_mode = ClockMode::Normal;
        self.set_mode(mode);
        let animation = match mode {
            ClockMode::SetTime => Animation::SetTime,
            _ => self.settings.animation(),
        };
        self.digits.use_animation(animation, self.time);
    }

    /// Starts editing the time, seeded from the RTC.
    pub fn enter_set_time(&mut self) {
        self.rtc.update();
        self.edit_time = TimeOfDay::from_rtc(&self.rtc);
        self.return_mode = ClockMode::Normal;
        self.set_mode(ClockMode::SetTime);
        self.digits.use_animation(Animation::SetTime, self.time);
    }

    /// Writes the edited time to the RTC and resumes normal display.
    pub fn leave_set_time(&mut self) {
        let t = self.edit_time;
        self.rtc.set_time(t.hour, t.minute, t.second);
        self.return_mode = ClockMode::Normal;
        self.set_mode(ClockMode::Normal);
        self.digits.use_animation(self.settings.animation(), self.time);
    }

    fn set_mode(&mut self, mode: ClockMode) {
        #[cfg(feature = "defmt")]
        if mode != self.mode {
            defmt::info!("mode: {} -> {}", self.mode, mode);
        }
        self.mode = mode;
    }

    fn apply_flip(&mut self, flipped: bool) {
        let pixels = self.strip.num_pixels();
        let raw = self.strip.inner_mut();
        for i in 0..pixels {
            raw.set_pixel_color(i, OFF);
        }
        self.strip.set_flipped(flipped);
        self.digits.reset_digits(&mut self.strip);
    }

    fn save_if_dirty(&mut self) {
        if !self.settings_dirty {
            return;
        }
        self.settings_dirty = false;
        self.save_settings();
    }

    fn save_settings(&mut self) {
        if let Err(_err) = self.settings.save(&mut self.store) {
            #[cfg(feature = "defmt")]
            defmt::error!("settings save failed: {}", _err);
        }
    }

    /// Feeds one byte from the command channel, applying any completed
    /// command.
    pub fn receive_byte(&mut self, byte: u8) -> Result<Option<Command>, CommandError> {
        let command = self.decoder.push(byte)?;
        if let Some(command) = command {
            self.apply_command(command);
        }
        Ok(command)
    }

    /// Applies a command, saves settings and redraws immediately.
    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::SetTime {
                hour,
                minute,
                second,
            } => {
                let t = TimeOfDay::new(hour, minute, second).advance_second();
                self.rtc.set_time(t.hour, t.minute, t.second);
                if self.mode == ClockMode::SetTime {
                    self.edit_time = t;
                }
            }
            Command::ChangeSetting { id, value } => {
                self.settings.set(id, value);
                self.settings.sanitize();
                self.apply_setting(id);
                self.settings_dirty = false;
                self.save_settings();
            }
        }
        self.render();
    }

    fn apply_setting(&mut self, id: SettingId) {
        match id {
            SettingId::DigitType => {
                separators::clear_all(&mut self.strip);
                self.digits
                    .set_digit_style(self.settings.digit_style(), &mut self.strip);
            }
            SettingId::AnimationType => {
                if self.mode == ClockMode::Normal {
                    self.digits.use_animation(self.settings.animation(), self.time);
                }
            }
            SettingId::Color => self.digits.set_wheel_color(self.settings.hue()),
            SettingId::CurBrightness => self.strip.set_brightness(self.settings.brightness()),
            SettingId::FlipDisplay => self.apply_flip(self.settings.is_flipped()),
            SettingId::TransitionType => self.digits.set_transition(self.settings.transition()),
            SettingId::MinBrightness
            | SettingId::MaxBrightness
            | SettingId::BlinkingSeparators
            | SettingId::TwentyFourHour => {}
        }
    }

    /// Fades the display out over several flushes.
    pub fn fade_out(&mut self) {
        self.strip.fade_to_off(self.settings.brightness());
    }

    /// Restores the configured brightness after [`fade_out`](Self::fade_out).
    pub fn restore_brightness(&mut self) {
        self.strip.set_to_brightness(self.settings.brightness());
    }

    /// Restores factory settings, reconfigures everything and saves.
    pub fn reset_settings(&mut self) {
        self.settings.reset_to_defaults();
        for id in SettingId::ALL {
            self.apply_setting(id);
        }
        self.save_settings();
        self.render();
    }

    /// Consumes the clock and returns its collaborators.
    pub fn release(self) -> (S, R, E) {
        (self.strip.into_inner(), self.rtc, self.store)
    }
}
