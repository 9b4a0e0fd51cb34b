//! The catalog of visual effects.
//!
//! An [`Effect`] is a closed set of variants, each carrying only the state
//! its own behavior needs. The [`Animator`](crate::animator::Animator)
//! drives an effect through four hooks every frame; a variant overrides the
//! hooks where it differs from the default flat-hue behavior and falls
//! through to the default otherwise:
//!
//! - [`on_second`](Effect::on_second): once per wall-clock second
//! - [`update_colors`](Effect::update_colors): once per frame
//! - [`paint`](Effect::paint): adjusts the per-cell plan the animator built
//! - [`color_button_pressed`](Effect::color_button_pressed): manual hue input

use crate::animator::{CellFrame, CellPlan};
use crate::colors::{Rgb8, color_wheel};
use crate::config::{
    BREATHE_BRIGHTNESS_STEP, BREATHE_FLOOR, BREATHE_STEP_MS, CYCLE_HUE_STEP, FLOW_HUE_STEP,
    GLOW_FLOOR, NUM_DIGITS, RAINBOW_HUE_SPREAD, RAINBOW_HUE_STEP, SET_TIME_FIELD_HUE,
    SET_TIME_SECONDS_HUE, TRANSIENT_HUE_SHIFT, TRANSITION_WINDOW_MS,
};
use crate::time::{ElapsedTime, TimeSource};
use crate::types::{Animation, Cadence, INVALID, Numbers, numeral};

/// What an effect hook may look at.
#[derive(Debug, Clone, Copy)]
pub struct EffectContext<'a> {
    /// Global hue from settings or the color button.
    pub hue: u8,

    /// Numerals being shown this frame.
    pub current: &'a Numbers,

    /// Numerals committed before the current transition.
    pub last: &'a Numbers,

    /// Milliseconds since the current second began.
    pub elapsed_ms: u32,
}

/// Active effect and its private state.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Static,
    CycleAll(CycleAll),
    Breathing(Breathing),
    FlowLeft(FlowLeft),
    Rainbow(Rainbow),
    Zippy,
    Transient,
    SetTime,
}

impl Effect {
    /// Builds a fresh effect. No state survives from a previous effect.
    pub fn new<T: TimeSource>(animation: Animation, hue: u8, time: &T) -> Self {
        match animation {
            Animation::Static => Effect::Static,
            Animation::CycleAll => Effect::CycleAll(CycleAll { hue }),
            Animation::Glow => Effect::Breathing(Breathing::new(GLOW_FLOOR, time)),
            Animation::Breathe => Effect::Breathing(Breathing::new(BREATHE_FLOOR, time)),
            Animation::FlowLeft => Effect::FlowLeft(FlowLeft::new(hue)),
            Animation::Rainbow => Effect::Rainbow(Rainbow::new(hue)),
            Animation::Zippy => Effect::Zippy,
            Animation::Transient => Effect::Transient,
            Animation::SetTime => Effect::SetTime,
        }
    }

    /// Which [`Animation`] this effect implements.
    ///
    /// Both breathing floors map back to their own animation.
    pub fn animation(&self) -> Animation {
        match self {
            Effect::Static => Animation::Static,
            Effect::CycleAll(_) => Animation::CycleAll,
            Effect::Breathing(b) if b.floor <= BREATHE_FLOOR => Animation::Breathe,
            Effect::Breathing(_) => Animation::Glow,
            Effect::FlowLeft(_) => Animation::FlowLeft,
            Effect::Rainbow(_) => Animation::Rainbow,
            Effect::Zippy => Animation::Zippy,
            Effect::Transient => Animation::Transient,
            Effect::SetTime => Animation::SetTime,
        }
    }

    /// Redraw cadence this effect needs.
    pub fn cadence(&self) -> Cadence {
        match self {
            Effect::Static | Effect::CycleAll(_) | Effect::FlowLeft(_) => Cadence::PerSecond,
            Effect::Breathing(_)
            | Effect::Rainbow(_)
            | Effect::Zippy
            | Effect::Transient
            | Effect::SetTime => Cadence::PerFrame,
        }
    }

    /// Whether second rollover and the cross-fade apply to this effect.
    pub fn follows_seconds(&self) -> bool {
        !matches!(self, Effect::Transient)
    }

    /// Once-per-second hook.
    pub fn on_second(&mut self, ctx: &EffectContext<'_>) {
        match self {
            Effect::CycleAll(cycle) => cycle.hue = cycle.hue.wrapping_add(CYCLE_HUE_STEP),
            Effect::FlowLeft(flow) => flow.on_second(ctx.current[NUM_DIGITS - 1]),
            _ => {}
        }
    }

    /// Per-frame color hook. Writes each cell's color into `colors`.
    pub fn update_colors<T: TimeSource>(
        &mut self,
        ctx: &EffectContext<'_>,
        colors: &mut [Rgb8; NUM_DIGITS],
        time: &T,
    ) {
        match self {
            Effect::CycleAll(cycle) => *colors = [color_wheel(cycle.hue); NUM_DIGITS],
            Effect::Breathing(breathing) => {
                breathing.step(time);
                *colors = [color_wheel(ctx.hue); NUM_DIGITS];
            }
            Effect::FlowLeft(flow) => {
                if flow.forced {
                    flow.advance();
                }
                *colors = flow.colors;
            }
            Effect::Rainbow(rainbow) => {
                rainbow.advance();
                *colors = rainbow.phases.map(color_wheel);
            }
            Effect::Transient => {
                *colors = [color_wheel(ctx.hue.wrapping_add(TRANSIENT_HUE_SHIFT)); NUM_DIGITS];
            }
            Effect::SetTime => {
                let field = color_wheel(SET_TIME_FIELD_HUE);
                let seconds = color_wheel(SET_TIME_SECONDS_HUE);
                *colors = [field, field, field, field, seconds, seconds];
            }
            Effect::Static | Effect::Zippy => *colors = [color_wheel(ctx.hue); NUM_DIGITS],
        }
    }

    /// Paint hook. Receives the animator's default plan and may rewrite it.
    pub fn paint(&self, ctx: &EffectContext<'_>, frame: &mut [CellFrame; NUM_DIGITS]) {
        match self {
            Effect::Breathing(breathing) => {
                for cell in frame.iter_mut() {
                    cell.plan = cell.plan.scaled(breathing.level);
                }
            }
            Effect::Zippy => {
                for (i, cell) in frame.iter_mut().enumerate() {
                    if ctx.last[i] != ctx.current[i] && ctx.elapsed_ms < TRANSITION_WINDOW_MS {
                        cell.plan = CellPlan::Steady {
                            numeral: zippy_numeral(ctx.last[i], ctx.current[i], ctx.elapsed_ms),
                            brightness: 1.0,
                        };
                    }
                }
            }
            Effect::Transient | Effect::SetTime => {
                for (i, cell) in frame.iter_mut().enumerate() {
                    cell.plan = CellPlan::Steady {
                        numeral: ctx.current[i],
                        brightness: 1.0,
                    };
                }
            }
            _ => {}
        }
    }

    /// Manual hue input from the color button.
    pub fn color_button_pressed(&mut self, hue: u8) {
        match self {
            Effect::CycleAll(cycle) => cycle.hue = hue,
            Effect::FlowLeft(flow) => flow.force(),
            Effect::Rainbow(rainbow) => rainbow.paused = !rainbow.paused,
            _ => {}
        }
    }
}

/// Numeral shown by the zippy roll `elapsed_ms` into the window: counts up
/// from `old` through the intermediate numerals and lands on `new`.
pub fn zippy_numeral(old: u8, new: u8, elapsed_ms: u32) -> u8 {
    let Some(to) = numeral(new) else {
        return INVALID;
    };
    if elapsed_ms >= TRANSITION_WINDOW_MS {
        return to;
    }
    let from = numeral(old).unwrap_or(0);
    let distance = (to + 10 - from) % 10;
    let step = (distance as u32 * elapsed_ms / TRANSITION_WINDOW_MS) as u8;
    (from + step) % 10
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleAll {
    pub hue: u8,
}

/// Brightness oscillation between `floor` and full.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Breathing {
    pub floor: f32,
    pub level: f32,
    rising: bool,
    step_timer: ElapsedTime,
}

impl Breathing {
    fn new<T: TimeSource>(floor: f32, time: &T) -> Self {
        Self {
            floor,
            level: 1.0,
            rising: false,
            step_timer: ElapsedTime::new(time),
        }
    }

    fn step<T: TimeSource>(&mut self, time: &T) {
        if !self.step_timer.has_elapsed(time, BREATHE_STEP_MS) {
            return;
        }
        self.step_timer.reset(time);

        if self.rising {
            self.level += BREATHE_BRIGHTNESS_STEP;
            if self.level >= 1.0 {
                self.level = 1.0;
                self.rising = false;
            }
        } else {
            self.level -= BREATHE_BRIGHTNESS_STEP;
            if self.level <= self.floor {
                self.level = self.floor;
                self.rising = true;
            }
        }
    }
}

/// Colors travel one cell to the left on each rotation; a fresh hue enters
/// on the right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlowLeft {
    pub cursor: u8,
    pub colors: [Rgb8; NUM_DIGITS],
    last_rightmost: u8,
    forced: bool,
}

impl FlowLeft {
    fn new(hue: u8) -> Self {
        Self {
            cursor: hue,
            colors: [color_wheel(hue); NUM_DIGITS],
            last_rightmost: INVALID,
            forced: false,
        }
    }

    fn on_second(&mut self, rightmost: u8) {
        let rolled_over = rightmost == 0 && self.last_rightmost != 0;
        self.last_rightmost = rightmost;
        if self.forced || rolled_over {
            self.advance();
        }
    }

    fn force(&mut self) {
        self.forced = true;
        // Whatever shows next must count as a change.
        self.last_rightmost = INVALID;
    }

    /// Rotates with the next hue along the flow.
    fn advance(&mut self) {
        self.rotate(self.cursor.wrapping_add(FLOW_HUE_STEP));
    }

    fn rotate(&mut self, hue: u8) {
        self.colors.copy_within(1.., 0);
        self.colors[NUM_DIGITS - 1] = color_wheel(hue);
        self.cursor = hue;
        self.forced = false;
    }
}

/// Every cell walks the wheel on its own phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rainbow {
    pub phases: [u8; NUM_DIGITS],
    pub paused: bool,
}

impl Rainbow {
    fn new(hue: u8) -> Self {
        Self {
            phases: core::array::from_fn(|i| {
                hue.wrapping_add(RAINBOW_HUE_SPREAD.wrapping_mul(i as u8))
            }),
            paused: false,
        }
    }

    fn advance(&mut self) {
        if self.paused {
            return;
        }
        for phase in self.phases.iter_mut() {
            *phase = phase.wrapping_add(RAINBOW_HUE_STEP);
        }
    }
}
