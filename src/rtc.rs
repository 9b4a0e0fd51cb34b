//! Real-time clock collaborator and time-of-day arithmetic.

/// Trait for abstracting the real-time clock chip.
///
/// `update` latches the chip's current time; the getters return the latched
/// values so a frame sees one consistent reading.
pub trait Rtc {
    /// Brings up the chip. Called once before the first `update`.
    fn init(&mut self) {}

    fn update(&mut self);

    /// Hour in 24-hour form, `0..=23`.
    fn hour(&self) -> u8;

    /// Hour in 12-hour form, `1..=12`.
    fn hour_12(&self) -> u8 {
        match self.hour() % 12 {
            0 => 12,
            h => h,
        }
    }

    fn minute(&self) -> u8;

    fn second(&self) -> u8;

    fn set_time(&mut self, hour: u8, minute: u8, second: u8);

    fn set_date(&mut self, day: u8, month: u8, year: u16);
}

/// A wall-clock time, always normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl TimeOfDay {
    /// Builds a time, wrapping out-of-range fields into range.
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: hour % 24,
            minute: minute % 60,
            second: second % 60,
        }
    }

    /// Reads the latched time from `rtc`.
    pub fn from_rtc<R: Rtc>(rtc: &R) -> Self {
        Self::new(rtc.hour(), rtc.minute(), rtc.second())
    }

    /// Hour in 12-hour form, `1..=12`.
    pub const fn hour_12(&self) -> u8 {
        match self.hour % 12 {
            0 => 12,
            h => h,
        }
    }

    /// Adds one second, carrying into minutes and hours.
    pub fn advance_second(self) -> Self {
        if self.second < 59 {
            return Self { second: self.second + 1, ..self };
        }
        if self.minute < 59 {
            return Self { minute: self.minute + 1, second: 0, ..self };
        }
        Self::new((self.hour + 1) % 24, 0, 0)
    }

    /// Next hour, wrapping at midnight. Minutes and seconds are kept.
    pub fn next_hour(self) -> Self {
        Self { hour: (self.hour + 1) % 24, ..self }
    }

    /// Next minute without carrying into the hour.
    pub fn next_minute(self) -> Self {
        Self { minute: (self.minute + 1) % 60, ..self }
    }
}
