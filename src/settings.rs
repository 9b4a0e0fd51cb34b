//! User settings and their persistence.
//!
//! Settings are a flat block of `u32` values indexed by [`SettingId`]. The
//! block is owned by the clock and handed by reference to whatever needs
//! it; it is written to non-volatile storage in one piece and only after a
//! logically complete change, to save write cycles.

use crate::config::{
    DEFAULT_CUR_BRIGHTNESS, DEFAULT_HUE, DEFAULT_MAX_BRIGHTNESS, DEFAULT_MIN_BRIGHTNESS,
};
use crate::types::{Animation, DigitStyle, TransitionStyle};

/// Named setting slots.
///
/// New settings must only ever be appended: the discriminant is the slot
/// in the persisted block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingId {
    DigitType = 0,
    CurBrightness = 1,
    MinBrightness = 2,
    MaxBrightness = 3,
    BlinkingSeparators = 4,
    Color = 5,
    AnimationType = 6,
    TwentyFourHour = 7,
    FlipDisplay = 8,
    TransitionType = 9,
}

impl SettingId {
    /// Number of slots in the block.
    pub const COUNT: usize = 10;

    pub const ALL: [SettingId; Self::COUNT] = [
        SettingId::DigitType,
        SettingId::CurBrightness,
        SettingId::MinBrightness,
        SettingId::MaxBrightness,
        SettingId::BlinkingSeparators,
        SettingId::Color,
        SettingId::AnimationType,
        SettingId::TwentyFourHour,
        SettingId::FlipDisplay,
        SettingId::TransitionType,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for SettingId {
    type Error = SettingsError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        SettingId::ALL
            .get(value as usize)
            .copied()
            .ok_or(SettingsError::UnknownSetting(value))
    }
}

/// Raw persisted block.
pub type SettingsBlock = [u32; SettingId::COUNT];

/// Settings errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// The store could not be read.
    ReadFailed,

    /// The store could not be written.
    WriteFailed,

    /// No setting has this id.
    UnknownSetting(u8),
}

impl core::fmt::Display for SettingsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SettingsError::ReadFailed => write!(f, "settings store read failed"),
            SettingsError::WriteFailed => write!(f, "settings store write failed"),
            SettingsError::UnknownSetting(id) => write!(f, "unknown setting id {}", id),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}

/// Trait for abstracting the non-volatile settings store.
///
/// Implement this over EEPROM, emulated EEPROM or a flash page. `save`
/// receives the whole block and should write it in a single operation.
pub trait SettingsStore {
    fn load(&mut self) -> Result<SettingsBlock, SettingsError>;

    fn save(&mut self, block: &SettingsBlock) -> Result<(), SettingsError>;
}

/// The in-memory settings block.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    values: SettingsBlock,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            values: [0; SettingId::COUNT],
        };
        settings.reset_to_defaults();
        settings
    }
}

impl Settings {
    /// Wraps an existing block without validation.
    pub const fn from_block(values: SettingsBlock) -> Self {
        Self { values }
    }

    /// Loads the block from `store`, falling back to defaults for an
    /// unreadable or never-written store and repairing invalid values.
    pub fn load<S: SettingsStore>(store: &mut S) -> Self {
        match store.load() {
            Ok(block) if !is_blank(&block) => {
                let mut settings = Self::from_block(block);
                settings.sanitize();
                settings
            }
            Ok(_) => {
                #[cfg(feature = "defmt")]
                defmt::info!("settings store blank, using defaults");
                Self::default()
            }
            Err(_err) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("settings load failed: {}, using defaults", _err);
                Self::default()
            }
        }
    }

    /// Writes the whole block to `store`.
    pub fn save<S: SettingsStore>(&self, store: &mut S) -> Result<(), SettingsError> {
        store.save(&self.values)?;
        #[cfg(feature = "defmt")]
        defmt::debug!("settings saved");
        Ok(())
    }

    pub fn get(&self, id: SettingId) -> u32 {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: SettingId, value: u32) {
        self.values[id.index()] = value;
    }

    pub fn block(&self) -> &SettingsBlock {
        &self.values
    }

    /// Restores factory defaults. Does not save.
    pub fn reset_to_defaults(&mut self) {
        self.set(SettingId::DigitType, DigitStyle::Pixels.id());
        self.set(SettingId::CurBrightness, DEFAULT_CUR_BRIGHTNESS);
        self.set(SettingId::MinBrightness, DEFAULT_MIN_BRIGHTNESS);
        self.set(SettingId::MaxBrightness, DEFAULT_MAX_BRIGHTNESS);
        self.set(SettingId::BlinkingSeparators, 1);
        self.set(SettingId::Color, DEFAULT_HUE);
        self.set(SettingId::AnimationType, Animation::CycleAll.id().unwrap_or(0));
        self.set(SettingId::TwentyFourHour, 0);
        self.set(SettingId::FlipDisplay, 0);
        self.set(SettingId::TransitionType, TransitionStyle::CrossFade.id());
    }

    /// Replaces values the rest of the crate cannot interpret with defaults.
    pub fn sanitize(&mut self) {
        let defaults = Settings::default();
        if DigitStyle::from_id(self.get(SettingId::DigitType)).is_none() {
            self.set(SettingId::DigitType, defaults.get(SettingId::DigitType));
        }
        if Animation::from_id(self.get(SettingId::AnimationType)).is_none() {
            self.set(SettingId::AnimationType, defaults.get(SettingId::AnimationType));
        }
        if TransitionStyle::from_id(self.get(SettingId::TransitionType)).is_none() {
            self.set(SettingId::TransitionType, defaults.get(SettingId::TransitionType));
        }
        for id in [SettingId::CurBrightness, SettingId::MinBrightness, SettingId::MaxBrightness] {
            if self.get(id) > u8::MAX as u32 {
                self.set(id, defaults.get(id));
            }
        }
        if self.min_brightness() > self.max_brightness() {
            self.set(SettingId::MinBrightness, defaults.get(SettingId::MinBrightness));
            self.set(SettingId::MaxBrightness, defaults.get(SettingId::MaxBrightness));
        }
        for id in [
            SettingId::BlinkingSeparators,
            SettingId::TwentyFourHour,
            SettingId::FlipDisplay,
        ] {
            if self.get(id) > 1 {
                self.set(id, defaults.get(id));
            }
        }
        let hue = self.get(SettingId::Color) & 0xFF;
        self.set(SettingId::Color, hue);
    }

    // Typed accessors

    pub fn digit_style(&self) -> DigitStyle {
        DigitStyle::from_id(self.get(SettingId::DigitType)).unwrap_or(DigitStyle::Pixels)
    }

    pub fn animation(&self) -> Animation {
        Animation::from_id(self.get(SettingId::AnimationType)).unwrap_or(Animation::Static)
    }

    pub fn transition(&self) -> TransitionStyle {
        TransitionStyle::from_id(self.get(SettingId::TransitionType))
            .unwrap_or(TransitionStyle::CrossFade)
    }

    pub fn hue(&self) -> u8 {
        self.get(SettingId::Color) as u8
    }

    pub fn brightness(&self) -> u8 {
        self.get(SettingId::CurBrightness).min(u8::MAX as u32) as u8
    }

    pub fn min_brightness(&self) -> u32 {
        self.get(SettingId::MinBrightness)
    }

    pub fn max_brightness(&self) -> u32 {
        self.get(SettingId::MaxBrightness)
    }

    pub fn is_24_hour(&self) -> bool {
        self.get(SettingId::TwentyFourHour) != 0
    }

    pub fn is_flipped(&self) -> bool {
        self.get(SettingId::FlipDisplay) != 0
    }

    pub fn blinking_separators(&self) -> bool {
        self.get(SettingId::BlinkingSeparators) != 0
    }

    /// Toggles a boolean setting and returns the new value.
    pub fn toggle(&mut self, id: SettingId) -> bool {
        let on = self.get(id) == 0;
        self.set(id, on as u32);
        on
    }
}

/// Erased EEPROM and flash read back as all ones; a zeroed block has an
/// invalid digit style. Either means nothing was ever saved.
fn is_blank(block: &SettingsBlock) -> bool {
    block.iter().all(|v| *v == u32::MAX) || block.iter().all(|v| *v == 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_match_block_slots() {
        for (slot, id) in SettingId::ALL.iter().enumerate() {
            assert_eq!(id.index(), slot);
            assert_eq!(SettingId::try_from(slot as u8), Ok(*id));
        }
        assert_eq!(
            SettingId::try_from(SettingId::COUNT as u8),
            Err(SettingsError::UnknownSetting(SettingId::COUNT as u8))
        );
    }

    #[test]
    fn blank_blocks_are_detected() {
        assert!(is_blank(&[u32::MAX; SettingId::COUNT]));
        assert!(is_blank(&[0; SettingId::COUNT]));
        assert!(!is_blank(Settings::default().block()));
    }
}
