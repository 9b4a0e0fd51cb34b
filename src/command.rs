//! Byte-oriented command channel.
//!
//! The companion app (over BLE UART, or a wired serial link) sends
//! length-prefixed frames:
//!
//! ```text
//! [len] [0x10] [hour] [minute] [second]              set time
//! [len] [0x11] [setting id] [v3] [v2] [v1] [v0]      change setting (big-endian u32)
//! ```
//!
//! `len` counts the bytes after itself. [`CommandDecoder`] consumes the
//! stream one byte at a time and yields a [`Command`] when a frame is
//! complete; the clock applies it through the same paths as the buttons.

use crate::settings::SettingId;
use heapless::Vec;

/// Largest frame body accepted.
pub const MAX_FRAME_LEN: usize = 16;

const CMD_SET_TIME: u8 = 0x10;
const CMD_CHANGE_SETTING: u8 = 0x11;

const SET_TIME_LEN: usize = 4;
const CHANGE_SETTING_LEN: usize = 6;

/// A decoded command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Set the wall clock. The sender's second is the one it read before
    /// transmitting, so the clock applies `second + 1`.
    SetTime { hour: u8, minute: u8, second: u8 },

    /// Overwrite one setting.
    ChangeSetting { id: SettingId, value: u32 },
}

impl Command {
    /// Encodes the command as a complete frame including the length byte.
    pub fn encode(&self) -> Vec<u8, { MAX_FRAME_LEN + 1 }> {
        let mut frame = Vec::new();
        // Both bodies are far below the frame capacity.
        match *self {
            Command::SetTime {
                hour,
                minute,
                second,
            } => {
                let _ = frame.extend_from_slice(&[
                    SET_TIME_LEN as u8,
                    CMD_SET_TIME,
                    hour,
                    minute,
                    second,
                ]);
            }
            Command::ChangeSetting { id, value } => {
                let v = value.to_be_bytes();
                let _ = frame.extend_from_slice(&[
                    CHANGE_SETTING_LEN as u8,
                    CMD_CHANGE_SETTING,
                    id as u8,
                    v[0],
                    v[1],
                    v[2],
                    v[3],
                ]);
            }
        }
        frame
    }

    /// Parses a frame body (everything after the length byte).
    pub fn parse(body: &[u8]) -> Result<Self, CommandError> {
        let (&cmd, _) = body.split_first().ok_or(CommandError::EmptyFrame)?;
        match cmd {
            CMD_SET_TIME => {
                if body.len() != SET_TIME_LEN {
                    return Err(CommandError::BadLength {
                        command: cmd,
                        len: body.len(),
                    });
                }
                let (hour, minute, second) = (body[1], body[2], body[3]);
                if hour > 23 || minute > 59 || second > 59 {
                    return Err(CommandError::BadTime);
                }
                Ok(Command::SetTime {
                    hour,
                    minute,
                    second,
                })
            }
            CMD_CHANGE_SETTING => {
                if body.len() != CHANGE_SETTING_LEN {
                    return Err(CommandError::BadLength {
                        command: cmd,
                        len: body.len(),
                    });
                }
                let id = SettingId::try_from(body[1])
                    .map_err(|_| CommandError::UnknownSetting(body[1]))?;
                let value = u32::from_be_bytes([body[2], body[3], body[4], body[5]]);
                Ok(Command::ChangeSetting { id, value })
            }
            other => Err(CommandError::UnknownCommand(other)),
        }
    }
}

/// Command channel errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// A frame announced zero bytes.
    EmptyFrame,

    /// A frame announced more than [`MAX_FRAME_LEN`] bytes.
    FrameTooLong(u8),

    /// The command byte is not recognized.
    UnknownCommand(u8),

    /// The setting id is not recognized.
    UnknownSetting(u8),

    /// The body length does not match the command.
    BadLength { command: u8, len: usize },

    /// Hour, minute or second out of range.
    BadTime,
}

impl core::fmt::Display for CommandError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CommandError::EmptyFrame => write!(f, "empty command frame"),
            CommandError::FrameTooLong(len) => {
                write!(f, "frame length {} exceeds {}", len, MAX_FRAME_LEN)
            }
            CommandError::UnknownCommand(cmd) => write!(f, "unknown command 0x{:02x}", cmd),
            CommandError::UnknownSetting(id) => write!(f, "unknown setting id {}", id),
            CommandError::BadLength { command, len } => {
                write!(f, "command 0x{:02x} has bad length {}", command, len)
            }
            CommandError::BadTime => write!(f, "time out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CommandError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
enum DecoderState {
    /// Waiting for a length byte.
    Wait,
    /// Collecting `expected` body bytes.
    Receive { expected: u8 },
}

/// Incremental frame decoder.
#[derive(Debug, Clone)]
pub struct CommandDecoder {
    state: DecoderState,
    rx: Vec<u8, MAX_FRAME_LEN>,
}

impl CommandDecoder {
    pub fn new() -> Self {
        Self {
            state: DecoderState::Wait,
            rx: Vec::new(),
        }
    }

    /// Drops any partial frame.
    pub fn reset(&mut self) {
        self.state = DecoderState::Wait;
        self.rx.clear();
    }

    /// True when no partial frame is buffered.
    pub fn is_idle(&self) -> bool {
        self.state == DecoderState::Wait
    }

    /// Feeds one received byte.
    ///
    /// Returns `Ok(Some(command))` when the byte completed a valid frame,
    /// `Ok(None)` while a frame is still incomplete, and `Err` for a
    /// malformed frame. The decoder is ready for a new frame after any
    /// error or completed command.
    pub fn push(&mut self, byte: u8) -> Result<Option<Command>, CommandError> {
        match self.state {
            DecoderState::Wait => {
                if byte == 0 {
                    return Err(CommandError::EmptyFrame);
                }
                if byte as usize > MAX_FRAME_LEN {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("command frame too long: {}", byte);
                    return Err(CommandError::FrameTooLong(byte));
                }
                self.rx.clear();
                self.state = DecoderState::Receive { expected: byte };
                Ok(None)
            }
            DecoderState::Receive { expected } => {
                // Capacity is checked against `expected` when the frame starts.
                let _ = self.rx.push(byte);
                if self.rx.len() < expected as usize {
                    return Ok(None);
                }
                let result = Command::parse(&self.rx);
                self.reset();

                #[cfg(feature = "defmt")]
                match &result {
                    Ok(cmd) => defmt::debug!("command: {}", cmd),
                    Err(err) => defmt::warn!("command rejected: {}", err),
                }

                result.map(Some)
            }
        }
    }
}

impl Default for CommandDecoder {
    fn default() -> Self {
        Self::new()
    }
}
