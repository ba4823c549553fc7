//! Operating modes selected by the two-position switch

use embedded_hal::digital::PinState;

const MODE_NAME_CROSSFADE: &str = "crossfade";
const MODE_NAME_ALL_ON: &str = "all_on";

const MODE_ID_CROSSFADE: u8 = 0;
const MODE_ID_ALL_ON: u8 = 1;

/// Blend shape rendered by the pulse scheduler
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Mode {
    /// Warm and cool follow the sine, one full cycle per period
    #[default]
    Crossfade = MODE_ID_CROSSFADE,
    /// Fixed 50/50 split, phase frozen
    AllOn = MODE_ID_ALL_ON,
}

impl Mode {
    /// Map a switch level to a mode.
    ///
    /// The switch input idles high through its pull-up, which selects
    /// crossfade.
    pub const fn from_switch(level: PinState) -> Self {
        match level {
            PinState::High => Self::Crossfade,
            PinState::Low => Self::AllOn,
        }
    }

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_CROSSFADE => Self::Crossfade,
            MODE_ID_ALL_ON => Self::AllOn,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Crossfade => MODE_NAME_CROSSFADE,
            Self::AllOn => MODE_NAME_ALL_ON,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_CROSSFADE => Some(Self::Crossfade),
            MODE_NAME_ALL_ON => Some(Self::AllOn),
            _ => None,
        }
    }

    /// Whether the oscillator phase advances in this mode
    pub const fn advances_phase(self) -> bool {
        matches!(self, Self::Crossfade)
    }
}

/// Current mode plus the last raw switch reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeState {
    mode: Mode,
    last_level: Option<PinState>,
}

impl Default for ModeState {
    fn default() -> Self {
        Self::new()
    }
}

impl ModeState {
    pub const fn new() -> Self {
        Self {
            mode: Mode::Crossfade,
            last_level: None,
        }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    /// Last switch level observed, if any
    pub const fn last_level(&self) -> Option<PinState> {
        self.last_level
    }

    /// Record a switch reading.
    ///
    /// Returns the new mode only when the reading selects a mode different
    /// from the current one.
    pub fn observe(&mut self, level: PinState) -> Option<Mode> {
        self.last_level = Some(level);
        let target = Mode::from_switch(level);
        if target == self.mode {
            return None;
        }
        self.mode = target;
        Some(target)
    }
}
