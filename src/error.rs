//! Driver errors

use core::fmt;

use embedded_hal::digital::ErrorKind;

/// Hardware pin the driver talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinId {
    /// Warm channel output
    Warm,
    /// Cool channel output
    Cool,
    /// Mode switch input
    ModeSwitch,
}

impl PinId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Warm => "warm",
            Self::Cool => "cool",
            Self::ModeSwitch => "mode_switch",
        }
    }
}

/// Driver error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A pin read or write was rejected by the HAL
    Pin { pin: PinId, kind: ErrorKind },
}

impl Error {
    pub(crate) fn pin<E: embedded_hal::digital::Error>(pin: PinId, err: &E) -> Self {
        Self::Pin {
            pin,
            kind: err.kind(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pin { pin, kind } => write!(f, "{} pin error: {}", pin.as_str(), kind),
        }
    }
}
