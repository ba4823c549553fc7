//! Precomputed sine lookup
//!
//! The blend signal is sampled from a fixed table built once at startup,
//! so the pulse path never calls into transcendental math.

use core::f32::consts::TAU;
use core::fmt;

/// Default table resolution (0.1 degree per step).
pub const DEFAULT_RESOLUTION: usize = 3600;

/// Error returned when a table cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaveformError {
    /// The table resolution is zero
    ZeroResolution,
}

impl fmt::Display for WaveformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroResolution => f.write_str("waveform table resolution must be non-zero"),
        }
    }
}

/// One full sine period sampled at `N` uniform angular steps.
#[derive(Debug, Clone)]
pub struct WaveformTable<const N: usize> {
    samples: [f32; N],
}

impl<const N: usize> WaveformTable<N> {
    /// Build the table.
    ///
    /// Samples are computed in double precision and stored as `f32`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn build() -> Result<Self, WaveformError> {
        if N == 0 {
            return Err(WaveformError::ZeroResolution);
        }

        let mut samples = [0.0; N];
        let step = core::f64::consts::TAU / N as f64;
        for (i, sample) in samples.iter_mut().enumerate() {
            *sample = libm::sin(step * i as f64) as f32;
        }

        Ok(Self { samples })
    }

    /// Number of samples in one period
    pub const fn len(&self) -> usize {
        N
    }

    /// Always `false`: an empty table cannot be built
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Get the sample stored at `index`
    pub fn get(&self, index: usize) -> Option<f32> {
        self.samples.get(index).copied()
    }

    /// Map a phase in radians to its table slot.
    ///
    /// Phases outside one period wrap around in either direction; non-finite
    /// phases map to slot 0.
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn index_of(phase: f32) -> usize {
        let slots = N as f32;
        let position = libm::floorf(phase * slots / TAU);
        if N == 0 || !position.is_finite() {
            return 0;
        }
        let mut wrapped = libm::fmodf(position, slots);
        if wrapped < 0.0 {
            wrapped += slots;
        }
        // rounding in the add can land exactly on `slots`
        (wrapped as usize).min(N - 1)
    }

    /// Blend value for `phase`, in `[-1, 1]`
    #[inline]
    pub fn at(&self, phase: f32) -> f32 {
        self.samples[Self::index_of(phase)]
    }
}
