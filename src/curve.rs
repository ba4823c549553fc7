//! Blend-to-duration conversion
//!
//! Turns a blend value and a dimmer multiplier into the on-time of each
//! channel within its half-period slot.

use embassy_time::Duration;

/// Default lower bound of the linear duty ratio
pub const DEFAULT_MIN_RATIO: f32 = 0.05;
/// Default span of the linear duty ratio
pub const DEFAULT_MAX_RATIO: f32 = 0.95;
/// Default gamma exponent
pub const DEFAULT_GAMMA: f32 = 1.5;
/// Default cool channel dim factor
pub const DEFAULT_COOL_FACTOR: f32 = 0.45;

/// On-times for one warm slot and one cool slot.
///
/// Both durations are strictly shorter than the half-period they were
/// computed for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PulsePlan {
    pub warm_on: Duration,
    pub cool_on: Duration,
}

impl PulsePlan {
    /// Plan with both channels dark for the whole slot
    pub const fn dark() -> Self {
        Self {
            warm_on: Duration::from_ticks(0),
            cool_on: Duration::from_ticks(0),
        }
    }
}

/// Gamma-corrected brightness curve with a fixed cool-channel bias.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BrightnessCurve {
    /// Ratio at the dark end of the blend
    pub min_ratio: f32,
    /// Ratio added across the full blend swing
    pub max_ratio: f32,
    /// Exponent applied to the linear ratio
    pub gamma: f32,
    /// Extra scale applied to the cool channel only
    pub cool_factor: f32,
}

impl Default for BrightnessCurve {
    fn default() -> Self {
        Self {
            min_ratio: DEFAULT_MIN_RATIO,
            max_ratio: DEFAULT_MAX_RATIO,
            gamma: DEFAULT_GAMMA,
            cool_factor: DEFAULT_COOL_FACTOR,
        }
    }
}

impl BrightnessCurve {
    /// Linear warm ratio for blend value `s`, clamped to `[0, 1]`
    pub fn warm_linear(&self, s: f32) -> f32 {
        let s = clamp_signed(s);
        unit(self.min_ratio + self.max_ratio * (1.0 + s) / 2.0)
    }

    /// Linear cool ratio for blend value `s`, clamped to `[0, 1]`
    pub fn cool_linear(&self, s: f32) -> f32 {
        let s = clamp_signed(s);
        unit(self.min_ratio + self.max_ratio * (1.0 - s) / 2.0)
    }

    /// Gamma-corrected warm ratio
    pub fn warm_ratio(&self, s: f32) -> f32 {
        libm::powf(self.warm_linear(s), self.gamma)
    }

    /// Gamma-corrected cool ratio, including the cool factor
    pub fn cool_ratio(&self, s: f32) -> f32 {
        libm::powf(self.cool_linear(s), self.gamma) * self.cool_factor
    }

    /// Compute the pulse plan for one update tick.
    ///
    /// `dimmer` is clamped to `[0, 1]`. Durations are truncated to whole
    /// microseconds and capped one microsecond below `half_period`.
    pub fn plan(&self, s: f32, dimmer: f32, half_period: Duration) -> PulsePlan {
        let dimmer = unit(dimmer);
        PulsePlan {
            warm_on: on_time(half_period, self.warm_ratio(s) * dimmer),
            cool_on: on_time(half_period, self.cool_ratio(s) * dimmer),
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn on_time(half_period: Duration, ratio: f32) -> Duration {
    let half_us = half_period.as_micros();
    let limit = half_us.saturating_sub(1);
    let ratio = unit(ratio);
    // float to int casts saturate, so overshoot lands on the limit
    let on_us = (half_us as f32 * ratio) as u64;
    Duration::from_micros(on_us.min(limit))
}

fn unit(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn clamp_signed(value: f32) -> f32 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(-1.0, 1.0)
}
