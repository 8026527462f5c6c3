//! Float helpers shared by the players
//!
//! The crate is `no_std`, so transcendental functions come from `libm`.

use embassy_time::Duration;

const MICROS_PER_SECOND: f32 = 1_000_000.0;

/// Convert a frame delta into seconds
#[inline]
pub fn seconds(dt: Duration) -> f32 {
    dt.as_micros() as f32 / MICROS_PER_SECOND
}

/// Convert a float channel value to 8 bits
///
/// Values are clamped to `0..=255` and truncated; NaN maps to 0.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn to_channel(value: f32) -> u8 {
    if value.is_nan() || value <= 0.0 {
        0
    } else if value >= 255.0 {
        255
    } else {
        value as u8
    }
}

/// Replace a value whose magnitude is below `epsilon` with a signed epsilon
///
/// Zero maps to `+epsilon`.
#[inline]
pub fn away_from_zero(value: f32, epsilon: f32) -> f32 {
    if libm::fabsf(value) >= epsilon {
        value
    } else if value < 0.0 {
        -epsilon
    } else {
        epsilon
    }
}

/// Wrap `value` into `[0, period)`
#[inline]
pub fn wrap(value: f32, period: f32) -> f32 {
    if period <= 0.0 {
        return 0.0;
    }
    let wrapped = libm::fmodf(value, period);
    if wrapped < 0.0 { wrapped + period } else { wrapped }
}

/// Easing curve applied to a normalized distance `u` in `[0, 1]`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum Easing {
    /// `y = u`
    #[default]
    Linear = 0,
    /// `y = u(2 - u)`, slope 2 at the edge and flat at the peak
    Quadratic = 1,
    /// `y = u²(3 - 2u)`, flat at both ends
    Smoothstep = 2,
}

impl Easing {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            0 => Self::Linear,
            1 => Self::Quadratic,
            2 => Self::Smoothstep,
            _ => return None,
        })
    }

    #[inline]
    pub fn apply(self, u: f32) -> f32 {
        match self {
            Self::Linear => u,
            Self::Quadratic => u * (2.0 - u),
            Self::Smoothstep => u * u * (3.0 - 2.0 * u),
        }
    }
}
