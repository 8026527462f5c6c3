//! Procedural motion players
//!
//! Each player owns its own clock. `advance(dt)` moves the animation and
//! `render(leds)` paints the current state; `update(dt, leds)` does both.
//! Every write is bounds checked against the slice it is given.

mod pulse;
mod rainbow;
mod ring;
mod spawner;
mod twinkle;

pub use pulse::{MIN_PULSE_SPEED, PulseConfig, PulseEvent, PulsePair, PulseTraveler};
pub use rainbow::{RAINBOW_HUE_STEP, RainbowConfig, RainbowSweep};
pub use ring::{RingConfig, RingDirection, RingMode, RingWave};
pub use spawner::{PulseSpawner, PulseSpawnerConfig};
pub use twinkle::{MAX_STARS, SpawnPolicy, Star, TwinkleConfig, TwinkleField};

use rand::Rng;
use rand_pcg::Pcg32;

/// Uniform draw from `[min, max)`
fn random_between(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    min + (max - min) * rng.random::<f32>()
}
