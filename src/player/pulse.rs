//! A colored pulse traveling along a strip
//!
//! The pulse is drawn over whatever the buffer already holds: each covered
//! light is interpolated from its current color toward the pulse color by an
//! eased profile that peaks at the pulse center.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use embassy_time::Duration;

use crate::color::{Rgb, WHITE, lerp_rgb};
use crate::math::{Easing, away_from_zero, seconds};

/// Smallest pulse speed magnitude, in lights per second
pub const MIN_PULSE_SPEED: f32 = 1e-3;

/// Notification raised by [`PulseTraveler::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PulseEvent {
    /// A one-shot pulse left the strip and parked
    Finished,
}

#[derive(Debug, Clone, Copy)]
pub struct PulseConfig {
    pub color: Rgb,
    /// Lights on each side of the center, at least 1
    pub half_width: usize,
    /// Lights per second; negative travels toward index 0
    pub speed: f32,
    /// Re-enter from the starting edge instead of parking
    pub repeat: bool,
    pub easing: Easing,
    /// Length of the strip the pulse travels over
    pub num_lights: usize,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            color: WHITE,
            half_width: 4,
            speed: 10.0,
            repeat: false,
            easing: Easing::Linear,
            num_lights: 0,
        }
    }
}

/// Single traveling pulse
#[derive(Debug, Clone)]
pub struct PulseTraveler {
    color: Rgb,
    half_width: usize,
    speed: f32,
    repeat: bool,
    easing: Easing,
    num_lights: usize,
    elapsed: f32,
    running: bool,
}

impl PulseTraveler {
    /// Create a parked pulse; call [`Self::start`] to launch it
    pub fn new(config: &PulseConfig) -> Self {
        let mut pulse = Self {
            color: config.color,
            half_width: config.half_width.max(1),
            speed: away_from_zero(config.speed, MIN_PULSE_SPEED),
            repeat: config.repeat,
            easing: config.easing,
            num_lights: config.num_lights,
            elapsed: 0.0,
            running: false,
        };
        pulse.park();
        pulse
    }

    /// Launch from the entry edge
    pub fn start(&mut self) {
        self.elapsed = 0.0;
        self.running = true;
    }

    /// Park immediately without raising [`PulseEvent::Finished`]
    pub fn stop(&mut self) {
        self.running = false;
        self.park();
    }

    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn is_finished(&self) -> bool {
        !self.running
    }

    pub const fn speed(&self) -> f32 {
        self.speed
    }

    pub const fn half_width(&self) -> usize {
        self.half_width
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Set the speed; magnitudes below [`MIN_PULSE_SPEED`] are raised to it
    pub fn set_speed(&mut self, speed: f32) {
        self.speed = away_from_zero(speed, MIN_PULSE_SPEED);
    }

    pub fn set_half_width(&mut self, half_width: usize) {
        self.half_width = half_width.max(1);
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.repeat = repeat;
    }

    pub fn set_easing(&mut self, easing: Easing) {
        self.easing = easing;
    }

    pub fn set_num_lights(&mut self, num_lights: usize) {
        self.num_lights = num_lights;
    }

    /// Fractional index of the pulse center
    pub fn center(&self) -> f32 {
        let travelled = self.elapsed * self.speed;
        if self.speed > 0.0 {
            travelled
        } else {
            (self.num_lights as f32 - 1.0) + travelled
        }
    }

    /// Advance the pulse clock
    ///
    /// Returns [`PulseEvent::Finished`] exactly once per one-shot traversal,
    /// on the tick the pulse leaves the strip.
    pub fn advance(&mut self, dt: Duration) -> Option<PulseEvent> {
        if !self.running {
            return None;
        }
        self.elapsed += seconds(dt);
        if self.elapsed * libm::fabsf(self.speed) < self.exit_distance() {
            return None;
        }

        if self.repeat {
            self.elapsed = -(self.half_width as f32) / libm::fabsf(self.speed);
            return None;
        }

        self.running = false;
        self.park();
        #[cfg(feature = "esp32-log")]
        println!("[PulseTraveler.advance] pulse finished at speed {}", self.speed);
        Some(PulseEvent::Finished)
    }

    /// Blend the pulse into `leds`; nothing is drawn while parked
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    pub fn render(&self, leds: &mut [Rgb]) {
        if !self.running {
            return;
        }
        let limit = self.num_lights.min(leds.len()) as i64;
        let half_width = self.half_width as i64;
        let n0 = libm::floorf(self.center()) as i64 - half_width;

        for offset in 0..2 * half_width {
            let n = n0 + offset;
            if n < 0 || n >= limit {
                continue;
            }
            let u = if offset < half_width {
                (1 + offset) as f32 / half_width as f32
            } else {
                1.0 - (1 + offset - half_width) as f32 / half_width as f32
            };
            let y = self.easing.apply(u);
            let led = &mut leds[n as usize];
            *led = lerp_rgb(*led, self.color, y);
        }
    }

    /// Advance, then blend
    pub fn update(&mut self, dt: Duration, leds: &mut [Rgb]) -> Option<PulseEvent> {
        let event = self.advance(dt);
        self.render(leds);
        event
    }

    /// Distance travelled at which the pulse no longer covers any light
    fn exit_distance(&self) -> f32 {
        let half_width = self.half_width as f32;
        let num_lights = self.num_lights as f32;
        if self.speed > 0.0 {
            num_lights + half_width
        } else {
            num_lights - 1.0 + half_width
        }
    }

    fn park(&mut self) {
        self.elapsed = self.exit_distance() / libm::fabsf(self.speed);
    }
}

/// Two one-shot pulses bouncing back and forth
///
/// The forward pulse runs first; whenever one finishes, the other is
/// launched in the opposite direction.
#[derive(Debug, Clone)]
pub struct PulsePair {
    forward: PulseTraveler,
    backward: PulseTraveler,
    bounces: u32,
}

impl PulsePair {
    pub fn new(config: &PulseConfig) -> Self {
        let speed = libm::fabsf(config.speed);
        let forward = PulseConfig {
            speed,
            repeat: false,
            ..*config
        };
        let backward = PulseConfig {
            speed: -speed,
            ..forward
        };
        Self {
            forward: PulseTraveler::new(&forward),
            backward: PulseTraveler::new(&backward),
            bounces: 0,
        }
    }

    pub fn start(&mut self) {
        self.bounces = 0;
        self.backward.stop();
        self.forward.start();
    }

    pub fn stop(&mut self) {
        self.forward.stop();
        self.backward.stop();
    }

    pub const fn is_running(&self) -> bool {
        self.forward.is_running() || self.backward.is_running()
    }

    /// Number of hand-offs since the last start
    pub const fn bounces(&self) -> u32 {
        self.bounces
    }

    pub const fn forward(&self) -> &PulseTraveler {
        &self.forward
    }

    pub const fn backward(&self) -> &PulseTraveler {
        &self.backward
    }

    pub fn set_color(&mut self, color: Rgb) {
        self.forward.set_color(color);
        self.backward.set_color(color);
    }

    pub fn advance(&mut self, dt: Duration) {
        if self.forward.advance(dt) == Some(PulseEvent::Finished) {
            self.bounces += 1;
            self.backward.start();
        } else if self.backward.advance(dt) == Some(PulseEvent::Finished) {
            self.bounces += 1;
            self.forward.start();
        }
    }

    pub fn render(&self, leds: &mut [Rgb]) {
        self.forward.render(leds);
        self.backward.render(leds);
    }

    pub fn update(&mut self, dt: Duration, leds: &mut [Rgb]) {
        self.advance(dt);
        self.render(leds);
    }
}
