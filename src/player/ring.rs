//! Expanding rings on a 2D grid
//!
//! A ring is centered at a fractional `(row, col)` and its radius grows as
//! `elapsed * speed`. In [`RingMode::Pulse`] a single band of light sweeps
//! outward once. In [`RingMode::Wave`] a traveling sinusoid radiates from
//! the center until it is stopped.

use core::f32::consts::TAU;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use embassy_time::Duration;

use crate::bounds::Grid;
use crate::color::{BLACK, Rgb, WHITE, lerp_rgb};
use crate::math::seconds;

use super::MIN_PULSE_SPEED;

/// Cells whose fade drops below this are not drawn
const MIN_FADE: f32 = 0.01;

/// Fraction of the ring width the pulse starts inside the center
const PULSE_LEAD_IN: f32 = 0.8;

const MIN_RING_SIZE: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RingMode {
    /// One band sweeping outward, then done
    #[default]
    Pulse,
    /// Continuous radiating wave
    Wave,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RingDirection {
    /// Wave crests move away from the center
    #[default]
    Outward,
    /// Wave crests move toward the center
    Inward,
}

impl RingDirection {
    const fn sign(self) -> f32 {
        match self {
            Self::Outward => 1.0,
            Self::Inward => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RingConfig {
    pub grid: Grid,
    pub hi: Rgb,
    /// Trough color, only used in wave mode
    pub lo: Rgb,
    pub center_row: f32,
    pub center_col: f32,
    /// Radius growth in grid units per second
    pub speed: f32,
    /// Band width in pulse mode, wavelength in wave mode
    pub ring_width: f32,
    /// Radius beyond which the ring fades out
    pub fade_radius: f32,
    /// Distance over which the fade reaches zero
    pub fade_width: f32,
    pub amplitude: f32,
    pub mode: RingMode,
    pub direction: RingDirection,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            grid: Grid::strip(0),
            hi: WHITE,
            lo: BLACK,
            center_row: 0.0,
            center_col: 0.0,
            speed: 10.0,
            ring_width: 2.0,
            fade_radius: 50.0,
            fade_width: 4.0,
            amplitude: 1.0,
            mode: RingMode::Pulse,
            direction: RingDirection::Outward,
        }
    }
}

/// Ring pulse or radiating ring wave
#[derive(Debug, Clone)]
pub struct RingWave {
    config: RingConfig,
    elapsed: f32,
    stop_time: f32,
    playing: bool,
    visible: bool,
    radiating: bool,
}

impl RingWave {
    pub fn new(config: RingConfig) -> Self {
        let mut ring = Self {
            config,
            elapsed: 0.0,
            stop_time: 0.0,
            playing: false,
            visible: false,
            radiating: false,
        };
        ring.sanitize();
        ring
    }

    /// Start a pulse just inside the center, or begin radiating
    pub fn start(&mut self) {
        self.stop_time = 0.0;
        self.visible = false;
        self.playing = true;
        match self.config.mode {
            RingMode::Pulse => {
                self.elapsed = -PULSE_LEAD_IN * self.config.ring_width / self.config.speed;
                self.radiating = false;
            }
            RingMode::Wave => {
                self.elapsed = 0.0;
                self.radiating = true;
            }
        }
    }

    /// Stop emitting; rings already out keep draining away from the center
    pub fn stop_wave(&mut self) {
        self.stop_time = 0.0;
        self.radiating = false;
    }

    /// Halt immediately
    pub fn halt(&mut self) {
        self.playing = false;
        self.radiating = false;
    }

    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    pub const fn is_visible(&self) -> bool {
        self.visible
    }

    pub const fn is_radiating(&self) -> bool {
        self.radiating
    }

    pub const fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Current radius of the ring center line
    pub fn radius(&self) -> f32 {
        self.config.speed * self.elapsed
    }

    pub fn set_center(&mut self, row: f32, col: f32) {
        self.config.center_row = row;
        self.config.center_col = col;
    }

    pub fn set_colors(&mut self, hi: Rgb, lo: Rgb) {
        self.config.hi = hi;
        self.config.lo = lo;
    }

    pub fn set_mode(&mut self, mode: RingMode) {
        self.config.mode = mode;
    }

    pub fn set_direction(&mut self, direction: RingDirection) {
        self.config.direction = direction;
    }

    /// Set motion and fade; the speed magnitude is used, see [`RingDirection`]
    pub fn set_ring_props(&mut self, speed: f32, ring_width: f32, fade_radius: f32, fade_width: f32) {
        self.config.speed = speed;
        self.config.ring_width = ring_width;
        self.config.fade_radius = fade_radius;
        self.config.fade_width = fade_width;
        self.sanitize();
    }

    /// Advance the clock and settle whether the animation is complete
    pub fn advance(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        let dt = seconds(dt);
        self.elapsed += dt;
        if self.config.mode == RingMode::Wave && !self.radiating {
            self.stop_time += dt;
        }

        let assigned = (0..self.config.grid.count()).any(|n| self.weight(self.distance(n)).is_some());
        if assigned {
            self.visible = true;
        }

        let done = match self.config.mode {
            RingMode::Pulse => {
                self.visible && (!assigned || self.radius() >= self.fade_limit())
            }
            RingMode::Wave => self.visible && !assigned,
        };
        if done {
            self.playing = false;
            #[cfg(feature = "esp32-log")]
            println!("[RingWave.advance] ring complete after {}s", self.elapsed);
        }
    }

    /// Blend the current ring into `leds`
    pub fn render(&self, leds: &mut [Rgb]) {
        if !self.playing {
            return;
        }
        let count = self.config.grid.count().min(leds.len());
        for (n, led) in leds.iter_mut().enumerate().take(count) {
            let Some(u) = self.weight(self.distance(n)) else {
                continue;
            };
            *led = if u >= 0.0 {
                lerp_rgb(*led, self.config.hi, u)
            } else {
                lerp_rgb(*led, self.config.lo, -u)
            };
        }
    }

    pub fn update(&mut self, dt: Duration, leds: &mut [Rgb]) {
        self.advance(dt);
        self.render(leds);
    }

    fn distance(&self, n: usize) -> f32 {
        let grid = self.config.grid;
        let dy = self.config.center_row - grid.row_of(n) as f32;
        let dx = self.config.center_col - grid.col_of(n) as f32;
        libm::hypotf(dx, dy)
    }

    fn fade_limit(&self) -> f32 {
        self.config.fade_radius + self.config.fade_width
    }

    /// Signed blend weight of a cell at distance `d`, `None` when untouched
    fn weight(&self, d: f32) -> Option<f32> {
        match self.config.mode {
            RingMode::Pulse => self.pulse_weight(d),
            RingMode::Wave => self.wave_weight(d),
        }
    }

    fn pulse_weight(&self, d: f32) -> Option<f32> {
        let half_width = 0.5 * self.config.ring_width;
        let offset = libm::fabsf(d - self.radius());
        if offset > half_width {
            return None;
        }
        let mut fade = 1.0;
        if d > self.config.fade_radius {
            fade = (self.fade_limit() - d) / self.config.fade_width;
            if fade < MIN_FADE {
                return None;
            }
        }
        Some((1.0 - offset / half_width) * self.config.amplitude * fade)
    }

    fn wave_weight(&self, d: f32) -> Option<f32> {
        let limit = self.fade_limit();
        let radius = self.radius().min(limit);
        if d > radius || d > limit {
            return None;
        }
        if !self.radiating && d < self.config.speed * self.stop_time {
            return None;
        }
        let mut fade = 1.0;
        if d > self.config.fade_radius {
            fade = (limit - d) / limit;
            if fade < MIN_FADE {
                return None;
            }
        }
        let k = TAU / self.config.ring_width;
        let omega = k * self.config.speed;
        let phase = k * d - self.config.direction.sign() * omega * self.elapsed;
        Some(-self.config.amplitude * libm::sinf(phase) * fade)
    }

    fn sanitize(&mut self) {
        self.config.speed = libm::fabsf(self.config.speed).max(MIN_PULSE_SPEED);
        self.config.ring_width = libm::fabsf(self.config.ring_width).max(MIN_RING_SIZE);
        self.config.fade_width = libm::fabsf(self.config.fade_width).max(MIN_RING_SIZE);
    }
}
