//! Pool of pulses launched at random intervals
//!
//! Every launch draws a width, a speed, a direction and a hue from the
//! configured ranges. The pool is reused round-robin, so a new pulse may
//! replace one that is still on the strip.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use embassy_time::Duration;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::color::{Hsv, Rgb, hsv2rgb};
use crate::math::{Easing, seconds};

use super::{MIN_PULSE_SPEED, PulseConfig, PulseTraveler, random_between};

#[derive(Debug, Clone, Copy)]
pub struct PulseSpawnerConfig {
    pub num_lights: usize,
    /// Half-width range of launched pulses, in lights
    pub min_width: usize,
    pub max_width: usize,
    /// Speed magnitude range, in lights per second
    pub min_speed: f32,
    pub max_speed: f32,
    /// Seconds between launches
    pub min_spawn_time: f32,
    pub max_spawn_time: f32,
    pub min_hue: u8,
    pub max_hue: u8,
    pub easing: Easing,
    pub seed: u64,
}

impl PulseSpawnerConfig {
    pub const fn new(num_lights: usize) -> Self {
        Self {
            num_lights,
            min_width: 5,
            max_width: 16,
            min_speed: 16.0,
            max_speed: 92.0,
            min_spawn_time: 0.5,
            max_spawn_time: 6.0,
            min_hue: 0,
            max_hue: 255,
            easing: Easing::Linear,
            seed: 0x9015_E5EED,
        }
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_width_range(mut self, min: usize, max: usize) -> Self {
        self.min_width = min;
        self.max_width = max;
        self
    }

    #[must_use]
    pub const fn with_speed_range(mut self, min: f32, max: f32) -> Self {
        self.min_speed = min;
        self.max_speed = max;
        self
    }

    #[must_use]
    pub const fn with_spawn_time_range(mut self, min: f32, max: f32) -> Self {
        self.min_spawn_time = min;
        self.max_spawn_time = max;
        self
    }

    #[must_use]
    pub const fn with_hue_range(mut self, min: u8, max: u8) -> Self {
        self.min_hue = min;
        self.max_hue = max;
        self
    }
}

impl Default for PulseSpawnerConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// `N` one-shot pulses relaunched with random parameters
#[derive(Debug, Clone)]
pub struct PulseSpawner<const N: usize> {
    pulses: [PulseTraveler; N],
    next_slot: usize,
    num_lights: usize,
    min_width: usize,
    max_width: usize,
    min_speed: f32,
    max_speed: f32,
    min_spawn_time: f32,
    max_spawn_time: f32,
    min_hue: u8,
    max_hue: u8,
    spawn_timer: f32,
    next_spawn: f32,
    launched: u32,
    playing: bool,
    rng: Pcg32,
}

impl<const N: usize> PulseSpawner<N> {
    pub fn new(config: &PulseSpawnerConfig) -> Self {
        let template = PulseConfig {
            num_lights: config.num_lights,
            easing: config.easing,
            repeat: false,
            ..PulseConfig::default()
        };
        let mut spawner = Self {
            pulses: core::array::from_fn(|_| PulseTraveler::new(&template)),
            next_slot: 0,
            num_lights: config.num_lights,
            min_width: 1,
            max_width: 1,
            min_speed: MIN_PULSE_SPEED,
            max_speed: MIN_PULSE_SPEED,
            min_spawn_time: 0.0,
            max_spawn_time: 0.0,
            min_hue: 0,
            max_hue: 0,
            spawn_timer: 0.0,
            next_spawn: 0.0,
            launched: 0,
            playing: true,
            rng: Pcg32::seed_from_u64(config.seed),
        };
        spawner.set_width_range(config.min_width, config.max_width);
        spawner.set_speed_range(config.min_speed, config.max_speed);
        spawner.set_spawn_time_range(config.min_spawn_time, config.max_spawn_time);
        spawner.set_hue_range(config.min_hue, config.max_hue);
        spawner
    }

    /// Park every pulse and restart the launch timer
    pub fn start(&mut self) {
        for pulse in &mut self.pulses {
            pulse.stop();
        }
        self.next_slot = 0;
        self.spawn_timer = 0.0;
        self.next_spawn = self.draw_spawn_time();
        self.playing = true;
    }

    /// Park every pulse and stop launching
    pub fn stop(&mut self) {
        for pulse in &mut self.pulses {
            pulse.stop();
        }
        self.playing = false;
    }

    /// The spawner runs until stopped
    pub const fn is_finished(&self) -> bool {
        !self.playing
    }

    pub fn pulses(&self) -> &[PulseTraveler] {
        &self.pulses
    }

    /// Pulses currently on the strip
    pub fn active_count(&self) -> usize {
        self.pulses.iter().filter(|pulse| pulse.is_running()).count()
    }

    /// Launches since construction
    pub const fn launched(&self) -> u32 {
        self.launched
    }

    pub fn set_num_lights(&mut self, num_lights: usize) {
        self.num_lights = num_lights;
        for pulse in &mut self.pulses {
            pulse.set_num_lights(num_lights);
        }
    }

    pub fn set_width_range(&mut self, min: usize, max: usize) {
        self.min_width = min.max(1);
        self.max_width = max.max(self.min_width);
    }

    pub fn set_speed_range(&mut self, min: f32, max: f32) {
        self.min_speed = libm::fabsf(min).max(MIN_PULSE_SPEED);
        self.max_speed = libm::fabsf(max).max(self.min_speed);
    }

    /// Takes effect from the next launch
    pub fn set_spawn_time_range(&mut self, min: f32, max: f32) {
        self.min_spawn_time = min.max(0.0);
        self.max_spawn_time = max.max(self.min_spawn_time);
        self.next_spawn = self.draw_spawn_time();
    }

    pub fn set_hue_range(&mut self, min: u8, max: u8) {
        self.min_hue = min;
        self.max_hue = max.max(min);
    }

    /// Move every pulse, then launch one when the timer runs out
    pub fn advance(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        for pulse in &mut self.pulses {
            pulse.advance(dt);
        }
        self.spawn_timer += seconds(dt);
        if self.spawn_timer >= self.next_spawn && self.spawn() {
            self.spawn_timer = 0.0;
            self.next_spawn = self.draw_spawn_time();
        }
    }

    /// Blend every pulse on the strip into `leds`
    pub fn render(&self, leds: &mut [Rgb]) {
        if !self.playing {
            return;
        }
        for pulse in &self.pulses {
            pulse.render(leds);
        }
    }

    pub fn update(&mut self, dt: Duration, leds: &mut [Rgb]) {
        self.advance(dt);
        self.render(leds);
    }

    /// Relaunch the next slot, `false` with no lights or no slots
    fn spawn(&mut self) -> bool {
        if self.pulses.is_empty() || self.num_lights == 0 {
            return false;
        }
        let half_width = self.rng.random_range(self.min_width..=self.max_width);
        let mut speed = random_between(&mut self.rng, self.min_speed, self.max_speed);
        if self.rng.random_bool(0.5) {
            speed = -speed;
        }
        let hue = self.rng.random_range(self.min_hue..=self.max_hue);
        let color = hsv2rgb(Hsv { hue, sat: 255, val: 255 });

        let slot = self.next_slot;
        let Some(pulse) = self.pulses.get_mut(slot) else {
            return false;
        };
        pulse.set_half_width(half_width);
        pulse.set_speed(speed);
        pulse.set_color(color);
        pulse.start();
        self.next_slot = (slot + 1) % self.pulses.len();
        self.launched += 1;
        #[cfg(feature = "esp32-log")]
        println!(
            "[PulseSpawner.spawn] slot {} width {} speed {} hue {}",
            slot, half_width, speed, hue
        );
        true
    }

    fn draw_spawn_time(&mut self) -> f32 {
        random_between(&mut self.rng, self.min_spawn_time, self.max_spawn_time)
    }
}
