//! Randomly spawned stars fading in and out
//!
//! Stars live in a fixed pool, so the worst-case cost of a tick is bounded
//! by [`MAX_STARS`] no matter how eagerly they spawn.

#[cfg(feature = "esp32-log")]
use esp_println::println;

use embassy_time::Duration;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::bounds::LedRange;
use crate::color::{BLACK, Hsv, Rgb, hsv2rgb, scale_rgb};
use crate::math::seconds;

use super::random_between;

/// Capacity of the star pool
pub const MAX_STARS: usize = 20;

/// How new stars are triggered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnPolicy {
    /// Each tick spawns a star with probability `star_chance`
    #[default]
    Chance,
    /// A star spawns every `[min_spawn_time, max_spawn_time]` seconds
    Timer,
}

/// One light of the twinkle field
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    pub led_index: usize,
    /// Seconds spent in the current phase
    pub timer: f32,
    /// Seconds the star fades in before fading out
    pub duration: f32,
    pub active: bool,
    pub color: Rgb,
    /// Current brightness in `[0, 1]`
    pub brightness: f32,
    pub fading_out: bool,
}

impl Star {
    const IDLE: Self = Self {
        led_index: 0,
        timer: 0.0,
        duration: 0.0,
        active: false,
        color: BLACK,
        brightness: 0.0,
        fading_out: false,
    };
}

#[derive(Debug, Clone, Copy)]
pub struct TwinkleConfig {
    pub range: LedRange,
    pub policy: SpawnPolicy,
    /// Spawn probability per tick, `[0, 1]`
    pub star_chance: f32,
    pub min_duration: f32,
    pub max_duration: f32,
    pub min_spawn_time: f32,
    pub max_spawn_time: f32,
    /// Peak brightness of a star, `[0, 1]`
    pub max_brightness: f32,
    /// Brightness gained per second while fading in
    pub fade_in_speed: f32,
    /// Brightness lost per second while fading out
    pub fade_out_speed: f32,
    pub seed: u64,
}

impl TwinkleConfig {
    pub const fn new(num_lights: usize) -> Self {
        Self {
            range: LedRange::full(num_lights),
            policy: SpawnPolicy::Chance,
            star_chance: 0.1,
            min_duration: 0.5,
            max_duration: 2.0,
            min_spawn_time: 0.1,
            max_spawn_time: 0.5,
            max_brightness: 1.0,
            fade_in_speed: 2.0,
            fade_out_speed: 1.0,
            seed: 0x5EED_F1E1D,
        }
    }

    #[must_use]
    pub const fn with_policy(mut self, policy: SpawnPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub const fn with_star_chance(mut self, star_chance: f32) -> Self {
        self.star_chance = star_chance;
        self
    }
}

impl Default for TwinkleConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Pool of twinkling stars over a range of lights
#[derive(Debug, Clone)]
pub struct TwinkleField {
    stars: [Star; MAX_STARS],
    active_count: usize,
    range: LedRange,
    policy: SpawnPolicy,
    star_chance: f32,
    min_duration: f32,
    max_duration: f32,
    min_spawn_time: f32,
    max_spawn_time: f32,
    max_brightness: f32,
    fade_in_speed: f32,
    fade_out_speed: f32,
    spawn_timer: f32,
    next_spawn: Option<f32>,
    playing: bool,
    rng: Pcg32,
}

impl TwinkleField {
    pub fn new(config: &TwinkleConfig) -> Self {
        let mut field = Self {
            stars: [Star::IDLE; MAX_STARS],
            active_count: 0,
            range: config.range,
            policy: config.policy,
            star_chance: 0.0,
            min_duration: 0.0,
            max_duration: 0.0,
            min_spawn_time: 0.0,
            max_spawn_time: 0.0,
            max_brightness: 1.0,
            fade_in_speed: 0.0,
            fade_out_speed: 0.0,
            spawn_timer: 0.0,
            next_spawn: None,
            playing: true,
            rng: Pcg32::seed_from_u64(config.seed),
        };
        field.set_star_chance(config.star_chance);
        field.set_duration_range(config.min_duration, config.max_duration);
        field.set_spawn_time_range(config.min_spawn_time, config.max_spawn_time);
        field.set_star_brightness(config.max_brightness);
        field.set_fade_speeds(config.fade_in_speed, config.fade_out_speed);
        field
    }

    /// Clear every star and resume playing
    pub fn start(&mut self) {
        self.stars = [Star::IDLE; MAX_STARS];
        self.active_count = 0;
        self.spawn_timer = 0.0;
        self.next_spawn = None;
        self.playing = true;
    }

    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// The field runs until stopped; an empty pool does not finish it
    pub const fn is_finished(&self) -> bool {
        !self.playing
    }

    pub const fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn set_policy(&mut self, policy: SpawnPolicy) {
        self.policy = policy;
    }

    pub fn set_range(&mut self, range: LedRange) {
        self.range = range;
    }

    pub fn set_star_chance(&mut self, chance: f32) {
        self.star_chance = chance.clamp(0.0, 1.0);
    }

    pub fn set_duration_range(&mut self, min: f32, max: f32) {
        self.min_duration = min.max(0.0);
        self.max_duration = max.max(self.min_duration);
    }

    pub fn set_spawn_time_range(&mut self, min: f32, max: f32) {
        self.min_spawn_time = min.max(0.0);
        self.max_spawn_time = max.max(self.min_spawn_time);
        self.next_spawn = None;
    }

    pub fn set_star_brightness(&mut self, brightness: f32) {
        self.max_brightness = brightness.clamp(0.0, 1.0);
    }

    pub fn set_fade_speeds(&mut self, fade_in: f32, fade_out: f32) {
        self.fade_in_speed = fade_in.max(0.0);
        self.fade_out_speed = fade_out.max(0.0);
    }

    /// Age every star, then try to spawn one
    pub fn advance(&mut self, dt: Duration) {
        if !self.playing {
            return;
        }
        let dt = seconds(dt);

        for star in self.stars.iter_mut().filter(|star| star.active) {
            star.timer += dt;
            if star.fading_out {
                star.brightness -= self.fade_out_speed * dt;
                if star.brightness <= 0.0 {
                    *star = Star::IDLE;
                    self.active_count -= 1;
                }
            } else {
                star.brightness = (star.brightness + self.fade_in_speed * dt).min(self.max_brightness);
                if star.timer >= star.duration {
                    star.fading_out = true;
                    star.timer = 0.0;
                }
            }
        }

        match self.policy {
            SpawnPolicy::Chance => {
                if self.rng.random::<f32>() < self.star_chance {
                    self.spawn();
                }
            }
            SpawnPolicy::Timer => {
                let next = match self.next_spawn {
                    Some(next) => next,
                    None => self.draw_spawn_time(),
                };
                self.next_spawn = Some(next);
                self.spawn_timer += dt;
                if self.spawn_timer >= next && self.spawn() {
                    self.spawn_timer = 0.0;
                    self.next_spawn = Some(self.draw_spawn_time());
                }
            }
        }
    }

    /// Paint active stars; other lights are untouched
    pub fn render(&self, leds: &mut [Rgb]) {
        if !self.playing {
            return;
        }
        for star in self.stars.iter().filter(|star| star.active) {
            if let Some(led) = leds.get_mut(star.led_index) {
                *led = scale_rgb(star.color, star.brightness);
            }
        }
    }

    pub fn update(&mut self, dt: Duration, leds: &mut [Rgb]) {
        self.advance(dt);
        self.render(leds);
    }

    /// Fill the first free slot, `false` when the pool is full
    fn spawn(&mut self) -> bool {
        if self.active_count >= MAX_STARS || self.range.is_empty() {
            return false;
        }
        let Some(slot) = self.stars.iter().position(|star| !star.active) else {
            return false;
        };
        let led_index = self.rng.random_range(self.range.start()..=self.range.end());
        let duration = self.draw_between(self.min_duration, self.max_duration);
        let color = self.star_color();
        self.stars[slot] = Star {
            led_index,
            timer: 0.0,
            duration,
            active: true,
            color,
            brightness: 0.0,
            fading_out: false,
        };
        self.active_count += 1;
        #[cfg(feature = "esp32-log")]
        println!(
            "[TwinkleField.spawn] star {} at led {} for {}s",
            slot, led_index, duration
        );
        true
    }

    /// Warm red-yellow or cool blue-cyan, strongly saturated
    fn star_color(&mut self) -> Rgb {
        let mut hue = self.rng.random_range(0..40u8);
        if self.rng.random_bool(0.5) {
            hue = self.rng.random_range(160..200u8);
        }
        let sat = self.rng.random_range(100..255u8);
        hsv2rgb(Hsv { hue, sat, val: 255 })
    }

    fn draw_spawn_time(&mut self) -> f32 {
        self.draw_between(self.min_spawn_time, self.max_spawn_time)
    }

    fn draw_between(&mut self, min: f32, max: f32) -> f32 {
        random_between(&mut self.rng, min, max)
    }
}
