use embassy_time::Duration;

use crate::bounds::LedRange;
use crate::color::{Hsv, Rgb, hsv2rgb};
use crate::math::{seconds, wrap};

/// Hue offset between neighboring lights
pub const RAINBOW_HUE_STEP: u8 = 5;

const HUE_CIRCLE: f32 = 256.0;

#[derive(Debug, Clone, Copy)]
pub struct RainbowConfig {
    pub range: LedRange,
    /// Hue rotations per second
    pub speed: f32,
    /// Measure hue offsets from the end of the range instead of the start
    pub reverse: bool,
    pub enabled: bool,
}

impl RainbowConfig {
    /// Sweep over a whole strip
    pub const fn new(num_lights: usize) -> Self {
        Self {
            range: LedRange::full(num_lights),
            speed: 1.0,
            reverse: false,
            enabled: true,
        }
    }

    #[must_use]
    pub const fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub const fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }

    #[must_use]
    pub const fn with_range(mut self, start: usize, end: usize) -> Self {
        self.range = LedRange::new(start, end, self.range.total());
        self
    }
}

impl Default for RainbowConfig {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Full-saturation rainbow scrolling across a range of lights
///
/// Overwrites every light in its range; lights outside are untouched.
#[derive(Debug, Clone)]
pub struct RainbowSweep {
    range: LedRange,
    speed: f32,
    reverse: bool,
    enabled: bool,
    hue: f32,
}

impl RainbowSweep {
    pub fn new(config: RainbowConfig) -> Self {
        Self {
            range: config.range,
            speed: config.speed,
            reverse: config.reverse,
            enabled: config.enabled,
            hue: 0.0,
        }
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_speed(&mut self, speed: f32) {
        self.speed = speed;
    }

    pub fn set_hue(&mut self, hue: u8) {
        self.hue = f32::from(hue);
    }

    /// Base hue currently applied at the reference edge
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn hue(&self) -> u8 {
        self.hue as u8
    }

    pub fn set_direction(&mut self, reverse: bool) {
        self.reverse = reverse;
    }

    pub const fn range(&self) -> LedRange {
        self.range
    }

    pub fn set_start(&mut self, start: usize) {
        self.range = self.range.with_start(start);
    }

    pub fn set_end(&mut self, end: usize) {
        self.range = self.range.with_end(end);
    }

    pub fn set_num_lights(&mut self, total: usize) {
        self.range = self.range.with_total(total);
    }

    /// Hue of light `index` for the current base hue
    #[allow(clippy::cast_possible_truncation)]
    pub fn hue_at(&self, index: usize) -> u8 {
        let position = if self.reverse {
            self.range.end().saturating_sub(index)
        } else {
            index.saturating_sub(self.range.start())
        };
        let offset = (position % 256) as u8;
        self.hue().wrapping_add(offset.wrapping_mul(RAINBOW_HUE_STEP))
    }

    /// Rotate the base hue by `speed * 255 * dt`
    pub fn advance(&mut self, dt: Duration) {
        if !self.enabled {
            return;
        }
        self.hue = wrap(self.hue + self.speed * 255.0 * seconds(dt), HUE_CIRCLE);
    }

    pub fn render(&self, leds: &mut [Rgb]) {
        if !self.enabled {
            return;
        }
        for index in self.range.indices() {
            let Some(led) = leds.get_mut(index) else {
                break;
            };
            *led = hsv2rgb(Hsv {
                hue: self.hue_at(index),
                sat: 255,
                val: 255,
            });
        }
    }

    pub fn update(&mut self, dt: Duration, leds: &mut [Rgb]) {
        self.advance(dt);
        self.render(leds);
    }
}
