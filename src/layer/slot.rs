use embassy_time::Duration;

use super::Layer;
use crate::color::Rgb;
use crate::pattern::{FiredPatterns, PatternSequencer};
use crate::player::{PulseEvent, PulsePair, PulseSpawner, PulseTraveler, RainbowSweep, RingWave, TwinkleField};
use crate::wave::WaveSynth;

/// Number of sequencers in a [`LayerSlot::Fired`] pool
pub const FIRED_PATTERN_SLOTS: usize = 4;

/// Number of pulses in a [`LayerSlot::Spawner`] pool
pub const PULSE_SPAWNER_SLOTS: usize = 12;

/// Layer slot - enum containing every generator that can be stacked
#[derive(Debug, Clone)]
pub enum LayerSlot<'a> {
    /// Playlist of on/off patterns
    Pattern(PatternSequencer<'a>),
    /// Momentary patterns fired by external events
    Fired(FiredPatterns<'a, FIRED_PATTERN_SLOTS>),
    /// Two-color harmonic wave
    Wave(WaveSynth),
    /// Single traveling pulse
    Pulse(PulseTraveler),
    /// Ping-pong pair of pulses
    PulsePair(PulsePair),
    /// Randomly launched pulses
    Spawner(PulseSpawner<PULSE_SPAWNER_SLOTS>),
    /// Ring pulse or radiating wave
    Ring(RingWave),
    Rainbow(RainbowSweep),
    Twinkle(TwinkleField),
}

impl Layer for PatternSequencer<'_> {
    fn update(&mut self, _dt: Duration) -> Option<PulseEvent> {
        self.advance_after_render();
        None
    }

    fn render(&mut self, out: &mut [Rgb]) {
        PatternSequencer::render(self, out);
    }

    fn start(&mut self) {
        self.reset();
    }

    fn stop(&mut self) {
        PatternSequencer::stop(self);
    }

    fn set_colors(&mut self, primary: Rgb, secondary: Rgb) {
        PatternSequencer::set_colors(self, primary, secondary);
    }

    fn fire_pattern(&mut self, index: usize) -> bool {
        PatternSequencer::fire_pattern(self, index)
    }

    fn is_finished(&self) -> bool {
        self.is_expired()
    }
}

impl<const N: usize> Layer for FiredPatterns<'_, N> {
    fn update(&mut self, _dt: Duration) -> Option<PulseEvent> {
        self.advance_after_render();
        None
    }

    fn render(&mut self, out: &mut [Rgb]) {
        FiredPatterns::render(self, out);
    }

    fn stop(&mut self) {
        FiredPatterns::stop(self);
    }

    fn set_colors(&mut self, primary: Rgb, secondary: Rgb) {
        FiredPatterns::set_colors(self, primary, secondary);
    }

    fn fire_pattern(&mut self, index: usize) -> bool {
        self.fire_default(index).is_some()
    }
}

impl Layer for WaveSynth {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        self.advance(dt);
        None
    }

    fn render(&mut self, out: &mut [Rgb]) {
        WaveSynth::render(self, out);
    }

    fn set_colors(&mut self, primary: Rgb, secondary: Rgb) {
        WaveSynth::set_colors(self, primary, secondary);
    }
}

impl Layer for PulseTraveler {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        self.advance(dt)
    }

    fn render(&mut self, out: &mut [Rgb]) {
        PulseTraveler::render(self, out);
    }

    fn start(&mut self) {
        PulseTraveler::start(self);
    }

    fn stop(&mut self) {
        PulseTraveler::stop(self);
    }

    fn set_colors(&mut self, primary: Rgb, _secondary: Rgb) {
        self.set_color(primary);
    }

    fn is_finished(&self) -> bool {
        PulseTraveler::is_finished(self)
    }
}

impl Layer for PulsePair {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        self.advance(dt);
        None
    }

    fn render(&mut self, out: &mut [Rgb]) {
        PulsePair::render(self, out);
    }

    fn start(&mut self) {
        PulsePair::start(self);
    }

    fn stop(&mut self) {
        PulsePair::stop(self);
    }

    fn set_colors(&mut self, primary: Rgb, _secondary: Rgb) {
        self.set_color(primary);
    }

    fn is_finished(&self) -> bool {
        !self.is_running()
    }
}

impl Layer for RingWave {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        let was_playing = self.is_playing();
        self.advance(dt);
        (was_playing && !self.is_playing()).then_some(PulseEvent::Finished)
    }

    fn render(&mut self, out: &mut [Rgb]) {
        RingWave::render(self, out);
    }

    fn start(&mut self) {
        RingWave::start(self);
    }

    fn stop(&mut self) {
        self.halt();
    }

    fn set_colors(&mut self, primary: Rgb, secondary: Rgb) {
        RingWave::set_colors(self, primary, secondary);
    }

    fn is_finished(&self) -> bool {
        !self.is_playing()
    }
}

impl Layer for RainbowSweep {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        self.advance(dt);
        None
    }

    fn render(&mut self, out: &mut [Rgb]) {
        RainbowSweep::render(self, out);
    }

    fn start(&mut self) {
        self.set_enabled(true);
    }

    fn stop(&mut self) {
        self.set_enabled(false);
    }
}

impl Layer for TwinkleField {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        self.advance(dt);
        None
    }

    fn render(&mut self, out: &mut [Rgb]) {
        TwinkleField::render(self, out);
    }

    fn start(&mut self) {
        TwinkleField::start(self);
    }

    fn stop(&mut self) {
        TwinkleField::stop(self);
    }

    fn is_finished(&self) -> bool {
        TwinkleField::is_finished(self)
    }
}

impl<const N: usize> Layer for PulseSpawner<N> {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        self.advance(dt);
        None
    }

    fn render(&mut self, out: &mut [Rgb]) {
        PulseSpawner::render(self, out);
    }

    fn start(&mut self) {
        PulseSpawner::start(self);
    }

    fn stop(&mut self) {
        PulseSpawner::stop(self);
    }

    fn is_finished(&self) -> bool {
        PulseSpawner::is_finished(self)
    }
}

impl Layer for LayerSlot<'_> {
    fn update(&mut self, dt: Duration) -> Option<PulseEvent> {
        match self {
            Self::Pattern(layer) => Layer::update(layer, dt),
            Self::Fired(layer) => Layer::update(layer, dt),
            Self::Wave(layer) => Layer::update(layer, dt),
            Self::Pulse(layer) => Layer::update(layer, dt),
            Self::PulsePair(layer) => Layer::update(layer, dt),
            Self::Spawner(layer) => Layer::update(layer, dt),
            Self::Ring(layer) => Layer::update(layer, dt),
            Self::Rainbow(layer) => Layer::update(layer, dt),
            Self::Twinkle(layer) => Layer::update(layer, dt),
        }
    }

    fn render(&mut self, out: &mut [Rgb]) {
        match self {
            Self::Pattern(layer) => Layer::render(layer, out),
            Self::Fired(layer) => Layer::render(layer, out),
            Self::Wave(layer) => Layer::render(layer, out),
            Self::Pulse(layer) => Layer::render(layer, out),
            Self::PulsePair(layer) => Layer::render(layer, out),
            Self::Spawner(layer) => Layer::render(layer, out),
            Self::Ring(layer) => Layer::render(layer, out),
            Self::Rainbow(layer) => Layer::render(layer, out),
            Self::Twinkle(layer) => Layer::render(layer, out),
        }
    }

    fn start(&mut self) {
        match self {
            Self::Pattern(layer) => Layer::start(layer),
            Self::Fired(layer) => Layer::start(layer),
            Self::Wave(layer) => Layer::start(layer),
            Self::Pulse(layer) => Layer::start(layer),
            Self::PulsePair(layer) => Layer::start(layer),
            Self::Spawner(layer) => Layer::start(layer),
            Self::Ring(layer) => Layer::start(layer),
            Self::Rainbow(layer) => Layer::start(layer),
            Self::Twinkle(layer) => Layer::start(layer),
        }
    }

    fn stop(&mut self) {
        match self {
            Self::Pattern(layer) => Layer::stop(layer),
            Self::Fired(layer) => Layer::stop(layer),
            Self::Wave(layer) => Layer::stop(layer),
            Self::Pulse(layer) => Layer::stop(layer),
            Self::PulsePair(layer) => Layer::stop(layer),
            Self::Spawner(layer) => Layer::stop(layer),
            Self::Ring(layer) => Layer::stop(layer),
            Self::Rainbow(layer) => Layer::stop(layer),
            Self::Twinkle(layer) => Layer::stop(layer),
        }
    }

    fn set_colors(&mut self, primary: Rgb, secondary: Rgb) {
        match self {
            Self::Pattern(layer) => Layer::set_colors(layer, primary, secondary),
            Self::Fired(layer) => Layer::set_colors(layer, primary, secondary),
            Self::Wave(layer) => Layer::set_colors(layer, primary, secondary),
            Self::Pulse(layer) => Layer::set_colors(layer, primary, secondary),
            Self::PulsePair(layer) => Layer::set_colors(layer, primary, secondary),
            Self::Spawner(layer) => Layer::set_colors(layer, primary, secondary),
            Self::Ring(layer) => Layer::set_colors(layer, primary, secondary),
            Self::Rainbow(layer) => Layer::set_colors(layer, primary, secondary),
            Self::Twinkle(layer) => Layer::set_colors(layer, primary, secondary),
        }
    }

    fn fire_pattern(&mut self, index: usize) -> bool {
        match self {
            Self::Pattern(layer) => Layer::fire_pattern(layer, index),
            Self::Fired(layer) => Layer::fire_pattern(layer, index),
            _ => false,
        }
    }

    fn is_finished(&self) -> bool {
        match self {
            Self::Pattern(layer) => Layer::is_finished(layer),
            Self::Fired(layer) => Layer::is_finished(layer),
            Self::Wave(layer) => Layer::is_finished(layer),
            Self::Pulse(layer) => Layer::is_finished(layer),
            Self::PulsePair(layer) => Layer::is_finished(layer),
            Self::Spawner(layer) => Layer::is_finished(layer),
            Self::Ring(layer) => Layer::is_finished(layer),
            Self::Rainbow(layer) => Layer::is_finished(layer),
            Self::Twinkle(layer) => Layer::is_finished(layer),
        }
    }
}
