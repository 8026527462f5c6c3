#[cfg(feature = "esp32-log")]
use esp_println::println;

use super::{PatternSequencer, PatternStep, PlaylistFull, SequencerConfig};
use crate::color::Rgb;

/// Pool of overlay sequencers for momentary, event-triggered patterns
///
/// All sequencers share one playlist. Each fired pattern plays once on the
/// first free sequencer and draws only its "on" cells.
#[derive(Debug, Clone)]
pub struct FiredPatterns<'a, const N: usize> {
    players: [PatternSequencer<'a>; N],
    on: Rgb,
    off: Rgb,
}

impl<'a, const N: usize> FiredPatterns<'a, N> {
    pub fn new(config: SequencerConfig, steps: &[PatternStep]) -> Result<Self, PlaylistFull> {
        let config = config.with_draw_off(false).with_repeat(false);
        let mut playlist = PatternSequencer::new(config);
        playlist.set_playlist(steps)?;
        playlist.stop();
        Ok(Self {
            players: core::array::from_fn(|_| playlist.clone()),
            on: config.on,
            off: config.off,
        })
    }

    /// Colors used by [`Self::fire_default`]
    pub fn set_colors(&mut self, on: Rgb, off: Rgb) {
        self.on = on;
        self.off = off;
    }

    /// Fire playlist entry `index` in the pool's current colors
    pub fn fire_default(&mut self, index: usize) -> Option<usize> {
        self.fire(index, self.on, self.off)
    }

    /// Fire playlist entry `index` in the given colors
    ///
    /// Returns the slot that took it, or `None` when every slot is busy or
    /// the index is outside the playlist.
    pub fn fire(&mut self, index: usize, on: Rgb, off: Rgb) -> Option<usize> {
        let slot = self
            .players
            .iter()
            .position(|player| !player.is_playing_single_pattern())?;
        let player = &mut self.players[slot];
        if !player.fire_pattern(index) {
            return None;
        }
        player.set_colors(on, off);
        player.set_draw_off(false);
        Some(slot)
    }

    /// Number of patterns still playing
    pub fn active(&self) -> usize {
        self.players
            .iter()
            .filter(|player| player.is_playing_single_pattern())
            .count()
    }

    pub fn players(&self) -> &[PatternSequencer<'a>] {
        &self.players
    }

    pub fn render(&mut self, leds: &mut [Rgb]) {
        for player in self.players.iter_mut().filter(|p| p.is_playing_single_pattern()) {
            player.render(leds);
        }
    }

    pub fn advance(&mut self) {
        for player in &mut self.players {
            player.advance();
        }
    }

    pub fn update(&mut self, leds: &mut [Rgb]) {
        self.render(leds);
        self.advance();
    }

    pub(crate) fn advance_after_render(&mut self) {
        for player in &mut self.players {
            player.advance_after_render();
        }
    }

    /// Cancel everything in flight
    pub fn stop(&mut self) {
        for player in &mut self.players {
            player.stop();
        }
        #[cfg(feature = "esp32-log")]
        println!("[FiredPatterns.stop] cleared {} slots", N);
    }
}
