#[cfg(feature = "esp32-log")]
use esp_println::println;

use heapless::Vec;

use super::{MAX_PATTERN_STEPS, PatternBitmap, PatternStep, pattern_length, pattern_state};
use crate::bounds::{Grid, GridPlacement};
use crate::color::{BLACK, Rgb, WHITE};

/// Error returned when a playlist does not fit in [`MAX_PATTERN_STEPS`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaylistFull;

/// Playback position of a sequencer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequencerCursor {
    /// Updates spent on the current step
    pub step_timer: usize,
    /// Step within the current pattern
    pub step_iter: usize,
    /// Index of the current playlist entry
    pub pattern_iter: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Playback {
    /// Walking the playlist
    Playlist,
    /// Playing one fired pattern, idle once it ends
    SinglePattern,
    Idle,
}

#[derive(Debug, Clone, Copy)]
pub struct SequencerConfig {
    /// Shape of the sequenced area
    pub grid: Grid,
    pub on: Rgb,
    pub off: Rgb,
    /// Write the off color too; when `false` the sequencer is an overlay
    pub draw_off: bool,
    /// Restart the playlist after the last entry instead of going idle
    pub repeat: bool,
    /// Position inside a larger grid, `None` to map indices one to one
    pub placement: Option<GridPlacement>,
}

impl Default for SequencerConfig {
    fn default() -> Self {
        Self {
            grid: Grid::strip(0),
            on: WHITE,
            off: BLACK,
            draw_off: true,
            repeat: true,
            placement: None,
        }
    }
}

impl SequencerConfig {
    #[must_use]
    pub fn with_grid(mut self, rows: usize, cols: usize) -> Self {
        self.grid = Grid::new(rows, cols);
        self
    }

    #[must_use]
    pub fn with_colors(mut self, on: Rgb, off: Rgb) -> Self {
        self.on = on;
        self.off = off;
        self
    }

    #[must_use]
    pub fn with_draw_off(mut self, draw_off: bool) -> Self {
        self.draw_off = draw_off;
        self
    }

    #[must_use]
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    #[must_use]
    pub fn with_placement(mut self, placement: GridPlacement) -> Self {
        self.placement = Some(placement);
        self
    }
}

/// Plays a playlist of [`PatternStep`]s over a grid of lights
///
/// Each `update` paints the current step and then advances the cursor by one
/// tick. Timing is counted in updates, not wall time.
#[derive(Debug, Clone)]
pub struct PatternSequencer<'a> {
    steps: Vec<PatternStep, MAX_PATTERN_STEPS>,
    bitmap: Option<PatternBitmap<'a>>,
    config: SequencerConfig,
    cursor: SequencerCursor,
    playback: Playback,
    /// Set by `render`, consumed by `advance_after_render`
    rendered: bool,
}

impl<'a> PatternSequencer<'a> {
    /// Create a sequencer with an empty playlist
    pub fn new(config: SequencerConfig) -> Self {
        Self {
            steps: Vec::new(),
            bitmap: None,
            config,
            cursor: SequencerCursor::default(),
            playback: Playback::Playlist,
            rendered: false,
        }
    }

    /// Create a sequencer and install its playlist
    pub fn with_playlist(config: SequencerConfig, steps: &[PatternStep]) -> Result<Self, PlaylistFull> {
        let mut sequencer = Self::new(config);
        sequencer.set_playlist(steps)?;
        Ok(sequencer)
    }

    /// Replace the playlist and rewind
    pub fn set_playlist(&mut self, steps: &[PatternStep]) -> Result<(), PlaylistFull> {
        self.steps = Vec::from_slice(steps).map_err(|()| PlaylistFull)?;
        self.reset();
        Ok(())
    }

    #[must_use]
    pub fn with_bitmap(mut self, bitmap: PatternBitmap<'a>) -> Self {
        self.bitmap = Some(bitmap);
        self
    }

    pub fn set_bitmap(&mut self, bitmap: Option<PatternBitmap<'a>>) {
        self.bitmap = bitmap;
    }

    /// Rewind the cursor and resume playlist playback
    pub fn reset(&mut self) {
        self.cursor = SequencerCursor::default();
        self.playback = Playback::Playlist;
        self.rendered = false;
    }

    /// Stop drawing until the next `reset` or `fire_pattern`
    pub fn stop(&mut self) {
        self.cursor = SequencerCursor::default();
        self.playback = Playback::Idle;
    }

    /// Jump to a playlist entry and play it once
    ///
    /// Returns `false` when `index` is outside the playlist.
    pub fn fire_pattern(&mut self, index: usize) -> bool {
        if index >= self.steps.len() {
            return false;
        }
        self.cursor = SequencerCursor {
            pattern_iter: index,
            ..SequencerCursor::default()
        };
        self.playback = Playback::SinglePattern;
        self.rendered = false;
        true
    }

    pub fn is_playing_single_pattern(&self) -> bool {
        self.playback == Playback::SinglePattern
    }

    /// Whether playback has run out (non-repeating playlist or fired pattern)
    pub fn is_expired(&self) -> bool {
        self.playback == Playback::Idle
    }

    pub const fn cursor(&self) -> SequencerCursor {
        self.cursor
    }

    pub fn steps(&self) -> &[PatternStep] {
        &self.steps
    }

    pub const fn grid(&self) -> Grid {
        self.config.grid
    }

    pub fn set_colors(&mut self, on: Rgb, off: Rgb) {
        self.config.on = on;
        self.config.off = off;
    }

    pub fn set_draw_off(&mut self, draw_off: bool) {
        self.config.draw_off = draw_off;
    }

    pub fn set_repeat(&mut self, repeat: bool) {
        self.config.repeat = repeat;
    }

    pub fn set_placement(&mut self, placement: Option<GridPlacement>) {
        self.config.placement = placement;
    }

    /// Length of the playlist entry under the cursor, 0 with no playlist
    pub fn current_length(&self) -> usize {
        self.steps
            .get(self.cursor.pattern_iter)
            .map_or(0, |step| pattern_length(step, self.config.grid, self.bitmap_bits()))
    }

    /// Whether light `n` of the sequenced grid is on right now
    pub fn is_on(&self, n: usize) -> bool {
        if self.playback == Playback::Idle {
            return false;
        }
        self.steps.get(self.cursor.pattern_iter).is_some_and(|step| {
            pattern_state(
                step,
                n,
                self.cursor.step_iter,
                self.config.grid,
                self.bitmap.as_ref(),
            )
        })
    }

    /// Paint the current step into `leds` without advancing
    pub fn render(&mut self, leds: &mut [Rgb]) {
        self.rendered = true;
        if self.playback == Playback::Idle || self.steps.is_empty() {
            return;
        }

        for n in 0..self.config.grid.count() {
            let color = if self.is_on(n) {
                self.config.on
            } else if self.config.draw_off {
                self.config.off
            } else {
                continue;
            };
            let target = match self.config.placement {
                Some(placement) => placement.target_index(self.config.grid, n),
                None => Some(n),
            };
            if let Some(led) = target.and_then(|index| leds.get_mut(index)) {
                *led = color;
            }
        }
    }

    /// Advance the cursor by one tick
    pub fn advance(&mut self) {
        if self.playback == Playback::Idle {
            return;
        }
        let Some(step) = self.steps.get(self.cursor.pattern_iter) else {
            return;
        };

        self.cursor.step_timer += 1;
        if self.cursor.step_timer < usize::from(step.step_pause.max(1)) {
            return;
        }
        self.cursor.step_timer = 0;

        self.cursor.step_iter += 1;
        if self.cursor.step_iter < self.current_length() {
            return;
        }
        self.cursor.step_iter = 0;

        match self.playback {
            Playback::SinglePattern => {
                self.playback = Playback::Idle;
                #[cfg(feature = "esp32-log")]
                println!(
                    "[PatternSequencer.advance] fired pattern {} finished",
                    self.cursor.pattern_iter
                );
            }
            Playback::Playlist => {
                self.cursor.pattern_iter += 1;
                if self.cursor.pattern_iter >= self.steps.len() {
                    self.cursor.pattern_iter = 0;
                    if !self.config.repeat {
                        self.playback = Playback::Idle;
                    }
                    #[cfg(feature = "esp32-log")]
                    println!(
                        "[PatternSequencer.advance] playlist wrapped, repeat={}",
                        self.config.repeat
                    );
                }
            }
            Playback::Idle => {}
        }
    }

    /// Paint the current step, then advance
    pub fn update(&mut self, leds: &mut [Rgb]) {
        self.render(leds);
        self.advance();
    }

    /// Advance only if the current step has been shown at least once
    pub(crate) fn advance_after_render(&mut self) {
        if self.rendered {
            self.rendered = false;
            self.advance();
        }
    }

    fn bitmap_bits(&self) -> usize {
        self.bitmap.map_or(0, |bitmap| bitmap.bits())
    }
}
