//! Layer compositor
//!
//! A [`LayerStack`] renders each enabled layer into a scratch buffer and
//! folds it into the output with the layer's [`BlendMode`](crate::BlendMode).
//! Stack order is part of the visual result: later layers always blend over
//! the accumulated output of earlier ones.

mod slot;
mod stack;

use embassy_time::Duration;

pub use slot::{FIRED_PATTERN_SLOTS, LayerSlot, PULSE_SPAWNER_SLOTS};
pub use stack::{LayerEvent, LayerStack, PlayerStack, StackedLayer};

use crate::color::Rgb;
use crate::player::PulseEvent;

/// A generator that can take part in a [`LayerStack`]
pub trait Layer {
    /// Advance internal time by one frame
    ///
    /// Returns [`PulseEvent::Finished`] on the frame a one-shot animation
    /// completes, and `None` otherwise.
    fn update(&mut self, dt: Duration) -> Option<PulseEvent>;

    /// Paint the current state into `out`
    ///
    /// `out` arrives cleared to black; overlay generators draw over that.
    fn render(&mut self, out: &mut [Rgb]);

    /// (Re)start the animation
    fn start(&mut self) {}

    /// Stop the animation
    fn stop(&mut self) {}

    /// Replace the layer colors; meaning is generator specific
    fn set_colors(&mut self, _primary: Rgb, _secondary: Rgb) {}

    /// Play a single pattern, `false` if the layer has no such pattern
    fn fire_pattern(&mut self, _index: usize) -> bool {
        false
    }

    /// Whether a one-shot animation has completed
    fn is_finished(&self) -> bool {
        false
    }
}
