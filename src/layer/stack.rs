#[cfg(feature = "esp32-log")]
use esp_println::println;

use embassy_time::Duration;
use heapless::Vec;

use super::{Layer, LayerSlot};
use crate::blend::BlendMode;
use crate::color::{BLACK, Rgb};
use crate::command::Command;
use crate::player::PulseEvent;

/// Event raised by one layer during [`LayerStack::update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerEvent {
    /// Index of the layer in the stack
    pub layer: usize,
    pub event: PulseEvent,
}

/// A layer together with its compositing state
#[derive(Debug, Clone)]
pub struct StackedLayer<L> {
    pub layer: L,
    /// Disabled layers neither advance nor render
    pub enabled: bool,
    /// `None` composites additively
    pub blend: Option<BlendMode>,
}

/// Ordered stack of layers sharing one scratch buffer
///
/// `LEDS` bounds the scratch buffer and `LAYERS` the number of layers; the
/// number of lights actually composited is set at construction.
#[derive(Debug, Clone)]
pub struct LayerStack<L: Layer, const LEDS: usize, const LAYERS: usize> {
    layers: Vec<StackedLayer<L>, LAYERS>,
    scratch: [Rgb; LEDS],
    len: usize,
}

/// Layer stack over the built-in generators
pub type PlayerStack<'a, const LEDS: usize, const LAYERS: usize> = LayerStack<LayerSlot<'a>, LEDS, LAYERS>;

impl<L: Layer, const LEDS: usize, const LAYERS: usize> LayerStack<L, LEDS, LAYERS> {
    /// Create an empty stack compositing `len` lights (at most `LEDS`)
    pub fn new(len: usize) -> Self {
        Self {
            layers: Vec::new(),
            scratch: [BLACK; LEDS],
            len: len.min(LEDS),
        }
    }

    /// Number of lights composited per frame
    pub const fn light_count(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Append an enabled, additively blended layer
    ///
    /// Returns the layer index, or the layer back when the stack is full.
    pub fn push(&mut self, layer: L) -> Result<usize, L> {
        self.push_with_blend(layer, None)
    }

    pub fn push_with_blend(&mut self, layer: L, blend: Option<BlendMode>) -> Result<usize, L> {
        let index = self.layers.len();
        self.layers
            .push(StackedLayer {
                layer,
                enabled: true,
                blend,
            })
            .map_err(|rejected| {
                #[cfg(feature = "esp32-log")]
                println!("[LayerStack.push] stack full ({} layers)", LAYERS);
                rejected.layer
            })?;
        Ok(index)
    }

    pub fn layer(&self, index: usize) -> Option<&L> {
        self.layers.get(index).map(|stacked| &stacked.layer)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut L> {
        self.layers.get_mut(index).map(|stacked| &mut stacked.layer)
    }

    pub fn stacked(&self) -> &[StackedLayer<L>] {
        &self.layers
    }

    /// Returns `false` when `index` is out of range
    pub fn set_enabled(&mut self, index: usize, enabled: bool) -> bool {
        let Some(stacked) = self.layers.get_mut(index) else {
            return false;
        };
        stacked.enabled = enabled;
        true
    }

    pub fn is_enabled(&self, index: usize) -> bool {
        self.layers.get(index).is_some_and(|stacked| stacked.enabled)
    }

    /// Returns `false` when `index` is out of range
    pub fn set_blend(&mut self, index: usize, blend: Option<BlendMode>) -> bool {
        let Some(stacked) = self.layers.get_mut(index) else {
            return false;
        };
        stacked.blend = blend;
        true
    }

    /// Advance every enabled layer in stack order
    ///
    /// Returns the events raised this frame, at most one per layer.
    pub fn update(&mut self, dt: Duration) -> Vec<LayerEvent, LAYERS> {
        let mut events = Vec::new();
        for (index, stacked) in self.layers.iter_mut().enumerate() {
            if !stacked.enabled {
                continue;
            }
            let Some(event) = stacked.layer.update(dt) else {
                continue;
            };
            #[cfg(feature = "esp32-log")]
            println!("[LayerStack.update] layer {} raised {:?}", index, event);
            // One event per layer always fits in `LAYERS`
            let _ = events.push(LayerEvent { layer: index, event });
        }
        events
    }

    /// Composite all enabled layers into `output`
    ///
    /// `output` is cleared to black first. Lights past the stack length are
    /// left black.
    pub fn render(&mut self, output: &mut [Rgb]) {
        output.fill(BLACK);
        let len = self.len.min(output.len());
        let output = &mut output[..len];
        let scratch = &mut self.scratch[..len];

        for stacked in self.layers.iter_mut().filter(|stacked| stacked.enabled) {
            scratch.fill(BLACK);
            stacked.layer.render(scratch);
            stacked.blend.unwrap_or_default().apply(output, scratch, 1.0);
        }
    }

    /// Apply an external command
    ///
    /// Returns `false` when the command targets a missing layer or the layer
    /// rejects it.
    pub fn apply(&mut self, command: &Command) -> bool {
        let handled = match *command {
            Command::SetLayerEnabled { layer, enabled } => self.set_enabled(layer, enabled),
            Command::SetLayerBlend { layer, blend } => self.set_blend(layer, blend),
            Command::FirePattern { layer, pattern } => self
                .layer_mut(layer)
                .is_some_and(|layer| layer.fire_pattern(pattern)),
            Command::Start { layer } => self.with_layer(layer, Layer::start),
            Command::Stop { layer } => self.with_layer(layer, Layer::stop),
            Command::SetColors {
                layer,
                primary,
                secondary,
            } => self.with_layer(layer, |layer| layer.set_colors(primary, secondary)),
        };
        if !handled {
            #[cfg(feature = "esp32-log")]
            println!("[LayerStack.apply] command not handled: {:?}", command);
        }
        handled
    }

    fn with_layer(&mut self, index: usize, f: impl FnOnce(&mut L)) -> bool {
        let Some(layer) = self.layer_mut(index) else {
            return false;
        };
        f(layer);
        true
    }
}
