#![no_std]

pub mod blend;
pub mod bounds;
pub mod color;
pub mod command;
pub mod frame;
pub mod frame_scheduler;
pub mod layer;
pub mod math;
pub mod pattern;
pub mod player;
pub mod wave;

pub use blend::BlendMode;
pub use bounds::{Grid, GridPlacement, LedRange};
pub use command::{Command, CommandQueue, CommandReceiver, CommandSender};
pub use frame::SharedFrame;
pub use frame_scheduler::FrameScheduler;
pub use layer::{Layer, LayerEvent, LayerSlot, LayerStack, PlayerStack};
pub use math::Easing;
pub use pattern::{FiredPatterns, PatternBitmap, PatternId, PatternSequencer, PatternStep, SequencerConfig};
pub use player::{
    PulseConfig, PulseEvent, PulsePair, PulseSpawner, PulseSpawnerConfig, PulseTraveler, RainbowConfig,
    RainbowSweep, RingConfig, RingWave, SpawnPolicy, TwinkleConfig, TwinkleField,
};
pub use wave::{WaveBasis, WaveConfig, WaveDirection, WaveSynth};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The frame scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
