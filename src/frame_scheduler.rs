//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};
use crate::command::CommandReceiver;
use crate::layer::{Layer, LayerEvent, LayerStack};

/// Default target frame rate (60 FPS).
pub const DEFAULT_FPS: u32 = 60;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Time step the layers were advanced by.
    pub dt: Duration,
    /// Commands applied before this frame.
    pub commands: usize,
    /// Layer events raised this frame, see [`FrameScheduler::events`].
    pub events: usize,
}

/// Portable frame scheduler that drives a [`LayerStack`] without async.
///
/// Each tick:
/// - Applies queued commands
/// - Advances every enabled layer by the time since the previous tick and
///   keeps the events they raise
/// - Composites into a private buffer and hands the finished frame to the
///   output driver
/// - Returns timing info so the caller can sleep appropriately
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(stack, driver).with_commands(queue.receiver());
///
/// loop {
///     let now = get_current_time_ms();
///     let result = scheduler.tick(Instant::from_millis(now));
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis() as u64);
/// }
/// ```
pub struct FrameScheduler<
    'q,
    L: Layer,
    O: OutputDriver,
    const LEDS: usize,
    const LAYERS: usize,
    const QUEUE: usize,
> {
    stack: LayerStack<L, LEDS, LAYERS>,
    output: O,
    commands: Option<CommandReceiver<'q, QUEUE>>,
    frame: [Rgb; LEDS],
    events: Vec<LayerEvent, LAYERS>,
    last_tick: Option<Instant>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<'q, L: Layer, O: OutputDriver, const LEDS: usize, const LAYERS: usize, const QUEUE: usize>
    FrameScheduler<'q, L, O, LEDS, LAYERS, QUEUE>
{
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (60 FPS) for frame timing.
    pub fn new(stack: LayerStack<L, LEDS, LAYERS>, driver: O) -> Self {
        Self::with_frame_duration(stack, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        stack: LayerStack<L, LEDS, LAYERS>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            stack,
            output: driver,
            commands: None,
            frame: [BLACK; LEDS],
            events: Vec::new(),
            last_tick: None,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Drain `receiver` at the start of every tick.
    #[must_use]
    pub fn with_commands(mut self, receiver: CommandReceiver<'q, QUEUE>) -> Self {
        self.commands = Some(receiver);
        self
    }

    /// Process one frame and return timing information.
    ///
    /// The first tick advances layers by zero. A stall longer than two
    /// frames resets the schedule instead of bursting to catch up, but the
    /// layers still advance by the real elapsed time.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Drift correction: skip the backlog after long stalls
        let max_drift = self.frame_duration * 2;
        if now > self.next_frame + max_drift {
            self.next_frame = now;
        }

        let commands = match self.commands {
            Some(receiver) => {
                let stack = &mut self.stack;
                receiver.drain(|command| {
                    stack.apply(&command);
                })
            }
            None => 0,
        };

        let dt = match self.last_tick {
            Some(last) if now > last => now - last,
            _ => Duration::from_ticks(0),
        };
        self.last_tick = Some(now);

        let len = self.stack.light_count();
        self.events = self.stack.update(dt);
        self.stack.render(&mut self.frame[..len]);
        self.output.write(&self.frame[..len]);

        self.next_frame += self.frame_duration;

        let sleep_duration = if self.next_frame > now {
            self.next_frame - now
        } else {
            Duration::from_ticks(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            dt,
            commands,
            events: self.events.len(),
        }
    }

    /// Layer events raised by the last tick.
    pub fn events(&self) -> &[LayerEvent] {
        &self.events
    }

    /// Last composited frame.
    pub fn frame(&self) -> &[Rgb] {
        &self.frame[..self.stack.light_count()]
    }

    pub fn stack(&self) -> &LayerStack<L, LEDS, LAYERS> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut LayerStack<L, LEDS, LAYERS> {
        &mut self.stack
    }

    pub fn output(&self) -> &O {
        &self.output
    }
}
