//! Commands from external actors to the compositor
//!
//! Transports and UIs never touch the layer stack directly. They enqueue
//! [`Command`]s into a bounded queue guarded by `critical-section`, and the
//! frame scheduler drains it at the start of each tick, so every mutation of
//! engine state happens on the compute side.

use core::cell::RefCell;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use critical_section::Mutex;
use heapless::Deque;

use crate::blend::BlendMode;
use crate::color::Rgb;

/// Change requested for one layer of the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetLayerEnabled { layer: usize, enabled: bool },
    /// `None` restores additive blending
    SetLayerBlend { layer: usize, blend: Option<BlendMode> },
    /// Play one playlist entry on a pattern layer
    FirePattern { layer: usize, pattern: usize },
    Start { layer: usize },
    Stop { layer: usize },
    SetColors { layer: usize, primary: Rgb, secondary: Rgb },
}

/// Error returned when the queue is full; carries the rejected command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrySendError(pub Command);

/// Error returned when the queue is empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TryReceiveError;

/// Bounded command queue, safe to share between tasks and interrupts
pub struct CommandQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Command, SIZE>>>,
}

impl<const SIZE: usize> CommandQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { queue: self }
    }

    pub const fn receiver(&self) -> CommandReceiver<'_, SIZE> {
        CommandReceiver { queue: self }
    }

    /// Enqueue a command, handing it back if the queue is full
    pub fn try_send(&self, command: Command) -> Result<(), TrySendError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(|command| {
                #[cfg(feature = "esp32-log")]
                println!("[CommandQueue.try_send] queue full, dropping {:?}", command);
                TrySendError(command)
            })
        })
    }

    pub fn try_receive(&self) -> Result<Command, TryReceiveError> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.pop_front().ok_or(TryReceiveError)
        })
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// Producer handle of a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    pub fn try_send(&self, command: Command) -> Result<(), TrySendError> {
        self.queue.try_send(command)
    }
}

/// Consumer handle of a [`CommandQueue`]
#[derive(Clone, Copy)]
pub struct CommandReceiver<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandReceiver<'_, SIZE> {
    pub fn try_receive(&self) -> Result<Command, TryReceiveError> {
        self.queue.try_receive()
    }

    /// Pop every pending command into `handler`, returning how many ran
    ///
    /// Each command is taken under its own critical section, so producers are
    /// never blocked while the handler runs.
    pub fn drain(&self, mut handler: impl FnMut(Command)) -> usize {
        let mut count = 0;
        while let Ok(command) = self.try_receive() {
            handler(command);
            count += 1;
        }
        count
    }
}
