//! Last completed frame, shared with readers
//!
//! The compute side renders into its own buffer and publishes the finished
//! frame in one critical section. Readers (hardware flush, overlays,
//! telemetry) copy the published frame out the same way, so they can never
//! observe a frame that is still being written.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::OutputDriver;
use crate::color::{BLACK, Rgb};

struct Published<const N: usize> {
    colors: [Rgb; N],
    len: usize,
    sequence: u32,
}

/// Double-buffer target holding the most recently published frame
pub struct SharedFrame<const N: usize> {
    inner: Mutex<RefCell<Published<N>>>,
}

impl<const N: usize> SharedFrame<N> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Published {
                colors: [BLACK; N],
                len: 0,
                sequence: 0,
            })),
        }
    }

    /// Replace the published frame; colors past `N` are dropped
    pub fn publish(&self, colors: &[Rgb]) {
        let len = colors.len().min(N);
        critical_section::with(|cs| {
            let mut published = self.inner.borrow(cs).borrow_mut();
            published.colors[..len].copy_from_slice(&colors[..len]);
            published.len = len;
            published.sequence = published.sequence.wrapping_add(1);
        });
    }

    /// Copy the published frame into `out`, returning the number of lights copied
    pub fn snapshot(&self, out: &mut [Rgb]) -> usize {
        critical_section::with(|cs| {
            let published = self.inner.borrow(cs).borrow();
            let len = published.len.min(out.len());
            out[..len].copy_from_slice(&published.colors[..len]);
            len
        })
    }

    /// Color of one light in the published frame
    pub fn color_at(&self, index: usize) -> Option<Rgb> {
        critical_section::with(|cs| {
            let published = self.inner.borrow(cs).borrow();
            if index < published.len {
                Some(published.colors[index])
            } else {
                None
            }
        })
    }

    /// Number of frames published so far, wrapping
    pub fn sequence(&self) -> u32 {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().sequence)
    }
}

impl<const N: usize> Default for SharedFrame<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> OutputDriver for &SharedFrame<N> {
    fn write(&mut self, colors: &[Rgb]) {
        self.publish(colors);
    }
}
