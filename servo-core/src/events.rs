//! Shared event flags.
//!
//! A small bit set that any task may set or clear and any task may wait on.
//! The input mode lives here too, so reading it and raising
//! [`MODE_CHANGED`] happen under one lock.

use core::cell::RefCell;
use core::future::poll_fn;
use core::task::Poll;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::waitqueue::MultiWakerRegistration;

use crate::types::InputMode;

/// Set while the inertial supervisor is in control.
pub const MOTION_MODE: u32 = 1 << 0;
/// Raised on every mode transition; consumers clear it.
pub const MODE_CHANGED: u32 = 1 << 1;
/// Actuator positions changed; the radio should republish.
pub const RADIO_REFRESH: u32 = 1 << 2;
/// Actuator positions changed; the I2C mirror should republish.
pub const MIRROR_REFRESH: u32 = 1 << 3;
/// Everything that follows an actuator update.
pub const ACTUATOR_CHANGED: u32 = RADIO_REFRESH | MIRROR_REFRESH;

struct State<const W: usize> {
    bits: u32,
    wakers: MultiWakerRegistration<W>,
}

/// Event flag group with up to `W` concurrent waiters.
pub struct EventFlags<M: RawMutex, const W: usize = 4> {
    state: Mutex<M, RefCell<State<W>>>,
}

impl<M: RawMutex, const W: usize> EventFlags<M, W> {
    pub const fn new() -> Self {
        Self {
            state: Mutex::new(RefCell::new(State {
                bits: 0,
                wakers: MultiWakerRegistration::new(),
            })),
        }
    }

    /// OR `mask` into the flags and wake all waiters.
    pub fn set(&self, mask: u32) {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            s.bits |= mask;
            s.wakers.wake();
        });
    }

    pub fn clear(&self, mask: u32) {
        self.state.lock(|s| s.borrow_mut().bits &= !mask);
    }

    pub fn get(&self) -> u32 {
        self.state.lock(|s| s.borrow().bits)
    }

    pub fn mode(&self) -> InputMode {
        if self.get() & MOTION_MODE != 0 {
            InputMode::Motion
        } else {
            InputMode::Touch
        }
    }

    /// Switch the input mode. Returns `true` and raises [`MODE_CHANGED`] if
    /// the mode actually changed.
    pub fn set_mode(&self, mode: InputMode) -> bool {
        self.state.lock(|s| {
            let mut s = s.borrow_mut();
            let was_motion = s.bits & MOTION_MODE != 0;
            let motion = mode == InputMode::Motion;
            if was_motion == motion {
                return false;
            }
            if motion {
                s.bits |= MOTION_MODE;
            } else {
                s.bits &= !MOTION_MODE;
            }
            s.bits |= MODE_CHANGED;
            s.wakers.wake();
            true
        })
    }

    /// Wait until any bit of `mask` is set, then clear the matching bits.
    pub async fn wait_and_clear(&self, mask: u32) -> u32 {
        poll_fn(|cx| {
            self.state.lock(|s| {
                let mut s = s.borrow_mut();
                let hit = s.bits & mask;
                if hit != 0 {
                    s.bits &= !hit;
                    Poll::Ready(hit)
                } else {
                    s.wakers.register(cx.waker());
                    Poll::Pending
                }
            })
        })
        .await
    }
}

impl<M: RawMutex, const W: usize> Default for EventFlags<M, W> {
    fn default() -> Self {
        Self::new()
    }
}
