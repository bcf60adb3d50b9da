//! Host-side helpers shared by the unit tests.

extern crate std;

use core::future::Future;
use core::pin::{pin, Pin};
use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::config::DEFAULT_SERVO_TIMING;
use crate::convert::{compare_to_percent, percent_to_compare};
use crate::ports::{ServoOutput, ServoReadback, StatusIndicator};
use crate::types::ActuatorId;

fn noop_waker() -> Waker {
    fn noop_raw_waker() -> RawWaker {
        fn noop(_: *const ()) {}
        fn clone(_: *const ()) -> RawWaker {
            noop_raw_waker()
        }
        static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        RawWaker::new(core::ptr::null(), &VTABLE)
    }
    unsafe { Waker::from_raw(noop_raw_waker()) }
}

/// Run a future that must complete on its first poll.
pub fn block_on<F: Future>(f: F) -> F::Output {
    match poll_once(f) {
        Poll::Ready(result) => result,
        Poll::Pending => panic!("Mock future returned Pending unexpectedly"),
    }
}

/// Poll a future exactly once.
pub fn poll_once<F: Future>(f: F) -> Poll<F::Output> {
    poll_pinned(pin!(f))
}

/// Poll a pinned future once, leaving it alive for further polls.
pub fn poll_pinned<F: Future + ?Sized>(f: Pin<&mut F>) -> Poll<F::Output> {
    let waker = noop_waker();
    let mut cx = Context::from_waker(&waker);
    f.poll(&mut cx)
}

/// Two compare registers shared between a writer and any number of readers.
#[derive(Clone)]
pub struct MockServos {
    regs: Rc<RefCell<[u16; 2]>>,
}

impl MockServos {
    /// Both channels at `percent`.
    pub fn at(percent: u8) -> Self {
        let ticks = percent_to_compare(&DEFAULT_SERVO_TIMING, percent);
        Self {
            regs: Rc::new(RefCell::new([ticks; 2])),
        }
    }

    pub fn percent(&self, id: ActuatorId) -> u8 {
        compare_to_percent(&DEFAULT_SERVO_TIMING, self.compare(id))
    }
}

impl ServoReadback for MockServos {
    fn compare(&self, id: ActuatorId) -> u16 {
        self.regs.borrow()[id.index()]
    }
}

impl ServoOutput for MockServos {
    fn set_compare(&mut self, id: ActuatorId, ticks: u16) {
        self.regs.borrow_mut()[id.index()] = ticks;
    }
}

impl StatusIndicator for &Cell<bool> {
    fn set_connected(&mut self, connected: bool) {
        self.set(connected);
    }
}
