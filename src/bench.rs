//! The timed loops.
//!
//! Every function here starts and stops its own clock, so whatever happens
//! before or after the loop (pre-allocating the accessed value, releasing it)
//! never lands in the returned duration. Handles go through
//! [`std::hint::black_box`] so the optimiser can neither drop an
//! allocate/free pair nor collapse a read-modify-write loop into one add.

use crate::strategy::{AccessStrategy, AllocStrategy};
use std::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use std::cell::Cell;
use std::hint::black_box;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// The word-sized integer every strategy allocates.
pub type Value = i64;

const VALUE_LAYOUT: Layout = Layout::new::<Value>();

/// Result of one access trial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessOutcome {
    pub elapsed: Duration,
    /// What the handle held after the loop, read outside the timer.
    pub final_value: Value,
}

/// Allocates and releases `iterations` values under `strategy` and times the whole loop.
pub fn allocation_cycle(strategy: AllocStrategy, iterations: u64) -> Duration {
    let start = Instant::now();
    match strategy {
        AllocStrategy::Raw => alloc_raw(iterations),
        AllocStrategy::UniqueNew => alloc_unique_new(iterations),
        AllocStrategy::UniqueFactory => alloc_unique_factory(iterations),
        AllocStrategy::SharedNew => alloc_shared_new(iterations),
        AllocStrategy::SharedFactory => alloc_shared_factory(iterations),
    }
    start.elapsed()
}

/// Pre-allocates `initial` under `strategy`, then times `iterations` read-modify-write
/// rounds through the handle. Allocation and release stay outside the timer.
pub fn access_loop(strategy: AccessStrategy, iterations: u64, initial: Value) -> AccessOutcome {
    match strategy {
        AccessStrategy::Raw => {
            let ptr = raw_new(initial);

            let start = Instant::now();
            // SAFETY: ptr is a live allocation from raw_new and nothing else aliases it
            unsafe { access_raw(ptr, iterations) };
            let elapsed = start.elapsed();

            // SAFETY: still live; released exactly once below
            let final_value = unsafe { ptr.read() };
            unsafe { raw_delete(ptr) };

            AccessOutcome {
                elapsed,
                final_value,
            }
        }
        AccessStrategy::Unique => {
            let mut handle = Box::new(initial);

            let start = Instant::now();
            access_unique(&mut handle, iterations);
            let elapsed = start.elapsed();

            AccessOutcome {
                elapsed,
                final_value: *handle,
            }
        }
        AccessStrategy::Shared => {
            let handle = Rc::new(Cell::new(initial));

            let start = Instant::now();
            access_shared(&handle, iterations);
            let elapsed = start.elapsed();

            AccessOutcome {
                elapsed,
                final_value: handle.get(),
            }
        }
    }
}

/// Explicit heap allocation of one value. Aborts on allocation failure.
fn raw_new(value: Value) -> *mut Value {
    // SAFETY: VALUE_LAYOUT has non-zero size
    let ptr = unsafe { alloc(VALUE_LAYOUT) }.cast::<Value>();
    if ptr.is_null() {
        handle_alloc_error(VALUE_LAYOUT);
    }
    // SAFETY: freshly allocated, properly aligned for Value
    unsafe { ptr.write(value) };
    ptr
}

/// # Safety
/// `ptr` must come from [`raw_new`] and not have been released yet.
unsafe fn raw_delete(ptr: *mut Value) {
    // SAFETY: caller guarantees ptr was allocated with VALUE_LAYOUT
    unsafe { dealloc(ptr.cast::<u8>(), VALUE_LAYOUT) };
}

#[inline(never)]
fn alloc_raw(iterations: u64) {
    for x in 0..iterations {
        let ptr = black_box(raw_new(x as Value));
        // SAFETY: ptr came from raw_new on the line above
        unsafe { raw_delete(ptr) };
    }
}

#[inline(never)]
fn alloc_unique_new(iterations: u64) {
    for x in 0..iterations {
        // SAFETY: raw_new hands out a Global allocation with Value's layout,
        // which is exactly what Box expects to own
        let handle = unsafe { Box::from_raw(raw_new(x as Value)) };
        black_box(handle);
    }
}

#[inline(never)]
fn alloc_unique_factory(iterations: u64) {
    for x in 0..iterations {
        black_box(Box::new(x as Value));
    }
}

#[inline(never)]
fn alloc_shared_new(iterations: u64) {
    for x in 0..iterations {
        // Opaque box, otherwise LLVM folds the temporary into the Rc allocation
        let boxed = black_box(Box::new(x as Value));
        let handle: Rc<Value> = Rc::from(boxed);
        black_box(handle);
    }
}

#[inline(never)]
fn alloc_shared_factory(iterations: u64) {
    for x in 0..iterations {
        black_box(Rc::new(x as Value));
    }
}

/// # Safety
/// `ptr` must point to a live, unaliased `Value`.
#[inline(never)]
unsafe fn access_raw(ptr: *mut Value, iterations: u64) {
    for _ in 0..iterations {
        let ptr = black_box(ptr);
        // SAFETY: upheld by caller
        let tmp = black_box(unsafe { *ptr });
        unsafe { *ptr = tmp.wrapping_add(1) };
    }
}

#[inline(never)]
#[allow(clippy::borrowed_box)]
fn access_unique(handle: &mut Box<Value>, iterations: u64) {
    for _ in 0..iterations {
        let handle = black_box(&mut *handle);
        let tmp = black_box(**handle);
        **handle = tmp.wrapping_add(1);
    }
}

#[inline(never)]
fn access_shared(handle: &Rc<Cell<Value>>, iterations: u64) {
    for _ in 0..iterations {
        let handle = black_box(handle);
        let tmp = black_box(handle.get());
        handle.set(tmp.wrapping_add(1));
    }
}
