use std::cell::Cell;

// Per-thread state, so parallel test threads never see each other's traffic.
// Both are const-initialised and drop-free; touching them never allocates.
thread_local! {
    static COUNTING_ACTIVE: Cell<bool> = const { Cell::new(false) };
    static COUNTS: Cell<AllocationSnapshot> = const { Cell::new(AllocationSnapshot::ZERO) };
}

/// Allocation traffic seen on one thread since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AllocationSnapshot {
    pub allocations: usize,
    pub deallocations: usize,
    pub bytes_allocated: usize,
    pub bytes_released: usize,
}

impl AllocationSnapshot {
    pub const ZERO: Self = Self {
        allocations: 0,
        deallocations: 0,
        bytes_allocated: 0,
        bytes_released: 0,
    };

    /// Blocks still held at snapshot time.
    pub fn outstanding(&self) -> isize {
        self.allocations as isize - self.deallocations as isize
    }

    /// Bytes still held at snapshot time.
    pub fn outstanding_bytes(&self) -> isize {
        self.bytes_allocated as isize - self.bytes_released as isize
    }
}

pub struct AllocationCounter;

impl AllocationCounter {
    pub fn record_allocation(size: usize) {
        // try_with: the allocator may run while the thread is being torn down
        let active = COUNTING_ACTIVE.try_with(Cell::get).unwrap_or(false);
        if !active {
            return;
        }

        let _ = COUNTS.try_with(|counts| {
            let mut current = counts.get();
            current.allocations += 1;
            current.bytes_allocated += size;
            counts.set(current);
        });
    }

    pub fn record_deallocation(size: usize) {
        let active = COUNTING_ACTIVE.try_with(Cell::get).unwrap_or(false);
        if !active {
            return;
        }

        let _ = COUNTS.try_with(|counts| {
            let mut current = counts.get();
            current.deallocations += 1;
            current.bytes_released += size;
            counts.set(current);
        });
    }

    /// Start counting on the current thread
    pub fn enable() {
        COUNTING_ACTIVE.with(|flag| flag.set(true));
    }

    /// Stop counting on the current thread
    pub fn disable() {
        COUNTING_ACTIVE.with(|flag| flag.set(false));
    }

    pub fn reset() {
        COUNTS.with(|counts| counts.set(AllocationSnapshot::ZERO));
    }

    pub fn snapshot() -> AllocationSnapshot {
        COUNTS.with(Cell::get)
    }

    /// Runs `f` with counting enabled on this thread and returns what it allocated.
    ///
    /// Only has an effect when [`crate::CountingAllocator`] is the global allocator;
    /// otherwise the snapshot stays at zero.
    pub fn measure<R>(f: impl FnOnce() -> R) -> (R, AllocationSnapshot) {
        Self::reset();
        Self::enable();
        let result = f();
        Self::disable();
        (result, Self::snapshot())
    }
}
