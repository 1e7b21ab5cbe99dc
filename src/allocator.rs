use crate::counter::AllocationCounter;
use std::alloc::{GlobalAlloc, Layout, System};

/// System allocator that reports every allocation to [`AllocationCounter`].
///
/// Install it with `#[global_allocator]` in the binary or test crate that
/// wants counts. Counting is off until [`AllocationCounter::enable`] is called
/// on the current thread, so an idle allocator costs one thread-local read.
pub struct CountingAllocator;

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        // SAFETY: System is the standard allocator
        let ptr = unsafe { System.alloc(layout) };

        if !ptr.is_null() {
            AllocationCounter::record_allocation(layout.size());
        }

        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        // SAFETY: System is the standard allocator
        let ptr = unsafe { System.alloc_zeroed(layout) };

        if !ptr.is_null() {
            AllocationCounter::record_allocation(layout.size());
        }

        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        AllocationCounter::record_deallocation(layout.size());
        // SAFETY: System is the standard allocator, ptr/layout come from alloc
        unsafe { System.dealloc(ptr, layout) };
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        // SAFETY: System is the standard allocator, ptr/layout come from alloc
        let new_ptr = unsafe { System.realloc(ptr, layout, new_size) };

        if !new_ptr.is_null() {
            // A move counts as releasing the old block and taking a new one
            AllocationCounter::record_deallocation(layout.size());
            AllocationCounter::record_allocation(new_size);
        }

        new_ptr
    }
}
