// Test intent: the per-hop processing path never touches the heap.
use pvshift::{PitchShifter, HOP_SIZE};
use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Allocator used in tests to count allocation operations.
struct CountingAlloc;

static ALLOC_COUNT: AtomicUsize = AtomicUsize::new(0);

unsafe impl GlobalAlloc for CountingAlloc {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        ALLOC_COUNT.fetch_add(1, Ordering::SeqCst);
        System.alloc(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        System.dealloc(ptr, layout)
    }
}

#[global_allocator]
static A: CountingAlloc = CountingAlloc;

// Kept as a single test so no other test thread allocates while counting.
#[test]
fn processing_path_does_not_allocate() {
    let factors = [0.5f32, 0.75, 1.0, 1.25, 1.5, 2.0, 0.01, 7.9];
    let hop: [f32; HOP_SIZE] = core::array::from_fn(|i| 0.5 * libm::sinf(i as f32 * 0.19));

    // Instance creation and the shared window table may allocate.
    let mut shifter = PitchShifter::new();
    let mut in_place = PitchShifter::new();
    let mut out = [0.0f32; HOP_SIZE];
    let mut block = hop;

    ALLOC_COUNT.store(0, Ordering::SeqCst);
    for i in 0..240 {
        let factor = factors[i % factors.len()];
        shifter.process(&hop, &mut out, factor);
        in_place.process_in_place(&mut block, factor);
        let _ = shifter.try_process(&hop, &mut out, factor);
    }
    // Rejected factors take the error path without allocating either.
    let _ = shifter.try_process(&hop, &mut out, f32::NAN);
    let _ = shifter.try_process(&hop, &mut out, 9.0);
    shifter.reset();
    let allocs = ALLOC_COUNT.load(Ordering::SeqCst);

    assert_eq!(allocs, 0, "processing allocated {} times", allocs);
    assert!(out.iter().chain(block.iter()).all(|v| v.is_finite()));
}
