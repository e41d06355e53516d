//! The transform hot path must not touch the heap once tables are built.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;

use dsp_core::transform::{IMDCT_LONG, IMDCT_SHORT, imdct_long, imdct_short, tables};

struct CountingAllocator;

thread_local! {
    static COUNTING: Cell<bool> = const { Cell::new(false) };
    static ALLOCATIONS: Cell<usize> = const { Cell::new(0) };
}

fn record() {
    let counting = COUNTING.try_with(Cell::get).unwrap_or(false);
    if counting {
        let _ = ALLOCATIONS.try_with(|n| n.set(n.get() + 1));
    }
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        record();
        unsafe { System.alloc(layout) }
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        record();
        unsafe { System.alloc_zeroed(layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        record();
        unsafe { System.realloc(ptr, layout, new_size) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

/// Allocations made by `f` on the current thread.
fn allocations_during(f: impl FnOnce()) -> usize {
    ALLOCATIONS.with(|n| n.set(0));
    COUNTING.with(|c| c.set(true));
    f();
    COUNTING.with(|c| c.set(false));
    ALLOCATIONS.with(Cell::get)
}

#[test]
fn test_long_imdct_does_not_allocate() {
    tables::init_tables();
    let mut coefficients = [0i32; IMDCT_LONG / 2];
    coefficients[5] = 1000;
    let mut output = [0i16; IMDCT_LONG];
    let warm = imdct_long(&coefficients, &mut output);

    let mut exponent = 0;
    let count = allocations_during(|| exponent = imdct_long(&coefficients, &mut output));
    assert_eq!(count, 0);
    assert_eq!(exponent, warm);
    assert!(output.iter().any(|&s| s != 0));
}

#[test]
fn test_short_imdct_does_not_allocate() {
    tables::init_tables();
    let mut coefficients = [0i32; IMDCT_SHORT / 2];
    coefficients[3] = -700;
    coefficients[40] = 1200;
    let mut output = [0i16; IMDCT_SHORT];
    imdct_short(&coefficients, &mut output);

    let count = allocations_during(|| {
        imdct_short(&coefficients, &mut output);
    });
    assert_eq!(count, 0);
}

#[test]
fn test_counter_sees_heap_use() {
    let count = allocations_during(|| {
        let v: Vec<i32> = std::hint::black_box(vec![1, 2, 3]);
        drop(v);
    });
    assert!(count >= 1);
}
