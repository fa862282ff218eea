//! Scripted walkthrough of the allocator, for manual inspection.
//!
//! Not a product surface: the engine this crate was lifted from drives the
//! allocator from GPU buffer suballocation call sites instead.

use vulfram_alloc::Allocator;

fn main() {
    vulfram_alloc::init_logging();

    let mut allocator = Allocator::new(1_000_000_000, 128).expect("valid config");

    let a = allocator.allocate(100).expect("space for a");
    let b = allocator.allocate(100).expect("space for b");
    println!("allocated a={a:?} b={b:?}");

    allocator.free(a);
    allocator.free(b);

    let report = allocator.storage_report();
    println!(
        "after freeing both: total_free={} largest_free_region={}",
        report.total_free, report.largest_free_region
    );
}
