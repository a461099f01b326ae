//! Certificate serial numbers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

static GLOBAL: LazyLock<Arc<SerialAllocator>> = LazyLock::new(|| Arc::new(SerialAllocator::new()));

/// Hands out unique, strictly increasing serial numbers.
///
/// Every [`allocate`](SerialAllocator::allocate) call is a single atomic increment,
/// so concurrent callers never observe the same value. Values start at 1.
#[derive(Debug, Default)]
pub struct SerialAllocator {
    last: AtomicU64,
}

impl SerialAllocator {
    pub const fn new() -> Self {
        Self::with_last(0)
    }

    /// Creates an allocator whose next serial is `last + 1`.
    pub const fn with_last(last: u64) -> Self {
        Self {
            last: AtomicU64::new(last),
        }
    }

    /// The process-wide allocator shared by chains that don't bring their own.
    pub fn global() -> Arc<SerialAllocator> {
        Arc::clone(&GLOBAL)
    }

    pub fn allocate(&self) -> u64 {
        self.last.fetch_add(1, Ordering::Relaxed) + 1
    }
}
