//=========================================================================
// Counting Allocator
//
// Accounting wrapper around any `RawAllocator`. Tracks live bytes and
// blocks so hosts (and tests) can assert that every block the platform
// allocated was handed back, and can inject failures to exercise the
// out-of-memory paths.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::cell::Cell;
use std::ptr::NonNull;

//=== External Crates =====================================================

use log::debug;

//=== Internal Imports ====================================================

use super::allocator::{DefaultAllocator, RawAllocator};

//=== CountingAllocator ===================================================

/// Wraps an allocator and keeps a ledger of what is currently live.
///
/// Failure injection is one-shot: each `fail_next_*` call affects exactly
/// the next matching request.
#[derive(Debug, Default)]
pub struct CountingAllocator<A: RawAllocator = DefaultAllocator> {
    inner: A,
    live_bytes: Cell<usize>,
    live_blocks: Cell<usize>,
    total_allocations: Cell<usize>,
    fail_next_alloc: Cell<bool>,
    fail_next_resize: Cell<bool>,
}

impl CountingAllocator<DefaultAllocator> {
    pub fn new() -> Self {
        Self::wrap(DefaultAllocator)
    }
}

impl<A: RawAllocator> CountingAllocator<A> {
    /// Wraps `inner`, starting with an empty ledger.
    pub fn wrap(inner: A) -> Self {
        Self {
            inner,
            live_bytes: Cell::new(0),
            live_blocks: Cell::new(0),
            total_allocations: Cell::new(0),
            fail_next_alloc: Cell::new(false),
            fail_next_resize: Cell::new(false),
        }
    }

    //--- Ledger -----------------------------------------------------------

    /// Bytes currently allocated and not yet released.
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.get()
    }

    /// Blocks currently allocated and not yet released.
    pub fn live_blocks(&self) -> usize {
        self.live_blocks.get()
    }

    /// Fresh allocations served since construction.
    pub fn total_allocations(&self) -> usize {
        self.total_allocations.get()
    }

    //--- Failure Injection ------------------------------------------------

    /// Makes the next fresh allocation return None.
    pub fn fail_next_alloc(&self) {
        self.fail_next_alloc.set(true);
    }

    /// Makes the next resize fail; the original block is released.
    pub fn fail_next_resize(&self) {
        self.fail_next_resize.set(true);
    }

    //--- Internal Helpers -------------------------------------------------

    fn forget_block(&self, size: usize) {
        self.live_bytes.set(self.live_bytes.get().saturating_sub(size));
        self.live_blocks.set(self.live_blocks.get().saturating_sub(1));
    }

    fn record_block(&self, size: usize) {
        self.live_bytes.set(self.live_bytes.get() + size);
        self.live_blocks.set(self.live_blocks.get() + 1);
    }
}

impl<A: RawAllocator> RawAllocator for CountingAllocator<A> {
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        match (ptr, new_size) {
            (None, 0) => None,

            (Some(block), 0) => {
                self.inner.reallocate(Some(block), old_size, 0);
                self.forget_block(old_size);
                None
            }

            (None, size) => {
                if self.fail_next_alloc.replace(false) {
                    debug!(
                        target: "platform::memory",
                        "Injected allocation failure ({} bytes)",
                        size
                    );
                    return None;
                }

                let block = self.inner.reallocate(None, 0, size);
                if block.is_some() {
                    self.record_block(size);
                    self.total_allocations.set(self.total_allocations.get() + 1);
                }
                block
            }

            (Some(block), size) => {
                if self.fail_next_resize.replace(false) {
                    debug!(
                        target: "platform::memory",
                        "Injected resize failure ({} -> {} bytes)",
                        old_size,
                        size
                    );
                    self.inner.reallocate(Some(block), old_size, 0);
                    self.forget_block(old_size);
                    return None;
                }

                let resized = self.inner.reallocate(Some(block), old_size, size);
                self.forget_block(old_size);
                if resized.is_some() {
                    self.record_block(size);
                }
                resized
            }
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
