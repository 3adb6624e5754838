//=========================================================================
// Allocator Protocol
//
// A single generalized-realloc entry point used for every block the
// platform layer allocates.
//
// Contract for `reallocate(ptr, old_size, new_size)`:
// - `new_size == 0`              → release `ptr` (if any), return None
// - `ptr == None, new_size > 0`  → fresh allocation
// - `ptr == Some, new_size > 0`  → resize, preserving min(old, new) bytes;
//                                  on failure the original block is
//                                  released before returning None
//
// Allocation failure is always a `None` return. Nothing here retries
// or aborts.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::alloc::{self, Layout};
use std::ptr::NonNull;

//=== External Crates =====================================================

use log::trace;

//=== Constants ===========================================================

/// Alignment of every block handed out through the protocol.
///
/// Matches what `malloc` guarantees on 64-bit targets.
pub const BLOCK_ALIGN: usize = 16;

//=== RawAllocator ========================================================

/// The pluggable allocation function.
///
/// Implementors carry their own state (what a C API would pass as a
/// `user_data` pointer) inside `self`.
pub trait RawAllocator {
    /// Generalized realloc, see the module docs for the full contract.
    ///
    /// # Safety
    ///
    /// `ptr` must be `None` or a live block previously returned by this
    /// allocator whose current size is exactly `old_size`. After the call
    /// the caller must treat `ptr` as released, whatever the result.
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>>;
}

//=== DefaultAllocator ====================================================

/// Allocator installed when the host supplies none.
///
/// Backed by the global Rust allocator with [`BLOCK_ALIGN`] alignment.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultAllocator;

impl RawAllocator for DefaultAllocator {
    unsafe fn reallocate(
        &self,
        ptr: Option<NonNull<u8>>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        match (ptr, new_size) {
            (None, 0) => None,

            (Some(block), 0) => {
                release(block, old_size);
                None
            }

            (None, size) => {
                let layout = block_layout(size)?;
                NonNull::new(alloc::alloc(layout))
            }

            (Some(block), size) => {
                // std realloc keeps the old block alive on failure; the
                // protocol requires it to be released instead.
                let grown = match (block_layout(old_size), block_layout(size)) {
                    (Some(old_layout), Some(_)) => {
                        NonNull::new(alloc::realloc(block.as_ptr(), old_layout, size))
                    }
                    _ => None,
                };

                if grown.is_none() {
                    trace!(
                        target: "platform::memory",
                        "Resize {} -> {} failed, releasing original block",
                        old_size,
                        size
                    );
                    release(block, old_size);
                }

                grown
            }
        }
    }
}

//--- Internal Helpers ----------------------------------------------------

fn block_layout(size: usize) -> Option<Layout> {
    Layout::from_size_align(size, BLOCK_ALIGN).ok()
}

/// # Safety
///
/// `block` must be a live block of `size` bytes from the global allocator.
unsafe fn release(block: NonNull<u8>, size: usize) {
    if let Some(layout) = block_layout(size) {
        alloc::dealloc(block.as_ptr(), layout);
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
