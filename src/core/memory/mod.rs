//=========================================================================
// Memory
//
// Allocator protocol and the helpers built on it. Every block the
// platform layer allocates goes through the `RawAllocator` installed in
// the `AllocatorContext`.
//
//=========================================================================

//=== Submodules ==========================================================

mod alloc_box;
mod allocator;
mod context;
mod counting;

//=== Public API ==========================================================

pub use alloc_box::AllocBox;
pub use allocator::{DefaultAllocator, RawAllocator, BLOCK_ALIGN};
pub use context::AllocatorContext;
pub use counting::CountingAllocator;
