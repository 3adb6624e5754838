//=========================================================================
// Allocator Context
//
// The explicit parameter block every allocation-capable operation reads:
// the active allocator, the opaque host user data, and the process
// startup arguments. Owned by `Platform`, populated once at init and
// never mutated afterwards.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::any::Any;
use std::fmt;
use std::ptr::NonNull;
use std::rc::Rc;

//=== Internal Imports ====================================================

use super::allocator::{DefaultAllocator, RawAllocator};

//=== AllocatorContext ====================================================

/// Process-wide allocation parameters, passed explicitly.
pub struct AllocatorContext {
    allocator: Rc<dyn RawAllocator>,
    user_data: Option<Box<dyn Any>>,
    args: Vec<String>,
}

impl AllocatorContext {
    //--- Construction -----------------------------------------------------

    /// Builds the parameter block. `None` installs [`DefaultAllocator`].
    pub fn new(
        allocator: Option<Rc<dyn RawAllocator>>,
        user_data: Option<Box<dyn Any>>,
        args: Vec<String>,
    ) -> Self {
        Self {
            allocator: allocator.unwrap_or_else(|| Rc::new(DefaultAllocator)),
            user_data,
            args,
        }
    }

    //--- Accessors --------------------------------------------------------

    pub fn allocator(&self) -> &Rc<dyn RawAllocator> {
        &self.allocator
    }

    /// Host data registered at init, untouched by the platform layer.
    pub fn user_data(&self) -> Option<&dyn Any> {
        self.user_data.as_deref()
    }

    /// Startup arguments, possibly empty.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    //--- Allocation Wrappers ----------------------------------------------

    /// Fresh block of `size` bytes, None on failure or when `size == 0`.
    pub fn alloc(&self, size: usize) -> Option<NonNull<u8>> {
        // SAFETY: a fresh request passes no existing block.
        unsafe { self.allocator.reallocate(None, 0, size) }
    }

    /// Resizes `ptr`. On None the original block has been released.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live block of `old_size` bytes obtained from this
    /// context.
    pub unsafe fn realloc(
        &self,
        ptr: NonNull<u8>,
        old_size: usize,
        new_size: usize,
    ) -> Option<NonNull<u8>> {
        self.allocator.reallocate(Some(ptr), old_size, new_size)
    }

    /// Releases `ptr`.
    ///
    /// # Safety
    ///
    /// `ptr` must be a live block of `old_size` bytes obtained from this
    /// context; it must not be used afterwards.
    pub unsafe fn free(&self, ptr: NonNull<u8>, old_size: usize) {
        self.allocator.reallocate(Some(ptr), old_size, 0);
    }
}

impl Default for AllocatorContext {
    fn default() -> Self {
        Self::new(None, None, Vec::new())
    }
}

impl fmt::Debug for AllocatorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllocatorContext")
            .field("args", &self.args)
            .field("has_user_data", &self.user_data.is_some())
            .finish_non_exhaustive()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
