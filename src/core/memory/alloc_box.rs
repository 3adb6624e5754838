//=========================================================================
// AllocBox
//
// Owned, typed value living in a block obtained through the allocator
// protocol. Dropping the box drops the value first and then hands the
// block back to the allocator that produced it, so any cleanup the value
// performs on drop always runs before its storage is released.
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::rc::Rc;

//=== Internal Imports ====================================================

use super::allocator::{RawAllocator, BLOCK_ALIGN};
use super::context::AllocatorContext;
use crate::core::error::PlatformError;

//=== AllocBox ============================================================

/// Box whose storage comes from an [`AllocatorContext`].
pub struct AllocBox<T> {
    ptr: NonNull<T>,
    size: usize,
    allocator: Rc<dyn RawAllocator>,
    _owns: PhantomData<T>,
}

impl<T> AllocBox<T> {
    /// Moves `value` into a freshly allocated block.
    ///
    /// # Errors
    ///
    /// [`PlatformError::OutOfMemory`] when the allocator returns null;
    /// `value` is dropped in that case.
    ///
    /// # Panics
    ///
    /// Panics if `T` needs more than [`BLOCK_ALIGN`] alignment.
    pub fn new_in(value: T, ctx: &AllocatorContext) -> Result<Self, PlatformError> {
        assert!(
            mem::align_of::<T>() <= BLOCK_ALIGN,
            "AllocBox cannot honour alignment {}",
            mem::align_of::<T>()
        );

        // Zero-sized requests mean "free" in the protocol.
        let size = mem::size_of::<T>().max(1);
        let block = ctx
            .alloc(size)
            .ok_or(PlatformError::OutOfMemory { requested: size })?;

        let ptr = block.cast::<T>();
        // SAFETY: block is fresh, large enough and suitably aligned.
        unsafe { ptr.as_ptr().write(value) };

        Ok(Self {
            ptr,
            size,
            allocator: ctx.allocator().clone(),
            _owns: PhantomData,
        })
    }

    /// Reserves storage first and only then builds the value with `init`.
    ///
    /// If `init` fails the reserved block is released and its error is
    /// returned unchanged.
    ///
    /// # Errors
    ///
    /// [`PlatformError::OutOfMemory`] (converted into `E`) when the
    /// allocator returns null, in which case `init` is never called.
    ///
    /// # Panics
    ///
    /// Panics if `T` needs more than [`BLOCK_ALIGN`] alignment.
    pub fn try_new_with<E>(
        ctx: &AllocatorContext,
        init: impl FnOnce() -> Result<T, E>,
    ) -> Result<Self, E>
    where
        E: From<PlatformError>,
    {
        assert!(
            mem::align_of::<T>() <= BLOCK_ALIGN,
            "AllocBox cannot honour alignment {}",
            mem::align_of::<T>()
        );

        let size = mem::size_of::<T>().max(1);
        let block = ctx
            .alloc(size)
            .ok_or(PlatformError::OutOfMemory { requested: size })?;

        let value = match init() {
            Ok(value) => value,
            Err(err) => {
                // SAFETY: block came from this context and holds no value.
                unsafe { ctx.free(block, size) };
                return Err(err);
            }
        };

        let ptr = block.cast::<T>();
        // SAFETY: block is fresh, large enough and suitably aligned.
        unsafe { ptr.as_ptr().write(value) };

        Ok(Self {
            ptr,
            size,
            allocator: ctx.allocator().clone(),
            _owns: PhantomData,
        })
    }

    /// Bytes requested from the allocator for this box.
    pub fn block_size(&self) -> usize {
        self.size
    }
}

impl<T> Deref for AllocBox<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: ptr holds an initialized T for the box's lifetime.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> DerefMut for AllocBox<T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: unique access through &mut self.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T> Drop for AllocBox<T> {
    fn drop(&mut self) {
        // SAFETY: the value is initialized and dropped exactly once, then
        // the block goes back to the allocator that produced it.
        unsafe {
            ptr::drop_in_place(self.ptr.as_ptr());
            self.allocator
                .reallocate(Some(self.ptr.cast::<u8>()), self.size, 0);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for AllocBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::memory::CountingAllocator;
    use std::cell::RefCell;

    fn counting_context() -> (Rc<CountingAllocator>, AllocatorContext) {
        let counting = Rc::new(CountingAllocator::new());
        let ctx = AllocatorContext::new(Some(counting.clone()), None, Vec::new());
        (counting, ctx)
    }

    struct DropMarker {
        log: Rc<RefCell<Vec<&'static str>>>,
    }

    impl Drop for DropMarker {
        fn drop(&mut self) {
            self.log.borrow_mut().push("value dropped");
        }
    }

    #[test]
    fn box_round_trips_value() {
        let (counting, ctx) = counting_context();
        let mut boxed = AllocBox::new_in([7u64; 4], &ctx).expect("alloc");
        boxed[2] = 9;
        assert_eq!(*boxed, [7, 7, 9, 7]);
        assert_eq!(counting.live_bytes(), 32);

        drop(boxed);
        assert_eq!(counting.live_bytes(), 0);
    }

    #[test]
    fn zero_sized_value_still_gets_a_block() {
        let (counting, ctx) = counting_context();
        let boxed = AllocBox::new_in((), &ctx).expect("alloc");
        assert_eq!(boxed.block_size(), 1);
        assert_eq!(counting.live_blocks(), 1);
        drop(boxed);
        assert_eq!(counting.live_blocks(), 0);
    }

    #[test]
    fn allocation_failure_is_typed() {
        let (counting, ctx) = counting_context();
        counting.fail_next_alloc();

        match AllocBox::new_in(5u32, &ctx) {
            Err(PlatformError::OutOfMemory { requested }) => assert_eq!(requested, 4),
            other => panic!("Expected OutOfMemory, got {:?}", other.map(|b| *b)),
        }
    }

    #[test]
    fn failed_initializer_releases_reserved_block() {
        let (counting, ctx) = counting_context();

        let result = AllocBox::<u64>::try_new_with(&ctx, || {
            Err(PlatformError::WindowCreation("refused".into()))
        });

        assert!(matches!(result, Err(PlatformError::WindowCreation(_))));
        assert_eq!(counting.total_allocations(), 1);
        assert_eq!(counting.live_blocks(), 0);
    }

    #[test]
    fn initializer_is_skipped_when_out_of_memory() {
        let (counting, ctx) = counting_context();
        counting.fail_next_alloc();

        let mut called = false;
        let result = AllocBox::try_new_with(&ctx, || {
            called = true;
            Ok::<_, PlatformError>(1u8)
        });

        assert!(matches!(result, Err(PlatformError::OutOfMemory { .. })));
        assert!(!called);
    }

    #[test]
    fn value_drops_before_storage_is_released() {
        let (counting, ctx) = counting_context();
        let log = Rc::new(RefCell::new(Vec::new()));

        let boxed = AllocBox::new_in(DropMarker { log: log.clone() }, &ctx).expect("alloc");
        drop(boxed);

        assert_eq!(*log.borrow(), ["value dropped"]);
        assert_eq!(counting.live_blocks(), 0);
    }
}
