//! Exclusive-ownership handle over a single heap allocation.

use core::fmt;
use core::marker::PhantomData;
use core::ops::{Deref, DerefMut};
use core::ptr::NonNull;

/// Sole owner of a heap-allocated `T`, or empty.
///
/// There is no `Clone` impl, so two handles can never observe the same
/// allocation; ownership only ever moves. Dropping a non-empty handle
/// frees the pointee; dropping an empty one is a no-op. `Default` plus
/// `mem::take` gives the usual move-out-and-leave-empty pattern.
///
/// Raw-pointer entry points (`from_raw`, `reset_raw`) exist so the
/// handle can adopt allocations produced elsewhere; they expect
/// `Box::into_raw`-style pointers.
pub struct UniqueHandle<T> {
    ptr: Option<NonNull<T>>,
    // Owns a T: dropck must treat the handle as a container.
    _owns: PhantomData<T>,
}

impl<T> UniqueHandle<T> {
    /// Heap-allocate `value` and take sole ownership of it.
    pub fn new(value: T) -> Self {
        let raw = Box::into_raw(Box::new(value));
        // Box never hands out null.
        Self {
            ptr: Some(unsafe { NonNull::new_unchecked(raw) }),
            _owns: PhantomData,
        }
    }

    /// The empty handle.
    pub const fn empty() -> Self {
        Self {
            ptr: None,
            _owns: PhantomData,
        }
    }

    /// Adopt a raw allocation; null yields the empty handle.
    ///
    /// # Safety
    /// A non-null `ptr` must come from `Box::into_raw` (or
    /// [`UniqueHandle::release`]) and must not be owned elsewhere.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        Self {
            ptr: NonNull::new(ptr),
            _owns: PhantomData,
        }
    }

    /// Hand the allocation to the caller without freeing it; the handle
    /// is empty afterwards.
    pub fn release(&mut self) -> Option<NonNull<T>> {
        self.ptr.take()
    }

    /// Free the current pointee, if any, and become empty.
    pub fn reset(&mut self) {
        if let Some(p) = self.ptr.take() {
            drop(unsafe { Box::from_raw(p.as_ptr()) });
        }
    }

    /// Free the current pointee and adopt `ptr`; null just empties the
    /// handle. Adopting the address already held is a no-op, never a
    /// double free.
    ///
    /// # Safety
    /// Same contract as [`UniqueHandle::from_raw`].
    pub unsafe fn reset_raw(&mut self, ptr: *mut T) {
        if ptr == self.as_ptr() {
            return;
        }
        self.reset();
        self.ptr = NonNull::new(ptr);
    }

    pub fn get(&self) -> Option<&T> {
        self.ptr.map(|p| unsafe { &*p.as_ptr() })
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.ptr.map(|p| unsafe { &mut *p.as_ptr() })
    }

    /// Raw address of the pointee; null when empty. Ownership stays with
    /// the handle.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.map_or(core::ptr::null_mut(), NonNull::as_ptr)
    }

    pub fn is_empty(&self) -> bool {
        self.ptr.is_none()
    }
}

impl<T> Drop for UniqueHandle<T> {
    fn drop(&mut self) {
        self.reset();
    }
}

impl<T> Default for UniqueHandle<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> From<T> for UniqueHandle<T> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T> Deref for UniqueHandle<T> {
    type Target = T;

    /// Undefined behavior on the empty handle; debug builds fail fast.
    fn deref(&self) -> &T {
        debug_assert!(self.ptr.is_some(), "deref of empty UniqueHandle");
        unsafe { &*self.as_ptr() }
    }
}

impl<T> DerefMut for UniqueHandle<T> {
    /// Undefined behavior on the empty handle; debug builds fail fast.
    fn deref_mut(&mut self) -> &mut T {
        debug_assert!(self.ptr.is_some(), "deref of empty UniqueHandle");
        unsafe { &mut *self.as_ptr() }
    }
}

impl<T: fmt::Debug> fmt::Debug for UniqueHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => f.debug_tuple("UniqueHandle").field(v).finish(),
            None => f.write_str("UniqueHandle(empty)"),
        }
    }
}
