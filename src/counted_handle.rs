//! Shared-ownership handles: one generic implementation, two count
//! policies.
//!
//! `CountedHandle<T, C>` carries a pointee pointer and a pointer to a
//! count record of type `C`; every clone of a handle aliases the same
//! two allocations. All copy/move/drop logic lives here once, and the
//! [`SharePolicy`] impl decides when the pointee and the record die.

use core::fmt;
use core::hash::{Hash, Hasher};
use core::marker::PhantomData;
use core::ops::Deref;
use core::ptr::NonNull;

use crate::counts::{OwnerCount, SharePolicy};
use crate::ref_counter::RefCounter;

/// Shared owner of a heap-allocated `T` over a bare strong count. The
/// pointee and the count cell are freed together, pointee first, when
/// the last owner disappears.
pub type SharedHandle<T> = CountedHandle<T, OwnerCount>;

/// Shared owner of a heap-allocated `T` over a [`RefCounter`] record.
/// The pointee dies when the strong count hits zero; the record stays
/// alive while weak observers remain, so they can detect the death
/// instead of dangling.
pub type ObservedHandle<T> = CountedHandle<T, RefCounter>;

// Pointee and count record are two separate allocations so the record
// can outlive the pointee (the weak-aware policy requires that).
struct Slots<T, C> {
    value: NonNull<T>,
    count: NonNull<C>,
}

impl<T, C> Clone for Slots<T, C> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<T, C> Copy for Slots<T, C> {}

impl<T, C: SharePolicy> Slots<T, C> {
    // `value` must be a live Box allocation owned by the caller.
    fn with_fresh_count(value: NonNull<T>) -> Self {
        let count = Box::into_raw(Box::new(C::new_owned()));
        Self {
            value,
            count: unsafe { NonNull::new_unchecked(count) },
        }
    }
}

/// Reference-counted ownership handle, generic over the count policy
/// `C`. Use through the [`SharedHandle`] and [`ObservedHandle`]
/// aliases.
///
/// States are Empty or Owning(n ≥ 1): cloning an owner adds one to n,
/// dropping or resetting removes one, and moving (`mem::take`) never
/// touches n at all. The counts are plain `Cell`s, so every handle is
/// `!Send`/`!Sync`; cross-thread sharing is out of contract.
pub struct CountedHandle<T, C: SharePolicy> {
    slots: Option<Slots<T, C>>,
    // Owns a T and a C: dropck must treat the handle as a container.
    _owns: PhantomData<(T, C)>,
}

impl<T, C: SharePolicy> CountedHandle<T, C> {
    /// Heap-allocate `value` and become its sole owner (count of 1).
    pub fn new(value: T) -> Self {
        let raw = Box::into_raw(Box::new(value));
        let value = unsafe { NonNull::new_unchecked(raw) };
        Self {
            slots: Some(Slots::with_fresh_count(value)),
            _owns: PhantomData,
        }
    }

    /// The empty handle.
    pub const fn empty() -> Self {
        Self {
            slots: None,
            _owns: PhantomData,
        }
    }

    /// Adopt a raw allocation and start a fresh count of 1 for it; null
    /// yields the empty handle.
    ///
    /// # Safety
    /// A non-null `ptr` must come from `Box::into_raw` and must not be
    /// owned by any other handle group: the new group believes it is the
    /// only owner of the address.
    pub unsafe fn from_raw(ptr: *mut T) -> Self {
        Self {
            slots: NonNull::new(ptr).map(Slots::with_fresh_count),
            _owns: PhantomData,
        }
    }

    // Remove this handle from its owner group and conditionally free.
    // The policy reports what died; the pointee is always freed before
    // the count record. The handle is empty afterwards.
    fn remove_owner(&mut self) {
        let Some(slots) = self.slots.take() else {
            return;
        };
        let freed = unsafe { &*slots.count.as_ptr() }.release();
        if freed.free_value {
            drop(unsafe { Box::from_raw(slots.value.as_ptr()) });
        }
        if freed.free_count {
            drop(unsafe { Box::from_raw(slots.count.as_ptr()) });
        }
    }

    /// Stop owning the current pointee (freeing it if this was the last
    /// owner) and become empty.
    pub fn reset(&mut self) {
        self.remove_owner();
    }

    /// Release current ownership, then adopt `ptr` under a brand-new
    /// count of 1, unrelated to any owner group that might already hold
    /// the same address.
    ///
    /// # Safety
    /// Same contract as [`CountedHandle::from_raw`].
    pub unsafe fn reset_raw(&mut self, ptr: *mut T) {
        self.remove_owner();
        self.slots = NonNull::new(ptr).map(Slots::with_fresh_count);
    }

    /// Live strong owners of the pointee; 0 for the empty handle.
    pub fn owner_count(&self) -> usize {
        self.slots
            .map_or(0, |s| unsafe { &*s.count.as_ptr() }.strong_owners())
    }

    pub fn get(&self) -> Option<&T> {
        self.slots.map(|s| unsafe { &*s.value.as_ptr() })
    }

    /// Mutable access to the pointee, only while this handle is the
    /// sole reference to it.
    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self.slots {
            Some(s) if unsafe { &*s.count.as_ptr() }.exclusive() => {
                Some(unsafe { &mut *s.value.as_ptr() })
            }
            _ => None,
        }
    }

    /// Raw address of the pointee; null when empty. Ownership stays
    /// with the owner group.
    pub fn as_ptr(&self) -> *mut T {
        self.slots
            .map_or(core::ptr::null_mut(), |s| s.value.as_ptr())
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_none()
    }

    /// Identity, not value: do both handles own the same pointee? Two
    /// empty handles compare equal.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        self.as_ptr() == other.as_ptr()
    }
}

impl<T> ObservedHandle<T> {
    /// Read-only view of the counter record; `None` when empty.
    pub fn counter(&self) -> Option<&RefCounter> {
        self.slots.map(|s| unsafe { &*s.count.as_ptr() })
    }

    // Raw counter-slot address. A weak observer holds only this slot,
    // never the pointee pointer.
    // TODO: wire into the weak observer type once the `weak` feature
    // grows an implementation.
    #[allow(dead_code)]
    pub(crate) fn counter_slot(&self) -> Option<NonNull<RefCounter>> {
        self.slots.map(|s| s.count)
    }
}

/// Return one weak observation on `counter`, freeing the record when
/// nothing references it anymore. This is the drop path of the future
/// weak observer type.
///
/// # Safety
/// `counter` must point at a live record obtained from
/// `ObservedHandle::counter_slot`, and its weak count must cover this
/// call (one prior `increment_weak` not yet returned).
#[allow(dead_code)]
pub(crate) unsafe fn release_weak(counter: NonNull<RefCounter>) {
    let record = unsafe { &*counter.as_ptr() };
    record.decrement_weak();
    if record.has_no_reference() {
        drop(unsafe { Box::from_raw(counter.as_ptr()) });
    }
}

impl<T, C: SharePolicy> Clone for CountedHandle<T, C> {
    /// One more strong owner of the same pointee.
    fn clone(&self) -> Self {
        if let Some(s) = self.slots {
            unsafe { &*s.count.as_ptr() }.acquire();
        }
        Self {
            slots: self.slots,
            _owns: PhantomData,
        }
    }
}

impl<T, C: SharePolicy> Drop for CountedHandle<T, C> {
    fn drop(&mut self) {
        self.remove_owner();
    }
}

impl<T, C: SharePolicy> Default for CountedHandle<T, C> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, C: SharePolicy> From<T> for CountedHandle<T, C> {
    fn from(value: T) -> Self {
        Self::new(value)
    }
}

impl<T, C: SharePolicy> Deref for CountedHandle<T, C> {
    type Target = T;

    /// Undefined behavior on the empty handle; debug builds fail fast.
    fn deref(&self) -> &T {
        debug_assert!(self.slots.is_some(), "deref of empty handle");
        unsafe { &*self.as_ptr() }
    }
}

impl<T, C: SharePolicy> PartialEq for CountedHandle<T, C> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<T, C: SharePolicy> Eq for CountedHandle<T, C> {}

impl<T, C: SharePolicy> Hash for CountedHandle<T, C> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (self.as_ptr() as usize).hash(state);
    }
}

impl<T: fmt::Debug, C: SharePolicy> fmt::Debug for CountedHandle<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.get() {
            Some(v) => f.debug_tuple("CountedHandle").field(v).finish(),
            None => f.write_str("CountedHandle(empty)"),
        }
    }
}
