// UniqueHandle unit test suite.
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Exclusivity: ownership moves, it never duplicates.
// - release() hands the allocation out without freeing it.
// - reset()/reset_raw() free exactly once, including the same-address
//   no-op case.
// - Dropping an empty handle is a no-op.
use rc_handles::UniqueHandle;
use std::cell::Cell;
use std::rc::Rc;

struct Probe(Rc<Cell<usize>>);
impl Drop for Probe {
    fn drop(&mut self) {
        self.0.set(self.0.get() + 1);
    }
}

fn probe() -> (Rc<Cell<usize>>, Probe) {
    let drops = Rc::new(Cell::new(0));
    let p = Probe(drops.clone());
    (drops, p)
}

// Test: construction and drop.
// Assumes: new() boxes the value in place.
// Verifies: the pointee is freed exactly once, at handle drop.
#[test]
fn new_then_drop_frees_once() {
    let (drops, p) = probe();
    let h = UniqueHandle::new(p);
    assert!(!h.is_empty());
    assert_eq!(drops.get(), 0);
    drop(h);
    assert_eq!(drops.get(), 1);
}

// Test: release() semantics.
// Assumes: release() transfers ownership to the caller.
// Verifies: the returned address is the original one, the handle is
// empty afterwards, and dropping it does not free.
#[test]
fn release_empties_and_returns_original_address() {
    let (drops, p) = probe();
    let mut h = UniqueHandle::new(p);
    let addr = h.as_ptr();

    let released = h.release().expect("handle was non-empty");
    assert_eq!(released.as_ptr(), addr);
    assert!(h.is_empty());
    assert!(h.as_ptr().is_null());

    drop(h);
    assert_eq!(drops.get(), 0, "released allocation must not be freed");

    // Re-adopt to clean up; freeing happens exactly once overall.
    let h2 = unsafe { UniqueHandle::from_raw(released.as_ptr()) };
    drop(h2);
    assert_eq!(drops.get(), 1);
}

// Test: reset() frees the current pointee.
// Verifies: the handle is empty afterwards and a later drop is a no-op.
#[test]
fn reset_frees_current_pointee() {
    let (drops, p) = probe();
    let mut h = UniqueHandle::new(p);
    h.reset();
    assert!(h.is_empty());
    assert_eq!(drops.get(), 1);
    drop(h);
    assert_eq!(drops.get(), 1);
}

// Test: reset_raw() with the currently held address.
// Assumes: adopting the same address must not free-then-adopt.
// Verifies: no double free; the handle still owns the pointee.
#[test]
fn reset_raw_same_address_is_noop() {
    let (drops, p) = probe();
    let mut h = UniqueHandle::new(p);
    let addr = h.as_ptr();

    unsafe { h.reset_raw(addr) };
    assert_eq!(h.as_ptr(), addr);
    assert_eq!(drops.get(), 0);

    drop(h);
    assert_eq!(drops.get(), 1);
}

// Test: reset_raw() with a different allocation.
// Verifies: the old pointee is freed, the new one is adopted, and null
// empties the handle.
#[test]
fn reset_raw_adopts_replacement() {
    let (drops_a, a) = probe();
    let (drops_b, b) = probe();
    let mut h = UniqueHandle::new(a);

    let raw_b = Box::into_raw(Box::new(b));
    unsafe { h.reset_raw(raw_b) };
    assert_eq!(drops_a.get(), 1);
    assert_eq!(drops_b.get(), 0);
    assert_eq!(h.as_ptr(), raw_b);

    unsafe { h.reset_raw(std::ptr::null_mut()) };
    assert!(h.is_empty());
    assert_eq!(drops_b.get(), 1);
}

// Test: move semantics via mem::take.
// Assumes: Default is the empty handle.
// Verifies: the source is empty after the move, the destination owns
// the original address, and the pointee is freed exactly once.
#[test]
fn take_moves_ownership_and_empties_source() {
    let (drops, p) = probe();
    let mut h = UniqueHandle::new(p);
    let addr = h.as_ptr();

    let moved = std::mem::take(&mut h);
    assert!(h.is_empty());
    assert_eq!(moved.as_ptr(), addr);
    assert_eq!(drops.get(), 0);

    drop(h);
    drop(moved);
    assert_eq!(drops.get(), 1);
}

// Test: accessors.
// Verifies: get/get_mut/Deref observe and mutate the pointee in place;
// get on the empty handle is None.
#[test]
fn accessors_reach_the_pointee() {
    let mut h = UniqueHandle::new(41u32);
    assert_eq!(*h, 41);
    *h.get_mut().expect("non-empty") += 1;
    assert_eq!(h.get().copied(), Some(42));
    assert_eq!(*h, 42);

    let empty: UniqueHandle<u32> = UniqueHandle::empty();
    assert!(empty.get().is_none());
}

// Test: raw constructors.
// Verifies: from_raw(null) is the empty handle; From<T> boxes in place.
#[test]
fn raw_and_value_constructors() {
    let empty = unsafe { UniqueHandle::<u32>::from_raw(std::ptr::null_mut()) };
    assert!(empty.is_empty());

    let h: UniqueHandle<String> = UniqueHandle::from("owned".to_string());
    assert_eq!(h.as_str(), "owned");
}
