//! rc-handles: single-threaded unique and reference-counted ownership
//! handles over manually managed heap allocations, with the counter
//! records spelled out as explicit types.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: build the handles in small, verifiable layers so each piece
//!   can be reasoned about independently.
//! - Layers:
//!   - CheckedCount: `Cell`-backed counter that fails fast on misuse
//!     (abort on overflow, panic on underflow) instead of wrapping.
//!   - SharePolicy, with OwnerCount and RefCounter implementations:
//!     what the counts mean for a shared handle, and when the pointee
//!     and the count record die.
//!   - UniqueHandle / SharedHandle / ObservedHandle: the public
//!     ownership types. One generic CountedHandle implementation backs
//!     both shared variants, so copy/move/drop logic exists exactly
//!     once.
//!
//! Constraints
//! - Single-threaded: `!Send`/`!Sync` by design (no atomics). Handles
//!   hold raw pointers and `Cell` counts; cross-thread use is out of
//!   contract.
//! - Pointee and count record live in separate allocations, so the
//!   record can outlive the pointee for weak observers.
//! - Free order on last release is fixed: pointee first, record second.
//! - Copying a UniqueHandle is a compile error, not a runtime one.
//!
//! Why this split?
//! - Localize invariants: each layer has a small, precise contract.
//! - Minimize unsafe: raw-pointer handling is confined to the handle
//!   types; the count policies are safe code throughout.
//! - The strong-only and weak-aware shared handles differ in exactly
//!   one decision (when the record dies), so that decision is the only
//!   thing the policy trait lets them vary.
//!
//! Count failure semantics
//! - Overflow aborts the process, matching `Rc`: a wrapped count cannot
//!   be recovered from and no runtime unwinding should observe it.
//! - Underflow (decrement on a zero count) panics. It means an owner
//!   was released twice upstream; the handle's invariant is already
//!   gone, so the failure is fatal rather than a `Result`.
//!
//! Notes and non-goals
//! - No weak handle type yet. The `weak` cargo feature is reserved for
//!   it; `RefCounter` and the crate-internal counter-slot hooks are
//!   already shaped so a weak observer holds only the record, never the
//!   pointee pointer, and upgrades only while `strong_count > 0`.
//! - No cycle detection and no garbage collection; a cycle of shared
//!   handles leaks, as with `Rc`.
//! - No allocator customization: allocation goes through `Box`, and
//!   allocation failure is the global allocator's policy.
//! - Dereferencing an empty handle is undefined behavior in release
//!   builds and a checked failure (`debug_assert`) in debug builds.

mod counted_handle;
mod counts;
mod ref_counter;
mod unique_handle;

// Public surface
pub use counted_handle::{CountedHandle, ObservedHandle, SharedHandle};
pub use counts::{CheckedCount, OwnerCount, Release, SharePolicy};
pub use ref_counter::RefCounter;
pub use unique_handle::UniqueHandle;
