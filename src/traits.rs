// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Traits useful for Chirp8

use std::slice::SliceIndex;

/// Gets a `&[T]` at [SliceIndex] `I`.
///
/// This is similar to the [SliceIndex] method `.get(...)`, for types which own
/// a flat buffer but don't want to hand it out wholesale.
pub trait Grab<T> {
    /// Gets the slice of Self at [SliceIndex] I
    fn grab<I>(&self, index: I) -> Option<&<I as SliceIndex<[T]>>::Output>
    where
        I: SliceIndex<[T]>;

    /// Gets a mutable slice of Self at [SliceIndex] I
    fn grab_mut<I>(&mut self, index: I) -> Option<&mut <I as SliceIndex<[T]>>::Output>
    where
        I: SliceIndex<[T]>;
}
