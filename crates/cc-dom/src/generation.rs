//! Slot generations
//!
//! Every arena slot carries a generation that is bumped when the slot is
//! freed. A `NodeId` remembers the generation it was issued with, so an id
//! kept past its node's lifetime stops resolving instead of aliasing
//! whatever node reuses the slot.

/// Generation counter for one arena slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[repr(transparent)]
pub struct Generation(u32);

impl Generation {
    /// Generation of a never-freed slot
    pub const INITIAL: Self = Generation(0);

    /// Get the raw value
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Get the next generation
    #[inline]
    pub const fn next(self) -> Self {
        Generation(self.0.wrapping_add(1))
    }
}
