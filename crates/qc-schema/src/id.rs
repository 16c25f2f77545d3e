use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

///
/// ObjectId
///
/// A schema object's immutable 128-bit identity. Two objects are
/// never considered "the same object" by name alone: renames and rebases
/// preserve the id, so referrers recorded by id survive a rename.
///

#[derive(
    Clone, Copy, Debug, Display, Eq, PartialEq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct ObjectId(pub u128);

impl ObjectId {
    #[must_use]
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }
}

///
/// IdAllocator
///
/// Issues monotonically increasing object ids within one schema-building
/// session. Creation order is the tie-breaker used by nearest-common-ancestor
/// selection, so the allocator packs a creation sequence into the low
/// bits: `(counter << 64) | session_salt` keeps ids globally distinct across
/// sessions while `counter` alone gives a total creation order within one.
///

#[derive(Debug, Default)]
pub struct IdAllocator {
    counter: AtomicU64,
    session_salt: u64,
}

impl IdAllocator {
    #[must_use]
    pub const fn new(session_salt: u64) -> Self {
        Self {
            counter: AtomicU64::new(0),
            session_salt,
        }
    }

    pub fn next(&self) -> ObjectId {
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        ObjectId((u128::from(seq) << 64) | u128::from(self.session_salt))
    }

    /// Extract the creation sequence encoded by [`Self::next`], used to
    /// break ties deterministically among multiple nearest common ancestors.
    #[must_use]
    pub const fn creation_order(id: ObjectId) -> u64 {
        (id.0 >> 64) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_issued_in_increasing_creation_order() {
        let alloc = IdAllocator::new(7);
        let a = alloc.next();
        let b = alloc.next();
        assert!(IdAllocator::creation_order(a) < IdAllocator::creation_order(b));
    }

    #[test]
    fn ids_never_repeat_within_a_session() {
        let alloc = IdAllocator::new(1);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            assert!(seen.insert(alloc.next()));
        }
    }
}
