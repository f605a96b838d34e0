use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// Stable address of a node slot inside an [`Arena`](super::arena::Arena).
///
/// Slot `i` is stored as `i + 1`, so `Option<Handle>` has the same size as
/// `Handle` and `None` can stand in for the nil leaf of the tree.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    /// The number of distinct slots a handle can address.
    pub(crate) const SLOT_LIMIT: usize = RawHandle::MAX as usize;

    #[inline]
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) const fn from_slot(slot: usize) -> Self {
        assert!(slot < Self::SLOT_LIMIT, "`Handle::from_slot()` - `slot` >= `Handle::SLOT_LIMIT`!");
        match NonZero::new(slot as RawHandle + 1) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn slot(self) -> usize {
        (self.0.get() - 1) as usize
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use static_assertions::assert_eq_size;

    // `None` must fit in the niche left by slot zero.
    assert_eq_size!(Handle, Option<Handle>);
    assert_eq_size!(Handle, RawHandle);

    #[test]
    #[should_panic(expected = "`Handle::from_slot()` - `slot` >= `Handle::SLOT_LIMIT`!")]
    fn slot_past_limit_panics() {
        let _ = Handle::from_slot(Handle::SLOT_LIMIT);
    }

    #[test]
    fn last_addressable_slot() {
        let handle = Handle::from_slot(Handle::SLOT_LIMIT - 1);
        assert_eq!(handle.slot(), Handle::SLOT_LIMIT - 1);
    }

    proptest! {
        #[test]
        fn slot_survives_encoding(slot in 0..Handle::SLOT_LIMIT) {
            prop_assert_eq!(Handle::from_slot(slot).slot(), slot);
        }
    }
}
