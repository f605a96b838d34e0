use alloc::vec::Vec;

use super::handle::Handle;

enum Slot<T> {
    Occupied(T),
    // Vacant slots form a singly linked free list threaded through the arena.
    Vacant { next_free: Option<Handle> },
}

/// Slot storage addressed by [`Handle`]s, with released slots recycled LIFO.
///
/// Handles stay valid until the slot they name is released; the arena never
/// moves an element to another slot.
pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<Handle>,
    len: usize,
}

impl<T> Arena<T> {
    pub(crate) const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_head: None,
            len: 0,
        }
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            len: 0,
        }
    }

    /// Number of elements the arena can hold without reallocating, counting
    /// vacant slots that are waiting to be reused.
    pub(crate) fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    pub(crate) fn reserve(&mut self, additional: usize) {
        let vacant = self.slots.len() - self.len;
        self.slots.reserve(additional.saturating_sub(vacant));
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn alloc(&mut self, element: T) -> Handle {
        if let Some(handle) = self.free_head {
            let slot = &mut self.slots[handle.slot()];
            let Slot::Vacant { next_free } = *slot else {
                panic!("`Arena::alloc()` - free list points at an occupied slot!");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied(element);
            self.len += 1;
            return handle;
        }

        if self.slots.len() == self.slots.capacity() {
            log::trace!("arena growing past {} slots", self.slots.len());
        }
        let handle = Handle::from_slot(self.slots.len());
        self.slots.push(Slot::Occupied(element));
        self.len += 1;
        handle
    }

    #[inline]
    pub(crate) fn get(&self, handle: Handle) -> &T {
        match self.slots.get(handle.slot()) {
            Some(Slot::Occupied(element)) => element,
            _ => panic!("`Arena::get()` - `handle` is invalid!"),
        }
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, handle: Handle) -> &mut T {
        match self.slots.get_mut(handle.slot()) {
            Some(Slot::Occupied(element)) => element,
            _ => panic!("`Arena::get_mut()` - `handle` is invalid!"),
        }
    }

    /// Returns `true` if `handle` names an occupied slot.
    pub(crate) fn contains(&self, handle: Handle) -> bool {
        matches!(self.slots.get(handle.slot()), Some(Slot::Occupied(_)))
    }

    /// Moves the element out and puts its slot at the head of the free list.
    pub(crate) fn take(&mut self, handle: Handle) -> T {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match self.slots.get_mut(handle.slot()).map(|slot| core::mem::replace(slot, vacant)) {
            Some(Slot::Occupied(element)) => {
                self.free_head = Some(handle);
                self.len -= 1;
                element
            }
            Some(restored) => {
                // Put the vacant slot back untouched so the free list stays intact.
                self.slots[handle.slot()] = restored;
                panic!("`Arena::take()` - `handle` is invalid!");
            }
            None => panic!("`Arena::take()` - `handle` is invalid!"),
        }
    }

    /// Releases every slot at once, keeping the allocation.
    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.len = 0;
    }
}
