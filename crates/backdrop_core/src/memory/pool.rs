//! # Slot Pool
//!
//! Fixed-capacity storage with generational handles.

/// A fixed-capacity pool of slots.
///
/// Values are stored and removed individually. Every slot carries a
/// generation counter that is bumped when the slot is freed, so a handle
/// taken before a free never resolves to the value stored afterwards.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. Own it from one thread or wrap it in a mutex.
///
/// # Example
///
/// ```rust
/// use backdrop_core::SlotPool;
///
/// let mut pool: SlotPool<u32> = SlotPool::new(1);
/// let first = pool.allocate(7).unwrap();
/// assert_eq!(pool.free(first), Some(7));
///
/// let second = pool.allocate(8).unwrap();
/// assert_eq!(first.index(), second.index());
/// assert!(pool.get(first).is_none());
/// ```
#[derive(Debug)]
pub struct SlotPool<T> {
    /// The slots, `None` when free.
    slots: Box<[Slot<T>]>,
    /// Free list - indices of available slots.
    free_list: Vec<usize>,
    /// Number of occupied slots.
    occupied: usize,
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Handle to an occupied slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SlotHandle {
    index: usize,
    generation: u32,
}

impl SlotHandle {
    /// Index of the slot this handle points at.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Generation of the slot when this handle was issued.
    #[inline]
    #[must_use]
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl<T> SlotPool<T> {
    /// Creates a new pool with the specified capacity.
    ///
    /// All slots are allocated upfront.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        let slots: Vec<Slot<T>> = (0..capacity)
            .map(|_| Slot {
                generation: 0,
                value: None,
            })
            .collect();

        // Reversed so the lowest index is handed out first
        let free_list: Vec<usize> = (0..capacity).rev().collect();

        Self {
            slots: slots.into_boxed_slice(),
            free_list,
            occupied: 0,
        }
    }

    /// Returns the total capacity.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of occupied slots.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.occupied
    }

    /// Returns true if no slot is occupied.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    /// Returns true if every slot is occupied.
    #[inline]
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.free_list.is_empty()
    }

    /// Returns the number of free slots.
    #[inline]
    #[must_use]
    pub fn free_count(&self) -> usize {
        self.free_list.len()
    }

    /// Stores a value in a free slot.
    ///
    /// Returns `None` if the pool is full. O(1).
    pub fn allocate(&mut self, value: T) -> Option<SlotHandle> {
        let index = self.free_list.pop()?;
        let slot = &mut self.slots[index];
        slot.value = Some(value);
        self.occupied += 1;

        Some(SlotHandle {
            index,
            generation: slot.generation,
        })
    }

    /// Removes the value behind `handle`.
    ///
    /// Returns `None` if the handle is stale or out of range. O(1).
    pub fn free(&mut self, handle: SlotHandle) -> Option<T> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }

        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free_list.push(handle.index);
        self.occupied -= 1;

        Some(value)
    }

    /// Gets a reference to an occupied slot.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: SlotHandle) -> Option<&T> {
        let slot = self.slots.get(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_ref()
    }

    /// Gets a mutable reference to an occupied slot.
    #[inline]
    pub fn get_mut(&mut self, handle: SlotHandle) -> Option<&mut T> {
        let slot = self.slots.get_mut(handle.index)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.value.as_mut()
    }

    /// Returns true if `handle` still points at a live value.
    #[inline]
    #[must_use]
    pub fn contains(&self, handle: SlotHandle) -> bool {
        self.get(handle).is_some()
    }

    /// Empties every slot.
    ///
    /// Outstanding handles become stale. Storage is kept.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.free_list.clear();
        self.free_list.extend((0..self.slots.len()).rev());
        self.occupied = 0;
    }

    /// Iterates over occupied slots in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotHandle, &T)> {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.value.as_ref().map(|value| {
                (
                    SlotHandle {
                        index,
                        generation: slot.generation,
                    },
                    value,
                )
            })
        })
    }

    /// Iterates over occupied values in slot order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().filter_map(|slot| slot.value.as_ref())
    }
}
