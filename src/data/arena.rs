//! Generational arena, modeled after the generational-arena crate.
//!
//! Removing an element bumps the arena’s generation, so stale indices to a reused slot are
//! detected instead of silently aliasing the new element. Slots are reused in LIFO order, which
//! keeps the index attribution fully deterministic.
use std::ops;

/// The `Arena` allows inserting and removing elements that are referred to by `Index`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Arena<T> {
    items: Vec<Entry<T>>,
    generation: u32,
    free_list_head: Option<u32>,
    len: usize,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
enum Entry<T> {
    Free { next_free: Option<u32> },
    Occupied { generation: u32, value: T },
}

/// An index (and generation) into an `Arena`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Index {
    index: u32,
    generation: u32,
}

impl Index {
    /// Create a new `Index` from its raw parts.
    ///
    /// The parts must have been returned from an earlier call to `into_raw_parts`.
    pub fn from_raw_parts(index: u32, generation: u32) -> Index {
        Index { index, generation }
    }

    /// Convert this `Index` into its raw parts.
    pub fn into_raw_parts(self) -> (u32, u32) {
        (self.index, self.generation)
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Arena<T> {
        Arena::new()
    }
}

impl<T> Arena<T> {
    /// Constructs a new, empty `Arena`.
    pub fn new() -> Arena<T> {
        Arena {
            items: Vec::new(),
            generation: 0,
            free_list_head: None,
            len: 0,
        }
    }

    /// Insert `value` into the arena, allocating more capacity if necessary.
    ///
    /// The `value`'s associated index in the arena is returned.
    pub fn insert(&mut self, value: T) -> Index {
        self.len += 1;

        match self.free_list_head {
            Some(i) => {
                let next_free = match self.items[i as usize] {
                    Entry::Free { next_free } => next_free,
                    Entry::Occupied { .. } => panic!("corrupt free list"),
                };
                self.free_list_head = next_free;
                self.items[i as usize] = Entry::Occupied {
                    generation: self.generation,
                    value,
                };
                Index::from_raw_parts(i, self.generation)
            }
            None => {
                let i = self.items.len() as u32;
                self.items.push(Entry::Occupied {
                    generation: self.generation,
                    value,
                });
                Index::from_raw_parts(i, self.generation)
            }
        }
    }

    /// Remove the element at index `i` from the arena.
    ///
    /// If the element at index `i` is still in the arena, then it is returned. Otherwise
    /// `None` is returned.
    pub fn remove(&mut self, i: Index) -> Option<T> {
        if !self.contains(i) {
            return None;
        }

        let entry = std::mem::replace(
            &mut self.items[i.index as usize],
            Entry::Free {
                next_free: self.free_list_head,
            },
        );

        self.generation += 1;
        self.free_list_head = Some(i.index);
        self.len -= 1;

        match entry {
            Entry::Occupied { value, .. } => Some(value),
            Entry::Free { .. } => unreachable!(),
        }
    }

    /// Is the element at index `i` in the arena?
    pub fn contains(&self, i: Index) -> bool {
        self.get(i).is_some()
    }

    /// Get a shared reference to the element at index `i` if it is in the arena.
    pub fn get(&self, i: Index) -> Option<&T> {
        match self.items.get(i.index as usize) {
            Some(Entry::Occupied { generation, value }) if *generation == i.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Get an exclusive reference to the element at index `i` if it is in the arena.
    pub fn get_mut(&mut self, i: Index) -> Option<&mut T> {
        match self.items.get_mut(i.index as usize) {
            Some(Entry::Occupied { generation, value }) if *generation == i.generation => {
                Some(value)
            }
            _ => None,
        }
    }

    /// Get a pair of exclusive references to the elements at index `i1` and `i2` if they are in
    /// the arena.
    ///
    /// Panics if `i1` and `i2` point to the same slot.
    pub fn get2_mut(&mut self, i1: Index, i2: Index) -> (Option<&mut T>, Option<&mut T>) {
        assert_ne!(
            i1.index, i2.index,
            "Arena::get2_mut is called with two identical indices"
        );

        let (lo, hi, flipped) = if i1.index < i2.index {
            (i1, i2, false)
        } else {
            (i2, i1, true)
        };

        let split = (hi.index as usize).min(self.items.len());
        let (head, tail) = self.items.split_at_mut(split);
        let lo_value = match head.get_mut(lo.index as usize) {
            Some(Entry::Occupied { generation, value }) if *generation == lo.generation => {
                Some(value)
            }
            _ => None,
        };
        let hi_value = match tail.first_mut() {
            Some(Entry::Occupied { generation, value }) if *generation == hi.generation => {
                Some(value)
            }
            _ => None,
        };

        if flipped {
            (hi_value, lo_value)
        } else {
            (lo_value, hi_value)
        }
    }

    /// Get the number of elements in the arena.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the arena contains no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate over shared references to the elements in this arena, in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (Index, &T)> {
        self.items
            .iter()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Entry::Occupied { generation, value } => {
                    Some((Index::from_raw_parts(i as u32, *generation), value))
                }
                Entry::Free { .. } => None,
            })
    }

    /// Iterate over exclusive references to the elements in this arena, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Index, &mut T)> {
        self.items
            .iter_mut()
            .enumerate()
            .filter_map(|(i, entry)| match entry {
                Entry::Occupied { generation, value } => {
                    Some((Index::from_raw_parts(i as u32, *generation), value))
                }
                Entry::Free { .. } => None,
            })
    }

    /// Keeps only the elements for which `predicate` returns `true`.
    pub fn retain(&mut self, mut predicate: impl FnMut(Index, &mut T) -> bool) {
        let to_remove: Vec<Index> = self
            .iter_mut()
            .filter_map(|(i, value)| (!predicate(i, value)).then_some(i))
            .collect();

        for i in to_remove {
            let _ = self.remove(i);
        }
    }
}

impl<T> ops::Index<Index> for Arena<T> {
    type Output = T;

    fn index(&self, index: Index) -> &Self::Output {
        self.get(index).expect("No element at index")
    }
}

impl<T> ops::IndexMut<Index> for Arena<T> {
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        self.get_mut(index).expect("No element at index")
    }
}

#[cfg(test)]
mod test {
    use super::Arena;

    #[test]
    fn insert_get_remove() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena[a], 1);
        assert_eq!(arena.remove(a), Some(1));
        assert_eq!(arena.remove(a), None);
        assert_eq!(arena.get(a), None);
        assert_eq!(arena[b], 2);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn stale_index_does_not_alias_reused_slot() {
        let mut arena = Arena::new();
        let a = arena.insert("a");
        let _ = arena.remove(a);
        let c = arena.insert("c");
        assert_eq!(a.into_raw_parts().0, c.into_raw_parts().0);
        assert!(!arena.contains(a));
        assert_eq!(arena[c], "c");
    }

    #[test]
    fn get2_mut_in_both_orders() {
        let mut arena = Arena::new();
        let a = arena.insert(1);
        let b = arena.insert(2);

        let (x, y) = arena.get2_mut(b, a);
        *x.unwrap() += 10;
        *y.unwrap() += 20;
        assert_eq!(arena[a], 21);
        assert_eq!(arena[b], 12);
    }

    #[test]
    fn retain() {
        let mut arena = Arena::new();
        for i in 0..10 {
            let _ = arena.insert(i);
        }
        arena.retain(|_, v| *v % 2 == 0);
        assert_eq!(arena.len(), 5);
        assert!(arena.iter().all(|(_, v)| *v % 2 == 0));
    }
}
