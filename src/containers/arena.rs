//! Generational node slab for the linked containers.
//!
//! Nodes live in a `Vec` and link to each other by index, so no raw pointers
//! are needed. Slot 0 is the sentinel root and never holds a value. Freed
//! slots go on a free list and their generation is bumped, which is how a
//! cursor holding `(index, generation)` learns its node was removed.

/// Link value meaning "no node".
pub(crate) const NIL: u32 = u32::MAX;

/// Index of the sentinel root.
pub(crate) const ROOT: u32 = 0;

#[derive(Clone, Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: Option<T>,
    pub(crate) next: u32,
    pub(crate) prev: u32,
    generation: u32,
}

/// A node reference that can detect reuse of its slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Slot {
    pub(crate) index: u32,
    pub(crate) generation: u32,
}

impl Slot {
    /// The slot used for "past the last node" in lists without a ring.
    pub(crate) const END: Slot = Slot { index: NIL, generation: 0 };
}

#[derive(Clone, Debug)]
pub(crate) struct Arena<T> {
    nodes: Vec<Node<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Arena<T> {
    /// An arena holding only the root, linked to itself.
    pub(crate) fn new() -> Arena<T> {
        return Arena {
            nodes: vec![Node { value: None, next: ROOT, prev: ROOT, generation: 0 }],
            free: Vec::new(),
            len: 0,
        };
    }

    /// Number of live value nodes.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        return self.len;
    }

    /// Store `value` in a fresh or recycled node. Links are left as `NIL`.
    pub(crate) fn alloc(&mut self, value: T) -> u32 {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let node = &mut self.nodes[index as usize];
            node.value = Some(value);
            node.next = NIL;
            node.prev = NIL;
            return index;
        }
        let index = self.nodes.len() as u32;
        self.nodes.push(Node { value: Some(value), next: NIL, prev: NIL, generation: 0 });
        return index;
    }

    /// Take the value out of `index` and recycle the node.
    ///
    /// The caller unlinks the node first.
    pub(crate) fn release(&mut self, index: u32) -> Option<T> {
        debug_assert_ne!(index, ROOT);
        let node = &mut self.nodes[index as usize];
        let value = node.value.take()?;
        node.generation = node.generation.wrapping_add(1);
        node.next = NIL;
        node.prev = NIL;
        self.free.push(index);
        self.len -= 1;
        return Some(value);
    }

    #[inline]
    pub(crate) fn node(&self, index: u32) -> &Node<T> {
        return &self.nodes[index as usize];
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, index: u32) -> &mut Node<T> {
        return &mut self.nodes[index as usize];
    }

    /// The current slot for a node index. `NIL` maps to `Slot::END`.
    #[inline]
    pub(crate) fn slot(&self, index: u32) -> Slot {
        if index == NIL {
            return Slot::END;
        }
        return Slot { index, generation: self.nodes[index as usize].generation };
    }

    /// Whether `slot` still names the node it was taken from.
    #[inline]
    pub(crate) fn is_live(&self, slot: Slot) -> bool {
        if slot.index == NIL {
            return true;
        }
        return match self.nodes.get(slot.index as usize) {
            Some(node) => {
                node.generation == slot.generation && (slot.index == ROOT || node.value.is_some())
            }
            None => false,
        };
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        return Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_is_always_live() {
        let arena: Arena<u8> = Arena::new();
        assert!(arena.is_live(arena.slot(ROOT)));
        assert!(arena.is_live(Slot::END));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn release_invalidates_slot() {
        let mut arena = Arena::new();
        let index = arena.alloc("a");
        let slot = arena.slot(index);
        assert!(arena.is_live(slot));

        assert_eq!(arena.release(index), Some("a"));
        assert!(!arena.is_live(slot));
        assert_eq!(arena.len(), 0);
    }

    #[test]
    fn recycled_node_gets_new_generation() {
        let mut arena = Arena::new();
        let first = arena.alloc(1);
        let old = arena.slot(first);
        arena.release(first);

        let second = arena.alloc(2);
        assert_eq!(first, second);
        assert!(!arena.is_live(old));
        assert!(arena.is_live(arena.slot(second)));
    }

    #[test]
    fn double_release_is_refused() {
        let mut arena = Arena::new();
        let index = arena.alloc(7);
        assert_eq!(arena.release(index), Some(7));
        assert_eq!(arena.release(index), None);
        assert_eq!(arena.len(), 0);
    }
}
