//! Arena-backed intrusive recency list.
//!
//! Stores list nodes in a `Vec<Option<Node<T>>>` slab with a free list and
//! links them by [`SlotId`], giving stable handles and O(1) splice/move
//! operations without raw pointers. The LRU strategy keeps one node per live
//! key and remembers each node's `SlotId` next to the cached value.
//!
//! ## Architecture
//!
//! ```text
//!   slots (Vec<Option<Node<T>>>)            free: [3]
//!   ┌────────┬───────────────────────────────────────────┐
//!   │ SlotId │ Node { value, prev, next }                │
//!   ├────────┼───────────────────────────────────────────┤
//!   │ 0      │ { "q7", prev: None,    next: Some(2) }    │ ◄── head (MRU)
//!   │ 1      │ { "q2", prev: Some(2), next: None    }    │ ◄── tail (LRU)
//!   │ 2      │ { "q4", prev: Some(0), next: Some(1) }    │
//!   │ 3      │ None (vacant, reused by next push)        │
//!   └────────┴───────────────────────────────────────────┘
//! ```
//!
//! ## Operations
//!
//! | Operation       | Complexity |
//! |-----------------|------------|
//! | `push_front`    | O(1)       |
//! | `move_to_front` | O(1)       |
//! | `pop_back`      | O(1)       |
//! | `remove`        | O(1)       |
//! | `iter`          | O(n)       |
//!
//! `debug_validate_invariants()` is available in debug/test builds.

/// Stable handle to a node in a [`RecencyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Returns the raw slot index.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

/// Doubly linked list whose nodes live in a slab and are addressed by [`SlotId`].
///
/// The front is the most-recently-used end, the back the least-recently-used.
///
/// # Example
///
/// ```
/// use plancache::ds::RecencyList;
///
/// let mut list = RecencyList::new();
/// let a = list.push_front("a");
/// list.push_front("b");
/// list.push_front("c");
///
/// // "a" is the oldest; touching it makes "b" the oldest
/// list.move_to_front(a);
/// assert_eq!(list.back(), Some(&"b"));
/// assert_eq!(list.pop_back(), Some("b"));
/// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec!["a", "c"]);
/// ```
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the number of nodes in the list.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: SlotId) -> bool {
        self.node(id).is_some()
    }

    /// Returns the value at the front (MRU end).
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    /// Returns the value at the back (LRU end).
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Returns the handle of the back node.
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns the value stored at `id`.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    /// Inserts `value` at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let node = Node {
            value,
            prev: None,
            next: self.head,
        };
        let id = match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                SlotId(idx)
            },
            None => {
                self.slots.push(Some(node));
                SlotId(self.slots.len() - 1)
            },
        };
        match self.head {
            Some(old_head) => {
                if let Some(head_node) = self.node_mut(old_head) {
                    head_node.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        id
    }

    /// Moves an existing node to the front; returns `false` if `id` is vacant.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Removes and returns the back (least recently used) value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Unlinks `id` and frees its slot.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        let node = self.slots.get_mut(id.0)?.take()?;
        self.free.push(id.0);
        self.len -= 1;
        Some(node.value)
    }

    /// Removes every node and releases the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates from front (MRU) to back (LRU).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        self.slots.get(id.0).and_then(|slot| slot.as_ref())
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<T>> {
        self.slots.get_mut(id.0).and_then(|slot| slot.as_mut())
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.node(id)?;
            (node.prev, node.next)
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = next;
                }
            },
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.node_mut(next_id) {
                    next_node.prev = prev;
                }
            },
            None => self.tail = prev,
        }

        let node = self.node_mut(id)?;
        node.prev = None;
        node.next = None;
        Some(())
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(old_head) => {
                if let Some(head_node) = self.node_mut(old_head) {
                    head_node.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let node = self.node(id).expect("linked slot must be occupied");
            assert_eq!(node.prev, prev, "broken back link");
            prev = Some(id);
            current = node.next;
            count += 1;
            assert!(count <= self.len, "cycle detected in recency list");
        }
        assert_eq!(prev, self.tail);
        assert_eq!(count, self.len);
        assert_eq!(self.slots.len() - self.free.len(), self.len);
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`RecencyList`].
#[derive(Debug)]
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.node(id)?;
        self.current = node.next;
        Some(&node.value)
    }
}
