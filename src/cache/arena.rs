//! Node Arena Module
//!
//! Slab of doubly linked list nodes addressed by integer handle.
//!
//! A single arena can host many lists. Each list is delimited by a pair of
//! sentinel nodes, so linking and unlinking never special-case the ends.
//! Freed slots go on a free list and are reused by later allocations.

// == Node Handle ==
/// Handle to a node inside a [`NodeArena`].
///
/// Operations on a freed handle are rejected, but once its slot is reused the
/// handle addresses the new node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug)]
struct Node<K> {
    /// `None` for sentinels and free slots
    key: Option<K>,
    prev: usize,
    next: usize,
}

// == Key List ==
/// A sentinel-delimited list living in a [`NodeArena`].
///
/// Front is the node right after the head sentinel, back is the node right
/// before the tail sentinel.
#[derive(Debug)]
pub struct KeyList {
    head: usize,
    tail: usize,
    len: usize,
}

impl KeyList {
    /// Number of keys in the list (sentinels excluded).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

// == Node Arena ==
#[derive(Debug)]
pub struct NodeArena<K> {
    nodes: Vec<Node<K>>,
    free: Vec<usize>,
}

impl<K> Default for NodeArena<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K> NodeArena<K> {
    // == Constructor ==
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            free: Vec::new(),
        }
    }

    // == List Lifecycle ==
    /// Allocates the two sentinels of a new, empty list.
    pub fn new_list(&mut self) -> KeyList {
        let head = self.alloc(None);
        let tail = self.alloc(None);
        self.nodes[head].next = tail;
        self.nodes[tail].prev = head;
        KeyList { head, tail, len: 0 }
    }

    /// Returns an empty list's sentinels to the free list.
    ///
    /// Nodes still linked into a non-empty list are released as well.
    pub fn release_list(&mut self, list: KeyList) {
        let mut cursor = self.nodes[list.head].next;
        while cursor != list.tail {
            let next = self.nodes[cursor].next;
            self.release(cursor);
            cursor = next;
        }
        self.release(list.head);
        self.release(list.tail);
    }

    // == Insertion ==
    /// Allocates a node for `key` and links it at the front of `list`.
    pub fn push_front(&mut self, list: &mut KeyList, key: K) -> NodeId {
        let idx = self.alloc(Some(key));
        self.link_after(list.head, idx);
        list.len += 1;
        NodeId(idx)
    }

    /// Allocates a node for `key` and links it at the back of `list`.
    pub fn push_back(&mut self, list: &mut KeyList, key: K) -> NodeId {
        let idx = self.alloc(Some(key));
        let last = self.nodes[list.tail].prev;
        self.link_after(last, idx);
        list.len += 1;
        NodeId(idx)
    }

    /// Allocates a node for `key` that belongs to no list yet.
    pub fn alloc_detached(&mut self, key: K) -> NodeId {
        NodeId(self.alloc(Some(key)))
    }

    // == Relinking ==
    /// Detaches a node from `list` without freeing it.
    ///
    /// The node keeps its key and can be linked into any list of this arena.
    /// Returns `false` and changes nothing if the node is freed or already
    /// detached.
    pub fn unlink(&mut self, list: &mut KeyList, id: NodeId) -> bool {
        let NodeId(idx) = id;
        if !self.is_linked(idx) {
            return false;
        }
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        self.nodes[prev].next = next;
        self.nodes[next].prev = prev;
        self.nodes[idx].prev = idx;
        self.nodes[idx].next = idx;
        list.len -= 1;
        true
    }

    /// Links a detached node at the front of `list`.
    ///
    /// Returns `false` if the node is freed or already linked.
    pub fn link_front(&mut self, list: &mut KeyList, id: NodeId) -> bool {
        if !self.is_detached(id.0) {
            return false;
        }
        self.link_after(list.head, id.0);
        list.len += 1;
        true
    }

    /// Links a detached node at the back of `list`.
    ///
    /// Returns `false` if the node is freed or already linked.
    pub fn link_back(&mut self, list: &mut KeyList, id: NodeId) -> bool {
        if !self.is_detached(id.0) {
            return false;
        }
        let last = self.nodes[list.tail].prev;
        self.link_after(last, id.0);
        list.len += 1;
        true
    }

    // == Removal ==
    /// Unlinks a node from `list`, frees its slot and returns its key.
    ///
    /// A stale handle (already removed or freed) yields `None` and leaves the
    /// arena untouched.
    pub fn remove(&mut self, list: &mut KeyList, id: NodeId) -> Option<K> {
        if !self.unlink(list, id) {
            return None;
        }
        self.release(id.0)
    }

    /// Frees a node that is no longer linked into any list.
    ///
    /// Returns `None` without freeing anything if the slot is already free or
    /// the node is still linked.
    pub fn free(&mut self, id: NodeId) -> Option<K> {
        let NodeId(idx) = id;
        if !self.is_detached(idx) {
            return None;
        }
        self.release(idx)
    }

    // == Inspection ==
    /// First node of `list`, if any.
    pub fn front(&self, list: &KeyList) -> Option<NodeId> {
        let first = self.nodes[list.head].next;
        (first != list.tail).then_some(NodeId(first))
    }

    /// Last node of `list`, if any.
    pub fn back(&self, list: &KeyList) -> Option<NodeId> {
        let last = self.nodes[list.tail].prev;
        (last != list.head).then_some(NodeId(last))
    }

    /// Key stored at `id`, or `None` for freed slots and sentinels.
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.nodes.get(id.0).and_then(|node| node.key.as_ref())
    }

    /// Iterates `list` from front to back.
    pub fn iter<'a>(&'a self, list: &KeyList) -> Iter<'a, K> {
        Iter {
            arena: self,
            cursor: self.nodes[list.head].next,
            tail: list.tail,
        }
    }

    /// Number of slots ever allocated, free or not.
    pub fn slots(&self) -> usize {
        self.nodes.len()
    }

    /// Number of slots currently in use, sentinels included.
    pub fn live(&self) -> usize {
        self.nodes.len() - self.free.len()
    }

    // == Internals ==
    /// Holds a key and sits in some list. Sentinels and free slots never do.
    fn is_linked(&self, idx: usize) -> bool {
        let node = &self.nodes[idx];
        node.key.is_some() && node.prev != idx
    }

    fn is_detached(&self, idx: usize) -> bool {
        let node = &self.nodes[idx];
        node.key.is_some() && node.prev == idx
    }

    fn alloc(&mut self, key: Option<K>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.nodes[idx] = Node {
                    key,
                    prev: idx,
                    next: idx,
                };
                idx
            }
            None => {
                let idx = self.nodes.len();
                self.nodes.push(Node {
                    key,
                    prev: idx,
                    next: idx,
                });
                idx
            }
        }
    }

    fn release(&mut self, idx: usize) -> Option<K> {
        let key = self.nodes[idx].key.take();
        self.nodes[idx].prev = idx;
        self.nodes[idx].next = idx;
        self.free.push(idx);
        key
    }

    fn link_after(&mut self, anchor: usize, idx: usize) {
        let next = self.nodes[anchor].next;
        self.nodes[idx].prev = anchor;
        self.nodes[idx].next = next;
        self.nodes[anchor].next = idx;
        self.nodes[next].prev = idx;
    }
}

// == Iterator ==
/// Front-to-back iterator over a [`KeyList`], yielding handles and keys.
pub struct Iter<'a, K> {
    arena: &'a NodeArena<K>,
    cursor: usize,
    tail: usize,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = (NodeId, &'a K);

    fn next(&mut self) -> Option<Self::Item> {
        while self.cursor != self.tail {
            let idx = self.cursor;
            let node = &self.arena.nodes[idx];
            self.cursor = node.next;
            if let Some(key) = node.key.as_ref() {
                return Some((NodeId(idx), key));
            }
        }
        None
    }
}
