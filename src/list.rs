//! Intrusive recency list.
//!
//! A doubly linked list of `(group, index)` keys with the most recently
//! used entry at the head. Nodes are individually heap-allocated, so their
//! addresses are stable: each record-store entry keeps a raw pointer to its
//! node, giving O(1) promotion on every hit and O(1) removal from any
//! position. The eviction path pops the tail directly via the tail
//! sentinel's `prev` pointer.
//!
//! Sentinel head and tail nodes carry a dummy key and simplify every link
//! operation to the same four pointer writes.

use crate::key::RecordId;
use core::fmt;
use core::ptr;

/// A node in the recency list.
///
/// Holds a copy of the entry's key so that eviction, which only sees the
/// node, can find the store entry again by binary search.
pub(crate) struct AccessNode {
    key: RecordId,
    prev: *mut AccessNode,
    next: *mut AccessNode,
}

impl AccessNode {
    fn new(key: RecordId) -> Self {
        AccessNode {
            key,
            prev: ptr::null_mut(),
            next: ptr::null_mut(),
        }
    }

    /// Sentinel nodes carry a dummy key that is never read.
    fn sentinel() -> Self {
        Self::new(RecordId::default())
    }

    /// The key of the entry this node belongs to.
    #[allow(dead_code)]
    pub(crate) fn key(&self) -> RecordId {
        self.key
    }
}

/// Doubly linked recency list with sentinel head and tail.
///
/// Most recently used at the head, eviction victim at the tail. All
/// operations are O(1). The list owns its nodes; `unlink` and `pop_back`
/// deallocate, `Drop` frees whatever remains plus the sentinels.
pub(crate) struct AccessList {
    len: usize,
    head: *mut AccessNode,
    tail: *mut AccessNode,
}

impl AccessList {
    /// Creates an empty list with linked sentinels.
    pub(crate) fn new() -> AccessList {
        let head = Box::into_raw(Box::new(AccessNode::sentinel()));
        let tail = Box::into_raw(Box::new(AccessNode::sentinel()));

        let list = AccessList { len: 0, head, tail };

        // SAFETY: head and tail are newly allocated and valid pointers
        unsafe {
            (*list.head).next = list.tail;
            (*list.tail).prev = list.head;
        }

        list
    }

    /// Number of nodes currently in the list.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// True if the list holds no nodes.
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocates a node for `key` and links it at the head.
    ///
    /// Returns the node pointer for the owning store entry to keep. The
    /// pointer stays valid until `unlink`/`pop_back` frees the node.
    pub(crate) fn push_front(&mut self, key: RecordId) -> *mut AccessNode {
        let node = Box::into_raw(Box::new(AccessNode::new(key)));
        // SAFETY: node is newly allocated and not part of any list yet
        unsafe { self.attach(node) };
        self.len += 1;
        node
    }

    /// Moves `node` to the head, making its entry the most recently used.
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node currently in this list.
    pub(crate) unsafe fn move_to_front(&mut self, node: *mut AccessNode) {
        if node.is_null() || node == self.head || node == self.tail {
            return;
        }

        // SAFETY: caller guarantees node is a live member of this list
        unsafe {
            if (*self.head).next == node {
                return;
            }
            self.detach(node);
            self.attach(node);
        }
    }

    /// Removes and frees `node`, wherever it sits in the list.
    ///
    /// # Safety
    ///
    /// `node` must be a valid pointer to a node currently in this list,
    /// and must not be used again after this call.
    pub(crate) unsafe fn unlink(&mut self, node: *mut AccessNode) {
        if node.is_null() || node == self.head || node == self.tail {
            return;
        }

        // SAFETY: caller guarantees node is a live member of this list
        unsafe {
            self.detach(node);
            drop(Box::from_raw(node));
        }
        self.len -= 1;
    }

    /// Removes the tail node (least recently used) and returns its key.
    ///
    /// Returns `None` when the list is empty. The freed node's store entry
    /// must be condemned by the caller.
    pub(crate) fn pop_back(&mut self) -> Option<RecordId> {
        if self.is_empty() {
            return None;
        }
        // SAFETY: head and tail are valid sentinels and the list is not
        // empty, so tail.prev is a real node
        unsafe {
            let node = (*self.tail).prev;
            if node == self.head {
                return None;
            }
            self.detach(node);
            self.len -= 1;
            let key = (*node).key;
            drop(Box::from_raw(node));
            Some(key)
        }
    }

    /// Unlinks a node from its neighbors without deallocating it.
    ///
    /// # Safety
    ///
    /// `node` must be a valid, non-sentinel member of this list.
    unsafe fn detach(&mut self, node: *mut AccessNode) {
        // SAFETY: a live member's prev and next are valid nodes or sentinels
        unsafe {
            (*(*node).prev).next = (*node).next;
            (*(*node).next).prev = (*node).prev;
        }
    }

    /// Links a detached node directly after the head sentinel.
    ///
    /// # Safety
    ///
    /// `node` must be valid and not currently linked into any list.
    unsafe fn attach(&mut self, node: *mut AccessNode) {
        // SAFETY: head is a valid sentinel; caller guarantees node is
        // detached
        unsafe {
            (*node).next = (*self.head).next;
            (*node).prev = self.head;
            (*self.head).next = node;
            (*(*node).next).prev = node;
        }
    }
}

impl Drop for AccessList {
    fn drop(&mut self) {
        while self.pop_back().is_some() {}

        // SAFETY: the sentinels were allocated in `new` and all other nodes
        // are gone
        unsafe {
            drop(Box::from_raw(self.head));
            drop(Box::from_raw(self.tail));
            self.head = ptr::null_mut();
            self.tail = ptr::null_mut();
        }
    }
}

impl fmt::Debug for AccessList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessList").field("len", &self.len).finish()
    }
}
