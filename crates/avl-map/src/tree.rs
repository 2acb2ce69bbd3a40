use std::iter;

use crate::error::AvlError;
use crate::node::AvlNode;

fn default_comparator<K: PartialOrd>(a: &K, b: &K) -> i32 {
    if a == b {
        0
    } else if a < b {
        -1
    } else {
        1
    }
}

/// Height-balanced (AVL) ordered map over a `Vec`-backed node arena.
///
/// Node links are `Option<u32>` arena indices rather than pointers; the
/// parent index on each node lets every operation rebalance by walking the
/// ancestor chain up to the root after a structural change. Indices are
/// stable: an entry keeps its index until it is deleted, and freed slots
/// are reused by later inserts.
pub struct AvlMap<K, V, C = fn(&K, &K) -> i32>
where
    C: Fn(&K, &K) -> i32,
{
    arena: Vec<AvlNode<K, V>>,
    /// Vacant arena slots awaiting reuse. A freed slot keeps its stale
    /// entry until the next insert overwrites it.
    free: Vec<u32>,
    root: Option<u32>,
    size: usize,
    comparator: C,
}

impl<K, V> AvlMap<K, V>
where
    K: PartialOrd,
{
    pub fn new() -> Self {
        Self::with_comparator(default_comparator::<K>)
    }
}

impl<K, V> Default for AvlMap<K, V>
where
    K: PartialOrd,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> AvlMap<K, V, C>
where
    C: Fn(&K, &K) -> i32,
{
    pub fn with_comparator(comparator: C) -> Self {
        Self {
            arena: Vec::new(),
            free: Vec::new(),
            root: None,
            size: 0,
            comparator,
        }
    }

    #[inline]
    fn node(&self, i: u32) -> &AvlNode<K, V> {
        &self.arena[i as usize]
    }

    #[inline]
    fn node_mut(&mut self, i: u32) -> &mut AvlNode<K, V> {
        &mut self.arena[i as usize]
    }

    /// Height of the subtree at `i`, with absent subtrees counting as 0.
    #[inline]
    fn h(&self, i: Option<u32>) -> u32 {
        i.map_or(0, |i| self.node(i).height)
    }

    /// Balance factor, `height(left) - height(right)`.
    #[inline]
    fn balance(&self, i: u32) -> i32 {
        self.h(self.node(i).l) as i32 - self.h(self.node(i).r) as i32
    }

    #[inline]
    fn fix_height(&mut self, i: u32) {
        let h = 1 + self.h(self.node(i).l).max(self.h(self.node(i).r));
        self.node_mut(i).height = h;
    }

    fn alloc(&mut self, k: K, v: V) -> u32 {
        match self.free.pop() {
            Some(i) => {
                self.arena[i as usize] = AvlNode::new(k, v);
                i
            }
            None => {
                let i = self.arena.len() as u32;
                self.arena.push(AvlNode::new(k, v));
                i
            }
        }
    }

    fn release(&mut self, i: u32) {
        self.free.push(i);
    }

    /// Arena index of `key`'s entry, if present.
    pub fn find(&self, key: &K) -> Option<u32> {
        let mut curr = self.root;
        while let Some(i) = curr {
            let cmp = (self.comparator)(key, &self.node(i).k);
            if cmp == 0 {
                return Some(i);
            }
            curr = if cmp < 0 {
                self.node(i).l
            } else {
                self.node(i).r
            };
        }
        None
    }

    /// Inserts `key` with `value`, returning the entry's arena index.
    ///
    /// Keys are unique: inserting an existing key overwrites its value in
    /// place and leaves the structure (and size) untouched. A new key is
    /// attached as a leaf, after which every ancestor up to the root is
    /// rebalanced.
    pub fn insert(&mut self, key: K, value: V) -> u32 {
        let Some(mut curr) = self.root else {
            let i = self.alloc(key, value);
            self.root = Some(i);
            self.size = 1;
            return i;
        };
        loop {
            let cmp = (self.comparator)(&key, &self.node(curr).k);
            if cmp == 0 {
                self.node_mut(curr).v = value;
                return curr;
            }
            let next = if cmp < 0 {
                self.node(curr).l
            } else {
                self.node(curr).r
            };
            match next {
                Some(n) => curr = n,
                None => {
                    let i = self.alloc(key, value);
                    self.node_mut(i).p = Some(curr);
                    if cmp < 0 {
                        self.node_mut(curr).l = Some(i);
                    } else {
                        self.node_mut(curr).r = Some(i);
                    }
                    self.size += 1;
                    self.rebalance_up(curr);
                    return i;
                }
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|i| &self.node(i).v)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let i = self.find(key)?;
        Some(&mut self.node_mut(i).v)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes `key` from the map.
    ///
    /// The lookup runs first: on a missing key (including the empty map)
    /// this returns [`AvlError::KeyNotFound`] without mutating anything.
    pub fn delete(&mut self, key: &K) -> Result<(), AvlError> {
        let Some(target) = self.find(key) else {
            return Err(AvlError::KeyNotFound);
        };
        if self.size == 1 {
            // Sole entry; a successful find means it is the root.
            self.clear();
            return Ok(());
        }
        self.remove_at(target);
        self.size -= 1;
        Ok(())
    }

    /// Structural removal of the entry at `n` (the map holds at least two
    /// entries here, so a leaf target always has a parent).
    fn remove_at(&mut self, n: u32) {
        let (l, r) = (self.node(n).l, self.node(n).r);
        match (l, r) {
            (Some(_), Some(r)) => {
                // In-order successor: leftmost of the right subtree, so it
                // has at most a right child and can be spliced out. The
                // target keeps its index and adopts the successor's entry.
                let succ = self.find_min(r);
                let succ_parent = self.node(succ).p.expect("successor has a parent");
                self.splice_out(succ);
                self.swap_kv(n, succ);
                self.release(succ);
                self.rebalance_up(succ_parent);
            }
            (None, None) => {
                let p = self.node(n).p.expect("leaf target has a parent");
                if self.node(p).l == Some(n) {
                    self.node_mut(p).l = None;
                } else {
                    self.node_mut(p).r = None;
                }
                self.release(n);
                self.rebalance_up(p);
            }
            _ => {
                let c = l.or(r).expect("exactly one child");
                let p = self.node(n).p;
                self.node_mut(c).p = p;
                match p {
                    Some(p) => {
                        if self.node(p).l == Some(n) {
                            self.node_mut(p).l = Some(c);
                        } else {
                            self.node_mut(p).r = Some(c);
                        }
                        self.release(n);
                        self.rebalance_up(p);
                    }
                    None => {
                        // Deleting the root: reassign the root index to the
                        // surviving child instead of overwriting identities.
                        self.root = Some(c);
                        self.release(n);
                        self.rebalance_up(c);
                    }
                }
            }
        }
    }

    /// Unlinks a node with at most one child, pointing its parent at the
    /// surviving child (or nothing) and the child back at the parent.
    fn splice_out(&mut self, i: u32) {
        let p = self.node(i).p.expect("spliced node has a parent");
        let child = self.node(i).l.or(self.node(i).r);
        if self.node(p).l == Some(i) {
            self.node_mut(p).l = child;
        } else {
            self.node_mut(p).r = child;
        }
        if let Some(c) = child {
            self.node_mut(c).p = Some(p);
        }
    }

    /// Swaps the key/value entries of two distinct slots, leaving links and
    /// heights where they are.
    fn swap_kv(&mut self, a: u32, b: u32) {
        debug_assert_ne!(a, b);
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        let (head, tail) = self.arena.split_at_mut(hi as usize);
        let (x, y) = (&mut head[lo as usize], &mut tail[0]);
        std::mem::swap(&mut x.k, &mut y.k);
        std::mem::swap(&mut x.v, &mut y.v);
    }

    /// Re-establishes heights and AVL balance at every node from `from` up
    /// to the root. A single rotation at the lowest imbalanced node is not
    /// enough after a deletion, so the walk never stops early.
    fn rebalance_up(&mut self, from: u32) {
        let mut curr = Some(from);
        while let Some(i) = curr {
            self.fix_balance(i);
            // After a rotation at `i` this is the promoted node, so the
            // walk still covers the whole ancestor chain.
            curr = self.node(i).p;
        }
    }

    fn fix_balance(&mut self, i: u32) {
        self.fix_height(i);
        let balance = self.balance(i);
        if balance > 1 {
            let l = self.node(i).l.expect("left-heavy node has a left child");
            if self.balance(l) < 0 {
                // Left-right case: "big" rotation.
                self.rotate_left(l);
            }
            self.rotate_right(i);
        } else if balance < -1 {
            let r = self.node(i).r.expect("right-heavy node has a right child");
            if self.balance(r) > 0 {
                // Right-left case.
                self.rotate_right(r);
            }
            self.rotate_left(i);
        }
    }

    /// Promotes `x`'s right child into `x`'s position.
    fn rotate_left(&mut self, x: u32) {
        let y = self.node(x).r.expect("rotation pivot has a right child");
        let inner = self.node(y).l;
        self.node_mut(x).r = inner;
        if let Some(c) = inner {
            self.node_mut(c).p = Some(x);
        }
        let p = self.node(x).p;
        self.node_mut(y).p = p;
        match p {
            None => self.root = Some(y),
            Some(p) => {
                if self.node(p).l == Some(x) {
                    self.node_mut(p).l = Some(y);
                } else {
                    self.node_mut(p).r = Some(y);
                }
            }
        }
        self.node_mut(y).l = Some(x);
        self.node_mut(x).p = Some(y);
        // x first: y's height depends on x's new height.
        self.fix_height(x);
        self.fix_height(y);
    }

    /// Promotes `x`'s left child into `x`'s position.
    fn rotate_right(&mut self, x: u32) {
        let y = self.node(x).l.expect("rotation pivot has a left child");
        let inner = self.node(y).r;
        self.node_mut(x).l = inner;
        if let Some(c) = inner {
            self.node_mut(c).p = Some(x);
        }
        let p = self.node(x).p;
        self.node_mut(y).p = p;
        match p {
            None => self.root = Some(y),
            Some(p) => {
                if self.node(p).l == Some(x) {
                    self.node_mut(p).l = Some(y);
                } else {
                    self.node_mut(p).r = Some(y);
                }
            }
        }
        self.node_mut(y).r = Some(x);
        self.node_mut(x).p = Some(y);
        self.fix_height(x);
        self.fix_height(y);
    }

    /// Leftmost index of the subtree at `i`.
    fn find_min(&self, i: u32) -> u32 {
        let mut curr = i;
        while let Some(l) = self.node(curr).l {
            curr = l;
        }
        curr
    }

    /// Index holding the smallest key, if any.
    pub fn first(&self) -> Option<u32> {
        self.root.map(|r| self.find_min(r))
    }

    /// In-order successor of the entry at `i`, or `None` at the maximum.
    ///
    /// With a right child the successor is the leftmost of that subtree;
    /// otherwise the walk climbs parent links while the current node is a
    /// right child and stops at the first ancestor entered from the left.
    pub fn next(&self, i: u32) -> Option<u32> {
        if let Some(r) = self.node(i).r {
            return Some(self.find_min(r));
        }
        let mut curr = i;
        let mut p = self.node(i).p;
        while let Some(pi) = p {
            if self.node(pi).r == Some(curr) {
                curr = pi;
                p = self.node(pi).p;
            } else {
                return Some(pi);
            }
        }
        None
    }

    /// Lazy in-order iterator over arena indices. Restartable: each call
    /// yields a fresh pass from the smallest key.
    pub fn entries(&self) -> impl Iterator<Item = u32> + '_ {
        let mut curr = self.first();
        iter::from_fn(move || {
            let i = curr?;
            curr = self.next(i);
            Some(i)
        })
    }

    /// Lazy in-order iterator over `(key, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.entries().map(move |i| {
            let n = self.node(i);
            (&n.k, &n.v)
        })
    }

    /// Lazy in-order iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    /// Drops every entry and resets the map to empty.
    pub fn clear(&mut self) {
        self.arena.clear();
        self.free.clear();
        self.root = None;
        self.size = 0;
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Height of the tree; 0 when empty, 1 for a single entry.
    pub fn height(&self) -> u32 {
        self.h(self.root)
    }

    pub fn root(&self) -> Option<u32> {
        self.root
    }

    pub fn key(&self, i: u32) -> &K {
        &self.node(i).k
    }

    pub fn value(&self, i: u32) -> &V {
        &self.node(i).v
    }

    pub fn left(&self, i: u32) -> Option<u32> {
        self.node(i).l
    }

    pub fn right(&self, i: u32) -> Option<u32> {
        self.node(i).r
    }

    pub fn parent(&self, i: u32) -> Option<u32> {
        self.node(i).p
    }

    /// Checks every structural invariant: parent-link agreement, stored
    /// heights, AVL balance, strict key order and size accounting.
    pub fn assert_valid(&self) -> Result<(), String> {
        let Some(root) = self.root else {
            if self.size != 0 {
                return Err(format!("empty root with recorded size {}", self.size));
            }
            return Ok(());
        };
        if self.node(root).p.is_some() {
            return Err("root has a parent".to_string());
        }
        self.validate_subtree(root)?;

        let mut count = 0usize;
        let mut prev: Option<u32> = None;
        let mut curr = Some(self.find_min(root));
        while let Some(i) = curr {
            if let Some(pv) = prev {
                if (self.comparator)(&self.node(pv).k, &self.node(i).k) >= 0 {
                    return Err("key order violated".to_string());
                }
            }
            count += 1;
            prev = Some(i);
            curr = self.next(i);
        }
        if count != self.size {
            return Err(format!(
                "size mismatch: counted {count}, recorded {}",
                self.size
            ));
        }
        Ok(())
    }

    /// Validates links, heights and balance below `i`; returns the
    /// computed subtree height.
    fn validate_subtree(&self, i: u32) -> Result<u32, String> {
        let (l, r) = (self.node(i).l, self.node(i).r);
        if let Some(l) = l {
            if self.node(l).p != Some(i) {
                return Err("broken parent link on left child".to_string());
            }
        }
        if let Some(r) = r {
            if self.node(r).p != Some(i) {
                return Err("broken parent link on right child".to_string());
            }
        }
        let lh = l.map(|l| self.validate_subtree(l)).transpose()?.unwrap_or(0);
        let rh = r.map(|r| self.validate_subtree(r)).transpose()?.unwrap_or(0);
        let expected = 1 + lh.max(rh);
        if self.node(i).height != expected {
            return Err(format!(
                "height mismatch at {i}: stored {}, computed {expected}",
                self.node(i).height
            ));
        }
        let bf = lh as i32 - rh as i32;
        if !(-1..=1).contains(&bf) {
            return Err(format!("AVL balance violated at {i}: {bf}"));
        }
        Ok(expected)
    }
}
