//! Segment trie for longest-prefix route lookup.
//!
//! Each edge is one path segment, so a prefix only ever matches at a
//! segment boundary: `/foo` matches `/foo` and `/foo/bar` but never
//! `/foobar`. A lookup walks the request path once and remembers the
//! deepest node that carries a value, giving O(path length) longest-prefix
//! matching regardless of how many prefixes are registered.

use std::collections::HashMap;

use super::path::segments;

#[derive(Debug)]
struct Node<T> {
    value: Option<T>,
    children: HashMap<Box<str>, Node<T>>,
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self {
            value: None,
            children: HashMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct PrefixTrie<T> {
    root: Node<T>,
    len: usize,
}

impl<T> Default for PrefixTrie<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> PrefixTrie<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::default(),
            len: 0,
        }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Register `value` under `prefix`, returning the value it replaced.
    pub fn insert(&mut self, prefix: &str, value: T) -> Option<T> {
        let mut node = &mut self.root;
        for segment in segments(prefix) {
            node = node.children.entry(segment.into()).or_default();
        }
        let previous = node.value.replace(value);
        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Find the most specific registered prefix of `path`.
    ///
    /// Returns the value together with the number of bytes of `path` the
    /// prefix covers; `&path[len..]` is the unmatched remainder, which is
    /// either empty or starts with `/`.
    #[must_use]
    pub fn longest_match(&self, path: &str) -> Option<(&T, usize)> {
        if !path.starts_with('/') {
            return None;
        }

        // The root prefix `/` covers the whole of `/` but nothing of deeper paths.
        let root_len = if path == "/" { 1 } else { 0 };
        let mut best = self.root.value.as_ref().map(|v| (v, root_len));

        let mut node = &self.root;
        let mut consumed = 0;
        for segment in segments(path) {
            let Some(child) = node.children.get(segment) else {
                break;
            };
            consumed += 1 + segment.len();
            if let Some(ref value) = child.value {
                best = Some((value, consumed));
            }
            node = child;
        }

        best
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            while let Some(node) = stack.pop() {
                stack.extend(node.children.values());
                if let Some(ref value) = node.value {
                    return Some(value);
                }
            }
            None
        })
    }
}
