use std::{cmp::Ordering, collections::VecDeque};

use super::Ranking;

/// Sequence of pending elements kept sorted by a [`Ranking`].
///
/// Elements the ranking treats as equal keep their insertion order.
#[derive(Debug, Clone)]
pub struct OrderedQueue<K> {
    items: VecDeque<K>,
}

impl<K> Default for OrderedQueue<K> {
    fn default() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<K> OrderedQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `item` before the first element it ranks strictly ahead of,
    /// or at the back. Returns the index it landed on.
    pub fn insert<R: Ranking<K> + ?Sized>(&mut self, item: K, ranking: &R) -> usize {
        let index = self
            .items
            .iter()
            .position(|incumbent| ranking.rank(&item, incumbent) == Ordering::Less)
            .unwrap_or(self.items.len());
        self.items.insert(index, item);
        index
    }

    pub fn peek(&self) -> Option<&K> {
        self.items.front()
    }

    pub fn poll(&mut self) -> Option<K> {
        self.items.pop_front()
    }

    pub fn at(&self, index: usize) -> Option<&K> {
        self.items.get(index)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<K> {
        self.items.remove(index)
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &K> {
        self.items.iter()
    }

    /// Releases every remaining element. The queue cannot be used afterwards.
    pub fn destroy(self) {
        drop(self.items);
    }
}

impl<K: PartialEq> OrderedQueue<K> {
    /// Removes every element identical to `item`, regardless of rank.
    pub fn remove_all_matching(&mut self, item: &K) -> usize {
        let before = self.items.len();
        self.items.retain(|queued| queued != item);
        before - self.items.len()
    }

    pub fn contains(&self, item: &K) -> bool {
        self.items.contains(item)
    }
}
