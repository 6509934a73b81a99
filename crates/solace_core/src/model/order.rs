//! Ordered, restartable views over key-sorted collections.

use serde::{Deserialize, Serialize};

/// Listing direction over timestamp or date keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Oldest first.
    #[default]
    Chronological,
    /// Newest first.
    ReverseChronological,
}

/// Lazy iterator that walks a double-ended source in either direction.
///
/// Cloning yields an independent cursor at the same position, so a fresh
/// clone taken before iteration restarts the sequence.
#[derive(Debug, Clone)]
pub struct Ordered<I> {
    inner: I,
    order: SortOrder,
}

impl<I> Ordered<I> {
    pub fn new(inner: I, order: SortOrder) -> Self {
        Self { inner, order }
    }
}

impl<I: DoubleEndedIterator> Iterator for Ordered<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            SortOrder::Chronological => self.inner.next(),
            SortOrder::ReverseChronological => self.inner.next_back(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<I: DoubleEndedIterator> DoubleEndedIterator for Ordered<I> {
    fn next_back(&mut self) -> Option<Self::Item> {
        match self.order {
            SortOrder::Chronological => self.inner.next_back(),
            SortOrder::ReverseChronological => self.inner.next(),
        }
    }
}

impl<I: DoubleEndedIterator + ExactSizeIterator> ExactSizeIterator for Ordered<I> {}

#[cfg(test)]
mod tests {
    use super::{Ordered, SortOrder};

    #[test]
    fn reverse_order_walks_from_the_back() {
        let items = [1, 2, 3];
        let forward: Vec<_> = Ordered::new(items.iter(), SortOrder::Chronological).collect();
        let backward: Vec<_> =
            Ordered::new(items.iter(), SortOrder::ReverseChronological).collect();
        assert_eq!(forward, vec![&1, &2, &3]);
        assert_eq!(backward, vec![&3, &2, &1]);
    }

    #[test]
    fn clone_restarts_from_captured_position() {
        let items = [1, 2, 3];
        let view = Ordered::new(items.iter(), SortOrder::Chronological);
        let first: Vec<_> = view.clone().collect();
        let second: Vec<_> = view.collect();
        assert_eq!(first, second);
    }
}
