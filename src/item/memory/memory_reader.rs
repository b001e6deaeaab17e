use std::{cell::RefCell, collections::VecDeque};

use log::debug;

use crate::core::item::{ItemReader, ItemReaderResult};

/// Reads items from an owned collection, in input order.
///
/// # Examples
///
/// ```
/// use xmlable_batch::core::item::ItemReader;
/// use xmlable_batch::item::memory::InMemoryItemReader;
///
/// let reader = InMemoryItemReader::new(vec!["a", "b"]);
///
/// assert_eq!(reader.read().unwrap(), Some("a"));
/// assert_eq!(reader.read().unwrap(), Some("b"));
/// assert_eq!(reader.read().unwrap(), None);
/// ```
pub struct InMemoryItemReader<I> {
    items: RefCell<VecDeque<I>>,
}

impl<I> InMemoryItemReader<I> {
    pub fn new(items: impl IntoIterator<Item = I>) -> Self {
        Self {
            items: RefCell::new(items.into_iter().collect()),
        }
    }

    /// Number of items not read yet.
    pub fn remaining(&self) -> usize {
        self.items.borrow().len()
    }
}

impl<I> ItemReader<I> for InMemoryItemReader<I> {
    fn read(&self) -> ItemReaderResult<I> {
        let item = self.items.borrow_mut().pop_front();
        if item.is_none() {
            debug!("In-memory reader exhausted");
        }
        Ok(item)
    }
}
