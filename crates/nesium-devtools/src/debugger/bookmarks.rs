//! Address bookmarks for the debugger's bookmark list.
//!
//! Bookmarks are keyed by CPU address and kept in a `BTreeMap`, so iteration
//! always yields them in ascending address order no matter how they were
//! inserted. Counts are small and every operation is user-paced.

use std::collections::BTreeMap;
use std::collections::btree_map;

use serde::{Deserialize, Serialize};

use crate::error::DevtoolsError;

/// A named marker on a CPU address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    pub addr: u16,
    pub name: String,
}

impl Bookmark {
    pub fn new(addr: u16, name: impl Into<String>) -> Self {
        Self {
            addr,
            name: name.into(),
        }
    }
}

/// Owns every bookmark of a debugging session.
///
/// Adding at an address that already has a bookmark replaces it. Renaming is
/// the only in-place mutation; moving a bookmark means delete + add.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookmarkManager {
    entries: BTreeMap<u16, Bookmark>,
}

impl BookmarkManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a bookmark at `addr`, returning the one it replaced.
    pub fn add(&mut self, addr: u16, name: Option<&str>) -> Option<Bookmark> {
        let bookmark = Bookmark::new(addr, name.unwrap_or_default());
        self.entries.insert(addr, bookmark)
    }

    /// Renames the bookmark at `addr`.
    pub fn edit(&mut self, addr: u16, name: &str) -> Result<(), DevtoolsError> {
        let bookmark = self
            .entries
            .get_mut(&addr)
            .ok_or(DevtoolsError::NotFound { addr })?;
        bookmark.name.clear();
        bookmark.name.push_str(name);
        Ok(())
    }

    /// Removes and returns the bookmark at `addr`.
    pub fn delete(&mut self, addr: u16) -> Result<Bookmark, DevtoolsError> {
        self.entries
            .remove(&addr)
            .ok_or(DevtoolsError::NotFound { addr })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    #[inline]
    pub fn get(&self, addr: u16) -> Option<&Bookmark> {
        self.entries.get(&addr)
    }

    #[inline]
    pub fn contains(&self, addr: u16) -> bool {
        self.entries.contains_key(&addr)
    }

    /// Iterates bookmarks in ascending address order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.values(),
        }
    }

    /// Copies out the current bookmarks in address order.
    pub fn to_vec(&self) -> Vec<Bookmark> {
        self.iter().cloned().collect()
    }

    pub fn to_postcard_bytes(&self) -> Result<Vec<u8>, postcard::Error> {
        postcard::to_stdvec(&self.to_vec())
    }

    /// Rebuilds a manager from bytes produced by [`Self::to_postcard_bytes`].
    ///
    /// Entries go through [`Self::add`], so duplicate addresses resolve the
    /// same way they do interactively.
    pub fn from_postcard_bytes(bytes: &[u8]) -> Result<Self, postcard::Error> {
        let list: Vec<Bookmark> = postcard::from_bytes(bytes)?;
        Ok(list.into_iter().collect())
    }
}

/// Address-ordered iterator over a [`BookmarkManager`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    inner: btree_map::Values<'a, u16, Bookmark>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Bookmark;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl<'a> IntoIterator for &'a BookmarkManager {
    type Item = &'a Bookmark;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<Bookmark> for BookmarkManager {
    fn extend<T: IntoIterator<Item = Bookmark>>(&mut self, iter: T) {
        for bookmark in iter {
            self.add(bookmark.addr, Some(&bookmark.name));
        }
    }
}

impl FromIterator<Bookmark> for BookmarkManager {
    fn from_iter<T: IntoIterator<Item = Bookmark>>(iter: T) -> Self {
        let mut manager = Self::new();
        manager.extend(iter);
        manager
    }
}
