//! File -> Recent list of the TAS Editor.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub const MAX_RECENT_PROJECTS: usize = 10;

/// Menu labels longer than this are cut.
pub const MENU_LABEL_MAX_CHARS: usize = 128;

/// Most-recently-used project paths, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PathBuf>", into = "Vec<PathBuf>")]
pub struct RecentProjects {
    items: VecDeque<PathBuf>,
}

impl RecentProjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `path` as the most recent project.
    ///
    /// A path already in the list moves to the front; otherwise the oldest
    /// entry is dropped once the list is full.
    pub fn add(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        if let Some(pos) = self.items.iter().position(|p| p == path) {
            if let Some(existing) = self.items.remove(pos) {
                self.items.push_front(existing);
            }
            return;
        }
        self.items.push_front(path.to_path_buf());
        self.items.truncate(MAX_RECENT_PROJECTS);
    }

    /// Removes the entry at `slot`; later entries move up.
    pub fn remove(&mut self, slot: usize) -> Option<PathBuf> {
        self.items.remove(slot)
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&Path> {
        self.items.get(slot).map(PathBuf::as_path)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// An empty list greys out the Recent menu.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Path> + ExactSizeIterator {
        self.items.iter().map(PathBuf::as_path)
    }

    /// Labels for the Recent submenu, in slot order.
    pub fn menu_labels(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|p| {
                p.to_string_lossy()
                    .chars()
                    .take(MENU_LABEL_MAX_CHARS)
                    .collect()
            })
            .collect()
    }
}

impl From<Vec<PathBuf>> for RecentProjects {
    fn from(paths: Vec<PathBuf>) -> Self {
        let mut recent = Self::new();
        // Oldest first so the first element ends up at the front.
        for path in paths.into_iter().rev() {
            recent.add(path);
        }
        recent
    }
}

impl From<RecentProjects> for Vec<PathBuf> {
    fn from(recent: RecentProjects) -> Self {
        recent.items.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(recent: &RecentProjects) -> Vec<String> {
        recent
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn add_puts_newest_first() {
        let mut recent = RecentProjects::new();
        recent.add("a.fm3");
        recent.add("b.fm3");
        assert_eq!(paths(&recent), ["b.fm3", "a.fm3"]);
    }

    #[test]
    fn re_adding_moves_to_front_without_duplicates() {
        let mut recent = RecentProjects::new();
        for name in ["a.fm3", "b.fm3", "c.fm3"] {
            recent.add(name);
        }
        recent.add("a.fm3");
        assert_eq!(paths(&recent), ["a.fm3", "c.fm3", "b.fm3"]);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut recent = RecentProjects::new();
        for i in 0..=MAX_RECENT_PROJECTS {
            recent.add(format!("p{i}.fm3"));
        }
        assert_eq!(recent.len(), MAX_RECENT_PROJECTS);
        assert_eq!(recent.get(0), Some(Path::new("p10.fm3")));
        assert!(recent.iter().all(|p| p != Path::new("p0.fm3")));
    }

    #[test]
    fn remove_shifts_later_entries_up() {
        let mut recent = RecentProjects::new();
        for name in ["a.fm3", "b.fm3", "c.fm3"] {
            recent.add(name);
        }
        assert_eq!(recent.remove(1), Some(PathBuf::from("b.fm3")));
        assert_eq!(paths(&recent), ["c.fm3", "a.fm3"]);
        assert_eq!(recent.remove(5), None);
    }

    #[test]
    fn menu_labels_are_clamped() {
        let mut recent = RecentProjects::new();
        recent.add("x".repeat(300));
        recent.add("short.fm3");
        let labels = recent.menu_labels();
        assert_eq!(labels[0], "short.fm3");
        assert_eq!(labels[1].chars().count(), MENU_LABEL_MAX_CHARS);
    }

    #[test]
    fn from_vec_dedupes_and_truncates() {
        let mut list: Vec<PathBuf> = (0..15).map(|i| PathBuf::from(format!("p{i}"))).collect();
        list.insert(1, PathBuf::from("p0"));
        let recent = RecentProjects::from(list);
        assert_eq!(recent.len(), MAX_RECENT_PROJECTS);
        assert_eq!(recent.get(0), Some(Path::new("p0")));
        assert_eq!(recent.get(1), Some(Path::new("p1")));

        let back: Vec<PathBuf> = recent.clone().into();
        assert_eq!(RecentProjects::from(back), recent);
    }
}
