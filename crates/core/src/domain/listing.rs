use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use super::{Entry, EntryKind};

/// 某个目录在某一时刻的子项快照。
///
/// 排序规则：目录在前、文件在后；组内按名称忽略大小写排序，
/// 大小写相同时再按原始名称排序，因此对未变化的目录重复读取得到相同顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryListing {
    path: PathBuf,
    entries: Vec<Entry>,
}

impl DirectoryListing {
    pub fn new(path: impl Into<PathBuf>, mut entries: Vec<Entry>) -> Self {
        entries.sort_by(compare_entries);
        Self {
            path: path.into(),
            entries,
        }
    }

    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self::new(path, Vec::new())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|entry| entry.name() == name)
    }

    pub fn contains(&self, name: &str, kind: EntryKind) -> bool {
        self.find(name).is_some_and(|entry| entry.kind() == kind)
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(Entry::name).collect()
    }

    /// 以集合形式比较两个快照的内容，忽略路径与顺序。
    pub fn same_entries(&self, other: &DirectoryListing) -> bool {
        let left: BTreeSet<_> = self.entries.iter().map(|e| (e.name(), e.kind())).collect();
        let right: BTreeSet<_> = other.entries.iter().map(|e| (e.name(), e.kind())).collect();
        left == right
    }
}

impl<'a> IntoIterator for &'a DirectoryListing {
    type Item = &'a Entry;
    type IntoIter = std::slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

fn compare_entries(a: &Entry, b: &Entry) -> Ordering {
    a.kind()
        .cmp(&b.kind())
        .then_with(|| a.name().to_lowercase().cmp(&b.name().to_lowercase()))
        .then_with(|| a.name().cmp(b.name()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directories_come_before_files() {
        let listing = DirectoryListing::new(
            "/data",
            vec![
                Entry::file("b.txt"),
                Entry::directory("zeta"),
                Entry::file("A.txt"),
                Entry::directory("Alpha"),
            ],
        );

        assert_eq!(listing.names(), vec!["Alpha", "zeta", "A.txt", "b.txt"]);
    }

    #[test]
    fn case_only_differences_keep_a_fixed_order() {
        let first = DirectoryListing::new("/d", vec![Entry::file("readme"), Entry::file("README")]);
        let second = DirectoryListing::new("/d", vec![Entry::file("README"), Entry::file("readme")]);

        assert_eq!(first.names(), second.names());
    }

    #[test]
    fn same_entries_ignores_order_and_path() {
        let a = DirectoryListing::new("/a", vec![Entry::file("x"), Entry::directory("y")]);
        let b = DirectoryListing::new("/b", vec![Entry::directory("y"), Entry::file("x")]);
        let c = DirectoryListing::new("/a", vec![Entry::directory("x"), Entry::directory("y")]);

        assert!(a.same_entries(&b));
        assert!(!a.same_entries(&c));
    }

    #[test]
    fn contains_checks_kind() {
        let listing = DirectoryListing::new("/d", vec![Entry::directory("notes")]);

        assert!(listing.contains("notes", EntryKind::Directory));
        assert!(!listing.contains("notes", EntryKind::File));
        assert!(listing.find("missing").is_none());
    }
}
