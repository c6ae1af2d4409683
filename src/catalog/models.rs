//! Catalog data types.

/// One GIF found under the media root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Path relative to the media root, `/`-separated, no leading separator.
    pub relative_path: String,
    /// False for files found under the `nsfw` subdirectory.
    pub safe: bool,
}

impl Entry {
    pub fn new(relative_path: impl Into<String>, safe: bool) -> Self {
        Self {
            relative_path: relative_path.into(),
            safe,
        }
    }
}

/// Immutable list of classified entries, built once at startup.
///
/// Safe entries come first, followed by unsafe ones. There is no way to
/// mutate a catalog after construction; picking up new files on disk
/// requires a restart.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: Vec<Entry>,
}

impl Catalog {
    pub fn new(entries: Vec<Entry>) -> Self {
        Self { entries }
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

    /// Number of entries classified as safe.
    pub fn safe_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.safe).count()
    }

    /// Number of entries from the `nsfw` subdirectory.
    pub fn unsafe_count(&self) -> usize {
        self.len() - self.safe_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_split_by_safety() {
        let catalog = Catalog::new(vec![
            Entry::new("a.gif", true),
            Entry::new("b.gif", true),
            Entry::new("nsfw/x.gif", false),
        ]);

        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.safe_count(), 2);
        assert_eq!(catalog.unsafe_count(), 1);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn default_catalog_is_empty() {
        let catalog = Catalog::default();
        assert!(catalog.is_empty());
        assert_eq!(catalog.safe_count(), 0);
        assert_eq!(catalog.iter().count(), 0);
    }
}
