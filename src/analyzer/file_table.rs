//! Per-unit source file table

/// Ordered source file paths of one unit, addressed by declaration file index
///
/// Classic DWARF numbers files from 1, so index 0 means "no file". DWARF 5
/// tables start at 0; the table records which numbering it uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTable {
    /// File paths, in table order
    paths: Vec<String>,
    /// Index of the first entry
    first_index: u64,
}

impl FileTable {
    /// Create a 1-based table
    pub fn new(paths: Vec<String>) -> Self {
        Self::with_first_index(paths, 1)
    }

    /// Create a table whose first entry has index `first_index`
    pub fn with_first_index(paths: Vec<String>, first_index: u64) -> Self {
        Self { paths, first_index }
    }

    /// Path for a declaration file index, if the index is in range
    pub fn resolve(&self, index: u64) -> Option<&str> {
        let slot = index.checked_sub(self.first_index)?;
        let slot = usize::try_from(slot).ok()?;
        self.paths.get(slot).map(String::as_str)
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the table has no files
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Index of the first entry
    pub fn first_index(&self) -> u64 {
        self.first_index
    }
}

impl Default for FileTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
