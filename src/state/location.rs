/// Browser-style location: an ordered list of fragments and a cursor.
///
/// Filter, sort and paging changes replace the current entry so they don't
/// flood the history. Tab changes push a new entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    entries: Vec<String>,
    index: usize,
}

impl Location {
    pub fn new(fragment: impl Into<String>) -> Self {
        Self {
            entries: vec![fragment.into()],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    /// Overwrite the current entry
    pub fn replace(&mut self, fragment: impl Into<String>) {
        self.entries[self.index] = fragment.into();
    }

    /// Add an entry after the cursor, dropping anything ahead of it
    pub fn push(&mut self, fragment: impl Into<String>) {
        let fragment = fragment.into();
        if fragment == self.current() {
            return;
        }
        self.entries.truncate(self.index + 1);
        self.entries.push(fragment);
        self.index += 1;
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(self.current())
    }

    pub fn forward(&mut self) -> Option<&str> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(self.current())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}
