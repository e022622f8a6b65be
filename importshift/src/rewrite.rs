//! Byte-range source rewriter.
//!
//! The printer regenerates code by collecting edits against the original
//! source and applying them here. Untouched bytes are copied verbatim, so
//! formatting outside the edited ranges is preserved exactly.
//!
//! ```
//! use importshift::rewrite::{ByteRangeRewriter, Edit};
//!
//! let source = "import a from 'old-lib';";
//! let mut rewriter = ByteRangeRewriter::new(source);
//! rewriter.add_edit(Edit::new(14, 23, "'new-lib'"));
//! assert_eq!(rewriter.apply().unwrap(), "import a from 'new-lib';");
//! ```

use thiserror::Error;

/// A single edit operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    /// Start byte offset (inclusive)
    pub start_byte: usize,
    /// End byte offset (exclusive)
    pub end_byte: usize,
    /// Replacement content
    pub replacement: String,
}

impl Edit {
    /// Create a replacement edit
    #[must_use]
    pub fn new(start_byte: usize, end_byte: usize, replacement: impl Into<String>) -> Self {
        Self {
            start_byte,
            end_byte,
            replacement: replacement.into(),
        }
    }

    /// Create a deletion edit
    #[must_use]
    pub fn delete(start_byte: usize, end_byte: usize) -> Self {
        Self::new(start_byte, end_byte, "")
    }

    /// Check if this edit overlaps with another.
    ///
    /// Two insertions at the same offset count as overlapping, since their
    /// relative order would be ambiguous.
    #[must_use]
    pub const fn overlaps(&self, other: &Self) -> bool {
        if self.start_byte == self.end_byte && other.start_byte == other.end_byte {
            return self.start_byte == other.start_byte;
        }
        self.start_byte < other.end_byte && other.start_byte < self.end_byte
    }
}

/// Error during rewriting
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    /// Two edits touch the same bytes
    #[error("overlapping edits at {first_start}..{first_end} and {second_start}..{second_end}")]
    OverlappingEdits {
        /// Range of the earlier edit
        first_start: usize,
        /// End of the earlier edit
        first_end: usize,
        /// Start of the later edit
        second_start: usize,
        /// End of the later edit
        second_end: usize,
    },
    /// Edit range falls outside the source
    #[error("edit {start_byte}..{end_byte} out of bounds for source of length {source_len}")]
    OutOfBounds {
        /// Start byte of the edit
        start_byte: usize,
        /// End byte of the edit
        end_byte: usize,
        /// Length of the source
        source_len: usize,
    },
    /// Edit boundary splits a UTF-8 character
    #[error("edit boundary at byte {byte} is not a character boundary")]
    NotCharBoundary {
        /// Offending offset
        byte: usize,
    },
}

/// Applies non-overlapping byte-range edits to a source string.
#[derive(Debug, Clone)]
pub struct ByteRangeRewriter {
    source: String,
    edits: Vec<Edit>,
}

impl ByteRangeRewriter {
    /// Create a new rewriter for the given source
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            edits: Vec::new(),
        }
    }

    /// Add an edit to the pending list
    pub fn add_edit(&mut self, edit: Edit) {
        self.edits.push(edit);
    }

    /// Add multiple edits
    pub fn add_edits(&mut self, edits: impl IntoIterator<Item = Edit>) {
        self.edits.extend(edits);
    }

    /// Number of pending edits
    #[must_use]
    pub fn edit_count(&self) -> usize {
        self.edits.len()
    }

    /// Sorts pending edits by position and checks them against the source.
    fn sorted_and_validated(&mut self) -> Result<(), RewriteError> {
        let len = self.source.len();
        for edit in &self.edits {
            if edit.start_byte > edit.end_byte || edit.end_byte > len {
                return Err(RewriteError::OutOfBounds {
                    start_byte: edit.start_byte,
                    end_byte: edit.end_byte,
                    source_len: len,
                });
            }
            for byte in [edit.start_byte, edit.end_byte] {
                if !self.source.is_char_boundary(byte) {
                    return Err(RewriteError::NotCharBoundary { byte });
                }
            }
        }

        self.edits
            .sort_by_key(|edit| (edit.start_byte, edit.end_byte));
        for pair in self.edits.windows(2) {
            if pair[0].overlaps(&pair[1]) {
                return Err(RewriteError::OverlappingEdits {
                    first_start: pair[0].start_byte,
                    first_end: pair[0].end_byte,
                    second_start: pair[1].start_byte,
                    second_end: pair[1].end_byte,
                });
            }
        }
        Ok(())
    }

    /// Validate edits without applying them
    pub fn validate(&self) -> Result<(), RewriteError> {
        self.clone().sorted_and_validated()
    }

    /// Apply all edits and return the modified source.
    pub fn apply(mut self) -> Result<String, RewriteError> {
        self.sorted_and_validated()?;
        if self.edits.is_empty() {
            return Ok(self.source);
        }

        let mut result = String::with_capacity(self.source.len());
        let mut cursor = 0;
        for edit in &self.edits {
            result.push_str(&self.source[cursor..edit.start_byte]);
            result.push_str(&edit.replacement);
            cursor = edit.end_byte;
        }
        result.push_str(&self.source[cursor..]);
        Ok(result)
    }
}
