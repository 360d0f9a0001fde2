use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

/// Line/column span inside one source unit. Lines and columns are 1-based.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, JsonSchema)]
pub struct Range {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

impl Range {
    pub fn new(start_line: usize, start_col: usize, end_line: usize, end_col: usize) -> Self {
        Self {
            start_line,
            start_col,
            end_line,
            end_col,
        }
    }

    pub fn contains(&self, line: usize, col: usize) -> bool {
        if line < self.start_line || line > self.end_line {
            return false;
        }
        if line == self.start_line && col < self.start_col {
            return false;
        }
        if line == self.end_line && col > self.end_col {
            return false;
        }
        true
    }

    /// Grow this range so that it ends where `other` ends.
    pub fn extend_to(&mut self, other: &Range) {
        if (other.end_line, other.end_col) > (self.end_line, self.end_col) {
            self.end_line = other.end_line;
            self.end_col = other.end_col;
        }
    }
}

/// Where something was found: a file identifier plus a range.
///
/// Locations order by file identifier first and then by position, which is
/// the canonical order used to fold several sightings of one entity.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash, JsonSchema)]
pub struct SourceLocation {
    #[serde(with = "crate::models::util::serde_arc_str")]
    #[schemars(with = "String")]
    pub file: Arc<str>,
    pub range: Range,
}

impl SourceLocation {
    pub fn new(file: Arc<str>, range: Range) -> Self {
        Self { file, range }
    }

    pub fn line(&self) -> usize {
        self.range.start_line
    }
}

impl Ord for SourceLocation {
    fn cmp(&self, other: &Self) -> Ordering {
        self.file
            .cmp(&other.file)
            .then(self.range.start_line.cmp(&other.range.start_line))
            .then(self.range.start_col.cmp(&other.range.start_col))
            .then(self.range.end_line.cmp(&other.range.end_line))
            .then(self.range.end_col.cmp(&other.range.end_col))
    }
}

impl PartialOrd for SourceLocation {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.file, self.range.start_line)
    }
}
