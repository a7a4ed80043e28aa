//! Cache key for a single dataset line

use std::fmt;

/// Identifies one line of one dataset
///
/// Both parts are compared field by field, so `("a:1", 2)` and `("a", 12)`
/// stay distinct no matter what characters identifiers contain.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    file_id: String,
    line: u64,
}

impl CacheKey {
    /// Key for line `line` of dataset `file_id`
    pub fn new(file_id: impl Into<String>, line: u64) -> Self {
        Self {
            file_id: file_id.into(),
            line,
        }
    }

    /// Dataset identifier
    pub fn file_id(&self) -> &str {
        &self.file_id
    }

    /// 1-indexed line number
    pub fn line(&self) -> u64 {
        self.line
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}#{}", self.file_id, self.line)
    }
}
