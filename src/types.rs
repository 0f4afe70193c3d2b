/// Polarity of a rule terminating at a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Terminal {
    /// Affirmative rule: the path is a public suffix
    Normal,
    /// Exception rule (`!` prefix): carves the path out of a wildcard
    Exception,
}

/// Result of a public suffix lookup, in the caller's shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixMatch<T> {
    /// Labels left of the suffix (possibly empty)
    pub remainder: T,
    /// The public suffix, extended by any requested extra labels
    pub suffix: T,
}

impl<T> SuffixMatch<T> {
    /// Split into a `(remainder, suffix)` pair
    pub fn into_pair(self) -> (T, T) {
        (self.remainder, self.suffix)
    }
}

/// Cache key for the lookup LRU cache
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) struct CacheKey {
    pub host: String,
    pub extra_labels: usize,
}

impl CacheKey {
    pub fn new(host: &str, extra_labels: usize) -> Self {
        Self {
            host: host.to_string(),
            extra_labels,
        }
    }
}
