//! Ruleset handle.
//!
//! A [`Ruleset`] bundles a shared [`RuleTree`] with its lookup options and
//! exposes the public suffix lookup in string and label-sequence form.

mod default;

pub use default::{builtin_tree, public_suffix, registrable_domain, LATEST_ENV};

use std::fmt;
use std::io::Read;
use std::num::NonZeroUsize;
use std::path::Path;
use std::sync::Arc;

use lru::LruCache;
use parking_lot::Mutex;

use crate::config::RulesetOptions;
use crate::error::Result;
use crate::idna::{default_idna, label_to_unicode, Idna};
use crate::matcher::suffix_len;
use crate::normalize::{host_key, join_labels, normalize_host, normalize_labels, Labels};
use crate::parser::{parse_rules_from_file, parse_rules_from_reader};
use crate::tree::RuleTree;
use crate::types::{CacheKey, SuffixMatch};

/// Cache value type: lookup result for a string host
type CacheValue = Option<SuffixMatch<String>>;

/// Public suffix ruleset with lookup options
pub struct Ruleset {
    tree: Arc<RuleTree>,
    min_suffix: usize,
    idna: Arc<dyn Idna>,
    cache: Option<Mutex<LruCache<CacheKey, CacheValue>>>,
}

impl fmt::Debug for Ruleset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruleset")
            .field("rules", &self.tree.rule_count())
            .field("min_suffix", &self.min_suffix)
            .field("idna", &self.idna.is_available())
            .field("cached", &self.cache.is_some())
            .finish()
    }
}

impl Ruleset {
    /// Create a ruleset over an already-built tree.
    pub fn new(tree: Arc<RuleTree>, options: RulesetOptions) -> Self {
        let cache =
            NonZeroUsize::new(options.cache_size).map(|size| Mutex::new(LruCache::new(size)));
        Self {
            tree,
            min_suffix: options.min_suffix,
            idna: default_idna(),
            cache,
        }
    }

    /// Create a ruleset from PSL-format text.
    pub fn from_rules(text: &str, options: RulesetOptions) -> Result<Self> {
        let tree = RuleTree::parse(text)?;
        Ok(Self::new(Arc::new(tree), options))
    }

    /// Create a ruleset from a reader yielding PSL-format text.
    pub fn from_reader<R: Read>(reader: R, options: RulesetOptions) -> Result<Self> {
        let tree = parse_rules_from_reader(reader, default_idna().as_ref())?;
        Ok(Self::new(Arc::new(tree), options))
    }

    /// Create a ruleset from a PSL-format file.
    pub fn from_file(path: impl AsRef<Path>, options: RulesetOptions) -> Result<Self> {
        let tree = parse_rules_from_file(path, default_idna().as_ref())?;
        Ok(Self::new(Arc::new(tree), options))
    }

    /// Replace the IDNA capability used for lookups.
    ///
    /// Rules are converted when the tree is built; use
    /// [`RuleTree::parse_with`] to load them with the same capability.
    pub fn with_idna(mut self, idna: Arc<dyn Idna>) -> Self {
        self.idna = idna;
        if let Some(cache) = &self.cache {
            cache.lock().clear();
        }
        self
    }

    /// The underlying rule tree
    pub fn tree(&self) -> &Arc<RuleTree> {
        &self.tree
    }

    /// Fallback suffix length
    pub fn min_suffix(&self) -> usize {
        self.min_suffix
    }

    /// Split a hostname into `remainder` and public `suffix`.
    ///
    /// `extra_labels` extends the suffix leftwards; `1` yields the registrable
    /// domain. Returns `Ok(None)` for an empty host. Results keep the input's
    /// register: Unicode hosts come back in Unicode.
    ///
    /// # Example
    ///
    /// ```
    /// use psl_engine_r::{Ruleset, RulesetOptions};
    ///
    /// let rules = Ruleset::from_rules("uk\nco.uk\n", RulesetOptions::default()).unwrap();
    /// let split = rules.public_suffix("www.example.co.uk", 0).unwrap().unwrap();
    /// assert_eq!(split.remainder, "www.example");
    /// assert_eq!(split.suffix, "co.uk");
    /// ```
    pub fn public_suffix(
        &self,
        host: &str,
        extra_labels: usize,
    ) -> Result<Option<SuffixMatch<String>>> {
        let cache = match &self.cache {
            Some(cache) => cache,
            None => return self.split_host(host, extra_labels),
        };

        let key = CacheKey::new(&host_key(host), extra_labels);
        let mut cache = cache.lock();

        if let Some(cached) = cache.get(&key) {
            return Ok(cached.clone());
        }

        // Matching is CPU-only, so computing under the lock is acceptable
        let result = self.split_host(host, extra_labels)?;
        cache.put(key, result.clone());
        Ok(result)
    }

    /// Label-sequence form of [`Ruleset::public_suffix`].
    ///
    /// The caller's slice is not modified; returned labels are lowercase.
    pub fn public_suffix_labels<S: AsRef<str>>(
        &self,
        labels: &[S],
        extra_labels: usize,
    ) -> Result<Option<SuffixMatch<Vec<String>>>> {
        let labels = match normalize_labels(labels, self.idna.as_ref())? {
            Some(labels) => labels,
            None => return Ok(None),
        };

        let len = self.suffix_len_of(&labels, extra_labels);
        let (remainder, suffix) = split_at_suffix(&labels.ascii, len);
        Ok(Some(SuffixMatch {
            remainder: self.decode_each(remainder, labels.unicode)?,
            suffix: self.decode_each(suffix, labels.unicode)?,
        }))
    }

    /// Public suffix of `host` alone.
    pub fn suffix(&self, host: &str) -> Result<Option<String>> {
        Ok(self.public_suffix(host, 0)?.map(|split| split.suffix))
    }

    /// Registrable domain (public suffix plus one label).
    ///
    /// Returns `Ok(None)` when `host` is empty or is itself a public suffix.
    pub fn registrable_domain(&self, host: &str) -> Result<Option<String>> {
        let labels = match normalize_host(host, self.idna.as_ref())? {
            Some(labels) => labels,
            None => return Ok(None),
        };

        let len = self.suffix_len_of(&labels, 0);
        if len >= labels.len() {
            return Ok(None);
        }

        let (_, domain) = split_at_suffix(&labels.ascii, len + 1);
        join_labels(domain, labels.unicode, self.idna.as_ref()).map(Some)
    }

    /// Check if `host` is itself a public suffix.
    pub fn is_public_suffix(&self, host: &str) -> Result<bool> {
        match normalize_host(host, self.idna.as_ref())? {
            Some(labels) => Ok(self.suffix_len_of(&labels, 0) >= labels.len()),
            None => Ok(false),
        }
    }

    /// Check if two hosts belong to the same site.
    ///
    /// Hosts are compared by registrable domain; hosts that are public
    /// suffixes themselves are compared whole. Empty hosts never match.
    pub fn same_site(&self, a: &str, b: &str) -> Result<bool> {
        match (self.site_of(a)?, self.site_of(b)?) {
            (Some(a), Some(b)) => Ok(a == b),
            _ => Ok(false),
        }
    }

    fn site_of(&self, host: &str) -> Result<Option<String>> {
        let labels = match normalize_host(host, self.idna.as_ref())? {
            Some(labels) => labels,
            None => return Ok(None),
        };
        let len = self.suffix_len_of(&labels, 1);
        let (_, site) = split_at_suffix(&labels.ascii, len);
        Ok(Some(site.join(".")))
    }

    fn split_host(
        &self,
        host: &str,
        extra_labels: usize,
    ) -> Result<Option<SuffixMatch<String>>> {
        let labels = match normalize_host(host, self.idna.as_ref())? {
            Some(labels) => labels,
            None => return Ok(None),
        };

        let len = self.suffix_len_of(&labels, extra_labels);
        let (remainder, suffix) = split_at_suffix(&labels.ascii, len);
        Ok(Some(SuffixMatch {
            remainder: join_labels(remainder, labels.unicode, self.idna.as_ref())?,
            suffix: join_labels(suffix, labels.unicode, self.idna.as_ref())?,
        }))
    }

    fn suffix_len_of(&self, labels: &Labels, extra_labels: usize) -> usize {
        suffix_len(&self.tree, &labels.ascii, self.min_suffix).saturating_add(extra_labels)
    }

    fn decode_each(&self, labels: &[String], unicode: bool) -> Result<Vec<String>> {
        if !unicode {
            return Ok(labels.to_vec());
        }
        labels
            .iter()
            .map(|label| label_to_unicode(self.idna.as_ref(), label))
            .collect()
    }
}

/// Split labels into `(remainder, suffix)`, clamping the suffix to the input.
fn split_at_suffix(labels: &[String], suffix_len: usize) -> (&[String], &[String]) {
    labels.split_at(labels.len().saturating_sub(suffix_len))
}
