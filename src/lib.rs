//! PSL Engine - Public Suffix List matching for Rust
//!
//! This library determines the public suffix (effective TLD) of a hostname,
//! the part of a domain that is not privately registrable, such as `com`,
//! `co.uk` or `kawasaki.jp` subdomains. It supports:
//! - Literal rules (`co.uk`)
//! - Wildcard rules (`*.kawasaki.jp`)
//! - Exception rules (`!city.kawasaki.jp`)
//! - Internationalized hostnames via a pluggable IDNA capability
//! - A configurable fallback suffix length when no rule matches
//! - Optional LRU caching of lookups
//!
//! # Example
//!
//! ```rust
//! use psl_engine_r::{Ruleset, RulesetOptions};
//!
//! let rules_text = "
//! // ===BEGIN ICANN DOMAINS===
//! uk
//! co.uk
//! *.kawasaki.jp
//! !city.kawasaki.jp
//! ";
//!
//! let rules = Ruleset::from_rules(rules_text, RulesetOptions::default()).unwrap();
//!
//! let split = rules.public_suffix("www.example.co.uk", 0).unwrap().unwrap();
//! assert_eq!(split.suffix, "co.uk");
//! assert_eq!(split.remainder, "www.example");
//!
//! // One extra label gives the registrable domain
//! let split = rules.public_suffix("www.example.co.uk", 1).unwrap().unwrap();
//! assert_eq!(split.suffix, "example.co.uk");
//!
//! // Exceptions carve a label out of a wildcard
//! assert_eq!(rules.suffix("city.kawasaki.jp").unwrap().as_deref(), Some("kawasaki.jp"));
//! assert_eq!(rules.suffix("foo.kawasaki.jp").unwrap().as_deref(), Some("foo.kawasaki.jp"));
//! ```
//!
//! # Rule Syntax
//!
//! One rule per line, `//` starts a comment:
//!
//! | Rule | Example | Description |
//! |------|---------|-------------|
//! | Literal | `co.uk` | The exact label sequence is a public suffix |
//! | Wildcard | `*.ck` | Any single label in place of `*` |
//! | Exception | `!www.ck` | Overrides a wildcard; the suffix drops the leftmost label |
//!
//! When no rule matches, the rightmost `min_suffix` labels (default 1) are
//! taken as the suffix.

pub mod config;
pub mod error;
pub mod idna;
pub mod matcher;
pub(crate) mod normalize;
pub mod parser;
pub mod ruleset;
pub mod tree;
pub mod types;

// Re-export commonly used items
pub use config::{RulesetOptions, DEFAULT_CACHE_SIZE, DEFAULT_MIN_SUFFIX};
pub use error::{PslError, Result};
pub use self::idna::{default_idna, Idna, UnavailableIdna};
#[cfg(feature = "idna")]
pub use self::idna::Uts46Idna;
pub use matcher::suffix_len;
pub use parser::{icann_section, parse_rules, parse_rules_from_file, parse_rules_from_reader};
pub use ruleset::{builtin_tree, public_suffix, registrable_domain, Ruleset, LATEST_ENV};
pub use tree::{RuleNode, RuleTree, WILDCARD_LABEL};
pub use types::{SuffixMatch, Terminal};
