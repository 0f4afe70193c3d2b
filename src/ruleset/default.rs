//! Process-wide default rulesets.
//!
//! The default rule tree is loaded once, on first use, from the file named by
//! [`LATEST_ENV`] when it is set and usable, otherwise from the built-in
//! dataset compiled into the crate. One [`Ruleset`] per `min_suffix` is then
//! memoized over that tree. Both steps are serialized, so concurrent first
//! callers observe a single load.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use parking_lot::Mutex;

use super::Ruleset;
use crate::config::{RulesetOptions, DEFAULT_MIN_SUFFIX};
use crate::error::Result;
use crate::parser::icann_section;
use crate::tree::RuleTree;
use crate::types::SuffixMatch;

/// Environment variable naming a newer public suffix list file
pub const LATEST_ENV: &str = "PSL_ENGINE_LATEST";

/// Bundled ICANN rules, stored in ASCII form
const BUILTIN_RULES: &str = include_str!("../../data/public_suffix_builtin.dat");

static DEFAULT_TREE: OnceCell<Arc<RuleTree>> = OnceCell::new();

static SHARED_RULESETS: Lazy<Mutex<HashMap<usize, Arc<Ruleset>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Build a tree from the built-in dataset.
pub fn builtin_tree() -> Result<RuleTree> {
    RuleTree::parse(BUILTIN_RULES)
}

/// Load the preferred tree from `latest`, falling back to the built-in rules.
fn load_default_tree(latest: Option<&Path>) -> Result<RuleTree> {
    if let Some(path) = latest {
        match load_latest(path) {
            Ok(tree) if !tree.is_empty() => {
                log::info!(
                    "loaded {} public suffix rules from {}",
                    tree.rule_count(),
                    path.display()
                );
                return Ok(tree);
            }
            Ok(_) => log::warn!(
                "no public suffix rules in {}, using built-in list",
                path.display()
            ),
            Err(e) => log::warn!(
                "failed to load public suffix list {}: {}, using built-in list",
                path.display(),
                e
            ),
        }
    }

    builtin_tree()
}

fn load_latest(path: &Path) -> Result<RuleTree> {
    let text = fs::read_to_string(path)?;
    RuleTree::parse(icann_section(&text))
}

fn default_tree() -> Result<Arc<RuleTree>> {
    DEFAULT_TREE
        .get_or_try_init(|| {
            let latest = std::env::var_os(LATEST_ENV);
            load_default_tree(latest.as_deref().map(Path::new)).map(Arc::new)
        })
        .cloned()
}

impl Ruleset {
    /// Process-wide ruleset over the default rules for `min_suffix`.
    ///
    /// The first call for a given `min_suffix` builds the handle; later calls
    /// return the same `Arc`.
    pub fn shared(min_suffix: usize) -> Result<Arc<Ruleset>> {
        let mut rulesets = SHARED_RULESETS.lock();
        if let Some(ruleset) = rulesets.get(&min_suffix) {
            return Ok(ruleset.clone());
        }

        let tree = default_tree()?;
        let ruleset = Arc::new(Ruleset::new(
            tree,
            RulesetOptions::new().with_min_suffix(min_suffix),
        ));
        rulesets.insert(min_suffix, ruleset.clone());
        Ok(ruleset)
    }

    /// Process-wide ruleset with the default `min_suffix` of 1.
    pub fn shared_default() -> Result<Arc<Ruleset>> {
        Self::shared(DEFAULT_MIN_SUFFIX)
    }
}

/// Split `host` using the process-wide default ruleset.
pub fn public_suffix(host: &str, extra_labels: usize) -> Result<Option<SuffixMatch<String>>> {
    Ruleset::shared_default()?.public_suffix(host, extra_labels)
}

/// Registrable domain of `host` using the process-wide default ruleset.
pub fn registrable_domain(host: &str) -> Result<Option<String>> {
    Ruleset::shared_default()?.registrable_domain(host)
}
