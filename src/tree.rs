//! Suffix-indexed rule tree.
//!
//! Each node stands for one domain label. Paths start at the root with the
//! rightmost label (the TLD) and walk inward, so the rule `co.uk` is stored as
//! `root -> "uk" -> "co"` with a [`Terminal::Normal`] marker on `co`.
//! The label `*` is stored as an ordinary key and matched as a wildcard by the
//! matcher.

use std::collections::HashMap;

use crate::error::Result;
use crate::idna::{default_idna, Idna};
use crate::types::Terminal;

/// Label that matches any single label at its depth
pub const WILDCARD_LABEL: &str = "*";

/// A single node of the rule tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleNode {
    children: HashMap<String, RuleNode>,
    terminal: Option<Terminal>,
}

impl RuleNode {
    /// Child node reached through a literal label
    pub fn child(&self, label: &str) -> Option<&RuleNode> {
        self.children.get(label)
    }

    /// Child node reached through the wildcard label
    pub fn wildcard(&self) -> Option<&RuleNode> {
        self.children.get(WILDCARD_LABEL)
    }

    /// Terminal marker, if a rule ends at this node
    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    /// Number of direct children
    pub fn child_count(&self) -> usize {
        self.children.len()
    }
}

/// Immutable rule tree built once from PSL text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTree {
    root: RuleNode,
    rule_count: usize,
}

impl RuleTree {
    /// Create an empty tree (no rules; every lookup falls back to `min_suffix`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from PSL-format text, using the default IDNA capability
    /// for non-ASCII rules.
    pub fn parse(text: &str) -> Result<Self> {
        Self::parse_with(text, default_idna().as_ref())
    }

    /// Build a tree from PSL-format text with an explicit IDNA capability.
    pub fn parse_with(text: &str, idna: &dyn Idna) -> Result<Self> {
        crate::parser::parse_rules(text, idna)
    }

    /// Root node; its children are keyed by TLD
    pub fn root(&self) -> &RuleNode {
        &self.root
    }

    /// Number of rule lines inserted (duplicates included)
    pub fn rule_count(&self) -> usize {
        self.rule_count
    }

    /// Check if the tree holds no rules
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Insert a rule given its labels in written order (`["co", "uk"]`).
    ///
    /// Labels must already be lowercase ASCII. A later insert of the same path
    /// replaces the earlier terminal. Empty label lists are ignored so that no
    /// unmarked leaf is ever created.
    pub(crate) fn insert<S: AsRef<str>>(&mut self, labels: &[S], terminal: Terminal) {
        if labels.is_empty() {
            return;
        }

        let mut node = &mut self.root;
        for label in labels.iter().rev() {
            node = node.children.entry(label.as_ref().to_string()).or_default();
        }
        node.terminal = Some(terminal);
        self.rule_count += 1;
    }
}
