//! Longest-match public suffix computation.
//!
//! The rule tree is explored depth-first from the TLD inward. At every depth
//! both the literal child for the current label and the `*` child are
//! candidates, and every path consistent with the input is visited: a long
//! wildcard match and a shorter literal match found on different branches are
//! both needed to pick the longest suffix and to apply exceptions.

use std::collections::BTreeSet;

use crate::tree::{RuleNode, RuleTree};
use crate::types::Terminal;

/// A deferred continuation of the depth-first search.
#[derive(Debug, Clone, Copy)]
enum Branch<'a> {
    /// Node reached through the literal label at `depth`
    Literal { node: &'a RuleNode, depth: usize, wild: bool },
    /// Node reached through `*` at `depth`
    Wildcard { node: &'a RuleNode, depth: usize },
}

/// Match lengths collected during the search, keyed by label count.
#[derive(Debug, Default)]
struct Matches {
    host: BTreeSet<usize>,
    wild: BTreeSet<usize>,
    exception: BTreeSet<usize>,
}

impl Matches {
    fn record(&mut self, terminal: Terminal, len: usize, wild: bool) {
        match terminal {
            Terminal::Exception => {
                self.exception.insert(len);
            }
            Terminal::Normal if wild => {
                self.wild.insert(len);
            }
            Terminal::Normal => {
                self.host.insert(len);
            }
        }
    }

    /// Longest suffix after exceptions override wildcard matches.
    fn longest(mut self) -> Option<usize> {
        for len in &self.exception {
            self.wild.remove(len);
        }

        let wild = self.wild.iter().next_back().copied();
        let host = self.host.iter().next_back().copied();
        let exception = self.exception.iter().next_back().map(|len| len - 1);

        [wild, host, exception].into_iter().flatten().max()
    }
}

/// Compute the public suffix length, in labels, of `labels`.
///
/// `labels` are lowercase ASCII in written order (`["www", "example", "co", "uk"]`).
/// Returns `min_suffix` when no rule matches. The result may exceed the number
/// of labels only through that fallback.
pub fn suffix_len<S: AsRef<str>>(tree: &RuleTree, labels: &[S], min_suffix: usize) -> usize {
    let mut matches = Matches::default();
    let mut stack = Vec::new();

    push_candidates(&mut stack, tree.root(), labels, 0, false);

    while let Some(branch) = stack.pop() {
        let (node, depth, wild) = match branch {
            Branch::Literal { node, depth, wild } => (node, depth, wild),
            Branch::Wildcard { node, depth } => (node, depth, true),
        };

        if let Some(terminal) = node.terminal() {
            matches.record(terminal, depth + 1, wild);
        }

        push_candidates(&mut stack, node, labels, depth + 1, wild);
    }

    matches.longest().unwrap_or(min_suffix)
}

/// Defer the children of `node` that can consume the label at `depth`
/// (counted from the right).
fn push_candidates<'a, S: AsRef<str>>(
    stack: &mut Vec<Branch<'a>>,
    node: &'a RuleNode,
    labels: &[S],
    depth: usize,
    wild: bool,
) {
    if depth >= labels.len() {
        return;
    }
    let label = labels[labels.len() - 1 - depth].as_ref();

    if let Some(child) = node.wildcard() {
        stack.push(Branch::Wildcard { node: child, depth });
    }
    // A literal "*" label in the input is already covered by the wildcard branch
    if label != crate::tree::WILDCARD_LABEL {
        if let Some(child) = node.child(label) {
            stack.push(Branch::Literal { node: child, depth, wild });
        }
    }
}
