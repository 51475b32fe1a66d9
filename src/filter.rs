use std::fmt;

use crate::adapter::RawNode;

/// Machine-readable reason a sample was excluded before mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscardReason {
    EmptySource,
    NoChildren,
    RootErrorOnly,
    NoMeaningfulStructure,
    InvalidUtf8,
}

impl DiscardReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscardReason::EmptySource => "empty_source",
            DiscardReason::NoChildren => "no_children",
            DiscardReason::RootErrorOnly => "root_error_only",
            DiscardReason::NoMeaningfulStructure => "no_meaningful_structure",
            DiscardReason::InvalidUtf8 => "invalid_utf8",
        }
    }
}

impl fmt::Display for DiscardReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keyword-based classifier for node kinds.
///
/// Matching is substring-based, not exact-token, so the same keyword sets
/// generalize across grammars whose kind names are compound
/// (`expression_statement`, `compound_statement`, ...). That also means it
/// can false-positive on unusual grammars, which is why the keyword sets
/// live here behind a value instead of being inlined at the call sites.
#[derive(Debug, Clone)]
pub struct StructureClassifier {
    meaningful: Vec<&'static str>,
    trivial: Vec<&'static str>,
    body: Vec<&'static str>,
}

impl Default for StructureClassifier {
    fn default() -> Self {
        StructureClassifier {
            meaningful: vec![
                "expression",
                "statement",
                "definition",
                "declaration",
                "assignment",
                "block",
                "suite",
            ],
            trivial: vec!["return", "break", "continue", "empty"],
            body: vec!["block", "suite", "compound"],
        }
    }
}

impl StructureClassifier {
    pub fn is_meaningful(&self, kind: &str) -> bool {
        self.meaningful.iter().any(|kw| kind.contains(kw))
    }

    pub fn is_trivial(&self, kind: &str) -> bool {
        self.trivial.iter().any(|kw| kind.contains(kw))
    }

    pub fn is_body(&self, kind: &str) -> bool {
        self.body.iter().any(|kw| kind.contains(kw))
    }
}

/// Decide whether a parsed sample should be discarded.
///
/// Criteria are evaluated in a fixed order and short-circuit on the first
/// match, so identical inputs always yield the identical reason.
pub fn should_discard<N: RawNode>(
    root: &N,
    source: &str,
    classifier: &StructureClassifier,
) -> Option<DiscardReason> {
    if source.trim().is_empty() {
        return Some(DiscardReason::EmptySource);
    }

    if root.child_count() == 0 {
        return Some(DiscardReason::NoChildren);
    }

    if children(root).all(|child| child.is_error()) {
        return Some(DiscardReason::RootErrorOnly);
    }

    if !children(root).any(|child| has_meaningful_structure(&child, classifier)) {
        return Some(DiscardReason::NoMeaningfulStructure);
    }

    None
}

/// True if `node` contains at least one meaningful, non-trivial construct.
///
/// Looks for a body child (block/suite/compound) first and searches inside
/// it when present, otherwise searches `node` itself. Only named children
/// count.
pub fn has_meaningful_structure<N: RawNode>(node: &N, classifier: &StructureClassifier) -> bool {
    let body = children(node).find(|child| classifier.is_body(child.kind()));

    match body {
        Some(body) => scan_named_children(&body, classifier),
        None => scan_named_children(node, classifier),
    }
}

fn scan_named_children<N: RawNode>(target: &N, classifier: &StructureClassifier) -> bool {
    children(target)
        .filter(|child| child.is_named())
        .any(|child| {
            classifier.is_meaningful(child.kind()) && !classifier.is_trivial(child.kind())
        })
}

fn children<N: RawNode>(node: &N) -> impl Iterator<Item = N> + '_ {
    (0..node.child_count()).filter_map(move |i| node.child(i))
}
