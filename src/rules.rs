use crate::error::{AuditError, Result};
use crate::node::Node;

/// A single tree transformation.
///
/// Rules are total and deterministic: `apply` visits every node in the tree
/// and never fails or skips a subtree. Rules receive ownership of their
/// input and may edit it destructively; the pipeline guarantees the tree is
/// a clone of the verification baseline, so no rule needs to clone.
pub trait MutationRule: Send + Sync + std::fmt::Debug {
    fn name(&self) -> &'static str;
    fn apply(&self, tree: Node) -> Node;
}

/// Prefixes every identifier's text with `x_`, at any depth.
#[derive(Debug)]
pub struct RenameIdentifiers;

impl MutationRule for RenameIdentifiers {
    fn name(&self) -> &'static str {
        "rename-identifier"
    }

    fn apply(&self, mut tree: Node) -> Node {
        rename_in_place(&mut tree);
        tree
    }
}

fn rename_in_place(node: &mut Node) {
    if node.kind == "identifier" {
        if let Some(text) = &node.text {
            node.text = Some(format!("x_{}", text));
        }
    }
    for child in &mut node.children {
        rename_in_place(child);
    }
}

/// Swaps boolean literals: `true` becomes `false` and vice versa.
#[derive(Debug)]
pub struct FlipBooleans;

impl MutationRule for FlipBooleans {
    fn name(&self) -> &'static str {
        "flip-boolean"
    }

    fn apply(&self, mut tree: Node) -> Node {
        flip_in_place(&mut tree);
        tree
    }
}

fn flip_in_place(node: &mut Node) {
    if node.text.is_some() {
        match node.kind.as_str() {
            "true" => node.text = Some("false".to_string()),
            "false" => node.text = Some("true".to_string()),
            _ => {}
        }
    }
    for child in &mut node.children {
        flip_in_place(child);
    }
}

pub const AVAILABLE_RULES: &[&str] = &["rename-identifier", "flip-boolean"];

pub fn rule_by_name(name: &str) -> Option<Box<dyn MutationRule>> {
    match name {
        "rename-identifier" => Some(Box::new(RenameIdentifiers)),
        "flip-boolean" => Some(Box::new(FlipBooleans)),
        _ => None,
    }
}

/// Resolve rule names to instances, in order.
///
/// Unknown names are a configuration error; all of them are collected and
/// reported at once, before any tree work starts.
pub fn build_rules(names: &[String]) -> Result<Vec<Box<dyn MutationRule>>> {
    let unknown: Vec<&str> = names
        .iter()
        .map(String::as_str)
        .filter(|name| rule_by_name(name).is_none())
        .collect();

    if !unknown.is_empty() {
        return Err(AuditError::UnknownRules(format!(
            "{} (available: {})",
            unknown.join(", "),
            AVAILABLE_RULES.join(", ")
        )));
    }

    Ok(names
        .iter()
        .filter_map(|name| rule_by_name(name))
        .collect())
}
