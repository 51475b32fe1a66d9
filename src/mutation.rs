use crate::error::Result;
use crate::node::Node;
use crate::rules::{build_rules, MutationRule};

/// Applies an ordered sequence of mutation rules to a tree.
///
/// Composition is strictly sequential: rule 1's output tree becomes rule 2's
/// input, and the result of the last rule is the final mutated tree. The
/// caller supplies a clone of the original tree, so rules are free to mutate
/// destructively without corrupting the verification baseline.
pub struct MutationEngine {
    rules: Vec<Box<dyn MutationRule>>,
}

impl MutationEngine {
    pub fn new(rules: Vec<Box<dyn MutationRule>>) -> Self {
        MutationEngine { rules }
    }

    /// Build an engine from rule names; unknown names fail configuration
    /// validation before any sample is processed.
    pub fn from_names(names: &[String]) -> Result<Self> {
        Ok(MutationEngine::new(build_rules(names)?))
    }

    pub fn apply_mutations(&self, tree: Node) -> Node {
        self.rules.iter().fold(tree, |tree, rule| rule.apply(tree))
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}
