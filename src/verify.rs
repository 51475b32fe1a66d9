use std::fmt;

use crate::manifest::Manifest;
use crate::node::Node;

/// A single verification mismatch, located by dot path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// Node kinds differ at a path. Non-fatal: the walk continues.
    TypeMismatch {
        path: String,
        original: String,
        mutated: String,
    },
    /// Child counts differ at a path. Descent stops for this subtree only.
    StructuralMismatch {
        path: String,
        original_children: usize,
        mutated_children: usize,
    },
    /// The manifest promised a text at this path and the mutated tree
    /// carries something else.
    MutationFail {
        path: String,
        expected: String,
        actual: Option<String>,
    },
    /// Texts differ at a path the manifest never permitted to change.
    UnexpectedChange {
        path: String,
        original: Option<String>,
        mutated: Option<String>,
    },
}

impl Mismatch {
    pub fn path(&self) -> &str {
        match self {
            Mismatch::TypeMismatch { path, .. }
            | Mismatch::StructuralMismatch { path, .. }
            | Mismatch::MutationFail { path, .. }
            | Mismatch::UnexpectedChange { path, .. } => path,
        }
    }
}

fn text_or_none(text: &Option<String>) -> &str {
    text.as_deref().unwrap_or("none")
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::TypeMismatch {
                path,
                original,
                mutated,
            } => write!(f, "TYPE_MISMATCH at {}: {} vs {}", path, original, mutated),
            Mismatch::StructuralMismatch { path, .. } => {
                write!(f, "STRUCTURAL_MISMATCH at {}: child count differs", path)
            }
            Mismatch::MutationFail {
                path,
                expected,
                actual,
            } => write!(
                f,
                "MUTATION_FAIL at {}: expected {}, got {}",
                path,
                expected,
                text_or_none(actual)
            ),
            Mismatch::UnexpectedChange {
                path,
                original,
                mutated,
            } => write!(
                f,
                "UNEXPECTED_CHANGE at {}: {} -> {}",
                path,
                text_or_none(original),
                text_or_none(mutated)
            ),
        }
    }
}

/// Outcome of a structural isomorphism check. The sample verifies iff no
/// mismatch was recorded; there is no partial score.
#[derive(Debug, Clone, Default)]
pub struct VerifyReport {
    pub errors: Vec<Mismatch>,
}

impl VerifyReport {
    pub fn verified(&self) -> bool {
        self.errors.is_empty()
    }

    /// First mismatch in walk order, used as the one-line summary reason.
    pub fn headline(&self) -> Option<String> {
        self.errors.first().map(|e| e.to_string())
    }
}

/// Check that `mutated` is structurally isomorphic to `original` except
/// where `manifest` explicitly permits a difference.
///
/// Pure function of its three inputs: every call walks with a fresh error
/// accumulator. Errors are retained in the order encountered.
///
/// A path listed in `ignored_paths` exempts the whole subtree rooted there:
/// the walk returns without checking the node or visiting its descendants.
pub fn verify(original: &Node, mutated: &Node, manifest: &Manifest) -> VerifyReport {
    let mut report = VerifyReport::default();
    walk(original, mutated, "0", manifest, &mut report.errors);
    report
}

fn walk(
    original: &Node,
    mutated: &Node,
    path: &str,
    manifest: &Manifest,
    errors: &mut Vec<Mismatch>,
) {
    if manifest.ignored_paths.contains(path) {
        return;
    }

    check_node_integrity(original, mutated, path, manifest, errors);

    if original.children.len() != mutated.children.len() {
        errors.push(Mismatch::StructuralMismatch {
            path: path.to_string(),
            original_children: original.children.len(),
            mutated_children: mutated.children.len(),
        });
        // Children cannot be paired once counts diverge; sibling subtrees
        // elsewhere in the walk are unaffected.
        return;
    }

    for (i, (orig_child, mut_child)) in original
        .children
        .iter()
        .zip(mutated.children.iter())
        .enumerate()
    {
        walk(orig_child, mut_child, &format!("{}.{}", path, i), manifest, errors);
    }
}

fn check_node_integrity(
    original: &Node,
    mutated: &Node,
    path: &str,
    manifest: &Manifest,
    errors: &mut Vec<Mismatch>,
) {
    if original.kind != mutated.kind {
        errors.push(Mismatch::TypeMismatch {
            path: path.to_string(),
            original: original.kind.clone(),
            mutated: mutated.kind.clone(),
        });
    }

    if let Some(expected) = manifest.renamed_paths.get(path) {
        if mutated.text.as_deref() != Some(expected.as_str()) {
            errors.push(Mismatch::MutationFail {
                path: path.to_string(),
                expected: expected.clone(),
                actual: mutated.text.clone(),
            });
        }
    } else if original.text != mutated.text {
        errors.push(Mismatch::UnexpectedChange {
            path: path.to_string(),
            original: original.text.clone(),
            mutated: mutated.text.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mutation::MutationEngine;
    use crate::rules::RenameIdentifiers;
    use std::collections::{HashMap, HashSet};

    /// `def add(a, b): return a + b`, shaped as in the path examples:
    /// identifiers live at 0.0, 0.1.0, 0.1.1, 0.2.0.0.0 and 0.2.0.0.2.
    fn function_cst() -> Node {
        Node::internal(
            "function_definition",
            vec![
                Node::leaf("identifier", "add").named(),
                Node::internal(
                    "parameters",
                    vec![
                        Node::leaf("identifier", "a").named(),
                        Node::leaf("identifier", "b").named(),
                    ],
                ),
                Node::internal(
                    "body",
                    vec![Node::internal(
                        "return_statement",
                        vec![Node::internal(
                            "binary_expression",
                            vec![
                                Node::leaf("identifier", "a").named(),
                                Node::leaf("operator", "+"),
                                Node::leaf("identifier", "b").named(),
                            ],
                        )],
                    )],
                ),
            ],
        )
    }

    fn rename_manifest() -> Manifest {
        let mut renamed = HashMap::new();
        renamed.insert("0.0".to_string(), "x_add".to_string());
        renamed.insert("0.1.0".to_string(), "x_a".to_string());
        renamed.insert("0.1.1".to_string(), "x_b".to_string());
        renamed.insert("0.2.0.0.0".to_string(), "x_a".to_string());
        renamed.insert("0.2.0.0.2".to_string(), "x_b".to_string());
        Manifest {
            renamed_paths: renamed,
            ignored_paths: HashSet::new(),
        }
    }

    fn renamed_cst() -> Node {
        let engine = MutationEngine::new(vec![Box::new(RenameIdentifiers)]);
        engine.apply_mutations(function_cst())
    }

    #[test]
    fn test_clone_verifies_against_empty_manifest() {
        let original = function_cst();
        let report = verify(&original, &original.clone(), &Manifest::default());
        assert!(report.verified());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_full_rename_with_matching_manifest() {
        // Scenario A: every rename is declared, so the trees are isomorphic.
        let original = function_cst();
        let mutated = renamed_cst();

        let report = verify(&original, &mutated, &rename_manifest());

        assert!(report.verified(), "errors: {:?}", report.errors);
    }

    #[test]
    fn test_undeclared_rename_is_unexpected_change() {
        // Scenario B: manifest omits 0.1.1, exactly one error there.
        let original = function_cst();
        let mutated = renamed_cst();
        let mut manifest = rename_manifest();
        manifest.renamed_paths.remove("0.1.1");

        let report = verify(&original, &mutated, &manifest);

        assert!(!report.verified());
        assert_eq!(report.errors.len(), 1);
        match &report.errors[0] {
            Mismatch::UnexpectedChange { path, original, mutated } => {
                assert_eq!(path, "0.1.1");
                assert_eq!(original.as_deref(), Some("b"));
                assert_eq!(mutated.as_deref(), Some("x_b"));
            }
            other => panic!("expected UnexpectedChange, got {:?}", other),
        }
    }

    #[test]
    fn test_dropped_child_is_structural_mismatch() {
        // Scenario C: binary_expression at 0.2.0.0 loses its operator.
        let original = function_cst();
        let mut mutated = renamed_cst();
        let expr = &mut mutated.children[2].children[0].children[0];
        expr.children.remove(1);

        let report = verify(&original, &mutated, &rename_manifest());

        assert!(!report.verified());
        assert_eq!(report.errors.len(), 1);
        match &report.errors[0] {
            Mismatch::StructuralMismatch {
                path,
                original_children,
                mutated_children,
            } => {
                assert_eq!(path, "0.2.0.0");
                assert_eq!(*original_children, 3);
                assert_eq!(*mutated_children, 2);
            }
            other => panic!("expected StructuralMismatch, got {:?}", other),
        }
        // No descent past the mismatch: nothing recorded below 0.2.0.0.
        assert!(report.errors.iter().all(|e| !e.path().starts_with("0.2.0.0.")));
    }

    #[test]
    fn test_sibling_subtrees_unaffected_by_structural_mismatch() {
        let original = function_cst();
        let mut mutated = function_cst();
        // Drop a parameter and also corrupt a leaf in the body.
        mutated.children[1].children.pop();
        mutated.children[2].children[0].children[0].children[1].text = Some("-".to_string());

        let report = verify(&original, &mutated, &Manifest::default());

        let paths: Vec<&str> = report.errors.iter().map(|e| e.path()).collect();
        assert_eq!(paths, ["0.1", "0.2.0.0.1"]);
    }

    #[test]
    fn test_declared_rename_ignores_original_text() {
        // If renamed_paths[p] matches the mutated text, no error regardless
        // of what the original said at p.
        let original = Node::internal("module", vec![Node::leaf("identifier", "whatever")]);
        let mutated = Node::internal("module", vec![Node::leaf("identifier", "x_y")]);

        let mut manifest = Manifest::default();
        manifest
            .renamed_paths
            .insert("0.0".to_string(), "x_y".to_string());

        let report = verify(&original, &mutated, &manifest);
        assert!(report.verified());
    }

    #[test]
    fn test_mutation_fail_on_wrong_rename() {
        let original = Node::internal("module", vec![Node::leaf("identifier", "a")]);
        let mutated = Node::internal("module", vec![Node::leaf("identifier", "y_a")]);

        let mut manifest = Manifest::default();
        manifest
            .renamed_paths
            .insert("0.0".to_string(), "x_a".to_string());

        let report = verify(&original, &mutated, &manifest);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.headline().unwrap(),
            "MUTATION_FAIL at 0.0: expected x_a, got y_a"
        );
    }

    #[test]
    fn test_ignored_path_exempts_whole_subtree() {
        let original = function_cst();
        let mut mutated = function_cst();
        // Corrupt the parameters subtree badly: kind, text and child count.
        mutated.children[1].kind = "garbage".to_string();
        mutated.children[1].children.clear();

        let mut manifest = Manifest::default();
        manifest.ignored_paths.insert("0.1".to_string());

        let report = verify(&original, &mutated, &manifest);
        assert!(report.verified());
    }

    #[test]
    fn test_type_mismatch_is_non_fatal() {
        let original = Node::internal(
            "module",
            vec![Node::leaf("identifier", "a"), Node::leaf("identifier", "b")],
        );
        let mut mutated = original.clone();
        mutated.children[0].kind = "string".to_string();
        mutated.children[1].text = Some("c".to_string());

        let report = verify(&original, &mutated, &Manifest::default());

        // The kind mismatch at 0.0 does not stop the walk; the text change
        // at 0.1 is still found.
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.errors[0].path(), "0.0");
        assert_eq!(report.errors[1].path(), "0.1");
    }

    #[test]
    fn test_verify_is_pure_across_calls() {
        let original = function_cst();
        let mutated = renamed_cst();
        let manifest = Manifest::default();

        let first = verify(&original, &mutated, &manifest);
        let second = verify(&original, &mutated, &manifest);

        assert_eq!(first.errors, second.errors);
        assert_eq!(first.errors.len(), 5);
    }

    #[test]
    fn test_headline_is_first_error_in_walk_order() {
        let original = function_cst();
        let mutated = renamed_cst();

        let report = verify(&original, &mutated, &Manifest::default());

        assert_eq!(
            report.headline().unwrap(),
            "UNEXPECTED_CHANGE at 0.0: add -> x_add"
        );
    }

    #[test]
    fn test_shape_preserving_mutation_keeps_paths_valid() {
        let original = function_cst();
        let mutated = renamed_cst();

        for path in ["0", "0.0", "0.1", "0.1.1", "0.2.0.0", "0.2.0.0.2"] {
            assert!(original.node_at(path).is_some());
            assert!(mutated.node_at(path).is_some());
        }
    }
}
