use std::ops::Range;

use crate::adapter::{self, RawNode};
use crate::error::{AuditError, Result};
use crate::filter::{should_discard, DiscardReason, StructureClassifier};
use crate::node::Node;

impl RawNode for tree_sitter::Node<'_> {
    fn kind(&self) -> &str {
        tree_sitter::Node::kind(self)
    }

    fn is_error(&self) -> bool {
        tree_sitter::Node::is_error(self)
    }

    fn is_named(&self) -> bool {
        tree_sitter::Node::is_named(self)
    }

    fn child_count(&self) -> usize {
        tree_sitter::Node::child_count(self)
    }

    fn child(&self, index: usize) -> Option<Self> {
        tree_sitter::Node::child(self, index)
    }

    fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }
}

fn language_for(name: &str) -> Result<tree_sitter::Language> {
    match name.to_lowercase().as_str() {
        "python" | "py" => Ok(tree_sitter_python::LANGUAGE.into()),
        "cpp" | "c++" | "cxx" => Ok(tree_sitter_cpp::LANGUAGE.into()),
        "java" => Ok(tree_sitter_java::LANGUAGE.into()),
        "javascript" | "js" => Ok(tree_sitter_javascript::LANGUAGE.into()),
        "rust" | "rs" => Ok(tree_sitter_rust::LANGUAGE.into()),
        other => Err(AuditError::UnsupportedLanguage(other.to_string())),
    }
}

/// Either a converted tree ready for mutation, or the reason the sample was
/// filtered out.
#[derive(Debug)]
pub enum ParseOutcome {
    Tree(Node),
    Discarded(DiscardReason),
}

/// Tree-sitter-backed parser for corpus snippets.
///
/// Not `Sync`: the pipeline creates one per worker.
pub struct SnippetParser {
    parser: tree_sitter::Parser,
    classifier: StructureClassifier,
}

impl SnippetParser {
    pub fn new() -> Self {
        SnippetParser {
            parser: tree_sitter::Parser::new(),
            classifier: StructureClassifier::default(),
        }
    }

    /// Parse a snippet, run the quality filter, and convert the survivors.
    ///
    /// An unsupported language identifier is a distinct, catchable error.
    /// Invalid UTF-8 is a discard, signaled before any tree is built.
    pub fn parse(&mut self, code: &[u8], language: &str) -> Result<ParseOutcome> {
        let language = language_for(language)?;

        let source = match std::str::from_utf8(code) {
            Ok(source) => source,
            Err(_) => return Ok(ParseOutcome::Discarded(DiscardReason::InvalidUtf8)),
        };

        self.parser
            .set_language(&language)
            .map_err(|e| AuditError::Parse(format!("failed to set language: {}", e)))?;

        let tree = self
            .parser
            .parse(code, None)
            .ok_or_else(|| AuditError::Parse("parser returned no tree".to_string()))?;
        let root = tree.root_node();

        if let Some(reason) = should_discard(&root, source, &self.classifier) {
            return Ok(ParseOutcome::Discarded(reason));
        }

        Ok(ParseOutcome::Tree(adapter::convert(&root, code)))
    }
}

impl Default for SnippetParser {
    fn default() -> Self {
        SnippetParser::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(code: &str, language: &str) -> ParseOutcome {
        SnippetParser::new().parse(code.as_bytes(), language).unwrap()
    }

    #[test]
    fn test_parse_valid_python_function() {
        let code = "def add(a, b):\n    c = a + b\n    return c\n";
        match parse(code, "python") {
            ParseOutcome::Tree(tree) => {
                assert_eq!(tree.kind, "module");
                assert!(!tree.children.is_empty());
            }
            other => panic!("expected tree, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_valid_cpp_function() {
        let code = "void f() {\n    int x = 0;\n}\n";
        match parse(code, "cpp") {
            ParseOutcome::Tree(tree) => assert_eq!(tree.kind, "translation_unit"),
            other => panic!("expected tree, got {:?}", other),
        }
    }

    #[test]
    fn test_leaf_text_comes_from_source() {
        let code = "x = 1\n";
        let ParseOutcome::Tree(tree) = parse(code, "python") else {
            panic!("expected tree");
        };

        let texts: Vec<&str> = tree
            .traverse()
            .filter_map(|n| n.text.as_deref())
            .collect();
        assert!(texts.contains(&"x"));
        assert!(texts.contains(&"1"));
    }

    #[test]
    fn test_discard_empty_source() {
        match parse("   \n\t  ", "python") {
            ParseOutcome::Discarded(reason) => assert_eq!(reason, DiscardReason::EmptySource),
            other => panic!("expected discard, got {:?}", other),
        }
    }

    #[test]
    fn test_discard_trivial_function_body() {
        let code = "def empty():\n    return\n";
        match parse(code, "python") {
            ParseOutcome::Discarded(reason) => {
                assert_eq!(reason, DiscardReason::NoMeaningfulStructure)
            }
            other => panic!("expected discard, got {:?}", other),
        }
    }

    #[test]
    fn test_discard_invalid_utf8() {
        let mut parser = SnippetParser::new();
        let outcome = parser.parse(&[0x64, 0x65, 0x66, 0xff, 0xfe], "python").unwrap();
        match outcome {
            ParseOutcome::Discarded(reason) => assert_eq!(reason, DiscardReason::InvalidUtf8),
            other => panic!("expected discard, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_language_is_catchable_error() {
        let mut parser = SnippetParser::new();
        let err = parser.parse(b"x = 1", "cobol").unwrap_err();
        assert!(matches!(err, AuditError::UnsupportedLanguage(_)));
    }

    #[test]
    fn test_language_aliases() {
        assert!(language_for("PY").is_ok());
        assert!(language_for("C++").is_ok());
        assert!(language_for("js").is_ok());
    }
}
