use std::fmt;

/// A node in a concrete syntax tree.
///
/// Each node has a `kind` (the grammar category, e.g. `"identifier"` or
/// `"function_definition"`), an ordered list of exclusively-owned children,
/// and, for leaves only, the raw token text. `is_named` mirrors the parser's
/// named/anonymous distinction and is only consulted when rendering.
///
/// Node identity is purely structural: a node is addressed by its dot path
/// from the root (`"0"`, `"0.2.1"`, ...), never by an id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: String,
    pub text: Option<String>,
    pub children: Vec<Node>,
    pub is_named: bool,
}

impl Node {
    /// Create a leaf node carrying token text.
    pub fn leaf(kind: impl Into<String>, text: impl Into<String>) -> Self {
        Node {
            kind: kind.into(),
            text: Some(text.into()),
            children: Vec::new(),
            is_named: false,
        }
    }

    /// Create an internal node. Internal nodes never carry text.
    pub fn internal(kind: impl Into<String>, children: Vec<Node>) -> Self {
        Node {
            kind: kind.into(),
            text: None,
            children,
            is_named: false,
        }
    }

    /// Mark the node as a named (syntactically significant) node.
    pub fn named(mut self) -> Self {
        self.is_named = true;
        self
    }

    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Preorder traversal: the node itself, then each child subtree in order.
    pub fn traverse(&self) -> Traverse<'_> {
        Traverse { stack: vec![self] }
    }

    /// Resolve a dot path (`"0"`, `"0.2.0"`) to a node in this tree.
    ///
    /// The first segment addresses the root and must be `"0"`. Returns `None`
    /// for malformed paths or out-of-range child indices.
    pub fn node_at(&self, path: &str) -> Option<&Node> {
        let mut segments = path.split('.');
        if segments.next() != Some("0") {
            return None;
        }
        let mut current = self;
        for segment in segments {
            let index: usize = segment.parse().ok()?;
            current = current.children.get(index)?;
        }
        Some(current)
    }

    /// Render the tree with two-space indentation, one node per line.
    /// Named leaves show their text after the kind.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        self.pretty_into(&mut out, 0);
        out
    }

    fn pretty_into(&self, out: &mut String, indent: usize) {
        for _ in 0..indent {
            out.push_str("  ");
        }
        out.push_str(&self.kind);
        if let Some(text) = &self.text {
            if self.is_named {
                out.push_str(": ");
                out.push_str(text);
            }
        }
        out.push('\n');
        for child in &self.children {
            child.pretty_into(out, indent + 1);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.text {
            Some(text) => write!(f, "Node(kind={}, text={})", self.kind, text),
            None => write!(f, "Node(kind={})", self.kind),
        }
    }
}

pub struct Traverse<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Traverse<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
