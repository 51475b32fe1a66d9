use std::ops::Range;

use crate::node::Node;

/// Capability contract for a raw parse-tree node.
///
/// The adapter and the quality filter depend only on this trait, never on a
/// concrete parsing backend, so tests can substitute a fake tree. Leaf text
/// is recovered through `byte_range` into the UTF-8 source buffer.
pub trait RawNode {
    fn kind(&self) -> &str;
    fn is_error(&self) -> bool;
    fn is_named(&self) -> bool;
    fn child_count(&self) -> usize;
    fn child(&self, index: usize) -> Option<Self>
    where
        Self: Sized;
    fn byte_range(&self) -> Range<usize>;
}

/// Convert a raw parse tree into the internal [`Node`] model.
///
/// A raw node with zero children becomes a leaf whose text is the exact
/// source substring it spans; any other node becomes an internal node with
/// no text. Child order is preserved exactly, since it determines path
/// addressing downstream.
///
/// The caller must have validated `source` as UTF-8 before parsing; there is
/// no error path here.
pub fn convert<N: RawNode>(raw: &N, source: &[u8]) -> Node {
    let text = if raw.child_count() == 0 {
        let range = raw.byte_range();
        let bytes = source.get(range).unwrap_or_default();
        Some(String::from_utf8_lossy(bytes).into_owned())
    } else {
        None
    };

    let children = (0..raw.child_count())
        .filter_map(|i| raw.child(i))
        .map(|child| convert(&child, source))
        .collect();

    Node {
        kind: raw.kind().to_string(),
        text,
        children,
        is_named: raw.is_named(),
    }
}
