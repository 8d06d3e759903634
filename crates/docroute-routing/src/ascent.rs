//! Segment collection while walking up the content tree

use docroute_core::{ContentKey, ContentNode, IdKeyMap, ObjectType, Result};

/// Segments gathered leaf-first during an ascent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentTrail {
    leaf_first: Vec<String>,
}

impl SegmentTrail {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the segment of the next ancestor
    #[must_use]
    pub fn push(mut self, segment: impl Into<String>) -> Self {
        self.leaf_first.push(segment.into());
        self
    }

    /// Drop the segment closest to the root
    #[must_use]
    pub fn without_outermost(mut self) -> Self {
        self.leaf_first.pop();
        self
    }

    /// Segment closest to the root
    pub fn outermost(&self) -> Option<&str> {
        self.leaf_first.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.leaf_first.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_first.is_empty()
    }

    /// Join into a path starting with `/`.
    ///
    /// `root_to_leaf` orders segments from the top of the tree down; otherwise
    /// the leaf comes first.
    pub fn into_path(mut self, root_to_leaf: bool) -> String {
        if root_to_leaf {
            self.leaf_first.reverse();
        }
        format!("/{}", self.leaf_first.join("/"))
    }
}

/// Key of the node's parent document, `None` at the top of the tree.
pub async fn parent_key(id_keys: &dyn IdKeyMap, node: &ContentNode) -> Result<Option<ContentKey>> {
    if node.is_root() {
        return Ok(None);
    }
    id_keys
        .get_key_for_id(node.parent_id, ObjectType::Document)
        .await
}
