//! Top-level segment hiding
//!
//! When no domain anchors a route and the top-level node is configured to be
//! hidden, the segment belonging to the first root is removed from the path.

use docroute_core::{ContentKey, ContentNode, ContentRepository, IdKeyMap, Result};
use std::sync::Arc;
use tracing::debug;

use crate::ascent::{SegmentTrail, parent_key};

/// Removes the first root's segment from domain-less routes.
#[derive(Clone)]
pub struct TopLevelHider {
    content: Arc<dyn ContentRepository>,
    id_keys: Arc<dyn IdKeyMap>,
}

impl TopLevelHider {
    pub fn new(content: Arc<dyn ContentRepository>, id_keys: Arc<dyn IdKeyMap>) -> Self {
        Self { content, id_keys }
    }

    /// Apply to the trail collected up to `terminal`, the last node visited.
    ///
    /// A terminal without a resolvable parent always loses its segment. One
    /// whose parent is the first root loses the outermost segment. Anything
    /// else is left untouched.
    pub async fn apply(&self, terminal: &ContentNode, trail: SegmentTrail) -> Result<SegmentTrail> {
        let Some(parent) = parent_key(self.id_keys.as_ref(), terminal).await? else {
            return Ok(trail.without_outermost());
        };

        if self.is_first_root(parent).await? {
            debug!(node = %terminal.key, "Hiding top-level segment");
            Ok(trail.without_outermost())
        } else {
            Ok(trail)
        }
    }

    async fn is_first_root(&self, key: ContentKey) -> Result<bool> {
        let roots = self.content.get_root_content().await?;
        Ok(roots.first().is_some_and(|root| root.key == key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docroute_core::ROOT_PARENT_ID;
    use docroute_core::memory::InMemoryContentTree;

    fn hider(tree: InMemoryContentTree) -> TopLevelHider {
        let tree = Arc::new(tree);
        TopLevelHider::new(tree.clone(), tree)
    }

    #[tokio::test]
    async fn test_root_terminal_loses_segment() {
        let home = ContentNode::new(1, ROOT_PARENT_ID, "Home");
        let hider = hider(InMemoryContentTree::with_nodes([home.clone()]));

        let trail = SegmentTrail::new().push("about").push("home");
        let trail = hider.apply(&home, trail).await.unwrap();
        assert_eq!(trail.into_path(true), "/about");
    }

    #[tokio::test]
    async fn test_child_of_first_root_loses_outermost() {
        let first = ContentNode::new(1, ROOT_PARENT_ID, "Home").with_sort_order(0);
        let child = ContentNode::new(2, 1, "About");
        let hider = hider(InMemoryContentTree::with_nodes([first, child.clone()]));

        let trail = SegmentTrail::new().push("team").push("about");
        let trail = hider.apply(&child, trail).await.unwrap();
        assert_eq!(trail.into_path(true), "/team");
    }

    #[tokio::test]
    async fn test_child_of_second_root_untouched() {
        let first = ContentNode::new(1, ROOT_PARENT_ID, "Home").with_sort_order(0);
        let second = ContentNode::new(5, ROOT_PARENT_ID, "Other").with_sort_order(1);
        let child = ContentNode::new(6, 5, "Page");
        let hider = hider(InMemoryContentTree::with_nodes([first, second, child.clone()]));

        let trail = SegmentTrail::new().push("page");
        let trail = hider.apply(&child, trail).await.unwrap();
        assert_eq!(trail.into_path(true), "/page");
    }
}
