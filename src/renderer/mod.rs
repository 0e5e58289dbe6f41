//! Renderer backend interface.
//!
//! Render nodes belong to the backend; the core only holds their ids and
//! asks the backend the few questions navigation needs.

use std::collections::HashMap;

use crate::types::{DocumentId, RenderNodeId};

/// What the core needs from the renderer backend.
pub trait RenderHost {
    /// Document that owns `node`, `None` once the node is discarded.
    fn owner_document(&self, node: RenderNodeId) -> Option<DocumentId>;
}

/// Static node-to-document table, for headless hosts and tests.
impl RenderHost for HashMap<RenderNodeId, DocumentId> {
    fn owner_document(&self, node: RenderNodeId) -> Option<DocumentId> {
        self.get(&node).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_host() {
        let mut host = HashMap::new();
        host.insert(RenderNodeId(1), DocumentId(7));
        assert_eq!(host.owner_document(RenderNodeId(1)), Some(DocumentId(7)));
        assert_eq!(host.owner_document(RenderNodeId(2)), None);
    }
}
