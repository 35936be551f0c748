//! In-memory storage

use crate::error::StorageResult;
use crate::traits::Storage;
use lugh_core::{Node, WeakNode};
use std::cell::RefCell;
use std::collections::HashMap;

/// In-memory storage
///
/// Keeps a registry of the named nodes it handed out, so that each identifier
/// maps to one node per storage. The registry holds weak handles: a named
/// node is forgotten once its last owner drops it. Two storages never share
/// named nodes.
#[derive(Default)]
pub struct MemoryStorage {
    named: RefCell<HashMap<String, WeakNode>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of named nodes currently alive in the registry
    pub fn named_node_count(&self) -> usize {
        self.named
            .borrow()
            .values()
            .filter(|weak| weak.upgrade().is_some())
            .count()
    }
}

impl Storage for MemoryStorage {
    fn create_named_node(&self, identifier: &str) -> StorageResult<Node> {
        let mut named = self.named.borrow_mut();
        if let Some(node) = named.get(identifier).and_then(WeakNode::upgrade) {
            return Ok(node);
        }
        let node = Node::named(identifier)?;
        named.retain(|_, weak| weak.upgrade().is_some());
        named.insert(identifier.to_string(), node.downgrade());
        tracing::trace!(identifier, "registered named node");
        Ok(node)
    }
}

impl std::fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("named_nodes", &self.named_node_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StorageError;
    use lugh_core::{vocab, ObjectKind};

    #[test]
    fn test_named_nodes_are_canonical() {
        let storage = MemoryStorage::new();
        let a = storage.create_named_node("http://example.org/a").unwrap();
        let again = storage.create_named_node("http://example.org/a").unwrap();
        assert!(a.same_node(&again));
        assert_eq!(storage.named_node_count(), 1);

        drop(a);
        drop(again);
        assert_eq!(storage.named_node_count(), 0);
    }

    #[test]
    fn test_storages_do_not_share_identity() {
        let first = MemoryStorage::new();
        let second = MemoryStorage::new();
        let a = first.create_named_node("http://example.org/a").unwrap();
        let b = second.create_named_node("http://example.org/a").unwrap();
        assert!(!a.same_node(&b));
        assert_eq!(a, b);
    }

    #[test]
    fn test_named_typed_node() {
        let storage = MemoryStorage::new();
        let node = storage
            .create_named_typed_node("http://example.org/a", "http://example.org/Book")
            .unwrap();
        storage
            .create_named_typed_node("http://example.org/a", "http://example.org/Book")
            .unwrap();
        assert_eq!(node.get(vocab::TYPE).len(), 1);
    }

    #[test]
    fn test_factory_validation() {
        let storage = MemoryStorage::new();
        assert!(matches!(
            storage.create_named_node("not a uri"),
            Err(StorageError::Core(lugh_core::Error::InvalidIdentifier(_)))
        ));
        assert!(storage.create_lang_string("x", "").is_err());
        assert!(storage.create_literal("x", Some(vocab::LANG_STRING)).is_err());
        assert!(storage.create_literal("x", Some("")).unwrap().is_plain());
        assert!(storage.create_typed_node("http://example.org/Book").unwrap().has_type("http://example.org/Book"));
    }

    #[test]
    fn test_create_leaf() {
        let storage = MemoryStorage::new();
        assert!(storage
            .create_leaf("http://www.kitodo.org/", None)
            .unwrap()
            .is(ObjectKind::NodeReference));
        assert!(storage.create_leaf("Lorem", Some("la")).unwrap().is(ObjectKind::LangString));
        assert!(storage.create_leaf("Lorem", Some("")).unwrap().is(ObjectKind::Literal));
    }

    #[test]
    fn test_results() {
        let storage = MemoryStorage::new();
        assert!(storage.create_result().is_empty());
        let node = storage.create_node();
        let result = storage.create_result_of(vec![node.clone().into(), node.into()]);
        assert_eq!(result.len(), 1);
    }
}
