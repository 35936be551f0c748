//! Storage trait definitions

use crate::error::StorageResult;
use crate::import;
use lugh_core::{
    export_result, Expansion, LangString, Literal, Node, NodeReference, ObjectType, QueryResult, Statement,
};

/// Factory for graph values and bridge to statements
///
/// Callers create nodes, literals and results through a storage so that an
/// implementation can back them differently without the callers changing.
pub trait Storage {
    /// Canonical named node for `identifier`
    ///
    /// Returns the same node for the same identifier for as long as some
    /// owner keeps it alive.
    fn create_named_node(&self, identifier: &str) -> StorageResult<Node>;

    /// Named node outside any registry
    ///
    /// Import uses this so that each import builds an independent graph.
    fn create_fresh_named_node(&self, identifier: &str) -> StorageResult<Node> {
        Ok(Node::named(identifier)?)
    }

    /// Create an empty anonymous node
    fn create_node(&self) -> Node {
        Node::new()
    }

    /// Create an anonymous node with an `rdf:type`
    fn create_typed_node(&self, type_iri: &str) -> StorageResult<Node> {
        Ok(Node::with_type(type_iri)?)
    }

    /// Canonical named node for `identifier`, typed with `type_iri`
    fn create_named_typed_node(&self, identifier: &str, type_iri: &str) -> StorageResult<Node> {
        let node = self.create_named_node(identifier)?;
        if !node.has_type(type_iri) {
            node.put(lugh_core::vocab::TYPE, self.create_node_reference(type_iri)?)?;
        }
        Ok(node)
    }

    /// Create a literal; no datatype means a plain literal
    fn create_literal(&self, value: &str, datatype: Option<&str>) -> StorageResult<Literal> {
        Ok(Literal::new(value, datatype)?)
    }

    fn create_lang_string(&self, value: &str, language: &str) -> StorageResult<LangString> {
        Ok(LangString::new(value, language)?)
    }

    fn create_node_reference(&self, identifier: &str) -> StorageResult<NodeReference> {
        Ok(NodeReference::new(identifier)?)
    }

    /// Create a leaf from a string: a reference for URIs, a language-tagged
    /// string for a non-empty language, a plain literal otherwise
    fn create_leaf(&self, value: &str, language: Option<&str>) -> StorageResult<ObjectType> {
        Ok(ObjectType::leaf(value, language)?)
    }

    fn create_result(&self) -> QueryResult {
        QueryResult::new()
    }

    fn create_result_of(&self, objects: Vec<ObjectType>) -> QueryResult {
        objects.into()
    }

    /// Build a fresh graph from `statements`
    ///
    /// Returns the nodes never used as an object, or every node when
    /// `always_all` is set or no such node exists. Named nodes that are
    /// mentioned but never described become references.
    fn create_result_from(&self, statements: &[Statement], always_all: bool) -> StorageResult<QueryResult> {
        import::import_statements(self, statements, always_all)
    }

    /// Statements describing every node of `result`
    fn export(&self, result: &QueryResult, expansion: Expansion) -> Vec<Statement> {
        export_result(result, expansion)
    }
}
