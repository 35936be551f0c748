//! Building graphs from statements

use crate::error::{StorageError, StorageResult};
use crate::traits::Storage;
use lugh_core::{vocab, Node, ObjectType, QueryResult, Resource, Statement, StatementLiteral, Term};
use std::collections::{HashMap, HashSet};

/// Nodes created during one import, keyed by the resource they stand for
///
/// Blank labels are only meaningful within the statement set, so each import
/// gets its own resolver.
#[derive(Default)]
struct Resolver {
    nodes: HashMap<Resource, Node>,
    order: Vec<Resource>,
}

impl Resolver {
    fn node<S: Storage + ?Sized>(&mut self, storage: &S, resource: &Resource) -> StorageResult<Node> {
        if let Some(node) = self.nodes.get(resource) {
            return Ok(node.clone());
        }
        let node = match resource {
            Resource::Blank(_) => storage.create_node(),
            Resource::Named(identifier) => storage.create_fresh_named_node(identifier)?,
        };
        self.nodes.insert(resource.clone(), node.clone());
        self.order.push(resource.clone());
        Ok(node)
    }

    fn iter(&self) -> impl Iterator<Item = (&Resource, &Node)> {
        self.order.iter().filter_map(|r| self.nodes.get(r).map(|n| (r, n)))
    }
}

/// Classify a statement literal
///
/// Well-formed XML wins over a language tag, which wins over the datatype.
/// An absent or string datatype gives a plain literal.
pub fn literal_object<S: Storage + ?Sized>(storage: &S, literal: &StatementLiteral) -> StorageResult<ObjectType> {
    let value = literal.value.as_str();
    if literal.well_formed_xml {
        return Ok(storage.create_literal(value, Some(vocab::XML_LITERAL))?.into());
    }
    if let Some(language) = literal.language.as_deref().filter(|l| !l.is_empty()) {
        return Ok(storage.create_lang_string(value, language)?.into());
    }
    let datatype = literal.datatype.as_deref();
    if vocab::is_plain_type(datatype) {
        return Ok(storage.create_literal(value, None)?.into());
    }
    Ok(storage.create_literal(value, datatype)?.into())
}

/// Build a fresh graph from `statements`, creating every value through `storage`
///
/// Named nodes come from [`Storage::create_fresh_named_node`], so the graph
/// never shares nodes with earlier imports. Every named node that ends up
/// without edges is replaced by a reference wherever it occurs. Only nodes
/// created by this call are considered.
pub fn import_statements<S: Storage + ?Sized>(
    storage: &S,
    statements: &[Statement],
    always_all: bool,
) -> StorageResult<QueryResult> {
    let mut resolver = Resolver::default();
    let mut referenced: HashSet<Resource> = HashSet::new();

    for (index, statement) in statements.iter().enumerate() {
        let invalid = |e: StorageError| StorageError::InvalidStatement {
            index,
            reason: e.to_string(),
        };
        let subject = resolver.node(storage, &statement.subject).map_err(invalid)?;
        let object: ObjectType = match &statement.object {
            Term::Resource(resource) => {
                referenced.insert(resource.clone());
                resolver.node(storage, resource).map_err(invalid)?.into()
            }
            Term::Literal(literal) => literal_object(storage, literal).map_err(invalid)?,
        };
        subject
            .put(&statement.predicate, object)
            .map_err(|e| invalid(e.into()))?;
    }

    let collapsed: HashSet<String> = resolver
        .iter()
        .filter_map(|(_, node)| match node.identifier() {
            Some(identifier) if node.is_empty() => Some(identifier.to_string()),
            _ => None,
        })
        .collect();
    if !collapsed.is_empty() {
        for (_, node) in resolver.iter() {
            collapse_references(storage, node, &collapsed)?;
        }
    }

    let top_level: QueryResult = resolver
        .iter()
        .filter(|(resource, _)| !referenced.contains(*resource))
        .map(|(_, node)| node.clone().into())
        .collect();
    let everything = always_all || top_level.is_empty();
    let result = if everything {
        resolver
            .iter()
            .map(|(_, node)| as_object(storage, node, &collapsed))
            .collect::<StorageResult<QueryResult>>()?
    } else {
        top_level
    };

    tracing::debug!(
        statements = statements.len(),
        nodes = resolver.order.len(),
        top_level = result.len(),
        collapsed = collapsed.len(),
        always_all = everything,
        "imported statements"
    );
    Ok(result)
}

fn as_object<S: Storage + ?Sized>(storage: &S, node: &Node, collapsed: &HashSet<String>) -> StorageResult<ObjectType> {
    match node.identifier() {
        Some(identifier) if collapsed.contains(identifier) => {
            Ok(storage.create_node_reference(identifier)?.into())
        }
        _ => Ok(node.clone().into()),
    }
}

/// Replace empty named children listed in `collapsed` by references
fn collapse_references<S: Storage + ?Sized>(
    storage: &S,
    node: &Node,
    collapsed: &HashSet<String>,
) -> StorageResult<()> {
    for (relation, values) in node.edges() {
        let needs_collapse = values.iter().any(|v| is_collapsed(v, collapsed));
        if !needs_collapse {
            continue;
        }
        let replaced = values
            .into_iter()
            .map(|v| match v.as_node() {
                Some(child) if is_collapsed(&v, collapsed) => as_object(storage, child, collapsed),
                _ => Ok(v),
            })
            .collect::<StorageResult<Vec<ObjectType>>>()?;
        node.replace(&relation, replaced)?;
    }
    Ok(())
}

fn is_collapsed(value: &ObjectType, collapsed: &HashSet<String>) -> bool {
    value
        .as_node()
        .is_some_and(|n| n.is_empty() && n.identifier().is_some_and(|id| collapsed.contains(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStorage;
    use lugh_core::{Expansion, LangString, Literal, ObjectKind};
    use std::cell::Cell;

    const A: &str = "http://example.org/a";
    const B: &str = "http://example.org/b";
    const C: &str = "http://example.org/c";
    const BOOK: &str = "http://example.org/Book";
    const AUTHOR: &str = "http://example.org/author";
    const TITLE: &str = "http://example.org/title";

    fn named(iri: &str) -> Resource {
        Resource::Named(iri.to_string())
    }

    fn blank(label: &str) -> Resource {
        Resource::Blank(label.to_string())
    }

    fn book_statements() -> Vec<Statement> {
        vec![
            Statement::new(named(A), vocab::TYPE, named(BOOK)),
            Statement::new(named(A), AUTHOR, named(B)),
        ]
    }

    #[test]
    fn test_single_top_level_node() {
        let result = import_statements(&MemoryStorage::new(), &book_statements(), false).unwrap();
        let a = result.named_node().unwrap();
        assert_eq!(a.identifier(), Some(A));
        assert_eq!(a.len(), 2);
        assert!(a.get(AUTHOR).is_unique_of(ObjectKind::NodeReference));
        assert_eq!(a.get(AUTHOR).identifier().unwrap(), B);
        assert!(a.has_type(BOOK));
    }

    #[test]
    fn test_always_all_returns_references_for_collapsed() {
        let result = import_statements(&MemoryStorage::new(), &book_statements(), true).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(result.named_nodes().len(), 1);
        assert_eq!(result.node_references().len(), 2);
    }

    #[test]
    fn test_described_object_stays_a_node() {
        let mut statements = book_statements();
        statements.push(Statement::new(named(B), TITLE, StatementLiteral::simple("Goethe")));
        let result = import_statements(&MemoryStorage::new(), &statements, false).unwrap();
        let a = result.named_node().unwrap();
        let b = a.get(AUTHOR).named_node().unwrap();
        assert_eq!(b.get(TITLE).string().unwrap(), "Goethe");
    }

    #[test]
    fn test_pure_cycle_returns_all() {
        let statements = vec![
            Statement::new(named(A), AUTHOR, named(B)),
            Statement::new(named(B), AUTHOR, named(A)),
        ];
        let result = import_statements(&MemoryStorage::new(), &statements, false).unwrap();
        assert_eq!(result.named_nodes().len(), 2);
    }

    #[test]
    fn test_blank_nodes() {
        let statements = vec![
            Statement::new(named(A), AUTHOR, blank("x")),
            Statement::new(blank("x"), TITLE, StatementLiteral::lang("Faust", "de")),
            Statement::new(blank("y"), TITLE, StatementLiteral::simple("loose")),
        ];
        let result = import_statements(&MemoryStorage::new(), &statements, false).unwrap();
        assert_eq!(result.len(), 2);
        let a = result.named_node().unwrap_err();
        assert!(matches!(a, lugh_core::Error::AmbiguousData { count: 2 }));

        let a = result.named_nodes().pop().unwrap();
        let x = a.get(AUTHOR).node().unwrap();
        assert!(!x.is_named());
        assert_eq!(x.get(TITLE).lang_string().unwrap().language(), "de");
    }

    #[test]
    fn test_literal_priority() {
        let storage = MemoryStorage::new();
        let mut xml = StatementLiteral::lang("<p/>", "de");
        xml.well_formed_xml = true;
        assert_eq!(literal_object(&storage, &xml).unwrap(), Literal::xml("<p/>").into());

        let typed = StatementLiteral::typed("42", "http://www.w3.org/2001/XMLSchema#int");
        let object = literal_object(&storage, &typed).unwrap();
        assert_eq!(object.as_literal().unwrap().datatype(), "http://www.w3.org/2001/XMLSchema#int");

        let string = StatementLiteral::typed("s", vocab::XSD_STRING);
        assert!(literal_object(&storage, &string).unwrap().as_literal().unwrap().is_plain());

        let lang = StatementLiteral::typed("s", vocab::LANG_STRING);
        assert!(literal_object(&storage, &lang).is_err());

        let mut empty_lang = StatementLiteral::simple("s");
        empty_lang.language = Some(String::new());
        assert!(literal_object(&storage, &empty_lang).unwrap().as_literal().unwrap().is_plain());
    }

    #[test]
    fn test_invalid_statement_is_attributed() {
        let statements = vec![
            Statement::new(named(A), TITLE, StatementLiteral::simple("ok")),
            Statement::new(named(A), TITLE, StatementLiteral::typed("x", "not a type")),
        ];
        match import_statements(&MemoryStorage::new(), &statements, false) {
            Err(StorageError::InvalidStatement { index, .. }) => assert_eq!(index, 1),
            other => panic!("unexpected: {:?}", other),
        }

        let about = vec![Statement::new(named(A), vocab::ABOUT, named(B))];
        assert!(matches!(
            import_statements(&MemoryStorage::new(), &about, false),
            Err(StorageError::InvalidStatement { index: 0, .. })
        ));
    }

    #[test]
    fn test_imports_are_independent() {
        let first = import_statements(&MemoryStorage::new(), &book_statements(), false).unwrap().named_node().unwrap();
        let second = import_statements(&MemoryStorage::new(), &book_statements(), false).unwrap().named_node().unwrap();
        assert!(!first.same_node(&second));
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip() {
        let statements = vec![
            Statement::new(named(A), vocab::TYPE, named(BOOK)),
            Statement::new(named(A), AUTHOR, named(B)),
            Statement::new(named(B), TITLE, StatementLiteral::simple("Goethe")),
            Statement::new(named(B), AUTHOR, blank("x")),
            Statement::new(blank("x"), TITLE, StatementLiteral::lang("leer", "de")),
            Statement::new(named(C), TITLE, StatementLiteral::typed("<x/>", vocab::XML_LITERAL)),
        ];
        let imported = import_statements(&MemoryStorage::new(), &statements, false).unwrap();
        let exported = lugh_core::export_result(&imported, Expansion::All);
        assert_eq!(exported.len(), statements.len());

        let original: HashSet<_> = statements
            .iter()
            .filter(|s| !matches!(s.subject, Resource::Blank(_)))
            .cloned()
            .collect();
        let named_part: HashSet<_> = exported
            .iter()
            .filter(|s| {
                !matches!(s.subject, Resource::Blank(_))
                    && !matches!(s.object, Term::Resource(Resource::Blank(_)))
            })
            .cloned()
            .collect();
        assert!(named_part.is_subset(&original));
        assert_eq!(named_part.len(), 4);

        let reimported = import_statements(&MemoryStorage::new(), &exported, false).unwrap();
        assert_eq!(reimported, imported);
    }

    /// Counts what an import asks the factory for
    #[derive(Default)]
    struct CountingStorage {
        nodes: Cell<usize>,
        named_nodes: Cell<usize>,
        literals: Cell<usize>,
        references: Cell<usize>,
    }

    impl Storage for CountingStorage {
        fn create_named_node(&self, _identifier: &str) -> StorageResult<Node> {
            panic!("import must not use the registry");
        }

        fn create_fresh_named_node(&self, identifier: &str) -> StorageResult<Node> {
            self.named_nodes.set(self.named_nodes.get() + 1);
            Ok(Node::named(identifier)?)
        }

        fn create_node(&self) -> Node {
            self.nodes.set(self.nodes.get() + 1);
            Node::new()
        }

        fn create_literal(&self, value: &str, datatype: Option<&str>) -> StorageResult<Literal> {
            self.literals.set(self.literals.get() + 1);
            Ok(Literal::new(value, datatype)?)
        }

        fn create_lang_string(&self, value: &str, language: &str) -> StorageResult<LangString> {
            self.literals.set(self.literals.get() + 1);
            Ok(LangString::new(value, language)?)
        }

        fn create_node_reference(&self, identifier: &str) -> StorageResult<lugh_core::NodeReference> {
            self.references.set(self.references.get() + 1);
            Ok(lugh_core::NodeReference::new(identifier)?)
        }
    }

    #[test]
    fn test_import_goes_through_the_factory() {
        let storage = CountingStorage::default();
        let statements = vec![
            Statement::new(named(A), vocab::TYPE, named(BOOK)),
            Statement::new(named(A), AUTHOR, blank("x")),
            Statement::new(blank("x"), TITLE, StatementLiteral::lang("Faust", "de")),
            Statement::new(named(A), TITLE, StatementLiteral::simple("Faust")),
        ];
        let result = storage.create_result_from(&statements, false).unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(storage.named_nodes.get(), 2);
        assert_eq!(storage.nodes.get(), 1);
        assert_eq!(storage.literals.get(), 2);
        // the undescribed type node collapses to a reference
        assert_eq!(storage.references.get(), 1);
    }

    #[test]
    fn test_import_leaves_registry_alone() {
        let storage = MemoryStorage::new();
        let a = storage.create_named_node(A).unwrap();
        let imported = storage
            .create_result_from(&book_statements(), false)
            .unwrap()
            .named_node()
            .unwrap();
        assert!(!imported.same_node(&a));
        assert!(a.is_empty());
        assert_eq!(storage.named_node_count(), 1);
    }
}
