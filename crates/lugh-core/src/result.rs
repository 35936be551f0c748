//! Query results: a deduplicating set of values with narrowing accessors

use crate::error::{Error, Result};
use crate::literal::{LangString, Literal, NodeReference};
use crate::node::Node;
use crate::object::{ObjectKind, ObjectType};
use std::collections::{BTreeSet, HashSet};

/// The values returned from a lookup
///
/// Identical values are held once. Singular accessors come in three flavours:
/// checked ones return [`Error::NoData`] or [`Error::AmbiguousData`],
/// `*_expectable` ones panic and are meant for callers that already checked
/// `is_unique*`, and `*_or` ones fall back to a default.
#[derive(Debug, Clone, Default)]
pub struct QueryResult {
    objects: Vec<ObjectType>,
    /// Digests of every held value except anonymous nodes
    digests: HashSet<u64>,
}

/// Digest that stays valid while the value is held
///
/// Anonymous nodes compare by content, which may change after insertion.
fn stable_digest(object: &ObjectType) -> Option<u64> {
    match object.as_node() {
        Some(node) if !node.is_named() => None,
        _ => Some(object.shallow_digest()),
    }
}

impl QueryResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `object` unless an equal value is already present
    pub fn insert(&mut self, object: ObjectType) -> bool {
        let duplicate = match stable_digest(&object) {
            Some(digest) => !self.digests.insert(digest) && self.objects.contains(&object),
            None => self.objects.contains(&object),
        };
        if duplicate {
            return false;
        }
        self.objects.push(object);
        true
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn contains(&self, object: &ObjectType) -> bool {
        match stable_digest(object) {
            Some(digest) if !self.digests.contains(&digest) => false,
            _ => self.objects.contains(object),
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObjectType> {
        self.objects.iter()
    }

    // ---- counting ----

    /// Count values holding every kind in `kinds`, stopping at `limit`
    pub fn count_until(&self, limit: usize, kinds: &[ObjectKind]) -> usize {
        self.objects
            .iter()
            .filter(|o| kinds.iter().all(|k| o.is(*k)))
            .take(limit)
            .count()
    }

    pub fn is_any(&self) -> bool {
        !self.is_empty()
    }

    pub fn is_any_of(&self, kind: ObjectKind) -> bool {
        self.count_until(1, &[kind]) > 0
    }

    pub fn is_unique(&self) -> bool {
        self.len() == 1
    }

    /// Exactly one value, and it is of `kind`
    pub fn is_unique_of(&self, kind: ObjectKind) -> bool {
        self.is_unique() && self.is_any_of(kind)
    }

    pub fn is_any_node(&self) -> bool {
        self.is_any_of(ObjectKind::Node)
    }

    pub fn is_unique_node(&self) -> bool {
        self.is_unique_of(ObjectKind::Node)
    }

    pub fn is_any_identifiable_node(&self) -> bool {
        self.is_any_of(ObjectKind::Identifiable)
    }

    pub fn is_unique_identifiable_node(&self) -> bool {
        self.is_unique_of(ObjectKind::Identifiable)
    }

    pub fn is_any_literal(&self) -> bool {
        self.is_any_of(ObjectKind::Literal)
    }

    pub fn is_unique_literal(&self) -> bool {
        self.is_unique_of(ObjectKind::Literal)
    }

    // ---- projections ----

    /// Values holding every kind in `kinds`
    pub fn subset(&self, kinds: &[ObjectKind]) -> Vec<ObjectType> {
        self.objects
            .iter()
            .filter(|o| kinds.iter().all(|k| o.is(*k)))
            .cloned()
            .collect()
    }

    pub fn nodes(&self) -> Vec<Node> {
        self.objects.iter().filter_map(|o| o.as_node().cloned()).collect()
    }

    pub fn named_nodes(&self) -> Vec<Node> {
        self.nodes().into_iter().filter(Node::is_named).collect()
    }

    pub fn identifiable_nodes(&self) -> Vec<ObjectType> {
        self.subset(&[ObjectKind::Identifiable])
    }

    pub fn accessible_objects(&self) -> Vec<ObjectType> {
        self.subset(&[ObjectKind::Accessible])
    }

    pub fn literals(&self) -> Vec<Literal> {
        self.objects.iter().filter_map(|o| o.as_literal().cloned()).collect()
    }

    pub fn lang_strings(&self) -> Vec<LangString> {
        self.objects.iter().filter_map(|o| o.as_lang_string().cloned()).collect()
    }

    pub fn node_references(&self) -> Vec<NodeReference> {
        self.objects
            .iter()
            .filter_map(|o| o.as_node_reference().cloned())
            .collect()
    }

    /// Lexical values of all literals, with reference identifiers if asked for
    pub fn strings(&self, include_references: bool) -> BTreeSet<String> {
        self.objects
            .iter()
            .filter_map(|o| match o {
                ObjectType::NodeReference(r) if include_references => Some(r.identifier()),
                other => other.literal_value(),
            })
            .map(str::to_string)
            .collect()
    }

    /// [`strings`](Self::strings), joined by `separator`
    pub fn strings_joined(&self, separator: &str, include_references: bool) -> String {
        self.strings(include_references)
            .into_iter()
            .collect::<Vec<_>>()
            .join(separator)
    }

    // ---- singular access ----

    /// The only value, which must hold every kind in `kinds`
    ///
    /// Returns [`Error::NoData`] when no value qualifies and
    /// [`Error::AmbiguousData`] when the result holds more than one value.
    pub fn singleton(&self, kinds: &[ObjectKind]) -> Result<ObjectType> {
        let mut matching = self.objects.iter().filter(|o| kinds.iter().all(|k| o.is(*k)));
        let Some(first) = matching.next() else {
            return Err(Error::NoData);
        };
        if self.len() > 1 {
            return Err(Error::AmbiguousData { count: self.len() });
        }
        Ok(first.clone())
    }

    /// # Panics
    ///
    /// Panics with `no such element` when no value qualifies, and with
    /// `too many elements` when the result holds more than one value.
    #[track_caller]
    pub fn singleton_expectable(&self, kinds: &[ObjectKind]) -> ObjectType {
        match self.singleton(kinds) {
            Ok(object) => object,
            Err(Error::AmbiguousData { .. }) => panic!("too many elements"),
            Err(_) => panic!("no such element"),
        }
    }

    /// The only value, of any kind
    pub fn value(&self) -> Result<ObjectType> {
        self.singleton(&[])
    }

    /// # Panics
    ///
    /// See [`singleton_expectable`](Self::singleton_expectable).
    #[track_caller]
    pub fn expectable(&self) -> ObjectType {
        self.singleton_expectable(&[])
    }

    pub fn node(&self) -> Result<Node> {
        self.singleton(&[ObjectKind::Node]).map(expect_node)
    }

    /// # Panics
    ///
    /// See [`singleton_expectable`](Self::singleton_expectable).
    #[track_caller]
    pub fn node_expectable(&self) -> Node {
        expect_node(self.singleton_expectable(&[ObjectKind::Node]))
    }

    pub fn node_or(&self, default: Node) -> Node {
        self.node().unwrap_or(default)
    }

    pub fn named_node(&self) -> Result<Node> {
        self.singleton(&[ObjectKind::NamedNode]).map(expect_node)
    }

    /// # Panics
    ///
    /// See [`singleton_expectable`](Self::singleton_expectable).
    #[track_caller]
    pub fn named_node_expectable(&self) -> Node {
        expect_node(self.singleton_expectable(&[ObjectKind::NamedNode]))
    }

    /// The only named node or node reference
    pub fn identifiable_node(&self) -> Result<ObjectType> {
        self.singleton(&[ObjectKind::Identifiable])
    }

    /// # Panics
    ///
    /// See [`singleton_expectable`](Self::singleton_expectable).
    #[track_caller]
    pub fn identifiable_node_expectable(&self) -> ObjectType {
        self.singleton_expectable(&[ObjectKind::Identifiable])
    }

    /// Identifier of the only named node or node reference
    pub fn identifier(&self) -> Result<String> {
        let object = self.identifiable_node()?;
        object.identifier().map(str::to_string).ok_or(Error::NoData)
    }

    pub fn identifier_or(&self, default: &str) -> String {
        self.identifier().unwrap_or_else(|_| default.to_string())
    }

    pub fn literal(&self) -> Result<Literal> {
        let object = self.singleton(&[ObjectKind::Literal])?;
        object.as_literal().cloned().ok_or(Error::NoData)
    }

    /// # Panics
    ///
    /// See [`singleton_expectable`](Self::singleton_expectable).
    #[track_caller]
    pub fn literal_expectable(&self) -> Literal {
        match self.singleton_expectable(&[ObjectKind::Literal]) {
            ObjectType::Literal(literal) => literal,
            _ => panic!("no such element"),
        }
    }

    pub fn lang_string(&self) -> Result<LangString> {
        let object = self.singleton(&[ObjectKind::LangString])?;
        object.as_lang_string().cloned().ok_or(Error::NoData)
    }

    pub fn node_reference(&self) -> Result<NodeReference> {
        let object = self.singleton(&[ObjectKind::NodeReference])?;
        object.as_node_reference().cloned().ok_or(Error::NoData)
    }

    /// Lexical value of the only literal or language-tagged string
    pub fn string(&self) -> Result<String> {
        let object = self.value()?;
        object.literal_value().map(str::to_string).ok_or(Error::NoData)
    }

    pub fn string_or(&self, default: &str) -> String {
        self.string().unwrap_or_else(|_| default.to_string())
    }
}

/// Unwrap a value already known to be a node
#[track_caller]
fn expect_node(object: ObjectType) -> Node {
    match object.into_node() {
        Some(node) => node,
        None => panic!("no such element"),
    }
}

impl PartialEq for QueryResult {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.objects.iter().all(|o| other.contains(o))
    }
}

impl Eq for QueryResult {}

impl FromIterator<ObjectType> for QueryResult {
    fn from_iter<I: IntoIterator<Item = ObjectType>>(iter: I) -> Self {
        let mut result = Self::new();
        result.extend(iter);
        result
    }
}

impl Extend<ObjectType> for QueryResult {
    fn extend<I: IntoIterator<Item = ObjectType>>(&mut self, iter: I) {
        for object in iter {
            self.insert(object);
        }
    }
}

impl IntoIterator for QueryResult {
    type Item = ObjectType;
    type IntoIter = std::vec::IntoIter<ObjectType>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = &'a ObjectType;
    type IntoIter = std::slice::Iter<'a, ObjectType>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}

impl From<Node> for QueryResult {
    fn from(node: Node) -> Self {
        let mut result = Self::new();
        result.insert(node.into());
        result
    }
}

impl From<Vec<ObjectType>> for QueryResult {
    fn from(objects: Vec<ObjectType>) -> Self {
        objects.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(value: &str) -> ObjectType {
        Literal::plain(value).into()
    }

    fn reference(identifier: &str) -> ObjectType {
        NodeReference::new(identifier).unwrap().into()
    }

    #[test]
    fn test_deduplicates() {
        let mut result = QueryResult::new();
        assert!(result.insert(lit("a")));
        assert!(!result.insert(lit("a")));

        let a = Node::new();
        a.put("http://example.org/p", lit("x")).unwrap();
        let b = Node::new();
        b.put("http://example.org/p", lit("x")).unwrap();
        result.extend([a.into(), b.into()]);
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn test_large_result_deduplicates() {
        let values = (0..5000).map(|i| lit(&format!("v{}", i % 2500)));
        let named = (0..1000).map(|i| {
            Node::named(&format!("http://example.org/n{}", i % 500)).unwrap().into()
        });
        let result: QueryResult = values.chain(named).collect();
        assert_eq!(result.len(), 3000);
        assert!(result.contains(&lit("v2499")));
        assert!(!result.contains(&lit("v2500")));
        assert!(!result.contains(&reference("http://example.org/n1")));

        // anonymous nodes still compare by their current content
        let mut result = result;
        let empty = Node::new();
        assert!(result.insert(empty.clone().into()));
        empty.put("http://example.org/p", lit("x")).unwrap();
        assert!(result.insert(Node::new().into()));
        assert!(result.contains(&empty.into()));
        assert_eq!(result.len(), 3002);
    }

    #[test]
    fn test_checked_singletons() {
        assert_eq!(QueryResult::new().node(), Err(Error::NoData));

        let result: QueryResult = vec![lit("a"), lit("b")].into();
        assert_eq!(result.literal(), Err(Error::AmbiguousData { count: 2 }));

        let result: QueryResult = vec![lit("a"), reference("http://example.org/r")].into();
        assert_eq!(result.node(), Err(Error::NoData));
        assert!(matches!(result.literal(), Err(Error::AmbiguousData { count: 2 })));

        let result: QueryResult = vec![lit("a")].into();
        assert_eq!(result.literal().unwrap(), Literal::plain("a"));
        assert_eq!(result.string().unwrap(), "a");
    }

    #[test]
    fn test_subset_requires_every_kind() {
        let named = Node::named("http://example.org/n").unwrap();
        let result: QueryResult = vec![
            named.into(),
            Node::new().into(),
            reference("http://example.org/r"),
        ]
        .into();
        assert_eq!(result.subset(&[ObjectKind::Identifiable]).len(), 2);
        assert_eq!(result.subset(&[ObjectKind::Node]).len(), 2);
        assert_eq!(result.subset(&[ObjectKind::Node, ObjectKind::Identifiable]).len(), 1);
        assert_eq!(result.named_nodes().len(), 1);
        assert_eq!(result.identifiable_nodes().len(), 2);
        assert_eq!(result.accessible_objects().len(), 2);
    }

    #[test]
    fn test_strings() {
        let result: QueryResult = vec![
            lit("b"),
            LangString::new("a", "en").unwrap().into(),
            reference("http://example.org/r"),
            Node::named("http://example.org/n").unwrap().into(),
        ]
        .into();
        assert_eq!(result.strings(false).len(), 2);
        assert!(result.strings(true).contains("http://example.org/r"));
        assert!(!result.strings(true).contains("http://example.org/n"));
        assert_eq!(result.strings_joined(", ", false), "a, b");
    }

    #[test]
    fn test_counting() {
        let result: QueryResult = vec![lit("a"), lit("b"), lit("c")].into();
        assert_eq!(result.count_until(2, &[ObjectKind::Literal]), 2);
        assert_eq!(result.count_until(10, &[ObjectKind::Node]), 0);
        assert!(result.is_any_literal());
        assert!(!result.is_unique_literal());
        assert!(!result.is_any_node());

        let single: QueryResult = vec![reference("http://example.org/r")].into();
        assert!(single.is_unique_identifiable_node());
        assert!(!single.is_unique_node());
        assert_eq!(single.identifier().unwrap(), "http://example.org/r");
    }

    #[test]
    fn test_fallbacks() {
        let empty = QueryResult::new();
        let default = Node::new();
        assert!(empty.node_or(default.clone()).same_node(&default));
        assert_eq!(empty.string_or("none"), "none");
        assert_eq!(empty.identifier_or("urn:x:y"), "urn:x:y");
    }

    #[test]
    fn test_expectable() {
        let node = Node::new();
        let result = QueryResult::from(node.clone());
        assert!(result.node_expectable().same_node(&node));
        assert_eq!(result.expectable(), ObjectType::from(node));
    }

    #[test]
    #[should_panic(expected = "no such element")]
    fn test_expectable_panics_when_empty() {
        QueryResult::new().identifiable_node_expectable();
    }

    #[test]
    #[should_panic(expected = "too many elements")]
    fn test_expectable_panics_when_ambiguous() {
        let result: QueryResult = vec![lit("a"), lit("b")].into();
        result.literal_expectable();
    }
}
