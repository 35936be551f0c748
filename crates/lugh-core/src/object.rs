//! The closed set of values a relation may point to

use crate::error::Result;
use crate::literal::{LangString, Literal, NodeReference};
use crate::node::{Assumptions, Node};
use crate::vocab;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A value held under a relation of a [`Node`]
///
/// `Node` holds anonymous nodes and `NamedNode` holds nodes carrying an
/// identifier. Conversions through `From<Node>` pick the right variant, and
/// values stored in a node are normalized the same way.
#[derive(Debug, Clone)]
pub enum ObjectType {
    Node(Node),
    NamedNode(Node),
    NodeReference(NodeReference),
    Literal(Literal),
    LangString(LangString),
}

/// Discriminants for narrowing a [`QueryResult`](crate::QueryResult)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Any node, anonymous or named
    Node,
    /// Node with an identifier
    NamedNode,
    /// Identifier-only reference
    NodeReference,
    /// Literal without language tag
    Literal,
    /// Language-tagged string
    LangString,
    /// Named node or node reference
    Identifiable,
    /// Nodes and literals, the values `matches` can be asked of
    Accessible,
}

impl ObjectType {
    /// Create a leaf from a string
    ///
    /// A URI-shaped value becomes a node reference, a non-empty language
    /// yields a language-tagged string, anything else a plain literal.
    pub fn leaf(value: &str, language: Option<&str>) -> Result<Self> {
        if vocab::is_uri(value) {
            return Ok(NodeReference::new(value)?.into());
        }
        match language.filter(|l| !l.is_empty()) {
            Some(language) => Ok(LangString::new(value, language)?.into()),
            None => Ok(Literal::plain(value).into()),
        }
    }

    pub fn as_node(&self) -> Option<&Node> {
        match self {
            Self::Node(node) | Self::NamedNode(node) => Some(node),
            _ => None,
        }
    }

    pub fn into_node(self) -> Option<Node> {
        match self {
            Self::Node(node) | Self::NamedNode(node) => Some(node),
            _ => None,
        }
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Self::Literal(literal) => Some(literal),
            _ => None,
        }
    }

    pub fn as_lang_string(&self) -> Option<&LangString> {
        match self {
            Self::LangString(lang_string) => Some(lang_string),
            _ => None,
        }
    }

    pub fn as_node_reference(&self) -> Option<&NodeReference> {
        match self {
            Self::NodeReference(reference) => Some(reference),
            _ => None,
        }
    }

    /// Identifier of a named node or node reference
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::Node(node) | Self::NamedNode(node) => node.identifier(),
            Self::NodeReference(reference) => Some(reference.identifier()),
            _ => None,
        }
    }

    /// Lexical value of a literal or language-tagged string
    pub fn literal_value(&self) -> Option<&str> {
        match self {
            Self::Literal(literal) => Some(literal.value()),
            Self::LangString(lang_string) => Some(lang_string.value()),
            _ => None,
        }
    }

    /// Whether this value belongs to `kind`
    pub fn is(&self, kind: ObjectKind) -> bool {
        match kind {
            ObjectKind::Node => self.as_node().is_some(),
            ObjectKind::NamedNode => self.as_node().is_some_and(Node::is_named),
            ObjectKind::NodeReference => matches!(self, Self::NodeReference(_)),
            ObjectKind::Literal => matches!(self, Self::Literal(_)),
            ObjectKind::LangString => matches!(self, Self::LangString(_)),
            ObjectKind::Identifiable => self.identifier().is_some(),
            ObjectKind::Accessible => !matches!(self, Self::NodeReference(_)),
        }
    }

    /// Subsumption test against a condition
    ///
    /// Nodes delegate to [`Node::matches`]. Leaves match a condition equal to
    /// themselves; `None` is matched by everything.
    pub fn matches(&self, condition: Option<&ObjectType>) -> bool {
        let Some(condition) = condition else {
            return true;
        };
        self.satisfies(condition, &mut Assumptions::default())
    }

    pub(crate) fn satisfies(&self, condition: &ObjectType, assumed: &mut Assumptions) -> bool {
        match self {
            Self::Node(node) | Self::NamedNode(node) => node.matches_within(condition, assumed),
            _ => self.eq_within(condition, assumed),
        }
    }

    pub(crate) fn eq_within(&self, other: &ObjectType, assumed: &mut Assumptions) -> bool {
        match (self.as_node(), other.as_node()) {
            (Some(left), Some(right)) => left.eq_within(right, assumed),
            (None, None) => match (self, other) {
                (Self::NodeReference(a), Self::NodeReference(b)) => a == b,
                (Self::Literal(a), Self::Literal(b)) => a == b,
                (Self::LangString(a), Self::LangString(b)) => a == b,
                _ => false,
            },
            _ => false,
        }
    }

    /// Variant agrees with whether the node carries an identifier
    pub(crate) fn normalized(self) -> Self {
        match self {
            Self::Node(node) | Self::NamedNode(node) => node.into(),
            other => other,
        }
    }

    /// Hash contribution that does not descend into child nodes
    ///
    /// Anonymous nodes contribute their set of relations, which is the same
    /// for any two nodes that compare equal.
    pub(crate) fn shallow_digest(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        match self {
            Self::Node(node) | Self::NamedNode(node) => match node.identifier() {
                Some(identifier) => (1u8, identifier).hash(&mut hasher),
                None => (0u8, node.relations()).hash(&mut hasher),
            },
            Self::NodeReference(reference) => (2u8, reference).hash(&mut hasher),
            Self::Literal(literal) => (3u8, literal).hash(&mut hasher),
            Self::LangString(lang_string) => (4u8, lang_string).hash(&mut hasher),
        }
        hasher.finish()
    }
}

impl PartialEq for ObjectType {
    fn eq(&self, other: &Self) -> bool {
        self.eq_within(other, &mut Assumptions::default())
    }
}

impl Eq for ObjectType {}

impl Hash for ObjectType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Self::Node(node) | Self::NamedNode(node) => node.hash(state),
            Self::NodeReference(reference) => (2u8, reference).hash(state),
            Self::Literal(literal) => (3u8, literal).hash(state),
            Self::LangString(lang_string) => (4u8, lang_string).hash(state),
        }
    }
}

impl std::fmt::Display for ObjectType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Node(node) | Self::NamedNode(node) => write!(f, "{}", node),
            Self::NodeReference(reference) => write!(f, "{}", reference),
            Self::Literal(literal) => write!(f, "{}", literal),
            Self::LangString(lang_string) => write!(f, "{}", lang_string),
        }
    }
}

impl From<Node> for ObjectType {
    fn from(node: Node) -> Self {
        if node.is_named() {
            Self::NamedNode(node)
        } else {
            Self::Node(node)
        }
    }
}

impl From<&Node> for ObjectType {
    fn from(node: &Node) -> Self {
        node.clone().into()
    }
}

impl From<NodeReference> for ObjectType {
    fn from(reference: NodeReference) -> Self {
        Self::NodeReference(reference)
    }
}

impl From<Literal> for ObjectType {
    fn from(literal: Literal) -> Self {
        Self::Literal(literal)
    }
}

impl From<LangString> for ObjectType {
    fn from(lang_string: LangString) -> Self {
        Self::LangString(lang_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_classification() {
        let reference = ObjectType::leaf("https://w3id.org/i40/aml", Some("de")).unwrap();
        assert!(reference.is(ObjectKind::NodeReference));

        let german = ObjectType::leaf("Das Pferd frißt keinen Gurkensalat.", Some("de")).unwrap();
        assert_eq!(german.as_lang_string().unwrap().language(), "de");

        let plain = ObjectType::leaf("javac.exe", Some("")).unwrap();
        assert_eq!(plain, ObjectType::from(Literal::plain("javac.exe")));
        assert_eq!(ObjectType::leaf("javac.exe", None).unwrap(), plain);
    }

    #[test]
    fn test_variant_follows_identifier() {
        let named = Node::named("http://example.org/a").unwrap();
        assert!(matches!(ObjectType::from(&named), ObjectType::NamedNode(_)));
        assert!(matches!(ObjectType::Node(named).normalized(), ObjectType::NamedNode(_)));
        assert!(matches!(ObjectType::from(Node::new()), ObjectType::Node(_)));
    }

    #[test]
    fn test_kinds() {
        let named: ObjectType = Node::named("http://example.org/a").unwrap().into();
        assert!(named.is(ObjectKind::Node));
        assert!(named.is(ObjectKind::Identifiable));
        assert!(named.is(ObjectKind::Accessible));

        let reference: ObjectType = NodeReference::new("http://example.org/b").unwrap().into();
        assert!(reference.is(ObjectKind::Identifiable));
        assert!(!reference.is(ObjectKind::Accessible));
        assert!(!reference.is(ObjectKind::Node));

        let lang: ObjectType = LangString::new("x", "en").unwrap().into();
        assert!(lang.is(ObjectKind::LangString));
        assert!(!lang.is(ObjectKind::Literal));
    }

    #[test]
    fn test_reference_condition_needs_a_reference() {
        let book = Node::named("http://example.org/Book").unwrap();
        book.put(vocab::VALUE, Literal::plain("x")).unwrap();
        let object: ObjectType = book.into();
        let reference: ObjectType = NodeReference::new("http://example.org/Book").unwrap().into();
        assert!(!object.matches(Some(&reference)));
        assert!(!reference.matches(Some(&object)));
        assert!(reference.matches(Some(&reference.clone())));
        assert!(reference.matches(None));
    }

    #[test]
    fn test_described_child_does_not_match_reference_template() {
        let author = Node::named("http://example.org/b").unwrap();
        author.put("http://example.org/name", Literal::plain("Goethe")).unwrap();
        let book = Node::new();
        book.put("http://example.org/author", author).unwrap();

        let template = Node::new();
        template
            .put("http://example.org/author", NodeReference::new("http://example.org/b").unwrap())
            .unwrap();
        assert!(!book.matches(Some(&template.clone().into())));

        let referencing = Node::new();
        referencing
            .put("http://example.org/author", NodeReference::new("http://example.org/b").unwrap())
            .unwrap();
        assert!(referencing.matches(Some(&template.into())));
    }
}
