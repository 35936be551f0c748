//! Subject–predicate–object statements and graph export

use crate::literal::{LangString, Literal};
use crate::node::Node;
use crate::object::ObjectType;
use crate::result::QueryResult;
use crate::vocab;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use ulid::Ulid;

/// Subject or object resource of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "lowercase")]
pub enum Resource {
    /// Blank node label, meaningful only within one statement set
    Blank(String),
    Named(String),
}

/// Literal object of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatementLiteral {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datatype: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default)]
    pub well_formed_xml: bool,
}

impl StatementLiteral {
    /// A literal without datatype or language
    pub fn simple(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: None,
            language: None,
            well_formed_xml: false,
        }
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        let datatype = datatype.into();
        Self {
            well_formed_xml: datatype == vocab::XML_LITERAL,
            datatype: Some(datatype),
            ..Self::simple(value)
        }
    }

    pub fn lang(value: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            language: Some(language.into()),
            ..Self::simple(value)
        }
    }
}

impl From<&Literal> for StatementLiteral {
    fn from(literal: &Literal) -> Self {
        if literal.is_plain() {
            Self::simple(literal.value())
        } else {
            Self::typed(literal.value(), literal.datatype())
        }
    }
}

impl From<&LangString> for StatementLiteral {
    fn from(lang_string: &LangString) -> Self {
        Self::lang(lang_string.value(), lang_string.language())
    }
}

/// Object position of a statement
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Term {
    Resource(Resource),
    Literal(StatementLiteral),
}

/// A single subject–predicate–object fact
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Statement {
    pub subject: Resource,
    pub predicate: String,
    pub object: Term,
}

impl Statement {
    pub fn new(subject: Resource, predicate: impl Into<String>, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object: object.into(),
        }
    }
}

impl From<Resource> for Term {
    fn from(resource: Resource) -> Self {
        Term::Resource(resource)
    }
}

impl From<StatementLiteral> for Term {
    fn from(literal: StatementLiteral) -> Self {
        Term::Literal(literal)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Blank(label) => write!(f, "_:{}", label),
            Resource::Named(iri) => write!(f, "<{}>", iri),
        }
    }
}

impl fmt::Display for StatementLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.value)?;
        match (&self.language, &self.datatype) {
            (Some(language), _) => write!(f, "@{}", language),
            (None, Some(datatype)) => write!(f, "^^<{}>", datatype),
            (None, None) => Ok(()),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Resource(resource) => write!(f, "{}", resource),
            Term::Literal(literal) => write!(f, "{}", literal),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

/// How far export descends into named nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Expansion {
    /// Describe named nodes at every depth
    All,
    /// Describe the starting node, only reference named descendants
    #[default]
    Current,
    /// Only reference named nodes, the starting one included
    None,
}

impl From<Option<bool>> for Expansion {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Expansion::All,
            None => Expansion::Current,
            Some(false) => Expansion::None,
        }
    }
}

/// Collects the statements describing one or more nodes
///
/// Nodes already described are not described twice, which also stops cycles.
/// Anonymous nodes are always described and get a fresh blank label per
/// writer.
#[derive(Debug, Default)]
pub struct StatementWriter {
    labels: HashMap<u64, String>,
    described: HashSet<u64>,
    seen: HashSet<Statement>,
    statements: Vec<Statement>,
}

impl StatementWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `node` and whatever `expansion` asks for below it
    ///
    /// Returns the resource standing for `node`.
    pub fn write(&mut self, node: &Node, expansion: Expansion) -> Resource {
        let subject = self.resource_for(node);
        let describe = !node.is_named() || expansion != Expansion::None;
        if !describe || !self.described.insert(node.index()) {
            return subject;
        }
        let below = match expansion {
            Expansion::All => Expansion::All,
            _ => Expansion::None,
        };
        for (relation, values) in node.edges() {
            for value in values {
                let object = match &value {
                    ObjectType::Node(child) | ObjectType::NamedNode(child) => {
                        Term::Resource(self.write(child, below))
                    }
                    ObjectType::NodeReference(reference) => {
                        Term::Resource(Resource::Named(reference.identifier().to_string()))
                    }
                    ObjectType::Literal(literal) => Term::Literal(literal.into()),
                    ObjectType::LangString(lang_string) => Term::Literal(lang_string.into()),
                };
                self.push(Statement::new(subject.clone(), relation.clone(), object));
            }
        }
        subject
    }

    fn resource_for(&mut self, node: &Node) -> Resource {
        match node.identifier() {
            Some(identifier) => Resource::Named(identifier.to_string()),
            None => Resource::Blank(
                self.labels
                    .entry(node.index())
                    .or_insert_with(|| format!("b{}", Ulid::new()))
                    .clone(),
            ),
        }
    }

    fn push(&mut self, statement: Statement) {
        if self.seen.insert(statement.clone()) {
            self.statements.push(statement);
        }
    }

    pub fn into_statements(self) -> Vec<Statement> {
        tracing::debug!(statements = self.statements.len(), "exported statements");
        self.statements
    }
}

impl Node {
    /// Statements describing this node
    pub fn to_statements(&self, expansion: impl Into<Expansion>) -> Vec<Statement> {
        let mut writer = StatementWriter::new();
        writer.write(self, expansion.into());
        writer.into_statements()
    }
}

/// Statements describing every node of `result`, sharing blank labels
pub fn export_result(result: &QueryResult, expansion: impl Into<Expansion>) -> Vec<Statement> {
    let expansion = expansion.into();
    let mut writer = StatementWriter::new();
    for node in result.nodes() {
        writer.write(&node, expansion);
    }
    writer.into_statements()
}
