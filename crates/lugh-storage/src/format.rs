//! Turtle and N-Triples reading and writing

use crate::error::{StorageError, StorageResult};
use lugh_core::{Resource, Statement, StatementLiteral, Term};
use rio_api::formatter::TriplesFormatter;
use rio_api::model as rio;
use rio_api::parser::TriplesParser;
use rio_turtle::{NTriplesFormatter, NTriplesParser, TurtleFormatter, TurtleParser};
use serde::{Deserialize, Serialize};
use std::io::{BufReader, Cursor};
use std::path::Path;

/// Text format of a statement document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RdfFormat {
    #[default]
    Turtle,
    NTriples,
}

impl RdfFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "ttl" | "turtle" => Some(RdfFormat::Turtle),
            "nt" | "ntriples" => Some(RdfFormat::NTriples),
            _ => None,
        }
    }

    pub fn read(self, input: &str) -> StorageResult<Vec<Statement>> {
        match self {
            RdfFormat::Turtle => read_turtle(input),
            RdfFormat::NTriples => read_ntriples(input),
        }
    }

    pub fn write(self, statements: &[Statement]) -> StorageResult<String> {
        match self {
            RdfFormat::Turtle => write_turtle(statements),
            RdfFormat::NTriples => write_ntriples(statements),
        }
    }
}

impl std::str::FromStr for RdfFormat {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "turtle" | "ttl" => Ok(RdfFormat::Turtle),
            "ntriples" | "nt" | "n-triples" => Ok(RdfFormat::NTriples),
            other => Err(StorageError::Parse(format!("Unknown format: {}", other))),
        }
    }
}

impl std::fmt::Display for RdfFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RdfFormat::Turtle => write!(f, "turtle"),
            RdfFormat::NTriples => write!(f, "ntriples"),
        }
    }
}

/// Read a file, choosing the format from its extension unless given
pub fn read_path(path: &Path, format: Option<RdfFormat>) -> StorageResult<Vec<Statement>> {
    let format = format.or_else(|| RdfFormat::from_path(path)).unwrap_or_default();
    let input = std::fs::read_to_string(path)?;
    let statements = format.read(&input)?;
    tracing::debug!(path = %path.display(), %format, statements = statements.len(), "read statements");
    Ok(statements)
}

pub fn read_turtle(input: &str) -> StorageResult<Vec<Statement>> {
    let mut reader = BufReader::new(Cursor::new(input));
    let mut parser = TurtleParser::new(&mut reader, None);
    let mut statements = Vec::new();
    parser.parse_all(&mut |t| -> StorageResult<()> {
        statements.push(statement_from(t)?);
        Ok(())
    })?;
    Ok(statements)
}

pub fn read_ntriples(input: &str) -> StorageResult<Vec<Statement>> {
    let mut reader = BufReader::new(Cursor::new(input));
    let mut parser = NTriplesParser::new(&mut reader);
    let mut statements = Vec::new();
    parser.parse_all(&mut |t| -> StorageResult<()> {
        statements.push(statement_from(t)?);
        Ok(())
    })?;
    Ok(statements)
}

pub fn write_ntriples(statements: &[Statement]) -> StorageResult<String> {
    let mut formatter = NTriplesFormatter::new(Vec::new());
    for statement in statements {
        with_rio_triple(statement, |t| formatter.format(t))?;
    }
    into_string(formatter.finish()?)
}

pub fn write_turtle(statements: &[Statement]) -> StorageResult<String> {
    let mut formatter = TurtleFormatter::new(Vec::new());
    for statement in statements {
        with_rio_triple(statement, |t| formatter.format(t))?;
    }
    into_string(formatter.finish()?)
}

fn into_string(output: Vec<u8>) -> StorageResult<String> {
    String::from_utf8(output).map_err(|e| StorageError::Serialize(e.to_string()))
}

fn statement_from(triple: rio::Triple<'_>) -> StorageResult<Statement> {
    let subject = match triple.subject {
        rio::Subject::NamedNode(n) => Resource::Named(n.iri.to_string()),
        rio::Subject::BlankNode(b) => Resource::Blank(b.id.to_string()),
        _ => return Err(StorageError::Parse("Unsupported subject type".to_string())),
    };
    let object = match triple.object {
        rio::Term::NamedNode(n) => Term::Resource(Resource::Named(n.iri.to_string())),
        rio::Term::BlankNode(b) => Term::Resource(Resource::Blank(b.id.to_string())),
        rio::Term::Literal(rio::Literal::Simple { value }) => Term::Literal(StatementLiteral::simple(value)),
        rio::Term::Literal(rio::Literal::LanguageTaggedString { value, language }) => {
            Term::Literal(StatementLiteral::lang(value, language))
        }
        rio::Term::Literal(rio::Literal::Typed { value, datatype }) => {
            Term::Literal(StatementLiteral::typed(value, datatype.iri))
        }
        _ => return Err(StorageError::Parse("Unsupported object type".to_string())),
    };
    Ok(Statement::new(subject, triple.predicate.iri, object))
}

/// Lend `statement` to `f` as a rio triple
fn with_rio_triple<R>(statement: &Statement, f: impl FnOnce(&rio::Triple<'_>) -> R) -> R {
    let subject = match &statement.subject {
        Resource::Named(iri) => rio::Subject::NamedNode(rio::NamedNode { iri: iri.as_str() }),
        Resource::Blank(id) => rio::Subject::BlankNode(rio::BlankNode { id: id.as_str() }),
    };
    let object = match &statement.object {
        Term::Resource(Resource::Named(iri)) => rio::Term::NamedNode(rio::NamedNode { iri: iri.as_str() }),
        Term::Resource(Resource::Blank(id)) => rio::Term::BlankNode(rio::BlankNode { id: id.as_str() }),
        Term::Literal(literal) => rio::Term::Literal(match (&literal.language, &literal.datatype) {
            (Some(language), _) => rio::Literal::LanguageTaggedString {
                value: literal.value.as_str(),
                language: language.as_str(),
            },
            (None, Some(datatype)) => rio::Literal::Typed {
                value: literal.value.as_str(),
                datatype: rio::NamedNode { iri: datatype.as_str() },
            },
            (None, None) => rio::Literal::Simple {
                value: literal.value.as_str(),
            },
        }),
    };
    f(&rio::Triple {
        subject,
        predicate: rio::NamedNode {
            iri: statement.predicate.as_str(),
        },
        object,
    })
}
