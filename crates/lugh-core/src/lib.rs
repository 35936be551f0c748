//! Lugh Core - In-memory linked data graph
//!
//! This crate provides the graph data model: nodes holding relations to other
//! nodes, references and literals, list emulation over numbered relations,
//! subsumption queries, graph paths, and export to subject–predicate–object
//! statements.

pub mod error;
pub mod graph_path;
pub mod literal;
pub mod node;
pub mod object;
pub mod result;
pub mod statement;
pub mod vocab;

pub use error::{Error, Result};
pub use graph_path::{GraphPath, GraphPathBuilder};
pub use literal::{LangString, Literal, NodeReference};
pub use node::{Node, WeakNode};
pub use object::{ObjectKind, ObjectType};
pub use result::QueryResult;
pub use statement::{export_result, Expansion, Resource, Statement, StatementLiteral, StatementWriter, Term};
