//! Output formatting utilities

use std::collections::HashSet;

use clap::ValueEnum;
use lugh_core::{ObjectType, QueryResult};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => anyhow::bail!("Unknown output format: {}. Expected text or json", other),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Pretty JSON for any serializable value
pub fn format_output<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "null".to_string())
}

/// Render every object of a result
pub fn format_result(result: &QueryResult, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => {
            let objects: Vec<Value> = result
                .iter()
                .map(|object| object_json(object, &mut HashSet::new()))
                .collect();
            format_output(&objects)
        }
        OutputFormat::Text => result
            .iter()
            .map(|object| object.to_string().trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

/// JSON-LD-like tree of an object
///
/// A node met again below itself is cut to its `@id`, or to `@cycle` when it
/// has no identifier.
pub fn object_json(object: &ObjectType, on_path: &mut HashSet<u64>) -> Value {
    match object {
        ObjectType::Node(node) | ObjectType::NamedNode(node) => {
            if on_path.contains(&node.index()) {
                return match node.identifier() {
                    Some(identifier) => json!({ "@id": identifier }),
                    None => json!({ "@cycle": node.index() }),
                };
            }
            on_path.insert(node.index());
            let mut map = Map::new();
            if let Some(identifier) = node.identifier() {
                map.insert("@id".to_string(), json!(identifier));
            }
            for (relation, values) in node.edges() {
                let values: Vec<Value> = values.iter().map(|v| object_json(v, on_path)).collect();
                map.insert(relation, Value::Array(values));
            }
            on_path.remove(&node.index());
            Value::Object(map)
        }
        ObjectType::NodeReference(reference) => json!({ "@id": reference.identifier() }),
        ObjectType::Literal(literal) if literal.is_plain() => json!({ "@value": literal.value() }),
        ObjectType::Literal(literal) => json!({
            "@value": literal.value(),
            "@type": literal.datatype(),
        }),
        ObjectType::LangString(lang_string) => json!({
            "@value": lang_string.value(),
            "@language": lang_string.language(),
        }),
    }
}
