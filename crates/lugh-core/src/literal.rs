//! Leaf values: literals, language-tagged strings and node references

use crate::error::{Error, Result};
use crate::vocab;
use serde::{Deserialize, Serialize};

/// A typed literal value. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Literal {
    value: String,
    datatype: String,
}

impl Literal {
    /// Create a literal of the given datatype
    ///
    /// An absent or empty datatype, as well as `xsd:string`, yields a plain
    /// literal. `rdf:langString` is rejected; use [`LangString`] for that.
    pub fn new(value: impl Into<String>, datatype: Option<&str>) -> Result<Self> {
        let datatype = match datatype.filter(|d| !vocab::is_plain_type(Some(d))) {
            None => vocab::PLAIN_LITERAL,
            Some(d) if d == vocab::LANG_STRING || !vocab::is_uri(d) => {
                return Err(Error::InvalidLiteralType(d.to_string()))
            }
            Some(d) => d,
        };
        Ok(Self {
            value: value.into(),
            datatype: datatype.to_string(),
        })
    }

    /// Create a plain literal
    pub fn plain(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: vocab::PLAIN_LITERAL.to_string(),
        }
    }

    /// Create an XML literal
    pub fn xml(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            datatype: vocab::XML_LITERAL.to_string(),
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn datatype(&self) -> &str {
        &self.datatype
    }

    pub fn is_plain(&self) -> bool {
        self.datatype == vocab::PLAIN_LITERAL
    }
}

impl std::fmt::Display for Literal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_plain() {
            write!(f, "\"{}\"", self.value)
        } else {
            write!(f, "\"{}\"^^<{}>", self.value, self.datatype)
        }
    }
}

/// A string with a language tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LangString {
    value: String,
    language: String,
}

impl LangString {
    /// Create a language-tagged string. The tag must not be empty.
    pub fn new(value: impl Into<String>, language: impl Into<String>) -> Result<Self> {
        let language = language.into();
        if !is_language_tag(&language) {
            return Err(Error::InvalidLanguage(language));
        }
        Ok(Self {
            value: value.into(),
            language,
        })
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn datatype(&self) -> &str {
        vocab::LANG_STRING
    }
}

impl std::fmt::Display for LangString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"@{}", self.value, self.language)
    }
}

/// BCP 47 shape: letters first, then `-`-separated alphanumeric subtags
fn is_language_tag(tag: &str) -> bool {
    let mut subtags = tag.split('-');
    let primary_ok = subtags
        .next()
        .is_some_and(|s| !s.is_empty() && s.len() <= 8 && s.chars().all(|c| c.is_ascii_alphabetic()));
    primary_ok
        && subtags.all(|s| !s.is_empty() && s.len() <= 8 && s.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// An identifier-only pointer to a resource. Carries no edges.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeReference {
    identifier: String,
}

impl NodeReference {
    pub fn new(identifier: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        if !vocab::is_uri(&identifier) {
            return Err(Error::InvalidIdentifier(identifier));
        }
        Ok(Self { identifier })
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }
}

impl std::fmt::Display for NodeReference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}>", self.identifier)
    }
}
