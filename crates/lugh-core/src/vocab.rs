//! Reserved identifiers and the checks built on them
//!
//! Every place that needs to know whether a relation is the identity relation,
//! whether it encodes a sequence position, or whether a datatype is one of the
//! built-in literal types goes through this module.

/// RDF namespace
pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

/// XML Schema namespace
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";

/// Identity relation. Subjects are established by constructing a named node,
/// never by putting values under this relation.
pub const ABOUT: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#about";

/// Type relation
pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// Generic value relation
pub const VALUE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#value";

/// Prefix of the sequence-number relations `rdf:_1`, `rdf:_2`, …
pub const SEQ_NO_PREFIX: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#_";

/// Plain literal type
pub const PLAIN_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#PlainLiteral";

/// HTML literal type
pub const HTML: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#HTML";

/// XML literal type
pub const XML_LITERAL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#XMLLiteral";

/// Language-tagged string type
pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// `xsd:string`, imported as a plain literal
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Wildcard relation: matches every relation of a node
pub const ANY_PREDICATE: &str = "urn:lugh:graph-path:any-predicate";

/// Type of graph-path nodes
pub const GRAPH_PATH: &str = "urn:lugh:graph-path:GraphPath";

/// Relation followed by a graph-path segment
pub const PATH_PREDICATE: &str = "urn:lugh:graph-path:predicate";

/// Template a graph-path segment's targets must match
pub const PATH_CONDITION: &str = "urn:lugh:graph-path:condition";

/// First index of the emulated list
pub const FIRST_INDEX: u64 = 1;

/// Whether `relation` is the reserved identity relation
pub fn is_identity_relation(relation: &str) -> bool {
    relation == ABOUT
}

/// Returns the sequence relation for `index`
pub fn sequence_relation(index: u64) -> String {
    format!("{}{}", SEQ_NO_PREFIX, index)
}

/// Returns the index encoded by a sequence relation, if `relation` is one
///
/// Only plain decimal numbers without sign or leading zero qualify, so that
/// every index has exactly one relation spelling.
pub fn sequence_number_of(relation: &str) -> Option<u64> {
    let digits = relation.strip_prefix(SEQ_NO_PREFIX)?;
    if digits.is_empty()
        || digits.starts_with('0')
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    digits.parse().ok().filter(|index| *index >= FIRST_INDEX)
}

/// Whether the relation encodes a sequence position
pub fn is_sequence_relation(relation: &str) -> bool {
    sequence_number_of(relation).is_some()
}

/// Whether `identifier` starts with a URI scheme (`http:`, `urn:`, …)
pub fn is_uri(identifier: &str) -> bool {
    let Some((scheme, rest)) = identifier.split_once(':') else {
        return false;
    };
    let mut chars = scheme.chars();
    let starts_with_letter = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    starts_with_letter
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        && !rest.is_empty()
        && !identifier.chars().any(char::is_whitespace)
}

/// Whether `datatype` names a plain literal (absent, empty, plain or `xsd:string`)
pub fn is_plain_type(datatype: Option<&str>) -> bool {
    match datatype {
        None => true,
        Some(datatype) => datatype.is_empty() || datatype == PLAIN_LITERAL || datatype == XSD_STRING,
    }
}

/// Whether `datatype` is one of the built-in non-object literal types
pub fn is_builtin_literal_type(datatype: &str) -> bool {
    matches!(datatype, PLAIN_LITERAL | HTML | XML_LITERAL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_relation_roundtrip() {
        assert_eq!(
            sequence_relation(3),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#_3"
        );
        assert_eq!(sequence_number_of(&sequence_relation(42)), Some(42));
    }

    #[test]
    fn test_sequence_number_rejects_malformed() {
        assert_eq!(sequence_number_of(&format!("{}0", SEQ_NO_PREFIX)), None);
        assert_eq!(sequence_number_of(&format!("{}01", SEQ_NO_PREFIX)), None);
        assert_eq!(sequence_number_of(&format!("{}-1", SEQ_NO_PREFIX)), None);
        assert_eq!(sequence_number_of(SEQ_NO_PREFIX), None);
        assert_eq!(sequence_number_of(TYPE), None);
    }

    #[test]
    fn test_is_uri() {
        assert!(is_uri("http://www.kitodo.org/"));
        assert!(is_uri("https://localhost/data/namedNode1"));
        assert!(is_uri("urn:nbn:de:1234567-76543210"));
        assert!(!is_uri(""));
        assert!(!is_uri("Das Pferd frißt keinen Gurkensalat."));
        assert!(!is_uri("javac.exe"));
        assert!(!is_uri("1http://example.org/"));
    }

    #[test]
    fn test_plain_types() {
        assert!(is_plain_type(None));
        assert!(is_plain_type(Some("")));
        assert!(is_plain_type(Some(XSD_STRING)));
        assert!(is_plain_type(Some(PLAIN_LITERAL)));
        assert!(!is_plain_type(Some(HTML)));
        assert!(is_builtin_literal_type(XML_LITERAL));
        assert!(!is_builtin_literal_type(XSD_STRING));
    }
}
