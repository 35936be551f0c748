//! Relation-chain paths evaluated against nodes

use crate::error::{Error, Result};
use crate::literal::NodeReference;
use crate::node::Node;
use crate::object::ObjectType;
use crate::result::QueryResult;
use crate::vocab;

/// A path through the graph, encoded as a node
///
/// The sequence entries of the path node are segments. Each segment names the
/// relation to follow under `path:predicate` ([`vocab::ANY_PREDICATE`] for any
/// relation) and may carry `path:condition` templates the reached values
/// must match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphPath {
    node: Node,
}

/// One step of a path: the relation to follow and the templates to match
#[derive(Debug, Clone)]
struct Segment {
    predicate: String,
    conditions: Vec<ObjectType>,
}

impl GraphPath {
    pub fn builder() -> GraphPathBuilder {
        GraphPathBuilder::default()
    }

    /// Wrap a node already holding a path
    pub fn from_node(node: Node) -> Self {
        Self { node }
    }

    pub fn as_node(&self) -> &Node {
        &self.node
    }

    pub fn into_node(self) -> Node {
        self.node
    }

    /// Parse a textual path such as `<http://ex.org/a> / * / urn:x:b`
    ///
    /// Segments are separated by `/` outside angle brackets; `*` stands for
    /// any relation. Brackets may be left out for identifiers without `/`.
    pub fn parse(text: &str) -> Result<Self> {
        let mut builder = Self::builder();
        for segment in split_segments(text) {
            builder = match segment.trim() {
                "" => return Err(Error::InvalidIdentifier(text.to_string())),
                "*" => builder.any(),
                segment => {
                    let relation = segment
                        .strip_prefix('<')
                        .and_then(|s| s.strip_suffix('>'))
                        .unwrap_or(segment);
                    builder.step(relation)
                }
            };
        }
        builder.build()
    }

    fn segments(&self) -> Result<Vec<Segment>> {
        let mut segments = Vec::new();
        for entry in self.node.get_enumerated() {
            for segment in entry.nodes() {
                segments.push(Segment {
                    predicate: segment.get(vocab::PATH_PREDICATE).identifier()?,
                    conditions: segment.get(vocab::PATH_CONDITION).into_iter().collect(),
                });
            }
        }
        Ok(segments)
    }

    /// Everything reachable from `start` along this path
    ///
    /// Each segment replaces the current result by the union of the matching
    /// values of every node in it; leaves reached before the last segment
    /// drop out.
    pub fn apply(&self, start: &QueryResult) -> Result<QueryResult> {
        let segments = self.segments()?;
        let mut current = start.clone();
        for segment in &segments {
            let mut next = QueryResult::new();
            for node in current.nodes() {
                next.extend(node.get_where(&[segment.predicate.as_str()], &segment.conditions));
            }
            current = next;
        }
        tracing::debug!(
            segments = segments.len(),
            start = start.len(),
            found = current.len(),
            "applied graph path"
        );
        Ok(current)
    }
}

fn split_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut bracketed = false;
    let mut start = 0;
    for (i, c) in text.char_indices() {
        match c {
            '<' => bracketed = true,
            '>' => bracketed = false,
            '/' if !bracketed => {
                segments.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    segments.push(&text[start..]);
    segments
}

impl std::fmt::Display for GraphPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let Ok(segments) = self.segments() else {
            return write!(f, "(malformed path)");
        };
        let rendered: Vec<String> = segments
            .iter()
            .map(|s| {
                let step = if s.predicate == vocab::ANY_PREDICATE {
                    "*".to_string()
                } else {
                    format!("<{}>", s.predicate)
                };
                match s.conditions.len() {
                    0 => step,
                    n => format!("{}[{}]", step, n),
                }
            })
            .collect();
        write!(f, "{}", rendered.join(" / "))
    }
}

/// Builds a [`GraphPath`] step by step
#[derive(Debug, Default)]
pub struct GraphPathBuilder {
    segments: Vec<Segment>,
}

impl GraphPathBuilder {
    /// Follow `relation`
    pub fn step(self, relation: impl Into<String>) -> Self {
        self.step_where(relation, Vec::<ObjectType>::new())
    }

    /// Follow any relation
    pub fn any(self) -> Self {
        self.step(vocab::ANY_PREDICATE)
    }

    /// Follow `relation`, keeping only values that match every condition
    pub fn step_where<I, T>(mut self, relation: impl Into<String>, conditions: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectType>,
    {
        self.segments.push(Segment {
            predicate: relation.into(),
            conditions: conditions.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn build(self) -> Result<GraphPath> {
        let node = Node::with_type(vocab::GRAPH_PATH)?;
        for segment in self.segments {
            let step = Node::new();
            step.put(vocab::PATH_PREDICATE, NodeReference::new(segment.predicate)?)?;
            step.put_all(vocab::PATH_CONDITION, segment.conditions)?;
            node.add(step)?;
        }
        Ok(GraphPath { node })
    }
}

impl Node {
    /// Everything reachable from this node along `path`
    pub fn find(&self, path: &GraphPath) -> Result<QueryResult> {
        path.apply(&QueryResult::from(self.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::Literal;

    const HAS_PART: &str = "http://example.org/hasPart";
    const TITLE: &str = "http://example.org/title";
    const CHAPTER: &str = "http://example.org/Chapter";

    fn chapter(title: &str) -> Node {
        let node = Node::with_type(CHAPTER).unwrap();
        node.put(TITLE, Literal::plain(title)).unwrap();
        node
    }

    fn book() -> Node {
        let book = Node::named("http://example.org/book").unwrap();
        let volume = Node::new();
        volume.put(HAS_PART, chapter("One")).unwrap();
        volume.put(HAS_PART, chapter("Two")).unwrap();
        volume.put(TITLE, Literal::plain("Volume")).unwrap();
        book.put(HAS_PART, volume).unwrap();
        book
    }

    #[test]
    fn test_follow_relation_chain() {
        let path = GraphPath::builder().step(HAS_PART).step(HAS_PART).step(TITLE).build().unwrap();
        let titles = book().find(&path).unwrap();
        assert_eq!(titles.strings_joined(",", false), "One,Two");
    }

    #[test]
    fn test_any_predicate() {
        let path = GraphPath::builder().step(HAS_PART).any().build().unwrap();
        let found = book().find(&path).unwrap();
        // two chapters and the volume title
        assert_eq!(found.len(), 3);
        assert_eq!(found.nodes().len(), 2);
    }

    #[test]
    fn test_conditions_filter() {
        let wanted = Node::new();
        wanted.put(TITLE, Literal::plain("Two")).unwrap();
        let path = GraphPath::builder()
            .step(HAS_PART)
            .step_where(HAS_PART, [wanted])
            .build()
            .unwrap();
        let found = book().find(&path).unwrap();
        assert_eq!(found.node().unwrap().get(TITLE).string().unwrap(), "Two");
    }

    #[test]
    fn test_leaves_drop_out_between_segments() {
        let path = GraphPath::builder().step(HAS_PART).step(TITLE).step(TITLE).build().unwrap();
        assert!(book().find(&path).unwrap().is_empty());
    }

    #[test]
    fn test_empty_path_returns_start() {
        let path = GraphPath::builder().build().unwrap();
        let start = book();
        assert!(start.find(&path).unwrap().node().unwrap().same_node(&start));
    }

    #[test]
    fn test_parse() {
        let path = GraphPath::parse("<http://example.org/hasPart>/ * / <http://example.org/title>").unwrap();
        assert_eq!(
            path.to_string(),
            "<http://example.org/hasPart> / * / <http://example.org/title>"
        );
        assert_eq!(GraphPath::parse(&path.to_string()).unwrap(), path);
        assert_eq!(book().find(&path).unwrap().strings(false).len(), 2);

        let bare = GraphPath::parse("urn:x:a / *").unwrap();
        assert_eq!(bare.to_string(), "<urn:x:a> / *");

        assert!(GraphPath::parse("http://example.org/a //").is_err());
        assert!(GraphPath::parse("not a relation").is_err());
    }

    #[test]
    fn test_path_is_a_node() {
        let path = GraphPath::builder().step(HAS_PART).build().unwrap();
        let node = path.clone().into_node();
        assert!(node.has_type(vocab::GRAPH_PATH));
        assert_eq!(GraphPath::from_node(node), path);

        let malformed = Node::new();
        malformed.add(Node::new()).unwrap();
        assert_eq!(
            GraphPath::from_node(malformed).apply(&QueryResult::new()),
            Err(Error::NoData)
        );
    }
}
