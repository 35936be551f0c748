//! The graph container: a relation → values multimap with list emulation

use crate::error::{Error, Result};
use crate::literal::{Literal, NodeReference};
use crate::object::{ObjectKind, ObjectType};
use crate::result::QueryResult;
use crate::vocab::{self, FIRST_INDEX};
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

/// Node index pairs assumed equal (or matching) while a comparison is in progress
pub(crate) type Assumptions = HashSet<(u64, u64)>;

type Edges = BTreeMap<String, Vec<ObjectType>>;

static NEXT_INDEX: AtomicU64 = AtomicU64::new(1);

struct NodeData {
    index: u64,
    identifier: Option<String>,
    edges: RefCell<Edges>,
}

/// A graph vertex, anonymous or named
///
/// Cloning a `Node` yields another handle to the same vertex. Anonymous nodes
/// compare structurally (cycles included); named nodes compare by identifier.
/// A relation never maps to an empty collection.
///
/// Nodes are single-threaded: mutation goes through shared handles, so a
/// caller holding a node must not mutate it from inside a callback that is
/// currently reading it.
#[derive(Clone)]
pub struct Node(Rc<NodeData>);

/// A non-owning handle to a [`Node`]
#[derive(Clone, Debug)]
pub struct WeakNode(Weak<NodeData>);

impl WeakNode {
    pub fn upgrade(&self) -> Option<Node> {
        self.0.upgrade().map(Node)
    }
}

fn check_relation(relation: &str) -> Result<()> {
    if vocab::is_identity_relation(relation) {
        return Err(Error::ForbiddenRelation(relation.to_string()));
    }
    Ok(())
}

fn check_index(index: u64) -> Result<()> {
    if index < FIRST_INDEX {
        return Err(Error::InvalidIndex(index));
    }
    Ok(())
}

/// Smallest and largest sequence index in use
fn sequence_range(edges: &Edges) -> Option<(u64, u64)> {
    let mut indices = edges.keys().filter_map(|k| vocab::sequence_number_of(k));
    let first = indices.next()?;
    Some(indices.fold((first, first), |(lo, hi), i| (lo.min(i), hi.max(i))))
}

/// Shift the entries above a freed index down by one, up to the next hole
fn close_gap(edges: &mut Edges, index: u64) {
    let mut current = index;
    while let Some(next) = current.checked_add(1) {
        let Some(values) = edges.remove(&vocab::sequence_relation(next)) else {
            break;
        };
        edges.insert(vocab::sequence_relation(current), values);
        current = next;
    }
}

/// Sequence indices in use, ascending
fn sequence_indices(edges: &Edges) -> Vec<u64> {
    let mut indices: Vec<u64> = edges.keys().filter_map(|k| vocab::sequence_number_of(k)).collect();
    indices.sort_unstable();
    indices
}

impl Node {
    /// Create an empty anonymous node
    pub fn new() -> Self {
        Self::build(None)
    }

    /// Create an empty named node. The identifier must be URI-shaped.
    pub fn named(identifier: impl Into<String>) -> Result<Self> {
        let identifier = identifier.into();
        if !vocab::is_uri(&identifier) {
            return Err(Error::InvalidIdentifier(identifier));
        }
        Ok(Self::build(Some(identifier)))
    }

    /// Create an anonymous node with an `rdf:type`
    pub fn with_type(type_iri: &str) -> Result<Self> {
        let node = Self::new();
        node.put(vocab::TYPE, NodeReference::new(type_iri)?)?;
        Ok(node)
    }

    /// Create a named node with an `rdf:type`
    pub fn named_with_type(identifier: impl Into<String>, type_iri: &str) -> Result<Self> {
        let node = Self::named(identifier)?;
        node.put(vocab::TYPE, NodeReference::new(type_iri)?)?;
        Ok(node)
    }

    fn build(identifier: Option<String>) -> Self {
        Self(Rc::new(NodeData {
            index: NEXT_INDEX.fetch_add(1, Ordering::Relaxed),
            identifier,
            edges: RefCell::default(),
        }))
    }

    /// Process-unique index of this vertex
    pub fn index(&self) -> u64 {
        self.0.index
    }

    pub fn identifier(&self) -> Option<&str> {
        self.0.identifier.as_deref()
    }

    pub fn is_named(&self) -> bool {
        self.0.identifier.is_some()
    }

    /// Whether both handles point at the same vertex
    pub fn same_node(&self, other: &Node) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn downgrade(&self) -> WeakNode {
        WeakNode(Rc::downgrade(&self.0))
    }

    /// Copy of the edges, for walking the graph without holding a borrow
    pub fn edges(&self) -> Vec<(String, Vec<ObjectType>)> {
        self.0
            .edges
            .borrow()
            .iter()
            .map(|(relation, values)| (relation.clone(), values.clone()))
            .collect()
    }

    // ---- mutation ----

    /// Append `object` under `relation`
    pub fn put(&self, relation: &str, object: impl Into<ObjectType>) -> Result<&Self> {
        check_relation(relation)?;
        let object = object.into().normalized();
        self.0
            .edges
            .borrow_mut()
            .entry(relation.to_string())
            .or_default()
            .push(object);
        Ok(self)
    }

    /// Append a leaf built from a string: URIs become references, anything
    /// else a plain literal
    pub fn put_leaf(&self, relation: &str, value: &str) -> Result<&Self> {
        self.put(relation, ObjectType::leaf(value, None)?)
    }

    /// Append all `objects` under `relation`. No-op on empty input.
    pub fn put_all<I, T>(&self, relation: &str, objects: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectType>,
    {
        check_relation(relation)?;
        let objects: Vec<ObjectType> = objects.into_iter().map(|o| o.into().normalized()).collect();
        if objects.is_empty() {
            return Ok(());
        }
        self.0
            .edges
            .borrow_mut()
            .entry(relation.to_string())
            .or_default()
            .extend(objects);
        Ok(())
    }

    /// Append after the current last sequence index
    ///
    /// Fails with [`Error::InvalidIndex`] when the last index is `u64::MAX`.
    pub fn add(&self, element: impl Into<ObjectType>) -> Result<&Self> {
        let element = element.into().normalized();
        let mut edges = self.0.edges.borrow_mut();
        let next = match sequence_range(&edges) {
            Some((_, last)) => last.checked_add(1).ok_or(Error::InvalidIndex(last))?,
            None => FIRST_INDEX,
        };
        edges.insert(vocab::sequence_relation(next), vec![element]);
        Ok(self)
    }

    pub fn add_all<I, T>(&self, elements: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectType>,
    {
        for element in elements {
            self.add(element)?;
        }
        Ok(())
    }

    /// Insert at `index`
    ///
    /// Entries at `index` and above move up by one, but only as far as the
    /// first unused index: a hole absorbs the shift.
    pub fn add_at(&self, index: u64, element: impl Into<ObjectType>) -> Result<()> {
        check_index(index)?;
        let element = element.into().normalized();
        let mut edges = self.0.edges.borrow_mut();
        let mut free = index;
        while edges.contains_key(&vocab::sequence_relation(free)) {
            free = free.checked_add(1).ok_or(Error::InvalidIndex(free))?;
        }
        let mut target = free;
        while target > index {
            if let Some(values) = edges.remove(&vocab::sequence_relation(target - 1)) {
                edges.insert(vocab::sequence_relation(target), values);
            }
            target -= 1;
        }
        edges.insert(vocab::sequence_relation(index), vec![element]);
        Ok(())
    }

    pub fn add_first(&self, element: impl Into<ObjectType>) -> Result<()> {
        self.add_at(FIRST_INDEX, element)
    }

    /// Replace everything at `index` with `element`
    pub fn set(&self, index: u64, element: impl Into<ObjectType>) -> Result<()> {
        check_index(index)?;
        let element = element.into().normalized();
        self.0
            .edges
            .borrow_mut()
            .insert(vocab::sequence_relation(index), vec![element]);
        Ok(())
    }

    /// Remove the first sequence entry and re-pack the ones above it
    pub fn remove_first(&self) {
        let mut edges = self.0.edges.borrow_mut();
        if let Some((first, _)) = sequence_range(&edges) {
            edges.remove(&vocab::sequence_relation(first));
            close_gap(&mut edges, first);
        }
    }

    /// Remove the last sequence entry
    pub fn remove_last(&self) {
        let mut edges = self.0.edges.borrow_mut();
        if let Some((_, last)) = sequence_range(&edges) {
            edges.remove(&vocab::sequence_relation(last));
        }
    }

    pub fn remove_first_occurrence(&self, object: &ObjectType) -> bool {
        self.remove_occurrence(object, false)
    }

    pub fn remove_last_occurrence(&self, object: &ObjectType) -> bool {
        self.remove_occurrence(object, true)
    }

    fn remove_occurrence(&self, object: &ObjectType, from_end: bool) -> bool {
        // Comparing may read other nodes (or this one), so search before mutating
        let found = {
            let edges = self.0.edges.borrow();
            let mut indices = sequence_indices(&edges);
            if from_end {
                indices.reverse();
            }
            indices.into_iter().find_map(|i| {
                edges
                    .get(&vocab::sequence_relation(i))
                    .and_then(|values| values.iter().position(|v| v == object))
                    .map(|position| (i, position))
            })
        };
        let Some((index, position)) = found else {
            return false;
        };
        let mut edges = self.0.edges.borrow_mut();
        let key = vocab::sequence_relation(index);
        let emptied = edges.get_mut(&key).is_some_and(|values| {
            values.remove(position);
            values.is_empty()
        });
        if emptied {
            edges.remove(&key);
            close_gap(&mut edges, index);
        }
        true
    }

    /// Remove the first occurrence of `object` from every relation
    ///
    /// Relations left empty are dropped.
    pub fn remove(&self, object: &ObjectType) -> bool {
        let found: Vec<(String, usize)> = self
            .0
            .edges
            .borrow()
            .iter()
            .filter_map(|(relation, values)| {
                values
                    .iter()
                    .position(|v| v == object)
                    .map(|position| (relation.clone(), position))
            })
            .collect();
        let mut edges = self.0.edges.borrow_mut();
        for (relation, position) in &found {
            let emptied = edges.get_mut(relation).is_some_and(|values| {
                values.remove(*position);
                values.is_empty()
            });
            if emptied {
                edges.remove(relation);
            }
        }
        !found.is_empty()
    }

    /// Remove and return everything under `relation`
    pub fn remove_all(&self, relation: &str) -> Vec<ObjectType> {
        self.0.edges.borrow_mut().remove(relation).unwrap_or_default()
    }

    /// Replace everything under `relation`, returning the previous values
    pub fn replace<I, T>(&self, relation: &str, objects: I) -> Result<Vec<ObjectType>>
    where
        I: IntoIterator<Item = T>,
        T: Into<ObjectType>,
    {
        check_relation(relation)?;
        let objects: Vec<ObjectType> = objects.into_iter().map(|o| o.into().normalized()).collect();
        let mut edges = self.0.edges.borrow_mut();
        let previous = if objects.is_empty() {
            edges.remove(relation)
        } else {
            edges.insert(relation.to_string(), objects)
        };
        Ok(previous.unwrap_or_default())
    }

    /// Turn this node into a plain value holder
    ///
    /// Drops all sequence entries and node-valued children, then puts `value`
    /// as a plain literal at the first index.
    pub fn set_value(&self, value: &str) -> &Self {
        let mut edges = self.0.edges.borrow_mut();
        edges.retain(|relation, values| {
            if vocab::is_sequence_relation(relation) {
                return false;
            }
            values.retain(|v| v.as_node().is_none());
            !values.is_empty()
        });
        edges.insert(
            vocab::sequence_relation(FIRST_INDEX),
            vec![Literal::plain(value).into()],
        );
        self
    }

    // ---- lookup ----

    /// Everything under `relation`
    pub fn get(&self, relation: &str) -> QueryResult {
        let values = self.0.edges.borrow().get(relation).cloned().unwrap_or_default();
        values.into_iter().collect()
    }

    /// Values under any of `relations` that satisfy every condition
    ///
    /// An empty `relations` slice, or [`vocab::ANY_PREDICATE`], means every
    /// relation. With conditions, node references never qualify since they
    /// carry no data to match against.
    pub fn get_where(&self, relations: &[&str], conditions: &[ObjectType]) -> QueryResult {
        let relations = if relations.is_empty() {
            &[vocab::ANY_PREDICATE][..]
        } else {
            relations
        };
        let mut candidates = Vec::new();
        {
            let edges = self.0.edges.borrow();
            for relation in relations {
                if *relation == vocab::ANY_PREDICATE {
                    candidates.extend(edges.values().flatten().cloned());
                } else if let Some(values) = edges.get(*relation) {
                    candidates.extend(values.iter().cloned());
                }
            }
        }
        candidates
            .into_iter()
            .filter(|candidate| {
                conditions.is_empty()
                    || (candidate.is(ObjectKind::Accessible)
                        && conditions.iter().all(|c| candidate.matches(Some(c))))
            })
            .collect()
    }

    /// Values at sequence `index`
    pub fn get_index(&self, index: u64) -> QueryResult {
        self.get(&vocab::sequence_relation(index))
    }

    /// One result per index, from the first index to the last in use
    pub fn get_enumerated(&self) -> Vec<QueryResult> {
        let Some((_, last)) = self.range() else {
            return Vec::new();
        };
        (FIRST_INDEX..=last).map(|i| self.get_index(i)).collect()
    }

    pub fn get_first(&self) -> QueryResult {
        self.first().map(|i| self.get_index(i)).unwrap_or_default()
    }

    pub fn get_last(&self) -> QueryResult {
        self.last().map(|i| self.get_index(i)).unwrap_or_default()
    }

    /// Nodes under `relation` whose single type is `type_iri`
    pub fn get_with_type(&self, relation: &str, type_iri: &str) -> QueryResult {
        self.get(relation)
            .into_iter()
            .filter(|o| {
                o.as_node()
                    .is_some_and(|n| n.get_type().is_ok_and(|t| t == type_iri))
            })
            .collect()
    }

    /// Values under `relation` holding `id_value` under `id_relation`
    pub fn get_by_identifier_relation(
        &self,
        relation: &str,
        id_relation: &str,
        id_value: impl Into<ObjectType>,
    ) -> Result<QueryResult> {
        let template = Node::new();
        template.put(id_relation, id_value)?;
        Ok(self.get_where(&[relation], &[template.into()]))
    }

    /// The direct child carrying `identifier`
    pub fn get_by_identifier(&self, identifier: &str) -> Result<ObjectType> {
        let found: QueryResult = self
            .children()
            .into_iter()
            .filter(|o| o.identifier() == Some(identifier))
            .collect();
        found.identifiable_node()
    }

    /// Direct child nodes having `type_iri` among their types
    pub fn get_by_type(&self, type_iri: &str) -> QueryResult {
        self.children()
            .into_iter()
            .filter(|o| o.as_node().is_some_and(|n| n.has_type(type_iri)))
            .collect()
    }

    /// Direct child nodes of `type_iri` whose `id_relation` holds `id_value`
    pub fn get_by_type_and_id(&self, type_iri: &str, id_relation: &str, id_value: &str) -> QueryResult {
        self.children()
            .into_iter()
            .filter(|o| {
                o.as_node().is_some_and(|n| {
                    n.has_type(type_iri) && n.get(id_relation).strings(false).contains(id_value)
                })
            })
            .collect()
    }

    /// The unique `rdf:type` identifier
    pub fn get_type(&self) -> Result<String> {
        self.get(vocab::TYPE).identifier()
    }

    pub fn has_type(&self, type_iri: &str) -> bool {
        self.get(vocab::TYPE).iter().any(|o| o.identifier() == Some(type_iri))
    }

    /// Smallest sequence index in use
    pub fn first(&self) -> Option<u64> {
        self.range().map(|(first, _)| first)
    }

    /// Largest sequence index in use
    pub fn last(&self) -> Option<u64> {
        self.range().map(|(_, last)| last)
    }

    fn range(&self) -> Option<(u64, u64)> {
        sequence_range(&self.0.edges.borrow())
    }

    pub fn relations(&self) -> Vec<String> {
        self.0.edges.borrow().keys().cloned().collect()
    }

    pub fn contains_key(&self, relation: &str) -> bool {
        self.0.edges.borrow().contains_key(relation)
    }

    pub fn contains(&self, object: &ObjectType) -> bool {
        self.0.edges.borrow().values().flatten().any(|v| v == object)
    }

    /// Number of values across all relations
    pub fn len(&self) -> usize {
        self.0.edges.borrow().values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.edges.borrow().is_empty()
    }

    /// All values of all relations
    pub fn children(&self) -> Vec<ObjectType> {
        self.0.edges.borrow().values().flatten().cloned().collect()
    }

    // ---- subsumption ----

    /// Whether this node holds at least the data described by `condition`
    ///
    /// Every value under each relation of the condition must be satisfied by
    /// a distinct value under the same relation here; the relation
    /// [`vocab::ANY_PREDICATE`] draws candidates from every relation. Child
    /// nodes are matched recursively, leaves by equality.
    pub fn matches(&self, condition: Option<&ObjectType>) -> bool {
        match condition {
            None => true,
            Some(condition) => self.matches_within(condition, &mut Assumptions::default()),
        }
    }

    pub(crate) fn matches_within(&self, condition: &ObjectType, assumed: &mut Assumptions) -> bool {
        let Some(condition) = condition.as_node() else {
            return false;
        };
        if self.same_node(condition) {
            return true;
        }
        let pair = (self.index(), condition.index());
        if !assumed.insert(pair) {
            return true;
        }
        let result = self.subsumes(condition, assumed);
        if !result {
            assumed.remove(&pair);
        }
        result
    }

    fn subsumes(&self, condition: &Node, assumed: &mut Assumptions) -> bool {
        let own = self.0.edges.borrow();
        let wanted = condition.0.edges.borrow();
        for (relation, conditions) in wanted.iter() {
            let candidates: Vec<&ObjectType> = if relation == vocab::ANY_PREDICATE {
                own.values().flatten().collect()
            } else {
                match own.get(relation) {
                    Some(values) => values.iter().collect(),
                    None => return false,
                }
            };
            if !cover_distinct(&candidates, conditions, |candidate, condition| {
                candidate.satisfies(condition, assumed)
            }) {
                return false;
            }
        }
        true
    }

    // ---- equality ----

    pub(crate) fn eq_within(&self, other: &Node, assumed: &mut Assumptions) -> bool {
        if self.same_node(other) {
            return true;
        }
        match (self.identifier(), other.identifier()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self.content_eq_within(other, assumed),
            _ => false,
        }
    }

    fn content_eq_within(&self, other: &Node, assumed: &mut Assumptions) -> bool {
        let pair = (self.index(), other.index());
        if !assumed.insert(pair) {
            return true;
        }
        let result = {
            let left = self.0.edges.borrow();
            let right = other.0.edges.borrow();
            left.len() == right.len()
                && left.iter().all(|(relation, values)| {
                    right
                        .get(relation)
                        .is_some_and(|others| multiset_eq(values, others, assumed))
                })
        };
        if !result {
            assumed.remove(&pair);
        }
        result
    }

    /// Compare the content of two nodes, ignoring their own identifiers
    pub fn structurally_equal(&self, other: &Node) -> bool {
        self.same_node(other) || self.content_eq_within(other, &mut Assumptions::default())
    }

    /// Two handles for the same identifier whose content has drifted apart
    pub fn diverges_from(&self, other: &Node) -> bool {
        match (self.identifier(), other.identifier()) {
            (Some(a), Some(b)) if a == b && !self.structurally_equal(other) => {
                tracing::warn!(identifier = a, "named nodes with the same identifier differ in content");
                true
            }
            _ => false,
        }
    }

    /// Order-independent digest over the edges, shallow in child nodes
    fn content_digest(&self) -> u64 {
        let edges = self.0.edges.borrow();
        edges.iter().fold(0u64, |digest, (relation, values)| {
            let values_digest = values
                .iter()
                .fold(0u64, |acc, v| acc.wrapping_add(v.shallow_digest()));
            let mut hasher = DefaultHasher::new();
            (relation, values_digest).hash(&mut hasher);
            digest.wrapping_add(hasher.finish())
        })
    }

    // ---- restructuring ----

    /// Re-mount sequence and `rdf:value` children under relations named by
    /// their type
    ///
    /// Typed child nodes move under their type (and lose it); untyped or
    /// multiply typed children stay where they are, recursively unordered.
    /// Leaves become `rdf:value`. A result holding nothing but a single
    /// `rdf:value` collapses to that value.
    pub fn as_unordered(&self, remove_type: bool) -> Result<ObjectType> {
        let mut on_path = HashSet::new();
        let result = self.as_unordered_within(remove_type, &mut on_path)?;
        tracing::trace!(index = self.index(), "unordered node");
        Ok(result)
    }

    fn as_unordered_within(&self, remove_type: bool, on_path: &mut HashSet<u64>) -> Result<ObjectType> {
        on_path.insert(self.index());
        let result = match self.identifier() {
            Some(identifier) => Node::named(identifier)?,
            None => Node::new(),
        };
        for (relation, values) in self.edges() {
            if remove_type && relation == vocab::TYPE {
                continue;
            }
            if !(vocab::is_sequence_relation(&relation) || relation == vocab::VALUE) {
                result.put_all(&relation, values)?;
                continue;
            }
            for object in values {
                match object.as_node().cloned() {
                    Some(child) if on_path.contains(&child.index()) => {
                        result.put(&relation, child)?;
                    }
                    Some(child) => match child.get_type() {
                        Ok(child_type) => {
                            result.put(&child_type, child.as_unordered_within(true, on_path)?)?;
                        }
                        Err(_) => {
                            result.put(&relation, child.as_unordered_within(false, on_path)?)?;
                        }
                    },
                    None => {
                        result.put(vocab::VALUE, object)?;
                    }
                }
            }
        }
        on_path.remove(&self.index());

        if result.relations() == [vocab::VALUE] {
            let values = result.get(vocab::VALUE);
            if values.is_unique() {
                return values.value();
            }
        }
        Ok(result.into())
    }

    // ---- display ----

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, indent: usize, on_path: &mut HashSet<u64>) -> fmt::Result {
        let pad = " ".repeat(indent);
        if let Some(identifier) = self.identifier() {
            writeln!(f, "{}[{}]", pad, identifier)?;
        }
        on_path.insert(self.index());

        let mut attributes = Vec::new();
        let mut elements = BTreeMap::new();
        for (relation, values) in self.edges() {
            match vocab::sequence_number_of(&relation) {
                Some(index) => {
                    elements.insert(index, (relation, values));
                }
                None => attributes.push((relation, values)),
            }
        }

        for (relation, values) in attributes.iter().chain(elements.values()) {
            for value in values {
                match value.as_node() {
                    Some(child) if on_path.contains(&child.index()) => {
                        writeln!(f, "{}{} = {}", pad, relation, child.identifier().unwrap_or("(cycle)"))?;
                    }
                    Some(child) => {
                        writeln!(f, "{}{} {{", pad, relation)?;
                        child.write_indented(f, indent + 2, on_path)?;
                        writeln!(f, "{}}}", pad)?;
                    }
                    None => writeln!(f, "{}{} = {}", pad, relation, value)?,
                }
            }
        }
        on_path.remove(&self.index());
        Ok(())
    }
}

/// Equality of two value collections, ignoring order
fn multiset_eq(left: &[ObjectType], right: &[ObjectType], assumed: &mut Assumptions) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut used = vec![false; right.len()];
    'values: for l in left {
        for (i, r) in right.iter().enumerate() {
            if !used[i] && l.eq_within(r, assumed) {
                used[i] = true;
                continue 'values;
            }
        }
        return false;
    }
    true
}

/// Whether every condition can be assigned its own satisfying candidate
///
/// Bipartite matching with augmenting paths, so the outcome does not depend
/// on the order candidates are tried in.
fn cover_distinct<F>(candidates: &[&ObjectType], conditions: &[ObjectType], mut satisfies: F) -> bool
where
    F: FnMut(&ObjectType, &ObjectType) -> bool,
{
    if conditions.len() > candidates.len() {
        return false;
    }
    let mut options: Vec<Vec<usize>> = Vec::with_capacity(conditions.len());
    for condition in conditions {
        let mut fitting = Vec::new();
        for (i, candidate) in candidates.iter().enumerate() {
            if satisfies(*candidate, condition) {
                fitting.push(i);
            }
        }
        if fitting.is_empty() {
            return false;
        }
        options.push(fitting);
    }

    let mut owner: Vec<Option<usize>> = vec![None; candidates.len()];
    (0..conditions.len()).all(|condition| {
        let mut seen = vec![false; candidates.len()];
        augment(condition, &options, &mut owner, &mut seen)
    })
}

fn augment(condition: usize, options: &[Vec<usize>], owner: &mut [Option<usize>], seen: &mut [bool]) -> bool {
    for &candidate in &options[condition] {
        if seen[candidate] {
            continue;
        }
        seen[candidate] = true;
        let free = match owner[candidate] {
            None => true,
            Some(other) => augment(other, options, owner, seen),
        };
        if free {
            owner[candidate] = Some(condition);
            return true;
        }
    }
    false
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.eq_within(other, &mut Assumptions::default())
    }
}

impl Eq for Node {}

impl Hash for Node {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self.identifier() {
            Some(identifier) => (1u8, identifier).hash(state),
            None => (0u8, self.content_digest()).hash(state),
        }
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("index", &self.index())
            .field("identifier", &self.identifier())
            .field("relations", &self.relations())
            .finish()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_indented(f, 0, &mut HashSet::new())
    }
}
